//! Concrete strategy implementations. Each variant owns only its own
//! decision state and goes through the [`crate::domain::strategy::Strategy`]
//! trait.

pub mod stupid;
pub mod random;
pub mod benchmark;
pub mod linreg;

pub use benchmark::BenchmarkStrategy;
pub use linreg::LinRegStrategy;
pub use random::RandomStrategy;
pub use stupid::StupidStrategy;
