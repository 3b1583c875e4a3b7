pub mod price_port;
pub mod config_port;
pub mod event_port;
