//! Core domain types and logic.

pub mod ohlcv;
pub mod order;
pub mod position;
pub mod ledger;
pub mod universe;
pub mod calendar;
pub mod factor;
pub mod strategy;
pub mod strategies;
pub mod backtest;
pub mod error;
