//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for papertrade.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PapertradeError {
    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("cannot sell {requested} of {symbol}: only {held} held")]
    InsufficientHoldings {
        symbol: String,
        requested: u32,
        held: u32,
    },

    #[error("buying {symbol} needs {required:.2} but only {available:.2} in hand")]
    InsufficientCash {
        symbol: String,
        required: f64,
        available: f64,
    },

    #[error("no price data for {symbol} on {date}")]
    NoData { symbol: String, date: NaiveDate },

    #[error("cannot admit {symbol} to universe: {reason}")]
    InvalidSymbol { symbol: String, reason: String },

    #[error("{date} is not a trading day")]
    NotATradingDay { date: NaiveDate },

    #[error("price source error: {reason}")]
    PriceSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("io error: {reason}")]
    Io { reason: String },
}

impl From<std::io::Error> for PapertradeError {
    fn from(err: std::io::Error) -> Self {
        PapertradeError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<&PapertradeError> for std::process::ExitCode {
    fn from(err: &PapertradeError) -> Self {
        let code: u8 = match err {
            PapertradeError::Io { .. } => 1,
            PapertradeError::ConfigParse { .. }
            | PapertradeError::ConfigMissing { .. }
            | PapertradeError::ConfigInvalid { .. } => 2,
            PapertradeError::NoData { .. } | PapertradeError::PriceSource { .. } => 3,
            PapertradeError::InvalidOrder { .. }
            | PapertradeError::NotATradingDay { .. }
            | PapertradeError::InvalidSymbol { .. } => 4,
            PapertradeError::InsufficientHoldings { .. }
            | PapertradeError::InsufficientCash { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
