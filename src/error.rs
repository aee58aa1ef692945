use thiserror::Error;

/// Ready-made error type.
///
/// Middlewares are generic over their error, so nothing forces this type on
/// a handler. It covers the failure reasons the crate itself can produce and
/// the common decoding failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Http(#[from] http::Error),

    #[error("missing {0}")]
    Missing(String),

    #[error("invalid {name}: {reason}")]
    Invalid { name: String, reason: String },

    #[error("unknown status code: {0}")]
    UnknownStatus(u16),
}

impl Error {
    pub fn missing(name: impl Into<String>) -> Self {
        Error::Missing(name.into())
    }

    pub fn invalid(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::Invalid {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
