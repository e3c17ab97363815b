use thiserror::Error;

/// A session token that could not be turned into claims.
///
/// Never leaves the session adapter: it is logged and surfaced as "no identity".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Token is empty")]
    Empty,

    #[error("Token has {0} segments, expected 3")]
    Segments(usize),

    #[error("Claims segment is not valid base64: {0}")]
    Base64(String),

    #[error("Claims segment is not valid JSON: {0}")]
    Json(String),
}

/// Failure reading or writing the persisted token slot.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Token slot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token slot is corrupt: {0}")]
    Corrupt(String),
}

/// Network-level failure reported by an [`HttpClient`](crate::runtime::HttpClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Minimum amount is {minimum} {currency}")]
    InvalidAmount {
        amount: f64,
        minimum: f64,
        currency: String,
    },

    #[error("Invalid payment request: {0}")]
    InvalidRequest(String),

    #[error("Transaction {0} is already being initialized")]
    DuplicateTransaction(String),

    /// Carries the most specific message the proxy gave us, verbatim.
    #[error("{0}")]
    PaymentInitFailed(String),

    #[error("{0}")]
    PaymentVerifyFailed(String),

    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl PaymentError {
    /// Human-readable message, as stored in the adapter's `error` projection.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
