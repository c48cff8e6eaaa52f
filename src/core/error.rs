use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-200 response. `code` and `message` come from the `{code, message}`
    /// body, or fall back to the HTTP status when the body is not decodable.
    #[error("code: {code}, message: {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown order status {0}")]
    UnknownOrderStatus(i64),

    #[error("Multiple active orders found ({0})")]
    MultipleActiveOrders(usize),
}

impl DeliveryError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DeliveryError::Auth(_))
    }

    /// Login and refresh failures are reported as `Auth` so callers can tell
    /// a dead session apart from an ordinary API error.
    pub(crate) fn into_auth(self) -> Self {
        match self {
            DeliveryError::Api { message, code, .. } => {
                DeliveryError::Auth(format!("code: {code}, message: {message}"))
            }
            other => other,
        }
    }
}
