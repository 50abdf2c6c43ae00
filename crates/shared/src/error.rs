use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Http,
    Transport,
}

/// Failure of a single lookup. The `Display` output is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Please enter an Order UID")]
    Validation,
    #[error("Order {uid} not found")]
    NotFound { uid: String },
    #[error("Error: {status} {reason}")]
    Http { status: u16, reason: String },
    #[error("Failed to fetch order: {0}")]
    Transport(String),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Http { .. } => ErrorKind::Http,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    pub fn transport(description: impl Into<String>) -> Self {
        Self::Transport(description.into())
    }
}

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct TransportError {
    pub description: String,
}

impl TransportError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl From<TransportError> for LookupError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_user_facing_text() {
        assert_eq!(
            LookupError::Validation.to_string(),
            "Please enter an Order UID"
        );
        assert_eq!(
            LookupError::NotFound {
                uid: "missing".into()
            }
            .to_string(),
            "Order missing not found"
        );
        assert_eq!(
            LookupError::Http {
                status: 500,
                reason: "Internal Server Error".into()
            }
            .to_string(),
            "Error: 500 Internal Server Error"
        );
        assert_eq!(
            LookupError::from(TransportError::new("network down")).to_string(),
            "Failed to fetch order: network down"
        );
    }

    #[test]
    fn kind_follows_variant() {
        assert_eq!(LookupError::Validation.kind(), ErrorKind::Validation);
        assert_eq!(
            LookupError::transport("dns failure").kind(),
            ErrorKind::Transport
        );
    }
}
