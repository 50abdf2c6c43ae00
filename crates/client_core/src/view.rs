//! What the lookup page shows, and how each state turns into text.

use shared::{domain::OrderRecord, error::LookupError};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(OrderRecord),
    Error(LookupError),
}

impl UiState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&OrderRecord> {
        match self {
            Self::Success(record) => Some(record),
            _ => None,
        }
    }
}

/// Idle and loading render as nothing.
pub fn render(state: &UiState) -> String {
    match state {
        UiState::Idle | UiState::Loading => String::new(),
        UiState::Success(record) => record.to_pretty_json(),
        UiState::Error(err) => err.to_string(),
    }
}
