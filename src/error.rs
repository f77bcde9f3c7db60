use std::fmt;
use uuid::Uuid;

/// Per-item picker errors
///
/// Both variants are local to one selection and never abort the rest of a
/// batch.
#[derive(Debug, Clone, PartialEq)]
pub enum PickError {
    /// The item cannot produce an image payload at all
    UnsupportedContent(String),
    /// The asynchronous payload load failed (host-supplied cause)
    Load(String),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::UnsupportedContent(msg) => write!(f, "Unsupported content: {}", msg),
            PickError::Load(msg) => write!(f, "Load failed: {}", msg),
        }
    }
}

impl std::error::Error for PickError {}

/// A per-item failure event
///
/// `index` is the failed item's position in the original selection order;
/// it is absent for single-select presentations.
#[derive(Debug, Clone, PartialEq)]
pub struct PickFailure {
    pub request_id: Uuid,
    pub index: Option<usize>,
    pub error: PickError,
}

impl fmt::Display for PickFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "Item {}: {}", index, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}
