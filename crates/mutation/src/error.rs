use thiserror::Error;

/// Why a mutation was refused or failed. All of these are non-fatal: the
/// document and the side table are left exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("no element matches `{0}`")]
    TargetNotFound(String),

    #[error("refusing to edit protected element <{0}>")]
    ProtectedElement(String),

    #[error("unsafe content rejected: {0}")]
    UnsafeContent(&'static str),

    #[error("DOM write failed: {0}")]
    WriteFailed(String),
}

impl MutationError {
    /// Whether the failure is a missing target rather than a refusal.
    pub fn is_stale_target(&self) -> bool {
        matches!(self, Self::TargetNotFound(_))
    }
}
