//! Error types for authoring-time operations.
//!
//! Per-frame operations (update, evaluate, solve) never fail; only building
//! skeletons and chains or loading data can.

/// Errors raised while constructing or loading rig data.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum RigError {
    /// JSON parse/serialize failure
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A bone with this name already exists
    #[error("Duplicate bone name: {name}")]
    DuplicateBone { name: String },

    /// Parent handle does not refer to an existing bone
    #[error("Unknown parent bone {parent} for '{name}'")]
    UnknownParent { name: String, parent: u32 },

    /// IK chain is shorter than the solver needs
    #[error("IK chain needs at least {required} joints, got {actual}")]
    ChainTooShort { required: usize, actual: usize },

    /// Keyframe with a negative or non-finite time or value
    #[error("Invalid keyframe at time {time} on target '{target}'")]
    InvalidKeyframe { target: String, time: f32 },
}

impl RigError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Json(_) => "serialization",
            Self::DuplicateBone { .. } | Self::UnknownParent { .. } => "skeleton",
            Self::ChainTooShort { .. } => "ik",
            Self::InvalidKeyframe { .. } => "data",
        }
    }
}

/// Result alias for fallible authoring operations.
pub type Result<T> = core::result::Result<T, RigError>;
