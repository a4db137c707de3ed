use crate::score::ScoreRejection;
use crate::session::ViewMode;
use crate::validate::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("entrant index {index} out of range ({len} entrants)")]
    EntrantOutOfRange { index: usize, len: usize },
    #[error("metric index {index} out of range ({len} metrics)")]
    MetricOutOfRange { index: usize, len: usize },
    #[error("{list} index {index} out of range (length {len})")]
    IndexOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },
    #[error("invalid score {raw:?}: {reason}")]
    InvalidScore { raw: String, reason: ScoreRejection },
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{action} is not allowed while {mode}")]
    WrongMode { action: &'static str, mode: ViewMode },
    #[error("entrant {entrant:?} has {actual} scores, expected {expected}")]
    ShapeMismatch {
        entrant: String,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CanvasError {
    /// Short machine-readable name, used by front ends that report errors as data.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EntrantOutOfRange { .. }
            | Self::MetricOutOfRange { .. }
            | Self::IndexOutOfRange { .. } => "IndexOutOfRange",
            Self::InvalidScore { .. } => "InvalidScore",
            Self::Validation(_) => "ValidationError",
            Self::WrongMode { .. } => "WrongMode",
            Self::ShapeMismatch { .. } => "ShapeMismatch",
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
        }
    }
}
