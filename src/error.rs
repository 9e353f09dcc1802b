use thiserror::Error;

/// Domain failures raised while loading or shaping channel metrics.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("missing column `{0}` in CSV header")]
    MissingColumn(String),

    #[error("line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("no rows with source type `{0}`")]
    MissingCategory(String),

    #[error("unknown palette `{0}` (expected blue, green, orange or red)")]
    UnknownPalette(String),

    #[error("unknown heatmap axis `{0}`")]
    UnknownAxis(String),

    #[error("unknown metric column `{0}`")]
    UnknownColumn(String),
}
