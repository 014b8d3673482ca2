use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoseForgeError {
    #[error("Insufficient Data: {usable} usable frame(s), at least {required} required")]
    InsufficientData { usable: usize, required: usize },

    #[error("Malformed Frame #{index}: {reason}")]
    MalformedFrame { index: usize, reason: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
}

impl PoseForgeError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

pub type PfResult<T> = Result<T, PoseForgeError>;
