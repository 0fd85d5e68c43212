use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// The arena is full and growth is disabled by configuration.
    #[error("node capacity exceeded ({capacity} nodes) and growth is disabled")]
    CapacityExceeded { capacity: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
}
