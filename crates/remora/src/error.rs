use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Broken hide/unhide bookkeeping. Indicates a bug in stage composition.
    #[error(transparent)]
    Graph(#[from] remora_graphlib::Error),

    #[error("layout algorithm `{name}` failed: {message}")]
    Algorithm { name: String, message: String },

    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("layout did not finish within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("failed to start layout worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("layout worker panicked")]
    WorkerPanicked,
}

impl Error {
    pub fn algorithm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Algorithm {
            name: name.into(),
            message: message.into(),
        }
    }
}
