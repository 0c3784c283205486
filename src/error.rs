use thiserror::Error;

/// Everything that can stop the bootstrap. Nothing here is retried.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("invalid configuration for {key}: {message}")]
    Config { key: &'static str, message: String },

    #[error("failed to connect to MongoDB: {0}")]
    Connect(#[source] mongodb::error::Error),

    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("database does not match the expected layout: {}", .0.join("; "))]
    Verification(Vec<String>),
}

impl BootstrapError {
    /// Returns a closure wrapping a driver error as a failure of `step`, for use with `map_err`.
    pub fn step(step: &'static str) -> impl FnOnce(mongodb::error::Error) -> Self {
        move |source| Self::Step { step, source }
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
