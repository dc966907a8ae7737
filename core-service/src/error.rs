use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Shell configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error(transparent)]
    Lifecycle(#[from] core_lifecycle::LifecycleError),
}

impl ShellError {
    /// Whether the host must let the process crash.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Lifecycle(core_lifecycle::LifecycleError::FatalInitFailure(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
