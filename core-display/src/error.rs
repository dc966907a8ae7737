use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("Display mode unsupported on API {api_level}: {reason}")]
    UnsupportedPlatformFeature { api_level: u32, reason: String },
}

pub type Result<T> = std::result::Result<T, DisplayError>;
