use thiserror::Error;

#[derive(Error, Debug)]
pub enum SightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SightError>;
