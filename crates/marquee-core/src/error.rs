use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Intersection observer unavailable: {0}")]
    ObserverUnavailable(String),

    #[error("Carousel index {index} out of range for {len} items")]
    InvalidIndex { index: usize, len: usize },

    #[error("Carousel must contain at least one item")]
    EmptyCarousel,

    #[error("Form submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Content fetch failed: {0}")]
    FetchFailed(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Invalid form input: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
