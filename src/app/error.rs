use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailvaneError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Malformed document: no <{tag}> block found from offset {offset}")]
    MalformedDocument { tag: String, offset: usize },

    #[error("Invalid watch pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MailvaneError>;
