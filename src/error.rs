use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Unknown mapping: {0}")]
    UnknownMapping(String),

    #[error("XML document failed to parse: {0}")]
    Document(#[from] roxmltree::Error),

    #[error("Invalid path query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("Unknown transformer: {0}")]
    TransformerResolution(String),

    #[error("Transformer '{name}' failed: {message}")]
    Transform { name: String, message: String },

    #[error("Unknown target type: {0}")]
    UnknownTarget(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapperError>;
