use thiserror::Error;

/// Result type alias for shellgen operations
pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Unsupported checksum algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Checksum mismatch for {file}: {computed} != {expected}")]
    ChecksumMismatch {
        file: String,
        computed: String,
        expected: String,
    },

    #[error("Artifact URL has no file name: {0}")]
    MissingFileName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API base URL `{value}`: {source}")]
    InvalidApiBase {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid timeout `{0}` (expected whole seconds)")]
    InvalidTimeout(String),

    #[error("Could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown option `{key}` in {group}")]
    UnknownOption { group: String, key: String },

    #[error("Option `{0}` requires a value (use {0}=<value>)")]
    MissingArgument(String),

    #[error("Option `{0}` does not take a value")]
    UnexpectedArgument(String),

    #[error("Cannot continue past {0}: required selection missing")]
    StepIncomplete(&'static str),
}
