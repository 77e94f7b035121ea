use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("can't read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse config {path}: {source}")]
    ConfigYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("bad timestamp {value:?} for {path}: {source}")]
    Timestamp {
        path: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("bad timestamp {value:?} for {path}: expected 1 to 6 fractional second digits")]
    TimestampFraction { path: String, value: String },

    #[error("no last activity timestamp for {0}")]
    MissingTimestamp(String),

    #[error("cutoff of {0} days is out of range")]
    DateRange(u32),

    #[error("group {0} was reached twice while walking subgroups")]
    GroupCycle(u64),

    #[error("can't write report: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// HTTP status code, if the failure came from a non-success response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
