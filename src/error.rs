use std::fmt;

use thiserror::Error;

/// Collaborator boundary a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DataSource,
    QrEncoding,
    Rendering,
    Filesystem,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::DataSource => "data source",
            Stage::QrEncoding => "qr encoding",
            Stage::Rendering => "rendering",
            Stage::Filesystem => "filesystem",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FlyerError {
    #[error("no listing found for slug '{slug}'")]
    NotFound { slug: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{stage} failed: {source:#}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },
}

impl FlyerError {
    pub fn config(message: impl Into<String>) -> Self {
        FlyerError::Configuration(message.into())
    }

    pub fn collaborator(stage: Stage, source: anyhow::Error) -> Self {
        FlyerError::Collaborator { stage, source }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            FlyerError::NotFound { .. } => 2,
            FlyerError::Configuration(_) => 3,
            FlyerError::Collaborator { .. } => 1,
        }
    }
}

pub type Result<T, E = FlyerError> = std::result::Result<T, E>;
