use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate plugin id '{id}'")]
    DuplicateIdentity { id: String },

    #[error("no plugin registered under id '{id}'")]
    NotFound { id: String },

    #[error("malformed descriptor: {reason}")]
    MalformedDescriptor { reason: String },

    #[error("batch registration failed at '{id}': {source}")]
    BatchRegistrationFailed {
        id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    #[must_use]
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateIdentity { id: id.into() }
    }

    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn batch(id: impl Into<String>, source: Error) -> Self {
        Self::BatchRegistrationFailed {
            id: id.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
