use kensa::error::{Categorize, ErrorResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PEM decode error: {0}")]
    Pem(#[from] kensa_pem::error::Error),

    #[error("PKCS#12 decode error: {0}")]
    Pkcs12(#[from] kensa_pkcs12::Error),

    #[error("signed message error: {0}")]
    Cms(#[from] kensa_cms::Error),

    #[error("profile decode error: {0}")]
    Profile(#[from] kensa_profile::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// The body printed on stdout for a failed command.
    ///
    /// Decoder failures collapse to their category message; everything
    /// else is a fixed message so that no paths or offsets leak.
    pub(crate) fn response(&self) -> ErrorResponse {
        match self {
            Error::Pem(e) => ErrorResponse::from_error(e),
            Error::Pkcs12(e) => ErrorResponse::from_error(e),
            Error::Cms(e) => ErrorResponse::from_error(e),
            Error::Profile(e) => ErrorResponse::from_error(e),
            Error::Io(_) => ErrorResponse {
                error: "cannot read input",
            },
            Error::InvalidInput(_) => ErrorResponse {
                error: "malformed input",
            },
            Error::Json(_) | Error::Yaml(_) | Error::Fmt(_) => ErrorResponse {
                error: "cannot render output",
            },
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
