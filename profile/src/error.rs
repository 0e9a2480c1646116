use kensa::error::{Categorize, ErrorKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("signed message: {0}")]
    Cms(#[from] kensa_cms::Error),
    #[error("property list: {0}")]
    Plist(#[from] plist::Error),
    #[error("property list: unsupported value type")]
    UnsupportedValue,
}

impl Categorize for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Cms(e) => e.kind(),
            Error::Plist(_) | Error::UnsupportedValue => ErrorKind::Parse,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::signature(Error::Cms(kensa_cms::Error::NoValidSigner), ErrorKind::SignatureInvalid)]
    #[case::content_type(
        Error::Cms(kensa_cms::Error::UnexpectedContentType("1.2.840.113549.1.7.1".into())),
        ErrorKind::UnsupportedContentType
    )]
    #[case::value(Error::UnsupportedValue, ErrorKind::Parse)]
    fn test_error_kind(#[case] error: Error, #[case] expected: ErrorKind) {
        assert_eq!(expected, error.kind());
    }
}
