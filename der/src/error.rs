use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
    #[error("empty input")]
    Empty,
    #[error("tag numbers above 30 are not supported")]
    HighTagNumber,
    #[error("length field does not fit in usize")]
    LengthOverflow,
    #[error("indefinite length used with a primitive encoding")]
    IndefiniteLengthPrimitive,
    #[error("indefinite length content is missing end-of-contents octets")]
    MissingEndOfContents,
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl<I> nom::error::ParseError<I> for Error {
    fn from_error_kind(_input: I, kind: nom::error::ErrorKind) -> Self {
        Error::Parser(kind)
    }

    fn append(_input: I, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<Error>> for Error {
    fn from(err: nom::Err<Error>) -> Self {
        match err {
            nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

impl kensa::error::Categorize for Error {
    fn kind(&self) -> kensa::error::ErrorKind {
        kensa::error::ErrorKind::Parse
    }
}
