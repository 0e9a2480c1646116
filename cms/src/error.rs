use kensa::error::{Categorize, ErrorKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ContentInfo: expected SEQUENCE")]
    ContentInfoExpectedSequence,
    #[error("ContentInfo: expected 1 or 2 elements, got {0}")]
    ContentInfoInvalidElementCount(usize),
    #[error("ContentInfo: expected contentType OBJECT IDENTIFIER")]
    ContentInfoExpectedOid,
    #[error("ContentInfo: content must be [0] EXPLICIT")]
    ContentInfoExpectedExplicitContent,
    #[error("ContentInfo: content is absent")]
    ContentInfoMissingContent,
    #[error("ContentInfo: data content must be an OCTET STRING")]
    ContentInfoExpectedOctetString,
    #[error("unexpected content type: {0}")]
    UnexpectedContentType(String),

    #[error("SignedData: expected SEQUENCE")]
    SignedDataExpectedSequence,
    #[error("SignedData: invalid version")]
    SignedDataInvalidVersion,
    #[error("SignedData: digestAlgorithms must be a SET")]
    DigestAlgorithmsExpectedSet,
    #[error("SignedData: signerInfos must be a SET")]
    SignerInfosExpectedSet,
    #[error("SignedData: unexpected element {0}")]
    SignedDataUnexpectedElement(String),
    #[error("EncapsulatedContentInfo: expected SEQUENCE {{ OID, [0] EXPLICIT OCTET STRING }}")]
    EncapsulatedContentInfoExpectedSequence,
    #[error("EncapsulatedContentInfo: eContent must be an OCTET STRING")]
    EncapsulatedContentExpectedOctetString,
    #[error("EncapsulatedContentInfo: detached content is not supported")]
    DetachedContent,

    #[error("SignerInfo: expected SEQUENCE")]
    SignerInfoExpectedSequence,
    #[error("SignerInfo: missing {0}")]
    SignerInfoMissingField(&'static str),
    #[error("SignerInfo: invalid version")]
    SignerInfoInvalidVersion,
    #[error("SignerInfo: unexpected element {0}")]
    SignerInfoUnexpectedElement(String),
    #[error("SignerIdentifier: expected IssuerAndSerialNumber or [0] SubjectKeyIdentifier")]
    SignerIdentifierInvalid,
    #[error("SignerInfo: signature must be an OCTET STRING")]
    SignatureExpectedOctetString,

    #[error("no signer verified")]
    NoValidSigner,
    #[error("every signer uses an unsupported algorithm")]
    UnsupportedSignerAlgorithms,

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] kensa_asn1::error::Error),
    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] kensa_pkix_types::Error),
    #[error("PKCS#9 attribute error: {0}")]
    Pkcs9(#[from] kensa_pkcs9::Error),
    #[error("certificate error: {0}")]
    X509(#[from] kensa_x509::Error),
}

impl Categorize for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedContentType(_) => ErrorKind::UnsupportedContentType,
            Error::NoValidSigner => ErrorKind::SignatureInvalid,
            Error::UnsupportedSignerAlgorithms => ErrorKind::UnsupportedAlgorithm,
            Error::Asn1(e) => e.kind(),
            Error::PkixTypes(e) => e.kind(),
            Error::Pkcs9(e) => e.kind(),
            Error::X509(e) => e.kind(),
            _ => ErrorKind::Parse,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::content_type(Error::UnexpectedContentType("1.2.3".into()), ErrorKind::UnsupportedContentType)]
    #[case::no_signer(Error::NoValidSigner, ErrorKind::SignatureInvalid)]
    #[case::unsupported(Error::UnsupportedSignerAlgorithms, ErrorKind::UnsupportedAlgorithm)]
    #[case::detached(Error::DetachedContent, ErrorKind::Parse)]
    #[case::asn1(Error::Asn1(kensa_asn1::error::Error::IntegerNoData), ErrorKind::Parse)]
    fn test_error_kind(#[case] error: Error, #[case] expected: ErrorKind) {
        assert_eq!(expected, error.kind());
    }
}
