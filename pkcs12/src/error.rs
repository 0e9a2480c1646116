use kensa::error::{Categorize, ErrorKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("PFX: expected SEQUENCE")]
    PfxExpectedSequence,
    #[error("PFX: expected 2 or 3 elements, got {0}")]
    PfxInvalidElementCount(usize),
    #[error("PFX: unsupported version {0}")]
    PfxUnsupportedVersion(String),

    #[error("MacData: expected SEQUENCE {{ DigestInfo, OCTET STRING, INTEGER }}")]
    MacDataExpectedSequence,
    #[error("DigestInfo: expected SEQUENCE {{ AlgorithmIdentifier, OCTET STRING }}")]
    DigestInfoExpectedSequence,
    #[error("iteration count out of range")]
    IterationCountOutOfRange,

    #[error("AuthenticatedSafe: expected SEQUENCE OF ContentInfo")]
    AuthenticatedSafeExpectedSequence,
    #[error("SafeContents: expected SEQUENCE OF SafeBag")]
    SafeContentsExpectedSequence,
    #[error("SafeBag: expected SEQUENCE {{ OID, [0] value, attributes }}")]
    SafeBagExpectedSequence,
    #[error("CertBag: expected SEQUENCE {{ OID, [0] value }}")]
    CertBagExpectedSequence,
    #[error("CertBag: expected OCTET STRING for x509Certificate")]
    CertBagExpectedOctetString,

    #[error("EncryptedData: expected SEQUENCE")]
    EncryptedDataExpectedSequence,
    #[error("EncryptedContentInfo: expected SEQUENCE")]
    EncryptedContentInfoExpectedSequence,
    #[error("EncryptedContentInfo: encryptedContent is absent")]
    EncryptedContentMissing,

    #[error("{0}: invalid parameters")]
    InvalidAlgorithmParameters(&'static str),
    #[error("{0}: invalid key or IV length")]
    InvalidKeyOrIvLength(&'static str),

    #[error("MAC verification failed")]
    MacMismatch,
    #[error("decryption failed: bad padding")]
    DecryptionFailed,

    #[error("unsupported MAC digest algorithm: {0}")]
    UnsupportedMacAlgorithm(String),
    #[error("unsupported encryption algorithm: {0}")]
    UnsupportedEncryptionAlgorithm(String),
    #[error("unsupported PBKDF2 parameters: {0}")]
    UnsupportedKeyDerivation(String),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] kensa_asn1::error::Error),
    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] kensa_pkix_types::Error),
    #[error("PKCS#9 attribute error: {0}")]
    Pkcs9(#[from] kensa_pkcs9::Error),
    #[error("certificate error: {0}")]
    X509(#[from] kensa_x509::Error),
    #[error("ContentInfo error: {0}")]
    Cms(#[from] kensa_cms::Error),
}

impl Categorize for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::MacMismatch | Error::DecryptionFailed => ErrorKind::Integrity,
            Error::UnsupportedMacAlgorithm(_)
            | Error::UnsupportedEncryptionAlgorithm(_)
            | Error::UnsupportedKeyDerivation(_) => ErrorKind::UnsupportedAlgorithm,
            Error::UnsupportedContentType(_) => ErrorKind::UnsupportedContentType,
            Error::Cms(e) => e.kind(),
            _ => ErrorKind::Parse,
        }
    }
}
