//! Cryptographic Message Syntax ([RFC 5652](https://datatracker.ietf.org/doc/html/rfc5652)).
//!
//! [`ContentInfo`] is shared with PKCS#12, whose authenticated safe is a
//! sequence of them. [`verify`] unwraps a `signedData` ContentInfo, checks
//! every signer and hands out the encapsulated content only when one of
//! them verifies.
//!
//! # Example
//!
//! ```no_run
//! let bytes = std::fs::read("profile.mobileconfig").unwrap();
//! let payload = kensa_cms::verify(&bytes).unwrap();
//! for outcome in &payload.signers {
//!     println!("{:?}: {}", outcome.signer, outcome.is_verified());
//! }
//! ```

#![forbid(unsafe_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kensa::decoder::Decoder;
use kensa_asn1::ObjectIdentifier;
use kensa_x509::CertificateRecord;
use serde::{Serialize, Serializer};

pub mod content_info;
pub mod error;
pub mod signed_data;
pub mod signer_info;
pub mod verify;

pub use content_info::ContentInfo;
pub use error::{Error, Result};
pub use signed_data::SignedData;
pub use verify::{FailureReason, SignerOutcome, SignerStatus};

use content_info::OID_SIGNED_DATA;

/// Verified content of a SignedData message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedPayload {
    pub certificates: Vec<CertificateRecord>,
    pub content_type: ObjectIdentifier,
    #[serde(serialize_with = "serialize_base64")]
    pub content: Vec<u8>,
    pub signers: Vec<SignerOutcome>,
}

/// Decode a `signedData` ContentInfo and verify its signers.
///
/// The payload is returned when at least one signer verifies. When none
/// does, the error is [`Error::UnsupportedSignerAlgorithms`] if every signer
/// failed on an algorithm kensa does not implement, and
/// [`Error::NoValidSigner`] otherwise.
pub fn verify(bytes: &[u8]) -> Result<SignedPayload> {
    let content_info = ContentInfo::from_ber(bytes)?;
    if !content_info.is(OID_SIGNED_DATA) {
        return Err(Error::UnexpectedContentType(
            content_info.content_type.to_string(),
        ));
    }
    let signed_data: SignedData = content_info.content()?.decode()?;

    let signers = signed_data.evaluate_signers();
    for outcome in &signers {
        tracing::debug!(signer = ?outcome.signer, status = ?outcome.status, "evaluated signer");
    }

    let verified = signers.iter().fold(false, |acc, outcome| acc | outcome.is_verified());
    if !verified {
        let unsupported_only = !signers.is_empty()
            && signers.iter().all(|outcome| {
                matches!(&outcome.status, SignerStatus::Failed(reason) if reason.is_unsupported())
            });
        return Err(if unsupported_only {
            Error::UnsupportedSignerAlgorithms
        } else {
            Error::NoValidSigner
        });
    }

    let certificates = signed_data
        .certificates
        .iter()
        .map(|cert| cert.to_record())
        .collect::<kensa_x509::Result<Vec<_>>>()?;
    let content = signed_data.encap_content_info;
    tracing::debug!(
        content_type = %content.content_type,
        bytes = content.content.len(),
        "verified SignedData"
    );
    Ok(SignedPayload {
        certificates,
        content_type: content.content_type,
        content: content.content,
        signers,
    })
}

fn serialize_base64<S>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&STANDARD.encode(bytes))
}
