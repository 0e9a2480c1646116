//! Signature verification of SignedData signer infos (RFC 5652 Section 5.6).
//!
//! Every signer is evaluated, and the message verifies when at least one of
//! them does. Certificate chains and validity periods are not checked: the
//! signer certificate is taken from the embedded set as is.

use chrono::{DateTime, Utc};
use kensa_asn1::ObjectIdentifier;
use kensa_pkcs9::attribute::{ContentType, MessageDigest, SigningTime};
use kensa_pkix_types::{AlgorithmIdentifier, DigestAlgorithm, NamedCurve, SubjectPublicKeyInfo};
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::Pkcs1v15Sign;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use signature::hazmat::PrehashVerifier;

use crate::signed_data::SignedData;
use crate::signer_info::{SignerIdentifier, SignerInfo};

/// Why a signer did not verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    UnsupportedDigestAlgorithm(String),
    UnsupportedSignatureAlgorithm(String),
    CertificateNotFound,
    MissingMessageDigest,
    MessageDigestMismatch,
    ContentTypeMismatch(String),
    MalformedSignedAttributes(String),
    InvalidPublicKey,
    BadSignature,
}

impl FailureReason {
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            FailureReason::UnsupportedDigestAlgorithm(_)
                | FailureReason::UnsupportedSignatureAlgorithm(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignerStatus {
    Verified,
    Failed(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignerOutcome {
    pub signer: SignerIdentifier,
    pub digest_algorithm: AlgorithmIdentifier,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signed_attributes: bool,
    pub signing_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub status: SignerStatus,
}

impl SignerOutcome {
    pub fn is_verified(&self) -> bool {
        self.status == SignerStatus::Verified
    }
}

impl SignedData {
    /// Evaluate every signer independently, in encounter order.
    pub fn evaluate_signers(&self) -> Vec<SignerOutcome> {
        self.signer_infos
            .iter()
            .map(|signer| evaluate(self, signer))
            .collect()
    }
}

fn evaluate(signed_data: &SignedData, signer: &SignerInfo) -> SignerOutcome {
    let signing_time = signer
        .signed_attrs
        .as_ref()
        .and_then(|attrs| attrs.attributes.attribute::<SigningTime>().ok().flatten())
        .map(|time| time.time());
    let status = match verify_signer(signed_data, signer) {
        Ok(()) => SignerStatus::Verified,
        Err(reason) => SignerStatus::Failed(reason),
    };
    SignerOutcome {
        signer: signer.sid.clone(),
        digest_algorithm: signer.digest_algorithm.clone(),
        signature_algorithm: signer.signature_algorithm.clone(),
        signed_attributes: signer.signed_attrs.is_some(),
        signing_time,
        status,
    }
}

fn verify_signer(
    signed_data: &SignedData,
    signer: &SignerInfo,
) -> std::result::Result<(), FailureReason> {
    let digest_algorithm = DigestAlgorithm::from_oid(signer.digest_algorithm.algorithm())
        .ok_or_else(|| {
            FailureReason::UnsupportedDigestAlgorithm(signer.digest_algorithm.algorithm().to_string())
        })?;
    let scheme = SignatureScheme::from_algorithm(&signer.signature_algorithm)?;
    let certificate = signed_data
        .signer_certificate(signer)
        .ok_or(FailureReason::CertificateNotFound)?;

    let content = &signed_data.encap_content_info;
    let content_digest = digest(digest_algorithm, &content.content);
    let prehash = match &signer.signed_attrs {
        Some(signed_attrs) => {
            let malformed = |e: kensa_pkcs9::Error| FailureReason::MalformedSignedAttributes(e.to_string());
            let message_digest = signed_attrs
                .attributes
                .attribute::<MessageDigest>()
                .map_err(malformed)?
                .ok_or(FailureReason::MissingMessageDigest)?;
            if message_digest.digest() != content_digest.as_slice() {
                return Err(FailureReason::MessageDigestMismatch);
            }
            let content_type = signed_attrs
                .attributes
                .attribute::<ContentType>()
                .map_err(malformed)?;
            if let Some(content_type) = content_type {
                check_content_type(content_type.oid(), &content.content_type)?;
            }
            digest(digest_algorithm, &signed_attrs.der)
        }
        None => content_digest,
    };

    scheme.verify(
        certificate.subject_public_key_info(),
        digest_algorithm,
        &prehash,
        &signer.signature,
    )
}

fn check_content_type(
    attribute: &ObjectIdentifier,
    content_type: &ObjectIdentifier,
) -> std::result::Result<(), FailureReason> {
    if attribute != content_type {
        return Err(FailureReason::ContentTypeMismatch(attribute.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignatureScheme {
    RsaPkcs1v15,
    Ecdsa,
}

impl SignatureScheme {
    fn from_algorithm(algorithm: &AlgorithmIdentifier) -> std::result::Result<Self, FailureReason> {
        let oid = algorithm.algorithm();
        let rsa = [
            AlgorithmIdentifier::OID_RSA_ENCRYPTION,
            AlgorithmIdentifier::OID_SHA1_WITH_RSA_ENCRYPTION,
            AlgorithmIdentifier::OID_SHA224_WITH_RSA_ENCRYPTION,
            AlgorithmIdentifier::OID_SHA256_WITH_RSA_ENCRYPTION,
            AlgorithmIdentifier::OID_SHA384_WITH_RSA_ENCRYPTION,
            AlgorithmIdentifier::OID_SHA512_WITH_RSA_ENCRYPTION,
        ];
        let ecdsa = [
            AlgorithmIdentifier::OID_EC_PUBLIC_KEY,
            AlgorithmIdentifier::OID_ECDSA_WITH_SHA1,
            AlgorithmIdentifier::OID_ECDSA_WITH_SHA224,
            AlgorithmIdentifier::OID_ECDSA_WITH_SHA256,
            AlgorithmIdentifier::OID_ECDSA_WITH_SHA384,
            AlgorithmIdentifier::OID_ECDSA_WITH_SHA512,
        ];
        if rsa.iter().any(|s| oid == s) {
            Ok(SignatureScheme::RsaPkcs1v15)
        } else if ecdsa.iter().any(|s| oid == s) {
            Ok(SignatureScheme::Ecdsa)
        } else {
            Err(FailureReason::UnsupportedSignatureAlgorithm(oid.to_string()))
        }
    }

    fn verify(
        &self,
        spki: &SubjectPublicKeyInfo,
        digest_algorithm: DigestAlgorithm,
        prehash: &[u8],
        signature: &[u8],
    ) -> std::result::Result<(), FailureReason> {
        let key = spki.subject_public_key().as_bytes();
        match self {
            SignatureScheme::RsaPkcs1v15 => {
                if *spki.algorithm().algorithm() != AlgorithmIdentifier::OID_RSA_ENCRYPTION {
                    return Err(FailureReason::InvalidPublicKey);
                }
                let key = RsaPublicKey::from_pkcs1_der(key)
                    .map_err(|_| FailureReason::InvalidPublicKey)?;
                key.verify(pkcs1v15_scheme(digest_algorithm), prehash, signature)
                    .map_err(|_| FailureReason::BadSignature)
            }
            SignatureScheme::Ecdsa => match spki.curve() {
                Some(NamedCurve::P256) => {
                    let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(key)
                        .map_err(|_| FailureReason::InvalidPublicKey)?;
                    let signature = p256::ecdsa::Signature::from_der(signature)
                        .map_err(|_| FailureReason::BadSignature)?;
                    key.verify_prehash(prehash, &signature)
                        .map_err(|_| FailureReason::BadSignature)
                }
                Some(NamedCurve::P384) => {
                    let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(key)
                        .map_err(|_| FailureReason::InvalidPublicKey)?;
                    let signature = p384::ecdsa::Signature::from_der(signature)
                        .map_err(|_| FailureReason::BadSignature)?;
                    key.verify_prehash(prehash, &signature)
                        .map_err(|_| FailureReason::BadSignature)
                }
                Some(curve) => Err(FailureReason::UnsupportedSignatureAlgorithm(
                    curve.name().to_string(),
                )),
                None => Err(FailureReason::InvalidPublicKey),
            },
        }
    }
}

fn pkcs1v15_scheme(digest_algorithm: DigestAlgorithm) -> Pkcs1v15Sign {
    match digest_algorithm {
        DigestAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        DigestAlgorithm::Sha224 => Pkcs1v15Sign::new::<Sha224>(),
        DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        DigestAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        DigestAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

pub(crate) fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        DigestAlgorithm::Sha224 => Sha224::digest(data).to_vec(),
        DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}
