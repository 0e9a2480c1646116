//! ```asn1
//! EncryptedData ::= SEQUENCE {
//!     version CMSVersion,
//!     encryptedContentInfo EncryptedContentInfo,
//!     unprotectedAttrs [1] IMPLICIT UnprotectedAttributes OPTIONAL }
//!
//! EncryptedContentInfo ::= SEQUENCE {
//!     contentType ContentType,
//!     contentEncryptionAlgorithm ContentEncryptionAlgorithmIdentifier,
//!     encryptedContent [0] IMPLICIT EncryptedContent OPTIONAL }
//! ```

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier};
use kensa_pkix_types::AlgorithmIdentifier;

use crate::error::{Error, Result};
use crate::pbe::EncryptionScheme;
use crate::safe_bag::SafeContents;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    pub content_type: ObjectIdentifier,
    pub algorithm: AlgorithmIdentifier,
    pub encrypted_content: Vec<u8>,
}

impl EncryptedData {
    pub fn scheme(&self) -> Result<EncryptionScheme> {
        EncryptionScheme::try_from(&self.algorithm)
    }

    /// Decrypts and parses the safe contents.
    ///
    /// A BMPString candidate is accepted only when its plaintext unpads and
    /// parses as SafeContents; PBES2 uses `utf8` alone.
    pub fn decrypt(&self, candidates: &[Vec<u8>], utf8: &[u8]) -> Result<SafeContents> {
        let scheme = self.scheme()?;
        tracing::debug!(algorithm = %self.algorithm.algorithm(), "decrypting safe contents");
        if let EncryptionScheme::Pbes2 { .. } = scheme {
            let plaintext = scheme.decrypt(&self.encrypted_content, &[], utf8)?;
            return SafeContents::from_der(&plaintext);
        }

        let mut failure = Error::DecryptionFailed;
        for (index, candidate) in candidates.iter().enumerate() {
            let plaintext =
                match scheme.decrypt(&self.encrypted_content, std::slice::from_ref(candidate), utf8) {
                    Ok(plaintext) => plaintext,
                    Err(Error::DecryptionFailed) => continue,
                    Err(err) => return Err(err),
                };
            match SafeContents::from_der(&plaintext) {
                Ok(contents) => return Ok(contents),
                Err(err) => {
                    tracing::debug!(candidate = index, "plaintext is not SafeContents");
                    failure = err;
                }
            }
        }
        Err(failure)
    }
}

impl DecodableFrom<Element> for EncryptedData {}

impl Decoder<Element, EncryptedData> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EncryptedData> {
        let Element::Sequence(elements) = self else {
            return Err(Error::EncryptedDataExpectedSequence);
        };
        // unprotectedAttrs carry nothing certificate related.
        let encrypted_content_info = match elements.as_slice() {
            [Element::Integer(_), info] | [Element::Integer(_), info, _] => info,
            _ => return Err(Error::EncryptedDataExpectedSequence),
        };
        let Element::Sequence(info) = encrypted_content_info else {
            return Err(Error::EncryptedContentInfoExpectedSequence);
        };
        match info.as_slice() {
            [Element::ObjectIdentifier(content_type), algorithm, content]
                if content.context_slot() == Some(0) =>
            {
                let algorithm: AlgorithmIdentifier = algorithm.decode()?;
                Ok(EncryptedData {
                    content_type: content_type.clone(),
                    algorithm,
                    encrypted_content: content.implicit_octets()?,
                })
            }
            [Element::ObjectIdentifier(_), _] => Err(Error::EncryptedContentMissing),
            _ => Err(Error::EncryptedContentInfoExpectedSequence),
        }
    }
}
