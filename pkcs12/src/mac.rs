//! Password integrity mode ([RFC 7292 Section 4](https://datatracker.ietf.org/doc/html/rfc7292#section-4)).
//!
//! ```asn1
//! MacData ::= SEQUENCE {
//!     mac        DigestInfo,
//!     macSalt    OCTET STRING,
//!     iterations INTEGER DEFAULT 1
//! }
//!
//! DigestInfo ::= SEQUENCE {
//!     digestAlgorithm DigestAlgorithmIdentifier,
//!     digest          Digest }
//! ```

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, Integer, OctetString};
use kensa_pkix_types::{AlgorithmIdentifier, DigestAlgorithm};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

use crate::error::{Error, Result};
use crate::kdf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacData {
    pub digest_algorithm: AlgorithmIdentifier,
    pub digest: OctetString,
    pub salt: OctetString,
    pub iterations: u32,
}

impl MacData {
    /// Checks the HMAC over `content` with a key derived from `password`
    /// (a BMPString encoding). The comparison is constant time.
    pub fn verify(&self, content: &[u8], password: &[u8]) -> Result<bool> {
        let digest = DigestAlgorithm::from_oid(self.digest_algorithm.algorithm()).ok_or_else(
            || Error::UnsupportedMacAlgorithm(self.digest_algorithm.algorithm().to_string()),
        )?;
        let key = kdf::derive(
            digest,
            kdf::ID_MAC,
            password,
            self.salt.as_bytes(),
            self.iterations,
            digest.output_len(),
        );
        let expected = self.digest.as_bytes();
        Ok(match digest {
            DigestAlgorithm::Sha1 => verify_hmac::<Hmac<Sha1>>(&key, content, expected),
            DigestAlgorithm::Sha224 => verify_hmac::<Hmac<Sha224>>(&key, content, expected),
            DigestAlgorithm::Sha256 => verify_hmac::<Hmac<Sha256>>(&key, content, expected),
            DigestAlgorithm::Sha384 => verify_hmac::<Hmac<Sha384>>(&key, content, expected),
            DigestAlgorithm::Sha512 => verify_hmac::<Hmac<Sha512>>(&key, content, expected),
        })
    }

    /// The first candidate password whose MAC verifies.
    pub(crate) fn select<'a>(&self, content: &[u8], candidates: &'a [Vec<u8>]) -> Result<&'a [u8]> {
        for (index, candidate) in candidates.iter().enumerate() {
            if self.verify(content, candidate)? {
                tracing::debug!(candidate = index, "MAC verified");
                return Ok(candidate);
            }
        }
        Err(Error::MacMismatch)
    }
}

fn verify_hmac<M: Mac + KeyInit>(key: &[u8], data: &[u8], expected: &[u8]) -> bool {
    let Ok(mut mac) = <M as KeyInit>::new_from_slice(key) else {
        return false;
    };
    mac.update(data);
    mac.verify_slice(expected).is_ok()
}

impl DecodableFrom<Element> for MacData {}

impl Decoder<Element, MacData> for Element {
    type Error = Error;

    fn decode(&self) -> Result<MacData> {
        let Element::Sequence(elements) = self else {
            return Err(Error::MacDataExpectedSequence);
        };
        let (digest_info, salt, iterations) = match elements.as_slice() {
            [digest_info, Element::OctetString(salt)] => (digest_info, salt, None),
            [digest_info, Element::OctetString(salt), Element::Integer(n)] => {
                (digest_info, salt, Some(n))
            }
            _ => return Err(Error::MacDataExpectedSequence),
        };
        let Element::Sequence(digest_info) = digest_info else {
            return Err(Error::DigestInfoExpectedSequence);
        };
        let [algorithm, Element::OctetString(digest)] = digest_info.as_slice() else {
            return Err(Error::DigestInfoExpectedSequence);
        };
        let digest_algorithm: AlgorithmIdentifier = algorithm.decode()?;
        Ok(MacData {
            digest_algorithm,
            digest: digest.clone(),
            salt: salt.clone(),
            iterations: iterations.map(iteration_count).transpose()?.unwrap_or(1),
        })
    }
}

/// Upper bound on KDF and PBKDF2 rounds accepted from a container.
pub const MAX_ITERATIONS: u32 = 10_000_000;

pub(crate) fn iteration_count(value: &Integer) -> Result<u32> {
    value
        .to_u32()
        .filter(|n| (1..=MAX_ITERATIONS).contains(n))
        .ok_or(Error::IterationCountOutOfRange)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use kensa_asn1::ObjectIdentifier;
    use rstest::rstest;

    use super::*;

    fn mac_data(algorithm: &str, digest: Vec<u8>) -> MacData {
        MacData {
            digest_algorithm: AlgorithmIdentifier::new(ObjectIdentifier::from_str(algorithm).unwrap()),
            digest: OctetString::from(digest),
            salt: OctetString::from(vec![1, 2, 3, 4, 5, 6, 7, 8]),
            iterations: 1,
        }
    }

    fn expected_mac(password: &[u8], content: &[u8]) -> Vec<u8> {
        let key = kdf::derive(DigestAlgorithm::Sha256, kdf::ID_MAC, password, &[1, 2, 3, 4, 5, 6, 7, 8], 1, 32);
        let mut mac = <Hmac<Sha256> as KeyInit>::new_from_slice(&key).unwrap();
        mac.update(content);
        mac.finalize().into_bytes().to_vec()
    }

    #[test]
    fn test_mac_select_prefers_terminated_empty_password() {
        let data = mac_data(AlgorithmIdentifier::OID_SHA256, expected_mac(&[0, 0], b"content"));
        let candidates = vec![vec![0, 0], vec![]];
        assert_eq!(&[0u8, 0][..], data.select(b"content", &candidates).unwrap());
    }

    #[test]
    fn test_mac_select_falls_back_to_bare_empty_password() {
        let data = mac_data(AlgorithmIdentifier::OID_SHA256, expected_mac(&[], b"content"));
        let candidates = vec![vec![0, 0], vec![]];
        assert!(data.select(b"content", &candidates).unwrap().is_empty());
    }

    #[test]
    fn test_mac_mismatch() {
        let data = mac_data(AlgorithmIdentifier::OID_SHA256, expected_mac(&[0, 0], b"content"));
        let err = data.select(b"tampered", &[vec![0, 0], vec![]]).unwrap_err();
        assert!(format!("{:?}", err).contains("MacMismatch"));
    }

    #[test]
    fn test_mac_unsupported_digest() {
        // md5
        let data = mac_data("1.2.840.113549.2.5", vec![0; 16]);
        let err = data.verify(b"content", &[0, 0]).unwrap_err();
        assert!(format!("{:?}", err).contains("UnsupportedMacAlgorithm"));
    }

    fn digest_info() -> Element {
        Element::Sequence(vec![
            Element::Sequence(vec![Element::ObjectIdentifier(
                ObjectIdentifier::from_str(AlgorithmIdentifier::OID_SHA1).unwrap(),
            )]),
            Element::OctetString(OctetString::from(vec![0; 20])),
        ])
    }

    #[rstest]
    #[case::default_iterations(None, 1)]
    #[case::explicit_iterations(Some(2048), 2048)]
    #[case::upper_bound(Some(MAX_ITERATIONS as i64), MAX_ITERATIONS)]
    fn test_mac_data_decode(#[case] iterations: Option<i64>, #[case] expected: u32) {
        let mut elements = vec![digest_info(), Element::OctetString(OctetString::from(vec![9; 8]))];
        if let Some(n) = iterations {
            elements.push(Element::Integer(Integer::from(n)));
        }
        let mac: MacData = Element::Sequence(elements).decode().unwrap();
        assert_eq!(expected, mac.iterations);
        assert_eq!(20, mac.digest.as_bytes().len());
    }

    #[rstest]
    #[case::not_sequence(Element::Null, "MacDataExpectedSequence")]
    #[case::missing_salt(Element::Sequence(vec![digest_info()]), "MacDataExpectedSequence")]
    #[case::bad_digest_info(
        Element::Sequence(vec![Element::Null, Element::OctetString(OctetString::from(vec![1]))]),
        "DigestInfoExpectedSequence"
    )]
    #[case::zero_iterations(
        Element::Sequence(vec![
            digest_info(),
            Element::OctetString(OctetString::from(vec![1])),
            Element::Integer(Integer::from(0i64)),
        ]),
        "IterationCountOutOfRange"
    )]
    #[case::excessive_iterations(
        Element::Sequence(vec![
            digest_info(),
            Element::OctetString(OctetString::from(vec![1])),
            Element::Integer(Integer::from(0x7fff_ffff_i64)),
        ]),
        "IterationCountOutOfRange"
    )]
    fn test_mac_data_decode_error(#[case] input: Element, #[case] variant: &str) {
        let result: Result<MacData> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains(variant));
    }
}
