//! AlgorithmIdentifier type
//!
//! Defined in [RFC 5280 Section 4.1.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.1.1.2)
//!
//! ```asn1
//! AlgorithmIdentifier ::= SEQUENCE {
//!     algorithm   OBJECT IDENTIFIER,
//!     parameters  ANY DEFINED BY algorithm OPTIONAL
//! }
//! ```

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier};
use serde::{Serialize, ser::SerializeStruct};

use crate::OidName;
use crate::error::{Error, Result};

/// Parameters field in AlgorithmIdentifier
///
/// - None: field absent (e.g. ecdsa-with-SHA256)
/// - Some(Null): explicit NULL, usual for RSA
/// - Some(Elm): anything else, interpreted by whoever knows the algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    Elm(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    // Public key and signature algorithms (RFC 3279, RFC 4055, RFC 5758, RFC 8410)
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    pub const OID_SHA1_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.5";
    pub const OID_RSASSA_PSS: &'static str = "1.2.840.113549.1.1.10";
    pub const OID_SHA256_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.11";
    pub const OID_SHA384_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.12";
    pub const OID_SHA512_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.13";
    pub const OID_SHA224_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.14";
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    pub const OID_ECDSA_WITH_SHA1: &'static str = "1.2.840.10045.4.1";
    pub const OID_ECDSA_WITH_SHA224: &'static str = "1.2.840.10045.4.3.1";
    pub const OID_ECDSA_WITH_SHA256: &'static str = "1.2.840.10045.4.3.2";
    pub const OID_ECDSA_WITH_SHA384: &'static str = "1.2.840.10045.4.3.3";
    pub const OID_ECDSA_WITH_SHA512: &'static str = "1.2.840.10045.4.3.4";
    pub const OID_ID_DSA: &'static str = "1.2.840.10040.4.1";
    pub const OID_ED25519: &'static str = "1.3.101.112";

    // Digests (RFC 5754)
    pub const OID_SHA1: &'static str = "1.3.14.3.2.26";
    pub const OID_SHA224: &'static str = "2.16.840.1.101.3.4.2.4";
    pub const OID_SHA256: &'static str = "2.16.840.1.101.3.4.2.1";
    pub const OID_SHA384: &'static str = "2.16.840.1.101.3.4.2.2";
    pub const OID_SHA512: &'static str = "2.16.840.1.101.3.4.2.3";

    // PKCS#5 (RFC 8018)
    pub const OID_PBKDF2: &'static str = "1.2.840.113549.1.5.12";
    pub const OID_PBES2: &'static str = "1.2.840.113549.1.5.13";
    pub const OID_HMAC_WITH_SHA1: &'static str = "1.2.840.113549.2.7";
    pub const OID_HMAC_WITH_SHA224: &'static str = "1.2.840.113549.2.8";
    pub const OID_HMAC_WITH_SHA256: &'static str = "1.2.840.113549.2.9";
    pub const OID_HMAC_WITH_SHA384: &'static str = "1.2.840.113549.2.10";
    pub const OID_HMAC_WITH_SHA512: &'static str = "1.2.840.113549.2.11";
    pub const OID_DES_EDE3_CBC: &'static str = "1.2.840.113549.3.7";
    pub const OID_AES128_CBC: &'static str = "2.16.840.1.101.3.4.1.2";
    pub const OID_AES192_CBC: &'static str = "2.16.840.1.101.3.4.1.22";
    pub const OID_AES256_CBC: &'static str = "2.16.840.1.101.3.4.1.42";

    // PKCS#12 PBE (RFC 7292 Appendix C)
    pub const OID_PKCS12_PBE_SHA1_RC4_128: &'static str = "1.2.840.113549.1.12.1.1";
    pub const OID_PKCS12_PBE_SHA1_RC4_40: &'static str = "1.2.840.113549.1.12.1.2";
    pub const OID_PKCS12_PBE_SHA1_3DES: &'static str = "1.2.840.113549.1.12.1.3";
    pub const OID_PKCS12_PBE_SHA1_2DES: &'static str = "1.2.840.113549.1.12.1.4";
    pub const OID_PKCS12_PBE_SHA1_RC2_128: &'static str = "1.2.840.113549.1.12.1.5";
    pub const OID_PKCS12_PBE_SHA1_RC2_40: &'static str = "1.2.840.113549.1.12.1.6";

    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }

    /// The parameters element unless it is absent or NULL.
    pub fn parameter_element(&self) -> Option<&Element> {
        match &self.parameters {
            Some(AlgorithmParameters::Elm(elm)) => Some(elm),
            _ => None,
        }
    }
}

const ALGORITHM_NAMES: &[(&str, &str)] = &[
    (AlgorithmIdentifier::OID_RSA_ENCRYPTION, "rsaEncryption"),
    (AlgorithmIdentifier::OID_SHA1_WITH_RSA_ENCRYPTION, "sha1WithRSAEncryption"),
    (AlgorithmIdentifier::OID_RSASSA_PSS, "rsassaPss"),
    (AlgorithmIdentifier::OID_SHA224_WITH_RSA_ENCRYPTION, "sha224WithRSAEncryption"),
    (AlgorithmIdentifier::OID_SHA256_WITH_RSA_ENCRYPTION, "sha256WithRSAEncryption"),
    (AlgorithmIdentifier::OID_SHA384_WITH_RSA_ENCRYPTION, "sha384WithRSAEncryption"),
    (AlgorithmIdentifier::OID_SHA512_WITH_RSA_ENCRYPTION, "sha512WithRSAEncryption"),
    (AlgorithmIdentifier::OID_EC_PUBLIC_KEY, "ecPublicKey"),
    (AlgorithmIdentifier::OID_ECDSA_WITH_SHA1, "ecdsa-with-SHA1"),
    (AlgorithmIdentifier::OID_ECDSA_WITH_SHA224, "ecdsa-with-SHA224"),
    (AlgorithmIdentifier::OID_ECDSA_WITH_SHA256, "ecdsa-with-SHA256"),
    (AlgorithmIdentifier::OID_ECDSA_WITH_SHA384, "ecdsa-with-SHA384"),
    (AlgorithmIdentifier::OID_ECDSA_WITH_SHA512, "ecdsa-with-SHA512"),
    (AlgorithmIdentifier::OID_ID_DSA, "id-dsa"),
    (AlgorithmIdentifier::OID_ED25519, "Ed25519"),
    (AlgorithmIdentifier::OID_SHA1, "sha1"),
    (AlgorithmIdentifier::OID_SHA224, "sha224"),
    (AlgorithmIdentifier::OID_SHA256, "sha256"),
    (AlgorithmIdentifier::OID_SHA384, "sha384"),
    (AlgorithmIdentifier::OID_SHA512, "sha512"),
    (AlgorithmIdentifier::OID_PBKDF2, "PBKDF2"),
    (AlgorithmIdentifier::OID_PBES2, "PBES2"),
    (AlgorithmIdentifier::OID_HMAC_WITH_SHA1, "hmacWithSHA1"),
    (AlgorithmIdentifier::OID_HMAC_WITH_SHA224, "hmacWithSHA224"),
    (AlgorithmIdentifier::OID_HMAC_WITH_SHA256, "hmacWithSHA256"),
    (AlgorithmIdentifier::OID_HMAC_WITH_SHA384, "hmacWithSHA384"),
    (AlgorithmIdentifier::OID_HMAC_WITH_SHA512, "hmacWithSHA512"),
    (AlgorithmIdentifier::OID_DES_EDE3_CBC, "des-ede3-cbc"),
    (AlgorithmIdentifier::OID_AES128_CBC, "aes128-cbc"),
    (AlgorithmIdentifier::OID_AES192_CBC, "aes192-cbc"),
    (AlgorithmIdentifier::OID_AES256_CBC, "aes256-cbc"),
    (AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC4_128, "pbeWithSHAAnd128BitRC4"),
    (AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC4_40, "pbeWithSHAAnd40BitRC4"),
    (AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_3DES, "pbeWithSHAAnd3-KeyTripleDES-CBC"),
    (AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_2DES, "pbeWithSHAAnd2-KeyTripleDES-CBC"),
    (AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC2_128, "pbeWithSHAAnd128BitRC2-CBC"),
    (AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC2_40, "pbeWithSHAAnd40BitRC2-CBC"),
];

impl OidName for AlgorithmIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        ALGORITHM_NAMES
            .iter()
            .find(|(oid, _)| self.algorithm == *oid)
            .map(|(_, name)| *name)
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", 3)?;
        state.serialize_field("oid", &self.algorithm)?;
        if let Some(name) = self.oid_name() {
            state.serialize_field("name", name)?;
        }
        // EC keys carry their curve here; show it by name when we know it.
        if let Some(Element::ObjectIdentifier(oid)) = self.parameter_element() {
            match NamedCurve::from_oid(oid) {
                Some(curve) => state.serialize_field("parameters", curve.name())?,
                None => state.serialize_field("parameters", oid)?,
            }
        }
        state.end()
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::AlgorithmIdentifierExpectedSequence);
        };
        let (algorithm, parameters) = match elements.as_slice() {
            [Element::ObjectIdentifier(oid)] => (oid.clone(), None),
            [Element::ObjectIdentifier(oid), Element::Null] => {
                (oid.clone(), Some(AlgorithmParameters::Null))
            }
            [Element::ObjectIdentifier(oid), params] => {
                (oid.clone(), Some(AlgorithmParameters::Elm(params.clone())))
            }
            [_] | [_, _] => return Err(Error::AlgorithmIdentifierExpectedOid),
            _ => {
                return Err(Error::AlgorithmIdentifierInvalidElementCount(
                    elements.len(),
                ));
            }
        };
        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}

/// Named elliptic curves ([RFC 5480 Section 2.1.1.1](https://datatracker.ietf.org/doc/html/rfc5480#section-2.1.1.1))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    /// secp256r1 / prime256v1 / P-256
    P256,
    /// secp384r1 / P-384
    P384,
    /// secp521r1 / P-521
    P521,
    Secp256k1,
}

impl NamedCurve {
    pub const OID_SECP256R1: &'static str = "1.2.840.10045.3.1.7";
    pub const OID_SECP384R1: &'static str = "1.3.132.0.34";
    pub const OID_SECP521R1: &'static str = "1.3.132.0.35";
    pub const OID_SECP256K1: &'static str = "1.3.132.0.10";

    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        [
            (Self::OID_SECP256R1, NamedCurve::P256),
            (Self::OID_SECP384R1, NamedCurve::P384),
            (Self::OID_SECP521R1, NamedCurve::P521),
            (Self::OID_SECP256K1, NamedCurve::Secp256k1),
        ]
        .into_iter()
        .find(|(s, _)| *oid == *s)
        .map(|(_, curve)| curve)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NamedCurve::P256 => "secp256r1",
            NamedCurve::P384 => "secp384r1",
            NamedCurve::P521 => "secp521r1",
            NamedCurve::Secp256k1 => "secp256k1",
        }
    }

    pub fn key_size_bits(&self) -> u32 {
        match self {
            NamedCurve::P256 | NamedCurve::Secp256k1 => 256,
            NamedCurve::P384 => 384,
            NamedCurve::P521 => 521,
        }
    }
}

/// Digest algorithms kensa can compute ([RFC 5754](https://datatracker.ietf.org/doc/html/rfc5754)).
///
/// HMAC PRF identifiers from RFC 8018 map onto the same digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        [
            (AlgorithmIdentifier::OID_SHA1, DigestAlgorithm::Sha1),
            (AlgorithmIdentifier::OID_SHA224, DigestAlgorithm::Sha224),
            (AlgorithmIdentifier::OID_SHA256, DigestAlgorithm::Sha256),
            (AlgorithmIdentifier::OID_SHA384, DigestAlgorithm::Sha384),
            (AlgorithmIdentifier::OID_SHA512, DigestAlgorithm::Sha512),
        ]
        .into_iter()
        .find(|(s, _)| *oid == *s)
        .map(|(_, digest)| digest)
    }

    /// The digest behind an `hmacWithSHA*` PRF identifier.
    pub fn from_hmac_oid(oid: &ObjectIdentifier) -> Option<Self> {
        [
            (AlgorithmIdentifier::OID_HMAC_WITH_SHA1, DigestAlgorithm::Sha1),
            (AlgorithmIdentifier::OID_HMAC_WITH_SHA224, DigestAlgorithm::Sha224),
            (AlgorithmIdentifier::OID_HMAC_WITH_SHA256, DigestAlgorithm::Sha256),
            (AlgorithmIdentifier::OID_HMAC_WITH_SHA384, DigestAlgorithm::Sha384),
            (AlgorithmIdentifier::OID_HMAC_WITH_SHA512, DigestAlgorithm::Sha512),
        ]
        .into_iter()
        .find(|(s, _)| *oid == *s)
        .map(|(_, digest)| digest)
    }

    /// Output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[rstest]
    #[case::rsa_null(
        Element::Sequence(vec![Element::ObjectIdentifier(oid("1.2.840.113549.1.1.11")), Element::Null]),
        Some(AlgorithmParameters::Null),
        Some("sha256WithRSAEncryption")
    )]
    #[case::ecdsa_absent(
        Element::Sequence(vec![Element::ObjectIdentifier(oid("1.2.840.10045.4.3.2"))]),
        None,
        Some("ecdsa-with-SHA256")
    )]
    #[case::unknown(
        Element::Sequence(vec![Element::ObjectIdentifier(oid("1.2.3.4"))]),
        None,
        None
    )]
    fn test_algorithm_identifier_decode(
        #[case] input: Element,
        #[case] parameters: Option<AlgorithmParameters>,
        #[case] name: Option<&str>,
    ) {
        let algorithm: AlgorithmIdentifier = input.decode().unwrap();
        assert_eq!(parameters, algorithm.parameters);
        assert_eq!(name, algorithm.oid_name());
    }

    #[rstest]
    #[case::not_sequence(Element::Null, "AlgorithmIdentifierExpectedSequence")]
    #[case::empty(Element::Sequence(vec![]), "AlgorithmIdentifierInvalidElementCount")]
    #[case::not_oid(Element::Sequence(vec![Element::Null]), "AlgorithmIdentifierExpectedOid")]
    fn test_algorithm_identifier_decode_error(#[case] input: Element, #[case] variant: &str) {
        let result: Result<AlgorithmIdentifier> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains(variant));
    }

    #[test]
    fn test_algorithm_identifier_serialize_curve() {
        let algorithm = AlgorithmIdentifier {
            algorithm: oid(AlgorithmIdentifier::OID_EC_PUBLIC_KEY),
            parameters: Some(AlgorithmParameters::Elm(Element::ObjectIdentifier(oid(
                NamedCurve::OID_SECP256R1,
            )))),
        };
        assert_eq!(
            r#"{"oid":"1.2.840.10045.2.1","name":"ecPublicKey","parameters":"secp256r1"}"#,
            serde_json::to_string(&algorithm).unwrap()
        );
    }

    #[rstest]
    #[case::sha1(AlgorithmIdentifier::OID_SHA1, Some(DigestAlgorithm::Sha1))]
    #[case::sha384(AlgorithmIdentifier::OID_SHA384, Some(DigestAlgorithm::Sha384))]
    #[case::md5("1.2.840.113549.2.5", None)]
    fn test_digest_algorithm_from_oid(#[case] input: &str, #[case] expected: Option<DigestAlgorithm>) {
        assert_eq!(expected, DigestAlgorithm::from_oid(&oid(input)));
    }

    #[test]
    fn test_digest_algorithm_from_hmac_oid() {
        assert_eq!(
            Some(DigestAlgorithm::Sha256),
            DigestAlgorithm::from_hmac_oid(&oid(AlgorithmIdentifier::OID_HMAC_WITH_SHA256))
        );
        assert_eq!(r#""sha256""#, serde_json::to_string(&DigestAlgorithm::Sha256).unwrap());
    }

    #[rstest]
    #[case::p256(NamedCurve::OID_SECP256R1, Some(NamedCurve::P256))]
    #[case::p384(NamedCurve::OID_SECP384R1, Some(NamedCurve::P384))]
    #[case::unknown("1.3.132.0.1", None)]
    fn test_named_curve_from_oid(#[case] input: &str, #[case] expected: Option<NamedCurve>) {
        assert_eq!(expected, NamedCurve::from_oid(&oid(input)));
    }
}
