//! Subject Public Key Info
//!
//! RFC 5280 Section 4.1.2.7
//!
//! ```asn1
//! SubjectPublicKeyInfo  ::=  SEQUENCE  {
//!     algorithm            AlgorithmIdentifier,
//!     subjectPublicKey     BIT STRING
//! }
//!
//! RSAPublicKey ::= SEQUENCE {
//!     modulus           INTEGER,  -- n
//!     publicExponent    INTEGER   -- e
//! }
//! ```

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, BitString, Element};
use serde::{Serialize, ser::SerializeStruct};

use crate::algorithm::{AlgorithmIdentifier, NamedCurve};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, subject_public_key: BitString) -> Self {
        Self {
            algorithm,
            subject_public_key,
        }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    /// The named curve for EC keys.
    pub fn curve(&self) -> Option<NamedCurve> {
        if self.algorithm.algorithm != AlgorithmIdentifier::OID_EC_PUBLIC_KEY {
            return None;
        }
        match self.algorithm.parameter_element() {
            Some(Element::ObjectIdentifier(oid)) => NamedCurve::from_oid(oid),
            _ => None,
        }
    }

    /// Key size in bits: the modulus length for RSA, the field size for named curves.
    pub fn key_size_bits(&self) -> Option<u64> {
        if self.algorithm.algorithm == AlgorithmIdentifier::OID_RSA_ENCRYPTION {
            let modulus = ASN1Object::try_from(self.subject_public_key.as_bytes())
                .ok()?
                .into_single()
                .ok()?;
            return match modulus {
                Element::Sequence(fields) => match fields.first() {
                    Some(Element::Integer(n)) => Some(n.as_bigint().bits()),
                    _ => None,
                },
                _ => None,
            };
        }
        if self.algorithm.algorithm == AlgorithmIdentifier::OID_ED25519 {
            return Some(256);
        }
        self.curve().map(|curve| u64::from(curve.key_size_bits()))
    }
}

impl Serialize for SubjectPublicKeyInfo {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SubjectPublicKeyInfo", 3)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        if let Some(bits) = self.key_size_bits() {
            state.serialize_field("key_size", &bits)?;
        }
        state.serialize_field("public_key", &self.subject_public_key)?;
        state.end()
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::SubjectPublicKeyInfoExpectedSequence);
        };
        match elements.as_slice() {
            [algorithm, Element::BitString(subject_public_key)] => Ok(SubjectPublicKeyInfo {
                algorithm: algorithm.decode()?,
                subject_public_key: subject_public_key.clone(),
            }),
            [_, _] => Err(Error::SubjectPublicKeyInfoExpectedBitString),
            _ => Err(Error::SubjectPublicKeyInfoInvalidElementCount(elements.len())),
        }
    }
}
