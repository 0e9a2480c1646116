//! X.509 v3 extensions ([RFC 5280 Section 4.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2))
//!
//! ```asn1
//! Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension
//! ```
//!
//! Six extensions are interpreted: keyUsage, subjectAltName,
//! extKeyUsage, basicConstraints, subjectKeyIdentifier and
//! authorityKeyIdentifier. Everything else is kept as raw extnValue octets.

use std::collections::BTreeMap;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier, OctetString};
use kensa_pkix_types::Extension as RawExtension;
use serde::Serialize;

use crate::error::{Error, Result};

mod authority_key_identifier;
mod basic_constraints;
pub mod error;
mod extended_key_usage;
mod general_name;
mod key_usage;
mod subject_alt_name;
mod subject_key_identifier;

pub use authority_key_identifier::AuthorityKeyIdentifier;
pub use basic_constraints::BasicConstraints;
pub use extended_key_usage::ExtendedKeyUsage;
pub use general_name::GeneralName;
pub use key_usage::KeyUsage;
pub use subject_alt_name::SubjectAltName;
pub use subject_key_identifier::SubjectKeyIdentifier;

/// Typed X.509 extension, parsed from the content of extnValue.
pub trait Extension: Sized {
    const OID: &'static str;
    /// Conventional name, used as the key in certificate records
    const NAME: &'static str;

    fn parse(value: &OctetString) -> error::Result<Self>;
}

/// The extensions of one certificate, in encoding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    extensions: Vec<RawExtension>,
}

impl Extensions {
    pub fn extensions(&self) -> &[RawExtension] {
        &self.extensions
    }

    pub fn get(&self, oid: &str) -> Option<&RawExtension> {
        self.extensions.iter().find(|ext| *ext.oid() == oid)
    }

    /// Parse the extension of type `T`, if the certificate carries one.
    pub fn extension<T: Extension>(&self) -> Result<Option<T>> {
        self.get(T::OID).map(parse::<T>).transpose()
    }

    /// Name (or dotted OID) to interpreted value.
    pub fn to_map(&self) -> Result<BTreeMap<String, ExtensionEntry>> {
        self.extensions
            .iter()
            .map(|ext| {
                let (name, value) = interpret(ext)?;
                let key = name.map_or_else(|| ext.oid().to_string(), str::to_string);
                Ok((
                    key,
                    ExtensionEntry {
                        oid: ext.oid().clone(),
                        critical: ext.is_critical(),
                        value,
                    },
                ))
            })
            .collect()
    }
}

fn parse<T: Extension>(ext: &RawExtension) -> Result<T> {
    if *ext.oid() != T::OID {
        return Err(Error::OidMismatch {
            expected: T::OID,
            actual: ext.oid().to_string(),
        });
    }
    T::parse(ext.value()).map_err(|e| Error::Extension(T::NAME, e))
}

fn interpret(ext: &RawExtension) -> Result<(Option<&'static str>, ExtensionValue)> {
    let oid = ext.oid();
    let parsed = if *oid == KeyUsage::OID {
        (KeyUsage::NAME, ExtensionValue::KeyUsage(parse(ext)?))
    } else if *oid == SubjectAltName::OID {
        (SubjectAltName::NAME, ExtensionValue::SubjectAltName(parse(ext)?))
    } else if *oid == ExtendedKeyUsage::OID {
        (ExtendedKeyUsage::NAME, ExtensionValue::ExtendedKeyUsage(parse(ext)?))
    } else if *oid == BasicConstraints::OID {
        (BasicConstraints::NAME, ExtensionValue::BasicConstraints(parse(ext)?))
    } else if *oid == SubjectKeyIdentifier::OID {
        (SubjectKeyIdentifier::NAME, ExtensionValue::SubjectKeyIdentifier(parse(ext)?))
    } else if *oid == AuthorityKeyIdentifier::OID {
        (AuthorityKeyIdentifier::NAME, ExtensionValue::AuthorityKeyIdentifier(parse(ext)?))
    } else {
        return Ok((other_name(oid), ExtensionValue::Raw(ext.value().clone())));
    };
    Ok((Some(parsed.0), parsed.1))
}

// Names for extensions we recognize but keep raw.
fn other_name(oid: &ObjectIdentifier) -> Option<&'static str> {
    [
        ("2.5.29.18", "issuerAltName"),
        ("2.5.29.30", "nameConstraints"),
        ("2.5.29.31", "cRLDistributionPoints"),
        ("2.5.29.32", "certificatePolicies"),
        ("2.5.29.33", "policyMappings"),
        ("2.5.29.36", "policyConstraints"),
        ("2.5.29.46", "freshestCRL"),
        ("2.5.29.54", "inhibitAnyPolicy"),
        ("1.3.6.1.5.5.7.1.1", "authorityInfoAccess"),
        ("1.3.6.1.5.5.7.1.11", "subjectInfoAccess"),
    ]
    .into_iter()
    .find(|(s, _)| *oid == *s)
    .map(|(_, name)| name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionEntry {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    pub value: ExtensionValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtensionValue {
    KeyUsage(KeyUsage),
    SubjectAltName(SubjectAltName),
    ExtendedKeyUsage(ExtendedKeyUsage),
    BasicConstraints(BasicConstraints),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    /// extnValue octets of an extension we do not interpret
    Raw(OctetString),
}

impl DecodableFrom<Element> for Extensions {}

impl Decoder<Element, Extensions> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extensions> {
        match self {
            Element::Sequence(elements) if !elements.is_empty() => {
                let extensions = elements
                    .iter()
                    .map(|elem| -> Result<RawExtension> { Ok(elem.decode()?) })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Extensions { extensions })
            }
            _ => Err(Error::ExtensionsExpectedSequence),
        }
    }
}
