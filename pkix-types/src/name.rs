//! Name and related types
//!
//! Defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! Name ::= CHOICE { -- only one possibility for now --
//!     rdnSequence  RDNSequence
//! }
//!
//! RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
//!
//! RelativeDistinguishedName ::= SET OF AttributeTypeAndValue
//!
//! AttributeTypeAndValue ::= SEQUENCE {
//!     type     AttributeType,
//!     value    AttributeValue
//! }
//! ```

use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier};
use serde::{Serialize, ser::SerializeSeq, ser::SerializeStruct};

use crate::OidName;
use crate::directory_string::DirectoryString;
use crate::error::{Error, Result};

/// X.509 Distinguished Name
///
/// Display renders the RDNs in encoding order, e.g. `C=JP, O=Kensa, CN=leaf`.
/// Serialization flattens the RDNs into a list of `{type, oid, value}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub rdn_sequence: Vec<RelativeDistinguishedName>,
}

impl Name {
    pub fn new(rdn_sequence: Vec<RelativeDistinguishedName>) -> Self {
        Self { rdn_sequence }
    }

    pub fn rdn_sequence(&self) -> &[RelativeDistinguishedName] {
        &self.rdn_sequence
    }

    /// Every attribute in encoding order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.rdn_sequence.iter().flat_map(|rdn| rdn.attributes.iter())
    }

    /// The first commonName, if any.
    pub fn common_name(&self) -> Option<&str> {
        self.attributes()
            .find(|attr| attr.attribute_type == AttributeTypeAndValue::OID_COMMON_NAME)
            .map(|attr| attr.value_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .rdn_sequence
            .iter()
            .map(|rdn| {
                rdn.attributes
                    .iter()
                    .map(|attr| match attr.oid_name() {
                        Some(name) => format!("{}={}", name, attr.attribute_value),
                        None => format!("{}={}", attr.attribute_type, attr.attribute_value),
                    })
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", formatted)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let attributes: Vec<&AttributeTypeAndValue> = self.attributes().collect();
        let mut seq = serializer.serialize_seq(Some(attributes.len()))?;
        for attr in attributes {
            seq.serialize_element(attr)?;
        }
        seq.end()
    }
}

impl DecodableFrom<Element> for Name {}

impl Decoder<Element, Name> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Name> {
        match self {
            Element::Sequence(elements) => {
                let rdn_sequence = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<RelativeDistinguishedName>>>()?;
                Ok(Name { rdn_sequence })
            }
            _ => Err(Error::NameExpectedSequence),
        }
    }
}

/// Relative Distinguished Name (RDN)
///
/// Usually a single attribute. Multi-valued RDNs are joined with `+` when displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeDistinguishedName {
    pub attributes: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Self {
        Self { attributes }
    }
}

impl DecodableFrom<Element> for RelativeDistinguishedName {}

impl Decoder<Element, RelativeDistinguishedName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RelativeDistinguishedName> {
        match self {
            Element::Set(elements) => {
                let attributes = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<AttributeTypeAndValue>>>()?;
                Ok(RelativeDistinguishedName { attributes })
            }
            _ => Err(Error::RdnExpectedSet),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    pub attribute_type: ObjectIdentifier,
    pub attribute_value: DirectoryString,
}

impl AttributeTypeAndValue {
    pub const OID_COMMON_NAME: &'static str = "2.5.4.3";
    pub const OID_SURNAME: &'static str = "2.5.4.4";
    pub const OID_SERIAL_NUMBER: &'static str = "2.5.4.5";
    pub const OID_COUNTRY_NAME: &'static str = "2.5.4.6";
    pub const OID_LOCALITY_NAME: &'static str = "2.5.4.7";
    pub const OID_STATE_OR_PROVINCE_NAME: &'static str = "2.5.4.8";
    pub const OID_STREET_ADDRESS: &'static str = "2.5.4.9";
    pub const OID_ORGANIZATION_NAME: &'static str = "2.5.4.10";
    pub const OID_ORGANIZATIONAL_UNIT_NAME: &'static str = "2.5.4.11";
    pub const OID_TITLE: &'static str = "2.5.4.12";
    pub const OID_GIVEN_NAME: &'static str = "2.5.4.42";
    pub const OID_DOMAIN_COMPONENT: &'static str = "0.9.2342.19200300.100.1.25";
    pub const OID_USER_ID: &'static str = "0.9.2342.19200300.100.1.1";
    pub const OID_EMAIL_ADDRESS: &'static str = "1.2.840.113549.1.9.1";

    pub fn new(attribute_type: ObjectIdentifier, attribute_value: impl Into<DirectoryString>) -> Self {
        Self {
            attribute_type,
            attribute_value: attribute_value.into(),
        }
    }

    pub fn value_str(&self) -> &str {
        self.attribute_value.as_str()
    }
}

const ATTRIBUTE_NAMES: &[(&str, &str)] = &[
    (AttributeTypeAndValue::OID_COMMON_NAME, "CN"),
    (AttributeTypeAndValue::OID_SURNAME, "SN"),
    (AttributeTypeAndValue::OID_SERIAL_NUMBER, "serialNumber"),
    (AttributeTypeAndValue::OID_COUNTRY_NAME, "C"),
    (AttributeTypeAndValue::OID_LOCALITY_NAME, "L"),
    (AttributeTypeAndValue::OID_STATE_OR_PROVINCE_NAME, "ST"),
    (AttributeTypeAndValue::OID_STREET_ADDRESS, "street"),
    (AttributeTypeAndValue::OID_ORGANIZATION_NAME, "O"),
    (AttributeTypeAndValue::OID_ORGANIZATIONAL_UNIT_NAME, "OU"),
    (AttributeTypeAndValue::OID_TITLE, "title"),
    (AttributeTypeAndValue::OID_GIVEN_NAME, "GN"),
    (AttributeTypeAndValue::OID_DOMAIN_COMPONENT, "DC"),
    (AttributeTypeAndValue::OID_USER_ID, "UID"),
    (AttributeTypeAndValue::OID_EMAIL_ADDRESS, "emailAddress"),
];

impl OidName for AttributeTypeAndValue {
    fn oid_name(&self) -> Option<&'static str> {
        ATTRIBUTE_NAMES
            .iter()
            .find(|(oid, _)| self.attribute_type == *oid)
            .map(|(_, name)| *name)
    }
}

impl Serialize for AttributeTypeAndValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AttributeTypeAndValue", 3)?;
        match self.oid_name() {
            Some(name) => state.serialize_field("type", name)?,
            None => state.serialize_field("type", &self.attribute_type)?,
        }
        state.serialize_field("oid", &self.attribute_type)?;
        state.serialize_field("value", self.attribute_value.as_str())?;
        state.end()
    }
}

impl DecodableFrom<Element> for AttributeTypeAndValue {}

impl Decoder<Element, AttributeTypeAndValue> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AttributeTypeAndValue> {
        let Element::Sequence(seq) = self else {
            return Err(Error::AttributeTypeAndValueExpectedSequence);
        };

        let (attribute_type, attribute_value) = match seq.as_slice() {
            [Element::ObjectIdentifier(oid), value_elem] => (oid.clone(), value_elem.decode()?),
            [_, _] => return Err(Error::AttributeTypeAndValueExpectedOid),
            _ => return Err(Error::AttributeTypeAndValueInvalidElementCount),
        };

        Ok(AttributeTypeAndValue {
            attribute_type,
            attribute_value,
        })
    }
}
