//! ```asn1
//! Attribute ::= SEQUENCE {
//!     type    OBJECT IDENTIFIER,
//!     values  SET OF AttributeValue
//! }
//!
//! Attributes ::= SET OF Attribute
//! ```
//!
//! Values are kept as decoded elements and interpreted lazily through the
//! [`Attribute`] trait, the same way X.509 extensions are.

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier};
use kensa_der::{PrimitiveTag, Tag, Tlv};

use crate::error::{Error, Result};

pub mod content_type;
pub mod friendly_name;
pub mod local_key_id;
pub mod message_digest;
pub mod signing_time;

pub use content_type::ContentType;
pub use friendly_name::FriendlyName;
pub use local_key_id::LocalKeyId;
pub use message_digest::MessageDigest;
pub use signing_time::SigningTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    attribute_type: ObjectIdentifier,
    values: Vec<Element>,
}

impl RawAttribute {
    pub fn new(attribute_type: ObjectIdentifier, values: Vec<Element>) -> Self {
        Self {
            attribute_type,
            values,
        }
    }

    pub fn attribute_type(&self) -> &ObjectIdentifier {
        &self.attribute_type
    }

    pub fn values(&self) -> &[Element] {
        &self.values
    }

    /// Interpret the values as attribute `T`.
    pub fn parse<T: Attribute>(&self) -> Result<T> {
        if self.attribute_type != T::OID {
            return Err(Error::OidMismatch {
                expected: T::OID,
                actual: self.attribute_type.to_string(),
            });
        }
        T::parse(&self.values)
    }
}

impl DecodableFrom<Element> for RawAttribute {}

impl Decoder<Element, RawAttribute> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RawAttribute> {
        let Element::Sequence(seq) = self else {
            return Err(Error::AttributeExpectedSequence);
        };
        let [attribute_type, values] = seq.as_slice() else {
            return Err(Error::AttributeExpectedSequence);
        };
        let Element::ObjectIdentifier(attribute_type) = attribute_type else {
            return Err(Error::AttributeExpectedOid);
        };
        let Element::Set(values) = values else {
            return Err(Error::AttributeExpectedSet);
        };
        Ok(RawAttribute::new(attribute_type.clone(), values.clone()))
    }
}

/// A typed PKCS#9 attribute, parsed from the members of its value set.
pub trait Attribute: Sized {
    const OID: &'static str;

    fn parse(values: &[Element]) -> Result<Self>;
}

/// Every attribute used here is SINGLE VALUE TRUE.
pub(crate) fn single_value<'a>(values: &'a [Element], name: &'static str) -> Result<&'a Element> {
    match values {
        [value] => Ok(value),
        _ => Err(Error::ExpectedSingleValue(name, values.len())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<RawAttribute>);

impl Attributes {
    pub fn new(attributes: Vec<RawAttribute>) -> Self {
        Self(attributes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[RawAttribute] {
        &self.0
    }

    pub fn get(&self, oid: &str) -> Option<&RawAttribute> {
        self.0.iter().find(|attr| *attr.attribute_type() == oid)
    }

    /// Get and parse the attribute of type `T`, if present.
    pub fn attribute<T: Attribute>(&self) -> Result<Option<T>> {
        self.get(T::OID).map(RawAttribute::parse::<T>).transpose()
    }
}

impl From<Vec<RawAttribute>> for Attributes {
    fn from(attributes: Vec<RawAttribute>) -> Self {
        Self(attributes)
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a RawAttribute;
    type IntoIter = std::slice::Iter<'a, RawAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl DecodableFrom<Element> for Attributes {}

/// Accepts a universal `SET OF Attribute` or an `[n] IMPLICIT SET OF
/// Attribute` as used by CMS signed attributes.
impl Decoder<Element, Attributes> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Attributes> {
        let members = match self {
            Element::Set(elements) => elements.clone(),
            Element::ContextSpecific { .. } => self.implicit_elements()?,
            _ => return Err(Error::AttributesExpectedSet),
        };
        let attributes = members
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<RawAttribute>>>()?;
        Ok(Attributes::new(attributes))
    }
}

/// DER of `[0] IMPLICIT SET OF Attribute` re-tagged as a universal SET.
///
/// RFC 5652 Section 5.4: the signature over signed attributes is computed
/// over this encoding, not over the IMPLICIT tagged form in the message.
pub fn signed_attributes_der(element: &Element) -> Result<Vec<u8>> {
    let Element::ContextSpecific { tlv, .. } = element else {
        return Err(Error::AttributesExpectedSet);
    };
    let members = tlv.tlvs().ok_or(Error::AttributesExpectedSet)?;
    let set = Tlv::new_constructed(Tag::Primitive(PrimitiveTag::Set, 0x31), members.to_vec());
    Ok(set.to_der())
}

#[cfg(test)]
mod tests {
    use kensa_asn1::{ASN1Object, OctetString};
    use rstest::rstest;

    use super::*;

    // [0] { SEQUENCE { contentType, SET { data } },
    //       SEQUENCE { messageDigest, SET { OCTET STRING 02 } } }
    const SIGNED_ATTRS: &[u8] = &[
        0xa0, 0x2c, 0x30, 0x18, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09,
        0x03, 0x31, 0x0b, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01,
        0x30, 0x10, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x04, 0x31,
        0x03, 0x04, 0x01, 0x02,
    ];

    fn signed_attrs() -> Element {
        ASN1Object::try_from(SIGNED_ATTRS)
            .unwrap()
            .into_single()
            .unwrap()
    }

    #[test]
    fn test_attributes_decode_implicit() {
        let attributes: Attributes = signed_attrs().decode().unwrap();
        assert_eq!(2, attributes.len());
        let content_type = attributes.attribute::<ContentType>().unwrap().unwrap();
        assert_eq!("1.2.840.113549.1.7.1", content_type.oid().to_string());
        assert!(attributes.attribute::<SigningTime>().unwrap().is_none());
    }

    #[test]
    fn test_attributes_malformed_message_digest() {
        let attr = RawAttribute::new(
            MessageDigest::OID.parse().unwrap(),
            vec![Element::Null],
        );
        let attributes = Attributes::new(vec![attr]);
        let err = attributes.attribute::<MessageDigest>().unwrap_err();
        assert!(format!("{:?}", err).contains("InvalidMessageDigest"));
    }

    #[test]
    fn test_signed_attributes_der_retags_as_set() {
        let der = signed_attributes_der(&signed_attrs()).unwrap();
        assert_eq!(0x31, der[0]);
        assert_eq!(&SIGNED_ATTRS[1..], &der[1..]);
    }

    #[test]
    fn test_raw_attribute_oid_mismatch() {
        let attr = RawAttribute::new(
            ContentType::OID.parse().unwrap(),
            vec![Element::OctetString(OctetString::from(vec![1]))],
        );
        let err = attr.parse::<MessageDigest>().unwrap_err();
        assert!(format!("{:?}", err).contains("OidMismatch"));
    }

    #[rstest]
    #[case::not_sequence(Element::Null, "AttributeExpectedSequence")]
    #[case::missing_values(
        Element::Sequence(vec![Element::ObjectIdentifier(ContentType::OID.parse().unwrap())]),
        "AttributeExpectedSequence"
    )]
    #[case::type_not_oid(
        Element::Sequence(vec![Element::Null, Element::Set(vec![])]),
        "AttributeExpectedOid"
    )]
    #[case::values_not_set(
        Element::Sequence(vec![
            Element::ObjectIdentifier(ContentType::OID.parse().unwrap()),
            Element::Sequence(vec![]),
        ]),
        "AttributeExpectedSet"
    )]
    fn test_raw_attribute_decode_error(#[case] input: Element, #[case] variant: &str) {
        let result: Result<RawAttribute> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains(variant));
    }
}
