//! PKIX Extension type
//!
//! RFC 5280 Section 4.1.2.9
//!
//! ```asn1
//! Extension  ::=  SEQUENCE  {
//!     extnID      OBJECT IDENTIFIER,
//!     critical    BOOLEAN DEFAULT FALSE,
//!     extnValue   OCTET STRING
//!                 -- contains the DER encoding of an ASN.1 value
//!                 -- corresponding to the extension type identified
//!                 -- by extnID
//! }
//! ```
//!
//! Only the envelope lives here. Interpreting `extnValue` is up to the
//! x509 crate.

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier, OctetString};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    id: ObjectIdentifier,
    critical: bool,
    value: OctetString,
}

impl Extension {
    pub fn new(id: ObjectIdentifier, critical: bool, value: OctetString) -> Self {
        Self {
            id,
            critical,
            value,
        }
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        &self.id
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Raw extnValue (DER of the extension specific structure)
    pub fn value(&self) -> &OctetString {
        &self.value
    }
}

impl DecodableFrom<Element> for Extension {}

impl Decoder<Element, Extension> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extension> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExtensionExpectedSequence);
        };
        // critical is DEFAULT FALSE and normally omitted
        let (id, critical, value) = match elements.as_slice() {
            [id, value] => (id, &Element::Boolean(false), value),
            [id, critical, value] => (id, critical, value),
            _ => return Err(Error::ExtensionInvalidElementCount(elements.len())),
        };
        let Element::ObjectIdentifier(id) = id else {
            return Err(Error::ExtensionExpectedOidForExtnId);
        };
        let Element::Boolean(critical) = critical else {
            return Err(Error::ExtensionExpectedBoolean);
        };
        let Element::OctetString(value) = value else {
            return Err(Error::ExtensionExpectedOctetString);
        };
        Ok(Extension::new(id.clone(), *critical, value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> Element {
        Element::ObjectIdentifier(ObjectIdentifier::from_str(s).unwrap())
    }

    #[rstest]
    #[case::critical(
        Element::Sequence(vec![oid("2.5.29.15"), Element::Boolean(true), Element::OctetString(OctetString::from(vec![0x03, 0x02, 0x05, 0xa0]))]),
        true
    )]
    #[case::default_non_critical(
        Element::Sequence(vec![oid("2.5.29.17"), Element::OctetString(OctetString::from(vec![0x30, 0x00]))]),
        false
    )]
    fn test_extension_decode(#[case] input: Element, #[case] critical: bool) {
        let ext: Extension = input.decode().unwrap();
        assert_eq!(critical, ext.is_critical());
        assert!(!ext.value().as_bytes().is_empty());
    }

    #[rstest]
    #[case::not_sequence(Element::Null, "ExtensionExpectedSequence")]
    #[case::too_short(Element::Sequence(vec![oid("2.5.29.15")]), "ExtensionInvalidElementCount")]
    #[case::bad_id(
        Element::Sequence(vec![Element::Null, Element::OctetString(OctetString::from(vec![0x05, 0x00]))]),
        "ExtensionExpectedOidForExtnId"
    )]
    #[case::bad_critical(
        Element::Sequence(vec![oid("2.5.29.15"), Element::Null, Element::OctetString(OctetString::from(vec![0x05, 0x00]))]),
        "ExtensionExpectedBoolean"
    )]
    #[case::bad_value(Element::Sequence(vec![oid("2.5.29.15"), Element::Null]), "ExtensionExpectedOctetString")]
    fn test_extension_decode_error(#[case] input: Element, #[case] variant: &str) {
        let result: Result<Extension> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains(variant));
    }
}
