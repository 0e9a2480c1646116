//! ```asn1
//! ContentInfo ::= SEQUENCE {
//!     contentType ContentType,
//!     content [0] EXPLICIT ANY DEFINED BY contentType OPTIONAL }
//!
//! ContentType ::= OBJECT IDENTIFIER
//! ```
//!
//! RFC 5652 makes `content` mandatory; PKCS#7 (RFC 2315) does not, and
//! PKCS#12 containers still follow PKCS#7 here.

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, ObjectIdentifier};

use crate::error::{Error, Result};

pub const OID_DATA: &str = "1.2.840.113549.1.7.1";
pub const OID_SIGNED_DATA: &str = "1.2.840.113549.1.7.2";
pub const OID_ENVELOPED_DATA: &str = "1.2.840.113549.1.7.3";
pub const OID_DIGESTED_DATA: &str = "1.2.840.113549.1.7.5";
pub const OID_ENCRYPTED_DATA: &str = "1.2.840.113549.1.7.6";
pub const OID_AUTH_DATA: &str = "1.2.840.113549.1.9.16.1.2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInfo {
    pub content_type: ObjectIdentifier,
    pub content: Option<Element>,
}

impl ContentInfo {
    /// Decode a DER/BER encoded ContentInfo. The input must hold exactly one
    /// element; trailing zero padding is tolerated by the TLV layer.
    pub fn from_ber(bytes: &[u8]) -> Result<Self> {
        ASN1Object::try_from(bytes)?.into_single()?.decode()
    }

    pub fn is(&self, oid: &str) -> bool {
        self.content_type == oid
    }

    /// The inner element of the `[0] EXPLICIT` content.
    pub fn content(&self) -> Result<&Element> {
        self.content.as_ref().ok_or(Error::ContentInfoMissingContent)
    }

    /// Content octets of a `data` ContentInfo.
    pub fn data(&self) -> Result<&[u8]> {
        if !self.is(OID_DATA) {
            return Err(Error::UnexpectedContentType(self.content_type.to_string()));
        }
        match self.content()? {
            Element::OctetString(octets) => Ok(octets.as_bytes()),
            _ => Err(Error::ContentInfoExpectedOctetString),
        }
    }
}

impl DecodableFrom<Element> for ContentInfo {}

impl Decoder<Element, ContentInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ContentInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ContentInfoExpectedSequence);
        };
        let (content_type, content) = match elements.as_slice() {
            [Element::ObjectIdentifier(oid)] => (oid.clone(), None),
            [Element::ObjectIdentifier(oid), content] if content.context_slot() == Some(0) => {
                (oid.clone(), Some(content.explicit()?))
            }
            [Element::ObjectIdentifier(_), _] => return Err(Error::ContentInfoExpectedExplicitContent),
            [_] | [_, _] => return Err(Error::ContentInfoExpectedOid),
            _ => return Err(Error::ContentInfoInvalidElementCount(elements.len())),
        };
        Ok(ContentInfo {
            content_type,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_content_info_data() {
        // SEQUENCE { data, [0] { OCTET STRING "hi" } }
        let der = [
            0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01, 0xa0,
            0x04, 0x04, 0x02, b'h', b'i',
        ];
        let ci = ContentInfo::from_ber(&der).unwrap();
        assert!(ci.is(OID_DATA));
        assert_eq!(b"hi", ci.data().unwrap());
    }

    #[test]
    fn test_content_info_ber_constructed_octets() {
        // SEQUENCE (indefinite) { data, [0] (indefinite) { OCTET STRING (constructed) { "h", "i" } } }
        let der = [
            0x30, 0x80, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01, 0xa0,
            0x80, 0x24, 0x80, 0x04, 0x01, b'h', 0x04, 0x01, b'i', 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00,
        ];
        let ci = ContentInfo::from_ber(&der).unwrap();
        assert_eq!(b"hi", ci.data().unwrap());
    }

    #[test]
    fn test_content_info_without_content() {
        let der = [
            0x30, 0x0b, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01,
        ];
        let ci = ContentInfo::from_ber(&der).unwrap();
        let err = ci.data().unwrap_err();
        assert!(format!("{:?}", err).contains("ContentInfoMissingContent"));
    }

    #[rstest]
    #[case::not_sequence(&[0x05, 0x00], "ContentInfoExpectedSequence")]
    #[case::empty_sequence(&[0x30, 0x00], "ContentInfoInvalidElementCount")]
    #[case::not_oid(&[0x30, 0x02, 0x05, 0x00], "ContentInfoExpectedOid")]
    #[case::untagged_content(
        &[0x30, 0x07, 0x06, 0x03, 0x2a, 0x03, 0x04, 0x05, 0x00],
        "ContentInfoExpectedExplicitContent"
    )]
    fn test_content_info_decode_error(#[case] der: &[u8], #[case] variant: &str) {
        let err = ContentInfo::from_ber(der).unwrap_err();
        assert!(format!("{:?}", err).contains(variant));
    }
}
