//! Safe bags ([RFC 7292 Section 4.2](https://datatracker.ietf.org/doc/html/rfc7292#section-4.2)).
//!
//! ```asn1
//! SafeContents ::= SEQUENCE OF SafeBag
//!
//! SafeBag ::= SEQUENCE {
//!     bagId         BAG-TYPE.&id ({PKCS12BagSet}),
//!     bagValue      [0] EXPLICIT BAG-TYPE.&Type({PKCS12BagSet}{@bagId}),
//!     bagAttributes SET OF PKCS12Attribute OPTIONAL
//! }
//!
//! CertBag ::= SEQUENCE {
//!     certId    BAG-TYPE.&id   ({CertTypes}),
//!     certValue [0] EXPLICIT BAG-TYPE.&Type ({CertTypes}{@certId})
//! }
//! ```
//!
//! Key, CRL and secret bags are recognized but not opened.

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, ObjectIdentifier};
use kensa_pkcs9::Attributes;

use crate::error::{Error, Result};

pub const OID_KEY_BAG: &str = "1.2.840.113549.1.12.10.1.1";
pub const OID_PKCS8_SHROUDED_KEY_BAG: &str = "1.2.840.113549.1.12.10.1.2";
pub const OID_CERT_BAG: &str = "1.2.840.113549.1.12.10.1.3";
pub const OID_CRL_BAG: &str = "1.2.840.113549.1.12.10.1.4";
pub const OID_SECRET_BAG: &str = "1.2.840.113549.1.12.10.1.5";
pub const OID_SAFE_CONTENTS_BAG: &str = "1.2.840.113549.1.12.10.1.6";

pub const OID_X509_CERTIFICATE: &str = "1.2.840.113549.1.9.22.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeContents(Vec<SafeBag>);

impl SafeContents {
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = ASN1Object::try_from(bytes)?.into_single()?;
        element.decode()
    }

    pub fn bags(&self) -> &[SafeBag] {
        &self.0
    }
}

impl DecodableFrom<Element> for SafeContents {}

impl Decoder<Element, SafeContents> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SafeContents> {
        let Element::Sequence(elements) = self else {
            return Err(Error::SafeContentsExpectedSequence);
        };
        let bags = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<SafeBag>>>()?;
        Ok(SafeContents(bags))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeBag {
    pub value: BagValue,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BagValue {
    Key,
    ShroudedKey,
    Cert(CertBag),
    Crl,
    Secret,
    SafeContents(SafeContents),
    Unrecognized,
}

impl BagValue {
    pub fn name(&self) -> &'static str {
        match self {
            BagValue::Key => "keyBag",
            BagValue::ShroudedKey => "pkcs8ShroudedKeyBag",
            BagValue::Cert(_) => "certBag",
            BagValue::Crl => "crlBag",
            BagValue::Secret => "secretBag",
            BagValue::SafeContents(_) => "safeContentsBag",
            BagValue::Unrecognized => "unrecognized",
        }
    }
}

impl DecodableFrom<Element> for SafeBag {}

impl Decoder<Element, SafeBag> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SafeBag> {
        let Element::Sequence(elements) = self else {
            return Err(Error::SafeBagExpectedSequence);
        };
        let (bag_id, value, attributes) = match elements.as_slice() {
            [Element::ObjectIdentifier(id), value] => (id, value, None),
            [Element::ObjectIdentifier(id), value, attributes] => (id, value, Some(attributes)),
            _ => return Err(Error::SafeBagExpectedSequence),
        };
        if value.context_slot() != Some(0) {
            return Err(Error::SafeBagExpectedSequence);
        }
        let attributes: Attributes = match attributes {
            Some(attributes) => attributes.decode()?,
            None => Attributes::default(),
        };

        let value = match bag_id.to_string().as_str() {
            OID_KEY_BAG => BagValue::Key,
            OID_PKCS8_SHROUDED_KEY_BAG => BagValue::ShroudedKey,
            OID_CRL_BAG => BagValue::Crl,
            OID_SECRET_BAG => BagValue::Secret,
            OID_CERT_BAG => {
                let bag: CertBag = value.explicit()?.decode()?;
                BagValue::Cert(bag)
            }
            OID_SAFE_CONTENTS_BAG => {
                let contents: SafeContents = value.explicit()?.decode()?;
                BagValue::SafeContents(contents)
            }
            _ => {
                tracing::debug!(bag_id = %bag_id, "unrecognized bag type");
                BagValue::Unrecognized
            }
        };
        Ok(SafeBag { value, attributes })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertBag {
    /// DER of an X.509 certificate.
    X509(Vec<u8>),
    /// sdsiCertificate or another certificate type.
    Other(ObjectIdentifier),
}

impl DecodableFrom<Element> for CertBag {}

impl Decoder<Element, CertBag> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertBag> {
        let Element::Sequence(elements) = self else {
            return Err(Error::CertBagExpectedSequence);
        };
        let [Element::ObjectIdentifier(cert_id), value] = elements.as_slice() else {
            return Err(Error::CertBagExpectedSequence);
        };
        if value.context_slot() != Some(0) {
            return Err(Error::CertBagExpectedSequence);
        }
        if *cert_id != OID_X509_CERTIFICATE {
            return Ok(CertBag::Other(cert_id.clone()));
        }
        match value.explicit()? {
            Element::OctetString(der) => Ok(CertBag::X509(der.into_bytes())),
            _ => Err(Error::CertBagExpectedOctetString),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use kensa_asn1::{BMPString, OctetString};
    use kensa_der::{PrimitiveTag, Tag, Tlv};
    use kensa_pkcs9::attribute::{FriendlyName, LocalKeyId};
    use kensa_pkcs9::{Attribute, RawAttribute};
    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> Element {
        Element::ObjectIdentifier(ObjectIdentifier::from_str(s).unwrap())
    }

    // [0] EXPLICIT wrapping of an already encoded TLV
    fn explicit(inner: Tlv) -> Element {
        let tlv = Tlv::new_constructed(Tag::ContextSpecific { slot: 0, constructed: true }, vec![inner]);
        Element::ContextSpecific {
            slot: 0,
            constructed: true,
            tlv,
        }
    }

    fn sequence(tlvs: Vec<Tlv>) -> Tlv {
        Tlv::new_constructed(Tag::Primitive(PrimitiveTag::Sequence, 0x30), tlvs)
    }

    fn oid_tlv(s: &str) -> Tlv {
        let der = kensa_der::Der::parse(&oid_der(s)).unwrap();
        der.into_elements().remove(0)
    }

    fn oid_der(s: &str) -> Vec<u8> {
        // Only the OIDs used below.
        match s {
            OID_X509_CERTIFICATE => vec![0x06, 0x0a, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x16, 0x01],
            _ => vec![0x06, 0x03, 0x2a, 0x03, 0x04],
        }
    }

    fn cert_bag(cert_id: &str, value: Tlv) -> Element {
        explicit(sequence(vec![
            oid_tlv(cert_id),
            Tlv::new_constructed(Tag::ContextSpecific { slot: 0, constructed: true }, vec![value]),
        ]))
    }

    fn octet_string(bytes: &[u8]) -> Tlv {
        Tlv::new_primitive(Tag::Primitive(PrimitiveTag::OctetString, 0x04), bytes.to_vec())
    }

    fn friendly_name(name: &str) -> Element {
        Element::Sequence(vec![
            oid(FriendlyName::OID),
            Element::Set(vec![Element::BMPString(BMPString::try_from(
                name.encode_utf16().flat_map(u16::to_be_bytes).collect::<Vec<u8>>().as_slice(),
            ).unwrap())]),
        ])
    }

    #[test]
    fn test_safe_bag_cert_with_attributes() {
        let bag = Element::Sequence(vec![
            oid(OID_CERT_BAG),
            cert_bag(OID_X509_CERTIFICATE, octet_string(&[0x30, 0x00])),
            Element::Set(vec![
                friendly_name("signer"),
                Element::Sequence(vec![
                    oid(LocalKeyId::OID),
                    Element::Set(vec![Element::OctetString(OctetString::from(vec![1, 2, 3]))]),
                ]),
            ]),
        ]);
        let bag: SafeBag = bag.decode().unwrap();
        assert_eq!(BagValue::Cert(CertBag::X509(vec![0x30, 0x00])), bag.value);
        let name = bag.attributes.attribute::<FriendlyName>().unwrap().unwrap();
        assert_eq!("signer", name.name());
        let id = bag.attributes.attribute::<LocalKeyId>().unwrap().unwrap();
        assert_eq!(&[1, 2, 3], id.id().as_bytes());
    }

    #[test]
    fn test_safe_bag_non_x509_cert() {
        let bag = Element::Sequence(vec![
            oid(OID_CERT_BAG),
            cert_bag("1.2.3.4", octet_string(&[0x01])),
        ]);
        let bag: SafeBag = bag.decode().unwrap();
        assert!(matches!(bag.value, BagValue::Cert(CertBag::Other(_))));
        assert!(bag.attributes.is_empty());
    }

    #[rstest]
    #[case::key(OID_KEY_BAG, "keyBag")]
    #[case::shrouded_key(OID_PKCS8_SHROUDED_KEY_BAG, "pkcs8ShroudedKeyBag")]
    #[case::crl(OID_CRL_BAG, "crlBag")]
    #[case::secret(OID_SECRET_BAG, "secretBag")]
    #[case::unknown("1.2.3.4", "unrecognized")]
    fn test_safe_bag_skipped_kinds(#[case] bag_id: &str, #[case] name: &str) {
        let bag = Element::Sequence(vec![oid(bag_id), explicit(sequence(vec![]))]);
        let bag: SafeBag = bag.decode().unwrap();
        assert_eq!(name, bag.value.name());
    }

    #[test]
    fn test_nested_safe_contents() {
        let inner = sequence(vec![sequence(vec![
            oid_tlv("1.2.3.4"),
            Tlv::new_constructed(Tag::ContextSpecific { slot: 0, constructed: true }, vec![sequence(vec![])]),
        ])]);
        let bag = Element::Sequence(vec![oid(OID_SAFE_CONTENTS_BAG), explicit(inner)]);
        let bag: SafeBag = bag.decode().unwrap();
        let BagValue::SafeContents(contents) = bag.value else {
            panic!("expected safeContentsBag");
        };
        assert_eq!(1, contents.bags().len());
    }

    #[rstest]
    #[case::not_sequence(Element::Null, "SafeBagExpectedSequence")]
    #[case::value_not_tagged(
        Element::Sequence(vec![oid(OID_CERT_BAG), Element::Null]),
        "SafeBagExpectedSequence"
    )]
    #[case::cert_value_not_octets(
        Element::Sequence(vec![oid(OID_CERT_BAG), cert_bag(OID_X509_CERTIFICATE, sequence(vec![]))]),
        "CertBagExpectedOctetString"
    )]
    #[case::bad_attribute(
        Element::Sequence(vec![oid(OID_KEY_BAG), explicit(sequence(vec![])), Element::Set(vec![Element::Null])]),
        "AttributeExpectedSequence"
    )]
    fn test_safe_bag_decode_error(#[case] input: Element, #[case] variant: &str) {
        let result: Result<SafeBag> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains(variant));
    }

    #[test]
    fn test_safe_contents_not_sequence() {
        let err = SafeContents::from_der(&[0x05, 0x00]).unwrap_err();
        assert!(format!("{:?}", err).contains("SafeContentsExpectedSequence"));
    }

    #[test]
    fn test_raw_attribute_is_kept_for_unknown_types() {
        let bag = Element::Sequence(vec![
            oid(OID_KEY_BAG),
            explicit(sequence(vec![])),
            Element::Set(vec![Element::Sequence(vec![oid("1.2.3.4"), Element::Set(vec![Element::Null])])]),
        ]);
        let bag: SafeBag = bag.decode().unwrap();
        let raw: &RawAttribute = bag.attributes.get("1.2.3.4").unwrap();
        assert_eq!(1, raw.values().len());
    }
}
