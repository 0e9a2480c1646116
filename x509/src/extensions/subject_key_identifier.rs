use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, OctetString};
use serde::Serialize;

use super::Extension;
use super::error::{Error, Kind, Result};

/*
RFC 5280 Section 4.2.1.2
SubjectKeyIdentifier ::= KeyIdentifier
KeyIdentifier ::= OCTET STRING
*/

/// Serialized as lowercase hex. CMS signer infos of version 3 refer to their
/// certificate by this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: OctetString,
}

impl Extension for SubjectKeyIdentifier {
    const OID: &'static str = "2.5.29.14";
    const NAME: &'static str = "subjectKeyIdentifier";

    fn parse(value: &OctetString) -> Result<Self> {
        ASN1Object::try_from(value)?.into_single()?.decode()
    }
}

impl DecodableFrom<Element> for SubjectKeyIdentifier {}

impl Decoder<Element, SubjectKeyIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectKeyIdentifier> {
        match self {
            Element::OctetString(os) => Ok(SubjectKeyIdentifier {
                key_identifier: os.clone(),
            }),
            _ => Err(Error::ExpectedOctetString(Kind::SubjectKeyIdentifier)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_key_identifier_parse() {
        let ski = SubjectKeyIdentifier::parse(&OctetString::from(
            [0x04, 0x04, 0xde, 0xad, 0xbe, 0xef].as_slice(),
        ))
        .unwrap();
        assert_eq!(&[0xde, 0xad, 0xbe, 0xef], ski.key_identifier.as_bytes());
        assert_eq!(r#""deadbeef""#, serde_json::to_string(&ski).unwrap());
    }

    #[test]
    fn test_subject_key_identifier_parse_error() {
        let err = SubjectKeyIdentifier::parse(&OctetString::from([0x05, 0x00].as_slice())).unwrap_err();
        assert!(format!("{:?}", err).contains("ExpectedOctetString"));
    }
}
