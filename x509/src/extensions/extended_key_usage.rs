use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, ObjectIdentifier, OctetString};
use serde::{Serialize, ser::SerializeSeq};

use super::Extension;
use super::error::{Error, Kind, Result};

/*
RFC 5280 Section 4.2.1.12
ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId

KeyPurposeId ::= OBJECT IDENTIFIER
*/

/// Serialized as purpose names where known, dotted OIDs otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    pub const SERVER_AUTH: &'static str = "1.3.6.1.5.5.7.3.1";
    pub const CLIENT_AUTH: &'static str = "1.3.6.1.5.5.7.3.2";
    pub const CODE_SIGNING: &'static str = "1.3.6.1.5.5.7.3.3";
    pub const EMAIL_PROTECTION: &'static str = "1.3.6.1.5.5.7.3.4";
    pub const TIME_STAMPING: &'static str = "1.3.6.1.5.5.7.3.8";
    pub const OCSP_SIGNING: &'static str = "1.3.6.1.5.5.7.3.9";
    pub const ANY_EXTENDED_KEY_USAGE: &'static str = "2.5.29.37.0";

    pub fn purpose_name(oid: &ObjectIdentifier) -> Option<&'static str> {
        [
            (Self::SERVER_AUTH, "serverAuth"),
            (Self::CLIENT_AUTH, "clientAuth"),
            (Self::CODE_SIGNING, "codeSigning"),
            (Self::EMAIL_PROTECTION, "emailProtection"),
            (Self::TIME_STAMPING, "timeStamping"),
            (Self::OCSP_SIGNING, "OCSPSigning"),
            (Self::ANY_EXTENDED_KEY_USAGE, "anyExtendedKeyUsage"),
        ]
        .into_iter()
        .find(|(s, _)| *oid == *s)
        .map(|(_, name)| name)
    }
}

impl Serialize for ExtendedKeyUsage {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.purposes.len()))?;
        for oid in &self.purposes {
            match Self::purpose_name(oid) {
                Some(name) => seq.serialize_element(name)?,
                None => seq.serialize_element(oid)?,
            }
        }
        seq.end()
    }
}

impl Extension for ExtendedKeyUsage {
    const OID: &'static str = "2.5.29.37";
    const NAME: &'static str = "extKeyUsage";

    fn parse(value: &OctetString) -> Result<Self> {
        ASN1Object::try_from(value)?.into_single()?.decode()
    }
}

impl DecodableFrom<Element> for ExtendedKeyUsage {}

impl Decoder<Element, ExtendedKeyUsage> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ExtendedKeyUsage> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::ExtendedKeyUsage));
        };
        if elements.is_empty() {
            return Err(Error::ExtendedKeyUsageEmpty);
        }
        let purposes = elements
            .iter()
            .map(|elem| match elem {
                Element::ObjectIdentifier(oid) => Ok(oid.clone()),
                _ => Err(Error::ExtendedKeyUsageExpectedOid),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ExtendedKeyUsage { purposes })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_extended_key_usage_parse() {
        // SEQUENCE { serverAuth, codeSigning, 1.2.3.4 }
        let der = [
            0x30, 0x19, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x01, 0x06, 0x08,
            0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x03, 0x06, 0x03, 0x2a, 0x03, 0x04,
        ];
        let eku = ExtendedKeyUsage::parse(&OctetString::from(der.as_slice())).unwrap();
        assert_eq!(3, eku.purposes.len());
        assert_eq!(
            r#"["serverAuth","codeSigning","1.2.3.4"]"#,
            serde_json::to_string(&eku).unwrap()
        );
    }

    #[rstest]
    #[case::empty(&[0x30, 0x00], "ExtendedKeyUsageEmpty")]
    #[case::not_oid(&[0x30, 0x02, 0x05, 0x00], "ExtendedKeyUsageExpectedOid")]
    #[case::not_sequence(&[0x05, 0x00], "ExpectedSequence")]
    fn test_extended_key_usage_parse_error(#[case] der: &[u8], #[case] variant: &str) {
        let err = ExtendedKeyUsage::parse(&OctetString::from(der)).unwrap_err();
        assert!(format!("{:?}", err).contains(variant));
    }
}
