use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, OctetString};
use serde::{Serialize, ser::SerializeSeq};

use super::Extension;
use super::error::{Error, Kind, Result};

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1), -- renamed to contentCommitment
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8)
}
*/

/// Serialized as the list of asserted usage names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyUsage {
    pub digital_signature: bool,
    pub content_commitment: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsage {
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.digital_signature, "digitalSignature"),
            (self.content_commitment, "contentCommitment"),
            (self.key_encipherment, "keyEncipherment"),
            (self.data_encipherment, "dataEncipherment"),
            (self.key_agreement, "keyAgreement"),
            (self.key_cert_sign, "keyCertSign"),
            (self.crl_sign, "cRLSign"),
            (self.encipher_only, "encipherOnly"),
            (self.decipher_only, "decipherOnly"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

impl Serialize for KeyUsage {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let names = self.names();
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

impl Extension for KeyUsage {
    const OID: &'static str = "2.5.29.15";
    const NAME: &'static str = "keyUsage";

    fn parse(value: &OctetString) -> Result<Self> {
        ASN1Object::try_from(value)?.into_single()?.decode()
    }
}

impl DecodableFrom<Element> for KeyUsage {}

impl Decoder<Element, KeyUsage> for Element {
    type Error = Error;

    fn decode(&self) -> Result<KeyUsage> {
        let Element::BitString(bs) = self else {
            return Err(Error::ExpectedBitString(Kind::KeyUsage));
        };
        Ok(KeyUsage {
            digital_signature: bs.bit(0),
            content_commitment: bs.bit(1),
            key_encipherment: bs.bit(2),
            data_encipherment: bs.bit(3),
            key_agreement: bs.bit(4),
            key_cert_sign: bs.bit(5),
            crl_sign: bs.bit(6),
            encipher_only: bs.bit(7),
            decipher_only: bs.bit(8),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::digital_signature(&[0x03, 0x02, 0x07, 0x80], vec!["digitalSignature"])]
    #[case::ca(&[0x03, 0x02, 0x01, 0x06], vec!["keyCertSign", "cRLSign"])]
    #[case::tls_server(&[0x03, 0x02, 0x05, 0xa0], vec!["digitalSignature", "keyEncipherment"])]
    #[case::decipher_only(&[0x03, 0x03, 0x07, 0x00, 0x80], vec!["decipherOnly"])]
    // unused bits are ignored even when set
    #[case::unused_bits_masked(&[0x03, 0x02, 0x07, 0xff], vec!["digitalSignature"])]
    fn test_key_usage_parse(#[case] der: &[u8], #[case] expected: Vec<&str>) {
        let key_usage = KeyUsage::parse(&OctetString::from(der)).unwrap();
        assert_eq!(expected, key_usage.names());
    }

    #[test]
    fn test_key_usage_serialize() {
        let key_usage = KeyUsage {
            digital_signature: true,
            crl_sign: true,
            ..Default::default()
        };
        assert_eq!(
            r#"["digitalSignature","cRLSign"]"#,
            serde_json::to_string(&key_usage).unwrap()
        );
    }

    #[rstest]
    #[case::boolean(Element::Boolean(true))]
    #[case::sequence(Element::Sequence(vec![]))]
    fn test_key_usage_decode_error(#[case] input: Element) {
        let result: Result<KeyUsage> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains("ExpectedBitString"));
    }
}
