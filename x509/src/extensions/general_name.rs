use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier, OctetString};
use kensa_pkix_types::Name;
use serde::Serialize;

use super::error::{Error, Result};

/*
RFC 5280 Section 4.2.1.6
GeneralName ::= CHOICE {
    otherName                 [0] OtherName,
    rfc822Name                [1] IA5String,
    dNSName                   [2] IA5String,
    x400Address               [3] ORAddress,
    directoryName             [4] Name,
    ediPartyName              [5] EDIPartyName,
    uniformResourceIdentifier [6] IA5String,
    iPAddress                 [7] OCTET STRING,
    registeredID              [8] OBJECT IDENTIFIER
}

OtherName ::= SEQUENCE {
    type-id    OBJECT IDENTIFIER,
    value      [0] EXPLICIT ANY DEFINED BY type-id
}
*/

/// Structures we do not interpret (otherName values, x400Address,
/// ediPartyName) keep their DER encoding, serialized as hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralName {
    OtherName {
        type_id: ObjectIdentifier,
        value: OctetString,
    },
    Rfc822Name(String),
    DnsName(String),
    X400Address(OctetString),
    DirectoryName(Name),
    EdiPartyName(OctetString),
    Uri(String),
    IpAddress(IpAddr),
    RegisteredId(ObjectIdentifier),
}

impl GeneralName {
    fn ia5(element: &Element) -> Result<String> {
        let octets = element.implicit_octets()?;
        if !octets.is_ascii() {
            return Err(Error::GeneralNameInvalidAscii);
        }
        String::from_utf8(octets).map_err(|_| Error::GeneralNameInvalidAscii)
    }

    fn raw(element: &Element) -> OctetString {
        match element {
            Element::ContextSpecific { tlv, .. } => OctetString::from(tlv.to_der()),
            _ => OctetString::from(Vec::new()),
        }
    }
}

impl DecodableFrom<Element> for GeneralName {}

impl Decoder<Element, GeneralName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralName> {
        let Some(slot) = self.context_slot() else {
            return Err(Error::GeneralNameExpectedContextSpecific);
        };
        match slot {
            0 => match self.implicit_elements()?.as_slice() {
                [
                    Element::ObjectIdentifier(type_id),
                    Element::ContextSpecific { slot: 0, tlv, .. },
                ] => match tlv.tlvs() {
                    Some([inner]) => Ok(GeneralName::OtherName {
                        type_id: type_id.clone(),
                        value: OctetString::from(inner.to_der()),
                    }),
                    _ => Err(Error::OtherNameInvalidStructure),
                },
                _ => Err(Error::OtherNameInvalidStructure),
            },
            1 => GeneralName::ia5(self).map(GeneralName::Rfc822Name),
            2 => GeneralName::ia5(self).map(GeneralName::DnsName),
            3 => Ok(GeneralName::X400Address(GeneralName::raw(self))),
            // Name is a CHOICE, so the tag is EXPLICIT
            4 => Ok(GeneralName::DirectoryName(self.explicit()?.decode()?)),
            5 => Ok(GeneralName::EdiPartyName(GeneralName::raw(self))),
            6 => GeneralName::ia5(self).map(GeneralName::Uri),
            7 => {
                let octets = self.implicit_octets()?;
                let addr = if let Ok(v4) = <[u8; 4]>::try_from(octets.as_slice()) {
                    IpAddr::V4(Ipv4Addr::from(v4))
                } else if let Ok(v6) = <[u8; 16]>::try_from(octets.as_slice()) {
                    IpAddr::V6(Ipv6Addr::from(v6))
                } else {
                    return Err(Error::InvalidIpAddressLength(octets.len()));
                };
                Ok(GeneralName::IpAddress(addr))
            }
            8 => {
                let octets = self.implicit_octets()?;
                Ok(GeneralName::RegisteredId(ObjectIdentifier::try_from(
                    octets.as_slice(),
                )?))
            }
            other => Err(Error::UnknownGeneralNameTag(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use kensa_asn1::ASN1Object;
    use rstest::rstest;

    use super::*;

    fn general_name(der: &[u8]) -> Result<GeneralName> {
        ASN1Object::try_from(der)?.into_single()?.decode()
    }

    #[rstest]
    #[case::dns(&[0x82, 0x0a, b'k', b'e', b'n', b's', b'a', b'.', b't', b'e', b's', b't'], GeneralName::DnsName("kensa.test".to_string()))]
    #[case::email(&[0x81, 0x05, b'a', b'@', b'b', b'.', b'c'], GeneralName::Rfc822Name("a@b.c".to_string()))]
    #[case::uri(&[0x86, 0x05, b'h', b't', b't', b'p', b':'], GeneralName::Uri("http:".to_string()))]
    #[case::ipv4(&[0x87, 0x04, 192, 0, 2, 1], GeneralName::IpAddress(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))))]
    #[case::ipv6(
        &[0x87, 0x10, 0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        GeneralName::IpAddress(IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)))
    )]
    #[case::registered_id(&[0x88, 0x03, 0x2a, 0x03, 0x04], GeneralName::RegisteredId("1.2.3.4".parse().unwrap()))]
    fn test_general_name_decode(#[case] der: &[u8], #[case] expected: GeneralName) {
        assert_eq!(expected, general_name(der).unwrap());
    }

    #[test]
    fn test_general_name_directory_name() {
        // [4] { SEQUENCE { SET { SEQUENCE { OID 2.5.4.3, UTF8String "ca" } } } }
        let der = [
            0xa4, 0x0f, 0x30, 0x0d, 0x31, 0x0b, 0x30, 0x09, 0x06, 0x03, 0x55, 0x04, 0x03, 0x0c,
            0x02, b'c', b'a',
        ];
        let GeneralName::DirectoryName(name) = general_name(&der).unwrap() else {
            panic!("expected directoryName");
        };
        assert_eq!("CN=ca", name.to_string());
    }

    #[test]
    fn test_general_name_other_name() {
        // [0] { OID 1.2.3.4, [0] { UTF8String "x" } }
        let der = [
            0xa0, 0x0a, 0x06, 0x03, 0x2a, 0x03, 0x04, 0xa0, 0x03, 0x0c, 0x01, b'x',
        ];
        assert_eq!(
            GeneralName::OtherName {
                type_id: "1.2.3.4".parse().unwrap(),
                value: OctetString::from(vec![0x0c, 0x01, b'x']),
            },
            general_name(&der).unwrap()
        );
    }

    #[rstest]
    #[case::bad_ip(&[0x87, 0x03, 1, 2, 3], "InvalidIpAddressLength")]
    #[case::non_ascii(&[0x82, 0x01, 0xff], "GeneralNameInvalidAscii")]
    #[case::unknown_tag(&[0x89, 0x00], "UnknownGeneralNameTag")]
    #[case::not_context(&[0x05, 0x00], "GeneralNameExpectedContextSpecific")]
    fn test_general_name_decode_error(#[case] der: &[u8], #[case] variant: &str) {
        assert!(format!("{:?}", general_name(der).unwrap_err()).contains(variant));
    }

    #[test]
    fn test_general_name_serialize() {
        assert_eq!(
            r#"{"dns_name":"kensa.test"}"#,
            serde_json::to_string(&GeneralName::DnsName("kensa.test".to_string())).unwrap()
        );
    }
}
