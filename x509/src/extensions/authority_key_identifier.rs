use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, Integer, OctetString};
use kensa_pkix_types::CertificateSerialNumber;
use serde::Serialize;

use super::Extension;
use super::error::{Error, Kind, Result};
use super::general_name::GeneralName;

/*
RFC 5280 Section 4.2.1.1
AuthorityKeyIdentifier ::= SEQUENCE {
    keyIdentifier             [0] KeyIdentifier           OPTIONAL,
    authorityCertIssuer       [1] GeneralNames            OPTIONAL,
    authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL
}

The module is IMPLICIT TAGS.
*/

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorityKeyIdentifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_identifier: Option<OctetString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_cert_issuer: Option<Vec<GeneralName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_cert_serial_number: Option<CertificateSerialNumber>,
}

impl Extension for AuthorityKeyIdentifier {
    const OID: &'static str = "2.5.29.35";
    const NAME: &'static str = "authorityKeyIdentifier";

    fn parse(value: &OctetString) -> Result<Self> {
        ASN1Object::try_from(value)?.into_single()?.decode()
    }
}

impl DecodableFrom<Element> for AuthorityKeyIdentifier {}

impl Decoder<Element, AuthorityKeyIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AuthorityKeyIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::AuthorityKeyIdentifier));
        };
        elements
            .iter()
            .try_fold(AuthorityKeyIdentifier::default(), |mut aki, elem| {
                match elem.context_slot() {
                    Some(0) => {
                        aki.key_identifier = Some(OctetString::from(elem.implicit_octets()?));
                    }
                    Some(1) => {
                        let names = elem
                            .implicit_elements()?
                            .iter()
                            .map(|name| name.decode())
                            .collect::<Result<Vec<GeneralName>>>()?;
                        aki.authority_cert_issuer = Some(names);
                    }
                    Some(2) => {
                        let serial = Integer::from(elem.implicit_octets()?.as_slice());
                        aki.authority_cert_serial_number = Some(serial.into());
                    }
                    Some(other) => return Err(Error::AkiUnknownTag(other)),
                    None => return Err(Error::UnexpectedElementType(Kind::AuthorityKeyIdentifier)),
                }
                Ok(aki)
            })
    }
}
