use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, OctetString};
use serde::Serialize;

use super::Extension;
use super::error::{Error, Kind, Result};
use super::general_name::GeneralName;

/*
RFC 5280 Section 4.2.1.6
SubjectAltName ::= GeneralNames

GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl Extension for SubjectAltName {
    const OID: &'static str = "2.5.29.17";
    const NAME: &'static str = "subjectAltName";

    fn parse(value: &OctetString) -> Result<Self> {
        ASN1Object::try_from(value)?.into_single()?.decode()
    }
}

impl DecodableFrom<Element> for SubjectAltName {}

impl Decoder<Element, SubjectAltName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectAltName> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::SubjectAltName));
        };
        if elements.is_empty() {
            return Err(Error::SubjectAltNameEmpty);
        }
        let names = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<GeneralName>>>()?;
        Ok(SubjectAltName { names })
    }
}
