use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element, OctetString};
use serde::Serialize;

use super::Extension;
use super::error::{Error, Kind, Result};

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL
}
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicConstraints {
    pub ca: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_len_constraint: Option<u32>,
}

impl Extension for BasicConstraints {
    const OID: &'static str = "2.5.29.19";
    const NAME: &'static str = "basicConstraints";

    fn parse(value: &OctetString) -> Result<Self> {
        ASN1Object::try_from(value)?.into_single()?.decode()
    }
}

impl DecodableFrom<Element> for BasicConstraints {}

impl Decoder<Element, BasicConstraints> for Element {
    type Error = Error;

    fn decode(&self) -> Result<BasicConstraints> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::BasicConstraints));
        };
        let (ca, path_len_constraint) =
            elements
                .iter()
                .try_fold((false, None), |(ca, path_len), elem| match elem {
                    Element::Boolean(b) => Ok((*b, path_len)),
                    Element::Integer(i) => {
                        let value = i.to_u32().ok_or(Error::PathLenConstraintOutOfRange)?;
                        Ok((ca, Some(value)))
                    }
                    _ => Err(Error::UnexpectedElementType(Kind::BasicConstraints)),
                })?;
        Ok(BasicConstraints {
            ca,
            path_len_constraint,
        })
    }
}
