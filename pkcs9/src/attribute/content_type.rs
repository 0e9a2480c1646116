//! PKCS#9 contentType attribute (OID: 1.2.840.113549.1.9.3)
//!
//! ```asn1
//! ContentType ::= OBJECT IDENTIFIER
//! ```
//!
//! Required in CMS signed attributes; must equal the eContentType of the
//! signed content.

use std::fmt;

use kensa_asn1::{Element, ObjectIdentifier};
use serde::Serialize;

use crate::error::{Error, Result};

use super::{Attribute, single_value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentType {
    oid: ObjectIdentifier,
}

impl ContentType {
    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.oid)
    }
}

impl Attribute for ContentType {
    const OID: &'static str = "1.2.840.113549.1.9.3";

    fn parse(values: &[Element]) -> Result<Self> {
        match single_value(values, "contentType")? {
            Element::ObjectIdentifier(oid) => Ok(Self { oid: oid.clone() }),
            _ => Err(Error::InvalidContentType),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[test]
    fn test_content_type_parse() {
        let oid = ObjectIdentifier::from_str("1.2.840.113549.1.7.1").unwrap();
        let ct = ContentType::parse(&[Element::ObjectIdentifier(oid.clone())]).unwrap();
        assert_eq!(&oid, ct.oid());
        assert_eq!(r#""1.2.840.113549.1.7.1""#, serde_json::to_string(&ct).unwrap());
    }

    #[rstest]
    #[case::no_value(vec![], "ExpectedSingleValue")]
    #[case::two_values(vec![Element::Null, Element::Null], "ExpectedSingleValue")]
    #[case::not_oid(vec![Element::Null], "InvalidContentType")]
    fn test_content_type_parse_error(#[case] values: Vec<Element>, #[case] variant: &str) {
        let err = ContentType::parse(&values).unwrap_err();
        assert!(format!("{:?}", err).contains(variant));
    }
}
