//! PKCS#9 localKeyId attribute (OID: 1.2.840.113549.1.9.21)
//!
//! ```asn1
//! localKeyId ATTRIBUTE ::= {
//!     WITH SYNTAX OCTET STRING
//!     SINGLE VALUE TRUE
//!     ID pkcs-9-at-localKeyId
//! }
//! ```

use kensa_asn1::{Element, OctetString};
use serde::Serialize;

use crate::error::{Error, Result};

use super::{Attribute, single_value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalKeyId {
    id: OctetString,
}

impl LocalKeyId {
    pub fn id(&self) -> &OctetString {
        &self.id
    }

    pub fn into_octet_string(self) -> OctetString {
        self.id
    }
}

impl Attribute for LocalKeyId {
    const OID: &'static str = "1.2.840.113549.1.9.21";

    fn parse(values: &[Element]) -> Result<Self> {
        match single_value(values, "localKeyId")? {
            Element::OctetString(id) => Ok(Self { id: id.clone() }),
            _ => Err(Error::InvalidLocalKeyId),
        }
    }
}
