//! PKCS#9 messageDigest attribute (OID: 1.2.840.113549.1.9.4)
//!
//! ```asn1
//! MessageDigest ::= OCTET STRING
//! ```
//!
//! The digest of the eContent octets, present whenever a CMS signer info
//! carries signed attributes.

use kensa_asn1::{Element, OctetString};
use serde::Serialize;

use crate::error::{Error, Result};

use super::{Attribute, single_value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageDigest {
    digest: OctetString,
}

impl MessageDigest {
    pub fn digest(&self) -> &[u8] {
        self.digest.as_bytes()
    }
}

impl Attribute for MessageDigest {
    const OID: &'static str = "1.2.840.113549.1.9.4";

    fn parse(values: &[Element]) -> Result<Self> {
        let Element::OctetString(digest) = single_value(values, "messageDigest")? else {
            return Err(Error::InvalidMessageDigest);
        };
        if digest.as_bytes().is_empty() {
            return Err(Error::EmptyValue("messageDigest"));
        }
        Ok(Self {
            digest: digest.clone(),
        })
    }
}
