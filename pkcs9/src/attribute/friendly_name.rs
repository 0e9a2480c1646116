//! PKCS#9 friendlyName attribute (OID: 1.2.840.113549.1.9.20)
//!
//! ```asn1
//! friendlyName ATTRIBUTE ::= {
//!     WITH SYNTAX BMPString (SIZE(1..pkcs-9-ub-friendlyName))
//!     SINGLE VALUE TRUE
//!     ID pkcs-9-at-friendlyName
//! }
//! ```
//!
//! PKCS#12 writers attach it to certificate and key bags as a display name.

use std::fmt;

use kensa_asn1::Element;
use serde::Serialize;

use crate::error::{Error, Result};

use super::{Attribute, single_value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FriendlyName {
    name: String,
}

impl FriendlyName {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for FriendlyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Attribute for FriendlyName {
    const OID: &'static str = "1.2.840.113549.1.9.20";

    fn parse(values: &[Element]) -> Result<Self> {
        let Element::BMPString(bmp) = single_value(values, "friendlyName")? else {
            return Err(Error::InvalidFriendlyName);
        };
        if bmp.as_str().is_empty() {
            return Err(Error::EmptyValue("friendlyName"));
        }
        Ok(Self {
            name: bmp.as_str().to_string(),
        })
    }
}
