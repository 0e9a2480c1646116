//! PKCS#9 signingTime attribute (OID: 1.2.840.113549.1.9.5)
//!
//! ```asn1
//! SigningTime ::= Time -- imported from ISO/IEC 9594-8
//! ```
//!
//! Dates between 1950 and 2049 are UTCTime, anything else GeneralizedTime.
//! Both are accepted regardless of the year.

use chrono::{DateTime, Utc};
use kensa_asn1::Element;
use serde::Serialize;

use crate::error::{Error, Result};

use super::{Attribute, single_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SigningTime {
    time: DateTime<Utc>,
}

impl SigningTime {
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }
}

impl Attribute for SigningTime {
    const OID: &'static str = "1.2.840.113549.1.9.5";

    fn parse(values: &[Element]) -> Result<Self> {
        match single_value(values, "signingTime")? {
            Element::UTCTime(t) | Element::GeneralizedTime(t) => Ok(Self { time: t.and_utc() }),
            _ => Err(Error::InvalidSigningTime),
        }
    }
}
