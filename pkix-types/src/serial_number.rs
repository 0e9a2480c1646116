//! Certificate Serial Number
//!
//! Defined in RFC 5280 Section 4.1.2.2
//!
//! ```asn1
//! CertificateSerialNumber ::= INTEGER
//! ```
//!
//! Conforming CAs keep serials positive and at most 20 octets, but real
//! certificates break both rules, so any INTEGER is accepted here.

use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, Integer};
use serde::Serialize;

use crate::error::{Error, Result};

/// Serialized as a decimal string; see [`CertificateSerialNumber::format_hex`]
/// for the OpenSSL style rendering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CertificateSerialNumber {
    inner: Integer,
}

impl CertificateSerialNumber {
    pub fn as_integer(&self) -> &Integer {
        &self.inner
    }

    /// Lowercase hex with colon separators, e.g. `00:f7:e9:eb`.
    pub fn format_hex(&self) -> String {
        self.inner
            .to_signed_bytes_be()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl From<Integer> for CertificateSerialNumber {
    fn from(inner: Integer) -> Self {
        Self { inner }
    }
}

impl fmt::Display for CertificateSerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Serialize for CertificateSerialNumber {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.inner)
    }
}

impl DecodableFrom<Element> for CertificateSerialNumber {}

impl Decoder<Element, CertificateSerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateSerialNumber> {
        match self {
            Element::Integer(integer) => Ok(CertificateSerialNumber::from(integer.clone())),
            _ => Err(Error::CertificateSerialNumberExpectedInteger),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::small(&[0x01], "1", "01")]
    #[case::leading_zero(&[0x00, 0xf7, 0xe9, 0xeb], "16247275", "00:f7:e9:eb")]
    #[case::negative(&[0xff], "-1", "ff")]
    #[case::twenty_octets(
        &[0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
        "730750818665451459101842416358141509827966271487",
        "7f:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff:ff"
    )]
    fn test_serial_number_decode(#[case] input: &[u8], #[case] decimal: &str, #[case] hex: &str) {
        let serial: CertificateSerialNumber = Element::Integer(Integer::from(input)).decode().unwrap();
        assert_eq!(decimal, serial.to_string());
        assert_eq!(hex, serial.format_hex());
        assert_eq!(format!("\"{}\"", decimal), serde_json::to_string(&serial).unwrap());
    }

    #[test]
    fn test_serial_number_decode_rejects_non_integer() {
        let result: Result<CertificateSerialNumber> = Element::Null.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains("CertificateSerialNumberExpectedInteger"));
    }
}
