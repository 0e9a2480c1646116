//! DirectoryString type as defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! DirectoryString ::= CHOICE {
//!   teletexString     TeletexString (SIZE (1..MAX)),
//!   printableString   PrintableString (SIZE (1..MAX)),
//!   universalString   UniversalString (SIZE (1..MAX)),
//!   utf8String        UTF8String (SIZE (1..MAX)),
//!   bmpString         BMPString (SIZE (1..MAX))
//! }
//! ```
//!
//! IA5String is accepted as well since emailAddress and domainComponent use it.

use std::fmt;
use std::ops::Deref;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::Element;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryString {
    inner: String,
}

impl DirectoryString {
    pub fn new(value: String) -> Self {
        Self { inner: value }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Serialize for DirectoryString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl Deref for DirectoryString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for DirectoryString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for DirectoryString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl DecodableFrom<Element> for DirectoryString {}

impl Decoder<Element, DirectoryString> for Element {
    type Error = Error;

    fn decode(&self) -> Result<DirectoryString> {
        match self {
            Element::UTF8String(s)
            | Element::PrintableString(s)
            | Element::IA5String(s)
            | Element::T61String(s) => Ok(DirectoryString::new(s.clone())),
            Element::BMPString(s) => Ok(DirectoryString::new(s.as_str().to_string())),
            _ => Err(Error::DirectoryStringExpectedStringType),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::utf8(Element::UTF8String("Kensa 検査".to_string()), "Kensa 検査")]
    #[case::printable(Element::PrintableString("JP".to_string()), "JP")]
    #[case::ia5(Element::IA5String("dev@example.com".to_string()), "dev@example.com")]
    #[case::t61(Element::T61String("Müller".to_string()), "Müller")]
    fn test_directory_string_decode(#[case] input: Element, #[case] expected: &str) {
        let decoded: DirectoryString = input.decode().unwrap();
        assert_eq!(expected, decoded.as_str());
    }

    #[test]
    fn test_directory_string_decode_bmp() {
        let bmp = kensa_asn1::BMPString::try_from([0x00, 0x4b, 0x00, 0x65].as_slice()).unwrap();
        let decoded: DirectoryString = Element::BMPString(bmp).decode().unwrap();
        assert_eq!("Ke", decoded.as_str());
    }

    #[test]
    fn test_directory_string_decode_rejects_non_string() {
        let result: Result<DirectoryString> = Element::Null.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains("DirectoryStringExpectedStringType"));
    }
}
