//! Signed configuration profiles: a CMS SignedData message whose content is
//! an XML or binary property list.
//!
//! [`decode_and_verify`] verifies the signature with [`kensa_cms::verify`]
//! first; the property list is parsed only when a signer verified.
//!
//! # Example
//!
//! ```no_run
//! let bytes = std::fs::read("wifi.mobileconfig").unwrap();
//! let profile = kensa_profile::decode_and_verify(&bytes).unwrap();
//! println!("{:?}", profile.get("PayloadDisplayName"));
//! ```

#![forbid(unsafe_code)]

use std::io::Cursor;

pub mod error;
pub mod value;

pub use error::{Error, Result};
pub use value::DecodedValue;

const BINARY_MAGIC: &[u8] = b"bplist00";

/// Property list encodings, told apart by their header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlistFormat {
    Xml,
    Binary,
}

impl PlistFormat {
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(BINARY_MAGIC) {
            PlistFormat::Binary
        } else {
            PlistFormat::Xml
        }
    }
}

/// Verify a signed profile and decode its property list payload.
pub fn decode_and_verify(bytes: &[u8]) -> Result<DecodedValue> {
    let payload = kensa_cms::verify(bytes)?;
    decode(&payload.content)
}

/// Decode an (already verified) property list.
pub fn decode(content: &[u8]) -> Result<DecodedValue> {
    let format = PlistFormat::detect(content);
    tracing::debug!(?format, bytes = content.len(), "decoding property list");
    let value = match format {
        PlistFormat::Binary => plist::Value::from_reader(Cursor::new(content))?,
        PlistFormat::Xml => plist::Value::from_reader_xml(content)?,
    };
    DecodedValue::try_from(value)
}

#[cfg(test)]
mod tests {
    use kensa::error::{Categorize, ErrorKind};
    use rstest::rstest;

    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>PayloadVersion</key>
	<integer>1</integer>
</dict>
</plist>
"#;

    #[rstest]
    #[case::binary(b"bplist00\xd0\x08".as_slice(), PlistFormat::Binary)]
    #[case::xml(XML.as_bytes(), PlistFormat::Xml)]
    #[case::text(b"this is not a property list".as_slice(), PlistFormat::Xml)]
    fn test_detect(#[case] input: &[u8], #[case] expected: PlistFormat) {
        assert_eq!(expected, PlistFormat::detect(input));
    }

    #[test]
    fn test_decode_xml() {
        let value = decode(XML.as_bytes()).unwrap();
        assert_eq!(Some(1), value.get("PayloadVersion").and_then(DecodedValue::as_integer));
    }

    #[rstest]
    #[case::text(b"this is not a property list".as_slice())]
    #[case::truncated_binary(b"bplist00".as_slice())]
    #[case::empty(b"".as_slice())]
    fn test_decode_malformed(#[case] input: &[u8]) {
        let err = decode(input).unwrap_err();
        assert_eq!(ErrorKind::Parse, err.kind());
    }
}
