//! PKCS#12 certificate extraction ([RFC 7292](https://datatracker.ietf.org/doc/html/rfc7292)).
//!
//! ```asn1
//! PFX ::= SEQUENCE {
//!     version     INTEGER {v3(3)}(v3,...),
//!     authSafe    ContentInfo,
//!     macData     MacData OPTIONAL
//! }
//!
//! AuthenticatedSafe ::= SEQUENCE OF ContentInfo
//!     -- Data if unencrypted
//!     -- EncryptedData if password-encrypted
//!     -- EnvelopedData if public key-encrypted
//! ```
//!
//! Only password integrity and password privacy modes are handled. Every
//! certificate bag found is returned as a [`CertificateRecord`] carrying the
//! bag's `friendlyName` and `localKeyId`; key material is never decrypted.
//!
//! # Example
//!
//! ```no_run
//! let bytes = std::fs::read("bundle.p12").unwrap();
//! for record in kensa_pkcs12::decode_certificates(&bytes).unwrap() {
//!     println!("{} (serial {})", record.subject, record.serial);
//! }
//! ```

#![forbid(unsafe_code)]

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ASN1Object, Element};
use kensa_cms::ContentInfo;
use kensa_cms::content_info::{OID_DATA, OID_ENCRYPTED_DATA};
use kensa_pkcs9::attribute::{FriendlyName, LocalKeyId};
use kensa_x509::Certificate;

pub mod encrypted_data;
pub mod error;
mod kdf;
pub mod mac;
mod passphrase;
pub mod pbe;
pub mod safe_bag;

pub use error::{Error, Result};
pub use kensa_x509::CertificateRecord;
pub use passphrase::Passphrase;

use encrypted_data::EncryptedData;
use mac::MacData;
use safe_bag::{BagValue, CertBag, SafeBag, SafeContents};

/// Extract every certificate using the empty passphrase.
pub fn decode_certificates(bytes: &[u8]) -> Result<Vec<CertificateRecord>> {
    decode(bytes, &Passphrase::empty())
}

/// Extract every certificate, verifying the MAC and decrypting with `passphrase`.
pub fn decode(bytes: &[u8], passphrase: &Passphrase) -> Result<Vec<CertificateRecord>> {
    let pfx = Pfx::from_ber(bytes)?;
    pfx.certificates(passphrase)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pfx {
    pub auth_safe: ContentInfo,
    pub mac_data: Option<MacData>,
}

impl Pfx {
    pub fn from_ber(bytes: &[u8]) -> Result<Self> {
        let element = ASN1Object::try_from(bytes)?.into_single()?;
        element.decode()
    }

    /// The authSafe content octets, which the MAC covers.
    fn auth_safe_octets(&self) -> Result<&[u8]> {
        if !self.auth_safe.is(OID_DATA) {
            return Err(Error::UnsupportedContentType(
                self.auth_safe.content_type.to_string(),
            ));
        }
        Ok(self.auth_safe.data()?)
    }

    pub fn certificates(&self, passphrase: &Passphrase) -> Result<Vec<CertificateRecord>> {
        let content = self.auth_safe_octets()?;
        let candidates = match &self.mac_data {
            Some(mac_data) => vec![mac_data.select(content, &passphrase.bmp_candidates())?.to_vec()],
            None => {
                tracing::debug!("no MacData, integrity not checked");
                passphrase.bmp_candidates()
            }
        };

        let auth_safe = ASN1Object::try_from(content)?.into_single()?;
        let Element::Sequence(content_infos) = auth_safe else {
            return Err(Error::AuthenticatedSafeExpectedSequence);
        };

        let mut records = Vec::new();
        for element in &content_infos {
            let content_info: ContentInfo = element.decode()?;
            let safe_contents = if content_info.is(OID_DATA) {
                SafeContents::from_der(content_info.data()?)?
            } else if content_info.is(OID_ENCRYPTED_DATA) {
                let encrypted: EncryptedData = content_info.content()?.decode()?;
                encrypted.decrypt(&candidates, passphrase.utf8())?
            } else {
                return Err(Error::UnsupportedContentType(
                    content_info.content_type.to_string(),
                ));
            };
            collect(&safe_contents, &mut records)?;
        }
        tracing::debug!(certificates = records.len(), "decoded PKCS#12");
        Ok(records)
    }
}

fn collect(contents: &SafeContents, records: &mut Vec<CertificateRecord>) -> Result<()> {
    for bag in contents.bags() {
        match &bag.value {
            BagValue::Cert(CertBag::X509(der)) => records.push(record(bag, der)?),
            BagValue::SafeContents(nested) => collect(nested, records)?,
            other => tracing::debug!(bag = other.name(), "skipping bag"),
        }
    }
    Ok(())
}

fn record(bag: &SafeBag, der: &[u8]) -> Result<CertificateRecord> {
    let friendly_name = bag.attributes.attribute::<FriendlyName>()?;
    let local_key_id = bag.attributes.attribute::<LocalKeyId>()?;
    let record = Certificate::from_der(der)?
        .to_record()?
        .with_friendly_name(friendly_name.map(FriendlyName::into_string))
        .with_local_key_id(local_key_id.map(LocalKeyId::into_octet_string));
    Ok(record)
}

impl DecodableFrom<Element> for Pfx {}

impl Decoder<Element, Pfx> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Pfx> {
        let Element::Sequence(elements) = self else {
            return Err(Error::PfxExpectedSequence);
        };
        let (version, auth_safe, mac_data) = match elements.as_slice() {
            [version, auth_safe] => (version, auth_safe, None),
            [version, auth_safe, mac_data] => (version, auth_safe, Some(mac_data)),
            _ => return Err(Error::PfxInvalidElementCount(elements.len())),
        };
        let Element::Integer(version) = version else {
            return Err(Error::PfxExpectedSequence);
        };
        if version.to_u32() != Some(3) {
            return Err(Error::PfxUnsupportedVersion(version.as_bigint().to_string()));
        }
        let auth_safe: ContentInfo = auth_safe.decode()?;
        let mac_data: Option<MacData> = mac_data.map(|elem| elem.decode()).transpose()?;
        Ok(Pfx {
            auth_safe,
            mac_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use kensa::error::{Categorize, ErrorKind};
    use rstest::rstest;

    use super::*;

    // SEQUENCE { 3, SEQUENCE { data, [0] { OCTET STRING { SEQUENCE {} } } } }
    const EMPTY_AUTH_SAFE: &[u8] = &[
        0x30, 0x16, 0x02, 0x01, 0x03, 0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7,
        0x0d, 0x01, 0x07, 0x01, 0xa0, 0x04, 0x04, 0x02, 0x30, 0x00,
    ];

    #[test]
    fn test_pfx_without_mac_and_bags() {
        let pfx = Pfx::from_ber(EMPTY_AUTH_SAFE).unwrap();
        assert!(pfx.mac_data.is_none());
        assert!(decode_certificates(EMPTY_AUTH_SAFE).unwrap().is_empty());
    }

    #[rstest]
    #[case::empty_input(&[0u8; 0], "Empty", ErrorKind::Parse)]
    #[case::not_sequence(&[0x05, 0x00], "PfxExpectedSequence", ErrorKind::Parse)]
    #[case::version_only(&[0x30, 0x03, 0x02, 0x01, 0x03], "PfxInvalidElementCount", ErrorKind::Parse)]
    #[case::version_1(
        &[0x30, 0x16, 0x02, 0x01, 0x01, 0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7,
          0x0d, 0x01, 0x07, 0x01, 0xa0, 0x04, 0x04, 0x02, 0x30, 0x00],
        "PfxUnsupportedVersion",
        ErrorKind::Parse
    )]
    #[case::signed_data_auth_safe(
        &[0x30, 0x16, 0x02, 0x01, 0x03, 0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7,
          0x0d, 0x01, 0x07, 0x02, 0xa0, 0x04, 0x04, 0x02, 0x30, 0x00],
        "UnsupportedContentType",
        ErrorKind::UnsupportedContentType
    )]
    #[case::auth_safe_not_sequence(
        &[0x30, 0x16, 0x02, 0x01, 0x03, 0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7,
          0x0d, 0x01, 0x07, 0x01, 0xa0, 0x04, 0x04, 0x02, 0x05, 0x00],
        "AuthenticatedSafeExpectedSequence",
        ErrorKind::Parse
    )]
    #[case::mac_iterations_too_large(
        &[0x30, 0x4b, 0x02, 0x01, 0x03, 0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7,
          0x0d, 0x01, 0x07, 0x01, 0xa0, 0x04, 0x04, 0x02, 0x30, 0x00, 0x30, 0x33, 0x30, 0x21,
          0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04, 0x14, 0x00,
          0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
          0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x08, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01,
          0x01, 0x02, 0x04, 0x7f, 0xff, 0xff, 0xff],
        "IterationCountOutOfRange",
        ErrorKind::Parse
    )]
    fn test_decode_error(#[case] der: &[u8], #[case] variant: &str, #[case] kind: ErrorKind) {
        let err = decode_certificates(der).unwrap_err();
        assert!(format!("{:?}", err).contains(variant), "{:?}", err);
        assert_eq!(kind, err.kind());
    }
}
