//! X.509 certificate decoding ([RFC 5280](https://datatracker.ietf.org/doc/html/rfc5280)).
//!
//! ```asn1
//! Certificate  ::=  SEQUENCE  {
//!     tbsCertificate       TBSCertificate,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signatureValue       BIT STRING
//! }
//!
//! TBSCertificate  ::=  SEQUENCE  {
//!     version         [0]  EXPLICIT Version DEFAULT v1,
//!     serialNumber         CertificateSerialNumber,
//!     signature            AlgorithmIdentifier,
//!     issuer               Name,
//!     validity             Validity,
//!     subject              Name,
//!     subjectPublicKeyInfo SubjectPublicKeyInfo,
//!     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     extensions      [3]  EXPLICIT Extensions OPTIONAL
//! }
//! ```
//!
//! A decoded [`Certificate`] is projected into a [`CertificateRecord`], the
//! serializable shape handed to callers.

#![forbid(unsafe_code)]

use std::str::FromStr;

use chrono::{DateTime, Utc};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{BitString, Element};
use kensa_der::Der;
use kensa_pem::{Label, Pem};
use kensa_pkix_types::{
    AlgorithmIdentifier, CertificateSerialNumber, Name, SubjectPublicKeyInfo,
};
use serde::Serialize;

pub mod error;
pub mod extensions;
mod issuer_serial;
mod record;

pub use error::{Error, Result};
pub use issuer_serial::IssuerAndSerialNumber;
pub use record::{CertificateRecord, Fingerprints};

use extensions::{Extension, Extensions, SubjectKeyIdentifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    tbs_certificate: TBSCertificate,
    signature_algorithm: AlgorithmIdentifier,
    signature_value: BitString,
    der: Vec<u8>,
}

impl Certificate {
    /// Decode a DER certificate. The input must hold exactly one element.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        der.decode()
    }

    pub fn tbs_certificate(&self) -> &TBSCertificate {
        &self.tbs_certificate
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    pub fn signature_value(&self) -> &BitString {
        &self.signature_value
    }

    /// DER encoding of the whole certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn issuer(&self) -> &Name {
        &self.tbs_certificate.issuer
    }

    pub fn subject(&self) -> &Name {
        &self.tbs_certificate.subject
    }

    pub fn serial_number(&self) -> &CertificateSerialNumber {
        &self.tbs_certificate.serial_number
    }

    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.tbs_certificate.subject_public_key_info
    }

    pub fn extension<T: Extension>(&self) -> Result<Option<T>> {
        match &self.tbs_certificate.extensions {
            Some(extensions) => extensions.extension::<T>(),
            None => Ok(None),
        }
    }

    /// Subject key identifier, if the certificate carries a well-formed one.
    pub fn subject_key_identifier(&self) -> Option<Vec<u8>> {
        self.extension::<SubjectKeyIdentifier>()
            .ok()
            .flatten()
            .map(|ski| ski.key_identifier.into_bytes())
    }

    pub fn to_record(&self) -> Result<CertificateRecord> {
        CertificateRecord::try_from(self)
    }
}

impl DecodableFrom<&[u8]> for Certificate {}

impl Decoder<&[u8], Certificate> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Certificate> {
        let der = Der::parse(self).map_err(kensa_asn1::error::Error::from)?;
        let [tlv] = der.elements() else {
            let count = der.elements().len();
            return Err(kensa_asn1::error::Error::ExpectedSingleElement(count).into());
        };
        let element = Element::try_from(tlv)?;
        let (tbs_certificate, signature_algorithm, signature_value) = decode_parts(&element)?;
        Ok(Certificate {
            tbs_certificate,
            signature_algorithm,
            signature_value,
            der: tlv.to_der(),
        })
    }
}

fn decode_parts(element: &Element) -> Result<(TBSCertificate, AlgorithmIdentifier, BitString)> {
    let Element::Sequence(elements) = element else {
        return Err(Error::CertificateExpectedSequence);
    };
    match elements.as_slice() {
        [tbs, algorithm, Element::BitString(signature)] => {
            let tbs: TBSCertificate = tbs.decode()?;
            let algorithm: AlgorithmIdentifier = algorithm.decode()?;
            Ok((tbs, algorithm, signature.clone()))
        }
        [_, _, _] => Err(Error::CertificateExpectedBitString),
        _ => Err(Error::CertificateInvalidElementCount(elements.len())),
    }
}

impl FromStr for Certificate {
    type Err = Error;

    /// Parse a PEM `CERTIFICATE` block.
    fn from_str(s: &str) -> Result<Self> {
        let pem = Pem::from_str(s)?;
        if pem.label() != Label::Certificate {
            return Err(Error::UnexpectedPemLabel(pem.label()));
        }
        let der: Vec<u8> = pem.decode()?;
        Certificate::from_der(&der)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TBSCertificate {
    pub version: Version,
    pub serial_number: CertificateSerialNumber,
    pub signature: AlgorithmIdentifier,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfo,
    pub extensions: Option<Extensions>,
}

impl DecodableFrom<Element> for TBSCertificate {}

impl Decoder<Element, TBSCertificate> for Element {
    type Error = Error;

    fn decode(&self) -> Result<TBSCertificate> {
        let Element::Sequence(elements) = self else {
            return Err(Error::TbsCertificateExpectedSequence);
        };
        let mut iter = elements.iter().peekable();

        let version: Version = match iter.next_if(|elem| elem.context_slot() == Some(0)) {
            Some(elem) => elem.explicit()?.decode()?,
            None => Version::V1,
        };
        let mut next =
            |field: &'static str| iter.next().ok_or(Error::TbsCertificateMissingField(field));
        let serial_number: CertificateSerialNumber = next("serialNumber")?.decode()?;
        let signature: AlgorithmIdentifier = next("signature")?.decode()?;
        let issuer: Name = next("issuer")?.decode()?;
        let validity: Validity = next("validity")?.decode()?;
        let subject: Name = next("subject")?.decode()?;
        let subject_public_key_info: SubjectPublicKeyInfo =
            next("subjectPublicKeyInfo")?.decode()?;

        let mut extensions: Option<Extensions> = None;
        for elem in iter {
            match elem.context_slot() {
                // issuerUniqueID / subjectUniqueID are obsolete and ignored
                Some(1) | Some(2) => {}
                Some(3) => extensions = Some(elem.explicit()?.decode()?),
                _ => return Err(Error::TbsCertificateUnexpectedElement),
            }
        }

        Ok(TBSCertificate {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            extensions,
        })
    }
}

/// ```asn1
/// Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    /// The human numbering (1 to 3), not the encoded value.
    pub fn number(&self) -> u8 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2,
            Version::V3 => 3,
        }
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        let Element::Integer(value) = self else {
            return Err(Error::VersionExpectedInteger);
        };
        match value.to_i64() {
            Some(0) => Ok(Version::V1),
            Some(1) => Ok(Version::V2),
            Some(2) => Ok(Version::V3),
            _ => Err(Error::VersionUnknown(value.to_string())),
        }
    }
}

/// ```asn1
/// Validity ::= SEQUENCE {
///      notBefore      Time,
///      notAfter       Time  }
///
/// Time ::= CHOICE {
///      utcTime        UTCTime,
///      generalTime    GeneralizedTime }
/// ```
///
/// Decoding rejects a window whose notBefore is later than its notAfter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Validity {
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

fn time(element: &Element) -> Result<DateTime<Utc>> {
    match element {
        Element::UTCTime(t) | Element::GeneralizedTime(t) => Ok(t.and_utc()),
        _ => Err(Error::ValidityExpectedTime),
    }
}

impl DecodableFrom<Element> for Validity {}

impl Decoder<Element, Validity> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Validity> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ValidityExpectedSequence);
        };
        let [not_before, not_after] = elements.as_slice() else {
            return Err(Error::ValidityExpectedSequence);
        };
        let (not_before, not_after) = (time(not_before)?, time(not_after)?);
        if not_before > not_after {
            return Err(Error::ValidityNotBeforeAfterNotAfter {
                not_before,
                not_after,
            });
        }
        Ok(Validity {
            not_before,
            not_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use kensa_asn1::Integer;
    use rstest::rstest;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[rstest]
    #[case::utc_times(Element::UTCTime(at(2024, 1, 1)), Element::UTCTime(at(2034, 1, 1)))]
    #[case::mixed(Element::UTCTime(at(2024, 1, 1)), Element::GeneralizedTime(at(2050, 1, 1)))]
    #[case::same_instant(Element::UTCTime(at(2024, 1, 1)), Element::UTCTime(at(2024, 1, 1)))]
    fn test_validity_decode(#[case] not_before: Element, #[case] not_after: Element) {
        let validity: Validity = Element::Sequence(vec![not_before, not_after]).decode().unwrap();
        assert!(validity.not_before <= validity.not_after);
    }

    #[test]
    fn test_validity_times_are_utc() {
        let validity: Validity = Element::Sequence(vec![
            Element::UTCTime(at(2024, 1, 1)),
            Element::GeneralizedTime(at(2050, 1, 1)),
        ])
        .decode()
        .unwrap();
        assert_eq!(at(2024, 1, 1).and_utc(), validity.not_before);
        assert_eq!(at(2050, 1, 1).and_utc(), validity.not_after);
    }

    #[test]
    fn test_validity_rejects_inverted_window() {
        let input = Element::Sequence(vec![
            Element::UTCTime(at(2030, 1, 1)),
            Element::UTCTime(at(2020, 1, 1)),
        ]);
        let result: Result<Validity> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains("ValidityNotBeforeAfterNotAfter"));
    }

    #[test]
    fn test_validity_serialize_rfc3339() {
        let validity = Validity {
            not_before: at(2030, 1, 2).and_utc(),
            not_after: at(2031, 1, 2).and_utc(),
        };
        assert_eq!(
            r#"{"not_before":"2030-01-02T00:00:00Z","not_after":"2031-01-02T00:00:00Z"}"#,
            serde_json::to_string(&validity).unwrap()
        );
    }

    #[rstest]
    #[case::v1(0, Version::V1)]
    #[case::v2(1, Version::V2)]
    #[case::v3(2, Version::V3)]
    fn test_version_decode(#[case] input: i64, #[case] expected: Version) {
        let version: Version = Element::Integer(Integer::from(input)).decode().unwrap();
        assert_eq!(expected, version);
    }

    #[test]
    fn test_version_decode_unknown() {
        let result: Result<Version> = Element::Integer(Integer::from(3)).decode();
        assert!(format!("{:?}", result.unwrap_err()).contains("VersionUnknown"));
    }

    #[test]
    fn test_certificate_from_pem() {
        let cert = Certificate::from_str(include_str!("../../testdata/self_signed.pem")).unwrap();
        assert_eq!(Version::V3, cert.tbs_certificate().version);
        assert_eq!(cert.subject(), cert.issuer());
        assert_eq!("1", cert.serial_number().to_string());
        assert!(cert.subject_key_identifier().is_some());
    }

    #[rstest]
    #[case::empty(&[], "Empty")]
    #[case::not_sequence(&[0x05, 0x00], "CertificateExpectedSequence")]
    #[case::short_sequence(&[0x30, 0x00], "CertificateInvalidElementCount")]
    #[case::two_elements(&[0x05, 0x00, 0x05, 0x00], "ExpectedSingleElement")]
    fn test_certificate_from_der_error(#[case] input: &[u8], #[case] variant: &str) {
        let err = Certificate::from_der(input).unwrap_err();
        assert!(format!("{:?}", err).contains(variant), "{:?}", err);
    }
}
