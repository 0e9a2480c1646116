use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kensa_asn1::OctetString;
use kensa_pkix_types::{AlgorithmIdentifier, CertificateSerialNumber, Name, SubjectPublicKeyInfo};
use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::extensions::ExtensionEntry;
use crate::{Certificate, Validity};

/// One decoded certificate, flattened for callers.
///
/// Serial numbers serialize as decimal strings next to a colon separated
/// hex form; the raw DER serializes as standard base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    pub version: u8,
    pub subject: Name,
    pub issuer: Name,
    pub serial: CertificateSerialNumber,
    pub serial_hex: String,
    pub validity: Validity,
    pub signature_algorithm: AlgorithmIdentifier,
    pub public_key: SubjectPublicKeyInfo,
    pub extensions: BTreeMap<String, ExtensionEntry>,
    pub fingerprints: Fingerprints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_key_id: Option<OctetString>,
    #[serde(serialize_with = "serialize_base64")]
    pub der: Vec<u8>,
}

impl CertificateRecord {
    pub fn with_friendly_name(mut self, name: Option<String>) -> Self {
        self.friendly_name = name;
        self
    }

    pub fn with_local_key_id(mut self, id: Option<OctetString>) -> Self {
        self.local_key_id = id;
        self
    }
}

impl TryFrom<&Certificate> for CertificateRecord {
    type Error = Error;

    fn try_from(cert: &Certificate) -> Result<Self> {
        let tbs = cert.tbs_certificate();
        let extensions = match &tbs.extensions {
            Some(extensions) => extensions.to_map()?,
            None => BTreeMap::new(),
        };
        tracing::trace!(
            subject = %tbs.subject,
            extensions = extensions.len(),
            "projected certificate record"
        );
        Ok(CertificateRecord {
            version: tbs.version.number(),
            subject: tbs.subject.clone(),
            issuer: tbs.issuer.clone(),
            serial: tbs.serial_number.clone(),
            serial_hex: tbs.serial_number.format_hex(),
            validity: tbs.validity,
            signature_algorithm: cert.signature_algorithm().clone(),
            public_key: tbs.subject_public_key_info.clone(),
            extensions,
            fingerprints: Fingerprints::of(cert.der()),
            friendly_name: None,
            local_key_id: None,
            der: cert.der().to_vec(),
        })
    }
}

/// Lowercase hex digests of the certificate DER.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprints {
    pub sha1: String,
    pub sha256: String,
}

impl Fingerprints {
    pub fn of(der: &[u8]) -> Self {
        Self {
            sha1: hex(&Sha1::digest(der)),
            sha256: hex(&Sha256::digest(der)),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn serialize_base64<S>(der: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&STANDARD.encode(der))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn self_signed() -> Certificate {
        Certificate::from_str(include_str!("../../testdata/self_signed.pem")).unwrap()
    }

    #[test]
    fn test_record_from_self_signed() {
        let record = self_signed().to_record().unwrap();
        assert_eq!(3, record.version);
        assert_eq!("1", record.serial.to_string());
        assert_eq!("01", record.serial_hex);
        assert_eq!(record.subject, record.issuer);
        assert_eq!(Some(2048), record.public_key.key_size_bits());
        assert_eq!(
            vec![
                "authorityKeyIdentifier",
                "basicConstraints",
                "keyUsage",
                "subjectAltName",
                "subjectKeyIdentifier",
            ],
            record.extensions.keys().collect::<Vec<_>>()
        );
        assert!(record.extensions["basicConstraints"].critical);
        assert_eq!(40, record.fingerprints.sha1.len());
        assert_eq!(64, record.fingerprints.sha256.len());
    }

    #[test]
    fn test_record_serialize() {
        let record = self_signed()
            .to_record()
            .unwrap()
            .with_friendly_name(Some("kensa".to_string()));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!("1", value["serial"]);
        assert_eq!("kensa", value["friendly_name"]);
        assert!(value.get("local_key_id").is_none());
        assert_eq!(
            serde_json::json!(["digitalSignature", "keyCertSign"]),
            value["extensions"]["keyUsage"]["value"]
        );
        let der = STANDARD.decode(value["der"].as_str().unwrap()).unwrap();
        assert_eq!(record.der, der);
    }

    #[test]
    fn test_fingerprints_known_input() {
        let fp = Fingerprints::of(b"abc");
        assert_eq!("a9993e364706816aba3e25717850c26c9cd0d89d", fp.sha1);
        assert_eq!(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            fp.sha256
        );
    }
}
