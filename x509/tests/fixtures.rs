use std::path::PathBuf;
use std::str::FromStr;

use kensa_pkix_types::NamedCurve;
use kensa_x509::extensions::{BasicConstraints, ExtendedKeyUsage, KeyUsage};
use kensa_x509::{Certificate, IssuerAndSerialNumber};

fn testdata(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("testdata")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_leaf_certificate() {
    let cert = Certificate::from_str(&testdata("leaf.pem")).unwrap();
    assert_eq!("42", cert.serial_number().to_string());
    assert_eq!(Some("Kensa Profile Signer"), cert.subject().common_name());
    assert_eq!(Some("Kensa Test CA"), cert.issuer().common_name());
    assert_eq!(Some(NamedCurve::P256), cert.subject_public_key_info().curve());
    assert_eq!(Some(256), cert.subject_public_key_info().key_size_bits());

    let key_usage = cert.extension::<KeyUsage>().unwrap().unwrap();
    assert_eq!(vec!["digitalSignature"], key_usage.names());

    let eku = cert.extension::<ExtendedKeyUsage>().unwrap().unwrap();
    assert_eq!(
        vec![ExtendedKeyUsage::CODE_SIGNING, ExtendedKeyUsage::EMAIL_PROTECTION],
        eku.purposes.iter().map(|oid| oid.to_string()).collect::<Vec<_>>()
    );
    assert_eq!(None, cert.extension::<BasicConstraints>().unwrap());
}

#[test]
fn test_leaf_record_json() {
    let record = Certificate::from_str(&testdata("leaf.pem"))
        .unwrap()
        .to_record()
        .unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!("2a", value["serial_hex"]);
    assert_eq!("2029-01-20", &value["validity"]["not_after"].as_str().unwrap()[..10]);
    assert_eq!(
        serde_json::json!(["codeSigning", "emailProtection"]),
        value["extensions"]["extKeyUsage"]["value"]
    );
    assert_eq!(
        serde_json::json!([{"dns_name": "signer.kensa.example"}]),
        value["extensions"]["subjectAltName"]["value"]
    );
}

#[test]
fn test_ca_issued_leaf() {
    let ca = Certificate::from_str(&testdata("ca.pem")).unwrap();
    let leaf = Certificate::from_str(&testdata("leaf.pem")).unwrap();

    let basic = ca.extension::<BasicConstraints>().unwrap().unwrap();
    assert!(basic.ca);
    assert_eq!("4096", ca.serial_number().to_string());
    assert_eq!(ca.subject(), leaf.issuer());

    let by_ca = IssuerAndSerialNumber::from(&ca);
    assert!(by_ca.matches(&ca));
    assert!(!by_ca.matches(&leaf));
}

#[test]
fn test_decode_is_idempotent() {
    let pem = testdata("self_signed.pem");
    let first = Certificate::from_str(&pem).unwrap().to_record().unwrap();
    let second = Certificate::from_str(&pem).unwrap().to_record().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_wrong_pem_label() {
    let pem = testdata("leaf.pem").replace("CERTIFICATE", "PKCS7");
    let err = Certificate::from_str(&pem).unwrap_err();
    assert!(format!("{:?}", err).contains("UnexpectedPemLabel"));
}
