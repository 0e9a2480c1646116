//! PKIX (Public Key Infrastructure using X.509) Common Types
//!
//! Types shared by certificates, PKCS#12 bags and CMS signer infos:
//! - RFC 5280: Name, AlgorithmIdentifier, SubjectPublicKeyInfo, Extension
//! - RFC 5480: named elliptic curves
//! - RFC 8018 / RFC 7292 / RFC 5754: algorithm OIDs used by kensa

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod directory_string;
pub mod error;
pub mod extension;
pub mod name;
pub mod oid_name;
pub mod serial_number;
pub mod subject_public_key_info;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters, DigestAlgorithm, NamedCurve};
pub use directory_string::DirectoryString;
pub use error::{Error, Result};
pub use extension::Extension;
pub use name::{AttributeTypeAndValue, Name, RelativeDistinguishedName};
pub use oid_name::OidName;
pub use serial_number::CertificateSerialNumber;
pub use subject_public_key_info::SubjectPublicKeyInfo;
