//! ```asn1
//! IssuerAndSerialNumber ::= SEQUENCE {
//!     issuer Name,
//!     serialNumber CertificateSerialNumber }
//! ```
//!
//! How PKCS#7 and CMS signer infos point at their certificate.

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::Element;
use kensa_pkix_types::{CertificateSerialNumber, Name};
use serde::Serialize;

use crate::Certificate;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuerAndSerialNumber {
    pub issuer: Name,
    pub serial_number: CertificateSerialNumber,
}

impl IssuerAndSerialNumber {
    pub fn matches(&self, certificate: &Certificate) -> bool {
        self.serial_number == *certificate.serial_number() && self.issuer == *certificate.issuer()
    }
}

impl From<&Certificate> for IssuerAndSerialNumber {
    fn from(certificate: &Certificate) -> Self {
        Self {
            issuer: certificate.issuer().clone(),
            serial_number: certificate.serial_number().clone(),
        }
    }
}

impl DecodableFrom<Element> for IssuerAndSerialNumber {}

impl Decoder<Element, IssuerAndSerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<IssuerAndSerialNumber> {
        match self {
            Element::Sequence(elements) => match elements.as_slice() {
                [issuer, serial_number] => Ok(IssuerAndSerialNumber {
                    issuer: issuer.decode()?,
                    serial_number: serial_number.decode()?,
                }),
                _ => Err(Error::IssuerAndSerialNumberExpectedSequence),
            },
            _ => Err(Error::IssuerAndSerialNumberExpectedSequence),
        }
    }
}
