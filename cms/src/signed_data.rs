//! ```asn1
//! SignedData ::= SEQUENCE {
//!     version CMSVersion,
//!     digestAlgorithms DigestAlgorithmIdentifiers,
//!     encapContentInfo EncapsulatedContentInfo,
//!     certificates [0] IMPLICIT CertificateSet OPTIONAL,
//!     crls [1] IMPLICIT RevocationInfoChoices OPTIONAL,
//!     signerInfos SignerInfos }
//!
//! EncapsulatedContentInfo ::= SEQUENCE {
//!     eContentType ContentType,
//!     eContent [0] EXPLICIT OCTET STRING OPTIONAL }
//! ```
//!
//! Only `certificate` choices of the CertificateSet are kept; attribute
//! certificates and revocation info are ignored.

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, ObjectIdentifier};
use kensa_pkix_types::AlgorithmIdentifier;
use kensa_x509::Certificate;

use crate::error::{Error, Result};
use crate::signer_info::SignerInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncapsulatedContentInfo {
    pub content_type: ObjectIdentifier,
    pub content: Vec<u8>,
}

impl DecodableFrom<Element> for EncapsulatedContentInfo {}

impl Decoder<Element, EncapsulatedContentInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EncapsulatedContentInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::EncapsulatedContentInfoExpectedSequence);
        };
        match elements.as_slice() {
            [Element::ObjectIdentifier(_)] => Err(Error::DetachedContent),
            [Element::ObjectIdentifier(oid), content] if content.context_slot() == Some(0) => {
                match content.explicit()? {
                    Element::OctetString(octets) => Ok(EncapsulatedContentInfo {
                        content_type: oid.clone(),
                        content: octets.into_bytes(),
                    }),
                    _ => Err(Error::EncapsulatedContentExpectedOctetString),
                }
            }
            _ => Err(Error::EncapsulatedContentInfoExpectedSequence),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData {
    pub version: u32,
    pub digest_algorithms: Vec<AlgorithmIdentifier>,
    pub encap_content_info: EncapsulatedContentInfo,
    pub certificates: Vec<Certificate>,
    pub signer_infos: Vec<SignerInfo>,
}

impl SignedData {
    /// The first embedded certificate the signer identifier points at.
    pub fn signer_certificate(&self, signer: &SignerInfo) -> Option<&Certificate> {
        self.certificates.iter().find(|cert| signer.sid.matches(cert))
    }
}

fn certificate_set(element: &Element) -> Result<Vec<Certificate>> {
    let Element::ContextSpecific { tlv, .. } = element else {
        return Err(Error::SignedDataUnexpectedElement(element.to_string()));
    };
    let Some(choices) = tlv.tlvs() else {
        return Err(Error::SignedDataUnexpectedElement(element.to_string()));
    };
    let mut certificates = Vec::with_capacity(choices.len());
    for choice in choices {
        if choice.tag().is_constructed() && choice.tag().identifier() == 0x30 {
            certificates.push(Certificate::from_der(&choice.to_der())?);
        } else {
            tracing::debug!(tag = choice.tag().identifier(), "skipping non-X.509 certificate choice");
        }
    }
    Ok(certificates)
}

impl DecodableFrom<Element> for SignedData {}

impl Decoder<Element, SignedData> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SignedData> {
        let Element::Sequence(elements) = self else {
            return Err(Error::SignedDataExpectedSequence);
        };
        let mut fields = elements.iter().peekable();

        let version = match fields.next() {
            Some(Element::Integer(version)) => {
                version.to_u32().ok_or(Error::SignedDataInvalidVersion)?
            }
            _ => return Err(Error::SignedDataInvalidVersion),
        };
        let digest_algorithms = match fields.next() {
            Some(Element::Set(algorithms)) => algorithms
                .iter()
                .map(|elem| elem.decode())
                .collect::<kensa_pkix_types::Result<Vec<AlgorithmIdentifier>>>()?,
            _ => return Err(Error::DigestAlgorithmsExpectedSet),
        };
        let encap_content_info: EncapsulatedContentInfo = fields
            .next()
            .ok_or(Error::EncapsulatedContentInfoExpectedSequence)?
            .decode()?;
        let certificates = match fields.next_if(|elem| elem.context_slot() == Some(0)) {
            Some(elem) => certificate_set(elem)?,
            None => Vec::new(),
        };
        fields.next_if(|elem| elem.context_slot() == Some(1));
        let signer_infos = match fields.next() {
            Some(Element::Set(signers)) => signers
                .iter()
                .map(|elem| elem.decode())
                .collect::<Result<Vec<SignerInfo>>>()?,
            _ => return Err(Error::SignerInfosExpectedSet),
        };
        if let Some(extra) = fields.next() {
            return Err(Error::SignedDataUnexpectedElement(extra.to_string()));
        }

        Ok(SignedData {
            version,
            digest_algorithms,
            encap_content_info,
            certificates,
            signer_infos,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use kensa_asn1::{Integer, OctetString};
    use rstest::rstest;

    use super::*;
    use crate::content_info::OID_DATA;

    fn data_oid() -> Element {
        Element::ObjectIdentifier(ObjectIdentifier::from_str(OID_DATA).unwrap())
    }

    #[test]
    fn test_signed_data_without_certificates_or_signers() {
        // SEQUENCE { 1, SET {}, SEQUENCE { data, [0] { OCTET STRING "hi" } }, SET {} }
        let der = [
            0x30, 0x1a, 0x02, 0x01, 0x01, 0x31, 0x00, 0x30, 0x11, 0x06, 0x09, 0x2a, 0x86, 0x48,
            0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01, 0xa0, 0x04, 0x04, 0x02, b'h', b'i', 0x31, 0x00,
        ];
        let element = kensa_asn1::ASN1Object::try_from(der.as_slice())
            .unwrap()
            .into_single()
            .unwrap();
        let signed: SignedData = element.decode().unwrap();
        assert_eq!(1, signed.version);
        assert!(signed.digest_algorithms.is_empty());
        assert_eq!(OID_DATA, signed.encap_content_info.content_type.to_string());
        assert_eq!(b"hi".to_vec(), signed.encap_content_info.content);
        assert!(signed.certificates.is_empty());
        assert!(signed.signer_infos.is_empty());
    }

    #[rstest]
    #[case::detached(Element::Sequence(vec![data_oid()]), "DetachedContent")]
    #[case::not_sequence(Element::Null, "EncapsulatedContentInfoExpectedSequence")]
    #[case::untagged_content(
        Element::Sequence(vec![data_oid(), Element::OctetString(OctetString::from(vec![1]))]),
        "EncapsulatedContentInfoExpectedSequence"
    )]
    fn test_encapsulated_content_info_error(#[case] input: Element, #[case] variant: &str) {
        let result: Result<EncapsulatedContentInfo> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains(variant));
    }

    #[rstest]
    #[case::not_sequence(Element::Null, "SignedDataExpectedSequence")]
    #[case::no_version(Element::Sequence(vec![]), "SignedDataInvalidVersion")]
    #[case::digest_algorithms_sequence(
        Element::Sequence(vec![Element::Integer(Integer::from(1i64)), Element::Sequence(vec![])]),
        "DigestAlgorithmsExpectedSet"
    )]
    #[case::no_signer_infos(
        Element::Sequence(vec![
            Element::Integer(Integer::from(1i64)),
            Element::Set(vec![]),
            Element::Sequence(vec![data_oid()]),
        ]),
        "DetachedContent"
    )]
    fn test_signed_data_decode_error(#[case] input: Element, #[case] variant: &str) {
        let result: Result<SignedData> = input.decode();
        assert!(format!("{:?}", result.unwrap_err()).contains(variant));
    }
}
