//! ```asn1
//! SignerInfo ::= SEQUENCE {
//!     version CMSVersion,
//!     sid SignerIdentifier,
//!     digestAlgorithm DigestAlgorithmIdentifier,
//!     signedAttrs [0] IMPLICIT SignedAttributes OPTIONAL,
//!     signatureAlgorithm SignatureAlgorithmIdentifier,
//!     signature SignatureValue,
//!     unsignedAttrs [1] IMPLICIT UnsignedAttributes OPTIONAL }
//!
//! SignerIdentifier ::= CHOICE {
//!     issuerAndSerialNumber IssuerAndSerialNumber,
//!     subjectKeyIdentifier [0] SubjectKeyIdentifier }
//! ```

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Element, OctetString};
use kensa_pkcs9::{Attributes, signed_attributes_der};
use kensa_pkix_types::AlgorithmIdentifier;
use kensa_x509::{Certificate, IssuerAndSerialNumber};
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerIdentifier {
    IssuerAndSerialNumber(IssuerAndSerialNumber),
    SubjectKeyIdentifier(OctetString),
}

impl SignerIdentifier {
    pub fn matches(&self, certificate: &Certificate) -> bool {
        match self {
            SignerIdentifier::IssuerAndSerialNumber(id) => id.matches(certificate),
            SignerIdentifier::SubjectKeyIdentifier(ski) => {
                certificate.subject_key_identifier().as_deref() == Some(ski.as_bytes())
            }
        }
    }
}

impl DecodableFrom<Element> for SignerIdentifier {}

impl Decoder<Element, SignerIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SignerIdentifier> {
        match self {
            Element::Sequence(_) => {
                let id: IssuerAndSerialNumber = self.decode()?;
                Ok(SignerIdentifier::IssuerAndSerialNumber(id))
            }
            Element::ContextSpecific { slot: 0, .. } => Ok(SignerIdentifier::SubjectKeyIdentifier(
                OctetString::from(self.implicit_octets()?),
            )),
            _ => Err(Error::SignerIdentifierInvalid),
        }
    }
}

/// Signed attributes together with the encoding the signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAttributes {
    pub attributes: Attributes,
    pub der: Vec<u8>,
}

impl DecodableFrom<Element> for SignedAttributes {}

impl Decoder<Element, SignedAttributes> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SignedAttributes> {
        let attributes: Attributes = self.decode()?;
        Ok(SignedAttributes {
            attributes,
            der: signed_attributes_der(self)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerInfo {
    pub version: u32,
    pub sid: SignerIdentifier,
    pub digest_algorithm: AlgorithmIdentifier,
    pub signed_attrs: Option<SignedAttributes>,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature: Vec<u8>,
}

impl DecodableFrom<Element> for SignerInfo {}

impl Decoder<Element, SignerInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SignerInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::SignerInfoExpectedSequence);
        };
        let mut fields = elements.iter().peekable();

        let version = match fields.next() {
            Some(Element::Integer(version)) => {
                version.to_u32().ok_or(Error::SignerInfoInvalidVersion)?
            }
            _ => return Err(Error::SignerInfoMissingField("version")),
        };
        let sid: SignerIdentifier = fields
            .next()
            .ok_or(Error::SignerInfoMissingField("sid"))?
            .decode()?;
        let digest_algorithm: AlgorithmIdentifier = fields
            .next()
            .ok_or(Error::SignerInfoMissingField("digestAlgorithm"))?
            .decode()?;
        let signed_attrs = match fields.next_if(|elem| elem.context_slot() == Some(0)) {
            Some(elem) => {
                let attrs: SignedAttributes = elem.decode()?;
                Some(attrs)
            }
            None => None,
        };
        let signature_algorithm: AlgorithmIdentifier = fields
            .next()
            .ok_or(Error::SignerInfoMissingField("signatureAlgorithm"))?
            .decode()?;
        let signature = match fields.next() {
            Some(Element::OctetString(signature)) => signature.as_bytes().to_vec(),
            Some(_) => return Err(Error::SignatureExpectedOctetString),
            None => return Err(Error::SignerInfoMissingField("signature")),
        };
        // unsignedAttrs (countersignatures, timestamps) are not evaluated.
        fields.next_if(|elem| elem.context_slot() == Some(1));
        if let Some(extra) = fields.next() {
            return Err(Error::SignerInfoUnexpectedElement(extra.to_string()));
        }

        Ok(SignerInfo {
            version,
            sid,
            digest_algorithm,
            signed_attrs,
            signature_algorithm,
            signature,
        })
    }
}
