//! PKCS#9: Selected Object Classes and Attribute Types
//!
//! The subset of [RFC 2985](https://datatracker.ietf.org/doc/html/rfc2985)
//! attributes that shows up in PKCS#12 bag attributes and CMS signed
//! attributes:
//!
//! - `contentType` - Content type OID
//! - `messageDigest` - Message digest value
//! - `signingTime` - Signing timestamp
//! - `friendlyName` - Human-readable name of a bag (PKCS#12)
//! - `localKeyId` - Links a certificate bag to its key bag (PKCS#12)
//!
//! # Example
//!
//! ```no_run
//! use kensa::decoder::Decoder;
//! use kensa_asn1::Element;
//! use kensa_pkcs9::{Attributes, attribute::FriendlyName};
//!
//! fn friendly_name(bag_attributes: &Element) -> kensa_pkcs9::Result<Option<String>> {
//!     let attributes: Attributes = bag_attributes.decode()?;
//!     Ok(attributes
//!         .attribute::<FriendlyName>()?
//!         .map(|name| name.name().to_string()))
//! }
//! ```

#![forbid(unsafe_code)]

pub mod attribute;
pub mod error;

pub use attribute::{Attribute, Attributes, RawAttribute, signed_attributes_der};
pub use error::{Error, Result};
