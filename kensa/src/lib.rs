//! # kensa
//!
//! Core traits and the shared error taxonomy for the kensa inspection toolkit.
//!
//! Every layer of kensa converts one representation into the next with the
//! `Decoder` trait and goes back with the `Encoder` trait:
//! ```text
//! bytes → Der → ASN1Object → Element → Certificate / Pfx / SignedData
//! ```
//!
//! The marker traits `DecodableFrom` and `EncodableTo` restrict which pairs
//! are valid so that a missing conversion is a compile error.
//!
//! ```ignore
//! use kensa::decoder::Decoder;
//! use kensa_der::Der;
//! use kensa_asn1::ASN1Object;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//! ```
//!
//! Detailed errors live in each crate. They all collapse into one of the
//! [`error::ErrorKind`] categories through [`error::Categorize`], which is what
//! a caller shows to the outside world.

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
pub mod error;
