//! ASN.1 element model.
//!
//! Turns the TLVs of `kensa-der` into typed universal values. BER
//! constructed strings are reassembled here, so upper layers never see the
//! segmentation. Context-specific elements keep their TLV because their
//! meaning (EXPLICIT, IMPLICIT, which type) depends on the schema the caller
//! is decoding.

#![forbid(unsafe_code)]

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDateTime;
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_der::{Der, PrimitiveTag, Tag, Tlv};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Serialize, Serializer};

pub mod error;

use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the only top-level element.
    pub fn into_single(self) -> Result<Element> {
        let count = self.elements.len();
        let mut elements = self.elements.into_iter();
        match (elements.next(), count) {
            (Some(element), 1) => Ok(element),
            _ => Err(Error::ExpectedSingleElement(count)),
        }
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ASN1Object { elements })
    }
}

impl TryFrom<&[u8]> for ASN1Object {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        let der: Der = value.decode()?;
        der.decode()
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self> {
        ASN1Object::try_from(value.as_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    PrintableString(String),
    T61String(String),
    IA5String(String),
    BMPString(BMPString),
    UTCTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    /// Context-specific element. Interpret it with [`Element::explicit`],
    /// [`Element::implicit_elements`] or [`Element::implicit_octets`].
    ContextSpecific {
        slot: u8,
        constructed: bool,
        tlv: Tlv,
    },
    Unimplemented(Tlv),
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _) => match primitive_tag {
                PrimitiveTag::Boolean => match tlv.data() {
                    Some([0x00]) => Ok(Element::Boolean(false)),
                    // BER allows any non-zero octet for TRUE
                    Some([_]) => Ok(Element::Boolean(true)),
                    _ => Err(Error::InvalidBoolean),
                },
                PrimitiveTag::Integer => match tlv.data() {
                    Some(data) if !data.is_empty() => Ok(Element::Integer(Integer::from(data))),
                    _ => Err(Error::IntegerNoData),
                },
                PrimitiveTag::BitString => {
                    Ok(Element::BitString(BitString::try_from(bit_string_octets(tlv)?.as_slice())?))
                }
                PrimitiveTag::OctetString => {
                    Ok(Element::OctetString(OctetString::from(tlv.content_octets())))
                }
                PrimitiveTag::Null => Ok(Element::Null),
                PrimitiveTag::ObjectIdentifier => match tlv.data() {
                    Some(data) => Ok(Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?)),
                    None => Err(Error::ObjectIdentifierNoData),
                },
                PrimitiveTag::UTF8String => String::from_utf8(tlv.content_octets())
                    .map(Element::UTF8String)
                    .map_err(|_| Error::Utf8StringInvalidUtf8),
                PrimitiveTag::Sequence => Ok(Element::Sequence(children(tlv, "SEQUENCE")?)),
                PrimitiveTag::Set => Ok(Element::Set(children(tlv, "SET")?)),
                PrimitiveTag::PrintableString => Ok(Element::PrintableString(ascii_string(
                    tlv.content_octets(),
                    "PrintableString",
                )?)),
                PrimitiveTag::IA5String => Ok(Element::IA5String(ascii_string(
                    tlv.content_octets(),
                    "IA5String",
                )?)),
                // TeletexString is read as Latin-1, which is what issuers actually put there.
                PrimitiveTag::T61String => Ok(Element::T61String(
                    tlv.content_octets().iter().map(|b| *b as char).collect(),
                )),
                PrimitiveTag::BMPString => Ok(Element::BMPString(BMPString::try_from(
                    tlv.content_octets().as_slice(),
                )?)),
                PrimitiveTag::UTCTime => {
                    Ok(Element::UTCTime(parse_utc_time(&tlv.content_octets())?))
                }
                PrimitiveTag::GeneralizedTime => Ok(Element::GeneralizedTime(
                    parse_generalized_time(&tlv.content_octets())?,
                )),
                PrimitiveTag::Unimplemented(_) => Ok(Element::Unimplemented(tlv.clone())),
            },
            Tag::ContextSpecific { slot, constructed } => Ok(Element::ContextSpecific {
                slot: *slot,
                constructed: *constructed,
                tlv: tlv.clone(),
            }),
        }
    }
}

fn children(tlv: &Tlv, name: &'static str) -> Result<Vec<Element>> {
    tlv.tlvs()
        .ok_or(Error::ExpectedConstructed(name))?
        .iter()
        .map(Element::try_from)
        .collect()
}

fn ascii_string(data: Vec<u8>, name: &'static str) -> Result<String> {
    if !data.is_ascii() {
        return Err(Error::StringInvalidEncoding(name));
    }
    String::from_utf8(data).map_err(|_| Error::StringInvalidEncoding(name))
}

// A constructed BIT STRING carries the unused-bit count in every segment;
// only the last one may be non-zero.
fn bit_string_octets(tlv: &Tlv) -> Result<Vec<u8>> {
    match tlv.tlvs() {
        None => tlv.data().map(<[u8]>::to_vec).ok_or(Error::BitStringNoData),
        Some(segments) => {
            let mut unused = 0;
            let mut data = Vec::new();
            for segment in segments {
                let octets = bit_string_octets(segment)?;
                let (first, rest) = octets.split_first().ok_or(Error::BitStringNoData)?;
                unused = *first;
                data.extend_from_slice(rest);
            }
            let mut out = Vec::with_capacity(data.len() + 1);
            out.push(unused);
            out.extend(data);
            Ok(out)
        }
    }
}

impl Element {
    /// Inner element of an EXPLICIT tag: `[n] EXPLICIT T`.
    pub fn explicit(&self) -> Result<Element> {
        let Element::ContextSpecific { slot, tlv, .. } = self else {
            return Err(Error::ExpectedContextSpecific);
        };
        match tlv.tlvs() {
            Some([inner]) => Element::try_from(inner),
            Some(_) => Err(Error::InvalidContextSpecific {
                slot: *slot,
                msg: "explicit tag must wrap exactly one element",
            }),
            None => Err(Error::InvalidContextSpecific {
                slot: *slot,
                msg: "explicit tag must be constructed",
            }),
        }
    }

    /// Members of an IMPLICIT constructed type such as `[n] IMPLICIT SET OF T`.
    pub fn implicit_elements(&self) -> Result<Vec<Element>> {
        let Element::ContextSpecific { slot, tlv, .. } = self else {
            return Err(Error::ExpectedContextSpecific);
        };
        match tlv.tlvs() {
            Some(tlvs) => tlvs.iter().map(Element::try_from).collect(),
            None => Err(Error::InvalidContextSpecific {
                slot: *slot,
                msg: "implicit constructed type has primitive encoding",
            }),
        }
    }

    /// Content octets of an IMPLICIT string type such as `[n] IMPLICIT OCTET STRING`.
    pub fn implicit_octets(&self) -> Result<Vec<u8>> {
        let Element::ContextSpecific { tlv, .. } = self else {
            return Err(Error::ExpectedContextSpecific);
        };
        Ok(tlv.content_octets())
    }

    pub fn context_slot(&self) -> Option<u8> {
        match self {
            Element::ContextSpecific { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({} bits)", bs.bit_len()),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(seq) => write!(f, "Sequence({} elements)", seq.len()),
            Element::Set(set) => write!(f, "Set({} elements)", set.len()),
            Element::PrintableString(s) => write!(f, "PrintableString({})", s),
            Element::T61String(s) => write!(f, "T61String({})", s),
            Element::IA5String(s) => write!(f, "IA5String({})", s),
            Element::BMPString(s) => write!(f, "BMPString({})", s),
            Element::UTCTime(dt) => write!(f, "UTCTime({})", dt),
            Element::GeneralizedTime(dt) => write!(f, "GeneralizedTime({})", dt),
            Element::ContextSpecific {
                slot, constructed, ..
            } => write!(f, "ContextSpecific(slot: {}, constructed: {})", slot, constructed),
            Element::Unimplemented(tlv) => {
                write!(f, "Unimplemented(0x{:02x})", tlv.tag().identifier())
            }
        }
    }
}

// ASN.1 INTEGER is arbitrary sized and may be negative.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn into_bigint(self) -> BigInt {
        self.inner
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    /// Minimal two's complement big-endian octets, as in a DER INTEGER.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.inner
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for b in value {
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierOverflow);
            }
            val = (val << 7) | (*b as u64 & 0x7f);
            pending = *b & 0x80 != 0;
            if !pending {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs.
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        match subidentifiers[0] {
            first @ 0..40 => inner.extend([0, first]),
            first @ 40..80 => inner.extend([1, first - 40]),
            first => inner.extend([2, first - 80]),
        }
        inner.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { inner })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierInvalidComponent(s.to_string()));
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        let mut parts = other.split('.');
        for component in &self.inner {
            match parts.next().map(str::parse::<u64>) {
                Some(Ok(n)) if n == *component => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        other == self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex(&self.data))
    }
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused as usize)
    }

    /// Whether bit `n` is set, counting from the most significant bit of the
    /// first octet as in named bit lists.
    pub fn bit(&self, n: usize) -> bool {
        if n >= self.bit_len() {
            return false;
        }
        self.data[n / 8] & (0x80 >> (n % 8)) != 0
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        let (&unused, data) = value.split_first().ok_or(Error::BitStringNoData)?;
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        Ok(BitString {
            unused,
            data: data.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.hex())
        } else {
            self.inner.serialize(serializer)
        }
    }
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    /// Lowercase hex without separators.
    pub fn hex(&self) -> String {
        hex(&self.inner)
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// BMPString, UTF-16 big endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BMPString {
    inner: String,
}

impl BMPString {
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl TryFrom<&[u8]> for BMPString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.len() % 2 != 0 {
            return Err(Error::BmpStringOddLength(value.len()));
        }
        let units = value
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        let inner = char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|_| Error::BmpStringInvalidUtf16)?;
        Ok(BMPString { inner })
    }
}

impl Display for BMPString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

// RFC 5280 4.1.2.5.1: YY >= 50 is 19YY, otherwise 20YY.
fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime> {
    let s = std::str::from_utf8(data).map_err(|_| Error::UtcTimeInvalidFormat)?;
    let yy = s
        .get(..2)
        .and_then(|yy| yy.parse::<u32>().ok())
        .ok_or(Error::UtcTimeInvalidFormat)?;
    let century = if yy >= 50 { 19 } else { 20 };
    let full = format!("{}{}", century, s);
    NaiveDateTime::parse_from_str(&full, "%Y%m%d%H%M%SZ")
        .or_else(|_| NaiveDateTime::parse_from_str(&full, "%Y%m%d%H%MZ"))
        .map_err(|_| Error::UtcTimeInvalidFormat)
}

fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime> {
    let s = std::str::from_utf8(data).map_err(|_| Error::GeneralizedTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%SZ")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%S%.fZ"))
        .map_err(|_| Error::GeneralizedTimeInvalidFormat)
}
