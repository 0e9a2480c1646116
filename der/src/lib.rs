//! BER/DER tag-length-value layer.
//!
//! Parses the BER subset found in the wild for PKCS#7 and PKCS#12 files:
//! definite and indefinite lengths and constructed string encodings. DER is
//! a subset of that, so DER input round-trips byte for byte through
//! [`Tlv::to_der`].

#![forbid(unsafe_code)]

use kensa::decoder::{DecodableFrom, Decoder};
use kensa::encoder::{EncodableTo, Encoder};
use nom::{IResult, Parser};

pub mod error;

use error::{Error, Result};

pub const TAG_CONSTRUCTED: u8 = 0x20;

const CLASS_MASK: u8 = 0xc0;
const CLASS_UNIVERSAL: u8 = 0x00;
const CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_NUMBER_MASK: u8 = 0x1f;
const MAX_NESTING_DEPTH: usize = 64;

type ParseResult<'a, T> = IResult<&'a [u8], T, Error>;

/// A sequence of top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Tlv> {
        self.elements
    }

    /// Parses every top-level TLV in `input`.
    ///
    /// Zero octets after the last element are ignored; some encoders pad
    /// signed profiles that way.
    pub fn parse(input: &[u8]) -> Result<Der> {
        if input.is_empty() {
            return Err(Error::Empty);
        }
        let mut elements = Vec::new();
        let mut rest = input;
        while !rest.is_empty() {
            if !elements.is_empty() && rest.iter().all(|b| *b == 0) {
                break;
            }
            let (next, tlv) = parse_tlv(rest, 0)?;
            elements.push(tlv);
            rest = next;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        Der::parse(self)
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        Der::parse(self)
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write_der(&mut out);
        }
        Ok(out)
    }
}

/// Universal tags kensa understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    UTF8String,
    Sequence,
    Set,
    PrintableString,
    T61String,
    IA5String,
    UTCTime,
    GeneralizedTime,
    BMPString,
    /// Any other universal tag, or an application/private class tag.
    /// Holds the identifier octet.
    Unimplemented(u8),
}

impl From<&PrimitiveTag> for u8 {
    fn from(tag: &PrimitiveTag) -> Self {
        match tag {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::T61String => 0x14,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::UTCTime => 0x17,
            PrimitiveTag::GeneralizedTime => 0x18,
            PrimitiveTag::BMPString => 0x1e,
            PrimitiveTag::Unimplemented(v) => *v,
        }
    }
}

impl PrimitiveTag {
    fn from_identifier(identifier: u8) -> Self {
        if identifier & CLASS_MASK != CLASS_UNIVERSAL {
            return PrimitiveTag::Unimplemented(identifier);
        }
        match identifier & TAG_NUMBER_MASK {
            0x01 => PrimitiveTag::Boolean,
            0x02 => PrimitiveTag::Integer,
            0x03 => PrimitiveTag::BitString,
            0x04 => PrimitiveTag::OctetString,
            0x05 => PrimitiveTag::Null,
            0x06 => PrimitiveTag::ObjectIdentifier,
            0x0c => PrimitiveTag::UTF8String,
            0x10 => PrimitiveTag::Sequence,
            0x11 => PrimitiveTag::Set,
            0x13 => PrimitiveTag::PrintableString,
            0x14 => PrimitiveTag::T61String,
            0x16 => PrimitiveTag::IA5String,
            0x17 => PrimitiveTag::UTCTime,
            0x18 => PrimitiveTag::GeneralizedTime,
            0x1e => PrimitiveTag::BMPString,
            _ => PrimitiveTag::Unimplemented(identifier),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tag {
    /// Universal (or application/private) tag with its identifier octet.
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
}

impl Tag {
    pub fn is_constructed(&self) -> bool {
        match self {
            Tag::Primitive(_, identifier) => identifier & TAG_CONSTRUCTED != 0,
            Tag::ContextSpecific { constructed, .. } => *constructed,
        }
    }

    /// The identifier octet as it appears on the wire.
    pub fn identifier(&self) -> u8 {
        match self {
            Tag::Primitive(_, identifier) => *identifier,
            Tag::ContextSpecific { slot, constructed } => {
                let constructed = if *constructed { TAG_CONSTRUCTED } else { 0 };
                CLASS_CONTEXT_SPECIFIC | constructed | slot
            }
        }
    }
}

impl From<u8> for Tag {
    fn from(identifier: u8) -> Self {
        if identifier & CLASS_MASK == CLASS_CONTEXT_SPECIFIC {
            Tag::ContextSpecific {
                slot: identifier & TAG_NUMBER_MASK,
                constructed: identifier & TAG_CONSTRUCTED != 0,
            }
        } else {
            Tag::Primitive(PrimitiveTag::from_identifier(identifier), identifier)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Content octets of a primitive encoding.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    /// Children of a constructed encoding.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Content octets with BER constructed strings reassembled: the segments
    /// of a constructed encoding are concatenated depth first.
    pub fn content_octets(&self) -> Vec<u8> {
        match &self.value {
            Value::Data(data) => data.clone(),
            Value::Tlv(tlvs) => {
                let mut out = Vec::new();
                for tlv in tlvs {
                    out.extend(tlv.content_octets());
                }
                out
            }
        }
    }

    /// DER encoding of this TLV (definite, minimal lengths).
    pub fn to_der(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_der(&mut out);
        out
    }

    fn write_der(&self, out: &mut Vec<u8>) {
        out.push(self.tag.identifier());
        match &self.value {
            Value::Data(data) => {
                write_length(data.len(), out);
                out.extend_from_slice(data);
            }
            Value::Tlv(tlvs) => {
                let mut content = Vec::new();
                for tlv in tlvs {
                    tlv.write_der(&mut content);
                }
                write_length(content.len(), out);
                out.extend(content);
            }
        }
    }
}

impl EncodableTo<Tlv> for Vec<u8> {}

impl Encoder<Tlv, Vec<u8>> for Tlv {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(self.to_der())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Length {
    Definite(usize),
    Indefinite,
}

fn parse_tlv(input: &[u8], depth: usize) -> ParseResult<'_, Tlv> {
    if depth > MAX_NESTING_DEPTH {
        return Err(nom::Err::Failure(Error::NestingTooDeep(MAX_NESTING_DEPTH)));
    }
    let (input, tag) = parse_tag(input)?;
    let (input, length) = parse_length(input)?;

    match length {
        Length::Definite(length) => {
            let (input, content) = nom::bytes::complete::take(length).parse(input)?;
            if tag.is_constructed() {
                let mut tlvs = Vec::new();
                let mut content = content;
                while !content.is_empty() {
                    let (rest, tlv) = parse_tlv(content, depth + 1)?;
                    content = rest;
                    tlvs.push(tlv);
                }
                Ok((input, Tlv::new_constructed(tag, tlvs)))
            } else {
                Ok((input, Tlv::new_primitive(tag, content.to_vec())))
            }
        }
        Length::Indefinite => {
            if !tag.is_constructed() {
                return Err(nom::Err::Failure(Error::IndefiniteLengthPrimitive));
            }
            let mut tlvs = Vec::new();
            let mut input = input;
            loop {
                if let Some(rest) = input.strip_prefix(&[0x00, 0x00]) {
                    input = rest;
                    break;
                }
                if input.is_empty() {
                    return Err(nom::Err::Failure(Error::MissingEndOfContents));
                }
                let (rest, tlv) = parse_tlv(input, depth + 1)?;
                input = rest;
                tlvs.push(tlv);
            }
            Ok((input, Tlv::new_constructed(tag, tlvs)))
        }
    }
}

fn parse_tag(input: &[u8]) -> ParseResult<'_, Tag> {
    let (input, n) = nom::number::be_u8().parse(input)?;
    if n & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        return Err(nom::Err::Failure(Error::HighTagNumber));
    }
    Ok((input, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> ParseResult<'_, Length> {
    let (input, n) = nom::number::be_u8().parse(input)?;
    if n == 0x80 {
        return Ok((input, Length::Indefinite));
    }
    if n & 0x80 == 0x80 {
        // long form: the low 7 bits count the length octets that follow.
        let count = (n & 0x7f) as usize;
        if count > std::mem::size_of::<usize>() {
            return Err(nom::Err::Failure(Error::LengthOverflow));
        }
        let (input, bs) = nom::bytes::complete::take(count).parse(input)?;
        let length = bs.iter().fold(0usize, |n, &b| (n << 8) | b as usize);
        return Ok((input, Length::Definite(length)));
    }
    // short form: 0-127
    Ok((input, Length::Definite(n as usize)))
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let significant = &bytes[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}
