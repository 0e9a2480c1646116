//! PEM armor (RFC 7468) for the inputs kensa accepts.
//!
//! Signed profiles are sometimes handed over as `-----BEGIN PKCS7-----`
//! blocks and certificates as `-----BEGIN CERTIFICATE-----`. Text before the
//! first boundary (the explanatory text OpenSSL prints) is ignored.

#![forbid(unsafe_code)]

pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::LazyLock,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;
use kensa::decoder::{DecodableFrom, Decoder};
use regex::Regex;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const PKCS7_LABEL: &str = "PKCS7";
const CMS_LABEL: &str = "CMS";
const PKCS12_LABEL: &str = "PKCS12";

static BOUNDARY: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^-----(BEGIN|END) ([A-Z0-9 ]+)-----\s*$"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// X.509 Certificate
    Certificate,
    /// PKCS#7 ContentInfo
    Pkcs7,
    /// CMS ContentInfo (RFC 5652 naming of the same structure)
    Cms,
    /// PKCS#12 PFX
    Pkcs12,
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Certificate => write!(f, "{}", CERTIFICATE_LABEL),
            Label::Pkcs7 => write!(f, "{}", PKCS7_LABEL),
            Label::Cms => write!(f, "{}", CMS_LABEL),
            Label::Pkcs12 => write!(f, "{}", PKCS12_LABEL),
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CERTIFICATE_LABEL => Ok(Label::Certificate),
            PKCS7_LABEL => Ok(Label::Pkcs7),
            CMS_LABEL => Ok(Label::Cms),
            PKCS12_LABEL => Ok(Label::Pkcs12),
            other => Err(Error::InvalidLabel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Begin,
    End,
}

fn parse_boundary(line: &str) -> Result<Option<(Boundary, Label)>, Error> {
    let re = BOUNDARY
        .as_ref()
        .map_err(|_| Error::InvalidEncapsulationBoundary)?;
    let Some(captured) = re.captures(line) else {
        return Ok(None);
    };
    let boundary = match captured.get(1).map(|m| m.as_str()) {
        Some("BEGIN") => Boundary::Begin,
        _ => Boundary::End,
    };
    let label = captured
        .get(2)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .parse()?;
    Ok(Some((boundary, label)))
}

#[derive(Debug, Clone)]
pub struct Pem {
    label: Label,
    base64_data: String,
}

impl Pem {
    pub fn label(&self) -> Label {
        self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }

    /// Cheap check used to decide between PEM and binary input.
    pub fn looks_like_pem(input: &[u8]) -> bool {
        std::str::from_utf8(input).is_ok_and(|s| s.contains("-----BEGIN "))
    }
}

impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();

        let label = loop {
            let line = lines.next().ok_or(Error::MissingPreEncapsulationBoundary)?;
            match parse_boundary(line)? {
                Some((Boundary::Begin, label)) => break label,
                Some((Boundary::End, _)) => return Err(Error::MissingPreEncapsulationBoundary),
                None => continue,
            }
        };

        let mut base64_data = String::new();
        loop {
            let line = lines.next().ok_or(Error::MissingPostEncapsulationBoundary)?;
            match parse_boundary(line)? {
                Some((Boundary::End, end)) if end == label => break,
                Some((Boundary::End, _)) => return Err(Error::LabelMissMatch),
                Some((Boundary::Begin, _)) => return Err(Error::MissingPostEncapsulationBoundary),
                None => base64_data.extend(line.chars().filter(|c| !c.is_whitespace())),
            }
        }

        if base64_data.is_empty() {
            return Err(Error::MissingData);
        }
        Ok(Pem { label, base64_data })
    }
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        STANDARD.decode(self.data()).map_err(Error::Base64Decode)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}
