use std::fs;
use std::io::{self, Read};
use std::str::FromStr;

use kensa::decoder::Decoder;
use kensa_pem::Pem;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum InputFormat {
    /// PEM when the input carries a BEGIN boundary, binary otherwise
    Auto,
    /// Binary DER or BER
    Der,
    /// PEM armored
    Pem,
}

/// Read input from a file or stdin
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Strip PEM armor when `format` asks for it or the input looks armored.
pub(crate) fn unarmor(input: Vec<u8>, format: InputFormat) -> Result<Vec<u8>> {
    let armored = match format {
        InputFormat::Der => false,
        InputFormat::Pem => true,
        InputFormat::Auto => Pem::looks_like_pem(&input),
    };
    if !armored {
        return Ok(input);
    }
    let text = String::from_utf8(input)
        .map_err(|_| Error::InvalidInput("PEM input is not UTF-8".to_string()))?;
    let pem = Pem::from_str(&text)?;
    let der: Vec<u8> = pem.decode()?;
    tracing::debug!(label = %pem.label(), bytes = der.len(), "decoded PEM armor");
    Ok(der)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEM: &str = "-----BEGIN PKCS7-----\nMAA=\n-----END PKCS7-----\n";

    #[test]
    fn test_unarmor_auto() {
        assert_eq!(vec![0x30, 0x00], unarmor(PEM.as_bytes().to_vec(), InputFormat::Auto).unwrap());
        assert_eq!(vec![0x30, 0x00], unarmor(vec![0x30, 0x00], InputFormat::Auto).unwrap());
    }

    #[test]
    fn test_unarmor_der_keeps_bytes() {
        let input = PEM.as_bytes().to_vec();
        assert_eq!(input, unarmor(input.clone(), InputFormat::Der).unwrap());
    }

    #[test]
    fn test_unarmor_pem_requires_armor() {
        let err = unarmor(vec![0x30, 0x00], InputFormat::Pem).unwrap_err();
        assert!(format!("{:?}", err).contains("Pem"));
    }
}
