//! Password based encryption of `encryptedData` safe contents.
//!
//! Two families are understood:
//!
//! - the legacy PKCS#12 schemes of [RFC 7292 Appendix C](https://datatracker.ietf.org/doc/html/rfc7292#appendix-C),
//!   keyed through [`crate::kdf`] with SHA-1 and a BMPString password
//! - PBES2 of [RFC 8018 Section 6.2](https://datatracker.ietf.org/doc/html/rfc8018#section-6.2)
//!   with PBKDF2 over the UTF-8 password
//!
//! ```asn1
//! pkcs-12PbeParams ::= SEQUENCE {
//!     salt        OCTET STRING,
//!     iterations  INTEGER
//! }
//!
//! PBES2-params ::= SEQUENCE {
//!     keyDerivationFunc AlgorithmIdentifier {{PBES2-KDFs}},
//!     encryptionScheme  AlgorithmIdentifier {{PBES2-Encs}} }
//!
//! PBKDF2-params ::= SEQUENCE {
//!     salt CHOICE {
//!         specified OCTET STRING,
//!         otherSource AlgorithmIdentifier {{PBKDF2-SaltSources}}
//!     },
//!     iterationCount INTEGER (1..MAX),
//!     keyLength INTEGER (1..MAX) OPTIONAL,
//!     prf AlgorithmIdentifier {{PBKDF2-PRFs}} DEFAULT algid-hmacWithSHA1 }
//! ```

use aes::{Aes128, Aes192, Aes256};
use cipher::block_padding::Pkcs7;
use cipher::{BlockCipher, BlockDecryptMut, InnerIvInit, KeyInit, KeyIvInit};
use des::{TdesEde2, TdesEde3};
use kensa::decoder::Decoder;
use kensa_asn1::Element;
use kensa_pkix_types::{AlgorithmIdentifier, DigestAlgorithm};
use pbkdf2::pbkdf2_hmac;
use rc2::Rc2;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

use crate::error::{Error, Result};
use crate::kdf;
use crate::mac::iteration_count;

const DES_BLOCK_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pkcs12Cipher {
    TripleDes,
    TwoKeyTripleDes,
    Rc2_128,
    Rc2_40,
}

impl Pkcs12Cipher {
    fn key_len(&self) -> usize {
        match self {
            Pkcs12Cipher::TripleDes => 24,
            Pkcs12Cipher::TwoKeyTripleDes | Pkcs12Cipher::Rc2_128 => 16,
            Pkcs12Cipher::Rc2_40 => 5,
        }
    }

    fn decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Pkcs12Cipher::TripleDes => decrypt_cbc::<TdesEde3>(key, iv, ciphertext, "3DES"),
            Pkcs12Cipher::TwoKeyTripleDes => decrypt_cbc::<TdesEde2>(key, iv, ciphertext, "2DES"),
            Pkcs12Cipher::Rc2_128 | Pkcs12Cipher::Rc2_40 => {
                // Effective key bits equal the key length for both variants.
                let rc2 = Rc2::new_with_eff_key_len(key, key.len() * 8);
                let decryptor = cbc::Decryptor::<Rc2>::inner_iv_slice_init(rc2, iv)
                    .map_err(|_| Error::InvalidKeyOrIvLength("RC2"))?;
                unpad(decryptor, ciphertext)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pbes2Cipher {
    Aes128,
    Aes192,
    Aes256,
    DesEde3,
}

impl Pbes2Cipher {
    fn from_oid(oid: &str) -> Option<Self> {
        match oid {
            AlgorithmIdentifier::OID_AES128_CBC => Some(Pbes2Cipher::Aes128),
            AlgorithmIdentifier::OID_AES192_CBC => Some(Pbes2Cipher::Aes192),
            AlgorithmIdentifier::OID_AES256_CBC => Some(Pbes2Cipher::Aes256),
            AlgorithmIdentifier::OID_DES_EDE3_CBC => Some(Pbes2Cipher::DesEde3),
            _ => None,
        }
    }

    fn key_len(&self) -> usize {
        match self {
            Pbes2Cipher::Aes128 => 16,
            Pbes2Cipher::Aes192 | Pbes2Cipher::DesEde3 => 24,
            Pbes2Cipher::Aes256 => 32,
        }
    }

    fn decrypt(&self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Pbes2Cipher::Aes128 => decrypt_cbc::<Aes128>(key, iv, ciphertext, "AES-128-CBC"),
            Pbes2Cipher::Aes192 => decrypt_cbc::<Aes192>(key, iv, ciphertext, "AES-192-CBC"),
            Pbes2Cipher::Aes256 => decrypt_cbc::<Aes256>(key, iv, ciphertext, "AES-256-CBC"),
            Pbes2Cipher::DesEde3 => decrypt_cbc::<TdesEde3>(key, iv, ciphertext, "DES-EDE3-CBC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionScheme {
    Pkcs12 {
        cipher: Pkcs12Cipher,
        salt: Vec<u8>,
        iterations: u32,
    },
    Pbes2 {
        prf: DigestAlgorithm,
        salt: Vec<u8>,
        iterations: u32,
        cipher: Pbes2Cipher,
        iv: Vec<u8>,
    },
}

impl EncryptionScheme {
    /// Decrypt with the first password encoding that yields valid padding.
    ///
    /// The legacy schemes take BMPString `candidates`; PBES2 uses `utf8`.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        candidates: &[Vec<u8>],
        utf8: &[u8],
    ) -> Result<Vec<u8>> {
        match self {
            EncryptionScheme::Pkcs12 {
                cipher,
                salt,
                iterations,
            } => {
                let derive = |password: &[u8], id, len| {
                    kdf::derive(DigestAlgorithm::Sha1, id, password, salt, *iterations, len)
                };
                for password in candidates {
                    let key = derive(password, kdf::ID_KEY, cipher.key_len());
                    let iv = derive(password, kdf::ID_IV, DES_BLOCK_LEN);
                    match cipher.decrypt(&key, &iv, ciphertext) {
                        Err(Error::DecryptionFailed) => continue,
                        result => return result,
                    }
                }
                Err(Error::DecryptionFailed)
            }
            EncryptionScheme::Pbes2 {
                prf,
                salt,
                iterations,
                cipher,
                iv,
            } => {
                let mut key = vec![0u8; cipher.key_len()];
                let rounds = *iterations;
                match prf {
                    DigestAlgorithm::Sha1 => pbkdf2_hmac::<Sha1>(utf8, salt, rounds, &mut key),
                    DigestAlgorithm::Sha224 => pbkdf2_hmac::<Sha224>(utf8, salt, rounds, &mut key),
                    DigestAlgorithm::Sha256 => pbkdf2_hmac::<Sha256>(utf8, salt, rounds, &mut key),
                    DigestAlgorithm::Sha384 => pbkdf2_hmac::<Sha384>(utf8, salt, rounds, &mut key),
                    DigestAlgorithm::Sha512 => pbkdf2_hmac::<Sha512>(utf8, salt, rounds, &mut key),
                }
                cipher.decrypt(&key, iv, ciphertext)
            }
        }
    }
}

fn decrypt_cbc<C>(key: &[u8], iv: &[u8], ciphertext: &[u8], name: &'static str) -> Result<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let decryptor =
        cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(|_| Error::InvalidKeyOrIvLength(name))?;
    unpad(decryptor, ciphertext)
}

fn unpad<C>(decryptor: cbc::Decryptor<C>, ciphertext: &[u8]) -> Result<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher,
{
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::DecryptionFailed)
}

impl TryFrom<&AlgorithmIdentifier> for EncryptionScheme {
    type Error = Error;

    fn try_from(algorithm: &AlgorithmIdentifier) -> Result<Self> {
        let oid = algorithm.algorithm().to_string();
        let cipher = match oid.as_str() {
            AlgorithmIdentifier::OID_PBES2 => return pbes2(algorithm),
            AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_3DES => Pkcs12Cipher::TripleDes,
            AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_2DES => Pkcs12Cipher::TwoKeyTripleDes,
            AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC2_128 => Pkcs12Cipher::Rc2_128,
            AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC2_40 => Pkcs12Cipher::Rc2_40,
            _ => return Err(Error::UnsupportedEncryptionAlgorithm(oid)),
        };
        let Some(Element::Sequence(params)) = algorithm.parameter_element() else {
            return Err(Error::InvalidAlgorithmParameters("pkcs-12PbeParams"));
        };
        let [Element::OctetString(salt), Element::Integer(iterations)] = params.as_slice() else {
            return Err(Error::InvalidAlgorithmParameters("pkcs-12PbeParams"));
        };
        Ok(EncryptionScheme::Pkcs12 {
            cipher,
            salt: salt.as_bytes().to_vec(),
            iterations: iteration_count(iterations)?,
        })
    }
}

fn pbes2(algorithm: &AlgorithmIdentifier) -> Result<EncryptionScheme> {
    let Some(Element::Sequence(params)) = algorithm.parameter_element() else {
        return Err(Error::InvalidAlgorithmParameters("PBES2-params"));
    };
    let [kdf, encryption] = params.as_slice() else {
        return Err(Error::InvalidAlgorithmParameters("PBES2-params"));
    };
    let kdf: AlgorithmIdentifier = kdf.decode()?;
    let encryption: AlgorithmIdentifier = encryption.decode()?;

    if *kdf.algorithm() != AlgorithmIdentifier::OID_PBKDF2 {
        return Err(Error::UnsupportedKeyDerivation(kdf.algorithm().to_string()));
    }
    let Some(Element::Sequence(kdf_params)) = kdf.parameter_element() else {
        return Err(Error::InvalidAlgorithmParameters("PBKDF2-params"));
    };
    let (salt, iterations, rest) = match kdf_params.as_slice() {
        [Element::OctetString(salt), Element::Integer(iterations), rest @ ..] => (salt, iterations, rest),
        [Element::Sequence(_), ..] => {
            return Err(Error::UnsupportedKeyDerivation("PBKDF2 otherSource salt".to_string()));
        }
        _ => return Err(Error::InvalidAlgorithmParameters("PBKDF2-params")),
    };
    let (key_length, prf) = match rest {
        [] => (None, None),
        [Element::Integer(len)] => (Some(len), None),
        [prf @ Element::Sequence(_)] => (None, Some(prf)),
        [Element::Integer(len), prf @ Element::Sequence(_)] => (Some(len), Some(prf)),
        _ => return Err(Error::InvalidAlgorithmParameters("PBKDF2-params")),
    };
    let prf = match prf {
        None => DigestAlgorithm::Sha1,
        Some(prf) => {
            let prf: AlgorithmIdentifier = prf.decode()?;
            DigestAlgorithm::from_hmac_oid(prf.algorithm())
                .ok_or_else(|| Error::UnsupportedKeyDerivation(prf.algorithm().to_string()))?
        }
    };

    let encryption_oid = encryption.algorithm().to_string();
    let cipher = Pbes2Cipher::from_oid(&encryption_oid)
        .ok_or(Error::UnsupportedEncryptionAlgorithm(encryption_oid))?;
    if let Some(len) = key_length {
        if len.to_u64() != Some(cipher.key_len() as u64) {
            return Err(Error::InvalidAlgorithmParameters("PBKDF2-params keyLength"));
        }
    }
    let Some(Element::OctetString(iv)) = encryption.parameter_element() else {
        return Err(Error::InvalidAlgorithmParameters("PBES2 encryption IV"));
    };

    Ok(EncryptionScheme::Pbes2 {
        prf,
        salt: salt.as_bytes().to_vec(),
        iterations: iteration_count(iterations)?,
        cipher,
        iv: iv.as_bytes().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use cipher::BlockEncryptMut;
    use kensa_asn1::{Integer, ObjectIdentifier, OctetString};
    use kensa_pkix_types::AlgorithmParameters;
    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> Element {
        Element::ObjectIdentifier(ObjectIdentifier::from_str(s).unwrap())
    }

    fn octets(bytes: &[u8]) -> Element {
        Element::OctetString(OctetString::from(bytes))
    }

    fn algorithm(s: &str, params: Option<Element>) -> AlgorithmIdentifier {
        AlgorithmIdentifier {
            algorithm: ObjectIdentifier::from_str(s).unwrap(),
            parameters: params.map(AlgorithmParameters::Elm),
        }
    }

    fn pbes2_params(kdf_params: Vec<Element>, cipher: &str, iv: &[u8]) -> Option<Element> {
        Some(Element::Sequence(vec![
            Element::Sequence(vec![oid(AlgorithmIdentifier::OID_PBKDF2), Element::Sequence(kdf_params)]),
            Element::Sequence(vec![oid(cipher), octets(iv)]),
        ]))
    }

    #[test]
    fn test_pkcs12_3des_roundtrip_with_empty_password() {
        let salt = [7u8; 8];
        let password = [0u8, 0];
        let key = kdf::derive(DigestAlgorithm::Sha1, kdf::ID_KEY, &password, &salt, 2048, 24);
        let iv = kdf::derive(DigestAlgorithm::Sha1, kdf::ID_IV, &password, &salt, 2048, 8);
        let ciphertext = cbc::Encryptor::<TdesEde3>::new_from_slices(&key, &iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(b"safe contents");

        let scheme = EncryptionScheme::try_from(&algorithm(
            AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_3DES,
            Some(Element::Sequence(vec![octets(&salt), Element::Integer(Integer::from(2048))])),
        ))
        .unwrap();
        let plaintext = scheme.decrypt(&ciphertext, &[vec![], vec![0, 0]], b"").unwrap();
        assert_eq!(b"safe contents".to_vec(), plaintext);
    }

    #[test]
    fn test_pbes2_aes256_roundtrip() {
        let salt = [3u8; 16];
        let iv = [9u8; 16];
        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(b"", &salt, 1000, &mut key);
        let ciphertext = cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(b"certificate bag");

        let scheme = EncryptionScheme::try_from(&algorithm(
            AlgorithmIdentifier::OID_PBES2,
            pbes2_params(
                vec![
                    octets(&salt),
                    Element::Integer(Integer::from(1000)),
                    Element::Sequence(vec![oid(AlgorithmIdentifier::OID_HMAC_WITH_SHA256), Element::Null]),
                ],
                AlgorithmIdentifier::OID_AES256_CBC,
                &iv,
            ),
        ))
        .unwrap();
        assert!(matches!(
            scheme,
            EncryptionScheme::Pbes2 {
                prf: DigestAlgorithm::Sha256,
                cipher: Pbes2Cipher::Aes256,
                ..
            }
        ));
        let plaintext = scheme.decrypt(&ciphertext, &[], b"").unwrap();
        assert_eq!(b"certificate bag".to_vec(), plaintext);
    }

    #[test]
    fn test_pbes2_default_prf_is_sha1() {
        let scheme = EncryptionScheme::try_from(&algorithm(
            AlgorithmIdentifier::OID_PBES2,
            pbes2_params(
                vec![octets(&[1; 8]), Element::Integer(Integer::from(1))],
                AlgorithmIdentifier::OID_AES128_CBC,
                &[0; 16],
            ),
        ))
        .unwrap();
        assert!(matches!(scheme, EncryptionScheme::Pbes2 { prf: DigestAlgorithm::Sha1, .. }));
    }

    #[test]
    fn test_decrypt_bad_padding() {
        let scheme = EncryptionScheme::Pbes2 {
            prf: DigestAlgorithm::Sha256,
            salt: vec![1; 8],
            iterations: 1,
            cipher: Pbes2Cipher::Aes128,
            iv: vec![0; 16],
        };
        // 15 bytes is not a whole block.
        let err = scheme.decrypt(&[0u8; 15], &[], b"").unwrap_err();
        assert!(format!("{:?}", err).contains("DecryptionFailed"));
    }

    #[rstest]
    #[case::rc4(algorithm(AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC4_128, None), "UnsupportedEncryptionAlgorithm")]
    #[case::missing_params(algorithm(AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_3DES, None), "InvalidAlgorithmParameters")]
    #[case::zero_iterations(
        algorithm(
            AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_RC2_40,
            Some(Element::Sequence(vec![octets(&[1; 8]), Element::Integer(Integer::from(0))])),
        ),
        "IterationCountOutOfRange"
    )]
    #[case::excessive_iterations(
        algorithm(
            AlgorithmIdentifier::OID_PKCS12_PBE_SHA1_3DES,
            Some(Element::Sequence(vec![octets(&[1; 8]), Element::Integer(Integer::from(0x7fff_ffff_i64))])),
        ),
        "IterationCountOutOfRange"
    )]
    #[case::pbkdf2_excessive_iterations(
        algorithm(
            AlgorithmIdentifier::OID_PBES2,
            pbes2_params(
                vec![octets(&[1; 8]), Element::Integer(Integer::from(0x7fff_ffff_i64))],
                AlgorithmIdentifier::OID_AES128_CBC,
                &[0; 16],
            ),
        ),
        "IterationCountOutOfRange"
    )]
    #[case::unknown_cipher(
        algorithm(
            AlgorithmIdentifier::OID_PBES2,
            pbes2_params(vec![octets(&[1; 8]), Element::Integer(Integer::from(1))], "1.2.840.113549.3.2", &[0; 8]),
        ),
        "UnsupportedEncryptionAlgorithm"
    )]
    #[case::unknown_prf(
        algorithm(
            AlgorithmIdentifier::OID_PBES2,
            pbes2_params(
                vec![
                    octets(&[1; 8]),
                    Element::Integer(Integer::from(1)),
                    Element::Sequence(vec![oid("1.2.840.113549.2.5")]),
                ],
                AlgorithmIdentifier::OID_AES128_CBC,
                &[0; 16],
            ),
        ),
        "UnsupportedKeyDerivation"
    )]
    #[case::key_length_mismatch(
        algorithm(
            AlgorithmIdentifier::OID_PBES2,
            pbes2_params(
                vec![octets(&[1; 8]), Element::Integer(Integer::from(1)), Element::Integer(Integer::from(16))],
                AlgorithmIdentifier::OID_AES256_CBC,
                &[0; 16],
            ),
        ),
        "InvalidAlgorithmParameters"
    )]
    fn test_encryption_scheme_error(#[case] input: AlgorithmIdentifier, #[case] variant: &str) {
        let err = EncryptionScheme::try_from(&input).unwrap_err();
        assert!(format!("{:?}", err).contains(variant));
    }
}
