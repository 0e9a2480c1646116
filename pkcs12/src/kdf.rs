//! PKCS#12 key derivation ([RFC 7292 Appendix B](https://datatracker.ietf.org/doc/html/rfc7292#appendix-B)).
//!
//! Used for the integrity MAC key (ID 3) and for the key and IV of the
//! legacy PKCS#12 PBE schemes (IDs 1 and 2). The password is the BMPString
//! form produced by [`crate::Passphrase`].

use kensa_pkix_types::DigestAlgorithm;
use sha1::Sha1;
use sha2::digest::core_api::BlockSizeUser;
use sha2::digest::{Digest, FixedOutputReset};
use sha2::{Sha224, Sha256, Sha384, Sha512};

pub(crate) const ID_KEY: u8 = 1;
pub(crate) const ID_IV: u8 = 2;
pub(crate) const ID_MAC: u8 = 3;

pub(crate) fn derive(
    digest: DigestAlgorithm,
    id: u8,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    len: usize,
) -> Vec<u8> {
    match digest {
        DigestAlgorithm::Sha1 => derive_with::<Sha1>(id, password, salt, iterations, len),
        DigestAlgorithm::Sha224 => derive_with::<Sha224>(id, password, salt, iterations, len),
        DigestAlgorithm::Sha256 => derive_with::<Sha256>(id, password, salt, iterations, len),
        DigestAlgorithm::Sha384 => derive_with::<Sha384>(id, password, salt, iterations, len),
        DigestAlgorithm::Sha512 => derive_with::<Sha512>(id, password, salt, iterations, len),
    }
}

fn derive_with<D>(id: u8, password: &[u8], salt: &[u8], iterations: u32, len: usize) -> Vec<u8>
where
    D: Digest + FixedOutputReset + BlockSizeUser,
{
    let u = <D as Digest>::output_size();
    let v = D::block_size();

    let diversifier = vec![id; v];
    let mut input = fill(salt, v);
    input.extend(fill(password, v));

    let mut out = Vec::with_capacity(len.div_ceil(u) * u);
    let mut hasher = D::new();
    while out.len() < len {
        Digest::update(&mut hasher, &diversifier);
        Digest::update(&mut hasher, &input);
        let mut block = hasher.finalize_reset();
        for _ in 1..iterations {
            Digest::update(&mut hasher, &block);
            block = hasher.finalize_reset();
        }
        out.extend_from_slice(&block);

        if out.len() < len {
            let b = fill(&block, v);
            for chunk in input.chunks_exact_mut(v) {
                add_with_carry(chunk, &b);
            }
        }
    }
    out.truncate(len);
    out
}

/// Repeat `data` up to the next multiple of `v` bytes; empty stays empty.
fn fill(data: &[u8], v: usize) -> Vec<u8> {
    let len = data.len().div_ceil(v) * v;
    data.iter().copied().cycle().take(len).collect()
}

/// chunk = (chunk + b + 1) mod 2^(8v)
fn add_with_carry(chunk: &mut [u8], b: &[u8]) {
    let mut carry = 1u16;
    for (x, y) in chunk.iter_mut().zip(b).rev() {
        let sum = u16::from(*x) + u16::from(*y) + carry;
        *x = sum as u8;
        carry = sum >> 8;
    }
}
