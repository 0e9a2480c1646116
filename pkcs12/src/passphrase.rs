use std::fmt;

/// The passphrase a container is opened with.
///
/// The PKCS#12 KDF takes the passphrase as a NUL terminated BMPString while
/// PBES2 takes its UTF-8 bytes. The empty passphrase is ambiguous on the wire:
/// writers disagree on whether the terminator is included, so it yields two
/// candidate encodings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Passphrase(String);

impl Passphrase {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(passphrase.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn utf8(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// BMPString encodings for the PKCS#12 KDF, most common first.
    pub(crate) fn bmp_candidates(&self) -> Vec<Vec<u8>> {
        let mut terminated: Vec<u8> = self.0.encode_utf16().flat_map(u16::to_be_bytes).collect();
        terminated.extend([0, 0]);
        if self.is_empty() {
            vec![terminated, Vec::new()]
        } else {
            vec![terminated]
        }
    }
}

impl From<&str> for Passphrase {
    fn from(passphrase: &str) -> Self {
        Self::new(passphrase)
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(..)")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty("", vec![vec![0, 0], vec![]])]
    #[case::ascii("ab", vec![vec![0x00, 0x61, 0x00, 0x62, 0x00, 0x00]])]
    #[case::non_ascii("é", vec![vec![0x00, 0xe9, 0x00, 0x00]])]
    fn test_bmp_candidates(#[case] input: &str, #[case] expected: Vec<Vec<u8>>) {
        assert_eq!(expected, Passphrase::from(input).bmp_candidates());
    }

    #[test]
    fn test_debug_hides_passphrase() {
        assert_eq!("Passphrase(..)", format!("{:?}", Passphrase::new("secret")));
    }
}
