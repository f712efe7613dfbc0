//! UTF-8 length helper.
//!
//! Computes the number of bytes a text value will occupy once UTF-8
//! encoded, without materializing the bytes, so `String`/`Bytes` tail
//! buffers can be pre-allocated to the right size up front.

use crate::error::{AbiError, AbiResult};
use failure::Error;

/// Byte length of an already-valid Rust `&str` once UTF-8 encoded. Rust
/// strings are UTF-8 internally, so this is just `s.len()` — the fast path
/// every well-formed `String` value takes.
pub fn utf8_len_str(s: &str) -> usize {
    s.len()
}

/// Byte length a sequence of UTF-16 code units would occupy once
/// transcoded to UTF-8, without allocating the output.
///
/// Mirrors the source's three-tier loop: single-byte for code units below
/// `0x80`, two-byte below `0x800`, then a general path that pairs
/// surrogates into 4-byte encodings and rejects an unpaired surrogate
/// rather than silently producing replacement characters.
pub fn utf8_len(units: &[u16]) -> AbiResult<usize> {
    let mut len = 0usize;
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if unit < 0x80 {
            len += 1;
            i += 1;
        } else if unit < 0x800 {
            len += 2;
            i += 1;
        } else if (0xD800..=0xDBFF).contains(&unit) {
            // High surrogate: must be immediately followed by a low surrogate.
            match units.get(i + 1) {
                Some(&low) if (0xDC00..=0xDFFF).contains(&low) => {
                    len += 4;
                    i += 2;
                }
                _ => return Err(Error::from(AbiError::IllFormedSurrogate)),
            }
        } else if (0xDC00..=0xDFFF).contains(&unit) {
            // Unpaired low surrogate.
            return Err(Error::from(AbiError::IllFormedSurrogate));
        } else {
            len += 3;
            i += 1;
        }
    }
    Ok(len)
}

#[test]
fn agrees_with_rust_str_len_for_well_formed_text() {
    for sample in &["hello", "z", "", "不", "\u{1F600}", "mixed 汉字 and emoji 🎉"] {
        let units: Vec<u16> = sample.encode_utf16().collect();
        assert_eq!(utf8_len(&units).unwrap(), sample.len());
        assert_eq!(utf8_len_str(sample), sample.len());
    }
}

#[test]
fn rejects_unpaired_surrogates() {
    assert!(utf8_len(&[0xD800]).is_err());
    assert!(utf8_len(&[0xDC00]).is_err());
    assert!(utf8_len(&[0xD800, 0x0041]).is_err());
}

#[test]
fn accepts_paired_surrogates() {
    // U+1F600 GRINNING FACE, encoded as a surrogate pair.
    assert_eq!(utf8_len(&[0xD83D, 0xDE00]).unwrap(), 4);
}
