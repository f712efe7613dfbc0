//! The standard head/tail codec.
//!
//! Every argument occupies a fixed-width head slot (a multiple of 32
//! bytes); dynamic arguments store an offset in their head slot and their
//! real payload in the tail that follows all heads. The same discipline
//! recurses for arrays, fixed arrays of dynamic elements, and dynamic
//! tuples, with offsets always measured from the start of the region they
//! live in (`region_start`), not from the start of the whole buffer.

use crate::error::{AbiError, AbiResult};
use crate::types::Type;
use crate::utf8;
use crate::value::{Detokenize, Tokenize, Value};
use failure::Error;
use num_bigint::{BigInt, BigUint, Sign};
use num256::Uint256;

const WORD: usize = 32;

// ---------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------

/// Top-level standard encode.
pub fn encode(types: &[Type], values: &[Value]) -> AbiResult<Vec<u8>> {
    encode_sequence(types, values)
}

/// Single-type convenience wrapper around [encode].
pub fn encode_single(ty: &Type, value: &Value) -> AbiResult<Vec<u8>> {
    encode(std::slice::from_ref(ty), std::slice::from_ref(value))
}

/// Encodes a named composite (anything implementing [Tokenize]) against a
/// tuple's field types, realizing the encode-side of the tuple/struct
/// duality.
pub fn encode_tuple<T: Tokenize>(types: &[Type], value: T) -> AbiResult<Vec<u8>> {
    encode(types, &value.into_tuple_values())
}

/// Encode prepended with a caller-supplied byte string — typically a
/// 4-byte function selector or contract-creation bytecode.
pub fn encode_with_prefix(prefix: &[u8], types: &[Type], values: &[Value]) -> AbiResult<Vec<u8>> {
    let mut out = Vec::with_capacity(prefix.len() + types.len() * WORD);
    out.extend_from_slice(prefix);
    out.extend(encode(types, values)?);
    Ok(out)
}

/// Top-level standard decode.
pub fn decode(types: &[Type], data: &[u8]) -> AbiResult<Vec<Value>> {
    if types.is_empty() {
        return if data.is_empty() {
            Ok(Vec::new())
        } else {
            Err(Error::from(AbiError::NonEmptyInputEmptyTypes))
        };
    }
    if data.is_empty() {
        return Err(Error::from(AbiError::EmptyInputNonEmptyTypes));
    }
    decode_sequence(types, data, 0)
}

/// Single-type convenience wrapper around [decode].
pub fn decode_single(ty: &Type, data: &[u8]) -> AbiResult<Value> {
    let mut values = decode(std::slice::from_ref(ty), data)?;
    Ok(values.remove(0))
}

/// Decodes into a named composite (anything implementing [Detokenize]),
/// realizing the decode-side of the tuple/struct duality.
pub fn decode_tuple<T: Detokenize>(types: &[Type], data: &[u8]) -> AbiResult<T> {
    let values = decode(types, data)?;
    T::from_tuple_values(values).ok_or_else(|| Error::from(AbiError::TypeMismatch("tuple".to_owned())))
}

/// Skips the first `prefix_len` bytes, then performs a normal top-level
/// decode; offsets read from the head are relative to the first byte
/// after the prefix.
pub fn decode_with_prefix(prefix_len: usize, types: &[Type], data: &[u8]) -> AbiResult<Vec<Value>> {
    if data.len() < prefix_len {
        return Err(Error::from(AbiError::PrefixTooShort {
            prefix_len,
            have: data.len(),
        }));
    }
    decode(types, &data[prefix_len..])
}

// ---------------------------------------------------------------------
// Head/tail assembly
// ---------------------------------------------------------------------

/// The general head/tail builder: used both for the top-level argument
/// list and, recursively, for the contents of an `Array`, a dynamic
/// `FixedArray`, or a dynamic `Tuple`. Each dynamic element's offset is
/// computed relative to the start of *this* region.
fn encode_sequence(types: &[Type], values: &[Value]) -> AbiResult<Vec<u8>> {
    if types.len() != values.len() {
        return Err(Error::from(AbiError::ArityMismatch {
            expected: types.len(),
            got: values.len(),
        }));
    }

    // `None` head slot means "dynamic: fill in an offset once head_len is known".
    let mut heads: Vec<Option<Vec<u8>>> = Vec::with_capacity(types.len());
    let mut tails: Vec<Vec<u8>> = Vec::with_capacity(types.len());
    for (t, v) in types.iter().zip(values) {
        if t.is_dynamic() {
            tails.push(encode_dynamic_tail(t, v)?);
            heads.push(None);
        } else {
            heads.push(Some(encode_static(t, v)?));
            tails.push(Vec::new());
        }
    }

    let head_len: usize = heads.iter().map(|h| h.as_ref().map_or(WORD, Vec::len)).sum();
    let tail_len: usize = tails.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(head_len + tail_len);
    let mut cursor = head_len;
    for (head, tail) in heads.iter().zip(&tails) {
        match head {
            Some(bytes) => out.extend_from_slice(bytes),
            None => {
                out.extend_from_slice(&encode_word(cursor as u64));
                cursor += tail.len();
            }
        }
    }
    for tail in tails {
        out.extend(tail);
    }
    Ok(out)
}

/// Exposes [encode_static] to the packed codec, which reuses the standard
/// codec's static-head encoding for array elements (padded to a full word,
/// sign extension included) while using its own unpadded rules elsewhere.
pub(crate) fn encode_static_for_packed(t: &Type, v: &Value) -> AbiResult<Vec<u8>> {
    encode_static(t, v)
}

/// Encodes a value of a statically-sized type into its inline head bytes
/// (exactly `headLen(t)` bytes — 32 for leaves, a multiple of 32 for a
/// static `FixedArray`/`Tuple`). Never called with a dynamic `t`.
fn encode_static(t: &Type, v: &Value) -> AbiResult<Vec<u8>> {
    match (t, v) {
        (Type::Address, Value::Address(bytes)) => {
            let mut out = vec![0u8; WORD];
            out[12..].copy_from_slice(bytes);
            Ok(out)
        }
        (Type::Bool, Value::Bool(b)) => {
            let mut out = vec![0u8; WORD];
            out[31] = *b as u8;
            Ok(out)
        }
        (Type::UInt(n), Value::Uint(u)) => Ok(encode_uint_word(*n, u)?.to_vec()),
        (Type::Int(n), Value::Int(i)) => Ok(encode_int_word(*n, i)?.to_vec()),
        (Type::FixedBytes(k), Value::FixedBytes(bytes)) => {
            if bytes.len() != *k as usize {
                return Err(Error::from(AbiError::FixedLengthMismatch {
                    expected: *k as usize,
                    got: bytes.len(),
                }));
            }
            let mut out = vec![0u8; WORD];
            out[..bytes.len()].copy_from_slice(bytes);
            Ok(out)
        }
        (Type::FixedArray(len, inner), Value::Array(elems)) => {
            if elems.len() as u64 != *len {
                return Err(Error::from(AbiError::FixedArityMismatch {
                    expected: *len,
                    got: elems.len(),
                }));
            }
            let mut out = Vec::with_capacity(elems.len() * WORD);
            for e in elems {
                out.extend(encode_static(inner, e)?);
            }
            Ok(out)
        }
        (Type::Tuple(inners), Value::Tuple(vals)) => {
            if inners.len() != vals.len() {
                return Err(Error::from(AbiError::ArityMismatch {
                    expected: inners.len(),
                    got: vals.len(),
                }));
            }
            let mut out = Vec::new();
            for (it, iv) in inners.iter().zip(vals) {
                out.extend(encode_static(it, iv)?);
            }
            Ok(out)
        }
        _ => Err(Error::from(AbiError::TypeMismatch(t.abi_type()))),
    }
}

/// Encodes a value of a dynamic type into its full tail region (the
/// structural word(s) plus payload, recursing through [encode_sequence]
/// for arrays/tuples).
fn encode_dynamic_tail(t: &Type, v: &Value) -> AbiResult<Vec<u8>> {
    match (t, v) {
        (Type::Bytes, Value::Bytes(bytes)) => Ok(encode_length_prefixed(bytes)),
        (Type::String, Value::String(s)) => {
            let payload_len = utf8::utf8_len_str(s);
            let mut out = Vec::with_capacity(WORD + align32(payload_len));
            out.extend_from_slice(&encode_word(payload_len as u64));
            out.extend_from_slice(s.as_bytes());
            pad_to_word(&mut out);
            Ok(out)
        }
        (Type::Array(inner), Value::Array(elems)) => {
            let mut out = Vec::new();
            out.extend_from_slice(&encode_word(elems.len() as u64));
            let types = repeat_type(inner, elems.len());
            out.extend(encode_sequence(&types, elems)?);
            Ok(out)
        }
        (Type::FixedArray(len, inner), Value::Array(elems)) => {
            if elems.len() as u64 != *len {
                return Err(Error::from(AbiError::FixedArityMismatch {
                    expected: *len,
                    got: elems.len(),
                }));
            }
            let types = repeat_type(inner, elems.len());
            encode_sequence(&types, elems)
        }
        (Type::Tuple(inners), Value::Tuple(vals)) => {
            if inners.len() != vals.len() {
                return Err(Error::from(AbiError::ArityMismatch {
                    expected: inners.len(),
                    got: vals.len(),
                }));
            }
            encode_sequence(inners, vals)
        }
        _ => Err(Error::from(AbiError::TypeMismatch(t.abi_type()))),
    }
}

fn encode_length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD + align32(bytes.len()));
    out.extend_from_slice(&encode_word(bytes.len() as u64));
    out.extend_from_slice(bytes);
    pad_to_word(&mut out);
    out
}

fn repeat_type(inner: &Type, n: usize) -> Vec<Type> {
    std::iter::repeat(inner.clone()).take(n).collect()
}

fn align32(n: usize) -> usize {
    (n + WORD - 1) / WORD * WORD
}

fn pad_to_word(out: &mut Vec<u8>) {
    let padded = align32(out.len());
    out.resize(padded, 0);
}

fn encode_word(n: u64) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    out[WORD - 8..].copy_from_slice(&n.to_be_bytes());
    out
}

fn encode_uint_word(n: u16, value: &Uint256) -> AbiResult<[u8; WORD]> {
    if value.bits() as u64 > u64::from(n) {
        return Err(Error::from(AbiError::IntegerOutOfRange(n)));
    }
    let bytes = value.to_bytes_be();
    let mut out = [0u8; WORD];
    out[WORD - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

fn encode_int_word(n: u16, value: &BigInt) -> AbiResult<[u8; WORD]> {
    let half_range = BigInt::from(1u8) << ((n - 1) as usize);
    let min = -&half_range;
    let max = &half_range - 1;
    if *value < min || *value > max {
        return Err(Error::from(AbiError::IntegerOutOfRange(n)));
    }
    Ok(encode_int_full_word(value))
}

/// Full 256-bit two's-complement encoding, independent of the declared
/// width `n` — the ABI always sign-extends `Int(n)` to a full word.
fn encode_int_full_word(value: &BigInt) -> [u8; WORD] {
    let negative = value.sign() == Sign::Minus;
    let pad_byte = if negative { 0xFFu8 } else { 0x00u8 };
    let mut out = [pad_byte; WORD];
    let wrapped = if negative {
        value + (BigInt::from(1u8) << 256)
    } else {
        value.clone()
    };
    let magnitude = wrapped
        .to_biguint()
        .expect("wrapped value is non-negative by construction");
    let bytes = magnitude.to_bytes_be();
    out[WORD - bytes.len()..].copy_from_slice(&bytes);
    out
}

// ---------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------

/// Walks the head region of `types` starting at `region_start`, resolving
/// any dynamic argument's offset relative to `region_start` and decoding
/// its tail recursively. This is the single decode routine used both for
/// the top-level call and for nested array/tuple sub-regions.
fn decode_sequence(types: &[Type], data: &[u8], region_start: usize) -> AbiResult<Vec<Value>> {
    let mut cursor = region_start;
    let mut out = Vec::with_capacity(types.len());
    for t in types {
        if t.is_dynamic() {
            let offset = read_offset(data, cursor)?;
            let target = region_start
                .checked_add(offset)
                .filter(|&p| p <= data.len())
                .ok_or_else(|| {
                    Error::from(AbiError::OffsetOutOfBounds {
                        offset,
                        len: data.len(),
                    })
                })?;
            out.push(decode_dynamic(t, data, target)?);
            cursor += WORD;
        } else {
            let (value, consumed) = decode_static(t, data, cursor)?;
            out.push(value);
            cursor += consumed;
        }
    }
    Ok(out)
}

fn decode_static(t: &Type, data: &[u8], pos: usize) -> AbiResult<(Value, usize)> {
    match t {
        Type::Address => {
            let word = read_word(data, pos)?;
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&word[12..]);
            Ok((Value::Address(addr), WORD))
        }
        Type::Bool => {
            let word = read_word(data, pos)?;
            Ok((Value::Bool(word[31] != 0), WORD))
        }
        Type::UInt(_) => {
            let word = read_word(data, pos)?;
            Ok((Value::Uint(Uint256::from_bytes_be(word)), WORD))
        }
        Type::Int(_) => {
            let word = read_word(data, pos)?;
            Ok((Value::Int(decode_int_word(word)), WORD))
        }
        Type::FixedBytes(k) => {
            let word = read_word(data, pos)?;
            Ok((Value::FixedBytes(word[..*k as usize].to_vec()), WORD))
        }
        Type::FixedArray(len, inner) => {
            let mut values = Vec::with_capacity(*len as usize);
            let mut p = pos;
            for _ in 0..*len {
                let (value, consumed) = decode_static(inner, data, p)?;
                values.push(value);
                p += consumed;
            }
            Ok((Value::Array(values), p - pos))
        }
        Type::Tuple(inners) => {
            let mut values = Vec::with_capacity(inners.len());
            let mut p = pos;
            for it in inners {
                let (value, consumed) = decode_static(it, data, p)?;
                values.push(value);
                p += consumed;
            }
            Ok((Value::Tuple(values), p - pos))
        }
        Type::Bytes | Type::String | Type::Array(_) => {
            unreachable!("dynamic types are routed through decode_dynamic")
        }
    }
}

fn decode_dynamic(t: &Type, data: &[u8], target: usize) -> AbiResult<Value> {
    match t {
        Type::Bytes => {
            let len = read_offset(data, target)?;
            Ok(Value::Bytes(read_bytes(data, target + WORD, len)?))
        }
        Type::String => {
            let len = read_offset(data, target)?;
            let bytes = read_bytes(data, target + WORD, len)?;
            Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Type::Array(inner) => {
            let len = read_offset(data, target)?;
            let types = repeat_type(inner, len);
            let values = decode_sequence(&types, data, target + WORD)?;
            Ok(Value::Array(values))
        }
        Type::FixedArray(len, inner) => {
            let types = repeat_type(inner, *len as usize);
            let values = decode_sequence(&types, data, target)?;
            Ok(Value::Array(values))
        }
        Type::Tuple(inners) => {
            let values = decode_sequence(inners, data, target)?;
            Ok(Value::Tuple(values))
        }
        _ => unreachable!("static types are routed through decode_static"),
    }
}

fn decode_int_word(word: &[u8]) -> BigInt {
    let magnitude = BigUint::from_bytes_be(word);
    if word[0] & 0x80 != 0 {
        BigInt::from(magnitude) - (BigInt::from(1u8) << 256)
    } else {
        BigInt::from(magnitude)
    }
}

fn read_word(data: &[u8], pos: usize) -> AbiResult<&[u8]> {
    if pos + WORD > data.len() {
        return Err(Error::from(AbiError::BufferTooShort {
            need: pos + WORD,
            have: data.len(),
        }));
    }
    Ok(&data[pos..pos + WORD])
}

fn read_bytes(data: &[u8], pos: usize, len: usize) -> AbiResult<Vec<u8>> {
    if pos + len > data.len() {
        return Err(Error::from(AbiError::BufferTooShort {
            need: pos + len,
            have: data.len(),
        }));
    }
    Ok(data[pos..pos + len].to_vec())
}

/// Reads a 32-byte offset/length word as a `usize`, rejecting a non-zero
/// high-order 28 bytes — a hostile input could otherwise set those bits
/// while a compliant encoder always writes zero there. Mirrors the
/// `ethabi` reference decoder's `as_usize`.
fn read_offset(data: &[u8], pos: usize) -> AbiResult<usize> {
    let word = read_word(data, pos)?;
    if word[..28].iter().any(|&b| b != 0) {
        return Err(Error::from(AbiError::InvalidOffsetEncoding));
    }
    let mut v: u64 = 0;
    for &b in &word[28..] {
        v = (v << 8) | u64::from(b);
    }
    Ok(v as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::parse_signature;

    fn roundtrip(sig: &str, values: Vec<Value>) -> Vec<u8> {
        let types = parse_signature(sig).unwrap();
        let encoded = encode(&types, &values).unwrap();
        let decoded = decode(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
        encoded
    }

    #[test]
    fn encodes_single_uint256() {
        let encoded = roundtrip("uint256", vec![Value::from(69u32)]);
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[31], 69);
    }

    #[test]
    fn encodes_dynamic_string() {
        roundtrip("string", vec![Value::from("dave")]);
    }

    #[test]
    fn encodes_dynamic_array_of_uint256() {
        roundtrip(
            "uint256[]",
            vec![Value::Array(vec![Value::from(1u32), Value::from(2u32), Value::from(3u32)])],
        );
    }

    #[test]
    fn encodes_mixed_static_and_dynamic_tuple() {
        roundtrip(
            "(uint256,string,bool)",
            vec![Value::Tuple(vec![
                Value::from(42u32),
                Value::from("hello"),
                Value::Bool(true),
            ])],
        );
    }

    #[test]
    fn encodes_negative_signed_int() {
        roundtrip("int256", vec![Value::from(-1i64)]);
        roundtrip("int8", vec![Value::from(-128i64)]);
    }

    #[test]
    fn matches_solidity_abi_spec_sam_fixture() {
        // sam(bytes,bool,uint256[]) called with ("dave", true, [1,2,3]),
        // the worked example from the Solidity ABI specification.
        let types = parse_signature("bytes,bool,uint256[]").unwrap();
        let values = vec![
            Value::Bytes(b"dave".to_vec()),
            Value::Bool(true),
            Value::Array(vec![Value::from(1u32), Value::from(2u32), Value::from(3u32)]),
        ];
        let encoded = encode(&types, &values).unwrap();
        let expected = concat!(
            "0000000000000000000000000000000000000000000000000000000000000060",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "00000000000000000000000000000000000000000000000000000000000000a0",
            "0000000000000000000000000000000000000000000000000000000000000004",
            "6461766500000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000003",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000003",
        );
        assert_eq!(crate::utils::bytes_to_hex_str(&encoded), expected);
        assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn rejects_arity_mismatch() {
        let types = parse_signature("uint256,bool").unwrap();
        let values = vec![Value::from(1u32)];
        assert!(encode(&types, &values).is_err());
    }

    #[test]
    fn rejects_fixed_array_length_mismatch() {
        let types = parse_signature("uint256[3]").unwrap();
        let values = vec![Value::Array(vec![Value::from(1u32), Value::from(2u32)])];
        assert!(encode(&types, &values).is_err());
    }

    #[test]
    fn rejects_buffer_too_short() {
        let types = parse_signature("uint256,uint256").unwrap();
        let short = vec![0u8; 32];
        assert!(decode(&types, &short).is_err());
    }

    #[test]
    fn rejects_offset_with_nonzero_high_bytes() {
        let types = parse_signature("string").unwrap();
        let mut data = vec![0u8; 64];
        data[0] = 0x01; // high-order byte of the offset word set
        data[31] = 0x20;
        assert!(decode(&types, &data).is_err());
    }

    #[test]
    fn empty_types_and_empty_data_agree() {
        assert_eq!(decode(&[], &[]).unwrap(), Vec::<Value>::new());
        assert!(decode(&[], &[0u8; 32]).is_err());
        assert!(decode(&[Type::Bool], &[]).is_err());
    }

    #[test]
    fn prefix_transparent_decode() {
        let types = parse_signature("uint256").unwrap();
        let values = vec![Value::from(7u32)];
        let encoded = encode_with_prefix(&[0xAA, 0xBB, 0xCC, 0xDD], &types, &values).unwrap();
        assert_eq!(decode_with_prefix(4, &types, &encoded).unwrap(), values);
    }

    #[test]
    fn decodes_nested_dynamic_arrays() {
        roundtrip(
            "uint256[][]",
            vec![Value::Array(vec![
                Value::Array(vec![Value::from(1u32), Value::from(2u32)]),
                Value::Array(vec![Value::from(3u32)]),
            ])],
        );
    }

    #[test]
    fn tokenize_detokenize_roundtrip_through_encode_tuple() {
        let types = parse_signature("uint256,bool").unwrap();
        let values: Vec<Value> = vec![Value::from(5u32), Value::Bool(false)];
        let encoded = encode_tuple(&types, values.clone()).unwrap();
        let decoded: Vec<Value> = decode_tuple(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }
}
