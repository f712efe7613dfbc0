//! The non-standard packed codec, used for digest-style hashing.
//!
//! Unlike the standard codec, elements outside an array are concatenated
//! with no padding at all and no offsets; elements inside an array are
//! each padded to a 32-byte word using the same rules as the standard
//! codec's static head slots. `Tuple` and any array of dynamic or
//! nested-array elements are rejected outright. This is write-only; there
//! is no packed decoder.

use crate::error::{AbiError, AbiResult};
use crate::types::Type;
use crate::value::Value;
use failure::Error;
use num_bigint::{BigInt, Sign};
use num256::Uint256;

/// Non-standard packed encoding.
///
/// Validation happens in a preliminary pass over every `(type, value)`
/// pair before anything is written, so an invalid element (a tuple, or a
/// nested-dynamic array) never leaves a partially-written buffer behind.
pub fn encode_packed(types: &[Type], values: &[Value]) -> AbiResult<Vec<u8>> {
    if types.len() != values.len() {
        return Err(Error::from(AbiError::ArityMismatch {
            expected: types.len(),
            got: values.len(),
        }));
    }
    for t in types {
        validate_packed_type(t)?;
    }

    let mut out = Vec::new();
    for (t, v) in types.iter().zip(values) {
        encode_packed_value(t, v, false, &mut out)?;
    }
    Ok(out)
}

fn validate_packed_type(t: &Type) -> AbiResult<()> {
    match t {
        Type::Tuple(_) => Err(Error::from(AbiError::PackedTupleRejected)),
        Type::Array(inner) | Type::FixedArray(_, inner) => {
            if inner.is_dynamic() || matches!(inner.as_ref(), Type::Array(_) | Type::FixedArray(_, _)) {
                Err(Error::from(AbiError::PackedNestedDynamicRejected))
            } else {
                validate_packed_type(inner)
            }
        }
        _ => Ok(()),
    }
}

fn encode_packed_value(t: &Type, v: &Value, in_array: bool, out: &mut Vec<u8>) -> AbiResult<()> {
    if in_array {
        // Every packed-array element is padded exactly like a standard-codec
        // static head slot, sign extension for negative `Int` included —
        // even though outside an array `Int`/`UInt` take only `n/8` bytes.
        out.extend(crate::codec::encode_static_for_packed(t, v)?);
        return Ok(());
    }

    match (t, v) {
        (Type::Address, Value::Address(bytes)) => {
            out.extend_from_slice(bytes);
            Ok(())
        }
        (Type::Bool, Value::Bool(b)) => {
            out.push(*b as u8);
            Ok(())
        }
        (Type::UInt(n), Value::Uint(u)) => {
            out.extend(encode_uint_minimal(*n, u)?);
            Ok(())
        }
        (Type::Int(n), Value::Int(i)) => {
            out.extend(encode_int_minimal(*n, i)?);
            Ok(())
        }
        (Type::FixedBytes(k), Value::FixedBytes(bytes)) => {
            if bytes.len() != *k as usize {
                return Err(Error::from(AbiError::FixedLengthMismatch {
                    expected: *k as usize,
                    got: bytes.len(),
                }));
            }
            out.extend_from_slice(bytes);
            Ok(())
        }
        (Type::Bytes, Value::Bytes(bytes)) => {
            out.extend_from_slice(bytes);
            Ok(())
        }
        (Type::String, Value::String(s)) => {
            out.extend_from_slice(s.as_bytes());
            Ok(())
        }
        (Type::Array(inner), Value::Array(elems)) | (Type::FixedArray(_, inner), Value::Array(elems)) => {
            for e in elems {
                encode_packed_value(inner, e, true, out)?;
            }
            Ok(())
        }
        _ => Err(Error::from(AbiError::TypeMismatch(t.abi_type()))),
    }
}

fn encode_uint_minimal(n: u16, value: &Uint256) -> AbiResult<Vec<u8>> {
    if value.bits() as u64 > u64::from(n) {
        return Err(Error::from(AbiError::IntegerOutOfRange(n)));
    }
    let width = (n / 8) as usize;
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

fn encode_int_minimal(n: u16, value: &BigInt) -> AbiResult<Vec<u8>> {
    let half_range = BigInt::from(1u8) << ((n - 1) as usize);
    let min = -&half_range;
    let max = &half_range - 1;
    if *value < min || *value > max {
        return Err(Error::from(AbiError::IntegerOutOfRange(n)));
    }
    let width = (n / 8) as usize;
    let negative = value.sign() == Sign::Minus;
    let modulus = BigInt::from(1u8) << (width * 8);
    let wrapped = if negative { value + &modulus } else { value.clone() };
    let magnitude = wrapped
        .to_biguint()
        .expect("wrapped value is non-negative by construction");
    let bytes = magnitude.to_bytes_be();
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::parse_signature;

    #[test]
    fn packs_without_padding_outside_arrays() {
        let types = parse_signature("uint16,uint16").unwrap();
        let values = vec![Value::from(1u32), Value::from(2u32)];
        let encoded = encode_packed(&types, &values).unwrap();
        assert_eq!(encoded, vec![0x00, 0x01, 0x00, 0x02]);
    }

    #[test]
    fn packs_address_and_bool_minimally() {
        let types = parse_signature("address,bool").unwrap();
        let mut addr = [0u8; 20];
        addr[19] = 0x42;
        let values = vec![Value::Address(addr), Value::Bool(true)];
        let encoded = encode_packed(&types, &values).unwrap();
        assert_eq!(encoded.len(), 21);
        assert_eq!(encoded[19], 0x42);
        assert_eq!(encoded[20], 1);
    }

    #[test]
    fn packs_bytes_and_string_without_length_prefix() {
        let types = parse_signature("bytes,string").unwrap();
        let values = vec![
            Value::Bytes(vec![0xde, 0xad]),
            Value::String("hi".to_owned()),
        ];
        let encoded = encode_packed(&types, &values).unwrap();
        assert_eq!(encoded, vec![0xde, 0xad, b'h', b'i']);
    }

    #[test]
    fn pads_array_elements_to_a_full_word() {
        let types = parse_signature("uint8[2]").unwrap();
        let values = vec![Value::Array(vec![Value::from(1u32), Value::from(2u32)])];
        let encoded = encode_packed(&types, &values).unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 1);
        assert_eq!(encoded[63], 2);
    }

    #[test]
    fn sign_extends_negative_ints_inside_an_array_but_not_outside() {
        let outside = parse_signature("int8").unwrap();
        let encoded = encode_packed(&outside, &[Value::from(-1i64)]).unwrap();
        assert_eq!(encoded, vec![0xff]);

        let inside = parse_signature("int8[1]").unwrap();
        let encoded = encode_packed(&inside, &[Value::Array(vec![Value::from(-1i64)])]).unwrap();
        assert_eq!(encoded, vec![0xff; 32]);
    }

    #[test]
    fn rejects_tuples() {
        let types = parse_signature("(uint256,bool)").unwrap();
        let values = vec![Value::Tuple(vec![Value::from(1u32), Value::Bool(true)])];
        assert!(encode_packed(&types, &values).is_err());
    }

    #[test]
    fn rejects_arrays_of_dynamic_elements() {
        let types = parse_signature("string[]").unwrap();
        let values = vec![Value::Array(vec![Value::from("a")])];
        assert!(encode_packed(&types, &values).is_err());
    }

    #[test]
    fn rejects_nested_arrays() {
        let types = parse_signature("uint256[][]").unwrap();
        let values = vec![Value::Array(vec![Value::Array(vec![Value::from(1u32)])])];
        assert!(encode_packed(&types, &values).is_err());
    }

    #[test]
    fn rejects_out_of_range_minimal_width() {
        let types = parse_signature("uint8").unwrap();
        assert!(encode_packed(&types, &[Value::from(256u32)]).is_err());
    }
}
