//! The ABI type model.
//!
//! A [Type] is an immutable, structurally-comparable description of one
//! Solidity ABI type. Nodes are produced either by [crate::signature] or by
//! the constructors here; both paths validate constraints eagerly so the
//! codec never has to cope with an invalid type.

use crate::error::{AbiError, AbiResult};
use failure::Error;
use serde_derive::{Deserialize, Serialize};

/// One node of the ABI type tree.
///
/// Equality and hashing are structural: two nodes compare equal iff they
/// carry the same variant tag and, recursively, equal parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// 20-byte account identifier.
    Address,
    /// One-bit truth value.
    Bool,
    /// Unsigned integer, `n` bits wide, `n` a multiple of 8 in `8..=256`.
    UInt(u16),
    /// Signed two's-complement integer, same width constraints as `UInt`.
    Int(u16),
    /// Byte string of a fixed width `k` in `1..=32`.
    FixedBytes(u8),
    /// Arbitrary-length byte string.
    Bytes,
    /// UTF-8 text.
    String,
    /// Sequence of exactly `len` elements of `inner`.
    FixedArray(u64, Box<Type>),
    /// Variable-length sequence of `inner`.
    Array(Box<Type>),
    /// Heterogeneous ordered composite.
    Tuple(Vec<Type>),
}

impl Type {
    /// Validating constructor for `uint<n>` / bare `uint` (alias for `uint256`).
    pub fn uint(n: u16) -> AbiResult<Type> {
        validate_bit_width(n)?;
        Ok(Type::UInt(n))
    }

    /// Validating constructor for `int<n>` / bare `int` (alias for `int256`).
    pub fn int(n: u16) -> AbiResult<Type> {
        validate_bit_width(n)?;
        Ok(Type::Int(n))
    }

    /// Validating constructor for `bytes<k>`.
    pub fn fixed_bytes(k: u16) -> AbiResult<Type> {
        if k < 1 || k > 32 {
            return Err(Error::from(AbiError::InvalidFixedBytesWidth(k)));
        }
        Ok(Type::FixedBytes(k as u8))
    }

    /// Constructor for `<inner>[len]`. `len` is a `u64` so it is never negative.
    pub fn fixed_array(len: u64, inner: Type) -> Type {
        Type::FixedArray(len, Box::new(inner))
    }

    /// Constructor for `<inner>[]`.
    pub fn array(inner: Type) -> Type {
        Type::Array(Box::new(inner))
    }

    /// Constructor for `(<inner1>,<inner2>,...)`.
    pub fn tuple(inners: Vec<Type>) -> Type {
        Type::Tuple(inners)
    }

    /// Whether this type's encoded size depends on the value:
    /// `Bytes`/`String`/`Array` always are; `FixedArray`/`Tuple` are iff an
    /// inner type is.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Type::Address
            | Type::Bool
            | Type::UInt(_)
            | Type::Int(_)
            | Type::FixedBytes(_) => false,
            Type::Bytes | Type::String | Type::Array(_) => true,
            Type::FixedArray(_, inner) => inner.is_dynamic(),
            Type::Tuple(inners) => inners.iter().any(Type::is_dynamic),
        }
    }

    /// The canonical textual form used in signatures and selector derivation.
    pub fn abi_type(&self) -> String {
        match self {
            Type::Address => "address".to_owned(),
            Type::Bool => "bool".to_owned(),
            Type::UInt(n) => format!("uint{}", n),
            Type::Int(n) => format!("int{}", n),
            Type::FixedBytes(k) => format!("bytes{}", k),
            Type::Bytes => "bytes".to_owned(),
            Type::String => "string".to_owned(),
            Type::FixedArray(len, inner) => format!("{}[{}]", inner.abi_type(), len),
            Type::Array(inner) => format!("{}[]", inner.abi_type()),
            Type::Tuple(inners) => {
                let parts: Vec<String> = inners.iter().map(Type::abi_type).collect();
                format!("({})", parts.join(","))
            }
        }
    }
}

fn validate_bit_width(n: u16) -> AbiResult<()> {
    if n < 8 || n > 256 || n % 8 != 0 {
        return Err(Error::from(AbiError::InvalidIntWidth(n)));
    }
    Ok(())
}

#[test]
fn dynamic_classification() {
    assert!(!Type::Address.is_dynamic());
    assert!(!Type::Bool.is_dynamic());
    assert!(!Type::uint(256).unwrap().is_dynamic());
    assert!(!Type::int(8).unwrap().is_dynamic());
    assert!(!Type::fixed_bytes(32).unwrap().is_dynamic());
    assert!(Type::Bytes.is_dynamic());
    assert!(Type::String.is_dynamic());
    assert!(Type::array(Type::Address).is_dynamic());
    assert!(!Type::fixed_array(3, Type::Address).is_dynamic());
    assert!(Type::fixed_array(3, Type::String).is_dynamic());
    assert!(!Type::tuple(vec![Type::Address, Type::Bool]).is_dynamic());
    assert!(Type::tuple(vec![Type::Address, Type::String]).is_dynamic());
}

#[test]
fn canonical_text_form() {
    assert_eq!(Type::uint(256).unwrap().abi_type(), "uint256");
    assert_eq!(Type::int(8).unwrap().abi_type(), "int8");
    assert_eq!(Type::fixed_bytes(3).unwrap().abi_type(), "bytes3");
    assert_eq!(Type::Bytes.abi_type(), "bytes");
    assert_eq!(
        Type::array(Type::tuple(vec![Type::Address, Type::Bytes])).abi_type(),
        "(address,bytes)[]"
    );
    assert_eq!(
        Type::fixed_array(3, Type::uint(256).unwrap()).abi_type(),
        "uint256[3]"
    );
}

#[test]
fn rejects_bad_widths() {
    assert!(Type::uint(7).is_err());
    assert!(Type::uint(0).is_err());
    assert!(Type::uint(257).is_err());
    assert!(Type::int(264).is_err());
    assert!(Type::fixed_bytes(0).is_err());
    assert!(Type::fixed_bytes(33).is_err());
    assert!(Type::fixed_bytes(32).is_ok());
}

#[test]
fn structural_equality() {
    assert_eq!(
        Type::fixed_array(2, Type::uint(256).unwrap()),
        Type::fixed_array(2, Type::uint(256).unwrap())
    );
    assert_ne!(
        Type::fixed_array(2, Type::uint(256).unwrap()),
        Type::fixed_array(3, Type::uint(256).unwrap())
    );
    assert_ne!(Type::uint(256).unwrap(), Type::int(256).unwrap());
}
