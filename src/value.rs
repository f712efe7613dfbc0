//! The value domain consumed and produced by the codec.

use num_bigint::BigInt;
use num256::Uint256;

/// A decoded/to-be-encoded ABI value, tagged to agree with the [crate::types::Type]
/// it is paired with at every recursion step.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 20 raw address bytes.
    Address([u8; 20]),
    Bool(bool),
    /// Arbitrary-precision unsigned integer (`UInt(n)` values).
    Uint(Uint256),
    /// Arbitrary-precision signed integer (`Int(n)` values).
    Int(BigInt),
    /// Exactly-`k`-byte string (`FixedBytes(k)` values).
    FixedBytes(Vec<u8>),
    /// Arbitrary-length byte string.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    String(String),
    /// Ordered sequence of inner values; used for both `Array` and
    /// `FixedArray` (the dynamic/static distinction lives on `Type`, not
    /// `Value`).
    Array(Vec<Value>),
    /// Ordered sequence of field values for a `Tuple`.
    Tuple(Vec<Value>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<[u8; 20]> for Value {
    fn from(v: [u8; 20]) -> Value {
        Value::Address(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Value {
        Value::Bytes(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(v: &'a str) -> Value {
        Value::String(v.to_owned())
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Value {
                    Value::Uint(Uint256::from(v))
                }
            }
        )*
    };
}
impl_from_unsigned!(u8, u16, u32, u64, u128);

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Value {
                    Value::Int(BigInt::from(v))
                }
            }
        )*
    };
}
impl_from_signed!(i8, i16, i32, i64, i128);

/// The encode-side half of the tuple/struct duality: a named composite (a
/// generated-binding struct) supplies its fields in declaration order. The
/// blanket impl over `Vec<Value>` is the identity case — a raw ordered
/// sequence passed straight through.
pub trait Tokenize {
    fn into_tuple_values(self) -> Vec<Value>;
}

impl Tokenize for Vec<Value> {
    fn into_tuple_values(self) -> Vec<Value> {
        self
    }
}

/// The decode-side half: rebuilds a named composite from the decoded
/// ordered sequence. The blanket impl over `Vec<Value>` is the identity
/// reconstructor.
pub trait Detokenize: Sized {
    fn from_tuple_values(values: Vec<Value>) -> Option<Self>;
}

impl Detokenize for Vec<Value> {
    fn from_tuple_values(values: Vec<Value>) -> Option<Self> {
        Some(values)
    }
}

#[test]
fn identity_tokenize_detokenize() {
    let values = vec![Value::Bool(true), Value::from(42u32)];
    let tokenized = values.clone().into_tuple_values();
    assert_eq!(tokenized, values.clone());
    let rebuilt = Vec::<Value>::from_tuple_values(tokenized).unwrap();
    assert_eq!(rebuilt, values);
}
