use failure::{Error, Fail};

/// Result alias for this crate's public functions.
pub type AbiResult<T> = Result<T, Error>;

/// Every way an encode, decode, or parse operation can fail.
///
/// Variants are grouped loosely into three families:
/// schema errors (type construction/parsing), argument errors (a value
/// doesn't satisfy its type's constraints) and decoding errors (the byte
/// buffer doesn't match the declared types). None of these are recovered
/// inside the codec; callers see them via `?`.
#[derive(Debug, Fail, PartialEq, Clone)]
pub enum AbiError {
    // -- schema errors --
    #[fail(
        display = "invalid fixed-bytes width {}: must be between 1 and 32",
        _0
    )]
    InvalidFixedBytesWidth(u16),

    #[fail(
        display = "invalid integer bit width {}: must be a multiple of 8 between 8 and 256",
        _0
    )]
    InvalidIntWidth(u16),

    #[fail(display = "unbalanced parentheses in type signature: {}", _0)]
    UnbalancedParens(String),

    #[fail(display = "unbalanced brackets in type signature: {}", _0)]
    UnbalancedBrackets(String),

    #[fail(display = "unknown type lexeme: {}", _0)]
    UnknownLexeme(String),

    #[fail(display = "non-numeric array length in type signature: {}", _0)]
    NonNumericArrayLength(String),

    #[fail(display = "empty type signature")]
    EmptyTypeSignature,

    #[fail(display = "malformed function signature: {}", _0)]
    MalformedSignature(String),

    // -- argument errors --
    #[fail(display = "expected {} arguments, got {}", expected, got)]
    ArityMismatch { expected: usize, got: usize },

    #[fail(
        display = "expected {} elements for fixed-size array, got {}",
        expected, got
    )]
    FixedArityMismatch { expected: u64, got: usize },

    #[fail(display = "value of wrong kind supplied for type {}", _0)]
    TypeMismatch(String),

    #[fail(
        display = "integer value does not fit in {} bits for declared type",
        _0
    )]
    IntegerOutOfRange(u16),

    #[fail(display = "negative value is not allowed for an unsigned integer")]
    NegativeUnsigned,

    #[fail(
        display = "fixed-length byte string expected {} bytes, got {}",
        expected, got
    )]
    FixedLengthMismatch { expected: usize, got: usize },

    #[fail(display = "tuples are not supported by the packed encoding")]
    PackedTupleRejected,

    #[fail(
        display = "arrays of dynamic or nested-array elements are not supported by the packed encoding"
    )]
    PackedNestedDynamicRejected,

    // -- decoding errors --
    #[fail(display = "buffer too short: need at least {} bytes, have {}", need, have)]
    BufferTooShort { need: usize, have: usize },

    #[fail(display = "offset {} is out of bounds for buffer of length {}", offset, len)]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[fail(display = "offset word has non-zero high-order bytes")]
    InvalidOffsetEncoding,

    #[fail(display = "empty input supplied for a non-empty type list")]
    EmptyInputNonEmptyTypes,

    #[fail(display = "non-empty input supplied for an empty type list")]
    NonEmptyInputEmptyTypes,

    #[fail(
        display = "prefix length {} exceeds buffer length {}",
        prefix_len, have
    )]
    PrefixTooShort { prefix_len: usize, have: usize },

    // -- utf-8 helper --
    #[fail(display = "ill-formed surrogate pair in text")]
    IllFormedSurrogate,
}
