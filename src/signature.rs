//! Textual type-signature parsing.
//!
//! A hand-written depth-tracking scanner, not a regex: nested tuples of
//! arbitrary depth defeat flat pattern matching. Argument-name tokens that
//! trail a type (as in a full function signature, e.g. `uint256 amount`)
//! are tolerated and discarded rather than requiring the caller to strip
//! them first.

use crate::error::{AbiError, AbiResult};
use crate::types::Type;
use failure::Error;
use lazy_static::lazy_static;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;

lazy_static! {
    /// Interned singletons for the primitive atoms that don't carry a
    /// parameter.
    static ref PRIMITIVES: HashMap<&'static str, Type> = {
        let mut m = HashMap::new();
        m.insert("address", Type::Address);
        m.insert("bool", Type::Bool);
        m.insert("string", Type::String);
        m.insert("bytes", Type::Bytes);
        m
    };
}

/// Parses a single type, e.g. `uint256`, `(address,bytes)[3]`, or
/// `uint256[2][]`. Whitespace around the whole string is ignored.
pub fn parse_type(text: &str) -> AbiResult<Type> {
    parse_single(text.trim())
}

/// Parses a comma-separated, top-level list of types, e.g.
/// `uint256,(address,bytes)[3],string`. An all-whitespace / empty input
/// parses as the empty list (used for zero-argument signatures).
pub fn parse_signature(text: &str) -> AbiResult<Vec<Type>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(text, ',')?
        .into_iter()
        .map(parse_single)
        .collect()
}

/// Splits `name(arg types)` or `name(arg types) returns (return types)`
/// into the name and each parenthesized type list. The return-type group
/// is optional and defaults to an empty list.
pub fn parse_function_signature(text: &str) -> AbiResult<(String, Vec<Type>, Vec<Type>)> {
    let text = text.trim();
    let open = text
        .find('(')
        .ok_or_else(|| Error::from(AbiError::MalformedSignature(text.to_owned())))?;
    let name = text[..open].trim().to_owned();
    let close = matching_paren(text, open)?;
    let args = parse_signature(&text[open + 1..close])?;

    let rest = text[close + 1..].trim();
    let returns = if rest.is_empty() {
        Vec::new()
    } else {
        let ret_open = rest
            .find('(')
            .ok_or_else(|| Error::from(AbiError::MalformedSignature(text.to_owned())))?;
        let ret_close = matching_paren(rest, ret_open)?;
        parse_signature(&rest[ret_open + 1..ret_close])?
    };

    Ok((name, args, returns))
}

/// `name(<types>)` using each type's canonical `abi_type`.
pub fn canonical_signature(name: &str, types: &[Type]) -> String {
    let parts: Vec<String> = types.iter().map(Type::abi_type).collect();
    format!("{}({})", name, parts.join(","))
}

/// keccak-256 of the canonical signature — the external hash primitive the
/// selector/event-topic layer consumes.
pub fn compute_signature_hash(name: &str, types: &[Type]) -> [u8; 32] {
    let digest = Keccak256::digest(canonical_signature(name, types).as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// First 4 bytes of [compute_signature_hash] — a function call's selector.
pub fn compute_selector(name: &str, types: &[Type]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&compute_signature_hash(name, types)[..4]);
    out
}

/// The full 32-byte hash — `topics[0]` of a non-anonymous event log.
pub fn compute_event_topic(name: &str, types: &[Type]) -> [u8; 32] {
    compute_signature_hash(name, types)
}

// -- internals --

/// Parses one type, tolerating a trailing identifier (argument name) after
/// the type and any array suffix.
fn parse_single(token: &str) -> AbiResult<Type> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::from(AbiError::EmptyTypeSignature));
    }

    if token.starts_with('(') {
        let close = matching_paren(token, 0)?;
        let inner = parse_signature(&token[1..close])?;
        let rest = token[close + 1..].trim();
        apply_suffix(Type::Tuple(inner), rest)
    } else {
        let split_at = token
            .find(|c: char| c == '[' || c.is_whitespace())
            .unwrap_or_else(|| token.len());
        let (lexeme, rest) = token.split_at(split_at);
        let base = parse_primitive(lexeme)?;
        apply_suffix(base, rest.trim())
    }
}

/// Peels leading `[n]`/`[]` groups off `rest`, left to right, wrapping
/// `base` as each is consumed; anything left over is an ignored name token.
fn apply_suffix(mut base: Type, mut rest: &str) -> AbiResult<Type> {
    while rest.starts_with('[') {
        let close = rest
            .find(']')
            .ok_or_else(|| Error::from(AbiError::UnbalancedBrackets(rest.to_owned())))?;
        let inside = rest[1..close].trim();
        base = if inside.is_empty() {
            Type::array(base)
        } else {
            let len: u64 = inside
                .parse()
                .map_err(|_| Error::from(AbiError::NonNumericArrayLength(inside.to_owned())))?;
            Type::fixed_array(len, base)
        };
        rest = rest[close + 1..].trim_start();
    }
    // Anything remaining is a trailing name token (`uint256 amount`); we
    // tolerate and discard it rather than requiring callers to strip it.
    Ok(base)
}

fn parse_primitive(lexeme: &str) -> AbiResult<Type> {
    if let Some(ty) = PRIMITIVES.get(lexeme) {
        return Ok(ty.clone());
    }
    if lexeme == "uint" {
        return Ok(Type::UInt(256));
    }
    if lexeme == "int" {
        return Ok(Type::Int(256));
    }
    if let Some(n) = lexeme.strip_prefix("uint") {
        return Type::uint(parse_width(n, lexeme)?);
    }
    if let Some(n) = lexeme.strip_prefix("int") {
        return Type::int(parse_width(n, lexeme)?);
    }
    if let Some(k) = lexeme.strip_prefix("bytes") {
        let k: u16 = k
            .parse()
            .map_err(|_| Error::from(AbiError::UnknownLexeme(lexeme.to_owned())))?;
        return Type::fixed_bytes(k);
    }
    Err(Error::from(AbiError::UnknownLexeme(lexeme.to_owned())))
}

fn parse_width(digits: &str, whole: &str) -> AbiResult<u16> {
    digits
        .parse()
        .map_err(|_| Error::from(AbiError::UnknownLexeme(whole.to_owned())))
}

/// Finds the index of the `)` that matches the `(` at `open`, tracking
/// nesting depth across the whole string (not just the remainder), so
/// indices line up with the caller's slice.
fn matching_paren(s: &str, open: usize) -> AbiResult<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(Error::from(AbiError::UnbalancedParens(s.to_owned())))
}

/// Splits `s` on top-level occurrences of `sep`, tracking paren depth so
/// commas inside a tuple don't count.
fn split_top_level(s: &str, sep: char) -> AbiResult<Vec<&str>> {
    let mut depth = 0i32;
    let mut start = 0;
    let mut parts = Vec::new();
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(Error::from(AbiError::UnbalancedParens(s.to_owned())));
                }
            }
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::from(AbiError::UnbalancedParens(s.to_owned())));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

#[test]
fn parses_primitives() {
    assert_eq!(parse_type("address").unwrap(), Type::Address);
    assert_eq!(parse_type("bool").unwrap(), Type::Bool);
    assert_eq!(parse_type("uint").unwrap(), Type::UInt(256));
    assert_eq!(parse_type("int").unwrap(), Type::Int(256));
    assert_eq!(parse_type("uint256").unwrap(), Type::UInt(256));
    assert_eq!(parse_type("bytes32").unwrap(), Type::FixedBytes(32));
    assert_eq!(parse_type("bytes").unwrap(), Type::Bytes);
    assert_eq!(parse_type("string").unwrap(), Type::String);
}

#[test]
fn parses_arrays() {
    assert_eq!(
        parse_type("uint256[]").unwrap(),
        Type::array(Type::UInt(256))
    );
    assert_eq!(
        parse_type("uint256[3]").unwrap(),
        Type::fixed_array(3, Type::UInt(256))
    );
    assert_eq!(
        parse_type("uint256[2][3]").unwrap(),
        Type::fixed_array(3, Type::fixed_array(2, Type::UInt(256)))
    );
}

#[test]
fn parses_tuples_and_nesting() {
    assert_eq!(
        parse_type("(address,bytes)").unwrap(),
        Type::tuple(vec![Type::Address, Type::Bytes])
    );
    assert_eq!(
        parse_type("(address,bytes)[3]").unwrap(),
        Type::fixed_array(3, Type::tuple(vec![Type::Address, Type::Bytes]))
    );
    assert_eq!(
        parse_type("((uint256,bool),string)").unwrap(),
        Type::tuple(vec![
            Type::tuple(vec![Type::UInt(256), Type::Bool]),
            Type::String
        ])
    );
}

#[test]
fn parses_lists() {
    let parsed = parse_signature("uint256,(address,bytes)[3],string").unwrap();
    assert_eq!(
        parsed,
        vec![
            Type::UInt(256),
            Type::fixed_array(3, Type::tuple(vec![Type::Address, Type::Bytes])),
            Type::String
        ]
    );
    assert_eq!(parse_signature("").unwrap(), Vec::<Type>::new());
    assert_eq!(parse_signature("   ").unwrap(), Vec::<Type>::new());
}

#[test]
fn tolerates_trailing_argument_names() {
    assert_eq!(
        parse_signature("uint256 amount, address to").unwrap(),
        vec![Type::UInt(256), Type::Address]
    );
}

#[test]
fn splits_function_signatures() {
    let (name, args, returns) = parse_function_signature("baz(uint32,bool)").unwrap();
    assert_eq!(name, "baz");
    assert_eq!(args, vec![Type::UInt(32), Type::Bool]);
    assert!(returns.is_empty());

    let (name, args, returns) =
        parse_function_signature("transfer(address to, uint256 amount) returns (bool)").unwrap();
    assert_eq!(name, "transfer");
    assert_eq!(args, vec![Type::Address, Type::UInt(256)]);
    assert_eq!(returns, vec![Type::Bool]);
}

#[test]
fn canonical_signature_round_trip() {
    let sig = canonical_signature("f", &[Type::UInt(256), Type::array(Type::Bool)]);
    assert_eq!(sig, "f(uint256,bool[])");
}

#[test]
fn rejects_malformed_input() {
    assert!(parse_type("(address,bytes").is_err());
    assert!(parse_type("address)").is_err());
    assert!(parse_type("uint7").is_err());
    assert!(parse_type("notatype").is_err());
    assert!(parse_type("uint256[x]").is_err());
}

#[test]
fn selector_fixtures() {
    use crate::utils::bytes_to_hex_str;
    // These match the well-known fixtures from the Solidity ABI spec.
    let (name, args, _) = parse_function_signature("baz(uint32,bool)").unwrap();
    assert_eq!(bytes_to_hex_str(&compute_selector(&name, &args)), "cdcd77c0");

    let (name, args, _) = parse_function_signature("sam(bytes,bool,uint256[])").unwrap();
    assert_eq!(bytes_to_hex_str(&compute_selector(&name, &args)), "a5643bf2");
}

#[test]
fn parse_type_round_trips_abi_type() {
    let samples = vec![
        Type::Address,
        Type::Bool,
        Type::UInt(256),
        Type::Int(8),
        Type::FixedBytes(3),
        Type::Bytes,
        Type::String,
        Type::array(Type::UInt(256)),
        Type::fixed_array(3, Type::tuple(vec![Type::Address, Type::Bytes])),
    ];
    for ty in samples {
        assert_eq!(parse_type(&ty.abi_type()).unwrap(), ty);
    }
}
