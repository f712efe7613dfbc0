//! # Introduction
//! An encoder/decoder for the Ethereum contract ABI: a recursive type
//! algebra, a textual signature parser, the standard head/tail word codec,
//! and the non-standard packed codec used for digest-style hashing.
//!
//! ## Features
//! * A structurally-comparable [types::Type] tree covering every ABI
//!   primitive, array, and tuple shape.
//! * A depth-tracking signature parser (`uint256,(address,bytes)[3]`) — no
//!   regex.
//! * Byte-exact standard encode/decode with recursive offset arithmetic.
//! * The packed (non-standard, write-only) encoding used for event-topic
//!   and digest inputs.
//! * A UTF-8 length helper for pre-sizing `String` tail buffers.
//!
//! ## Getting started
//! ```rust
//! use abi_codec::{codec, signature, value::Value};
//!
//! let types = signature::parse_signature("uint256,bool").unwrap();
//! let values = vec![Value::from(42u32), Value::from(true)];
//! let encoded = codec::encode(&types, &values).unwrap();
//! let decoded = codec::decode(&types, &encoded).unwrap();
//! assert_eq!(decoded, values);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod codec;
pub mod error;
pub mod packed;
pub mod signature;
pub mod types;
pub mod utf8;
pub mod utils;
pub mod value;

pub use crate::error::{AbiError, AbiResult};
pub use crate::types::Type;
pub use crate::value::Value;
