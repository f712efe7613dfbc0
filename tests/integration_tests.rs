//! Cross-module round-trip scenarios spanning the signature parser and both
//! codecs together, mirroring the worked examples from the Solidity ABI
//! specification.

use abi_codec::codec;
use abi_codec::packed;
use abi_codec::signature::parse_signature;
use abi_codec::value::Value;

#[test]
fn scenario_single_uint256() {
    let types = parse_signature("uint256").unwrap();
    let values = vec![Value::from(42u32)];
    let encoded = codec::encode(&types, &values).unwrap();
    assert_eq!(
        abi_codec::utils::bytes_to_hex_str(&encoded),
        "000000000000000000000000000000000000000000000000000000000000002a"
    );
    assert_eq!(codec::decode(&types, &encoded).unwrap(), values);
}

#[test]
fn scenario_string_hello() {
    let types = parse_signature("string").unwrap();
    let values = vec![Value::from("hello")];
    let encoded = codec::encode(&types, &values).unwrap();
    let expected = concat!(
        "0000000000000000000000000000000000000000000000000000000000000020",
        "0000000000000000000000000000000000000000000000000000000000000005",
        "68656c6c6f000000000000000000000000000000000000000000000000000000",
    );
    assert_eq!(abi_codec::utils::bytes_to_hex_str(&encoded), expected);
    assert_eq!(codec::decode(&types, &encoded).unwrap(), values);
}

#[test]
fn scenario_dynamic_array_of_uint256() {
    let types = parse_signature("uint256[]").unwrap();
    let values = vec![Value::Array(vec![
        Value::from(1u32),
        Value::from(2u32),
        Value::from(3u32),
    ])];
    let encoded = codec::encode(&types, &values).unwrap();
    let expected = concat!(
        "0000000000000000000000000000000000000000000000000000000000000020",
        "0000000000000000000000000000000000000000000000000000000000000003",
        "0000000000000000000000000000000000000000000000000000000000000001",
        "0000000000000000000000000000000000000000000000000000000000000002",
        "0000000000000000000000000000000000000000000000000000000000000003",
    );
    assert_eq!(abi_codec::utils::bytes_to_hex_str(&encoded), expected);
    assert_eq!(codec::decode(&types, &encoded).unwrap(), values);
}

#[test]
fn scenario_tuple_mixed_static_and_dynamic() {
    let types = parse_signature("(address,string)").unwrap();
    let mut addr = [0u8; 20];
    addr.fill(0xaa);
    let values = vec![Value::Tuple(vec![Value::Address(addr), Value::from("z")])];
    let encoded = codec::encode(&types, &values).unwrap();
    let expected = concat!(
        "0000000000000000000000000000000000000000000000000000000000000020",
        "000000000000000000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        "0000000000000000000000000000000000000000000000000000000000000040",
        "0000000000000000000000000000000000000000000000000000000000000001",
        "7a00000000000000000000000000000000000000000000000000000000000000",
    );
    assert_eq!(abi_codec::utils::bytes_to_hex_str(&encoded), expected);
    assert_eq!(codec::decode(&types, &encoded).unwrap(), values);
}

#[test]
fn scenario_negative_int8() {
    let types = parse_signature("int8").unwrap();
    let values = vec![Value::from(-1i64)];
    let encoded = codec::encode(&types, &values).unwrap();
    assert_eq!(
        abi_codec::utils::bytes_to_hex_str(&encoded),
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    );
    assert_eq!(codec::decode(&types, &encoded).unwrap(), values);
}

#[test]
fn scenario_packed_uint8_and_address() {
    let types = parse_signature("uint8,address").unwrap();
    let mut addr = [0u8; 20];
    addr.fill(0x11);
    let values = vec![Value::from(255u32), Value::Address(addr)];
    let encoded = packed::encode_packed(&types, &values).unwrap();
    assert_eq!(encoded.len(), 21);
    assert_eq!(encoded[0], 0xff);
    assert_eq!(&encoded[1..], &addr[..]);
}

#[test]
fn round_trip_property_for_assorted_signatures() {
    let cases: Vec<(&str, Vec<Value>)> = vec![
        ("uint256,bool", vec![Value::from(7u32), Value::Bool(true)]),
        (
            "bytes32,int128",
            vec![Value::FixedBytes(vec![0x5au8; 32]), Value::from(-42i64)],
        ),
        (
            "(uint256,bytes)[2]",
            vec![Value::Array(vec![
                Value::Tuple(vec![Value::from(1u32), Value::Bytes(vec![1, 2])]),
                Value::Tuple(vec![Value::from(2u32), Value::Bytes(vec![3, 4, 5])]),
            ])],
        ),
    ];
    for (sig, values) in cases {
        let types = parse_signature(sig).unwrap();
        let encoded = codec::encode(&types, &values).unwrap();
        assert_eq!(codec::decode(&types, &encoded).unwrap(), values);
    }
}

#[test]
fn canonical_signature_round_trip_property() {
    use abi_codec::Type;
    let samples = vec![
        Type::Address,
        Type::UInt(256),
        Type::array(Type::Bool),
        Type::fixed_array(4, Type::tuple(vec![Type::Address, Type::Bytes])),
        Type::tuple(vec![Type::String, Type::Int(64)]),
    ];
    for ty in samples {
        let parsed = abi_codec::signature::parse_type(&ty.abi_type()).unwrap();
        assert_eq!(parsed, ty);
    }
}

#[test]
fn prefix_transparency_property() {
    let types = parse_signature("uint256,string").unwrap();
    let values = vec![Value::from(99u32), Value::from("topkek")];
    let prefix = [0xde, 0xad, 0xbe, 0xef];
    let with_prefix = codec::encode_with_prefix(&prefix, &types, &values).unwrap();
    assert_eq!(
        codec::decode_with_prefix(prefix.len(), &types, &with_prefix).unwrap(),
        values
    );
}

#[test]
fn rejection_matrix_for_packed_codec() {
    let tuple_type = parse_signature("(uint256)").unwrap();
    let tuple_value = vec![Value::Tuple(vec![Value::from(1u32)])];
    assert!(packed::encode_packed(&tuple_type, &tuple_value).is_err());

    let nested_dynamic = parse_signature("string[]").unwrap();
    let nested_values = vec![Value::Array(vec![Value::from("a")])];
    assert!(packed::encode_packed(&nested_dynamic, &nested_values).is_err());
}
