//! Wire-format tests for the standard and packed codecs

use evmabi_codec::abi::{decode, decode_with, encode, encode_packed, DecodeOptions, ParamType, Value};
use evmabi_codec::{selector, topic, DecodeError, EncodeError, ErrorCategory};
use evmabi_primitives::{Address, I256, U256};

fn word(n: u64) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[24..].copy_from_slice(&n.to_be_bytes());
    w
}

fn types(s: &str) -> Vec<ParamType> {
    ParamType::parse_list(s).unwrap()
}

// =============================================================================
// Standard codec
// =============================================================================

mod standard {
    use super::*;

    #[test]
    fn offsets_for_dynamic_head() {
        let params = types("(string,uint256,bool)");
        let values = vec![Value::from("wagmi"), Value::from(420u64), Value::from(true)];
        let data = encode(&params, &values).unwrap();

        assert_eq!(data.len(), 5 * 32);
        assert_eq!(&data[0..32], &word(0x60));
        assert_eq!(&data[32..64], &word(0x1a4));
        assert_eq!(&data[64..96], &word(1));
        assert_eq!(&data[96..128], &word(5));
        assert_eq!(&data[128..133], b"wagmi");
        assert!(data[133..].iter().all(|b| *b == 0));

        assert_eq!(decode(&params, &data).unwrap(), values);
    }

    #[test]
    fn twos_complement() {
        let params = vec![ParamType::Int(256)];
        let data = encode(&params, &[Value::from(-69420i64)]).unwrap();
        assert_eq!(
            hex::encode(&data),
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffef0d4"
        );
        let decoded = decode(&params, &data).unwrap();
        assert_eq!(decoded, vec![Value::Int(I256::from_i128(-69420))]);
    }

    #[test]
    fn nested_dynamic_tuple_array() {
        let params = types("(uint256,(string,bool[])[])");
        let values = vec![
            Value::from(7u8),
            Value::List(vec![
                Value::List(vec![Value::from("a"), Value::List(vec![true.into()])]),
                Value::List(vec![Value::from(""), Value::List(vec![])]),
            ]),
        ];
        let data = encode(&params, &values).unwrap();
        assert_eq!(data.len() % 32, 0);
        assert_eq!(decode(&params, &data).unwrap(), values);
    }

    #[test]
    fn static_fixed_array_is_inline() {
        let params = types("(uint8[3],address)");
        let addr = Address::from_bytes([0x11; 20]);
        let values = vec![
            Value::List(vec![1u8.into(), 2u8.into(), 3u8.into()]),
            Value::Address(addr),
        ];
        let data = encode(&params, &values).unwrap();
        assert_eq!(data.len(), 4 * 32);
        assert_eq!(&data[64..96], &word(3));
        assert_eq!(&data[108..128], &[0x11; 20]);
    }

    #[test]
    fn named_tuple_decodes_to_record() {
        let ty = ParamType::parse("(address owner,uint96 amount)").unwrap();
        let record = Value::Record(vec![
            ("owner".into(), Value::Address(Address::ZERO)),
            ("amount".into(), Value::from(5u8)),
        ]);
        let data = encode(std::slice::from_ref(&ty), std::slice::from_ref(&record)).unwrap();
        let decoded = decode(&[ty], &data).unwrap();
        assert_eq!(decoded[0].field("amount"), Some(&Value::from(5u8)));
    }
}

// =============================================================================
// Errors and edge cases
// =============================================================================

mod edge_cases {
    use super::*;

    #[test]
    fn empty_data() {
        assert!(decode(&[], &[]).unwrap().is_empty());
        assert!(matches!(
            decode(&[ParamType::Bool], &[]),
            Err(DecodeError::ZeroData)
        ));
        assert!(decode(&[ParamType::Bool], &[0u8; 31]).is_err());
    }

    #[test]
    fn value_count_mismatch() {
        let err = encode(&[ParamType::Bool, ParamType::Bool], &[true.into()]).unwrap_err();
        assert!(matches!(err, EncodeError::LengthMismatch { expected: 2, got: 1 }));
        assert_eq!(err.category(), ErrorCategory::ShapeMismatch);
    }

    #[test]
    fn integer_overflow() {
        let err = encode(&[ParamType::Uint(8)], &[256u64.into()]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Range);
        assert!(encode(&[ParamType::Int(8)], &[(-129i64).into()]).is_err());
        assert!(encode(&[ParamType::Int(8)], &[(-128i64).into()]).is_ok());
    }

    #[test]
    fn strict_and_lenient_bool() {
        let data = word(2);
        assert!(matches!(
            decode(&[ParamType::Bool], &data),
            Err(DecodeError::InvalidBool { .. })
        ));
        let lenient = decode_with(&[ParamType::Bool], &data, &DecodeOptions::lenient()).unwrap();
        assert_eq!(lenient, vec![Value::Bool(true)]);
    }

    #[test]
    fn offset_past_end() {
        let mut data = word(0x1000).to_vec();
        data.extend_from_slice(&word(0));
        let err = decode(&[ParamType::String], &data).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Range);
    }

    #[test]
    fn huge_array_length_is_rejected() {
        let mut data = word(0x20).to_vec();
        data.extend_from_slice(&[0xff; 32]);
        assert!(decode(&types("uint256[]"), &data).is_err());
    }
    /// `depth` nested dynamic arrays of `width` elements where every element
    /// offset of a level points at the one block of the level below
    fn aliased_arrays(depth: usize, width: u64) -> Vec<u8> {
        let mut data = word(0x20).to_vec();
        for _ in 1..depth {
            data.extend_from_slice(&word(width));
            for _ in 0..width {
                data.extend_from_slice(&word(width * 32));
            }
        }
        data.extend_from_slice(&word(width));
        for i in 0..width {
            data.extend_from_slice(&word(i));
        }
        data
    }

    #[test]
    fn aliased_offsets_cannot_amplify_output() {
        let ty = format!("uint256{}", "[]".repeat(4));
        let data = aliased_arrays(4, 8);
        let err = decode(&types(&ty), &data).unwrap_err();
        assert!(matches!(err, DecodeError::OutputTooLarge { .. }));
        assert_eq!(err.category(), ErrorCategory::Range);
    }

    #[test]
    fn single_level_without_aliasing_decodes() {
        let data = aliased_arrays(1, 8);
        let values = decode(&types("uint256[]"), &data).unwrap();
        assert_eq!(values[0].as_list().unwrap().len(), 8);
    }
}

// =============================================================================
// Packed codec
// =============================================================================

mod packed {
    use super::*;

    #[test]
    fn address_and_uint() {
        let addr = Address::from_hex("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap();
        let data = encode_packed(
            &[ParamType::Address, ParamType::Uint(256)],
            &[Value::Address(addr), 420u64.into()],
        )
        .unwrap();
        assert_eq!(data.len(), 52);
        assert_eq!(&data[..20], addr.as_bytes());
        assert_eq!(&data[20..], &word(420));
    }

    #[test]
    fn array_elements_are_padded() {
        let data = encode_packed(
            &types("uint8[]"),
            &[Value::List(vec![1u8.into(), 2u8.into()])],
        )
        .unwrap();
        assert_eq!(data.len(), 64);
        assert_eq!(&data[..32], &word(1));
        assert_eq!(&data[32..], &word(2));
    }

    #[test]
    fn natural_widths() {
        let data = encode_packed(
            &types("(int16,bool,bytes2,string)"),
            &[
                (-1i64).into(),
                true.into(),
                Value::FixedBytes(vec![0xab, 0xcd]),
                "hi".into(),
            ],
        )
        .unwrap();
        assert_eq!(hex::encode(data), "ffff01abcd6869");
    }

    #[test]
    fn tuples_are_rejected() {
        let err = encode_packed(&types("((uint8,bool))"), &[Value::List(vec![1u8.into(), true.into()])]);
        assert!(matches!(err, Err(EncodeError::UnsupportedPackedType { .. })));
    }
}

// =============================================================================
// Signatures
// =============================================================================

mod signatures {
    use super::*;

    #[test]
    fn well_known_hashes() {
        assert_eq!(selector("transfer(address,uint256)").to_hex(), "0xa9059cbb");
        assert_eq!(
            topic("Transfer(address,address,uint256)").to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn canonical_type_strings() {
        let ty = ParamType::parse("(uint, int, (address, bytes32)[2])").unwrap();
        assert_eq!(ty.to_string(), "(uint256,int256,(address,bytes32)[2])");
    }

    #[test]
    fn uint_topic_word() {
        assert_eq!(
            evmabi_codec::uint_topic(U256::from(1)).as_bytes(),
            &word(1)
        );
    }
}
