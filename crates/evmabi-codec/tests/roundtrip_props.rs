//! Property tests over generated type descriptors and values

use evmabi_codec::abi::{decode, encode, encode_packed, ParamType, TupleComponent, Value};
use evmabi_primitives::{Address, I256, U256};
use proptest::collection::vec;
use proptest::prelude::*;

fn arb_leaf() -> impl Strategy<Value = ParamType> {
    prop_oneof![
        Just(ParamType::Address),
        Just(ParamType::Bool),
        Just(ParamType::Bytes),
        Just(ParamType::String),
        (1usize..=32).prop_map(|n| ParamType::Uint(n * 8)),
        (1usize..=32).prop_map(|n| ParamType::Int(n * 8)),
        (1usize..=32).prop_map(ParamType::FixedBytes),
    ]
}

fn arb_type() -> impl Strategy<Value = ParamType> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| ParamType::Array(Box::new(t))),
            (inner.clone(), 1usize..4).prop_map(|(t, n)| ParamType::FixedArray(Box::new(t), n)),
            vec(inner, 1..4).prop_map(|types| {
                ParamType::Tuple(types.into_iter().map(TupleComponent::unnamed).collect())
            }),
        ]
    })
}

fn arb_value(ty: &ParamType) -> BoxedStrategy<Value> {
    match ty {
        ParamType::Address => any::<[u8; 20]>()
            .prop_map(|b| Value::Address(Address::from_bytes(b)))
            .boxed(),
        ParamType::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        ParamType::Uint(bits) => {
            let bits = *bits;
            any::<[u8; 32]>()
                .prop_map(move |b| {
                    let v = U256::from_big_endian(&b);
                    if bits == 256 {
                        Value::Uint(v)
                    } else {
                        Value::Uint(v & ((U256::one() << bits) - 1))
                    }
                })
                .boxed()
        }
        ParamType::Int(bits) => {
            let shift = 128usize.saturating_sub(*bits) as u32;
            any::<i128>()
                .prop_map(move |v| Value::Int(I256::from_i128(v >> shift)))
                .boxed()
        }
        ParamType::FixedBytes(size) => vec(any::<u8>(), *size).prop_map(Value::FixedBytes).boxed(),
        ParamType::Bytes => vec(any::<u8>(), 0..80).prop_map(Value::Bytes).boxed(),
        ParamType::String => "\\PC{0,24}".prop_map(Value::String).boxed(),
        ParamType::Array(inner) => vec(arb_value(inner), 0..4).prop_map(Value::List).boxed(),
        ParamType::FixedArray(inner, size) => vec(arb_value(inner), *size).prop_map(Value::List).boxed(),
        ParamType::Tuple(components) => components
            .iter()
            .map(|c| arb_value(&c.ty))
            .collect::<Vec<_>>()
            .prop_map(Value::List)
            .boxed(),
    }
}

fn arb_params() -> impl Strategy<Value = (Vec<ParamType>, Vec<Value>)> {
    vec(arb_type(), 0..4).prop_flat_map(|types| {
        let values: Vec<BoxedStrategy<Value>> = types.iter().map(arb_value).collect();
        (Just(types), values)
    })
}

fn arb_scalars() -> impl Strategy<Value = (Vec<ParamType>, Vec<Value>)> {
    vec(arb_leaf(), 1..6).prop_flat_map(|types| {
        let values: Vec<BoxedStrategy<Value>> = types.iter().map(arb_value).collect();
        (Just(types), values)
    })
}

fn natural_width(ty: &ParamType, value: &Value) -> usize {
    match (ty, value) {
        (ParamType::Address, _) => 20,
        (ParamType::Bool, _) => 1,
        (ParamType::Uint(bits) | ParamType::Int(bits), _) => bits / 8,
        (ParamType::FixedBytes(size), _) => *size,
        (ParamType::Bytes, Value::Bytes(b)) => b.len(),
        (ParamType::String, Value::String(s)) => s.len(),
        _ => unreachable!("only scalars are generated"),
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode((types, values) in arb_params()) {
        let data = encode(&types, &values).unwrap();
        prop_assert_eq!(data.len() % 32, 0);
        prop_assert_eq!(decode(&types, &data).unwrap(), values);
    }

    #[test]
    fn packed_scalars_use_natural_width((types, values) in arb_scalars()) {
        let data = encode_packed(&types, &values).unwrap();
        let expected: usize = types.iter().zip(&values).map(|(t, v)| natural_width(t, v)).sum();
        prop_assert_eq!(data.len(), expected);
    }

    #[test]
    fn decode_never_panics(types in vec(arb_type(), 1..3), data in vec(any::<u8>(), 0..256)) {
        let _ = decode(&types, &data);
    }

    #[test]
    fn canonical_type_reparses(ty in arb_type()) {
        let canonical = ty.to_string();
        prop_assert_eq!(ParamType::parse(&canonical).unwrap(), ty);
    }
}
