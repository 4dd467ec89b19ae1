//! Definition table scenarios: JSON loading, overloads, calls, logs, reverts

use evmabi_codec::abi::{encode, ParamType};
use evmabi_codec::{
    decode_revert, AbiError, DefinitionTable, ErrorCategory, LogParam, Native, ResolveError, Revert,
    StateMutability, Value, ERROR_STRING_SELECTOR, H256,
};

const ALICE: &str = "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d";
const BOB: &str = "0x0000000000000000000000000000000000000b0b";

const VAULT_ABI: &str = r#"{
  "contractName": "Vault",
  "abi": [
    {"type":"constructor","stateMutability":"payable","inputs":[
      {"name":"owner","type":"address"}]},
    {"type":"function","name":"deposit","stateMutability":"payable","inputs":[],"outputs":[]},
    {"type":"function","name":"deposit","stateMutability":"nonpayable","inputs":[
      {"name":"token","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[]},
    {"type":"function","name":"setLabel","inputs":[{"name":"who","type":"address"}],"outputs":[]},
    {"type":"function","name":"setLabel","inputs":[{"name":"label","type":"string"}],"outputs":[]},
    {"type":"function","name":"positions","constant":true,"inputs":[
      {"name":"account","type":"address"}],
     "outputs":[{"name":"","type":"tuple[]","components":[
       {"name":"token","type":"address"},
       {"name":"amount","type":"uint128"},
       {"name":"tags","type":"string[]"}]}]},
    {"type":"event","name":"Deposited","inputs":[
      {"name":"account","type":"address","indexed":true},
      {"name":"memo","type":"string","indexed":true},
      {"name":"amount","type":"uint256","indexed":false}]},
    {"type":"error","name":"InsufficientBalance","inputs":[
      {"name":"available","type":"uint256"},{"name":"required","type":"uint256"}]},
    {"type":"fallback","stateMutability":"payable"},
    {"type":"receive","stateMutability":"payable"}
  ]
}"#;

fn vault() -> DefinitionTable {
    DefinitionTable::from_json_str(VAULT_ABI).unwrap()
}

// =============================================================================
// Loading
// =============================================================================

mod loading {
    use super::*;

    #[test]
    fn artifact_document() {
        let table = vault();
        assert_eq!(table.functions().len(), 5);
        assert_eq!(table.events().len(), 1);
        assert_eq!(table.errors().len(), 1);
        assert!(table.constructor().is_some());
        assert_eq!(table.fallback(), Some(StateMutability::Payable));
        assert!(table.has_receive());
    }

    #[test]
    fn legacy_constant_flag() {
        let table = vault();
        let positions = table.functions_named("positions")[0];
        assert_eq!(positions.state_mutability(), StateMutability::View);
        assert_eq!(
            positions.output_types()[0].to_string(),
            "(address,uint128,string[])[]"
        );
    }

    #[test]
    fn malformed_json() {
        let err = DefinitionTable::from_json_str("{not json").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::MalformedInput);

        let err = DefinitionTable::from_json_str(r#"[{"type":"function","name":"f","inputs":[{"type":"uint7"}]}]"#)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::MalformedInput);
    }
}

// =============================================================================
// Overload resolution
// =============================================================================

mod overloads {
    use super::*;

    #[test]
    fn by_argument_count() {
        let table = vault();
        let f = table.resolve_function("deposit", Some(&[])).unwrap();
        assert_eq!(f.signature(), "deposit()");
        let f = table
            .resolve_function("deposit", Some(&[ALICE.into(), 5u8.into()]))
            .unwrap();
        assert_eq!(f.signature(), "deposit(address,uint256)");
    }

    #[test]
    fn address_shaped_string_is_ambiguous() {
        let table = vault();
        let err = table
            .resolve_function("setLabel", Some(&[ALICE.into()]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Ambiguous { .. }));
        assert_eq!(err.category(), ErrorCategory::Ambiguous);

        let f = table
            .resolve_function("setLabel", Some(&["savings".into()]))
            .unwrap();
        assert_eq!(f.signature(), "setLabel(string)");
    }

    #[test]
    fn by_signature_and_selector() {
        let table = vault();
        let f = table.resolve_function("setLabel(string)", None).unwrap();
        let by_selector = table.resolve_function(&f.selector().to_hex(), None).unwrap();
        assert_eq!(by_selector.signature(), "setLabel(string)");
    }

    #[test]
    fn not_found() {
        let err = vault().resolve_function("withdraw", None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}

// =============================================================================
// Calls
// =============================================================================

mod calls {
    use super::*;

    #[test]
    fn calldata_roundtrip() {
        let table = vault();
        let data = table
            .encode_function_data("deposit", &[ALICE.into(), 1_000u64.into()])
            .unwrap();
        let call = table.decode_function_data(&data).unwrap();
        assert_eq!(call.function.signature(), "deposit(address,uint256)");
        assert_eq!(call.args[1], Value::from(1_000u64));
    }

    #[test]
    fn tuple_array_result() {
        let table = vault();
        let position = Value::List(vec![
            ALICE.into(),
            Value::from(12u8),
            Value::List(vec!["core".into(), "locked".into()]),
        ]);
        let data = table
            .encode_function_result("positions", &[Value::List(vec![position])])
            .unwrap();
        let decoded = table.decode_function_result("positions", &data).unwrap();

        let Value::List(positions) = &decoded[0] else {
            panic!("Expected list, got {:?}", decoded[0]);
        };
        assert_eq!(positions[0].field("amount"), Some(&Value::from(12u8)));

        let ty = &table.functions_named("positions")[0].output_types()[0];
        let json = serde_json::to_string(&Native::new(ty, &decoded[0])).unwrap();
        assert!(json.contains(r#""amount":"12""#));
        assert!(json.contains(r#""tags":["core","locked"]"#));
    }

    #[test]
    fn deploy_data() {
        let table = vault();
        let data = table.encode_deploy_data(&[0x60, 0x80, 0x60, 0x40], &[BOB.into()]).unwrap();
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(data[35], 0x0b);
    }
}

// =============================================================================
// Logs
// =============================================================================

mod logs {
    use super::*;

    #[test]
    fn indexed_string_is_hashed() {
        let table = vault();
        let event = &table.events()[0];
        let (topics, data) = event
            .encode_log(&[ALICE.into(), "rent".into(), 99u8.into()])
            .unwrap();
        assert_eq!(topics.len(), 3);

        let log = table.decode_log(&topics, &data).unwrap();
        assert_eq!(log.event.name(), "Deposited");
        assert!(matches!(log.get("account"), Some(LogParam::Value(Value::Address(_)))));
        assert_eq!(
            log.get("memo"),
            Some(&LogParam::Hashed(evmabi_crypto::keccak256(b"rent")))
        );
        assert_eq!(log.get("amount").and_then(LogParam::value), Some(&Value::from(99u8)));
    }

    #[test]
    fn filter_topics() {
        let table = vault();
        let topics = table
            .encode_event_topics("Deposited", &[None, Some("rent".into())])
            .unwrap();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[1], None);
        assert_eq!(topics[2], Some(evmabi_crypto::keccak256(b"rent")));
    }

    #[test]
    fn unknown_topic() {
        let err = vault().decode_log(&[H256::ZERO], &[]).unwrap_err();
        assert!(matches!(err, AbiError::Resolve(ResolveError::UnknownEvent(_))));
    }
}

// =============================================================================
// Reverts
// =============================================================================

mod reverts {
    use super::*;

    #[test]
    fn reason_string() {
        let mut data = ERROR_STRING_SELECTOR.as_bytes().to_vec();
        data.extend(encode(&[ParamType::String], &["paused".into()]).unwrap());
        assert_eq!(decode_revert(&data, None).unwrap(), Revert::Reason("paused".into()));
    }

    #[test]
    fn custom_error_roundtrip() {
        let table = vault();
        let data = table
            .encode_error_result("InsufficientBalance", &[1u8.into(), 2u8.into()])
            .unwrap();
        let revert = decode_revert(&data, Some(&table)).unwrap();
        assert_eq!(revert.to_string(), "InsufficientBalance(available: 1, required: 2)");
    }
}
