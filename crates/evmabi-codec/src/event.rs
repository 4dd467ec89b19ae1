//! Event log encoding and decoding
//!
//! Indexed parameters live in topics, the rest in the log data. An indexed
//! `string`, `bytes`, array or tuple is stored as the Keccak-256 hash of its
//! value: the log only carries that hash, so decoding yields
//! [`LogParam::Hashed`] and the original value cannot be recovered.

use evmabi_crypto::keccak256;
use evmabi_primitives::{u256_to_word, H256, U256, WORD_SIZE};
use tracing::trace;

use crate::abi::{
    coerce_bytes, decode_with, decode_word, encode, encode_word, tuple_values, DecodeOptions,
    ParamType, Value,
};
use crate::error::{AbiError, DecodeError, EncodeError, ResolveError};
use crate::item::Event;
use crate::table::DefinitionTable;

/// One decoded event parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogParam {
    /// Value decoded from a topic or from the data
    Value(Value),
    /// Topic of an indexed non-scalar parameter: the hash of its value
    Hashed(H256),
}

impl LogParam {
    /// The decoded value, unless it was hashed
    pub fn value(&self) -> Option<&Value> {
        match self {
            LogParam::Value(v) => Some(v),
            LogParam::Hashed(_) => None,
        }
    }

    /// As a plain value; hashes become 32 fixed bytes
    pub fn to_value(&self) -> Value {
        match self {
            LogParam::Value(v) => v.clone(),
            LogParam::Hashed(h) => Value::FixedBytes(h.as_bytes().to_vec()),
        }
    }
}

/// A log matched against an event definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLog<'a> {
    /// Matching event
    pub event: &'a Event,
    /// Parameters in declaration order
    pub params: Vec<LogParam>,
    /// Raw topics
    pub topics: Vec<H256>,
    /// Raw data
    pub data: Vec<u8>,
}

impl DecodedLog<'_> {
    /// Parameter by name
    pub fn get(&self, name: &str) -> Option<&LogParam> {
        self.event
            .inputs()
            .iter()
            .position(|p| p.name == name)
            .and_then(|i| self.params.get(i))
    }

    /// Parameters as a record (or list when some are unnamed)
    pub fn to_value(&self) -> Value {
        Value::tuple(
            self.event.inputs().iter().map(|p| p.name.as_str()),
            self.params.iter().map(LogParam::to_value).collect(),
        )
    }
}

impl Event {
    /// Decode a log with default options
    pub fn decode_log(&self, topics: &[H256], data: &[u8]) -> Result<Vec<LogParam>, DecodeError> {
        self.decode_log_with(topics, data, &DecodeOptions::default())
    }

    /// Decode a log: indexed scalars from their topics, indexed non-scalars
    /// as hashes, everything else from `data` in one standard decode.
    pub fn decode_log_with(
        &self,
        topics: &[H256],
        data: &[u8],
        options: &DecodeOptions,
    ) -> Result<Vec<LogParam>, DecodeError> {
        if topics.len() != self.topic_count() {
            return Err(DecodeError::TopicCountMismatch {
                event: self.signature().to_string(),
                expected: self.topic_count(),
                got: topics.len(),
            });
        }
        let mut indexed_topics = topics.iter();
        if !self.anonymous() {
            if let Some(first) = indexed_topics.next() {
                if *first != self.topic() {
                    return Err(DecodeError::TopicMismatch {
                        event: self.signature().to_string(),
                        got: *first,
                    });
                }
            }
        }

        let data_types: Vec<ParamType> = self
            .inputs()
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| p.ty.clone())
            .collect();
        let mut data_values = decode_with(&data_types, data, options)?.into_iter();

        let mut params = Vec::with_capacity(self.inputs().len());
        for param in self.inputs() {
            let decoded = if param.indexed {
                // topic count was checked above
                let Some(topic) = indexed_topics.next() else {
                    break;
                };
                if param.ty.is_scalar() {
                    LogParam::Value(decode_word(&param.ty, topic.as_bytes(), options)?)
                } else {
                    trace!(name = %param.name, ty = %param.ty, "indexed parameter is hashed");
                    LogParam::Hashed(*topic)
                }
            } else {
                match data_values.next() {
                    Some(value) => LogParam::Value(value),
                    None => break,
                }
            };
            params.push(decoded);
        }
        Ok(params)
    }

    /// Topics for a log filter. `args` holds one entry per indexed parameter;
    /// `None` leaves that position as a wildcard. The signature topic comes
    /// first unless the event is anonymous.
    pub fn encode_topics(&self, args: &[Option<Value>]) -> Result<Vec<Option<H256>>, EncodeError> {
        let indexed: Vec<&ParamType> = self.inputs().iter().filter(|p| p.indexed).map(|p| &p.ty).collect();
        if args.len() > indexed.len() {
            return Err(EncodeError::LengthMismatch {
                expected: indexed.len(),
                got: args.len(),
            });
        }
        let mut topics = Vec::with_capacity(args.len() + 1);
        if !self.anonymous() {
            topics.push(Some(self.topic()));
        }
        for (ty, arg) in indexed.into_iter().zip(args) {
            topics.push(arg.as_ref().map(|value| topic_for(ty, value)).transpose()?);
        }
        Ok(topics)
    }

    /// Build the topics and data of a log emitting `values` (all parameters,
    /// in declaration order)
    pub fn encode_log(&self, values: &[Value]) -> Result<(Vec<H256>, Vec<u8>), EncodeError> {
        if values.len() != self.inputs().len() {
            return Err(EncodeError::LengthMismatch {
                expected: self.inputs().len(),
                got: values.len(),
            });
        }
        let mut topics = Vec::new();
        if !self.anonymous() {
            topics.push(self.topic());
        }
        let mut data_types = Vec::new();
        let mut data_values = Vec::new();
        for (param, value) in self.inputs().iter().zip(values) {
            if param.indexed {
                topics.push(topic_for(&param.ty, value)?);
            } else {
                data_types.push(param.ty.clone());
                data_values.push(value.clone());
            }
        }
        Ok((topics, encode(&data_types, &data_values)?))
    }
}

/// Topic of one indexed value: the word itself for scalars, the hash of
/// the in-place encoding otherwise
pub fn topic_for(ty: &ParamType, value: &Value) -> Result<H256, EncodeError> {
    if ty.is_scalar() {
        return Ok(H256::from_bytes(encode_word(ty, value)?));
    }
    let mut preimage = Vec::new();
    topic_preimage(ty, value, false, &mut preimage)?;
    Ok(keccak256(&preimage))
}

/// In-place encoding used for indexed values: no offsets and no length
/// words; `string`/`bytes` are padded to a word boundary only when nested.
fn topic_preimage(ty: &ParamType, value: &Value, nested: bool, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match ty {
        ParamType::String | ParamType::Bytes => {
            let bytes = match (ty, value) {
                (ParamType::String, Value::String(s)) => s.as_bytes().to_vec(),
                (ParamType::String, other) => {
                    return Err(EncodeError::TypeMismatch {
                        path: "0".to_string(),
                        expected: ty.to_string(),
                        got: other.kind(),
                    })
                }
                _ => coerce_bytes(ty, value, "0")?,
            };
            out.extend_from_slice(&bytes);
            if nested {
                let padded = bytes.len().div_ceil(WORD_SIZE) * WORD_SIZE;
                out.resize(out.len() + padded - bytes.len(), 0);
            }
        }
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => {
            let items = value.as_list().ok_or_else(|| EncodeError::TypeMismatch {
                path: "0".to_string(),
                expected: ty.to_string(),
                got: value.kind(),
            })?;
            if let ParamType::FixedArray(_, size) = ty {
                if items.len() != *size {
                    return Err(EncodeError::ArrayLengthMismatch {
                        path: "0".to_string(),
                        expected: *size,
                        got: items.len(),
                    });
                }
            }
            for item in items {
                topic_preimage(inner, item, true, out)?;
            }
        }
        ParamType::Tuple(components) => {
            for (c, member) in components.iter().zip(tuple_values(ty, components, value, "0")?) {
                topic_preimage(&c.ty, member, true, out)?;
            }
        }
        _ => out.extend_from_slice(&encode_word(ty, value)?),
    }
    Ok(())
}

impl DefinitionTable {
    /// Match a log to its event by the first topic and decode it
    pub fn decode_log(&self, topics: &[H256], data: &[u8]) -> Result<DecodedLog<'_>, AbiError> {
        self.decode_log_with(topics, data, &DecodeOptions::default())
    }

    /// [`DefinitionTable::decode_log`] with explicit options
    pub fn decode_log_with(
        &self,
        topics: &[H256],
        data: &[u8],
        options: &DecodeOptions,
    ) -> Result<DecodedLog<'_>, AbiError> {
        let first = topics.first().ok_or(ResolveError::NoTopics)?;
        let event = self
            .event_by_topic(first)
            .ok_or(ResolveError::UnknownEvent(*first))?;
        let params = event.decode_log_with(topics, data, options)?;
        Ok(DecodedLog {
            event,
            params,
            topics: topics.to_vec(),
            data: data.to_vec(),
        })
    }

    /// Filter topics for the event `name`, see [`Event::encode_topics`]
    pub fn encode_event_topics(
        &self,
        name: &str,
        args: &[Option<Value>],
    ) -> Result<Vec<Option<H256>>, AbiError> {
        Ok(self.resolve_event(name, None)?.encode_topics(args)?)
    }
}

/// Word holding a `uint256`, handy when building topics by hand
pub fn uint_topic(value: U256) -> H256 {
    H256::from_bytes(u256_to_word(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmabi_primitives::Address;

    const FROM: &str = "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d";
    const TO: &str = "0x0000000000000000000000000000000000000001";

    fn transfer() -> Event {
        Event::parse("event Transfer(address indexed from, address indexed to, uint256 value)").unwrap()
    }

    // ==================== Decoding ====================

    #[test]
    fn test_decode_transfer_log() {
        let event = transfer();
        let (topics, data) = event
            .encode_log(&[FROM.into(), TO.into(), 1000u64.into()])
            .unwrap();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0], event.topic());
        assert_eq!(data.len(), 32);

        let params = event.decode_log(&topics, &data).unwrap();
        assert_eq!(
            params[0],
            LogParam::Value(Value::Address(Address::from_hex(FROM).unwrap()))
        );
        assert_eq!(params[2], LogParam::Value(Value::from(1000u64)));
    }

    #[test]
    fn test_decode_indexed_string_is_hashed() {
        let event = Event::parse("event Named(string indexed name, uint256 id)").unwrap();
        let (topics, data) = event.encode_log(&["alice".into(), 7u8.into()]).unwrap();
        assert_eq!(topics[1], keccak256(b"alice"));

        let params = event.decode_log(&topics, &data).unwrap();
        assert_eq!(params[0], LogParam::Hashed(keccak256(b"alice")));
        assert!(params[0].value().is_none());
        assert_eq!(params[1].value(), Some(&Value::from(7u8)));
    }

    #[test]
    fn test_decode_topic_errors() {
        let event = transfer();
        let (topics, data) = event
            .encode_log(&[FROM.into(), TO.into(), 1u8.into()])
            .unwrap();
        assert!(matches!(
            event.decode_log(&topics[..2], &data),
            Err(DecodeError::TopicCountMismatch { expected: 3, got: 2, .. })
        ));
        let mut wrong = topics.clone();
        wrong[0] = H256::ZERO;
        assert!(matches!(
            event.decode_log(&wrong, &data),
            Err(DecodeError::TopicMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_anonymous() {
        let event = Event::parse("Ping(uint256 indexed id, bool ok) anonymous").unwrap();
        let (topics, data) = event.encode_log(&[5u8.into(), true.into()]).unwrap();
        assert_eq!(topics, vec![uint_topic(U256::from(5))]);
        let params = event.decode_log(&topics, &data).unwrap();
        assert_eq!(params[1], LogParam::Value(Value::Bool(true)));
    }

    #[test]
    fn test_table_decode_log() {
        let table = DefinitionTable::from_human_readable([
            "event Transfer(address indexed from, address indexed to, uint256 value)",
        ])
        .unwrap();
        let (topics, data) = table.events()[0]
            .encode_log(&[FROM.into(), TO.into(), 9u8.into()])
            .unwrap();
        let log = table.decode_log(&topics, &data).unwrap();
        assert_eq!(log.event.name(), "Transfer");
        assert_eq!(log.get("value"), Some(&LogParam::Value(9u8.into())));
        assert!(log.to_value().field("from").is_some());

        assert!(matches!(
            table.decode_log(&[], &data),
            Err(AbiError::Resolve(ResolveError::NoTopics))
        ));
        assert!(matches!(
            table.decode_log(&[H256::ZERO], &data),
            Err(AbiError::Resolve(ResolveError::UnknownEvent(_)))
        ));
    }

    // ==================== Topic encoding ====================

    #[test]
    fn test_encode_topics_wildcards() {
        let event = transfer();
        let topics = event.encode_topics(&[None, Some(TO.into())]).unwrap();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0], Some(event.topic()));
        assert_eq!(topics[1], None);
        assert_eq!(
            topics[2],
            Some(H256::from_bytes(Address::from_hex(TO).unwrap().to_word()))
        );
        assert!(event.encode_topics(&[None, None, None]).is_err());
    }

    #[test]
    fn test_topic_for_arrays() {
        let ty = ParamType::parse("uint8[]").unwrap();
        let topic = topic_for(&ty, &Value::List(vec![1u8.into(), 2u8.into()])).unwrap();
        let mut preimage = vec![0u8; 64];
        preimage[31] = 1;
        preimage[63] = 2;
        assert_eq!(topic, keccak256(&preimage));

        let ty = ParamType::parse("string[]").unwrap();
        let topic = topic_for(&ty, &Value::List(vec!["a".into()])).unwrap();
        let mut preimage = vec![0u8; 32];
        preimage[0] = b'a';
        assert_eq!(topic, keccak256(&preimage));
    }

    #[test]
    fn test_topic_for_bytes_hex() {
        let topic = topic_for(&ParamType::Bytes, &Value::from("0xdeadbeef")).unwrap();
        assert_eq!(topic, keccak256(&[0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_table_encode_event_topics() {
        let table = DefinitionTable::from_human_readable([
            "event Transfer(address indexed from, address indexed to, uint256 value)",
        ])
        .unwrap();
        let topics = table
            .encode_event_topics("Transfer", &[Some(Value::from(FROM))])
            .unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0], Some(transfer().topic()));
        assert!(table.encode_event_topics("Approval", &[]).is_err());
    }
}
