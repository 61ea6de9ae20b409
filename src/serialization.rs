//! Conversion between plain JSON documents and DynamoDB attribute values.
//!
//! Callers work with `serde_json::Value`s; only the SDK-facing code in
//! [`crate::document`] deals with `AttributeValue`.
//!
//! | JSON            | DynamoDB |
//! |-----------------|----------|
//! | string          | `S`      |
//! | number          | `N`      |
//! | bool            | `BOOL`   |
//! | null            | `NULL`   |
//! | array           | `L`      |
//! | object          | `M`      |
//!
//! Numbers keep the exact digits DynamoDB sent (serde_json's
//! `arbitrary_precision`), so a 38-digit `N` survives a read and a write.
//!
//! Sets and binary have no JSON counterpart and convert one way only: `SS`,
//! `NS` and `BS` read back as arrays and `B` as a base64 string. Written back
//! unchanged they are stored as `L` and `S`. Keep set attributes out of
//! items that are read, modified and put back, or update them with an
//! expression such as `ADD`.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{Number, Value};

use crate::errors::{Error, Result};

/// A DynamoDB item in document form.
pub type Item = serde_json::Map<String, Value>;

/// Convert a JSON value to a DynamoDB `AttributeValue`.
pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute_value).collect()),
        Value::Object(map) => AttributeValue::M(to_attribute_map(map)),
    }
}

/// Convert a document to the attribute map the SDK expects.
pub fn to_attribute_map(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect()
}

/// Convert a DynamoDB `AttributeValue` back to JSON.
pub fn from_attribute_value(value: AttributeValue) -> Result<Value> {
    match value {
        AttributeValue::S(s) => Ok(Value::String(s)),
        AttributeValue::N(n) => parse_number(&n),
        AttributeValue::Bool(b) => Ok(Value::Bool(b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::B(b) => Ok(Value::String(BASE64.encode(b.as_ref()))),
        AttributeValue::L(list) => list
            .into_iter()
            .map(from_attribute_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => from_attribute_map(map).map(Value::Object),
        AttributeValue::Ss(ss) => Ok(Value::Array(ss.into_iter().map(Value::String).collect())),
        AttributeValue::Ns(ns) => ns
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::Bs(bs) => Ok(Value::Array(
            bs.iter()
                .map(|b| Value::String(BASE64.encode(b.as_ref())))
                .collect(),
        )),
        _ => Err(Error::Serialization(
            "Unknown DynamoDB AttributeValue type".to_string(),
        )),
    }
}

/// Convert an SDK attribute map to a document.
pub fn from_attribute_map(map: HashMap<String, AttributeValue>) -> Result<Item> {
    let mut item = Item::new();
    for (key, value) in map {
        item.insert(key, from_attribute_value(value)?);
    }
    Ok(item)
}

/// Convert an optional list of SDK items, as returned by scan and query.
pub(crate) fn from_attribute_maps(
    items: Option<Vec<HashMap<String, AttributeValue>>>,
) -> Result<Vec<Item>> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(from_attribute_map)
        .collect()
}

fn parse_number(n: &str) -> Result<Value> {
    serde_json::from_str::<Number>(n)
        .map(Value::Number)
        .map_err(|_| Error::Serialization(format!("Invalid number: {}", n)))
}
