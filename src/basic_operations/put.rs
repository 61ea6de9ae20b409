//! Put operation.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{names_or_none, values_or_none, ReturnPolicy};
use crate::errors::{map_sdk_error, Result};
use crate::serialization::{from_attribute_map, to_attribute_map, Item};

/// Parameters of a put request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutParams {
    pub table_name: String,
    pub item: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub expression_attribute_values: Item,
    /// The service only accepts `NONE` and `ALL_OLD` here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnPolicy>,
}

impl PutParams {
    pub fn new(table_name: impl Into<String>, item: Item) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            ..Default::default()
        }
    }

    pub fn condition(mut self, expression: impl Into<String>) -> Self {
        self.condition_expression = Some(expression.into());
        self
    }

    pub fn name(mut self, placeholder: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.expression_attribute_names
            .insert(placeholder.into(), attribute.into());
        self
    }

    pub fn value(mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expression_attribute_values
            .insert(placeholder.into(), value.into());
        self
    }

    pub fn return_values(mut self, policy: ReturnPolicy) -> Self {
        self.return_values = Some(policy);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutOutput {
    /// The replaced item, when `ALL_OLD` was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Item>,
}

/// Send a put request.
pub(crate) async fn put_item(client: &Client, params: PutParams) -> Result<PutOutput> {
    let PutParams {
        table_name,
        item,
        condition_expression,
        expression_attribute_names,
        expression_attribute_values,
        return_values,
    } = params;

    tracing::debug!(table = %table_name, "sending put");

    let output = client
        .put_item()
        .table_name(&table_name)
        .set_item(Some(to_attribute_map(&item)))
        .set_condition_expression(condition_expression)
        .set_expression_attribute_names(names_or_none(expression_attribute_names))
        .set_expression_attribute_values(values_or_none(&expression_attribute_values))
        .set_return_values(return_values.map(ReturnPolicy::to_sdk))
        .send()
        .await
        .map_err(map_sdk_error)?;

    Ok(PutOutput {
        attributes: output.attributes.map(from_attribute_map).transpose()?,
    })
}
