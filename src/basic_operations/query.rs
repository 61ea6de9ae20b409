//! Query operation.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{names_or_none, values_or_none, Select};
use crate::errors::{map_sdk_error, Result};
use crate::serialization::{from_attribute_map, from_attribute_maps, to_attribute_map, Item};

/// Parameters of a query request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryParams {
    pub table_name: String,
    /// Key condition, e.g. `"title = :kValue"`.
    pub key_condition_expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub expression_attribute_values: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Item>,
    /// Sort order (true = ascending, false = descending).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

impl QueryParams {
    pub fn new(table_name: impl Into<String>, key_condition: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            key_condition_expression: key_condition.into(),
            ..Default::default()
        }
    }

    /// Query matching a single key attribute by equality.
    pub fn by_key(
        table_name: impl Into<String>,
        key_name: &str,
        key_value: impl Into<Value>,
    ) -> Self {
        Self::new(table_name, format!("{} = :kValue", key_name)).value(":kValue", key_value)
    }

    pub fn index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    pub fn select(mut self, select: Select) -> Self {
        self.select = Some(select);
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_from(mut self, key: Item) -> Self {
        self.exclusive_start_key = Some(key);
        self
    }

    pub fn descending(mut self) -> Self {
        self.scan_index_forward = Some(false);
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
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOutput {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub count: i32,
    #[serde(default)]
    pub scanned_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<Item>,
}

/// Send a query request.
pub(crate) async fn query(client: &Client, params: QueryParams) -> Result<QueryOutput> {
    let QueryParams {
        table_name,
        key_condition_expression,
        index_name,
        filter_expression,
        projection_expression,
        expression_attribute_names,
        expression_attribute_values,
        select,
        limit,
        exclusive_start_key,
        scan_index_forward,
        consistent_read,
    } = params;

    tracing::debug!(
        table = %table_name,
        key_condition = %key_condition_expression,
        "sending query"
    );

    let output = client
        .query()
        .table_name(&table_name)
        .key_condition_expression(key_condition_expression)
        .set_index_name(index_name)
        .set_filter_expression(filter_expression)
        .set_projection_expression(projection_expression)
        .set_expression_attribute_names(names_or_none(expression_attribute_names))
        .set_expression_attribute_values(values_or_none(&expression_attribute_values))
        .set_select(select.map(Select::to_sdk))
        .set_limit(limit)
        .set_exclusive_start_key(exclusive_start_key.as_ref().map(to_attribute_map))
        .set_scan_index_forward(scan_index_forward)
        .set_consistent_read(consistent_read)
        .send()
        .await
        .map_err(map_sdk_error)?;

    Ok(QueryOutput {
        items: from_attribute_maps(output.items)?,
        count: output.count,
        scanned_count: output.scanned_count,
        last_evaluated_key: output
            .last_evaluated_key
            .map(from_attribute_map)
            .transpose()?,
    })
}
