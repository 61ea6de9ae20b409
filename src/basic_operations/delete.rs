//! Delete operation.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{names_or_none, values_or_none, ReturnPolicy};
use crate::errors::{map_sdk_error, Result};
use crate::serialization::{from_attribute_map, to_attribute_map, Item};

/// Parameters of a delete request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteParams {
    pub table_name: String,
    /// Hash key and optional range key of the item.
    pub key: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub expression_attribute_values: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnPolicy>,
}

impl DeleteParams {
    pub fn new(table_name: impl Into<String>, key: Item) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Default::default()
        }
    }

    /// Delete the item whose single key attribute equals `key_value`.
    pub fn by_key(
        table_name: impl Into<String>,
        key_name: impl Into<String>,
        key_value: impl Into<Value>,
    ) -> Self {
        let mut key = Item::new();
        key.insert(key_name.into(), key_value.into());
        Self::new(table_name, key)
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
pub struct DeleteOutput {
    /// The deleted item, when `ALL_OLD` was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Item>,
}

/// Send a delete request.
pub(crate) async fn delete_item(client: &Client, params: DeleteParams) -> Result<DeleteOutput> {
    let DeleteParams {
        table_name,
        key,
        condition_expression,
        expression_attribute_names,
        expression_attribute_values,
        return_values,
    } = params;

    tracing::debug!(table = %table_name, "sending delete");

    let output = client
        .delete_item()
        .table_name(&table_name)
        .set_key(Some(to_attribute_map(&key)))
        .set_condition_expression(condition_expression)
        .set_expression_attribute_names(names_or_none(expression_attribute_names))
        .set_expression_attribute_values(values_or_none(&expression_attribute_values))
        .set_return_values(return_values.map(ReturnPolicy::to_sdk))
        .send()
        .await
        .map_err(map_sdk_error)?;

    Ok(DeleteOutput {
        attributes: output.attributes.map(from_attribute_map).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn by_key_builds_single_attribute_key() {
        let params = DeleteParams::by_key("Movies", "title", "Up")
            .condition("attribute_exists(#t)")
            .name("#t", "title")
            .return_values(ReturnPolicy::AllOld);

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "TableName": "Movies",
                "Key": {"title": "Up"},
                "ConditionExpression": "attribute_exists(#t)",
                "ExpressionAttributeNames": {"#t": "title"},
                "ReturnValues": "ALL_OLD"
            })
        );
    }
}
