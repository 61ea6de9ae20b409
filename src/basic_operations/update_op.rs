//! Update operation and the update-parameter builder.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{names_or_none, values_or_none, ReturnPolicy};
use crate::errors::{map_sdk_error, Result};
use crate::serialization::{from_attribute_map, to_attribute_map, Item};

/// Parameters of an update request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateParams {
    pub table_name: String,
    pub key: Item,
    pub update_expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub expression_attribute_values: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnPolicy>,
}

impl UpdateParams {
    pub fn new(
        table_name: impl Into<String>,
        key: Item,
        update_expression: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            update_expression: update_expression.into(),
            ..Default::default()
        }
    }

    /// See [`build_update_params`].
    pub fn from_changes(
        table_name: impl Into<String>,
        key_name: impl Into<String>,
        key_value: impl Into<Value>,
        changes: &Item,
        return_policy: ReturnPolicy,
    ) -> Self {
        build_update_params(table_name, key_name, key_value, changes, return_policy)
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

/// Build the parameters of an update that sets every attribute in `changes`.
///
/// Each `(name, value)` pair, in the map's insertion order, becomes one
/// `#name = :name` clause of a single `set` expression, with `:name -> value`
/// in the value substitutions and `#name -> name` in the name substitutions.
/// Name placeholders keep reserved words such as `year` usable.
///
/// ```
/// use dynamo_helper::{build_update_params, ReturnPolicy};
/// use serde_json::json;
///
/// let changes = json!({"rating": 8.5, "plot": "A house flies"});
/// let params = build_update_params(
///     "Movies",
///     "title",
///     "Up",
///     changes.as_object().unwrap(),
///     ReturnPolicy::UpdatedNew,
/// );
/// assert_eq!(params.update_expression, "set #rating = :rating, #plot = :plot");
/// ```
pub fn build_update_params(
    table_name: impl Into<String>,
    key_name: impl Into<String>,
    key_value: impl Into<Value>,
    changes: &Item,
    return_policy: ReturnPolicy,
) -> UpdateParams {
    let mut update_expression = String::from("set");
    let mut values = Item::new();
    let mut names = HashMap::with_capacity(changes.len());

    for (i, (name, value)) in changes.iter().enumerate() {
        let separator = if i == 0 { " " } else { ", " };
        update_expression.push_str(&format!("{}#{} = :{}", separator, name, name));
        values.insert(format!(":{}", name), value.clone());
        names.insert(format!("#{}", name), name.clone());
    }

    let mut key = Item::new();
    key.insert(key_name.into(), key_value.into());

    UpdateParams {
        table_name: table_name.into(),
        key,
        update_expression,
        condition_expression: None,
        expression_attribute_names: names,
        expression_attribute_values: values,
        return_values: Some(return_policy),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateOutput {
    /// Item state selected by the request's return policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Item>,
}

/// Send an update request.
pub(crate) async fn update_item(client: &Client, params: UpdateParams) -> Result<UpdateOutput> {
    let UpdateParams {
        table_name,
        key,
        update_expression,
        condition_expression,
        expression_attribute_names,
        expression_attribute_values,
        return_values,
    } = params;

    tracing::debug!(table = %table_name, expression = %update_expression, "sending update");

    let output = client
        .update_item()
        .table_name(&table_name)
        .set_key(Some(to_attribute_map(&key)))
        .update_expression(update_expression)
        .set_condition_expression(condition_expression)
        .set_expression_attribute_names(names_or_none(expression_attribute_names))
        .set_expression_attribute_values(values_or_none(&expression_attribute_values))
        .set_return_values(return_values.map(ReturnPolicy::to_sdk))
        .send()
        .await
        .map_err(map_sdk_error)?;

    Ok(UpdateOutput {
        attributes: output.attributes.map(from_attribute_map).transpose()?,
    })
}
