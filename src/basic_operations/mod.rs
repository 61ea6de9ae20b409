//! Basic DynamoDB operations module.
//!
//! One submodule per verb, each holding the verb's parameter and output
//! types together with the SDK call that executes it:
//! - `scan` - Read a table or index without a key condition
//! - `query` - Read items matching a key condition
//! - `put` - Create or replace an item
//! - `update_op` - Update attributes of an item
//! - `delete` - Delete an item by key

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue, Select as SdkSelect};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::serialization::{to_attribute_map, Item};

mod delete;
mod put;
mod query;
mod scan;
mod update_op;

pub use delete::{DeleteOutput, DeleteParams};
pub use put::{PutOutput, PutParams};
pub use query::{QueryOutput, QueryParams};
pub use scan::{ScanOutput, ScanParams};
pub use update_op::{build_update_params, UpdateOutput, UpdateParams};

pub(crate) use delete::delete_item;
pub(crate) use put::put_item;
pub(crate) use query::query;
pub(crate) use scan::scan;
pub(crate) use update_op::update_item;

/// Which version of an item a mutation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnPolicy {
    /// Nothing is returned.
    #[default]
    None,
    /// The whole item as it was before the mutation.
    AllOld,
    /// Only the changed attributes, as they were before.
    UpdatedOld,
    /// The whole item as it is after the mutation.
    AllNew,
    /// Only the changed attributes, as they are now.
    UpdatedNew,
}

impl ReturnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnPolicy::None => "NONE",
            ReturnPolicy::AllOld => "ALL_OLD",
            ReturnPolicy::UpdatedOld => "UPDATED_OLD",
            ReturnPolicy::AllNew => "ALL_NEW",
            ReturnPolicy::UpdatedNew => "UPDATED_NEW",
        }
    }

    pub(crate) fn to_sdk(self) -> ReturnValue {
        match self {
            ReturnPolicy::None => ReturnValue::None,
            ReturnPolicy::AllOld => ReturnValue::AllOld,
            ReturnPolicy::UpdatedOld => ReturnValue::UpdatedOld,
            ReturnPolicy::AllNew => ReturnValue::AllNew,
            ReturnPolicy::UpdatedNew => ReturnValue::UpdatedNew,
        }
    }
}

impl fmt::Display for ReturnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(ReturnPolicy::None),
            "ALL_OLD" => Ok(ReturnPolicy::AllOld),
            "UPDATED_OLD" => Ok(ReturnPolicy::UpdatedOld),
            "ALL_NEW" => Ok(ReturnPolicy::AllNew),
            "UPDATED_NEW" => Ok(ReturnPolicy::UpdatedNew),
            other => Err(Error::Serialization(format!(
                "Invalid return policy '{}'. Use NONE, ALL_OLD, UPDATED_OLD, ALL_NEW or UPDATED_NEW",
                other
            ))),
        }
    }
}

/// Attributes returned by a scan or query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Select {
    AllAttributes,
    AllProjectedAttributes,
    SpecificAttributes,
    /// Only the number of matching items.
    Count,
}

impl Select {
    pub(crate) fn to_sdk(self) -> SdkSelect {
        match self {
            Select::AllAttributes => SdkSelect::AllAttributes,
            Select::AllProjectedAttributes => SdkSelect::AllProjectedAttributes,
            Select::SpecificAttributes => SdkSelect::SpecificAttributes,
            Select::Count => SdkSelect::Count,
        }
    }
}

// ============================================================================
// Request helpers
// ============================================================================

// DynamoDB rejects empty substitution maps, so they are sent as absent.
pub(crate) fn names_or_none(names: HashMap<String, String>) -> Option<HashMap<String, String>> {
    (!names.is_empty()).then_some(names)
}

pub(crate) fn values_or_none(values: &Item) -> Option<HashMap<String, AttributeValue>> {
    (!values.is_empty()).then(|| to_attribute_map(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn return_policy_parses_service_names() {
        for policy in [
            ReturnPolicy::None,
            ReturnPolicy::AllOld,
            ReturnPolicy::UpdatedOld,
            ReturnPolicy::AllNew,
            ReturnPolicy::UpdatedNew,
        ] {
            assert_eq!(policy.as_str().parse::<ReturnPolicy>().unwrap(), policy);
        }
        assert!("UPDATED".parse::<ReturnPolicy>().is_err());
    }

    #[test]
    fn return_policy_serializes_like_the_service() {
        assert_eq!(
            serde_json::to_value(ReturnPolicy::UpdatedNew).unwrap(),
            json!("UPDATED_NEW")
        );
        assert_eq!(ReturnPolicy::AllOld.to_sdk(), ReturnValue::AllOld);
        assert_eq!(Select::Count.to_sdk(), SdkSelect::Count);
    }

    #[test]
    fn empty_substitutions_are_omitted() {
        assert!(names_or_none(HashMap::new()).is_none());
        assert!(values_or_none(&Item::new()).is_none());

        let mut values = Item::new();
        values.insert(":kValue".into(), json!("Up"));
        let sent = values_or_none(&values).unwrap();
        assert_eq!(sent[":kValue"], AttributeValue::S("Up".into()));
    }
}
