//! # dynamo-helper
//!
//! Thin data access helpers for DynamoDB on top of `aws-sdk-dynamodb`.
//!
//! This crate provides:
//! - Verb wrappers (`scan`, `query`, `put`, `update`, `delete`) that forward
//!   to the client once and return its outcome as a typed `Result`
//! - An update-parameter builder that turns a flat map of changes into a
//!   `set` update expression with name/value placeholders
//! - Composed lookups: item count, existence check, single-item fetch
//!
//! Items are plain `serde_json` documents; conversion to DynamoDB attribute
//! values happens at the client seam. Connection handling, retries and the
//! wire protocol stay inside the AWS SDK.
//!
//! ```no_run
//! use dynamo_helper::{build_update_params, ClientConfig, ReturnPolicy};
//! use serde_json::json;
//!
//! # async fn example() -> dynamo_helper::Result<()> {
//! let db = dynamo_helper::connect(&ClientConfig::from_env()).await?;
//!
//! if db.exists_by_key("Movies", "title", "Up").await? {
//!     let changes = json!({"rating": 8.5, "plot": "A house flies"});
//!     let params = build_update_params(
//!         "Movies",
//!         "title",
//!         "Up",
//!         changes.as_object().unwrap(),
//!         ReturnPolicy::UpdatedNew,
//!     );
//!     let updated = db.update(params).await?;
//!     println!("{:?}", updated.attributes);
//! }
//! # Ok(())
//! # }
//! ```

mod basic_operations;
pub mod blocking;
mod client;
mod document;
mod errors;
mod helper;
pub mod serialization;

pub use basic_operations::{
    build_update_params, DeleteOutput, DeleteParams, PutOutput, PutParams, QueryOutput,
    QueryParams, ReturnPolicy, ScanOutput, ScanParams, Select, UpdateOutput, UpdateParams,
};
pub use client::{build_client, connect, ClientConfig};
pub use document::DocumentClient;
pub use errors::{map_sdk_error, Error, Result, ServiceError, ServiceErrorKind};
pub use helper::DataAccess;
pub use serialization::Item;
