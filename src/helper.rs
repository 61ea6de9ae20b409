//! The data access helper.
//!
//! [`DataAccess`] forwards each request to the injected [`DocumentClient`]
//! exactly once and hands back the client's outcome unchanged. Failures are
//! logged once here, where they are first seen, and never retried; retry of
//! transient errors is the SDK's job.

use serde_json::Value;

use crate::basic_operations::{
    DeleteOutput, DeleteParams, PutOutput, PutParams, QueryOutput, QueryParams, ScanOutput,
    ScanParams, Select, UpdateOutput, UpdateParams,
};
use crate::document::DocumentClient;
use crate::errors::{Error, Result};
use crate::serialization::Item;

/// Convenience wrapper around a DynamoDB document client.
///
/// Holds nothing but the client handle, so concurrent calls share no state.
#[derive(Debug, Clone)]
pub struct DataAccess<C> {
    client: C,
}

impl<C: DocumentClient> DataAccess<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// Scan a table or index. Returns one page of items.
    pub async fn scan(&self, params: ScanParams) -> Result<ScanOutput> {
        let table = params.table_name.clone();
        log_failure("scan", &table, self.client.scan(params).await)
    }

    /// Query items matching a key condition. Returns one page of items.
    pub async fn query(&self, params: QueryParams) -> Result<QueryOutput> {
        let table = params.table_name.clone();
        log_failure("query", &table, self.client.query(params).await)
    }

    pub async fn put(&self, params: PutParams) -> Result<PutOutput> {
        let table = params.table_name.clone();
        log_failure("put", &table, self.client.put(params).await)
    }

    pub async fn update(&self, params: UpdateParams) -> Result<UpdateOutput> {
        let table = params.table_name.clone();
        log_failure("update", &table, self.client.update(params).await)
    }

    pub async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput> {
        let table = params.table_name.clone();
        log_failure("delete", &table, self.client.delete(params).await)
    }

    /// Count the items of a table with a `COUNT` scan.
    ///
    /// The count is in [`ScanOutput::count`]. Like every scan, a large table
    /// is counted one page at a time: when `last_evaluated_key` is set the
    /// count covers only the first page.
    pub async fn count_items(&self, table_name: &str) -> Result<ScanOutput> {
        self.scan(ScanParams::new(table_name).select(Select::Count))
            .await
    }

    /// Whether any item has `key_name` equal to `key_value`.
    pub async fn exists_by_key(
        &self,
        table_name: &str,
        key_name: &str,
        key_value: impl Into<Value>,
    ) -> Result<bool> {
        let output = self
            .query(QueryParams::by_key(table_name, key_name, key_value))
            .await?;
        Ok(output.count > 0)
    }

    /// The first item whose `key_name` equals `key_value`.
    ///
    /// Returns [`Error::NotFound`] when nothing matches, so callers can tell
    /// a missing item apart from a failed request.
    pub async fn fetch_by_key(
        &self,
        table_name: &str,
        key_name: &str,
        key_value: impl Into<Value>,
    ) -> Result<Item> {
        let output = self
            .query(QueryParams::by_key(table_name, key_name, key_value))
            .await?;

        if output.count > 0 {
            if let Some(item) = output.items.into_iter().next() {
                return Ok(item);
            }
        }

        Err(Error::NotFound {
            table: table_name.to_string(),
            key_name: key_name.to_string(),
        })
    }
}

fn log_failure<T>(operation: &'static str, table: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        tracing::error!(operation, table, error = %err, "DynamoDB request failed");
    }
    result
}
