//! Synchronous facade over [`crate::DataAccess`].
//!
//! Every call runs the async helper to completion on one shared Tokio
//! runtime. Do not call these methods from inside an async context: Tokio
//! panics when `block_on` is nested in a runtime.

use std::sync::Arc;

use aws_sdk_dynamodb::Client;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::basic_operations::{
    DeleteOutput, DeleteParams, PutOutput, PutParams, QueryOutput, QueryParams, ScanOutput,
    ScanParams, UpdateOutput, UpdateParams,
};
use crate::client::{build_client, ClientConfig};
use crate::document::DocumentClient;
use crate::errors::{Error, Result};
use crate::serialization::Item;

/// Process-wide runtime shared by every blocking helper.
///
/// A single runtime avoids deadlocks on Windows when several helpers are
/// created.
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

fn shared_runtime() -> Result<Arc<Runtime>> {
    RUNTIME
        .get_or_try_init(|| {
            Runtime::new()
                .map(Arc::new)
                .map_err(|e| Error::Config(format!("Failed to create Tokio runtime: {}", e)))
        })
        .cloned()
}

/// Blocking counterpart of [`crate::DataAccess`].
#[derive(Debug, Clone)]
pub struct DataAccess<C> {
    inner: crate::DataAccess<C>,
    runtime: Arc<Runtime>,
}

impl<C: DocumentClient> DataAccess<C> {
    pub fn new(client: C) -> Result<Self> {
        Ok(Self {
            inner: crate::DataAccess::new(client),
            runtime: shared_runtime()?,
        })
    }

    /// The async helper this facade drives.
    pub fn as_async(&self) -> &crate::DataAccess<C> {
        &self.inner
    }

    pub fn scan(&self, params: ScanParams) -> Result<ScanOutput> {
        self.runtime.block_on(self.inner.scan(params))
    }

    pub fn query(&self, params: QueryParams) -> Result<QueryOutput> {
        self.runtime.block_on(self.inner.query(params))
    }

    pub fn put(&self, params: PutParams) -> Result<PutOutput> {
        self.runtime.block_on(self.inner.put(params))
    }

    pub fn update(&self, params: UpdateParams) -> Result<UpdateOutput> {
        self.runtime.block_on(self.inner.update(params))
    }

    pub fn delete(&self, params: DeleteParams) -> Result<DeleteOutput> {
        self.runtime.block_on(self.inner.delete(params))
    }

    pub fn count_items(&self, table_name: &str) -> Result<ScanOutput> {
        self.runtime.block_on(self.inner.count_items(table_name))
    }

    pub fn exists_by_key(
        &self,
        table_name: &str,
        key_name: &str,
        key_value: impl Into<Value>,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.inner.exists_by_key(table_name, key_name, key_value))
    }

    pub fn fetch_by_key(
        &self,
        table_name: &str,
        key_name: &str,
        key_value: impl Into<Value>,
    ) -> Result<Item> {
        self.runtime
            .block_on(self.inner.fetch_by_key(table_name, key_name, key_value))
    }
}

/// Build a client on the shared runtime and wrap it in a blocking helper.
pub fn connect(config: &ClientConfig) -> Result<DataAccess<Client>> {
    let runtime = shared_runtime()?;
    let client = runtime.block_on(build_client(config))?;
    DataAccess::new(client)
}
