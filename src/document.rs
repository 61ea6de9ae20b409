//! The database client seam.
//!
//! [`DocumentClient`] is the set of operations the helper layer needs from a
//! DynamoDB client, expressed over documents rather than wire attribute
//! values. It is kept as small as possible so that the real implementation
//! for [`aws_sdk_dynamodb::Client`] is a direct forward and test doubles stay
//! trivial.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use crate::basic_operations::{
    self, DeleteOutput, DeleteParams, PutOutput, PutParams, QueryOutput, QueryParams, ScanOutput,
    ScanParams, UpdateOutput, UpdateParams,
};
use crate::errors::Result;

/// Operations of a DynamoDB document client.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn scan(&self, params: ScanParams) -> Result<ScanOutput>;

    async fn query(&self, params: QueryParams) -> Result<QueryOutput>;

    async fn put(&self, params: PutParams) -> Result<PutOutput>;

    async fn update(&self, params: UpdateParams) -> Result<UpdateOutput>;

    async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput>;
}

#[async_trait]
impl DocumentClient for Client {
    async fn scan(&self, params: ScanParams) -> Result<ScanOutput> {
        basic_operations::scan(self, params).await
    }

    async fn query(&self, params: QueryParams) -> Result<QueryOutput> {
        basic_operations::query(self, params).await
    }

    async fn put(&self, params: PutParams) -> Result<PutOutput> {
        basic_operations::put_item(self, params).await
    }

    async fn update(&self, params: UpdateParams) -> Result<UpdateOutput> {
        basic_operations::update_item(self, params).await
    }

    async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput> {
        basic_operations::delete_item(self, params).await
    }
}

#[async_trait]
impl<C: DocumentClient + ?Sized> DocumentClient for Arc<C> {
    async fn scan(&self, params: ScanParams) -> Result<ScanOutput> {
        (**self).scan(params).await
    }

    async fn query(&self, params: QueryParams) -> Result<QueryOutput> {
        (**self).query(params).await
    }

    async fn put(&self, params: PutParams) -> Result<PutOutput> {
        (**self).put(params).await
    }

    async fn update(&self, params: UpdateParams) -> Result<UpdateOutput> {
        (**self).update(params).await
    }

    async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput> {
        (**self).delete(params).await
    }
}
