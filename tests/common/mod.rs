//! Shared test doubles: a canned-response document client and a tracing
//! layer that counts error events.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dynamo_helper::{
    DeleteOutput, DeleteParams, DocumentClient, Error, Item, PutOutput, PutParams, QueryOutput,
    QueryParams, Result, ScanOutput, ScanParams, ServiceError, UpdateOutput, UpdateParams,
};
use serde_json::Value;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer};

type Canned<T> = Option<std::result::Result<T, ServiceError>>;

/// A recorded request.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Scan(ScanParams),
    Query(QueryParams),
    Put(PutParams),
    Update(UpdateParams),
    Delete(DeleteParams),
}

/// Document client answering every verb with a canned response.
///
/// Verbs without a configured response succeed with an empty output.
#[derive(Debug, Default)]
pub struct MockClient {
    scan: Canned<ScanOutput>,
    query: Canned<QueryOutput>,
    put: Canned<PutOutput>,
    update: Canned<UpdateOutput>,
    delete: Canned<DeleteOutput>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every verb fails with `err`.
    pub fn failing(err: ServiceError) -> Self {
        Self {
            scan: Some(Err(err.clone())),
            query: Some(Err(err.clone())),
            put: Some(Err(err.clone())),
            update: Some(Err(err.clone())),
            delete: Some(Err(err)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_scan(mut self, response: std::result::Result<ScanOutput, ServiceError>) -> Self {
        self.scan = Some(response);
        self
    }

    pub fn with_query(mut self, response: std::result::Result<QueryOutput, ServiceError>) -> Self {
        self.query = Some(response);
        self
    }

    pub fn with_put(mut self, response: std::result::Result<PutOutput, ServiceError>) -> Self {
        self.put = Some(response);
        self
    }

    pub fn with_update(
        mut self,
        response: std::result::Result<UpdateOutput, ServiceError>,
    ) -> Self {
        self.update = Some(response);
        self
    }

    pub fn with_delete(
        mut self,
        response: std::result::Result<DeleteOutput, ServiceError>,
    ) -> Self {
        self.delete = Some(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn respond<T: Clone + Default>(canned: &Canned<T>) -> Result<T> {
    match canned {
        Some(Ok(output)) => Ok(output.clone()),
        Some(Err(err)) => Err(Error::Service(err.clone())),
        None => Ok(T::default()),
    }
}

#[async_trait]
impl DocumentClient for MockClient {
    async fn scan(&self, params: ScanParams) -> Result<ScanOutput> {
        self.record(Call::Scan(params));
        respond(&self.scan)
    }

    async fn query(&self, params: QueryParams) -> Result<QueryOutput> {
        self.record(Call::Query(params));
        respond(&self.query)
    }

    async fn put(&self, params: PutParams) -> Result<PutOutput> {
        self.record(Call::Put(params));
        respond(&self.put)
    }

    async fn update(&self, params: UpdateParams) -> Result<UpdateOutput> {
        self.record(Call::Update(params));
        respond(&self.update)
    }

    async fn delete(&self, params: DeleteParams) -> Result<DeleteOutput> {
        self.record(Call::Delete(params));
        respond(&self.delete)
    }
}

/// Build an item from a JSON object literal.
pub fn item(value: Value) -> Item {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn query_output(items: Vec<Item>) -> QueryOutput {
    let count = items.len() as i32;
    QueryOutput {
        items,
        count,
        scanned_count: count,
        last_evaluated_key: None,
    }
}

/// Counts `ERROR` level events.
#[derive(Debug, Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Install a thread-local subscriber that counts error events and prints
/// logs selected by `RUST_LOG`.
pub fn capture_errors() -> (ErrorCounter, tracing::subscriber::DefaultGuard) {
    let counter = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry()
        .with(counter.clone())
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_filter(EnvFilter::from_default_env()),
        );
    let guard = tracing::subscriber::set_default(subscriber);
    (counter, guard)
}
