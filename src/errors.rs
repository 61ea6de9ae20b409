//! Error types for dynamo-helper.
//!
//! Every failure reported by the DynamoDB client is classified once, by
//! [`map_sdk_error`], into a [`ServiceError`]. The helper layer then wraps it
//! in [`Error::Service`] without further chaining.

use std::sync::Arc;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers.
#[derive(Debug, Error)]
pub enum Error {
    /// The client operation itself failed (validation, throttling,
    /// permissions, network, ...).
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A key lookup matched no item. Only produced by `fetch_by_key`.
    #[error("no item in table '{table}' matches key '{key_name}'")]
    NotFound { table: String, key_name: String },

    /// A value could not be converted to or from a DynamoDB attribute value.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The client configuration is invalid.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// The wrapped service error, if this is one.
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self {
            Error::Service(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Broad category of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    TableNotFound,
    Validation,
    ConditionalCheckFailed,
    Throttling,
    AccessDenied,
    Credentials,
    Other,
}

/// A failure reported by the database client.
///
/// `message` is the service's own text. When the failure came from the SDK
/// the original error is kept as the [`source`](std::error::Error::source).
#[derive(Debug, Clone, Error)]
#[error("{message}{}", hint_suffix(.kind))]
pub struct ServiceError {
    kind: ServiceErrorKind,
    code: Option<String>,
    message: String,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the service error code (e.g. `ValidationException`).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The message exactly as the service (or SDK) reported it.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the service asked the caller to slow down.
    pub fn is_throttling(&self) -> bool {
        self.kind == ServiceErrorKind::Throttling
    }
}

// The source is context only; two errors are equal when the service said the same thing.
impl PartialEq for ServiceError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.code == other.code && self.message == other.message
    }
}

impl Eq for ServiceError {}

impl ServiceErrorKind {
    /// What the caller can usually do about this kind of failure.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            ServiceErrorKind::TableNotFound => Some("check the table name and region"),
            ServiceErrorKind::ConditionalCheckFailed => {
                Some("the condition expression evaluated to false")
            }
            ServiceErrorKind::Throttling => Some("retry with exponential backoff"),
            ServiceErrorKind::AccessDenied => Some("check your IAM permissions"),
            ServiceErrorKind::Credentials => Some(
                "configure credentials via ClientConfig, environment variables, \
                an AWS profile or an IAM role",
            ),
            ServiceErrorKind::Validation | ServiceErrorKind::Other => None,
        }
    }
}

fn hint_suffix(kind: &ServiceErrorKind) -> String {
    kind.hint().map(|h| format!(" ({})", h)).unwrap_or_default()
}

/// Map any AWS SDK error to a [`ServiceError`].
///
/// The service's error code decides the kind. Dispatch failures carry no
/// code, so credential problems are then detected from the debug output.
/// The SDK error itself is kept as the source.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>) -> ServiceError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let err_debug = format!("{:?}", err);

    let service_code = err.code().map(str::to_string);
    let credentials = service_code.is_none() && is_credentials_failure(&err_debug);
    let code = service_code.or_else(|| extract_error_code(&err_debug));
    let kind = if credentials {
        ServiceErrorKind::Credentials
    } else {
        code.as_deref().map_or(ServiceErrorKind::Other, classify_code)
    };

    let message = err
        .message()
        .map(str::to_string)
        .or_else(|| extract_message(&err_debug))
        .unwrap_or_else(|| fallback_message(err.to_string(), &err_debug));

    let mut service_error = ServiceError::new(kind, message);
    if let Some(code) = code {
        service_error = service_error.with_code(code);
    }
    service_error.with_source(err)
}

/// Classify a DynamoDB error code.
pub fn classify_code(code: &str) -> ServiceErrorKind {
    match code {
        "ResourceNotFoundException" => ServiceErrorKind::TableNotFound,
        "ValidationException" | "ItemCollectionSizeLimitExceededException" => {
            ServiceErrorKind::Validation
        }
        "ConditionalCheckFailedException" => ServiceErrorKind::ConditionalCheckFailed,
        "ProvisionedThroughputExceededException"
        | "ThrottlingException"
        | "RequestLimitExceeded" => ServiceErrorKind::Throttling,
        "AccessDeniedException" => ServiceErrorKind::AccessDenied,
        "UnrecognizedClientException" | "InvalidSignatureException" => {
            ServiceErrorKind::Credentials
        }
        _ => ServiceErrorKind::Other,
    }
}

fn is_credentials_failure(err_debug: &str) -> bool {
    const MARKERS: [&str; 8] = [
        "NoCredentialsError",
        "no credentials",
        "No credentials",
        "CredentialsError",
        "failed to load credentials",
        "InvalidAccessKeyId",
        "SignatureDoesNotMatch",
        "ExpiredToken",
    ];
    MARKERS.iter().any(|m| err_debug.contains(m))
}

fn fallback_message(err_display: String, err_debug: &str) -> String {
    if err_display != "service error" {
        return err_display;
    }
    let clean = err_debug.replace('\n', " ").replace("  ", " ");
    if clean.len() > 500 {
        let mut end = 500;
        while !clean.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &clean[..end])
    } else {
        clean
    }
}

/// Extract an error code from an SDK error debug string.
fn extract_error_code(err_str: &str) -> Option<String> {
    // code: Some("ResourceNotFoundException")
    if let Some(start) = err_str.find("code: Some(\"") {
        let rest = &err_str[start + 12..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    const KNOWN_ERRORS: [&str; 10] = [
        "ResourceNotFoundException",
        "ValidationException",
        "ConditionalCheckFailedException",
        "ProvisionedThroughputExceededException",
        "ThrottlingException",
        "AccessDeniedException",
        "UnrecognizedClientException",
        "ItemCollectionSizeLimitExceededException",
        "RequestLimitExceeded",
        "InternalServerError",
    ];

    KNOWN_ERRORS
        .iter()
        .find(|name| err_str.contains(*name))
        .map(|name| name.to_string())
}

/// Extract the error message from an SDK error debug string.
fn extract_message(err_str: &str) -> Option<String> {
    // message: Some("The actual error message")
    if let Some(start) = err_str.find("message: Some(\"") {
        let rest = &err_str[start + 15..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::operation::put_item::PutItemError;
    use aws_sdk_dynamodb::operation::query::QueryError;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ResourceNotFoundException,
    };

    #[test]
    fn classifies_known_codes() {
        assert_eq!(
            classify_code("ResourceNotFoundException"),
            ServiceErrorKind::TableNotFound
        );
        assert_eq!(
            classify_code("ProvisionedThroughputExceededException"),
            ServiceErrorKind::Throttling
        );
        assert_eq!(
            classify_code("RequestLimitExceeded"),
            ServiceErrorKind::Throttling
        );
        assert_eq!(
            classify_code("ItemCollectionSizeLimitExceededException"),
            ServiceErrorKind::Validation
        );
        assert_eq!(classify_code("SomethingElse"), ServiceErrorKind::Other);
    }

    fn resource_not_found(message: &str) -> SdkError<QueryError, ()> {
        let meta = ErrorMetadata::builder()
            .code("ResourceNotFoundException")
            .message(message)
            .build();
        let source = QueryError::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message(message)
                .meta(meta)
                .build(),
        );
        SdkError::service_error(source, ())
    }

    #[test]
    fn keeps_service_message_and_source() {
        let mapped = map_sdk_error(resource_not_found("Requested resource not found"));

        assert_eq!(mapped.kind(), ServiceErrorKind::TableNotFound);
        assert_eq!(mapped.code(), Some("ResourceNotFoundException"));
        assert_eq!(mapped.message(), "Requested resource not found");
        assert!(std::error::Error::source(&mapped).is_some());
        assert_eq!(
            mapped.to_string(),
            "Requested resource not found (check the table name and region)"
        );
    }

    #[test]
    fn message_without_metadata_is_read_from_the_error() {
        let source = QueryError::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message("Requested resource not found")
                .build(),
        );
        let err: SdkError<QueryError, ()> = SdkError::service_error(source, ());

        let mapped = map_sdk_error(err);
        assert_eq!(mapped.kind(), ServiceErrorKind::TableNotFound);
        assert_eq!(mapped.message(), "Requested resource not found");
    }

    #[test]
    fn maps_conditional_check_failure() {
        let source = PutItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder().build(),
        );
        let err: SdkError<PutItemError, ()> = SdkError::service_error(source, ());

        let mapped = map_sdk_error(err);
        assert_eq!(mapped.kind(), ServiceErrorKind::ConditionalCheckFailed);
        assert!(std::error::Error::source(&mapped).is_some());
    }

    #[test]
    fn service_code_wins_over_credential_words_in_message() {
        let mapped = map_sdk_error(resource_not_found(
            "Requested resource not found: Table: CredentialsError not found",
        ));

        assert_eq!(mapped.kind(), ServiceErrorKind::TableNotFound);
        assert_eq!(
            mapped.message(),
            "Requested resource not found: Table: CredentialsError not found"
        );
    }

    #[test]
    fn construction_failure_is_other() {
        let err: SdkError<QueryError, ()> = SdkError::construction_failure("bad request");
        let mapped = map_sdk_error(err);
        assert_eq!(mapped.kind(), ServiceErrorKind::Other);
        assert!(mapped.code().is_none());
    }

    #[test]
    fn credential_failures_are_detected_from_debug_output() {
        assert!(is_credentials_failure("DispatchFailure { NoCredentialsError }"));
        assert!(is_credentials_failure("SignatureDoesNotMatch"));
        assert!(!is_credentials_failure("ValidationException"));
    }

    #[test]
    fn errors_compare_by_what_the_service_said() {
        let plain = ServiceError::new(ServiceErrorKind::Throttling, "slow down");
        let with_source = plain.clone().with_source(std::fmt::Error);
        assert_eq!(plain, with_source);
        assert_eq!(plain.to_string(), "slow down (retry with exponential backoff)");
    }

    #[test]
    fn extracts_code_and_message() {
        let debug = r#"ServiceError { code: Some("ValidationException"), message: Some("One or more parameter values were invalid") }"#;
        assert_eq!(
            extract_error_code(debug).as_deref(),
            Some("ValidationException")
        );
        assert_eq!(
            extract_message(debug).as_deref(),
            Some("One or more parameter values were invalid")
        );
    }

    #[test]
    fn not_found_is_distinct_from_service_errors() {
        let not_found = Error::NotFound {
            table: "Movies".into(),
            key_name: "title".into(),
        };
        assert!(not_found.is_not_found());
        assert!(not_found.as_service().is_none());

        let service: Error = ServiceError::new(ServiceErrorKind::Throttling, "slow down").into();
        assert!(!service.is_not_found());
        assert!(service.as_service().unwrap().is_throttling());
    }
}
