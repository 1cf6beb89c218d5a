//! Tests for error classification and boundary codes.

use std::time::Duration;

use flare_core::errors::*;
use flare_core::FlareError;

#[test]
fn test_repository_flags_follow_kind() {
    let err = RepositoryError::not_found("document '1' not found");
    assert!(err.is_not_found());
    assert!(!err.is_already_exists());
    assert_eq!(err.kind(), RepositoryErrorKind::NotFound);
    assert_eq!(err.to_string(), "document '1' not found");

    assert!(RepositoryError::already_exists("x").is_already_exists());
    assert!(RepositoryError::path_conflict("x").is_path_conflict());
    assert_eq!(
        RepositoryError::unsupported("x").kind(),
        RepositoryErrorKind::Unsupported
    );
}

#[test]
fn test_validation_failures_become_invalid_records() {
    let err: RepositoryError = ValidationError::MissingChangeField.into();
    assert!(err.is_invalid());
    assert_eq!(err.message(), "missing change field");
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(FlareError::from(err).is_client_error());
}

#[test]
fn test_coded_strings_carry_the_code() {
    let err: FlareError = ValidationError::MissingId.into();
    assert!(err.coded_string().starts_with("[VALIDATION_ERROR]"));

    let err: FlareError = RepositoryError::not_found("gone").into();
    assert_eq!(err.error_code(), "NOT_FOUND");

    let err: FlareError = PipelineError::PushTimeout {
        timeout: Duration::from_millis(5),
    }
    .into();
    assert_eq!(err.error_code(), "TIMEOUT");
}

#[test]
fn test_client_errors_reject_the_write() {
    let err: FlareError = ComparisonError::UnsupportedKind {
        kind: String::new(),
    }
    .into();
    assert!(err.is_client_error());

    let err: FlareError = RepositoryError::backend("disk full").into();
    assert!(!err.is_client_error());

    let err: FlareError = RepositoryError::path_conflict("taken").into();
    assert!(err.is_client_error());
}

#[test]
fn test_retryable_pipeline_errors() {
    assert!(PipelineError::Process {
        reason: "503".to_string(),
        retryable: true
    }
    .is_retryable());
    assert!(!PipelineError::Process {
        reason: "410".to_string(),
        retryable: false
    }
    .is_retryable());
    assert!(PipelineError::Panicked {
        reason: "boom".to_string()
    }
    .is_retryable());
    assert!(!PipelineError::Closed.is_retryable());

    assert!(DeliveryError::Transient { status: 503 }.is_retryable());
    assert!(!DeliveryError::Discarded { status: 410 }.is_retryable());
}

#[test]
fn test_trigger_error_lists_failures() {
    let err = TriggerError::Partial {
        document_id: "1".to_string(),
        total: 3,
        failed: 1,
        failures: vec![TriggerFailure {
            subscription_id: "sub-2".to_string(),
            reason: "queue closed".to_string(),
        }],
    };
    assert_eq!(err.failures().len(), 1);
    assert!(err.to_string().contains("1 of 3"));
}
