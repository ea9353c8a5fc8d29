use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use enrollsync_api::middleware::error_handling::AppError;
use enrollsync_core::{
    errors::EnrollError,
    models::enrollment::{ErrorCode, ValidationError},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use uuid::Uuid;

async fn body_json(error: EnrollError) -> (StatusCode, Value) {
    let response = AppError(error).into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[rstest]
#[case(EnrollError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(EnrollError::Rejected(Vec::new()), StatusCode::BAD_REQUEST)]
#[case(EnrollError::NotFound("Teacher".to_string()), StatusCode::NOT_FOUND)]
#[case(EnrollError::SlotNotFound(Uuid::nil()), StatusCode::NOT_FOUND)]
#[case(
    EnrollError::CapacityExceeded { slot_id: Uuid::nil(), current: 3, max: 3 },
    StatusCode::CONFLICT
)]
#[case(EnrollError::Conflict("taken".to_string()), StatusCode::CONFLICT)]
#[case(EnrollError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    EnrollError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: EnrollError, #[case] expected: StatusCode) {
    assert_eq!(AppError(error).status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let (status, body) =
        body_json(EnrollError::NotFound("Teacher with ID 7 not found".into())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "Resource not found: Teacher with ID 7 not found"
    );
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_rejection_body_lists_field_errors() {
    let errors = vec![
        ValidationError::new("selectedSlots[0]", "Horário 09:00-11:00 está lotado")
            .with_code(ErrorCode::CapacityExceeded),
        ValidationError::new("teacherId", "Professor selecionado não está ativo"),
    ];

    let (status, body) = body_json(EnrollError::Rejected(errors)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let listed = body["errors"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["field"], "selectedSlots[0]");
    assert_eq!(listed[0]["code"], "CAPACITY_EXCEEDED");
    assert_eq!(listed[1]["code"], Value::Null);
}

#[test]
fn test_eyre_report_becomes_database_error() {
    let err: AppError = eyre::eyre!("pool timed out").into();
    assert!(matches!(err.0, EnrollError::Database(_)));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
