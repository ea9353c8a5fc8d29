use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::test_server;

#[tokio::test]
async fn test_health_and_version() {
    let server = test_server();

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["status"], "ok");

    let version = server.get("/version").await;
    version.assert_status_ok();
    assert_eq!(version.json::<Value>()["name"], "enrollsync-api");
}

#[test_log::test(tokio::test)]
async fn test_validate_endpoint_accepts_valid_selection() {
    let server = test_server();
    let teacher_id = Uuid::new_v4();

    let body = json!({
        "enrollment": {
            "courseId": Uuid::new_v4(),
            "teacherId": teacher_id,
            "courseType": "scheduled",
            "requestedAt": "2026-10-19T09:00:00Z",
            "selectedSlots": [{
                "slotId": Uuid::new_v4(),
                "teacherId": teacher_id,
                "date": "2026-10-21",
                "startTime": "09:00",
                "endTime": "11:00",
                "maxCapacity": 3,
                "currentCapacity": 1
            }]
        },
        "teacher": {
            "id": teacher_id,
            "name": "Carla Mendes",
            "isActive": true,
            "availability": [{
                "id": Uuid::new_v4(),
                "teacherId": teacher_id,
                "dayOfWeek": 3,
                "startTime": "09:00",
                "endTime": "12:00",
                "maxStudents": 3,
                "isActive": true
            }]
        },
        "requirements": { "totalHours": 2.5, "sessionDuration": 2.0 }
    });

    let response = server.post("/api/enrollments/validate").json(&body).await;

    response.assert_status_ok();
    let outcome = response.json::<Value>();
    assert_eq!(outcome["isValid"], true);
    assert_eq!(outcome["errors"], json!([]));
}

#[tokio::test]
async fn test_validate_endpoint_reports_errors_with_200() {
    let server = test_server();

    let body = json!({
        "enrollment": {
            "courseId": null,
            "teacherId": null,
            "courseType": "scheduled",
            "requestedAt": "2026-10-19T09:00:00Z",
            "selectedSlots": []
        },
        "teacher": null,
        "requirements": { "totalHours": 10.0, "sessionDuration": 2.0 }
    });

    let response = server.post("/api/enrollments/validate").json(&body).await;

    response.assert_status_ok();
    let outcome = response.json::<Value>();
    assert_eq!(outcome["isValid"], false);
    let codes: Vec<Value> = outcome["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].clone())
        .collect();
    assert_eq!(
        codes,
        vec![
            json!("INCOMPLETE_DATA"),
            json!("TEACHER_REQUIRED"),
            Value::Null,
        ]
    );
}

#[tokio::test]
async fn test_availability_rejects_inverted_range() {
    let server = test_server();

    let response = server
        .get(&format!(
            "/api/teachers/{}/availability?start_date=2026-12-01&end_date=2026-11-01",
            Uuid::new_v4()
        ))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("INVALID_DATE_RANGE"));
}

#[tokio::test]
async fn test_create_availability_rejects_malformed_pattern() {
    let server = test_server();

    let response = server
        .post(&format!("/api/teachers/{}/availability", Uuid::new_v4()))
        .json(&json!({
            "dayOfWeek": 2,
            "startTime": "14:00",
            "endTime": "10:00",
            "maxStudents": 5,
            "startDate": "2026-11-01",
            "endDate": "2026-11-30"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_availability_rejects_bad_weekday() {
    let server = test_server();

    let response = server
        .put(&format!(
            "/api/teachers/{}/availability/{}",
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .json(&json!({ "dayOfWeek": 9 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("dayOfWeek"));
}
