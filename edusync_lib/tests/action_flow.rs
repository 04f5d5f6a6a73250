use std::sync::Arc;

use chrono::NaiveDate;
use edusync_lib::types::{
    AttendancePayload, AttendanceState, BorrowingPayload, SessionPayload,
};
use edusync_lib::{
    AttendanceActions, Client, Error, ExportFormat, FilterSet, LibraryActions, MemoryCredentials,
    SessionActions,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::new(&server.uri(), Arc::new(MemoryCredentials::with_token("tok-123")))
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn attendance_payload(student_id: i64) -> AttendancePayload {
    AttendancePayload {
        student_id,
        session_id: 7,
        date: date("2025-09-01"),
        state: AttendanceState::Present,
        remarks: None,
    }
}

fn session_payload() -> SessionPayload {
    SessionPayload {
        name: "Algebra".into(),
        subject_id: 1,
        batch_id: 2,
        teacher_id: 3,
        date: date("2025-09-01"),
        start_time: "09:00".into(),
        end_time: "10:30".into(),
    }
}

fn attendance_json(id: i64, student_id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "student_id": student_id,
        "session_id": 7,
        "date": "2025-09-01",
        "state": "present"
    })
}

#[tokio::test]
async fn invalid_batch_element_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "data": []
        })))
        .expect(0)
        .mount(&server)
        .await;

    let actions = AttendanceActions::new(client_for(&server));
    let batch = vec![
        attendance_payload(100),
        AttendancePayload {
            session_id: 0,
            ..attendance_payload(101)
        },
        attendance_payload(102),
    ];

    let err = actions.bulk_save(&batch).await.unwrap_err();
    match err {
        Error::Validation(msg) => {
            assert!(msg.contains("item 2"), "got: {msg}");
            assert!(msg.contains("session_id is required"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(!actions.loading());
    assert!(actions.last_error().unwrap().contains("item 2"));
}

#[tokio::test]
async fn bulk_save_posts_the_whole_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/attendances/bulk"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": [attendance_json(1, 100), attendance_json(2, 101)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let actions = AttendanceActions::new(client_for(&server));
    let saved = actions
        .bulk_save(&[attendance_payload(100), attendance_payload(101)])
        .await
        .unwrap();
    assert_eq!(saved.len(), 2);
    assert!(actions.last_error().is_none());

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent.as_array().unwrap().len(), 2);
    assert_eq!(sent[1]["student_id"], 101);
}

#[tokio::test]
async fn mark_all_present_builds_one_payload_per_student() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/attendances/bulk"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": [attendance_json(1, 100), attendance_json(2, 101), attendance_json(3, 102)]
        })))
        .mount(&server)
        .await;

    let actions = AttendanceActions::new(client_for(&server));
    actions
        .mark_all_present(7, &[100, 101, 102], date("2025-09-01"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let items = sent.as_array().unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        assert_eq!(item["state"], "present");
        assert_eq!(item["session_id"], 7);
    }
}

#[tokio::test]
async fn session_validation_failure_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(0)
        .mount(&server)
        .await;

    let actions = SessionActions::new(client_for(&server));
    let bad = SessionPayload {
        end_time: "08:00".into(),
        ..session_payload()
    };
    let err = actions.create(&bad).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn backend_rejection_lands_in_last_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/sessions/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "session overlaps an existing one"
        })))
        .mount(&server)
        .await;

    let actions = SessionActions::new(client_for(&server));
    let err = actions.update(9, &session_payload()).await.unwrap_err();
    assert!(matches!(err, Error::Backend(_)));
    assert_eq!(
        actions.last_error().as_deref(),
        Some("session overlaps an existing one")
    );

    actions.clear_error();
    assert!(actions.last_error().is_none());
}

#[tokio::test]
async fn successful_action_resets_a_previous_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/sessions/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error", "message": "cannot delete a started session"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/sessions/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    let actions = SessionActions::new(client_for(&server));
    assert!(actions.remove(1).await.is_err());
    assert!(actions.last_error().is_some());

    actions.remove(2).await.unwrap();
    assert!(actions.last_error().is_none());
}

#[tokio::test]
async fn return_borrowing_hits_the_return_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/library/borrowings/42/return"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "id": 42, "book_id": 5, "student_id": 100,
                "borrow_date": "2025-08-20", "return_date": "2025-09-01",
                "state": "returned"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let actions = LibraryActions::new(client_for(&server));
    let borrowing = actions.return_borrowing(42).await.unwrap();
    assert_eq!(borrowing.return_date, Some(date("2025-09-01")));
}

#[tokio::test]
async fn borrowing_with_due_before_borrow_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(0)
        .mount(&server)
        .await;

    let actions = LibraryActions::new(client_for(&server));
    let err = actions
        .create_borrowing(&BorrowingPayload {
            book_id: 5,
            student_id: 100,
            borrow_date: date("2025-09-10"),
            due_date: Some(date("2025-09-01")),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn export_returns_the_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendances/export"))
        .and(query_param("format", "csv"))
        .and(query_param("batch_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "filename": "attendances.csv",
                "content_type": "text/csv",
                "content": "aWQsc3RhdGUK"
            }
        })))
        .mount(&server)
        .await;

    let actions = AttendanceActions::new(client_for(&server));
    let receipt = actions
        .export(ExportFormat::Csv, &FilterSet::new().with("batch_id", 3))
        .await
        .unwrap();
    assert_eq!(receipt.filename, "attendances.csv");
    assert_eq!(receipt.content_type, "text/csv");
    assert!(actions.last_error().is_none());
}
