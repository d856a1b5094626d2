use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fleet_maintenance::{create_router, AppState};

// --- helpers ---

fn create_test_app() -> Router {
    create_router(AppState::in_memory())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_vehicle(app: &Router, registration_number: &str, make: &str, model: &str, year: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/vehicles/",
        Some(json!({
            "registration_number": registration_number,
            "make": make,
            "model": model,
            "year": year
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_task(app: &Router, vehicle: &Value, task_type: &str, status: &str) -> Value {
    let (code, body) = send(
        app,
        "POST",
        "/tasks/",
        Some(json!({
            "vehicle": vehicle["id"],
            "task_type": task_type,
            "status": status
        })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "{body}");
    body
}

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

// --- health ---

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "fleet-maintenance");
}

// --- vehicles ---

#[tokio::test]
async fn test_create_then_retrieve_vehicle() {
    let app = create_test_app();
    let created = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;

    assert!(created["id"].is_i64());
    assert_eq!(created["registration_number"], "AB12CDE");

    let uri = format!("/vehicles/{}/", created["id"]);
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(
        fetched,
        json!({
            "id": created["id"],
            "registration_number": "AB12CDE",
            "make": "Toyota",
            "model": "Yaris",
            "year": 2019
        })
    );
}

#[tokio::test]
async fn test_list_vehicles_empty() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/vehicles/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_filter_vehicles_by_make_substring() {
    let app = create_test_app();
    let yaris = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    create_vehicle(&app, "XY34FGH", "Ford", "Focus", 2015).await;

    let (status, body) = send(&app, "GET", "/vehicles/?make=toy", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([yaris]));
}

#[tokio::test]
async fn test_filter_vehicles_by_registration_number_is_case_insensitive() {
    let app = create_test_app();
    let a = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let b = create_vehicle(&app, "zzab99", "Ford", "Focus", 2015).await;
    create_vehicle(&app, "XY34FGH", "Fiat", "Panda", 2012).await;

    let (_, body) = send(&app, "GET", "/vehicles/?registration_number=AB", None).await;
    assert_eq!(ids(&body), vec![a["id"].as_i64().unwrap(), b["id"].as_i64().unwrap()]);
}

#[tokio::test]
async fn test_filter_vehicles_year_exact_and_combined() {
    let app = create_test_app();
    let yaris = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    create_vehicle(&app, "CD34EFG", "Toyota", "Corolla", 2020).await;
    create_vehicle(&app, "XY34FGH", "Ford", "Focus", 2019).await;

    let (_, body) = send(&app, "GET", "/vehicles/?year=2019&make=TOYOTA", None).await;
    assert_eq!(ids(&body), vec![yaris["id"].as_i64().unwrap()]);

    let (_, body) = send(&app, "GET", "/vehicles/?year=201", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unrecognized_and_blank_params_return_full_collection() {
    let app = create_test_app();
    create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    create_vehicle(&app, "XY34FGH", "Ford", "Focus", 2015).await;

    let (status, body) = send(&app, "GET", "/vehicles/?colour=red&make=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/vehicles/?year=later", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_vehicle_validation_errors() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/vehicles/",
        Some(json!({ "make": "Toyota", "model": "", "year": "twenty" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "registration_number": ["This field is required."],
            "model": ["This field may not be blank."],
            "year": ["A valid integer is required."]
        })
    );

    let (_, list) = send(&app, "GET", "/vehicles/", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_vehicle_rejects_non_object_payload() {
    let app = create_test_app();
    let (status, body) = send(&app, "POST", "/vehicles/", Some(json!(["AB12CDE"]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["non_field_errors"],
        json!(["Invalid data. Expected a dictionary, but got list."])
    );
}

#[tokio::test]
async fn test_create_vehicle_malformed_json() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/vehicles/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"make\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_vehicle_without_json_content_type() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/vehicles/")
        .body(Body::from("registration_number=AB12CDE"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_retrieve_unknown_vehicle_is_404() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/vehicles/999/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found.");

    let (status, _) = send(&app, "GET", "/vehicles/not-a-number/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update_vehicle() {
    let app = create_test_app();
    let created = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let uri = format!("/vehicles/{}/", created["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "year": 2020 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2020);
    assert_eq!(body["make"], "Toyota");
    assert_eq!(body["registration_number"], "AB12CDE");

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_invalid_update_persists_nothing() {
    let app = create_test_app();
    let created = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let uri = format!("/vehicles/{}/", created["id"]);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "make": "Honda", "year": "soon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "year": ["A valid integer is required."] }));

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_unknown_vehicle_is_404_even_with_bad_payload() {
    let app = create_test_app();
    let (status, _) = send(&app, "PATCH", "/vehicles/42/", Some(json!({ "year": "soon" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_vehicle_then_retrieve_is_404() {
    let app = create_test_app();
    let created = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let uri = format!("/vehicles/{}/", created["id"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- maintenance tasks ---

#[tokio::test]
async fn test_create_and_retrieve_task() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let task = create_task(&app, &vehicle, "Oil change", "pending").await;

    assert_eq!(task["vehicle"], vehicle["id"]);
    assert_eq!(task["task_type"], "Oil change");

    let (status, fetched) = send(&app, "GET", &format!("/tasks/{}/", task["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, task);
}

#[tokio::test]
async fn test_create_task_with_unknown_vehicle() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/tasks/",
        Some(json!({ "vehicle": 99, "task_type": "Tyres", "status": "pending" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "vehicle": ["Invalid pk \"99\" - object does not exist."] })
    );

    let (_, list) = send(&app, "GET", "/tasks/", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_task_reports_reference_and_field_errors_together() {
    let app = create_test_app();
    let (status, body) = send(&app, "POST", "/tasks/", Some(json!({ "vehicle": 5, "status": "" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "vehicle": ["Invalid pk \"5\" - object does not exist."],
            "task_type": ["This field is required."],
            "status": ["This field may not be blank."]
        })
    );
}

#[tokio::test]
async fn test_partial_update_task_keeps_omitted_fields() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let task = create_task(&app, &vehicle, "Oil change", "pending").await;
    let uri = format!("/tasks/{}/", task["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "done" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": task["id"],
            "vehicle": vehicle["id"],
            "task_type": "Oil change",
            "status": "done"
        })
    );
}

#[tokio::test]
async fn test_update_task_to_unknown_vehicle_is_rejected() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let task = create_task(&app, &vehicle, "Oil change", "pending").await;
    let uri = format!("/tasks/{}/", task["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "vehicle": 1234 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["vehicle"].is_array());

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, task);
}

#[tokio::test]
async fn test_update_task_moves_it_to_another_vehicle() {
    let app = create_test_app();
    let first = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let second = create_vehicle(&app, "XY34FGH", "Ford", "Focus", 2015).await;
    let task = create_task(&app, &first, "Brakes", "pending").await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/tasks/{}/", task["id"]),
        Some(json!({ "vehicle": second["id"].to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"], second["id"]);
}

#[tokio::test]
async fn test_filter_tasks() {
    let app = create_test_app();
    let toyota = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let ford = create_vehicle(&app, "XY34FGH", "Ford", "Focus", 2015).await;
    let oil = create_task(&app, &toyota, "Oil change", "pending").await;
    let tyres = create_task(&app, &toyota, "Tyre rotation", "done").await;
    let brakes = create_task(&app, &ford, "Brake pads", "Pending").await;

    let id = |v: &Value| v["id"].as_i64().unwrap();

    let (_, body) = send(&app, "GET", "/tasks/?registration_number=ab12", None).await;
    assert_eq!(ids(&body), vec![id(&oil), id(&tyres)]);

    let (_, body) = send(&app, "GET", "/tasks/?status=PEND", None).await;
    assert_eq!(ids(&body), vec![id(&oil), id(&brakes)]);

    let (_, body) = send(&app, "GET", "/tasks/?task_type=tyre&status=done", None).await;
    assert_eq!(ids(&body), vec![id(&tyres)]);

    let (_, body) = send(&app, "GET", "/tasks/?vehicle__registration_number=XY34FGH", None).await;
    assert_eq!(ids(&body), vec![id(&brakes)]);

    let (_, body) = send(&app, "GET", "/tasks/?vehicle__registration_number=xy34fgh", None).await;
    assert_eq!(body, json!([]));

    let (_, body) = send(&app, "GET", "/tasks/?unknown=1", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_delete_task() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let task = create_task(&app, &vehicle, "Oil change", "pending").await;
    let uri = format!("/tasks/{}/", task["id"]);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, vehicle_after) = send(&app, "GET", &format!("/vehicles/{}/", vehicle["id"]), None).await;
    assert_eq!(vehicle_after, vehicle);
}

#[tokio::test]
async fn test_deleting_vehicle_cascades_to_its_tasks() {
    let app = create_test_app();
    let toyota = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let ford = create_vehicle(&app, "XY34FGH", "Ford", "Focus", 2015).await;
    let doomed = create_task(&app, &toyota, "Oil change", "pending").await;
    let kept = create_task(&app, &ford, "Brakes", "pending").await;

    let (status, _) = send(&app, "DELETE", &format!("/vehicles/{}/", toyota["id"]), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/tasks/{}/", doomed["id"]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, "GET", "/tasks/", None).await;
    assert_eq!(list, json!([kept]));
}

#[tokio::test]
async fn test_create_vehicle_rejects_null_characters() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/vehicles/",
        Some(json!({
            "registration_number": "AB\u{0}",
            "make": "Toyota",
            "model": "Yaris",
            "year": 2019
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["registration_number"], json!(["Null characters are not allowed."]));

    let (_, listed) = send(&app, "GET", "/vehicles/", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_update_task_rejects_null_characters() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let task = create_task(&app, &vehicle, "Oil change", "pending").await;
    let uri = format!("/tasks/{}/", task["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "do\u{0}ne" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(["Null characters are not allowed."]));

    let (_, stored) = send(&app, "GET", &uri, None).await;
    assert_eq!(stored["status"], "pending");
}

#[tokio::test]
async fn test_empty_patch_body_leaves_the_record_unchanged() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let uri = format!("/vehicles/{}/", vehicle["id"]);

    let (status, body) = send(&app, "PATCH", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, vehicle);

    let request = Request::builder()
        .method("PATCH")
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_patch_with_non_json_body_is_415() {
    let app = create_test_app();
    let vehicle = create_vehicle(&app, "AB12CDE", "Toyota", "Yaris", 2019).await;
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/vehicles/{}/", vehicle["id"]))
        .body(Body::from("make=Honda"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}
