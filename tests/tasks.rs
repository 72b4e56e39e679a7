mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskflow::{
    models::{Task, TaskStatus, UserResponse, UserRole},
    seed,
};

#[test_log::test(actix_rt::test)]
async fn test_task_crud_flow() {
    let pool = common::test_pool().await;
    let user = common::insert_user(&pool, "tasks@example.com", UserRole::User, true).await;
    let settings = common::test_settings();
    let auth = common::bearer_for(&settings, user.id);
    let app = common::init_app(pool, settings).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(auth.clone())
        .set_json(json!({
            "title": "Integration Test Task",
            "description": "Testing task creation"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Task = test::read_body_json(resp).await;
    assert_eq!(created.title, "Integration Test Task");
    assert_eq!(created.status, TaskStatus::Todo);
    assert_eq!(created.owner_id, user.id);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}", created.id))
        .insert_header(auth.clone())
        .to_request();
    let fetched: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/{}", created.id))
        .insert_header(auth.clone())
        .set_json(json!({ "title": "Renamed task", "status": "In Progress" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "Renamed task");
    assert_eq!(updated["status"], "In Progress");
    assert_eq!(updated["description"], "Testing task creation");

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(auth.clone())
        .to_request();
    let listed: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tasks/{}", created.id))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}", created.id))
        .insert_header(auth)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_task_status_patch() {
    let pool = common::test_pool().await;
    let user = common::insert_user(&pool, "status@example.com", UserRole::User, true).await;
    let settings = common::test_settings();
    let auth = common::bearer_for(&settings, user.id);
    let app = common::init_app(pool, settings).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(auth.clone())
        .set_json(json!({ "title": "Patch me", "description": "unchanged" }))
        .to_request();
    let created: Task = test::call_and_read_body_json(&app, req).await;

    for status in ["Done", "To Do", "In Progress"] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/tasks/{}/status", created.id))
            .insert_header(auth.clone())
            .set_json(json!({ "status": status }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], status);
        assert_eq!(body["title"], "Patch me");
        assert_eq!(body["description"], "unchanged");
    }

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/tasks/{}/status", created.id))
        .insert_header(auth)
        .set_json(json!({ "status": "Blocked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_task_validation() {
    let pool = common::test_pool().await;
    let user = common::insert_user(&pool, "validate@example.com", UserRole::User, true).await;
    let settings = common::test_settings();
    let auth = common::bearer_for(&settings, user.id);
    let app = common::init_app(pool, settings).await;

    let long_title = "x".repeat(256);
    for title in ["", long_title.as_str()] {
        let req = test::TestRequest::post()
            .uri("/api/v1/tasks")
            .insert_header(auth.clone())
            .set_json(json!({ "title": title }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(auth)
        .set_json(json!({ "description": "no title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_tasks_are_private_to_their_owner() {
    let pool = common::test_pool().await;
    let owner = common::insert_user(&pool, "owner@example.com", UserRole::User, true).await;
    let intruder = common::insert_user(&pool, "intruder@example.com", UserRole::User, true).await;
    let settings = common::test_settings();
    let owner_auth = common::bearer_for(&settings, owner.id);
    let intruder_auth = common::bearer_for(&settings, intruder.id);
    let app = common::init_app(pool, settings).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(owner_auth.clone())
        .set_json(json!({ "title": "Secret plans" }))
        .to_request();
    let created: Task = test::call_and_read_body_json(&app, req).await;
    let path = format!("/api/v1/tasks/{}", created.id);

    let requests = [
        test::TestRequest::get().uri(&path),
        test::TestRequest::put()
            .uri(&path)
            .set_json(json!({ "title": "Mine now" })),
        test::TestRequest::patch()
            .uri(&format!("{}/status", path))
            .set_json(json!({ "status": "Done" })),
        test::TestRequest::delete().uri(&path),
    ];
    for req in requests {
        let req = req.insert_header(intruder_auth.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(intruder_auth)
        .to_request();
    let listed: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());

    let req = test::TestRequest::get()
        .uri(&path)
        .insert_header(owner_auth)
        .to_request();
    let still_there: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(still_there.title, "Secret plans");
    assert_eq!(still_there.status, TaskStatus::Todo);
}

#[actix_rt::test]
async fn test_task_list_filters() {
    let pool = common::test_pool().await;
    let user = common::insert_user(&pool, "filters@example.com", UserRole::User, true).await;
    let settings = common::test_settings();
    let auth = common::bearer_for(&settings, user.id);
    let app = common::init_app(pool, settings).await;

    for (title, status) in [
        ("Write report", "To Do"),
        ("Review report", "Done"),
        ("Plan sprint", "In Progress"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/tasks")
            .insert_header(auth.clone())
            .set_json(json!({ "title": title, "status": status }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks?status=In%20Progress")
        .insert_header(auth.clone())
        .to_request();
    let in_progress: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].title, "Plan sprint");

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks?search=REPORT")
        .insert_header(auth)
        .to_request();
    let reports: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reports.len(), 2);
}

#[actix_rt::test]
async fn test_admin_user_management() {
    let pool = common::test_pool().await;
    seed::seed_data(&pool).await.expect("Seeding failed");
    let settings = common::test_settings();
    let app = common::init_app(pool, settings).await;

    let login = |email: &'static str, password: &'static str| {
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request()
    };
    let admin: Value =
        test::call_and_read_body_json(&app, login(seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD)).await;
    let user1: Value =
        test::call_and_read_body_json(&app, login(seed::USER1_EMAIL, seed::USER_PASSWORD)).await;
    let admin_auth = ("Authorization", format!("Bearer {}", admin["access_token"].as_str().unwrap()));
    let user1_auth = ("Authorization", format!("Bearer {}", user1["access_token"].as_str().unwrap()));

    // Regular users cannot reach the admin routes.
    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(user1_auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(admin_auth.clone())
        .to_request();
    let users: Vec<UserResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users.len(), 3);
    let user1_id = users
        .iter()
        .find(|u| u.email == seed::USER1_EMAIL)
        .map(|u| u.id)
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(admin_auth.clone())
        .set_json(json!({
            "email": "second-admin@taskflow.com",
            "password": "Admin456!",
            "role": "admin"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: UserResponse = test::read_body_json(resp).await;
    assert_eq!(created.role, UserRole::Admin);
    assert!(created.is_active);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{}", user1_id))
        .insert_header(admin_auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{}", user1_id))
        .insert_header(admin_auth)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The deleted user's token still verifies, but the account is gone.
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(user1_auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // And its tasks went with it.
    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(user1_auth)
        .to_request();
    let remaining: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(remaining.is_empty());
}
