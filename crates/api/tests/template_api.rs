//! HTTP-level integration tests for form templates and their workflow chains.

mod common;

use axum::http::StatusCode;
use common::{
    create_test_user, delete_auth, expect_status, get_auth, post_json_auth, token_for,
};
use siteform_core::roles::{ROLE_ADMIN, ROLE_MANAGER};
use siteform_db::models::project::CreateProject;
use siteform_db::repositories::ProjectRepo;
use sqlx::PgPool;

async fn seed_project(pool: &PgPool, created_by: i64) -> i64 {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Riverside Depot".into(),
            description: None,
            created_by,
        },
    )
    .await
    .expect("project creation should succeed")
    .id
}

fn template_body(name: &str, executor_id: i64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": "Daily inspection checklist",
        "form_structure": { "pages": [ { "title": "General", "fields": [] } ] },
        "process_nodes": [
            { "id": "start", "type": "start", "name": "Start" },
            {
                "id": "node1",
                "type": "node",
                "name": "Supervisor review",
                "executor": "Supervisor",
                "executorId": executor_id,
                "expireTime": "unlimited"
            },
            { "id": "end", "type": "end", "name": "End" }
        ]
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_template_persists_workflow_chain(pool: PgPool) {
    let (manager, _) = create_test_user(&pool, "mgr", "Man Ager", ROLE_MANAGER).await;
    let project_id = seed_project(&pool, manager.id).await;
    let token = token_for(&manager, ROLE_MANAGER);
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/projects/{project_id}/templates");
    let json = expect_status(
        post_json_auth(
            app.clone(),
            &uri,
            &token,
            template_body("Daily Inspection", manager.id),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let template_id = json["data"]["id"].as_i64().expect("created template id");
    assert_eq!(json["data"]["name"], "Daily Inspection");

    let json = expect_status(
        get_auth(app, &format!("/api/v1/templates/{template_id}"), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["template"]["id"], template_id);

    let workflow = &json["data"]["workflow"];
    assert_eq!(workflow["status"], "pending");
    let nodes = workflow["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1]["executor_id"], manager.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_template_with_empty_name_is_rejected(pool: PgPool) {
    let (manager, _) = create_test_user(&pool, "mgr", "Man Ager", ROLE_MANAGER).await;
    let project_id = seed_project(&pool, manager.id).await;
    let token = token_for(&manager, ROLE_MANAGER);
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/projects/{project_id}/templates");
    let json = expect_status(
        post_json_auth(app, &uri, &token, template_body("", manager.id)).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_template_name_in_project_conflicts(pool: PgPool) {
    let (manager, _) = create_test_user(&pool, "mgr", "Man Ager", ROLE_MANAGER).await;
    let project_id = seed_project(&pool, manager.id).await;
    let token = token_for(&manager, ROLE_MANAGER);
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/projects/{project_id}/templates");
    let response =
        post_json_auth(app.clone(), &uri, &token, template_body("Weekly Audit", manager.id)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = expect_status(
        post_json_auth(app, &uri, &token, template_body("Weekly Audit", manager.id)).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_templates_scoped_to_project(pool: PgPool) {
    let (manager, _) = create_test_user(&pool, "mgr", "Man Ager", ROLE_MANAGER).await;
    let project_a = seed_project(&pool, manager.id).await;
    let project_b = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "North Yard".into(),
            description: None,
            created_by: manager.id,
        },
    )
    .await
    .unwrap()
    .id;
    let token = token_for(&manager, ROLE_MANAGER);
    let app = common::build_test_app(pool);

    post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_a}/templates"),
        &token,
        template_body("Only In A", manager.id),
    )
    .await;

    let json = expect_status(
        get_auth(
            app,
            &format!("/api/v1/projects/{project_b}/templates"),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_template_is_admin_only(pool: PgPool) {
    let (admin, _) = create_test_user(&pool, "admin", "Site Admin", ROLE_ADMIN).await;
    let (manager, _) = create_test_user(&pool, "mgr", "Man Ager", ROLE_MANAGER).await;
    let project_id = seed_project(&pool, admin.id).await;
    let admin_token = token_for(&admin, ROLE_ADMIN);
    let manager_token = token_for(&manager, ROLE_MANAGER);
    let app = common::build_test_app(pool);

    let json = expect_status(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/projects/{project_id}/templates"),
            &manager_token,
            template_body("To Delete", manager.id),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let template_id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/templates/{template_id}");

    let response = delete_auth(app.clone(), &uri, &manager_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
