//! API integration tests
//!
//! End-to-end tests driving the GraphQL surface through a real axum app
//! backed by a throwaway SQLite database.

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use crewboard::auth::{Authenticator, StaticTokenVerifier};
use crewboard::config::AuthToken;
use crewboard::database::connection::setup_database;
use crewboard::server::app::create_app;
use sea_orm::Database;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

const TEST_TOKEN: &str = "test-token";

/// Create a test server with a file-backed database and one valid API token
async fn setup_test_server() -> Result<(TestServer, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let authenticator = Authenticator::new(StaticTokenVerifier::new(vec![AuthToken {
        subject: "qa@crewboard.dev".to_string(),
        token: TEST_TOKEN.to_string(),
    }]));

    let app = create_app(db, Some("*"), authenticator).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_file))
}

/// Execute a GraphQL request, optionally authenticated
async fn graphql(server: &TestServer, token: Option<&str>, query: &str, variables: Value) -> Value {
    let mut request = server
        .post("/graphql")
        .json(&json!({ "query": query, "variables": variables }));

    if let Some(token) = token {
        request = request.add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
    }

    let response = request.await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

fn field<'a>(body: &'a Value, name: &str) -> &'a Value {
    assert!(
        body.get("errors").is_none(),
        "unexpected errors: {}",
        body["errors"]
    );
    &body["data"][name]
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"]
        .as_str()
        .expect("error should carry a code extension")
}

async fn create_project(server: &TestServer, name: &str) -> String {
    let body = graphql(
        server,
        Some(TEST_TOKEN),
        "mutation($name: String!) { createProject(name: $name) { id name } }",
        json!({ "name": name }),
    )
    .await;
    field(&body, "createProject")["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "crewboard");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_operations_require_authentication() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let body = graphql(&server, None, "{ getMembers { id } }", json!({})).await;
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    let body = graphql(
        &server,
        None,
        r#"mutation { createMember(email: "kim@example.com", nickname: "kim") { id } }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    // The rejected mutation must not have written anything
    let body = graphql(&server, Some(TEST_TOKEN), "{ getMembers { id } }", json!({})).await;
    assert_eq!(field(&body, "getMembers").as_array().unwrap().len(), 0);

    // An unknown token is as good as none
    let body = graphql(&server, Some("wrong-token"), "{ getMembers { id } }", json!({})).await;
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    Ok(())
}

#[tokio::test]
async fn test_member_crud_roundtrip() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    // isActive omitted: must default to true
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation { createMember(email: "kim@example.com", nickname: "kim") {
            id email nickname isActive projectId
        } }"#,
        json!({}),
    )
    .await;
    let created = field(&body, "createMember").clone();
    assert_eq!(created["email"], "kim@example.com");
    assert_eq!(created["nickname"], "kim");
    assert_eq!(created["isActive"], true);
    assert!(created["projectId"].is_null());
    let member_id = created["id"].as_str().unwrap().to_string();

    // Round-trip through getMemberById
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getMemberById(id: $id) { id email nickname isActive projectId } }",
        json!({ "id": member_id }),
    )
    .await;
    let fetched = field(&body, "getMemberById");
    assert_eq!(fetched["email"], "kim@example.com");
    assert_eq!(fetched["nickname"], "kim");
    assert_eq!(fetched["isActive"], true);
    assert!(fetched["projectId"].is_null());

    // Partial update: only the supplied field changes
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($id: ID!) { updateMember(id: $id, nickname: "kimmy") { nickname } }"#,
        json!({ "id": member_id }),
    )
    .await;
    assert_eq!(field(&body, "updateMember")["nickname"], "kimmy");

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getMemberById(id: $id) { email nickname isActive } }",
        json!({ "id": member_id }),
    )
    .await;
    let fetched = field(&body, "getMemberById");
    assert_eq!(fetched["email"], "kim@example.com");
    assert_eq!(fetched["nickname"], "kimmy");
    assert_eq!(fetched["isActive"], true);

    // Delete returns the member as it existed, then the id is gone
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "mutation($id: ID!) { deleteMember(id: $id) { id nickname } }",
        json!({ "id": member_id }),
    )
    .await;
    assert_eq!(field(&body, "deleteMember")["nickname"], "kimmy");

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getMemberById(id: $id) { id } }",
        json!({ "id": member_id }),
    )
    .await;
    assert_eq!(error_code(&body), "NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_members_by_project_rejects_malformed_id() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"{ getMembersByProject(projectId: "not-an-id") { id } }"#,
        json!({}),
    )
    .await;

    assert_eq!(error_code(&body), "INVALID_ARGUMENT");
    let message = body["errors"][0]["message"].as_str().unwrap();
    assert!(message.contains("projectId"));
    assert!(message.contains("not-an-id"));

    Ok(())
}

#[tokio::test]
async fn test_create_member_with_unknown_project_writes_nothing() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation { createMember(email: "kim@example.com", nickname: "kim", projectId: "9999") { id } }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&body), "NOT_FOUND");

    let body = graphql(&server, Some(TEST_TOKEN), "{ getMembers { id } }", json!({})).await;
    assert_eq!(field(&body, "getMembers").as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_create_member_links_project() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let project_id = create_project(&server, "Launch").await;

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($projectId: ID!) {
            createMember(email: "lee@example.com", nickname: "lee", projectId: $projectId) {
                id projectId
            }
        }"#,
        json!({ "projectId": project_id }),
    )
    .await;
    let created = field(&body, "createMember").clone();
    assert_eq!(created["projectId"].as_str().unwrap(), project_id);
    let member_id = created["id"].as_str().unwrap().to_string();

    // The project's member list reflects the link
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getProjectById(id: $id) { members { id email } } }",
        json!({ "id": project_id }),
    )
    .await;
    let members = field(&body, "getProjectById")["members"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["id"].as_str().unwrap(), member_id);

    // getMembersByProject returns the fixed subset for the same member
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($projectId: ID!) { getMembersByProject(projectId: $projectId) { id email nickname isActive } }",
        json!({ "projectId": project_id }),
    )
    .await;
    let members = field(&body, "getMembersByProject").as_array().unwrap().clone();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["email"], "lee@example.com");
    assert_eq!(members[0]["isActive"], true);

    // Deleting the member empties the project's member list
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "mutation($id: ID!) { deleteMember(id: $id) { id } }",
        json!({ "id": member_id }),
    )
    .await;
    field(&body, "deleteMember");

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getProjectById(id: $id) { members { id } } }",
        json!({ "id": project_id }),
    )
    .await;
    assert_eq!(
        field(&body, "getProjectById")["members"]
            .as_array()
            .unwrap()
            .len(),
        0
    );

    Ok(())
}

#[tokio::test]
async fn test_task_and_subtask_flow() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let project_id = create_project(&server, "Board").await;

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($projectId: ID!) {
            createMember(email: "park@example.com", nickname: "park", projectId: $projectId) { id }
        }"#,
        json!({ "projectId": project_id }),
    )
    .await;
    let member_id = field(&body, "createMember")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($projectId: ID!, $managers: [ID!]) {
            createTask(projectId: $projectId, name: "Design", status: "in-progress", managers: $managers) {
                id status managers { id email }
            }
        }"#,
        json!({ "projectId": project_id, "managers": [member_id] }),
    )
    .await;
    let task = field(&body, "createTask").clone();
    let task_id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["status"], "in-progress");
    let managers = task["managers"].as_array().unwrap();
    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0]["id"].as_str().unwrap(), member_id);

    // Attach a sub-task and find it under the parent
    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($parentTaskId: ID!) {
            createSubTask(parentTaskId: $parentTaskId, task: { name: "Wireframes", status: "todo" }) {
                id name status subTasks { id }
            }
        }"#,
        json!({ "parentTaskId": task_id }),
    )
    .await;
    let sub = field(&body, "createSubTask").clone();
    let sub_id = sub["id"].as_str().unwrap().to_string();
    assert_eq!(sub["name"], "Wireframes");
    assert_eq!(sub["subTasks"].as_array().unwrap().len(), 0);

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getTaskById(id: $id) { subTasks { id name } } }",
        json!({ "id": task_id }),
    )
    .await;
    let sub_tasks = field(&body, "getTaskById")["subTasks"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(sub_tasks.len(), 1);
    assert_eq!(sub_tasks[0]["id"].as_str().unwrap(), sub_id);

    // A sub-task can only be deleted through its own parent
    let other_task_body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($projectId: ID!) {
            createTask(projectId: $projectId, name: "QA", status: "todo") { id }
        }"#,
        json!({ "projectId": project_id }),
    )
    .await;
    let other_task_id = field(&other_task_body, "createTask")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "mutation($parentTaskId: ID!, $subTaskId: ID!) { deleteSubTask(parentTaskId: $parentTaskId, subTaskId: $subTaskId) { id } }",
        json!({ "parentTaskId": other_task_id, "subTaskId": sub_id }),
    )
    .await;
    assert_eq!(error_code(&body), "NOT_FOUND");

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "mutation($parentTaskId: ID!, $subTaskId: ID!) { deleteSubTask(parentTaskId: $parentTaskId, subTaskId: $subTaskId) { id subTasks { id } } }",
        json!({ "parentTaskId": task_id, "subTaskId": sub_id }),
    )
    .await;
    let parent = field(&body, "deleteSubTask").clone();
    assert_eq!(parent["id"].as_str().unwrap(), task_id);
    assert_eq!(parent["subTasks"].as_array().unwrap().len(), 0);

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getTaskById(id: $id) { id } }",
        json!({ "id": sub_id }),
    )
    .await;
    assert_eq!(error_code(&body), "NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_update_task_replaces_managers() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let project_id = create_project(&server, "Rotation").await;

    let mut member_ids = Vec::new();
    for (email, nickname) in [("a@example.com", "a"), ("b@example.com", "b")] {
        let body = graphql(
            &server,
            Some(TEST_TOKEN),
            "mutation($email: String!, $nickname: String!) { createMember(email: $email, nickname: $nickname) { id } }",
            json!({ "email": email, "nickname": nickname }),
        )
        .await;
        member_ids.push(
            field(&body, "createMember")["id"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($projectId: ID!, $managers: [ID!]) {
            createTask(projectId: $projectId, name: "Ops", status: "todo", managers: $managers) { id }
        }"#,
        json!({ "projectId": project_id, "managers": [member_ids[0]] }),
    )
    .await;
    let task_id = field(&body, "createTask")["id"].as_str().unwrap().to_string();

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "mutation($id: ID!, $managers: [ID!]) { updateTask(id: $id, managers: $managers) { id } }",
        json!({ "id": task_id, "managers": [member_ids[1]] }),
    )
    .await;
    field(&body, "updateTask");

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getTaskById(id: $id) { managers { id } } }",
        json!({ "id": task_id }),
    )
    .await;
    let managers = field(&body, "getTaskById")["managers"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0]["id"].as_str().unwrap(), member_ids[1]);

    Ok(())
}

#[tokio::test]
async fn test_delete_project_cleans_up() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let project_id = create_project(&server, "Sunset").await;

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($projectId: ID!) {
            createMember(email: "choi@example.com", nickname: "choi", projectId: $projectId) { id }
        }"#,
        json!({ "projectId": project_id }),
    )
    .await;
    let member_id = field(&body, "createMember")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        r#"mutation($projectId: ID!) {
            createTask(projectId: $projectId, name: "Teardown", status: "todo") { id }
        }"#,
        json!({ "projectId": project_id }),
    )
    .await;
    field(&body, "createTask");

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "mutation($id: ID!) { deleteProject(id: $id) { id name } }",
        json!({ "id": project_id }),
    )
    .await;
    assert_eq!(field(&body, "deleteProject")["name"], "Sunset");

    // The project's tasks are gone and the member is detached, not deleted
    let body = graphql(&server, Some(TEST_TOKEN), "{ getTasks { id } }", json!({})).await;
    assert_eq!(field(&body, "getTasks").as_array().unwrap().len(), 0);

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getMemberById(id: $id) { id projectId } }",
        json!({ "id": member_id }),
    )
    .await;
    assert!(field(&body, "getMemberById")["projectId"].is_null());

    let body = graphql(
        &server,
        Some(TEST_TOKEN),
        "query($id: ID!) { getProjectById(id: $id) { id } }",
        json!({ "id": project_id }),
    )
    .await;
    assert_eq!(error_code(&body), "NOT_FOUND");

    Ok(())
}
