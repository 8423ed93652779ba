use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{CommandName, CommandRunner};
use crate::api::JiraClient;

fn runner_for(server: &MockServer) -> CommandRunner {
    let client = JiraClient::with_credentials(&server.uri(), "user@example.com", "token").unwrap();
    CommandRunner::new(client)
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

fn issue_json(key: &str, summary: &str) -> Value {
    json!({
        "id": "10000",
        "key": key,
        "fields": {
            "summary": summary,
            "status": { "name": "In Progress" },
            "assignee": { "accountId": "acc-1", "displayName": "Jane Smith" }
        }
    })
}

#[tokio::test]
async fn test_missing_required_fields_never_reach_jira() {
    let server = MockServer::start().await;
    let runner = runner_for(&server);

    let cases = [
        ("getIssueDetails", json!({})),
        ("createIssue", json!({ "projectKey": "PROJ", "summary": "Test Ticket" })),
        ("createIssue", json!({ "summary": "Test Ticket", "issueType": "Task" })),
        ("batchCreateIssues", json!({ "issues": [{ "summary": "a", "issueType": "Task" }] })),
        ("batchCreateIssues", json!({ "projectKey": "PROJ" })),
        ("logWork", json!({ "issueKey": "PROJ-123" })),
        ("logWork", json!({ "timeSpent": "2h" })),
        ("createTask", json!({ "projectKey": "PROJ" })),
        ("getTask", json!({})),
        ("updateTask", json!({ "taskId": "PROJ-1" })),
        ("deleteTask", json!({ "taskId": "" })),
        ("listTasks", json!({ "maxResults": 5 })),
    ];

    for (name, input) in cases {
        let output = runner.run(name, input.clone()).await.to_json();
        assert_eq!(output["error"], json!(true), "{} with {}", name, input);
        assert!(
            output["message"]
                .as_str()
                .unwrap()
                .starts_with("Missing required fields:"),
            "{} message: {}",
            name,
            output["message"]
        );
    }

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_get_issue_details_projects_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/PROJ-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {
                "summary": "Fix login",
                "status": { "name": "In Progress" },
                "assignee": { "displayName": "Jane Smith" },
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [
                        { "type": "paragraph", "content": [
                            { "type": "text", "text": "a" },
                            { "type": "text", "text": "b" }
                        ] },
                        { "type": "paragraph", "content": [
                            { "type": "text", "text": "c" }
                        ] }
                    ]
                },
                "customfield_10014": "PROJ-1",
                "subtasks": [
                    { "key": "PROJ-124", "fields": { "summary": "Write test", "status": { "name": "Done" } } }
                ],
                "labels": ["ignored"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run("getIssueDetails", json!({ "issueIdOrKey": "PROJ-123" }))
        .await;

    assert_eq!(
        output.to_json(),
        json!({
            "key": "PROJ-123",
            "summary": "Fix login",
            "status": "In Progress",
            "assignee": "Jane Smith",
            "description": "a b\nc",
            "epicLink": "PROJ-1",
            "subtasks": [
                { "key": "PROJ-124", "summary": "Write test", "status": "Done" }
            ]
        })
    );
}

#[tokio::test]
async fn test_get_issue_details_api_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/NOPE-1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Issue does not exist"))
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run("getIssueDetails", json!({ "issueIdOrKey": "NOPE-1" }))
        .await;

    assert!(output.is_error());
    let message = output.to_json()["message"].as_str().unwrap().to_string();
    assert!(message.contains("404"));
    assert!(message.contains("Issue does not exist"));
}

#[tokio::test]
async fn test_create_issue_returns_key_and_browse_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(body_json(json!({
            "fields": {
                "project": { "key": "PROJ" },
                "summary": "Test Ticket",
                "issuetype": { "name": "Task" }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": "PROJ-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run(
            "createIssue",
            json!({ "projectKey": "PROJ", "summary": "Test Ticket", "issueType": "Task" }),
        )
        .await;

    assert_eq!(
        output.to_json(),
        json!({ "key": "PROJ-1", "url": format!("{}/browse/PROJ-1", server.uri()) })
    );
}

#[tokio::test]
async fn test_create_issue_api_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"errors":{"issuetype":"Specify a valid issue type"}}"#),
        )
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run(
            "createIssue",
            json!({ "projectKey": "PROJ", "summary": "s", "issueType": "Nope" }),
        )
        .await;

    let json = output.to_json();
    assert_eq!(json["error"], json!(true));
    assert!(json["message"].as_str().unwrap().contains("Specify a valid issue type"));
}

#[tokio::test]
async fn test_transition_issue_is_a_placeholder() {
    let server = MockServer::start().await;
    let runner = runner_for(&server);

    let output = runner
        .run(
            "transitionIssue",
            json!({ "issueIdOrKey": "PROJ-123", "transitionId": 31 }),
        )
        .await;
    let json = output.to_json();
    assert_eq!(json["success"], json!(true));
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("PROJ-123"));
    assert!(message.contains("31"));

    // Missing inputs still succeed
    let output = runner.run("transitionIssue", json!({})).await;
    assert!(!output.is_error());

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_transition_issue_accepts_any_input() {
    let server = MockServer::start().await;
    let runner = runner_for(&server);

    let output = runner
        .run(
            "transitionIssue",
            json!({ "issueIdOrKey": "PROJ-1", "transitionId": true }),
        )
        .await;
    assert_eq!(
        output.to_json(),
        json!({ "success": true, "message": "Issue PROJ-1 transitioned using transition true" })
    );

    let output = runner.run("transitionIssue", json!(["PROJ-1", "31"])).await;
    let json = output.to_json();
    assert_eq!(json["success"], json!(true));
    assert!(json.get("error").is_none());

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_batch_create_isolates_failures_and_keeps_order() {
    let server = MockServer::start().await;
    for (summary, key) in [("First", "PROJ-1"), ("Third", "PROJ-3")] {
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue"))
            .and(body_partial_json(json!({ "fields": { "summary": summary } })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": key })))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(body_partial_json(json!({ "fields": { "summary": "Broken" } })))
        .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run(
            "batchCreateIssues",
            json!({
                "projectKey": "PROJ",
                "issues": [
                    { "summary": "First", "issueType": "Task" },
                    { "summary": "Broken", "issueType": "Task" },
                    { "summary": "Third", "issueType": "Bug" }
                ]
            }),
        )
        .await;

    assert!(!output.is_error());
    let json = output.to_json();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[0],
        json!({ "key": "PROJ-1", "url": format!("{}/browse/PROJ-1", server.uri()), "success": true })
    );
    assert_eq!(items[1]["error"], json!(true));
    assert_eq!(items[1]["summary"], json!("Broken"));
    assert!(items[1]["message"].as_str().unwrap().contains("server exploded"));
    assert_eq!(items[2]["key"], json!("PROJ-3"));
    assert_eq!(items[2]["success"], json!(true));
}

#[tokio::test]
async fn test_batch_item_validation_is_per_item() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": "PROJ-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run(
            "batchCreateIssues",
            json!({
                "projectKey": "PROJ",
                "issues": [
                    { "summary": "No type" },
                    { "summary": "Valid", "issueType": "Task" }
                ]
            }),
        )
        .await;

    let json = output.to_json();
    assert_eq!(
        json[0],
        json!({ "error": true, "summary": "No type", "message": "Missing required fields: issueType" })
    );
    assert_eq!(json[1]["key"], json!("PROJ-9"));
}

#[tokio::test]
async fn test_batch_malformed_item_does_not_block_others() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(body_partial_json(json!({ "fields": { "summary": "Good" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": "PROJ-10" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run(
            "batchCreateIssues",
            json!({
                "projectKey": "PROJ",
                "issues": [
                    { "summary": "Good", "issueType": "Task" },
                    { "summary": "Bad priority", "issueType": "Task", "priority": 3 }
                ]
            }),
        )
        .await;

    assert!(!output.is_error());
    let json = output.to_json();
    assert_eq!(json[0]["key"], json!("PROJ-10"));
    assert_eq!(json[0]["success"], json!(true));
    assert_eq!(json[1]["error"], json!(true));
    assert_eq!(json[1]["summary"], json!("Bad priority"));
    assert!(json[1]["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid input for batchCreateIssues"));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_batch_with_empty_issues_is_single_error() {
    let server = MockServer::start().await;

    let output = runner_for(&server)
        .run("batchCreateIssues", json!({ "projectKey": "PROJ", "issues": [] }))
        .await;

    assert!(output.is_error());
    assert_eq!(
        output.to_json(),
        json!({ "error": true, "message": "Missing required fields: issues" })
    );
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_log_work_without_comment_sends_only_time_spent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue/PROJ-123/worklog"))
        .and(body_json(json!({ "timeSpent": "2h" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "1" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run("logWork", json!({ "issueKey": "PROJ-123", "timeSpent": "2h" }))
        .await;

    let json = output.to_json();
    assert_eq!(json["success"], json!(true));
    assert!(json["message"].as_str().unwrap().contains("PROJ-123"));
}

#[tokio::test]
async fn test_log_work_empty_response_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue/PROJ-7/worklog"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run("logWork", json!({ "issueKey": "PROJ-7", "timeSpent": "30m" }))
        .await;

    assert_eq!(
        output.to_json(),
        json!({ "success": true, "message": "Logged 30m on PROJ-7" })
    );
}

#[tokio::test]
async fn test_log_work_with_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue/PROJ-123/worklog"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "2" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run(
            "logWork",
            json!({ "issueKey": "PROJ-123", "timeSpent": "1h", "comment": "Pairing" }),
        )
        .await;
    assert!(!output.is_error());

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let mut fields: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(fields, vec!["comment", "timeSpent"]);
    assert_eq!(body["timeSpent"], json!("1h"));
}

#[tokio::test]
async fn test_create_task_defaults_issue_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(body_partial_json(json!({ "fields": { "issuetype": { "name": "Task" } } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": "PROJ-2" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run("createTask", json!({ "projectKey": "PROJ", "summary": "Chore" }))
        .await;

    assert_eq!(output.to_json()["key"], json!("PROJ-2"));
}

#[tokio::test]
async fn test_get_task_uses_issue_projection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/PROJ-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json("PROJ-5", "Task five")))
        .expect(1)
        .mount(&server)
        .await;

    let json = runner_for(&server)
        .run("getTask", json!({ "taskId": "PROJ-5" }))
        .await
        .to_json();

    assert_eq!(json["key"], json!("PROJ-5"));
    assert_eq!(json["summary"], json!("Task five"));
    assert_eq!(json["assignee"], json!("Jane Smith"));
    assert_eq!(json["description"], Value::Null);
}

#[tokio::test]
async fn test_update_task() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/rest/api/3/issue/PROJ-5"))
        .and(body_json(json!({ "fields": { "summary": "Renamed" } })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let json = runner_for(&server)
        .run(
            "updateTask",
            json!({ "taskId": "PROJ-5", "fields": { "summary": "Renamed" } }),
        )
        .await
        .to_json();

    assert_eq!(json, json!({ "success": true, "message": "Task PROJ-5 updated" }));
}

#[tokio::test]
async fn test_delete_task_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/api/3/issue/PROJ-5"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let output = runner_for(&server)
        .run("deleteTask", json!({ "taskId": "PROJ-5" }))
        .await;

    assert!(output.is_error());
    assert!(output.to_json()["message"].as_str().unwrap().contains("403"));
}

#[tokio::test]
async fn test_delete_task() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/api/3/issue/PROJ-6"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let json = runner_for(&server)
        .run("deleteTask", json!({ "taskId": "PROJ-6" }))
        .await
        .to_json();

    assert_eq!(json, json!({ "success": true, "message": "Task PROJ-6 deleted" }));
}

#[tokio::test]
async fn test_list_tasks_repeated_calls_send_identical_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/search"))
        .and(query_param("jql", "project = PROJ"))
        .and(query_param("maxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 7,
            "issues": [issue_json("PROJ-1", "One"), issue_json("PROJ-2", "Two")]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let runner = runner_for(&server);
    let input = json!({ "jql": "project = PROJ", "maxResults": 2 });
    let first = runner.run("listTasks", input.clone()).await;
    let second = runner.run("listTasks", input).await;

    assert_eq!(first, second);
    assert_eq!(
        first.to_json(),
        json!({
            "total": 7,
            "tasks": [
                { "key": "PROJ-1", "summary": "One", "status": "In Progress", "assignee": "Jane Smith" },
                { "key": "PROJ-2", "summary": "Two", "status": "In Progress", "assignee": "Jane Smith" }
            ]
        })
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].method, requests[1].method);
    assert_eq!(requests[0].url, requests[1].url);
}

#[tokio::test]
async fn test_unknown_command() {
    let server = MockServer::start().await;
    let output = runner_for(&server).run("closeIssue", json!({})).await;
    assert_eq!(
        output.to_json(),
        json!({ "error": true, "message": "Unknown command: closeIssue" })
    );
}

#[tokio::test]
async fn test_invalid_input_shape() {
    let server = MockServer::start().await;
    let output = runner_for(&server)
        .run(CommandName::ListTasks.as_str(), json!({ "jql": "x", "maxResults": "many" }))
        .await;
    assert!(output.is_error());
    assert!(output.to_json()["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid input for listTasks"));
    assert_eq!(request_count(&server).await, 0);
}
