//! Integration tests for the GitHub client against a local mock server.

use ghclient::prelude::*;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{Value, json};

fn repo_client(server: &ServerGuard) -> RepoClient {
    let client = GitHubClient::with_base_url("test-token", server.url()).unwrap();
    RepoClient::new(client, "grpc", "grpc-go").unwrap()
}

fn get_json(server: &mut ServerGuard, path: &str, body: Value) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create()
}

fn issue(number: u64, merged: bool, labels: &[&str], milestone: Option<(u64, &str)>) -> Value {
    let merged_at = if merged {
        json!("2024-05-01T12:00:00Z")
    } else {
        Value::Null
    };
    json!({
        "number": number,
        "title": format!("Change {}", number),
        "state": "closed",
        "html_url": format!("https://github.com/grpc/grpc-go/pull/{}", number),
        "user": { "login": "dev" },
        "labels": labels.iter().map(|l| json!({ "name": l })).collect::<Vec<_>>(),
        "milestone": milestone.map(|(n, t)| json!({ "number": n, "title": t, "state": "closed" })),
        "pull_request": {
            "url": format!("https://api.github.com/repos/grpc/grpc-go/pulls/{}", number),
            "html_url": format!("https://github.com/grpc/grpc-go/pull/{}", number),
            "merged_at": merged_at,
        }
    })
}

fn numbers(issues: &[Issue]) -> Vec<u64> {
    issues.iter().map(|i| i.number).collect()
}

#[test]
fn test_merged_prs_for_labels_filters_fixed_set() {
    let mut server = Server::new();
    let mut not_a_pr = issue(6, true, &["bug"], None);
    not_a_pr.as_object_mut().unwrap().remove("pull_request");

    let mock = server
        .mock("GET", "/repos/grpc/grpc-go/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "closed".into()),
            Matcher::UrlEncoded("labels".into(), "bug".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                issue(1, true, &["bug"], None),
                issue(2, false, &["bug"], None),
                issue(3, true, &["Type: Feature"], None),
                issue(4, true, &["bug", "Type: Performance"], None),
                issue(5, true, &[], None),
                not_a_pr,
            ])
            .to_string(),
        )
        .expect(1)
        .create();

    let prs = repo_client(&server).merged_prs_for_labels(&["bug"]).unwrap();

    assert_eq!(numbers(&prs), vec![1, 4]);
    mock.assert();
}

#[test]
fn test_merged_prs_for_milestone() {
    let mut server = Server::new();
    get_json(
        &mut server,
        "/repos/grpc/grpc-go/milestones",
        json!([
            { "number": 7, "title": "1.60 Release", "state": "closed" },
            { "number": 8, "title": "1.61 Release", "state": "open" },
        ]),
    );
    let issues = server
        .mock("GET", "/repos/grpc/grpc-go/issues")
        .match_query(Matcher::UrlEncoded("milestone".into(), "7".into()))
        .with_status(200)
        .with_body(
            json!([
                issue(10, true, &[], Some((7, "1.60 Release"))),
                issue(11, false, &[], Some((7, "1.60 Release"))),
                issue(12, true, &["bug"], Some((7, "1.60 Release"))),
            ])
            .to_string(),
        )
        .expect(1)
        .create();

    let prs = repo_client(&server)
        .merged_prs_for_milestone("1.60 Release")
        .unwrap();

    assert_eq!(numbers(&prs), vec![10, 12]);
    issues.assert();
}

#[test]
fn test_unknown_milestone_is_not_found() {
    let mut server = Server::new();
    get_json(
        &mut server,
        "/repos/grpc/grpc-go/milestones",
        json!([{ "number": 7, "title": "1.60 Release" }]),
    );

    let err = repo_client(&server)
        .merged_prs_for_milestone("2.0 Release")
        .unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[test]
fn test_commit_id_for_merged_pr() {
    let mut server = Server::new();
    get_json(
        &mut server,
        "/repos/grpc/grpc-go/pulls/1",
        json!({ "number": 1, "merged": true, "merge_commit_sha": "6f1d2c3" }),
    );
    get_json(
        &mut server,
        "/repos/grpc/grpc-go/pulls/2",
        json!({ "number": 2, "merged": false, "merge_commit_sha": "test-merge-sha" }),
    );
    let client = repo_client(&server);

    let merged: Issue = serde_json::from_value(issue(1, true, &[], None)).unwrap();
    let open: Issue = serde_json::from_value(issue(2, false, &[], None)).unwrap();

    assert_eq!(
        client.commit_id_for_merged_pr(&merged).unwrap().as_deref(),
        Some("6f1d2c3")
    );
    assert_eq!(client.commit_id_for_merged_pr(&open).unwrap(), None);
}

#[test]
fn test_commit_id_for_plain_issue_makes_no_request() {
    let mut server = Server::new();
    let pulls = server
        .mock("GET", Matcher::Regex(r"^/repos/grpc/grpc-go/pulls/".into()))
        .expect(0)
        .create();

    let mut value = issue(3, false, &[], None);
    value.as_object_mut().unwrap().remove("pull_request");
    let plain: Issue = serde_json::from_value(value).unwrap();

    assert_eq!(repo_client(&server).commit_id_for_merged_pr(&plain).unwrap(), None);
    pulls.assert();
}

#[test]
fn test_org_members_walks_pages() {
    let mut server = Server::new();
    let first_page: Vec<Value> = (0..100).map(|i| json!({ "login": format!("user{}", i) })).collect();
    let page1 = server
        .mock("GET", "/orgs/grpc/members")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(Value::Array(first_page).to_string())
        .expect(1)
        .create();
    let page2 = server
        .mock("GET", "/orgs/grpc/members")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(json!([{ "login": "dfawley" }, { "login": "menghanl" }]).to_string())
        .expect(1)
        .create();

    let members = repo_client(&server).org_members("grpc").unwrap();

    assert_eq!(members.len(), 102);
    assert!(members.contains("dfawley"));
    assert!(members.contains("user99"));
    page1.assert();
    page2.assert();
}

#[test]
fn test_new_branch_from_head_is_idempotent() {
    let mut server = Server::new();
    let missing = server
        .mock("GET", "/repos/grpc/grpc-go/git/ref/heads/v1.60.x")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create();
    get_json(
        &mut server,
        "/repos/grpc/grpc-go",
        json!({ "name": "grpc-go", "full_name": "grpc/grpc-go", "default_branch": "master" }),
    );
    get_json(
        &mut server,
        "/repos/grpc/grpc-go/git/ref/heads/master",
        json!({ "ref": "refs/heads/master", "object": { "sha": "abc123", "type": "commit" } }),
    );
    let create = server
        .mock("POST", "/repos/grpc/grpc-go/git/refs")
        .match_body(Matcher::PartialJson(
            json!({ "ref": "refs/heads/v1.60.x", "sha": "abc123" }),
        ))
        .with_status(201)
        .with_body(
            json!({ "ref": "refs/heads/v1.60.x", "object": { "sha": "abc123", "type": "commit" } })
                .to_string(),
        )
        .expect(1)
        .create();
    let client = repo_client(&server);

    client.new_branch_from_head("v1.60.x").unwrap();

    missing.remove();
    get_json(
        &mut server,
        "/repos/grpc/grpc-go/git/ref/heads/v1.60.x",
        json!({ "ref": "refs/heads/v1.60.x", "object": { "sha": "abc123", "type": "commit" } }),
    );

    client.new_branch_from_head("v1.60.x").unwrap();
    create.assert();
}

#[test]
fn test_new_branch_reports_head_lookup_failure() {
    let mut server = Server::new();
    server
        .mock("GET", "/repos/grpc/grpc-go/git/ref/heads/v1.60.x")
        .with_status(404)
        .create();
    get_json(
        &mut server,
        "/repos/grpc/grpc-go",
        json!({ "name": "grpc-go", "default_branch": "master" }),
    );
    server
        .mock("GET", "/repos/grpc/grpc-go/git/ref/heads/master")
        .with_status(500)
        .with_body(r#"{"message":"Server Error"}"#)
        .create();
    let create = server
        .mock("POST", "/repos/grpc/grpc-go/git/refs")
        .expect(0)
        .create();

    let err = repo_client(&server)
        .new_branch_from_head("v1.60.x")
        .unwrap_err();

    match err {
        GhError::Branch { message } => {
            assert!(message.contains("master"), "message: {message}");
            assert!(message.contains("Server Error"), "message: {message}");
        }
        other => panic!("expected branch error, got {other:?}"),
    }
    create.assert();
}

#[test]
fn test_new_pull_request() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/repos/grpc/grpc-go/pulls")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "head": "alice:fix",
            "base": "main",
            "title": "t",
            "body": "b",
            "maintainer_can_modify": true,
        })))
        .with_status(201)
        .with_body(
            json!({
                "number": 42,
                "state": "open",
                "merged": false,
                "html_url": "https://github.com/grpc/grpc-go/pull/42",
            })
            .to_string(),
        )
        .expect(1)
        .create();

    let url = repo_client(&server)
        .new_pull_request("alice", "fix", "main", "t", "b")
        .unwrap();

    assert_eq!(url, "https://github.com/grpc/grpc-go/pull/42");
    mock.assert();
}

#[test]
fn test_new_pull_request_validation_failure() {
    let mut server = Server::new();
    server
        .mock("POST", "/repos/grpc/grpc-go/pulls")
        .with_status(422)
        .with_body(r#"{"message":"Validation Failed"}"#)
        .create();

    let err = repo_client(&server)
        .new_pull_request("alice", "missing", "main", "t", "b")
        .unwrap_err();

    match err {
        GhError::PullRequest { message } => {
            assert!(message.contains("alice:missing"));
            assert!(message.contains("Validation Failed"));
        }
        other => panic!("expected pull request error, got {other:?}"),
    }
}

#[test]
fn test_new_draft_release() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/repos/grpc/grpc-go/releases")
        .match_body(Matcher::PartialJson(json!({
            "tag_name": "v1.60.0",
            "target_commitish": "v1.60.x",
            "name": "Release 1.60.0",
            "draft": true,
        })))
        .with_status(201)
        .with_body(
            json!({
                "id": 99,
                "tag_name": "v1.60.0",
                "name": "Release 1.60.0",
                "draft": true,
                "html_url": "https://github.com/grpc/grpc-go/releases/tag/untagged-1",
            })
            .to_string(),
        )
        .expect(1)
        .create();

    let url = repo_client(&server)
        .new_draft_release("v1.60.0", "v1.60.x", "Release 1.60.0", "notes")
        .unwrap();

    assert_eq!(url, "https://github.com/grpc/grpc-go/releases/tag/untagged-1");
    mock.assert();
}

#[test]
fn test_primary_email() {
    let mut server = Server::new();
    get_json(
        &mut server,
        "/user/emails",
        json!([
            { "email": "old@example.com", "primary": false, "verified": true },
            { "email": "me@example.com", "primary": true, "verified": true },
        ]),
    );

    assert_eq!(repo_client(&server).primary_email().unwrap(), "me@example.com");
}

#[test]
fn test_primary_email_without_addresses() {
    let mut server = Server::new();
    get_json(&mut server, "/user/emails", json!([]));

    assert!(matches!(
        repo_client(&server).primary_email(),
        Err(GhError::NoEmail)
    ));
}

#[test]
fn test_primary_email_without_primary_flag() {
    let mut server = Server::new();
    get_json(
        &mut server,
        "/user/emails",
        json!([{ "email": "a@example.com", "primary": false, "verified": true }]),
    );

    assert!(matches!(
        repo_client(&server).primary_email(),
        Err(GhError::NoPrimaryEmail { count: 1 })
    ));
}

#[test]
fn test_login() {
    let mut server = Server::new();
    get_json(&mut server, "/user", json!({ "login": "menghanl", "id": 1 }));

    assert_eq!(repo_client(&server).login().unwrap(), "menghanl");
}

#[test]
fn test_api_error_carries_status_and_message() {
    let mut server = Server::new();
    server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create();

    match repo_client(&server).login().unwrap_err() {
        GhError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test]
fn test_listing_without_end_is_an_error() {
    let mut server = Server::new();
    let full_page: Vec<Value> = (0..100).map(|i| json!({ "login": format!("user{}", i) })).collect();
    get_json(&mut server, "/orgs/big/members", Value::Array(full_page));

    let err = repo_client(&server).org_members("big").unwrap_err();

    match err {
        GhError::Truncated { endpoint, pages } => {
            assert_eq!(endpoint, "/orgs/big/members");
            assert_eq!(pages, 100);
        }
        other => panic!("expected truncated listing error, got {other:?}"),
    }
}

#[test]
fn test_caller_supplied_transport() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/user")
        .match_header("authorization", "token caller-configured")
        .match_header("user-agent", "release-bot")
        .with_status(200)
        .with_body(json!({ "login": "release-bot" }).to_string())
        .expect(1)
        .create();

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::AUTHORIZATION,
        reqwest::header::HeaderValue::from_static("token caller-configured"),
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static("release-bot"),
    );
    let http = reqwest::blocking::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();
    let client = GitHubClient::from_http_client(http, format!("{}/", server.url()));

    assert_eq!(client.login().unwrap(), "release-bot");
    mock.assert();
}

#[test]
fn test_merged_prs_for_labels_with_comma() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/grpc/grpc-go/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "closed".into()),
            Matcher::UrlEncoded("labels".into(), "bug".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                issue(1, true, &["bug", "area: client,server"], None),
                issue(2, true, &["bug", "area: client"], None),
                issue(3, true, &["bug"], None),
            ])
            .to_string(),
        )
        .expect(1)
        .create();

    let prs = repo_client(&server)
        .merged_prs_for_labels(&["area: client,server", "bug"])
        .unwrap();

    assert_eq!(numbers(&prs), vec![1]);
    mock.assert();
}

#[test]
fn test_new_branch_reports_default_branch_failure() {
    let mut server = Server::new();
    server
        .mock("GET", "/repos/grpc/grpc-go/git/ref/heads/v1.60.x")
        .with_status(404)
        .create();
    server
        .mock("GET", "/repos/grpc/grpc-go")
        .with_status(502)
        .with_body(r#"{"message":"Bad Gateway"}"#)
        .create();
    let create = server
        .mock("POST", "/repos/grpc/grpc-go/git/refs")
        .expect(0)
        .create();

    let err = repo_client(&server)
        .new_branch_from_head("v1.60.x")
        .unwrap_err();

    match err {
        GhError::Branch { message } => {
            assert!(message.contains("default branch"), "message: {message}");
            assert!(message.contains("Bad Gateway"), "message: {message}");
        }
        other => panic!("expected branch error, got {other:?}"),
    }
    create.assert();
}

#[test]
fn test_new_branch_created_concurrently_is_ok() {
    let mut server = Server::new();
    server
        .mock("GET", "/repos/grpc/grpc-go/git/ref/heads/v1.60.x")
        .with_status(404)
        .create();
    get_json(
        &mut server,
        "/repos/grpc/grpc-go",
        json!({ "default_branch": "master" }),
    );
    get_json(
        &mut server,
        "/repos/grpc/grpc-go/git/ref/heads/master",
        json!({ "ref": "refs/heads/master", "object": { "sha": "abc123" } }),
    );
    let create = server
        .mock("POST", "/repos/grpc/grpc-go/git/refs")
        .with_status(422)
        .with_body(r#"{"message":"Reference already exists"}"#)
        .expect(1)
        .create();

    repo_client(&server).new_branch_from_head("v1.60.x").unwrap();
    create.assert();
}
