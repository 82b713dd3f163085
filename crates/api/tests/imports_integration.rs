//! Integration tests for the spreadsheet import pipeline.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    empty_request, import_row, unique_email, unique_tax_id, upload_request, workbook, TestContext,
};
use serde_json::Value;
use shared::crypto::sha256_hex;
use std::time::{Duration, Instant};
use uuid::Uuid;

async fn client_by_tax_id(ctx: &TestContext, tax_id: &str) -> Option<(Uuid, Option<Uuid>)> {
    sqlx::query_as("SELECT id, agent_id FROM clients WHERE tax_id = $1")
        .bind(tax_id)
        .fetch_optional(&ctx.pool)
        .await
        .unwrap()
}

async fn import_counts(ctx: &TestContext, content_hash: &str) -> Option<(i32, i32)> {
    sqlx::query_as("SELECT succeeded, failed FROM import_logs WHERE content_hash = $1")
        .bind(content_hash)
        .fetch_optional(&ctx.pool)
        .await
        .unwrap()
}

fn error_reasons(body: &Value) -> Vec<(u64, String)> {
    body["import"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["row"].as_u64().unwrap(),
                e["error"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_import_creates_clients() {
    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let tax_ids = [unique_tax_id(), unique_tax_id()];
    let bytes = workbook(&[
        import_row("Acme", &tax_ids[0], &unique_email()),
        import_row("Globex", &tax_ids[1], ""),
    ]);

    let (status, body) = ctx
        .send(upload_request(&supervisor.token, "clients.xlsx", &bytes))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(
        body["message"],
        "Import finished: 2 clients created, 0 errors."
    );
    assert_eq!(body["import"]["succeeded"], 2);
    assert_eq!(body["import"]["failed"], 0);
    assert_eq!(body["import"]["original_filename"], "clients.xlsx");
    assert_eq!(body["import"]["user_id"], serde_json::json!(supervisor.id));

    for tax_id in &tax_ids {
        let (_, agent_id) = client_by_tax_id(&ctx, tax_id).await.unwrap();
        assert!(agent_id.is_none());
    }

    // The upload is kept on disk
    let path = body["import"]["file_path"].as_str().unwrap();
    assert!(path.ends_with("_clients.xlsx"));
    assert_eq!(std::fs::read(path).unwrap(), bytes);
}

#[tokio::test]
async fn test_agent_import_is_owned_by_agent() {
    let ctx = TestContext::new().await;
    let (agent, agent_id) = ctx.create_agent().await;
    let tax_id = unique_tax_id();
    let bytes = workbook(&[import_row("Initech", &tax_id, &unique_email())]);

    let (status, _) = ctx
        .send(upload_request(&agent.token, "mine.xlsx", &bytes))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, owner) = client_by_tax_id(&ctx, &tax_id).await.unwrap();
    assert_eq!(owner, Some(agent_id));
}

#[tokio::test]
async fn test_same_content_is_rejected_regardless_of_name() {
    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let bytes = workbook(&[import_row("Umbrella", &unique_tax_id(), &unique_email())]);

    let (status, _) = ctx
        .send(upload_request(&supervisor.token, "first.xlsx", &bytes))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .send(upload_request(&supervisor.token, "renamed.xlsx", &bytes))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_submission");
    assert_eq!(body["message"], "This file has already been imported");
}

#[tokio::test]
async fn test_row_failures_do_not_stop_the_batch() {
    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let repeated = unique_tax_id();
    let mut missing_street = import_row("No Street", &unique_tax_id(), "");
    missing_street[7] = String::new();

    let bytes = workbook(&[
        import_row("First", &repeated, &unique_email()),
        import_row("Second", &repeated, &unique_email()),
        import_row("No Tax Id", "", &unique_email()),
        missing_street,
        import_row("Last", &unique_tax_id(), ""),
    ]);

    let (status, body) = ctx
        .send(upload_request(&supervisor.token, "mixed.xlsx", &bytes))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["import"]["succeeded"], 2);
    assert_eq!(body["import"]["failed"], 3);
    assert_eq!(
        body["message"],
        "Import finished: 2 clients created, 3 errors."
    );
    assert_eq!(
        error_reasons(&body),
        vec![
            (3, "client already exists".to_string()),
            (4, "missing required fields".to_string()),
            (5, "missing required fields".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_duplicate_email_is_row_failure() {
    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let email = unique_email();
    let bytes = workbook(&[
        import_row("One", &unique_tax_id(), &email),
        import_row("Two", &unique_tax_id(), &email),
    ]);

    let (status, body) = ctx
        .send(upload_request(&supervisor.token, "emails.xlsx", &bytes))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["import"]["succeeded"], 1);
    assert_eq!(body["import"]["failed"], 1);
    assert_eq!(error_reasons(&body)[0].0, 3);
}

#[tokio::test]
async fn test_bad_extension_rejected_before_processing() {
    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let tax_id = unique_tax_id();
    let bytes = workbook(&[import_row("Csv Co", &tax_id, "")]);

    let (status, body) = ctx
        .send(upload_request(&supervisor.token, "clients.csv", &bytes))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "file");
    assert!(client_by_tax_id(&ctx, &tax_id).await.is_none());
}

#[tokio::test]
async fn test_unreadable_workbook_rejected() {
    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let bytes = format!("not a workbook {}", Uuid::new_v4()).into_bytes();

    let (status, body) = ctx
        .send(upload_request(&supervisor.token, "broken.xlsx", &bytes))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "file");

    let logged: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM import_logs WHERE content_hash = $1)",
    )
    .bind(shared::crypto::sha256_hex(&bytes))
    .fetch_one(&ctx.pool)
    .await
    .unwrap();
    assert!(!logged);
}

#[tokio::test]
async fn test_import_history_is_scoped() {
    let ctx = TestContext::new().await;
    let (agent, _) = ctx.create_agent().await;
    let (other, _) = ctx.create_agent().await;
    let supervisor = ctx.create_supervisor().await;

    let (_, mine) = ctx
        .send(upload_request(
            &agent.token,
            "a.xlsx",
            &workbook(&[import_row("A", &unique_tax_id(), "")]),
        ))
        .await;
    let (_, theirs) = ctx
        .send(upload_request(
            &other.token,
            "b.xlsx",
            &workbook(&[import_row("B", &unique_tax_id(), "")]),
        ))
        .await;

    let (status, body) = ctx
        .send(empty_request(Method::GET, "/api/v1/imports", Some(&agent.token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["id"], mine["import"]["id"]);

    let theirs_path = format!("/api/v1/imports/{}", theirs["import"]["id"].as_str().unwrap());
    let (status, _) = ctx
        .send(empty_request(Method::GET, &theirs_path, Some(&agent.token)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send(empty_request(Method::GET, &theirs_path, Some(&supervisor.token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], 1);
}

#[tokio::test]
async fn test_long_filename_is_truncated_in_log() {
    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let filename = format!("{}.xlsx", "c".repeat(300));
    let bytes = workbook(&[import_row("Initech", &unique_tax_id(), "")]);

    let (status, body) = ctx
        .send(upload_request(&supervisor.token, &filename, &bytes))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let stored = body["import"]["original_filename"].as_str().unwrap();
    assert_eq!(stored.chars().count(), 255);
    assert!(stored.ends_with(".xlsx"));
}

#[tokio::test]
async fn test_import_finalized_when_request_is_dropped() {
    const ROWS: usize = 200;

    let ctx = TestContext::new().await;
    let supervisor = ctx.create_supervisor().await;
    let tax_ids: Vec<String> = (0..ROWS).map(|_| unique_tax_id()).collect();
    let rows: Vec<Vec<String>> = tax_ids
        .iter()
        .map(|tax_id| import_row("Dropped Co", tax_id, ""))
        .collect();
    let bytes = workbook(&rows);
    let content_hash = sha256_hex(&bytes);

    // Drop the request future early, as a timeout or disconnect would.
    let _ = tokio::time::timeout(
        Duration::from_millis(20),
        ctx.send(upload_request(&supervisor.token, "dropped.xlsx", &bytes)),
    )
    .await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    if import_counts(&ctx, &content_hash).await.is_none() {
        // Cancelled before the log was written; nothing blocks a resubmission.
        return;
    }

    let deadline = Instant::now() + Duration::from_secs(60);
    let (succeeded, failed) = loop {
        let (succeeded, failed) = import_counts(&ctx, &content_hash).await.unwrap();
        if (succeeded + failed) as usize == ROWS {
            break (succeeded, failed);
        }
        assert!(Instant::now() < deadline, "import log was never finalized");
        tokio::time::sleep(Duration::from_millis(100)).await;
    };

    assert_eq!(succeeded as usize, ROWS);
    assert_eq!(failed, 0);
    let created: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE tax_id = ANY($1)")
        .bind(&tax_ids)
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(created as usize, ROWS);
}
