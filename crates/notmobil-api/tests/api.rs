mod common;

use pretty_assertions::assert_eq;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use common::{spawn_api, EMAIL, PASSWORD};

async fn login(client: &Client, base: &str) -> Value {
    let response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"email": EMAIL, "password": PASSWORD}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

async fn access_token(client: &Client, base: &str) -> String {
    login(client, base).await["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn health_and_unknown_endpoints() {
    let base = spawn_api().await;
    let client = Client::new();

    let health: Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let missing = client.get(format!("{base}/nope")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({"error": "Endpoint not found"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_validates_input_and_credentials() {
    let base = spawn_api().await;
    let client = Client::new();

    let session = login(&client, &base).await;
    assert_eq!(session["user"]["id"], "user1");
    assert_eq!(session["user"]["email"], EMAIL);
    assert!(session["refreshToken"].as_str().is_some());

    let missing = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"email": EMAIL}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let wrong = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"email": EMAIL, "password": "nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let body: Value = wrong.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test(flavor = "multi_thread")]
async fn refresh_issues_access_tokens_from_refresh_tokens_only() {
    let base = spawn_api().await;
    let client = Client::new();
    let session = login(&client, &base).await;

    let refreshed = client
        .post(format!("{base}/auth/refresh"))
        .json(&json!({"refreshToken": session["refreshToken"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(refreshed.status(), StatusCode::OK);
    let refreshed: Value = refreshed.json().await.unwrap();
    let new_access = refreshed["accessToken"].as_str().unwrap();

    let listed = client
        .get(format!("{base}/notes"))
        .bearer_auth(new_access)
        .send()
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);

    let misuse = client
        .post(format!("{base}/auth/refresh"))
        .json(&json!({"refreshToken": session["accessToken"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(misuse.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn notes_require_a_valid_bearer_token() {
    let base = spawn_api().await;
    let client = Client::new();

    let anonymous = client.get(format!("{base}/notes")).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = client
        .get(format!("{base}/notes"))
        .bearer_auth("not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    let body: Value = forged.json().await.unwrap();
    assert!(body["error"].as_str().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn note_crud_round_trip() {
    let base = spawn_api().await;
    let client = Client::new();
    let token = access_token(&client, &base).await;

    let payload = json!({
        "id": "client-1",
        "title": "Groceries",
        "content": "milk",
        "createdAt": 1_000,
        "updatedAt": 2_000,
        "isSynced": false,
        "tags": ["shopping"],
        "location": {"latitude": 1.5, "longitude": 2.5}
    });
    let created = client
        .post(format!("{base}/notes"))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = created.json().await.unwrap();
    assert_eq!(created["id"], "client-1");
    assert_eq!(created["createdAt"], 1_000);
    assert_eq!(created["isSynced"], true);
    assert_eq!(created["userId"], "user1");

    let repeated = client
        .post(format!("{base}/notes"))
        .bearer_auth(&token)
        .json(&json!({"id": "client-1", "title": "Groceries", "content": "milk only", "updatedAt": 2_500}))
        .send()
        .await
        .unwrap();
    assert_eq!(repeated.status(), StatusCode::OK);
    let repeated: Value = repeated.json().await.unwrap();
    assert_eq!(repeated["id"], "client-1");
    assert_eq!(repeated["content"], "milk only");
    assert_eq!(repeated["createdAt"], 1_000);
    assert_eq!(repeated["updatedAt"], 2_500);
    assert_eq!(repeated["tags"], json!(["shopping"]));

    let updated: Value = client
        .put(format!("{base}/notes/client-1"))
        .bearer_auth(&token)
        .json(&json!({"content": "milk and eggs", "updatedAt": 3_000}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["title"], "Groceries");
    assert_eq!(updated["content"], "milk and eggs");
    assert_eq!(updated["updatedAt"], 3_000);
    assert_eq!(updated["tags"], json!(["shopping"]));

    let listed: Vec<Value> = client
        .get(format!("{base}/notes"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, vec![updated.clone()]);

    let fetched: Value = client
        .get(format!("{base}/notes/client-1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, updated);

    let missing_update = client
        .put(format!("{base}/notes/unknown"))
        .bearer_auth(&token)
        .json(&json!({"title": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_update.status(), StatusCode::NOT_FOUND);

    let deleted = client
        .delete(format!("{base}/notes/client-1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let deleted_again = client
        .delete(format!("{base}/notes/client-1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted_again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_without_id_assigns_one() {
    let base = spawn_api().await;
    let client = Client::new();
    let token = access_token(&client, &base).await;

    let created: Value = client
        .post(format!("{base}/notes"))
        .bearer_auth(&token)
        .json(&json!({"title": "No id", "content": "body"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!created["id"].as_str().unwrap().is_empty());
    assert_eq!(created["tags"], json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn text_assistance_endpoints() {
    let base = spawn_api().await;
    let client = Client::new();
    let token = access_token(&client, &base).await;

    let summary: Value = client
        .post(format!("{base}/ai/summarize"))
        .bearer_auth(&token)
        .json(&json!({"text": "Short note.", "geminiApiKey": "user-key"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["summary"], "Short note.");

    let tags: Value = client
        .post(format!("{base}/ai/generate-tags"))
        .bearer_auth(&token)
        .json(&json!({"text": "Project meeting at the office"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tags["tags"], json!(["work"]));

    let category: Value = client
        .post(format!("{base}/ai/classify"))
        .bearer_auth(&token)
        .json(&json!({"text": "market list"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(category["category"], "shopping");

    let empty = client
        .post(format!("{base}/ai/classify"))
        .bearer_auth(&token)
        .json(&json!({"text": "  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    let body: Value = empty.json().await.unwrap();
    assert_eq!(body["error"], "Text required");
}
