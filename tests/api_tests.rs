// tests/api_tests.rs

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use storyhub::{config::Config, routes, state::AppState};
use tempfile::TempDir;

/// Everything a test needs to talk to a running app: its base URL and a
/// pool on the same database for seeding. The TempDir keeps the SQLite
/// file alive until the test finishes.
struct TestApp {
    address: String,
    pool: SqlitePool,
    _tmp: TempDir,
}

/// Spawns the app on a random port against a fresh temporary database.
async fn spawn_app() -> TestApp {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = tmp.path().join("test.db");

    // 1. Create a pool on a database file private to this test
    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to open test database");

    // 2. Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    // 3. Create test configuration and state
    let config = Config {
        database_url: format!("sqlite://{}", db_path.display()),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        media_dir: tmp.path().join("media").to_string_lossy().into_owned(),
        logs_dir: tmp.path().join("logs").to_string_lossy().into_owned(),
        contact_daily_limit: 2,
        admin_username: None,
        admin_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        address,
        pool,
        _tmp: tmp,
    }
}

/// Registers a user and returns their bearer token.
async fn register_and_login(
    client: &reqwest::Client,
    address: &str,
    username: &str,
) -> String {
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({"username": username, "password": "password123"}))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let login = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({"username": username, "password": "password123"}))
        .send()
        .await
        .expect("Login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}

/// Registers a user, flips their role to admin in the database and logs
/// in again so the token carries the admin role.
async fn register_admin(app: &TestApp, client: &reqwest::Client, username: &str) -> String {
    register_and_login(client, &app.address, username).await;

    sqlx::query("UPDATE users SET role = 'admin' WHERE username = ?1")
        .bind(username)
        .execute(&app.pool)
        .await
        .expect("Failed to promote user");

    let login = client
        .post(&format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({"username": username, "password": "password123"}))
        .send()
        .await
        .expect("Admin login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");
    assert_eq!(login["role"], "admin");

    login["token"].as_str().expect("Token not found").to_string()
}

/// Publishes a minimal one-paragraph story and returns its id.
async fn create_story(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    title: &str,
) -> i64 {
    let response = client
        .post(&format!("{}/api/stories", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "title": title,
            "blocks": [
                {"block_type": "paragraph", "text_content": "Opening paragraph."}
            ],
            "tags": ["rust"]
        }))
        .send()
        .await
        .expect("Create story failed");
    assert_eq!(response.status().as_u16(), 201);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse create response");
    body["id"].as_i64().expect("Story id missing")
}

async fn approve_story(
    client: &reqwest::Client,
    address: &str,
    admin_token: &str,
    story_id: i64,
) {
    let response = client
        .put(&format!("{}/api/admin/stories/{}/approval", address, story_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({"status": "approved"}))
        .send()
        .await
        .expect("Approval failed");
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "username": "new_reader",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], "new_reader");
    assert_eq!(body["role"], "user");
    // The hash must never leave the server.
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: Send a username that is too short
    let response = client
        .post(&format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "username": "yo",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_rejects_duplicate_usernames() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let payload = serde_json::json!({"username": "taken", "password": "password123"});

    client
        .post(&format!("{}/api/auth/register", app.address))
        .json(&payload)
        .send()
        .await
        .expect("First register failed");

    // Act
    let response = client
        .post(&format!("{}/api/auth/register", app.address))
        .json(&payload)
        .send()
        .await
        .expect("Second register failed");

    // Assert
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    register_and_login(&client, &app.address, "careful_carl").await;

    // Act: wrong password
    let response = client
        .post(&format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({"username": "careful_carl", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 401);

    // Act: unknown user
    let response = client
        .post(&format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({"username": "nobody", "password": "password123"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn test_story_publish_flow() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let author_token = register_and_login(&client, &app.address, "writer").await;

    // 1. Author submits a story with mixed block types
    let response = client
        .post(&format!("{}/api/stories", app.address))
        .header("Authorization", format!("Bearer {}", author_token))
        .json(&serde_json::json!({
            "title": "Threaded comments in SQLite",
            "subtitle": "A practical walkthrough",
            "blocks": [
                {"block_type": "paragraph", "text_content": "It starts simple."},
                {"block_type": "youtube", "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"}
            ],
            "tags": ["Rust", "sqlite"]
        }))
        .send()
        .await
        .expect("Create story failed");
    assert_eq!(response.status().as_u16(), 201);
    let story_id = response.json::<serde_json::Value>().await.unwrap()["id"]
        .as_i64()
        .unwrap();

    // 2. While pending it is invisible to the public
    let listed: Vec<serde_json::Value> = client
        .get(&format!("{}/api/stories", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());

    let response = client
        .get(&format!("{}/api/stories/{}", app.address, story_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    // 3. The author still sees their own pending story
    let own: serde_json::Value = client
        .get(&format!("{}/api/stories/{}", app.address, story_id))
        .header("Authorization", format!("Bearer {}", author_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(own["approval_status"], "pending");

    // 4. It shows up in the admin review queue
    let admin_token = register_admin(&app, &client, "chief_editor").await;
    let queue: Vec<serde_json::Value> = client
        .get(&format!("{}/api/admin/stories", app.address))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["id"].as_i64(), Some(story_id));

    // 5. Approve it
    approve_story(&client, &app.address, &admin_token, story_id).await;

    // 6. Now the public list and detail both serve it
    let listed: Vec<serde_json::Value> = client
        .get(&format!("{}/api/stories", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Threaded comments in SQLite");
    assert_eq!(listed[0]["author_username"], "writer");
    assert_eq!(listed[0]["like_count"], 0);

    let detail: serde_json::Value = client
        .get(&format!("{}/api/stories/{}", app.address, story_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["approval_status"], "approved");
    let blocks = detail["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["block_type"], "paragraph");
    // The YouTube URL was reduced to its video id on the way in.
    assert_eq!(blocks[1]["youtube_video_id"], "dQw4w9WgXcQ");
    let tags: Vec<&str> = detail["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["rust", "sqlite"]);
}

#[tokio::test]
async fn test_comment_thread_flow() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let author_token = register_and_login(&client, &app.address, "writer").await;
    let reader_token = register_and_login(&client, &app.address, "reader").await;
    let admin_token = register_admin(&app, &client, "chief_editor").await;

    let story_id = create_story(&client, &app.address, &author_token, "Debated story").await;
    approve_story(&client, &app.address, &admin_token, story_id).await;

    let comments_url = format!("{}/api/stories/{}/comments", app.address, story_id);

    // 1. Anonymous visitors cannot comment
    let response = client
        .post(&comments_url)
        .json(&serde_json::json!({"body": "drive-by"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // 2. Build a three-level thread
    let root: serde_json::Value = client
        .post(&comments_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .json(&serde_json::json!({"body": "Great read"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["depth"], 0);
    let root_id = root["id"].as_i64().unwrap();

    let reply: serde_json::Value = client
        .post(&comments_url)
        .header("Authorization", format!("Bearer {}", author_token))
        .json(&serde_json::json!({"body": "Thanks!", "parent_id": root_id}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["depth"], 1);
    let reply_id = reply["id"].as_i64().unwrap();

    let leaf: serde_json::Value = client
        .post(&comments_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .json(&serde_json::json!({"body": "You're welcome", "parent_id": reply_id}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(leaf["depth"], 2);
    let leaf_id = leaf["id"].as_i64().unwrap();

    // 3. A fourth level is refused
    let response = client
        .post(&comments_url)
        .header("Authorization", format!("Bearer {}", author_token))
        .json(&serde_json::json!({"body": "One deeper", "parent_id": leaf_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let error: serde_json::Value = response.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("nested"));

    // 4. A second top-level comment for ordering checks
    client
        .post(&comments_url)
        .header("Authorization", format!("Bearer {}", author_token))
        .json(&serde_json::json!({"body": "Late arrival"}))
        .send()
        .await
        .unwrap();

    // 5. The tree comes back nested, oldest roots first
    let tree: serde_json::Value = client
        .get(&comments_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tree["count"], 4);
    let comments = tree["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"].as_i64(), Some(root_id));
    assert_eq!(comments[0]["username"], "reader");
    assert_eq!(comments[0]["replies"][0]["id"].as_i64(), Some(reply_id));
    assert_eq!(
        comments[0]["replies"][0]["replies"][0]["id"].as_i64(),
        Some(leaf_id)
    );
    assert_eq!(comments[1]["body"], "Late arrival");

    // 6. order=newest flips the roots
    let tree: serde_json::Value = client
        .get(&format!("{}?order=newest", comments_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let comments = tree["comments"].as_array().unwrap();
    assert_eq!(comments[0]["body"], "Late arrival");
    assert_eq!(comments[1]["id"].as_i64(), Some(root_id));

    // 7. The list endpoint reflects the comment count
    let listed: Vec<serde_json::Value> = client
        .get(&format!("{}/api/stories", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed[0]["comment_count"], 4);
}

#[tokio::test]
async fn test_comment_like_and_delete_flow() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let author_token = register_and_login(&client, &app.address, "writer").await;
    let reader_token = register_and_login(&client, &app.address, "reader").await;
    let admin_token = register_admin(&app, &client, "chief_editor").await;

    let story_id = create_story(&client, &app.address, &author_token, "Liked story").await;
    approve_story(&client, &app.address, &admin_token, story_id).await;

    let comments_url = format!("{}/api/stories/{}/comments", app.address, story_id);
    let comment: serde_json::Value = client
        .post(&comments_url)
        .header("Authorization", format!("Bearer {}", author_token))
        .json(&serde_json::json!({"body": "Opinions welcome"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let comment_id = comment["id"].as_i64().unwrap();
    let like_url = format!("{}/api/comments/{}/like", app.address, comment_id);

    // 1. Toggle on, toggle off
    let outcome: serde_json::Value = client
        .post(&like_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["liked"], true);
    assert_eq!(outcome["like_count"], 1);

    let outcome: serde_json::Value = client
        .post(&like_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["liked"], false);
    assert_eq!(outcome["like_count"], 0);

    // 2. Leave it liked and check the viewer flag in the tree
    client
        .post(&like_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap();

    let tree: serde_json::Value = client
        .get(&comments_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tree["comments"][0]["like_count"], 1);
    assert_eq!(tree["comments"][0]["liked_by_viewer"], true);

    let tree: serde_json::Value = client
        .get(&comments_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tree["comments"][0]["liked_by_viewer"], false);

    // 3. Only the author (or a moderator) may delete
    let delete_url = format!("{}/api/comments/{}", app.address, comment_id);
    let response = client
        .delete(&delete_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .delete(&delete_url)
        .header("Authorization", format!("Bearer {}", author_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let tree: serde_json::Value = client
        .get(&comments_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tree["count"], 0);
}

#[tokio::test]
async fn test_story_interactions_flow() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let author_token = register_and_login(&client, &app.address, "writer").await;
    let reader_token = register_and_login(&client, &app.address, "reader").await;
    let admin_token = register_admin(&app, &client, "chief_editor").await;

    let story_id = create_story(&client, &app.address, &author_token, "Reactions").await;
    approve_story(&client, &app.address, &admin_token, story_id).await;

    // 1. Like toggles on and off
    let like_url = format!("{}/api/stories/{}/like", app.address, story_id);
    let outcome: serde_json::Value = client
        .post(&like_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["liked"], true);
    assert_eq!(outcome["like_count"], 1);

    let outcome: serde_json::Value = client
        .post(&like_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["liked"], false);
    assert_eq!(outcome["like_count"], 0);

    // 2. Save sticks, and the detail page reports the viewer flags
    let save_url = format!("{}/api/stories/{}/save", app.address, story_id);
    let outcome: serde_json::Value = client
        .post(&save_url)
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["saved"], true);
    assert_eq!(outcome["save_count"], 1);

    let detail: serde_json::Value = client
        .get(&format!("{}/api/stories/{}", app.address, story_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["saved_by_viewer"], true);
    assert_eq!(detail["liked_by_viewer"], false);
    assert_eq!(detail["save_count"], 1);

    // 3. Unauthenticated toggles are refused
    let response = client.post(&like_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn media_upload_requires_an_image() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &app.address, "uploader").await;

    // Act: a text file dressed as an upload
    let part = reqwest::multipart::Part::bytes(b"not an image".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = client
        .post(&format!("{}/api/media", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let error: serde_json::Value = response.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("images"));
}

#[tokio::test]
async fn test_media_upload_flow() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &app.address, "uploader").await;

    // 1. Uploading without a token is refused
    let part = reqwest::multipart::Part::bytes(vec![0u8])
        .file_name("x.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);
    let response = client
        .post(&format!("{}/api/media", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // 2. A PNG goes through and lands under a generated name
    let png_bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    let part = reqwest::multipart::Part::bytes(png_bytes.clone())
        .file_name("pixel.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = client
        .post(&format!("{}/api/media", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Upload failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/media/"));
    assert!(url.ends_with(".png"));

    // 3. The stored file is served back byte for byte
    let served = client
        .get(&format!("{}{}", app.address, url))
        .send()
        .await
        .expect("Fetch failed");
    assert_eq!(served.status().as_u16(), 200);
    assert_eq!(served.bytes().await.unwrap().to_vec(), png_bytes);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let user_token = register_and_login(&client, &app.address, "plain_user").await;
    let admin_token = register_admin(&app, &client, "chief_editor").await;
    let url = format!("{}/api/admin/users", app.address);

    // No token
    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Authenticated but not admin
    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // Admin
    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let users: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn robots_txt_is_served() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/robots.txt", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("User-agent"));
}
