use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use lightscape::api::AppState;
use lightscape::clients::{InlineImage, ModelError, VisionModel};
use lightscape::config::Config;
use lightscape::state::SharedState;
use sea_orm::{ConnectionTrait, Statement};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BOUNDARY: &str = "lightscape-test-boundary";

/// Model double: answers with a fixed reply, or fails when none is set.
struct ScriptedModel {
    reply: Option<String>,
    instructions: Mutex<Vec<String>>,
    images: Mutex<Vec<InlineImage>>,
}

impl ScriptedModel {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            instructions: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            instructions: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
        })
    }

    fn last_instruction(&self) -> String {
        self.instructions
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("model was never called")
    }

    fn calls(&self) -> usize {
        self.instructions.lock().unwrap().len()
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, instruction: &str, image: &InlineImage) -> Result<String, ModelError> {
        self.instructions
            .lock()
            .unwrap()
            .push(instruction.to_string());
        self.images.lock().unwrap().push(image.clone());

        self.reply.clone().ok_or_else(|| ModelError::Status {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

async fn spawn_app(model: Arc<ScriptedModel>) -> (Arc<AppState>, Router, String) {
    let db_path =
        std::env::temp_dir().join(format!("lightscape-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.observability.metrics_enabled = false;
    config.server.secure_cookies = false;

    let shared = SharedState::with_vision_model(config, model)
        .await
        .expect("failed to create shared state");
    let state = lightscape::api::create_app_state(Arc::new(shared), None);

    let api_key = state
        .store()
        .get_user_by_username("admin")
        .await
        .expect("failed to fetch admin user")
        .expect("missing seeded admin user")
        .api_key;

    let router = lightscape::api::router(state.clone());
    (state, router, api_key)
}

fn multipart_body(image: Option<(&str, &str, &[u8])>, prompt: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(text) = prompt {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\n{text}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, mime, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn generate_request(api_key: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );

    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }

    builder.body(Body::from(body)).unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

const PHOTO: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

#[tokio::test]
async fn test_generate_requires_authentication() {
    let model = ScriptedModel::replying("unused");
    let (_, app, _) = spawn_app(model.clone()).await;

    let body = multipart_body(Some(("house.png", "image/png", PHOTO)), Some("warm"));
    let response = app
        .clone()
        .oneshot(generate_request(None, body.clone()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(!json["error"].as_str().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(generate_request(Some("wrong-key"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_generate_without_image_is_bad_request() {
    let model = ScriptedModel::replying("unused");
    let (_, app, api_key) = spawn_app(model.clone()).await;

    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(None, Some("just a prompt")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No image");

    // An empty file part counts as no image
    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(Some(("empty.png", "image/png", b"")), Some("p")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header("X-Api-Key", &api_key)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_generate_returns_full_text_and_records_summary() {
    let reply = "Install 2700K brass uplights under each window, then wash the facade with a soft grazing light.";
    let model = ScriptedModel::replying(reply);
    let (state, app, api_key) = spawn_app(model.clone()).await;

    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(Some(("house.png", "image/png", PHOTO)), Some("cozy evening")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["result"], reply);

    let image = model.images.lock().unwrap().last().cloned().unwrap();
    assert_eq!(image.mime_type, "image/png");
    {
        use base64::Engine as _;
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&image.data)
                .unwrap(),
            PHOTO
        );
    }

    let instruction = model.last_instruction();
    assert!(instruction.contains("User's Past Style: []"));
    assert!(instruction.contains("Current Request: cozy evening"));

    let rows = state.store().recent_history("admin", 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let prefix: String = reply.chars().take(50).collect();
    assert_eq!(
        rows[0].user_preferences,
        format!("Request: cozy evening -> Style used: {prefix}...")
    );
}

#[tokio::test]
async fn test_generate_uses_three_most_recent_own_records() {
    let model = ScriptedModel::replying("Soft path lights");
    let (state, app, api_key) = spawn_app(model.clone()).await;

    for pref in ["oldest", "second", "third", "newest"] {
        state.store().record_history("admin", pref).await.unwrap();
    }
    state
        .store()
        .record_history("someone-else", "not yours")
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(Some(("house.jpg", "image/jpeg", PHOTO)), Some("garden")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let instruction = model.last_instruction();
    assert!(instruction.contains("User's Past Style: [newest; third; second]"));
    assert!(!instruction.contains("oldest"));
    assert!(!instruction.contains("not yours"));

    assert_eq!(state.store().count_history("admin").await.unwrap(), 5);
    assert_eq!(state.store().count_history("someone-else").await.unwrap(), 1);
}

#[tokio::test]
async fn test_generate_succeeds_when_history_store_is_broken() {
    let model = ScriptedModel::replying("Moonlighting from the big oak");
    let (state, app, api_key) = spawn_app(model.clone()).await;

    state
        .store()
        .conn
        .execute_unprepared("DROP TABLE user_history")
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(Some(("house.png", "image/png", PHOTO)), Some("dramatic")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["result"], "Moonlighting from the big oak");

    assert!(model.last_instruction().contains("User's Past Style: []"));
}

#[tokio::test]
async fn test_summary_is_saved_when_only_history_lookup_fails() {
    let reply = "Backlight the hedge line and keep the porch at 2400K.";
    let model = ScriptedModel::replying(reply);
    let (state, app, api_key) = spawn_app(model.clone()).await;

    state
        .store()
        .record_history("admin", "earlier request")
        .await
        .unwrap();

    // Reads of user_history now raise an integer overflow, inserts reach the real table
    for sql in [
        "ALTER TABLE user_history RENAME TO user_history_data",
        "CREATE VIEW user_history AS SELECT id, user_id, \
         abs(-9223372036854775807 - 1) AS user_preferences, created_at FROM user_history_data",
        "CREATE TRIGGER user_history_insert INSTEAD OF INSERT ON user_history BEGIN \
         INSERT INTO user_history_data (user_id, user_preferences, created_at) \
         VALUES (NEW.user_id, NEW.user_preferences, NEW.created_at); END",
    ] {
        state.store().conn.execute_unprepared(sql).await.unwrap();
    }
    assert!(state.store().recent_preferences("admin", 3).await.is_err());

    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(Some(("house.png", "image/png", PHOTO)), Some("quiet garden")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["result"], reply);
    assert!(model.last_instruction().contains("User's Past Style: []"));

    let conn = &state.store().conn;
    let rows = conn
        .query_all(Statement::from_string(
            conn.get_database_backend(),
            "SELECT user_preferences FROM user_history_data WHERE user_id = 'admin' ORDER BY id DESC",
        ))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let prefix: String = reply.chars().take(50).collect();
    let saved: String = rows[0].try_get("", "user_preferences").unwrap();
    assert_eq!(
        saved,
        format!("Request: quiet garden -> Style used: {prefix}...")
    );
}

#[tokio::test]
async fn test_seeded_admin_key_is_unique_per_install() {
    let (_, app, first_key) = spawn_app(ScriptedModel::replying("unused")).await;
    let (_, _, second_key) = spawn_app(ScriptedModel::replying("unused")).await;

    assert_eq!(first_key.len(), 64);
    assert!(first_key.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first_key, second_key);

    // A key from another install does not authenticate here
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/history")
                .header("X-Api-Key", &second_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_model_failure_is_internal_error_without_history_write() {
    let model = ScriptedModel::failing();
    let (state, app, api_key) = spawn_app(model.clone()).await;

    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(Some(("house.png", "image/png", PHOTO)), Some("anything")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("model overloaded"));

    assert_eq!(model.calls(), 1);
    assert_eq!(state.store().count_history("admin").await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_prompt_is_empty_request() {
    let model = ScriptedModel::replying("Balanced ambient glow");
    let (state, app, api_key) = spawn_app(model.clone()).await;

    let response = app
        .clone()
        .oneshot(generate_request(
            Some(api_key.as_str()),
            multipart_body(Some(("house.webp", "image/webp", PHOTO)), None),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(model.last_instruction().contains("Current Request: \n"));
    let rows = state.store().recent_history("admin", 1).await.unwrap();
    assert_eq!(
        rows[0].user_preferences,
        "Request:  -> Style used: Balanced ambient glow..."
    );
}

#[tokio::test]
async fn test_bearer_token_and_history_listing() {
    let model = ScriptedModel::replying("Layered lighting");
    let (state, app, api_key) = spawn_app(model).await;

    state.store().record_history("admin", "first").await.unwrap();
    state.store().record_history("admin", "second").await.unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/history?limit=1")
                .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["entries"].as_array().unwrap().len(), 1);
    assert_eq!(json["entries"][0]["user_preferences"], "second");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/history?limit=0")
                .header("X-Api-Key", &api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let (_, app, _) = spawn_app(ScriptedModel::replying("unused")).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}
