//! Integration tests for the onboarding controller against a real HTTP backend.
//!
//! Each test spins up an Axum server on a random port that mimics the
//! onboarding API, and drives the controller through the reqwest client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::timeout;

use profile_onboarding::api::{HttpOnboardingApi, IdentityFetcher, OnboardingApi};
use profile_onboarding::config::OnboardingConfig;
use profile_onboarding::error::SubmitError;
use profile_onboarding::notify::{NotificationKind, Notifier, ToastQueue};
use profile_onboarding::onboarding::submission::{SUBMIT_FALLBACK_MESSAGE, SUBMIT_SUCCESS_MESSAGE};
use profile_onboarding::onboarding::{
    DEFAULT_AVATAR, IdentityQuery, OnboardingController, ProfileDraft, ProfileField, QueryCache,
    SubmissionStatus,
};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// In-memory stand-in for the onboarding backend.
#[derive(Clone, Default)]
struct Backend {
    user: Arc<Mutex<Option<Value>>>,
    submissions: Arc<Mutex<Vec<Value>>>,
    fail_plain: Arc<AtomicBool>,
}

async fn me(State(backend): State<Backend>) -> Json<Value> {
    let user = backend.user.lock().unwrap().clone();
    Json(json!({ "user": user }))
}

async fn onboarding(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.submissions.lock().unwrap().push(body.clone());

    if backend.fail_plain.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    let name = body["fullName"].as_str().unwrap_or_default();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Name required" })),
        )
            .into_response();
    }

    let mut user = body.clone();
    user["isOnboarded"] = json!(true);
    *backend.user.lock().unwrap() = Some(user);
    Json(json!({ "success": true })).into_response()
}

/// Start the fake backend on a random port, return (config, backend).
async fn start_server(initial_user: Option<Value>) -> (OnboardingConfig, Backend) {
    let backend = Backend::default();
    *backend.user.lock().unwrap() = initial_user;

    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/onboarding", post(onboarding))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = OnboardingConfig {
        api_base_url: format!("http://127.0.0.1:{port}/api"),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    (config, backend)
}

/// Wire a controller to the HTTP API the way the binary does.
async fn mount(config: &OnboardingConfig) -> (OnboardingController, IdentityQuery, Arc<ToastQueue>) {
    let api = Arc::new(HttpOnboardingApi::new(config).unwrap());
    let identity = IdentityQuery::new(config.identity_query_key.clone(), api.clone());
    identity.refetch().await.unwrap();

    let toasts = Arc::new(ToastQueue::new());
    let identity_rx = identity.subscribe();
    let controller = OnboardingController::new(
        config,
        &identity_rx,
        api,
        Arc::new(identity.clone()) as Arc<dyn QueryCache>,
        Arc::clone(&toasts) as Arc<dyn Notifier>,
    );
    controller.start_identity_sync(identity_rx);
    (controller, identity, toasts)
}

#[tokio::test]
async fn draft_is_seeded_from_current_user() {
    timeout(TEST_TIMEOUT, async {
        let (config, _backend) = start_server(Some(json!({
            "_id": "u1",
            "fullName": "Ada",
            "email": "ada@example.com",
            "profilePic": ""
        })))
        .await;

        let (controller, _identity, _toasts) = mount(&config).await;

        let draft = controller.draft();
        assert_eq!(draft.full_name, "Ada");
        assert_eq!(draft.bio, "");
        assert_eq!(draft.profile_pic, DEFAULT_AVATAR);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn successful_submission_refetches_identity() {
    timeout(TEST_TIMEOUT, async {
        let (config, backend) = start_server(Some(json!({ "fullName": "" }))).await;
        let (controller, identity, toasts) = mount(&config).await;
        let mut identity_rx = identity.subscribe();

        controller.set_field(ProfileField::FullName, "Ada");
        controller.set_field(ProfileField::NativeLanguage, "english");
        controller.set_field(ProfileField::LearningLanguage, "french");
        controller.set_field(ProfileField::Location, "Paris");

        assert_eq!(controller.submit().await, SubmissionStatus::Succeeded);

        let submitted = backend.submissions.lock().unwrap().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0]["fullName"], "Ada");
        assert_eq!(submitted[0]["learningLanguage"], "french");
        assert_eq!(submitted[0]["profilePic"], DEFAULT_AVATAR);

        let toasts = toasts.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Success);
        assert_eq!(toasts[0].message, SUBMIT_SUCCESS_MESSAGE);

        // Invalidation refetches the now-onboarded user.
        identity_rx
            .wait_for(|user| {
                user.as_ref()
                    .and_then(|u| u.full_name.as_deref())
                    .is_some_and(|name| name == "Ada")
            })
            .await
            .unwrap();
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rejection_surfaces_server_message() {
    timeout(TEST_TIMEOUT, async {
        let (config, backend) = start_server(None).await;
        let (controller, _identity, toasts) = mount(&config).await;

        assert_eq!(controller.submit().await, SubmissionStatus::Failed);

        let state = controller.submission_state();
        assert_eq!(state.error_message.as_deref(), Some("Name required"));
        let toasts = toasts.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Error);
        assert_eq!(toasts[0].message, "Name required");

        // Manual retry after fixing the draft.
        controller.set_field(ProfileField::FullName, "Ada");
        assert_eq!(controller.submit().await, SubmissionStatus::Succeeded);
        assert_eq!(backend.submissions.lock().unwrap().len(), 2);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn non_json_rejection_uses_fallback_message() {
    timeout(TEST_TIMEOUT, async {
        let (config, backend) = start_server(None).await;
        backend.fail_plain.store(true, Ordering::SeqCst);
        let (controller, _identity, toasts) = mount(&config).await;
        controller.set_field(ProfileField::FullName, "Ada");

        assert_eq!(controller.submit().await, SubmissionStatus::Failed);
        assert_eq!(toasts.drain()[0].message, SUBMIT_FALLBACK_MESSAGE);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_backend_is_a_submission_failure() {
    timeout(TEST_TIMEOUT, async {
        // Bind then drop to get a port nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = OnboardingConfig {
            api_base_url: format!("http://127.0.0.1:{port}/api"),
            request_timeout: Duration::from_secs(1),
            ..Default::default()
        };
        let api = Arc::new(HttpOnboardingApi::new(&config).unwrap());
        assert!(api.current_user().await.is_err());

        let identity = IdentityQuery::new("authUser", api.clone());
        let toasts = Arc::new(ToastQueue::new());
        let controller = OnboardingController::new(
            &config,
            &identity.subscribe(),
            api,
            Arc::new(identity.clone()) as Arc<dyn QueryCache>,
            Arc::clone(&toasts) as Arc<dyn Notifier>,
        );

        assert_eq!(controller.submit().await, SubmissionStatus::Failed);
        assert_eq!(toasts.drain()[0].message, SUBMIT_FALLBACK_MESSAGE);
        assert!(!controller.is_pending());
    })
    .await
    .expect("test timed out");
}

/// Accept one request, then answer with a rejection whose body is cut short.
async fn start_truncating_server() -> OnboardingConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        let body_start = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let headers = String::from_utf8_lossy(&request[..body_start]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while request.len() < body_start + content_length {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        socket
            .write_all(
                b"HTTP/1.1 400 Bad Request\r\n\
                  Content-Type: application/json\r\n\
                  Content-Length: 100\r\n\r\n{",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    OnboardingConfig {
        api_base_url: format!("http://127.0.0.1:{port}/api"),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    }
}

#[tokio::test]
async fn truncated_rejection_body_is_an_invalid_response() {
    timeout(TEST_TIMEOUT, async {
        let config = start_truncating_server().await;
        let api = HttpOnboardingApi::new(&config).unwrap();

        let draft = ProfileDraft {
            full_name: "Ada".into(),
            ..Default::default()
        };
        let err = api.complete_onboarding(&draft).await.unwrap_err();

        assert!(
            matches!(err, SubmitError::InvalidResponse { .. }),
            "unexpected error: {err:?}"
        );
        assert_eq!(err.payload_message(), None);
    })
    .await
    .expect("test timed out");
}
