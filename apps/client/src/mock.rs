//! In-process HTTP servers for exercising the client against canned routes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use jobmatch_core::models::api::{ProfileEnvelope, SignInRequest, SignOutRequest, SignUpRequest};
use jobmatch_core::models::UserProfile;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Serves `router` on an ephemeral port and returns the `/api` base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

#[derive(Debug, Default)]
pub(crate) struct FakeAuth {
    /// email → (password, profile)
    pub accounts: HashMap<String, (String, UserProfile)>,
    /// session id → email
    pub sessions: HashMap<String, String>,
    pub profile_updates: Vec<UserProfile>,
    pub signouts: usize,
    pub fail_profile_updates: bool,
}

pub(crate) type SharedAuth = Arc<Mutex<FakeAuth>>;

impl FakeAuth {
    pub fn with_account(email: &str, password: &str, profile: UserProfile) -> SharedAuth {
        let mut fake = FakeAuth::default();
        fake.accounts
            .insert(email.to_string(), (password.to_string(), profile));
        Arc::new(Mutex::new(fake))
    }
}

fn user_json(email: &str, profile: &UserProfile) -> Value {
    json!({ "id": Uuid::nil(), "email": email, "profile": profile })
}

fn failure(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn new_session(fake: &mut FakeAuth, email: &str) -> String {
    let id = format!("session-{}", fake.sessions.len() + 1);
    fake.sessions.insert(id.clone(), email.to_string());
    id
}

fn session_email(fake: &FakeAuth, headers: &HeaderMap) -> Option<String> {
    let id = headers.get("x-session-id")?.to_str().ok()?;
    fake.sessions.get(id).cloned()
}

async fn signup(State(state): State<SharedAuth>, Json(req): Json<SignUpRequest>) -> Response {
    let mut fake = state.lock().unwrap();
    if fake.accounts.contains_key(&req.email) {
        return failure(StatusCode::CONFLICT, "An account with this email already exists");
    }
    let profile = req.profile.unwrap_or_default();
    fake.accounts
        .insert(req.email.clone(), (req.password, profile.clone()));
    let session_id = new_session(&mut fake, &req.email);
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "sessionId": session_id, "user": user_json(&req.email, &profile) }
        })),
    )
        .into_response()
}

async fn signin(State(state): State<SharedAuth>, Json(req): Json<SignInRequest>) -> Response {
    let mut fake = state.lock().unwrap();
    let profile = match fake.accounts.get(&req.email) {
        Some((password, profile)) if *password == req.password => profile.clone(),
        _ => return failure(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };
    let session_id = new_session(&mut fake, &req.email);
    Json(json!({
        "success": true,
        "data": { "sessionId": session_id, "user": user_json(&req.email, &profile) }
    }))
    .into_response()
}

async fn signout(State(state): State<SharedAuth>, Json(req): Json<SignOutRequest>) -> Response {
    let mut fake = state.lock().unwrap();
    fake.sessions.remove(&req.session_id);
    fake.signouts += 1;
    Json(json!({ "success": true, "message": "Signed out" })).into_response()
}

async fn me(State(state): State<SharedAuth>, headers: HeaderMap) -> Response {
    let fake = state.lock().unwrap();
    let Some(email) = session_email(&fake, &headers) else {
        return failure(StatusCode::UNAUTHORIZED, "Authentication required");
    };
    let profile = fake.accounts[&email].1.clone();
    Json(json!({ "success": true, "data": user_json(&email, &profile) })).into_response()
}

async fn profile(
    State(state): State<SharedAuth>,
    headers: HeaderMap,
    Json(req): Json<ProfileEnvelope>,
) -> Response {
    let mut fake = state.lock().unwrap();
    if fake.fail_profile_updates {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
    }
    let Some(email) = session_email(&fake, &headers) else {
        return failure(StatusCode::UNAUTHORIZED, "Authentication required");
    };
    fake.profile_updates.push(req.profile.clone());
    if let Some(account) = fake.accounts.get_mut(&email) {
        account.1 = req.profile.clone();
    }
    Json(json!({ "success": true, "data": user_json(&email, &req.profile) })).into_response()
}

/// The `/api/auth/*` routes backed by an in-memory account table.
pub(crate) fn auth_routes(state: SharedAuth) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
        .route("/api/auth/signout", post(signout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/profile", put(profile))
        .with_state(state)
}
