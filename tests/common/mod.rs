//! In-process stub of the profile service.
//!
//! Mirrors the service's routes and response shapes, records every call and
//! can be told to fail a given endpoint.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use know_your_fan::domain::{
    DocumentFile, DocumentUploadResponse, EsportsLinksResponse, Profile, ProfileFormData,
    SocialLinksResponse, UpsertProfileResponse,
};
use know_your_fan::services::{LinkOpener, ProfileApi};
use know_your_fan::{ApiClient, ClientError, FanSignal, FormStore, ProfileWorkflows};

pub const TIMESTAMP: &str = "2025-04-30T18:21:04.513370Z";
pub const CHAT_URL: &str = "https://chat.example.com/furia";
pub const CHAT_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

#[derive(Default)]
struct StubState {
    calls: Vec<RecordedCall>,
    profiles: HashMap<String, Value>,
    failures: HashMap<&'static str, (StatusCode, Value)>,
    next_id: i64,
}

type Shared = Arc<Mutex<StubState>>;
type Reply = (StatusCode, Json<Value>);

pub struct StubApi {
    pub base_url: String,
    state: Shared,
}

impl StubApi {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::default();

        let app = Router::new()
            .route("/api/profile", post(upsert_profile))
            .route("/api/profile/:cpf", get(get_profile))
            .route("/api/profile/:cpf/upload_document", post(upload_document))
            .route("/api/profile/:cpf/link_social", post(link_social))
            .route("/api/profile/:cpf/link_esports", post(link_esports))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    /// Store a profile record, filling every column the service returns.
    pub fn insert_profile(&self, fields: Value) {
        let mut state = self.state.lock();
        state.next_id += 1;
        let mut profile = blank_profile(state.next_id, fields["cpf"].as_str().unwrap());
        merge(&mut profile, &fields);
        let cpf = profile["cpf"].as_str().unwrap().to_string();
        state.profiles.insert(cpf, profile);
    }

    pub fn profile(&self, cpf: &str) -> Option<Value> {
        self.state.lock().profiles.get(cpf).cloned()
    }

    /// Make an endpoint (`upsert_profile`, `get_profile`, `upload_document`,
    /// `link_social`, `link_esports`) answer with the given status and body.
    pub fn fail(&self, endpoint: &'static str, status: StatusCode, body: Value) {
        self.state.lock().failures.insert(endpoint, (status, body));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }
}

fn blank_profile(id: i64, cpf: &str) -> Value {
    json!({
        "id": id,
        "cpf": cpf,
        "full_name": null,
        "address": null,
        "interests": null,
        "activities_last_year": null,
        "events_last_year": null,
        "purchases_last_year": null,
        "document_path": null,
        "document_validated": false,
        "social_media_links": null,
        "esports_profile_links": null,
        "esports_links_validated": false,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

fn merge(target: &mut Value, fields: &Value) {
    if let (Some(target), Some(fields)) = (target.as_object_mut(), fields.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn record(state: &mut StubState, method: &'static str, path: String, body: Value) {
    state.calls.push(RecordedCall { method, path, body });
}

fn injected_failure(state: &StubState, endpoint: &str) -> Option<Reply> {
    state
        .failures
        .get(endpoint)
        .map(|(status, body)| (*status, Json(body.clone())))
}

fn not_found() -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Perfil não encontrado." })),
    )
}

async fn upsert_profile(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = state.lock();
    record(&mut state, "POST", "/api/profile".to_string(), body.clone());
    if let Some(reply) = injected_failure(&state, "upsert_profile") {
        return reply;
    }

    let Some(cpf) = body["cpf"].as_str().filter(|cpf| !cpf.is_empty()).map(String::from) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "CPF é obrigatório." })),
        );
    };

    let message = if state.profiles.contains_key(&cpf) {
        "Perfil atualizado com sucesso."
    } else {
        state.next_id += 1;
        let profile = blank_profile(state.next_id, &cpf);
        state.profiles.insert(cpf.clone(), profile);
        "Perfil criado com sucesso."
    };

    let profile = state.profiles.get_mut(&cpf).unwrap();
    merge(profile, &body);

    (
        StatusCode::OK,
        Json(json!({ "message": message, "profile": profile.clone() })),
    )
}

async fn get_profile(State(state): State<Shared>, Path(cpf): Path<String>) -> Reply {
    let mut state = state.lock();
    record(&mut state, "GET", format!("/api/profile/{}", cpf), Value::Null);
    if let Some(reply) = injected_failure(&state, "get_profile") {
        return reply;
    }

    match state.profiles.get(&cpf) {
        Some(profile) => (StatusCode::OK, Json(profile.clone())),
        None => not_found(),
    }
}

async fn upload_document(
    State(state): State<Shared>,
    Path(cpf): Path<String>,
    mut multipart: Multipart,
) -> Reply {
    let mut uploaded = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        uploaded.push(json!({
            "field": name,
            "file_name": file_name,
            "content_type": content_type,
            "size": size
        }));
    }

    let mut state = state.lock();
    record(
        &mut state,
        "POST",
        format!("/api/profile/{}/upload_document", cpf),
        Value::Array(uploaded.clone()),
    );
    if let Some(reply) = injected_failure(&state, "upload_document") {
        return reply;
    }

    let Some(profile) = state.profiles.get_mut(&cpf) else {
        return not_found();
    };
    let Some(file_name) = uploaded
        .iter()
        .find(|f| f["field"] == "document")
        .and_then(|f| f["file_name"].as_str())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Nenhum arquivo enviado." })),
        );
    };

    let file_path = format!("uploads/{}_{}", cpf, file_name);
    merge(
        profile,
        &json!({ "document_path": file_path.clone(), "document_validated": true }),
    );

    (
        StatusCode::OK,
        Json(json!({
            "message": "Documento enviado e validado (placeholder).",
            "file_path": file_path,
            "validated": true
        })),
    )
}

async fn link_social(
    State(state): State<Shared>,
    Path(cpf): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock();
    record(
        &mut state,
        "POST",
        format!("/api/profile/{}/link_social", cpf),
        body.clone(),
    );
    if let Some(reply) = injected_failure(&state, "link_social") {
        return reply;
    }

    let Some(profile) = state.profiles.get_mut(&cpf) else {
        return not_found();
    };
    merge(
        profile,
        &json!({ "social_media_links": body.to_string() }),
    );

    (
        StatusCode::OK,
        Json(json!({
            "message": "Links de redes sociais atualizados.",
            "profile": profile.clone()
        })),
    )
}

async fn link_esports(
    State(state): State<Shared>,
    Path(cpf): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock();
    record(
        &mut state,
        "POST",
        format!("/api/profile/{}/link_esports", cpf),
        body.clone(),
    );
    if let Some(reply) = injected_failure(&state, "link_esports") {
        return reply;
    }

    let Some(profile) = state.profiles.get_mut(&cpf) else {
        return not_found();
    };

    let validation_results: serde_json::Map<String, Value> = body
        .as_object()
        .map(|links| links.keys().map(|k| (k.clone(), Value::Bool(true))).collect())
        .unwrap_or_default();

    merge(
        profile,
        &json!({
            "esports_profile_links": body.to_string(),
            "esports_links_validated": true
        }),
    );

    (
        StatusCode::OK,
        Json(json!({
            "message": "Links eSports atualizados e validados (placeholder).",
            "validation_results": validation_results,
            "profile": profile.clone()
        })),
    )
}

/// Opener that only remembers what it was asked to open.
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl LinkOpener for RecordingOpener {
    async fn open(&self, url: &str) -> anyhow::Result<()> {
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub stub: StubApi,
    pub opener: Arc<RecordingOpener>,
    pub store: FormStore,
    pub workflows: ProfileWorkflows,
}

/// Runs before a call is forwarded to the stub service.
pub type Hook = Box<dyn Fn(&FormStore) + Send + Sync>;

/// Forwards to the stub service, with hooks that act on the form while a
/// call is in flight.
pub struct HookedApi {
    inner: ApiClient,
    store: FormStore,
    before_upsert: Option<Hook>,
    before_get: Option<Hook>,
    /// Signalled when `upsert_profile` is entered
    pub upsert_entered: Arc<Notify>,
    /// When set, `upsert_profile` waits for it before forwarding
    pub upsert_release: Option<Arc<Notify>>,
}

impl HookedApi {
    pub fn new(stub: &StubApi, store: &FormStore) -> Self {
        Self {
            inner: stub.client(),
            store: store.clone(),
            before_upsert: None,
            before_get: None,
            upsert_entered: Arc::new(Notify::new()),
            upsert_release: None,
        }
    }

    pub fn before_upsert(mut self, hook: impl Fn(&FormStore) + Send + Sync + 'static) -> Self {
        self.before_upsert = Some(Box::new(hook));
        self
    }

    pub fn before_get(mut self, hook: impl Fn(&FormStore) + Send + Sync + 'static) -> Self {
        self.before_get = Some(Box::new(hook));
        self
    }

    pub fn hold_upsert(mut self, release: Arc<Notify>) -> Self {
        self.upsert_release = Some(release);
        self
    }
}

#[async_trait]
impl ProfileApi for HookedApi {
    async fn upsert_profile(
        &self,
        data: &ProfileFormData,
    ) -> Result<UpsertProfileResponse, ClientError> {
        self.upsert_entered.notify_one();
        if let Some(release) = &self.upsert_release {
            release.notified().await;
        }
        if let Some(hook) = &self.before_upsert {
            hook(&self.store);
        }
        self.inner.upsert_profile(data).await
    }

    async fn upload_document(
        &self,
        cpf: &str,
        document: &DocumentFile,
    ) -> Result<DocumentUploadResponse, ClientError> {
        self.inner.upload_document(cpf, document).await
    }

    async fn save_social_links(
        &self,
        cpf: &str,
        links: &BTreeMap<String, String>,
    ) -> Result<SocialLinksResponse, ClientError> {
        self.inner.save_social_links(cpf, links).await
    }

    async fn save_esports_links(
        &self,
        cpf: &str,
        links: &BTreeMap<String, String>,
    ) -> Result<EsportsLinksResponse, ClientError> {
        self.inner.save_esports_links(cpf, links).await
    }

    async fn get_profile(&self, cpf: &str) -> Result<Profile, ClientError> {
        if let Some(hook) = &self.before_get {
            hook(&self.store);
        }
        self.inner.get_profile(cpf).await
    }
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_api(|stub, _| Arc::new(stub.client())).await
    }

    /// Harness whose workflows talk to the API built by `api`.
    pub async fn with_api(
        api: impl FnOnce(&StubApi, &FormStore) -> Arc<dyn ProfileApi>,
    ) -> Self {
        let stub = StubApi::spawn().await;
        let opener = Arc::new(RecordingOpener::default());
        let signal = FanSignal::new("furia", CHAT_URL, CHAT_DELAY, opener.clone());
        let store = FormStore::new();
        let workflows = ProfileWorkflows::new(store.clone(), api(&stub, &store), signal);

        Self {
            stub,
            opener,
            store,
            workflows,
        }
    }
}
