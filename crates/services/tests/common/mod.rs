//! In-process stand-in for the LAPGEST-PRO API.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use services::{ApiClient, ApiConfig, ApiContext, QueryCache};
use url::Url;

pub const SESSION_COOKIE: &str = "connect.sid=s%3Alapgest";

#[derive(Clone, Default)]
pub struct MockState {
    hits: Arc<Mutex<HashMap<String, usize>>>,
    lapins: Arc<Mutex<Vec<Value>>>,
    absences: Arc<Mutex<Vec<Value>>>,
    fail_writes: Arc<AtomicBool>,
    ack_writes: Arc<AtomicBool>,
}

impl MockState {
    fn hit(&self, route: &str) {
        *self.hits.lock().unwrap().entry(route.to_string()).or_default() += 1;
    }

    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes lapin updates answer `200 {"message":"ok"}` instead of the record.
    pub fn ack_writes(&self, ack: bool) {
        self.ack_writes.store(ack, Ordering::SeqCst);
    }

    fn writes_fail(&self) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
    }
}

pub struct MockApi {
    pub addr: SocketAddr,
    pub state: MockState,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = MockState::default();
        *state.lapins.lock().unwrap() = vec![
            lapin(1, "L-001", "male", None, None),
            lapin(2, "L-002", "femelle", None, None),
            lapin(3, "L-003", "femelle", Some(1), Some(2)),
        ];
        *state.absences.lock().unwrap() = vec![absence(1, 4, "en_attente")];

        let app = Router::new()
            .route("/api/login", get(login))
            .route("/api/auth/user", get(session_user))
            .route("/api/lapins", get(list_lapins).post(create_lapin))
            .route("/api/lapins/{id}", get(get_lapin).put(update_lapin).delete(delete_lapin))
            .route("/api/lapins/{id}/genealogy", get(genealogy))
            .route("/api/enclos", get(list_enclos))
            .route("/api/employes/planning", get(planning))
            .route(
                "/api/employes/absences",
                get(list_absences).post(create_absence),
            )
            .route("/api/employes/absences/{id}", axum::routing::put(update_absence))
            .route("/api/errors/plain", get(plain_error))
            .route("/api/errors/empty", get(empty_error))
            .route("/api/no-content", axum::routing::delete(no_content))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

        Self { addr, state }
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("mock url")
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(ApiConfig::new(self.base_url())).expect("api client")
    }

    pub fn context(&self) -> ApiContext {
        ApiContext::new(self.client(), QueryCache::new())
    }
}

pub fn lapin(
    id: i32,
    identifiant: &str,
    sexe: &str,
    pere_id: Option<i32>,
    mere_id: Option<i32>,
) -> Value {
    json!({
        "id": id,
        "identifiant": identifiant,
        "nom": null,
        "race": "Néo-Zélandais",
        "sexe": sexe,
        "dateNaissance": "2024-01-15",
        "poids": 3.2,
        "statut": "reproducteur",
        "enclosId": null,
        "pereId": pere_id,
        "mereId": mere_id,
        "notes": null,
        "createdAt": null
    })
}

fn absence(id: i32, employe_id: i32, statut: &str) -> Value {
    json!({
        "id": id,
        "employeId": employe_id,
        "dateDebut": "2025-06-02",
        "dateFin": "2025-06-04",
        "motif": "congé",
        "statut": statut,
        "notes": null
    })
}

async fn login(State(state): State<MockState>) -> Response {
    state.hit("GET /api/login");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

async fn session_user(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.hit("GET /api/auth/user");
    let has_session = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains(SESSION_COOKIE));

    if has_session {
        Json(json!({
            "id": "user-1",
            "email": "eleveur@ferme.fr",
            "firstName": "Jeanne",
            "lastName": "Martin",
            "profileImageUrl": null
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
    }
}

async fn list_lapins(State(state): State<MockState>) -> Json<Value> {
    state.hit("GET /api/lapins");
    Json(Value::Array(state.lapins.lock().unwrap().clone()))
}

async fn get_lapin(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    state.hit("GET /api/lapins/{id}");
    let found = state
        .lapins
        .lock()
        .unwrap()
        .iter()
        .find(|l| l["id"] == json!(id))
        .cloned();
    match found {
        Some(lapin) => Json(lapin).into_response(),
        None => (StatusCode::NOT_FOUND, "Lapin introuvable").into_response(),
    }
}

async fn create_lapin(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.hit("POST /api/lapins");
    if state.writes_fail() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Erreur base de données").into_response();
    }
    let mut lapins = state.lapins.lock().unwrap();
    let id = lapins.len() as i32 + 1;
    let mut created = lapin(id, "", "male", None, None);
    if let (Some(target), Some(source)) = (created.as_object_mut(), body.as_object()) {
        for (k, v) in source {
            target.insert(k.clone(), v.clone());
        }
    }
    lapins.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_lapin(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.hit("PUT /api/lapins/{id}");
    if state.writes_fail() {
        return (StatusCode::BAD_REQUEST, "Statut invalide").into_response();
    }
    let mut lapins = state.lapins.lock().unwrap();
    let Some(lapin) = lapins.iter_mut().find(|l| l["id"] == json!(id)) else {
        return (StatusCode::NOT_FOUND, "Lapin introuvable").into_response();
    };
    if let (Some(target), Some(source)) = (lapin.as_object_mut(), body.as_object()) {
        for (k, v) in source {
            target.insert(k.clone(), v.clone());
        }
    }
    if state.ack_writes.load(Ordering::SeqCst) {
        return Json(json!({ "message": "ok" })).into_response();
    }
    Json(lapin.clone()).into_response()
}

async fn delete_lapin(State(state): State<MockState>, Path(id): Path<i64>) -> StatusCode {
    state.hit("DELETE /api/lapins/{id}");
    state.lapins.lock().unwrap().retain(|l| l["id"] != json!(id));
    StatusCode::NO_CONTENT
}

async fn genealogy(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    state.hit("GET /api/lapins/{id}/genealogy");
    let lapins = state.lapins.lock().unwrap().clone();
    let by_id = |id: &Value| lapins.iter().find(|l| &l["id"] == id).cloned();
    let Some(lapin) = by_id(&json!(id)) else {
        return (StatusCode::NOT_FOUND, "").into_response();
    };
    let descendants: Vec<Value> = lapins
        .iter()
        .filter(|l| l["pereId"] == json!(id) || l["mereId"] == json!(id))
        .cloned()
        .collect();
    Json(json!({
        "lapin": lapin,
        "pere": by_id(&lapin["pereId"]),
        "mere": by_id(&lapin["mereId"]),
        "descendants": descendants,
    }))
    .into_response()
}

async fn list_enclos(State(state): State<MockState>) -> Json<Value> {
    state.hit("GET /api/enclos");
    Json(json!([
        {
            "id": 1,
            "nom": "Maternité A",
            "typeEnclos": "maternite",
            "capacite": 4,
            "occupation": 2,
            "batiment": "Bâtiment nord",
            "notes": null
        }
    ]))
}

async fn planning(State(state): State<MockState>) -> Json<Value> {
    state.hit("GET /api/employes/planning");
    Json(json!([
        {
            "id": 1,
            "employeId": 4,
            "date": "2025-06-02",
            "heureDebut": "08:00:00",
            "heureFin": "12:00:00",
            "tache": "nourrissage",
            "notes": null
        },
        {
            "id": 2,
            "employeId": 5,
            "date": "2025-06-03",
            "heureDebut": "13:00:00",
            "heureFin": "17:00:00",
            "tache": "nettoyage des cages",
            "notes": null
        }
    ]))
}

async fn list_absences(State(state): State<MockState>) -> Json<Value> {
    state.hit("GET /api/employes/absences");
    Json(Value::Array(state.absences.lock().unwrap().clone()))
}

async fn create_absence(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.hit("POST /api/employes/absences");
    if state.writes_fail() {
        return (StatusCode::CONFLICT, "Absence déjà déclarée").into_response();
    }
    let mut absences = state.absences.lock().unwrap();
    let mut created = body;
    created["id"] = json!(absences.len() + 1);
    absences.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_absence(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.hit("PUT /api/employes/absences/{id}");
    let mut absences = state.absences.lock().unwrap();
    let Some(absence) = absences.iter_mut().find(|a| a["id"] == json!(id)) else {
        return (StatusCode::NOT_FOUND, "Absence introuvable").into_response();
    };
    if let Some(statut) = body.get("statut") {
        absence["statut"] = statut.clone();
    }
    Json(absence.clone()).into_response()
}

async fn plain_error() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Date de naissance invalide")
}

async fn empty_error() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
