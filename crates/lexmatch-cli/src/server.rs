//! HTTP surface: routes, JSON shapes, and error mapping.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use lexmatch_ai::{MatchError, Matcher};
use lexmatch_core::{
    Advocate, CaseDescription, MatchAccuracy, MatchResult, MatchType, ValidationError,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "Advocate Assignment AI";
const USAGE: &str =
    "POST /match-advocate with { description: '...' } to get advocate recommendations.";

/// Shared handler state. Cloned per request; the matcher is process-scoped.
#[derive(Clone)]
pub struct AppState {
    matcher: Arc<Matcher>,
}

impl AppState {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            matcher: Arc::new(matcher),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(usage))
        .route("/match-advocate", post(match_advocate))
        .route("/advocates", get(list_advocates))
        .route("/random-advocate", get(random_advocate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "server running");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

// ── Request / response shapes ──

#[derive(Deserialize)]
struct MatchRequest {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Serialize)]
struct UsageResponse {
    message: String,
    usage: String,
}

#[derive(Serialize)]
struct AdvocateList {
    total: usize,
    advocates: Vec<Advocate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RandomAdvocate {
    #[serde(flatten)]
    advocate: Advocate,
    match_type: MatchType,
    match_accuracy: MatchAccuracy,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

// ── Errors ──

#[derive(Debug)]
enum ApiError {
    Validation(ValidationError),
    Match(MatchError),
    NotFound(&'static str),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        ApiError::Match(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Match(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

// ── Handlers ──

async fn usage() -> Json<UsageResponse> {
    Json(UsageResponse {
        message: SERVICE_NAME.to_string(),
        usage: USAGE.to_string(),
    })
}

async fn match_advocate(
    State(state): State<AppState>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResult>, ApiError> {
    // An unreadable body is treated the same as a missing description.
    let description = match body {
        Ok(Json(req)) => req.description.unwrap_or_default(),
        Err(rejection) => {
            warn!(error = %rejection, "unreadable match request body");
            String::new()
        }
    };
    let case = CaseDescription::new(description)?;

    info!("starting advocate matching process");
    let result = state
        .matcher
        .find_best_advocate(&case)
        .await
        .inspect_err(|err| error!(error = %err, "advocate matching failed"))?;
    info!("advocate matching process completed");
    Ok(Json(result))
}

async fn list_advocates(State(state): State<AppState>) -> Json<AdvocateList> {
    let advocates = state.matcher.repository().list_all().await;
    Json(AdvocateList {
        total: advocates.len(),
        advocates,
    })
}

async fn random_advocate(State(state): State<AppState>) -> Result<Json<RandomAdvocate>, ApiError> {
    let advocate = state
        .matcher
        .repository()
        .pick_random()
        .await
        .ok_or(ApiError::NotFound("No advocates found"))?;
    Ok(Json(RandomAdvocate {
        advocate,
        match_type: MatchType::RandomSelection,
        match_accuracy: MatchAccuracy::ORACLE_UNAVAILABLE,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use lexmatch_ai::{OracleError, ScoringOracle};
    use lexmatch_store::{AdvocateRepository, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct FixedOracle {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ScoringOracle for FixedOracle {
        async fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| OracleError::Other("quota exceeded".into()))
        }
    }

    fn advocate(sl_no: i64, name: &str) -> Advocate {
        Advocate {
            sl_no,
            name: name.into(),
            age: 40,
            short_description: "Practising advocate".into(),
            skills: "Contract Law".into(),
            experience: 12,
            gender: "Female".into(),
            rating: 8.0,
            email: format!("{}@example.com", sl_no),
        }
    }

    fn pool() -> Vec<Advocate> {
        vec![
            advocate(1, "Asha Rao"),
            advocate(2, "Vikram Shah"),
            advocate(3, "Meera Iyer"),
        ]
    }

    fn app_with(advocates: Vec<Advocate>, oracle: Arc<FixedOracle>) -> Router {
        let repo = AdvocateRepository::new(Arc::new(MemoryStore::new(advocates)));
        router(AppState::new(Matcher::new(repo, oracle)))
    }

    fn oracle(reply: Option<&'static str>) -> Arc<FixedOracle> {
        Arc::new(FixedOracle {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn post_match(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/match-advocate")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn root_describes_usage() {
        let resp = app_with(pool(), oracle(None)).oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json(resp).await;
        assert_eq!(body["message"], "Advocate Assignment AI");
        assert_eq!(body["usage"], USAGE);
    }

    #[tokio::test]
    async fn short_description_is_rejected_before_matching() {
        let oracle = oracle(Some("Match Quality: 9/10\nAsha Rao - contracts"));
        let app = app_with(pool(), oracle.clone());

        let description = "Need help with rent";
        assert_eq!(description.chars().count(), 19);
        let resp = app
            .oneshot(post_match(serde_json::json!({ "description": description })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json(resp).await["error"],
            "Please provide a detailed case description (min 20 characters)."
        );
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_or_malformed_description_is_rejected() {
        for request in [
            post_match(serde_json::json!({})),
            post_match(serde_json::json!({ "description": 42 })),
            Request::builder()
                .method("POST")
                .uri("/match-advocate")
                .body(Body::from("not json"))
                .unwrap(),
        ] {
            let resp = app_with(pool(), oracle(None)).oneshot(request).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn confident_match_names_the_advocate() {
        let oracle = oracle(Some(
            "Match Quality: 8/10\n\nSelected Advocate:\nAsha Rao - strong contract law background",
        ));
        let resp = app_with(pool(), oracle.clone())
            .oneshot(post_match(serde_json::json!({
                "description": "Breach of a supply contract with a vendor"
            })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json(resp).await;
        assert_eq!(body["name"], "Asha Rao");
        assert_eq!(body["sl_no"], 1);
        assert_eq!(body["matchType"], "AI Selected");
        assert_eq!(body["matchAccuracy"], "80%");
        assert_eq!(body["reason"], "strong contract law background");
        assert_eq!(body["message"], "Good match found based on case requirements");
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn oracle_failure_still_returns_an_advocate() {
        let resp = app_with(pool(), oracle(None))
            .oneshot(post_match(serde_json::json!({
                "description": "Dispute over an unpaid invoice from a supplier"
            })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json(resp).await;
        let name = body["name"].as_str().unwrap();
        assert!(pool().iter().any(|a| a.name == name));
        assert_eq!(body["matchType"], "Random Selection");
        assert_eq!(body["matchAccuracy"], "50%");
    }

    #[tokio::test]
    async fn empty_pool_is_server_error() {
        let oracle = oracle(Some("Match Quality: 9/10\nAsha Rao - contracts"));
        let resp = app_with(Vec::new(), oracle.clone())
            .oneshot(post_match(serde_json::json!({
                "description": "Dispute over an unpaid invoice from a supplier"
            })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(resp).await["error"], "No advocates found in the database.");
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn listing_is_idempotent() {
        let repo = AdvocateRepository::new(Arc::new(MemoryStore::new(pool())));
        let app = router(AppState::new(Matcher::new(repo, oracle(None))));

        let first = json(app.clone().oneshot(get("/advocates")).await.unwrap()).await;
        let second = json(app.oneshot(get("/advocates")).await.unwrap()).await;
        assert_eq!(first, second);
        assert_eq!(first["total"], 3);
        assert_eq!(first["advocates"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn random_advocate_from_pool() {
        let resp = app_with(pool(), oracle(None))
            .oneshot(get("/random-advocate"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json(resp).await;
        let name = body["name"].as_str().unwrap();
        assert!(pool().iter().any(|a| a.name == name));
        assert_eq!(body["matchType"], "Random Selection");
        assert_eq!(body["matchAccuracy"], "50%");
    }

    #[tokio::test]
    async fn random_advocate_empty_pool() {
        let resp = app_with(Vec::new(), oracle(None))
            .oneshot(get("/random-advocate"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(resp).await["error"], "No advocates found");
    }
}
