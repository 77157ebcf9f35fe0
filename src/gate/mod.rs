//! # Gate Service
//!
//! The always-on endpoint client applications poll for a run/deny
//! verdict. Stateless: every request extracts the bundle identifier from
//! one configured header and asks the registry. No authentication, no
//! concept of administrator identity.
//!
//! ## Invariants
//! - A request without the identifier header is answered with the
//!   blocked literal, no error detail
//! - Any caller presenting an identifier is registered (fail-open)
//!   unless an administrator has denied it
//! - Only a storage failure produces a non-2xx response

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::GateConfig;
use crate::registry::BundleRegistry;

/// Shared gate state
pub struct GateState {
    pub registry: BundleRegistry,
    pub config: GateConfig,
}

/// Gate routes with shared state
pub fn gate_routes(state: Arc<GateState>) -> Router {
    Router::new()
        .route("/", get(verify_handler))
        .with_state(state)
}

/// Answer one authorization poll
async fn verify_handler(
    State(state): State<Arc<GateState>>,
    headers: HeaderMap,
) -> Result<String, StatusCode> {
    let bundle_id = headers
        .get(&state.config.app_id_header)
        .and_then(|value| value.to_str().ok());

    let Some(bundle_id) = bundle_id else {
        return Ok(state.config.blocked_response.clone());
    };

    match state
        .registry
        .check_or_create(bundle_id, Utc::now().timestamp())
        .await
    {
        Ok(true) => Ok(state.config.allowed_response.clone()),
        Ok(false) => Ok(state.config.blocked_response.clone()),
        Err(e) => {
            error!(bundle_id, error = %e, "gate check failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// The gate HTTP server
pub struct GateServer {
    config: GateConfig,
    router: Router,
}

impl GateServer {
    pub fn new(registry: BundleRegistry, config: GateConfig) -> Self {
        let state = Arc::new(GateState {
            registry,
            config: config.clone(),
        });
        let router = gate_routes(state).layer(TraceLayer::new_for_http());
        Self { config, router }
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        info!(%addr, header = %self.config.app_id_header, "gate listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn gate() -> (Router, BundleRegistry) {
        let pool = db::connect_in_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();
        let registry = BundleRegistry::new(pool);

        let state = Arc::new(GateState {
            registry: registry.clone(),
            config: GateConfig::default(),
        });
        (gate_routes(state), registry)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_blocked() {
        let (router, _) = gate().await;

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "BLOCKED");
    }

    #[tokio::test]
    async fn test_unseen_bundle_fails_open_and_registers() {
        let (router, registry) = gate().await;

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("APP_ID", "com.example.app")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");

        // The poll itself registered the bundle
        let bundle = registry.get("com.example.app").await.unwrap();
        assert!(bundle.allow_execution);
    }

    #[tokio::test]
    async fn test_denied_bundle_is_blocked() {
        let (router, registry) = gate().await;
        registry
            .set_execution("com.example.app", false, 100)
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("APP_ID", "com.example.app")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "BLOCKED");
    }

    #[tokio::test]
    async fn test_configurable_header_and_literals() {
        let pool = db::connect_in_memory().await.unwrap();
        db::init_schema(&pool).await.unwrap();

        let config = GateConfig {
            app_id_header: "X-Bundle".to_string(),
            allowed_response: "yes".to_string(),
            blocked_response: "no".to_string(),
            ..GateConfig::default()
        };
        let state = Arc::new(GateState {
            registry: BundleRegistry::new(pool),
            config,
        });
        let router = gate_routes(state);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("X-Bundle", "com.example.app")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "yes");

        // The old default header no longer counts
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("APP_ID", "com.example.app")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "no");
    }
}
