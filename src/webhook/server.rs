//! Webhook HTTP server.
//!
//! # Responsibilities
//! - Create Axum Router with the event, health and registration handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Register the webhook on startup and deregister after shutdown

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::WebhookConfig;
use crate::events::{filter, EventSelector, ForwardDecision};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::webhook::registration::{RegistrationStore, WebhookRegistration};
use crate::webhook::sink::EventSink;

pub const HEALTH_PATH: &str = "/health";
pub const REGISTRATION_PATH: &str = "/registration";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registration state error: {0}")]
    Registration(#[source] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub selector: Arc<EventSelector>,
    pub sink: EventSink,
    pub registration: RegistrationStore,
}

/// Webhook listener for platform events.
pub struct WebhookServer {
    router: Router,
    config: WebhookConfig,
    registration: RegistrationStore,
}

impl WebhookServer {
    pub fn new(config: WebhookConfig, sink: EventSink, registration: RegistrationStore) -> Self {
        let state = AppState {
            selector: Arc::new(config.selector()),
            sink,
            registration: registration.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            registration,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &WebhookConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.path, post(receive_event))
            .route(HEALTH_PATH, get(health))
            .route(REGISTRATION_PATH, get(registration))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router without a listener, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires, then deregister.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;

        if !self.registration.check_exists().await {
            self.registration
                .create(&self.config.webhook_url())
                .await
                .map_err(ServerError::Registration)?;
        }

        tracing::info!(
            address = %addr,
            path = %self.config.path,
            event = %self.config.event,
            "Webhook server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        self.registration
            .delete()
            .await
            .map_err(ServerError::Registration)?;
        tracing::info!("Webhook server stopped");
        Ok(())
    }
}

/// Inbound event handler. Always acknowledges with 200.
async fn receive_event(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let decision = filter(&state.selector, &payload);
    metrics::record_webhook_event(decision.label());

    match decision {
        ForwardDecision::Forward(event) => {
            tracing::info!(
                event = %event.event,
                event_type = %event.event_type,
                "Event forwarded"
            );
            state.sink.deliver(&event).await;
            (StatusCode::OK, Json(event)).into_response()
        }
        ForwardDecision::Drop(reason) => {
            tracing::debug!(reason = %reason, "Event dropped");
            (StatusCode::OK, reason.as_str()).into_response()
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn registration(State(state): State<AppState>) -> Json<WebhookRegistration> {
    Json(state.registration.current().await)
}
