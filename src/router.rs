use crate::handlers::{
    health::health_check,
    leads::{create_lead, delete_lead, get_lead, list_leads},
    users::{create_token, create_user, me, update_me},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware.
/// Unsupported verbs on a known path get a 405 from the method routers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User registration and token exchange (public)
        .route("/api/user/", post(create_user))
        .route("/api/user/token/", post(create_token))
        // Profile of the authenticated caller
        .route("/api/user/me/", get(me).patch(update_me))
        // Leads, scoped to the authenticated owner
        .route("/api/lead/", get(list_leads).post(create_lead))
        .route("/api/lead/:lead_id/", get(get_lead).delete(delete_lead))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
