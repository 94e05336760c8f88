//! Route configuration.

use axum::{middleware, Router};
use common::AppError;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{availability_routes, calendar_routes, health_routes, reservation_routes};
use crate::middleware::actor_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no identity)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Provider routes: reading availability is public, the rest acts as the provider
        .nest(
            "/providers",
            availability_routes()
                .merge(calendar_routes().route_layer(middleware::from_fn(actor_middleware))),
        )
        // Reservation routes (identity required)
        .nest(
            "/reservations",
            reservation_routes().route_layer(middleware::from_fn(actor_middleware)),
        )
        .fallback(not_found)
        .with_state(state)
}

/// Unknown paths get the standard error body
async fn not_found() -> AppError {
    AppError::NotFound
}
