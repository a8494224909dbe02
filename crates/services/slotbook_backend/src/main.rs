// File: services/slotbook_backend/src/main.rs
use axum::{routing::get, Router};
use slotbook_bookings::handlers::BookingsState;
use slotbook_bookings::routes::{api_routes, build_state, page_routes};
use slotbook_common::{logging, Context};
use slotbook_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

mod service_factory;
use service_factory::SlotbookServiceFactory;

/// JSON API under `/api`, the calendar page at `/` and `/calendar`.
fn build_app(state: Arc<BookingsState>) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Slotbook API!" }))
        .merge(api_routes(state.clone()));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new()
        .nest("/api", api_router)
        .merge(page_routes(state));

    #[cfg(feature = "openapi")]
    {
        use slotbook_bookings::doc::BookingsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotbook API",
                version = "0.1.0",
                description = "Booking approval and availability endpoints",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingsApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = std::env::var("LOG_LEVEL").unwrap_or_default();
    logging::init_with_level(logging::level_from_str(&level));

    let config = Arc::new(load_config()?);
    let factory = SlotbookServiceFactory::new(&config)?;
    let state = build_state(config.clone(), factory.booking_store())?;
    let app = build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
