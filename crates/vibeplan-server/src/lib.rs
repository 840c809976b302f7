pub mod crawl;
pub mod error;
pub mod extract;
pub mod generate;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use state::AppState;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // LLM forwarding
        .route("/api/crawl-page", post(routes::crawl::crawl_page))
        .route(
            "/api/analyze-screenshot",
            post(routes::screenshot::analyze_screenshot),
        )
        .route(
            "/api/analyze-progress",
            post(routes::progress::analyze_progress),
        )
        .route("/api/generate-docs", post(routes::generate::generate_docs))
        .route(
            "/api/generate-feature",
            post(routes::generate::generate_feature),
        )
        // Projects
        .route(
            "/api/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/projects/{uid}",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/projects/{uid}/progress",
            get(routes::projects::project_progress),
        )
        .route(
            "/api/projects/{uid}/export",
            get(routes::projects::export_project),
        )
        .route(
            "/api/projects/{uid}/generate",
            post(routes::projects::generate_project_docs),
        )
        // Todos
        .route(
            "/api/projects/{uid}/todos",
            get(routes::todos::list_todos).post(routes::todos::add_todos),
        )
        .route(
            "/api/projects/{uid}/todos/reorder",
            post(routes::todos::reorder_todos),
        )
        .route(
            "/api/projects/{uid}/todos/apply-analysis",
            post(routes::todos::apply_analysis),
        )
        .route(
            "/api/todos/{id}",
            patch(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .route("/api/todos/{id}/move", post(routes::todos::move_todo))
        // Documents
        .route(
            "/api/projects/{uid}/documents",
            get(routes::documents::list_documents).post(routes::documents::create_document),
        )
        .route(
            "/api/documents/{id}",
            get(routes::documents::get_document)
                .put(routes::documents::update_document)
                .delete(routes::documents::delete_document),
        )
        .route(
            "/api/documents/{id}/export",
            get(routes::documents::export_document),
        )
        // Features
        .route(
            "/api/projects/{uid}/features",
            get(routes::features::list_features).post(routes::features::create_feature),
        )
        .route(
            "/api/features/{id}",
            delete(routes::features::delete_feature),
        )
        // Saved themes
        .route(
            "/api/themes",
            get(routes::themes::list_themes).post(routes::themes::save_theme),
        )
        .route(
            "/api/themes/{id}",
            delete(routes::themes::delete_theme),
        )
        // Settings
        .route(
            "/api/ai-config",
            get(routes::ai_config::get_ai_config)
                .put(routes::ai_config::put_ai_config)
                .delete(routes::ai_config::clear_ai_config),
        )
        .route(
            "/api/wizard",
            get(routes::wizard::get_wizard)
                .put(routes::wizard::put_wizard)
                .delete(routes::wizard::reset_wizard),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the vibeplan API server, storing data under `data_dir`.
pub async fn serve(data_dir: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(AppState::new(data_dir)?, listener, open_browser).await
}

/// Start the server on a pre-bound listener.
///
/// Lets the caller read the actual port first when binding to port 0.
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(
        data_dir = %app_state.data_dir.display(),
        "vibeplan server listening on http://localhost:{actual_port}"
    );
    let app = build_router(app_state);

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
