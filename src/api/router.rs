use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{api::handlers, app::AppState};

pub fn build_router(state: AppState) -> Router {
    let auth_api = Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register));

    Router::new()
        .route(
            "/articles",
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/articles/{id}",
            get(handlers::get_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .nest("/auth", auth_api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
