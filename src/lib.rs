pub mod access;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{elevated, protected, public};
use crate::state::AppState;

/// Build the full router around an already-wired [`AppState`]
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .merge(elevated_routes())
        .layer(from_fn_with_state(state.clone(), middleware::authenticate_request))
        .layer(RequestBodyLimitLayer::new(state.config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&state.config.security) {
        router = router.layer(cors);
    }

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::{auth, blogs, categories, system};

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/categories", get(categories::list))
        .route("/api/blogs", get(blogs::list))
        .route("/api/blogs/category/:id", get(blogs::list_by_category))
        .route("/api/blogs/:id", get(blogs::get))
}

fn protected_routes() -> Router<AppState> {
    use protected::{auth, blogs, todos, users};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/users/get/:id", get(users::get))
        .route("/api/users/update/:id", put(users::update))
        .route("/api/blogs/create", post(blogs::create))
        .route("/api/blogs/update/:id", put(blogs::update))
        .route("/api/blogs/delete/:id", delete(blogs::delete))
        .route("/api/todos", get(todos::list).post(todos::create))
        .route(
            "/api/todos/:id",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
}

fn elevated_routes() -> Router<AppState> {
    use elevated::{categories, users};

    Router::new()
        .route("/api/users", get(users::list))
        .route("/api/users/deactivate/:id", delete(users::deactivate))
        .route("/api/categories/create", post(categories::create))
        .route("/api/categories/update/:id", put(categories::update))
        .route("/api/categories/delete/:id", delete(categories::delete))
}

/// `None` when CORS is disabled; any origin when the list is empty or `*`
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
