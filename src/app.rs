use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::permission;
use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::{guarded, jwt_auth_middleware};
use crate::state::AppState;

/// Full application: routes plus the CORS and request-logging layers the
/// configuration enables
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut app = router(state);

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

/// Routes and fallbacks without any global layers
pub fn router(state: AppState) -> Router {
    let catalogue = Router::new()
        .merge(game_routes())
        .merge(character_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected catalogue
        .merge(catalogue)
        .fallback(public::not_found)
        .with_state(state)
}

fn game_routes() -> Router<AppState> {
    use protected::games;

    Router::new()
        .route(
            "/games",
            guarded(get(games::games_get), permission::GET_GAMES)
                .fallback(public::method_not_allowed),
        )
        .route(
            "/games/create",
            guarded(post(games::games_create), permission::POST_GAMES)
                .fallback(public::method_not_allowed),
        )
        .route(
            "/games/:id",
            guarded(get(games::game_get), permission::GET_GAMES)
                .merge(guarded(patch(games::game_patch), permission::PATCH_GAMES))
                .merge(guarded(delete(games::game_delete), permission::DELETE_GAMES))
                .fallback(public::method_not_allowed),
        )
        .route(
            "/games/:id/characters",
            guarded(get(games::game_characters_get), permission::GET_CHARACTERS)
                .fallback(public::method_not_allowed),
        )
}

fn character_routes() -> Router<AppState> {
    use protected::characters;

    Router::new()
        .route(
            "/characters",
            guarded(get(characters::characters_get), permission::GET_CHARACTERS)
                .fallback(public::method_not_allowed),
        )
        .route(
            "/characters/create",
            guarded(post(characters::characters_create), permission::POST_CHARACTERS)
                .fallback(public::method_not_allowed),
        )
        .route(
            "/characters/:id",
            guarded(get(characters::character_get), permission::GET_CHARACTERS)
                .merge(guarded(
                    delete(characters::character_delete),
                    permission::DELETE_CHARACTERS,
                ))
                .fallback(public::method_not_allowed),
        )
}

/// CORS for the configured origins; `*` allows any origin
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
