//! Route definitions for the Handsoft HTTP API.
//!
//! All routes are mounted under `/api`. Every group carries its own guard
//! chain; there is no global authentication layer.

use axum::Router;
use axum::middleware::{self as axum_middleware, from_fn_with_state};
use axum::routing::{MethodRouter, get, post, put};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::guard::{self, Guard, GuardChain, Guarded};
use crate::middleware::logging::request_logging;
use crate::state::AppState;

const WAREHOUSE_CREATE: &str = "warehouse:create";
const WAREHOUSE_READ: &str = "warehouse:read";
const WAREHOUSE_UPDATE: &str = "warehouse:update";

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes(&state))
        .merge(user_routes(&state))
        .merge(geo_routes(&state))
        .merge(admin_routes(&state))
        .merge(warehouse_routes(&state));

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wrap a route group in a guard chain.
fn guarded(state: &AppState, chain: GuardChain, routes: Router<AppState>) -> Router<AppState> {
    routes.route_layer(from_fn_with_state(Guarded::new(state, chain), guard::enforce))
}

/// Wrap a single method route in a guard chain.
fn guarded_method(
    state: &AppState,
    chain: GuardChain,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(Guarded::new(state, chain), guard::enforce))
}

/// Registration and login: API key only.
fn auth_routes(state: &AppState) -> Router<AppState> {
    guarded(
        state,
        GuardChain::api_key(),
        Router::new()
            .route("/auth/register", post(handlers::auth::register))
            .route("/auth/login", post(handlers::auth::login)),
    )
}

/// Self-service: API key and bearer token.
fn user_routes(state: &AppState) -> Router<AppState> {
    guarded(
        state,
        GuardChain::authenticated(),
        Router::new().route("/users/me", get(handlers::user::me)),
    )
}

/// Geography lookups: API key only.
fn geo_routes(state: &AppState) -> Router<AppState> {
    guarded(
        state,
        GuardChain::api_key(),
        Router::new()
            .route("/geo/regions", get(handlers::geo::regions))
            .route("/geo/regions/{region_id}/cities", get(handlers::geo::cities))
            .route("/geo/cities/{city_id}/communes", get(handlers::geo::communes))
            .route("/geo/communes", get(handlers::geo::search_communes))
            .route("/geo/communes/{commune_id}", get(handlers::geo::commune)),
    )
}

/// Administration: API key, bearer token and super-admin.
fn admin_routes(state: &AppState) -> Router<AppState> {
    guarded(
        state,
        GuardChain::authenticated().then(Guard::Admin),
        Router::new()
            .route(
                "/admin/roles",
                get(handlers::admin::list_roles).post(handlers::admin::create_role),
            )
            .route(
                "/admin/roles/{id}",
                put(handlers::admin::update_role).delete(handlers::admin::delete_role),
            )
            .route(
                "/admin/roles/{id}/permissions",
                get(handlers::admin::role_permissions).put(handlers::admin::set_role_permissions),
            )
            .route(
                "/admin/permissions",
                get(handlers::admin::list_permissions).post(handlers::admin::create_permission),
            )
            .route(
                "/admin/permissions/{id}",
                axum::routing::delete(handlers::admin::delete_permission),
            )
            .route("/admin/users/{id}/roles", put(handlers::admin::set_user_roles)),
    )
}

/// Warehousing: API key, bearer token and a permission per method.
fn warehouse_routes(state: &AppState) -> Router<AppState> {
    let read = || GuardChain::authenticated().then(Guard::Permission(WAREHOUSE_READ));
    let create = || GuardChain::authenticated().then(Guard::Permission(WAREHOUSE_CREATE));
    let update = || GuardChain::authenticated().then(Guard::Permission(WAREHOUSE_UPDATE));

    Router::new()
        .route(
            "/warehouse/spaces",
            guarded_method(state, create(), post(handlers::warehouse::create_space))
                .merge(guarded_method(state, read(), get(handlers::warehouse::list_spaces))),
        )
        .route(
            "/warehouse/spaces/{id}",
            guarded_method(state, read(), get(handlers::warehouse::get_space)),
        )
        .route(
            "/warehouse/spaces/{id}/floors",
            guarded_method(state, create(), post(handlers::warehouse::create_floor)),
        )
        .route(
            "/warehouse/floors/{floor_id}/warehouses",
            guarded_method(
                state,
                create(),
                post(handlers::warehouse::create_warehouse_in_floor),
            ),
        )
        .route(
            "/warehouse/warehouses/{id}",
            guarded_method(state, read(), get(handlers::warehouse::get_warehouse)),
        )
        .route(
            "/warehouse/warehouses/{id}/config",
            guarded_method(state, update(), put(handlers::warehouse::update_config)),
        )
}
