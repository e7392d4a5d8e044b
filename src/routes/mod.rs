use axum::Router;

use crate::state::SharedState;

pub mod animation;
pub mod colors;
pub mod docs;
pub mod export;
pub mod health;
pub mod sessions;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(colors::router())
        .merge(export::router())
        .merge(sessions::router())
        .merge(animation::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
