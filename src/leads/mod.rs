use crate::state::AppState;
use axum::Router;

mod dto;
mod export;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
pub mod repo;
pub mod repo_types;
mod validation;

pub fn router() -> Router<AppState> {
    handlers::lead_routes()
}
