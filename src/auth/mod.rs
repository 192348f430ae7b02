use crate::state::AppState;
use axum::Router;

mod claims;
mod cookie;
mod dto;
mod error;
pub mod handlers;
pub mod jwt;
mod password;
pub mod repo;
mod repo_types;
mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
