// Planora Auth Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod store;

pub use error::{AuthError, Result};

use std::sync::Arc;

use jwt_codec::TokenCodec;
use services::{MemberDirectory, TokenService};
use store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn MemberDirectory>,
    pub codec: Arc<TokenCodec>,
    pub sessions: Arc<dyn SessionStore>,
    pub tokens: TokenService,
}
