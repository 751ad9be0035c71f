mod auth;

pub use auth::{join, login, logout, reissue};
