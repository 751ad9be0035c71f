pub mod bearer;

pub use bearer::{require_auth, BearerToken, CurrentUser};
