pub mod handlers;
pub mod middleware;
pub mod session;

pub use session::{resolve_session, CurrentUser, SessionState};
