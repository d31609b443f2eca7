pub mod auth_service;
pub mod dashboard_service;
pub mod password;
pub mod user_service;

pub use auth_service::AuthService;
pub use dashboard_service::{DashboardService, DashboardStats};
pub use user_service::UserService;
