pub mod dashboard_handlers;
pub mod health_handlers;
pub mod page_handlers;
pub mod user_api_handlers;

pub use dashboard_handlers::dashboard_handler;
pub use health_handlers::health_check;
pub use page_handlers::{add_user_handler, index_handler, users_page};
