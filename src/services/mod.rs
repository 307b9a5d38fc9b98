pub mod auth_service;
pub mod review_service;
pub mod scheduler_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use review_service::ReviewService;
pub use scheduler_service::SchedulerService;
pub use user_service::UserService;
