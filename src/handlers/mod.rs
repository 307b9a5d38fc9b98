pub mod auth_handler;
pub mod question_handler;
pub mod user_handler;

pub use auth_handler::{login, logout, refresh_token};
pub use question_handler::{current_question, submit_answer};
pub use user_handler::{get_user, health_check, health_check_live, health_check_ready, register};
