pub mod question;
pub mod refresh_token;
pub mod review_queue;
pub mod user;

pub use question::Question;
pub use refresh_token::RefreshToken;
pub use review_queue::{QueueNode, ReviewQueue, UserQueue};
pub use user::User;
