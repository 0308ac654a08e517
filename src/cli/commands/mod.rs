mod history;
mod user;

pub use history::cmd_history;
pub use user::cmd_user_add;
