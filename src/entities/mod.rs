pub mod prelude;

pub mod user_history;
pub mod users;
