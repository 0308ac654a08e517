pub use super::user_history::Entity as UserHistory;
pub use super::users::Entity as Users;
