pub mod me;
pub mod users;
