pub mod notes;
pub mod users;
