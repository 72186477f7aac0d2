pub mod connections;
pub mod follows;
pub mod users;
