pub mod connection;
pub mod user;

pub use connection::{Connection, ConnectionStatus};
pub use user::{PublicUser, User};
