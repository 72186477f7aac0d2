pub mod conversations;
pub mod gate;
pub mod messages;
