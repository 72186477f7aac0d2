pub mod frames;
pub mod session;
