pub mod email;
pub mod oauth;
