pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;
