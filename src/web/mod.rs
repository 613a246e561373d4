// src/web/mod.rs
pub mod auth_handlers;
pub mod dtr_handlers;
pub mod routes;
