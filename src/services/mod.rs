// src/services/mod.rs
pub mod aggregator;
pub mod auth_service;
pub mod datetime_parse;
pub mod hours;
pub mod import_service;
pub mod session_service;
pub mod stats_service;
pub mod time_rule;
pub mod user_service;
