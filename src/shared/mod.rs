pub mod config;
pub mod database;
pub mod hash_worker;
pub mod health_check;
pub mod http_error;
pub mod middleware;
pub mod rate_limit;
pub mod repository;
pub mod token;
