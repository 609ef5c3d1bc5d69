pub mod auth;
pub mod clock;
pub mod configuration;
pub mod error;
pub mod routes;
pub mod service;
pub mod startup;
pub mod telemetry;
pub mod users;
