//! Client for the fragments content-storage microservice.
//!
//! `services::fragment_client` issues the HTTP requests, `handlers` wraps
//! them in input-checked commands, and `config` assembles both from the
//! command line and environment.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
