//! Data models for the fragments client.
//!
//! Fragments and health status are owned by the remote service and only
//! relayed here; `user` holds the capability that signs each request.

pub mod fragment;
pub mod health;
pub mod user;
