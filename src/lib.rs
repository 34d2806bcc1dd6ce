//! The `taskhive` library crate.
//!
//! Core logic for the TaskHive API: domain models, the document store
//! contract and its in-memory engine, authentication (password hashing,
//! bearer-token issuance, identity resolution), ownership-scoped task
//! persistence, dashboard aggregation, routing configuration, and error
//! handling. The binary in `main.rs` wires these together and runs the
//! server.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;
pub mod users;
