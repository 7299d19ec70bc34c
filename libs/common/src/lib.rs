//! Common library for the Pokénotes backend
//!
//! This crate provides shared functionality used by the auth and api
//! services: database connectivity and migrations, the persistence error
//! taxonomy, typed identifiers, JWT handling and the Redis cache client.

pub mod cache;
pub mod database;
pub mod error;
pub mod ids;
pub mod jwt;
