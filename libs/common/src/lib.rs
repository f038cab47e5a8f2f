//! Common library for the Foodgram services
//!
//! This crate provides shared functionality used by the auth and API
//! services: database connectivity and schema bootstrap, database error
//! handling, and JWT verification.

pub mod database;
pub mod error;
pub mod token;
