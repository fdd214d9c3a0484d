//! Shared helpers for integration tests.

pub mod static_server;
