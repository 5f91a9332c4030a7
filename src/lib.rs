//! Wallet Auth Server Library
//!
//! Issues short-lived bearer tokens to clients that prove ownership of a
//! Cosmos wallet by signing a challenge (ADR-36), and validates those tokens
//! without any server-side session store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
