//! # Guild Ranks
//!
//! Performance aggregation and ranking engine for a guild tracking site.
//!
//! Players submit per-match damage or healing numbers; this crate turns
//! those raw match records into per-player-class summaries, ranks players
//! within a role, computes class percentiles and detects or repairs
//! numerically corrupted data.
//!
//! ## Architecture
//!
//! - [`models`]: Domain types and the shared metric parser
//! - [`db`]: Record store traits, the in-memory store, configuration
//! - [`services`]: Aggregation, ranking, statistics and repair
//! - [`api`]: Payload types exchanged with clients
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// RepositoryError carries structured context
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
