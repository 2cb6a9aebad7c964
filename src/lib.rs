//! Clipstream - a video-platform-style REST backend
//!
//! This is the library interface for Clipstream: account and session
//! management, tweets, subscriptions, and the HTTP API around them.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::Error;
