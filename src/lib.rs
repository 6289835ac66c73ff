//! Artvault - record store maintenance and HTTP front door
//!
//! This library crate exposes the core functionality for integration testing.

pub mod bootstrap;
pub mod config;
pub mod images;
pub mod server;
pub mod store;
