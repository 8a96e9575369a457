//! VoltEdge Storefront library.
//!
//! This crate provides the session cart as a library so that it can be
//! driven by the command-line tools and tested without a UI.
//!
//! # Modules
//!
//! - [`cart`] - Cart store, storage slots, persistence, toasts and views
//! - [`config`] - Environment configuration
//! - [`error`] - Storage errors and Sentry reporting
//! - [`models`] - Session slot keys
//! - [`telemetry`] - Tracing and Sentry initialization

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
