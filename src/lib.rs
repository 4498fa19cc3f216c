//! kvlinker - a small URL shortener backed by an embedded key-value store
//!
//! Codes are random strings over a 64-symbol alphabet whose length grows
//! when the current length gets crowded. Every redirect is accounted for in
//! the background: an all-time counter plus a rolling seven-day log from
//! which weekly and daily counts are derived.
//!
//! # Architecture
//! - `storage`: redb store, value codecs, key schema, cached code length
//! - `services`: code assignment, redirect lookup, hit statistics
//! - `analytics`: background hit recorder
//! - `api`: HTTP services and middleware
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
