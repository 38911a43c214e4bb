//! adslot - ad slot resolution and engagement tracking
//!
//! # Architecture
//! - `ads`: slot/creative models, eligibility, rotation, rendering and the cached resolver
//! - `most_read`: view counting and most-read rankings over sliding windows
//! - `cache`: key-value store (moka in-process or Redis)
//! - `storage`: SeaORM persistence for slots, creatives and events
//! - `services`: business operations used by the HTTP layer and the seed command
//! - `api`: HTTP handlers and middleware
//! - `config`: static configuration
//! - `runtime`: startup, shutdown and execution modes
//! - `system`: logging

pub mod ads;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod most_read;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
