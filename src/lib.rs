//! Shortgate - short link resolution core
//!
//! Maps short codes to target URLs, resolves them through a cache-aside
//! lookup, accounts every visit, and gates reads and mutations on link
//! lifecycle and ownership.
//!
//! # Architecture
//! - `services`: link service, lifecycle policy, visit accounting
//! - `cache`: resolution cache backends (moka, Redis, null)
//! - `storage`: SeaORM link/visit store (SQLite, MySQL, PostgreSQL)
//! - `config`: configuration loading
//! - `runtime`: construction and teardown of shared handles
//! - `interfaces` / `cli`: command-line front end
//! - `system`: logging

pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
