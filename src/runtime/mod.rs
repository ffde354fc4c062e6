//! Application lifecycle
//!
//! The process entry point owns the store and cache handles: it builds
//! them with [`AppContext::init`] and releases them with
//! [`AppContext::close`]. The link core never reaches for globals.

mod context;

pub use context::AppContext;
