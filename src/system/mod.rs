//! System-level modules
//!
//! Process-wide concerns that sit outside the link core.

pub mod logging;
