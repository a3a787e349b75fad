//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for actor placement
//! - Handle types for pooled instances
//! - Time sources for deferred activation
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
