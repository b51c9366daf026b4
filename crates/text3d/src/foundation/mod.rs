//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and the plane rectangle
//! - RGBA8 colors and random palette generation
//! - Logging utilities

pub mod color;
pub mod logging;
pub mod math;
