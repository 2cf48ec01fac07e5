//! Common test imports and utilities for the shared types.
#![allow(unused_imports)]

pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

pub use rstest::rstest;
