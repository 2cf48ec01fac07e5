//! Common test imports and utilities for block decoder tests
#![allow(unused_imports)]

pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

pub use rstest::rstest;
pub use texture_preview_common::color_8888::Color8888;
