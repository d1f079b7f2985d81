//! Common test utilities for chromaglobe.
//!
//! This module provides shared utilities for testing the chromaglobe server.

#![allow(dead_code)]

pub mod assertions;
pub mod http;
pub mod test_data;
