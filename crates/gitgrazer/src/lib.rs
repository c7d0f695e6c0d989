// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitgrazer library
//!
//! This module exports the commit-processing pipeline and its parts for use
//! by the binary and by integration tests.

pub mod config;
pub mod describe;
pub mod filter;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod store;
