//! Integration test suite for modloader-installer
//!
//! End-to-end tests of the install and restore workflows against a mocked
//! release API, plus tests of the `modloader-installer` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **install**: full install workflow (resolve, backup, download, extract)
//! - **restore**: backup/restore round trips
//! - **cli**: the binary's arguments, exit codes, settings and confirmations

mod cli;
mod common;
mod install;
mod restore;
