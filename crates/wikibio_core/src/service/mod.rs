//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads and narrative rendering into use-case APIs.
//! - Keep the CLI decoupled from storage and rendering details.

pub mod biography_service;
