//! SCHOA - Smart Clinical & Hospital Operations Assistant
//!
//! A terminal front end over a hosted language model for three hospital
//! workflows: clinical documentation, operational and financial review, and
//! natural-language search over patient records.
//!
//! # Architecture
//!
//! - **records / prompts**: static datasets and the prompt text built from them
//! - **gateway**: the single outbound path to the model, normalizing every
//!   result to display text
//! - **views**: per-screen controllers with cancellable in-flight calls
//! - **repl / cli**: the interactive shell and one-shot subcommands

pub mod errors;
pub mod config;
pub mod records;
pub mod prompts;
pub mod image;
pub mod gateway;
pub mod views;

// Re-export commonly used types
pub use errors::{Result, SchoaError};

// Interface layer
pub mod telemetry;
pub mod doctor;
pub mod cli;
pub mod repl;
