//! CLI infrastructure for the pacgrid toolkit
//!
//! This module provides the command-line interface for training, evaluating,
//! and exporting grid-world TD agents.

pub mod commands;
pub mod output;
