//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and the
//! surrounding control loop. Following hexagonal architecture, these traits
//! are owned by the domain and implemented by adapters elsewhere.

pub mod controller;
pub mod observer;

pub use controller::{Controller, Transition};
pub use observer::{EpisodeObserver, EpisodeSummary, Termination};
