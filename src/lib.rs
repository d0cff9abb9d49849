//! Landing page message rotation.
//!
//! A [`rotator::MessageRotator`] cycles a fixed list of messages through a
//! [`rotator::DisplaySurface`]. Surfaces for the terminal and JSON output live
//! in [`display`], the browser surface in [`web`].

pub mod cli;
pub mod display;
pub mod error;
pub mod rotator;
pub mod web;

pub use error::{Result, RotatorError};
