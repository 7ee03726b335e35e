//! Headless testing support.
//!
//! Use the [`Pilot`] to drive a [`Form`](crate::form::Form) the way a user
//! would, without any rendering layer.

pub mod pilot;

pub use pilot::Pilot;
