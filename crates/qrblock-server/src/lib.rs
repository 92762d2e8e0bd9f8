//! # qrblock-server
//!
//! HTTP host for the QR code course block.
//!
//! This library provides the API handlers and state management; the
//! `qrblock-server` binary wires them to settings, a course catalog and a
//! listener.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
