//! Integration test suite for OpenUPS
//!
//! Drives full capability-document -> poll -> decode flows against
//! scripted transports, without real UPS hardware. The shared fixtures
//! model an APC-style Back-UPS collection.

#![deny(rust_2018_idioms)]
#![deny(warnings)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::print_stdout)]

pub mod fixtures;
