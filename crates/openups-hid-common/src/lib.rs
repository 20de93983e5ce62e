//! Common HID plumbing for UPS-class power devices
//!
//! This crate moves report bytes between a capability table and a
//! physical device: the transport trait and its scripted mock, the
//! read-strategy ladder, capability loading from a parser seam, and the
//! hidapi-backed session type. Decoding the bytes lives in
//! `ups-monitor-power-device-report`.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod caps_source;
pub mod device_info;
pub mod poll;
pub mod session;
pub mod transport;

pub use caps_source::*;
pub use device_info::*;
pub use poll::*;
pub use session::*;
pub use transport::*;
