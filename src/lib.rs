//! Exposes the native HC-SR04 ultrasonic sensor driver to JavaScript.
//!
//! [driver] declares the native functions, [sensors] wraps a native handle in a
//! [sensors::HCSR04] and [script] installs the `HCSR04` global used by scripts.

mod utils;

pub mod driver;
pub mod script;
pub mod sensors;

pub use utils::binding_error;
