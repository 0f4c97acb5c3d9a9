mod recording;
#[cfg(target_os = "espidf")]
mod mgos;

use std::{ffi::c_void, num::NonZeroUsize};

pub use recording::*;
#[cfg(target_os = "espidf")]
pub use mgos::*;

/// Attempts count that makes the native driver use its own default sample count
pub const DEFAULT_ATTEMPTS_COUNT: i32 = 0;

/// Attempts delay that makes the native driver use [NATIVE_DEFAULT_DELAY_MS]
pub const DEFAULT_ATTEMPTS_DELAY: i32 = -1;

/// Delay in milliseconds the native driver waits between averaged measurements
/// when it receives a non positive delay
pub const NATIVE_DEFAULT_DELAY_MS: u32 = 5;

/// Value the native driver returns from `get_echo` when no echo was read
pub const ECHO_FAILURE: i32 = -1;

/// Opaque handle to the state of one sensor inside the native driver.
/// It is never dereferenced on this side of the boundary, only handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(NonZeroUsize);

impl Handle {
    /// Wraps a pointer returned by the native driver. Returns `None` for `NULL`.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Handle> {
        NonZeroUsize::new(ptr as usize).map(Handle)
    }

    pub fn from_raw(raw: NonZeroUsize) -> Handle {
        Handle(raw)
    }

    /// Returns the exact pointer the native driver created
    pub fn as_ptr(self) -> *mut c_void {
        self.0.get() as *mut c_void
    }

    pub fn raw(self) -> usize {
        self.0.get()
    }
}

/// Functions exported by the native HC-SR04 driver.
///
/// Every method maps 1:1 to a native call and keeps its sentinels:
/// `None` for a failed creation, [ECHO_FAILURE] for a failed echo read and
/// `NaN` for a failed distance read. Implementors must not add validation.
pub trait NativeDriver: Clone + Send + 'static {
    /// Library initialization, called once before any sensor is created
    fn init(&self) -> bool {
        true
    }

    fn create(&self, trig_pin: i32, echo_pin: i32) -> Option<Handle>;

    fn close(&self, handle: Handle);

    /// Echo duration in microseconds or [ECHO_FAILURE]
    fn get_echo(&self, handle: Handle) -> i32;

    /// Distance in millimeters or `NaN`
    fn get_distance(&self, handle: Handle) -> f32;

    /// Temperature compensated distance in millimeters or `NaN`
    fn get_distance_t(&self, handle: Handle, temperature: f32) -> f32;

    /// Average of `attempts_count` measurements taken `attempts_delay` ms apart
    fn get_distance_avg(&self, handle: Handle, attempts_count: i32, attempts_delay: i32) -> f32;

    fn get_distance_avg_t(
        &self,
        handle: Handle,
        attempts_count: i32,
        attempts_delay: i32,
        temperature: f32,
    ) -> f32;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test0_null_pointer_is_not_a_handle() {
        assert_eq!(Handle::from_ptr(std::ptr::null_mut()), None);
    }

    #[test]
    fn test1_handle_gives_back_the_same_pointer() {
        let ptr = 0x3ffb_1f40usize as *mut c_void;
        let handle = Handle::from_ptr(ptr).unwrap();
        assert_eq!(handle.as_ptr(), ptr);
        assert_eq!(handle.raw(), 0x3ffb_1f40);
    }

    #[test]
    fn test2_defaults_leave_the_choice_to_the_native_driver() {
        // The native driver only applies its own delay to non positive values
        assert!(DEFAULT_ATTEMPTS_DELAY <= 0);
        assert_eq!(NATIVE_DEFAULT_DELAY_MS, 5);
        assert_eq!(DEFAULT_ATTEMPTS_COUNT, 0);
    }
}
