use std::ffi::{c_float, c_int, c_void};

use super::{Handle, NativeDriver};

// Linked by build.rs from MGOS_HCSR04_LIB_DIR, or provided by the firmware
// when the driver is built as an ESP-IDF component
extern "C" {
    fn mgos_hcsr04_init() -> bool;
    fn mgos_hcsr04_create(trig_pin: c_int, echo_pin: c_int) -> *mut c_void;
    fn mgos_hcsr04_close(handle: *mut c_void);
    fn mgos_hcsr04_get_echo(handle: *mut c_void) -> c_int;
    fn mgos_hcsr04_get_distance(handle: *mut c_void) -> c_float;
    fn mgos_hcsr04_get_distance_t(handle: *mut c_void, temperature: c_float) -> c_float;
    fn mgos_hcsr04_get_distance_avg(
        handle: *mut c_void,
        attempts_count: c_int,
        attempts_delay: c_int,
    ) -> c_float;
    fn mgos_hcsr04_get_distance_avg_t(
        handle: *mut c_void,
        attempts_count: c_int,
        attempts_delay: c_int,
        temperature: c_float,
    ) -> c_float;
}

/// [NativeDriver] backed by the `mgos_hcsr04` C library linked into the firmware
#[derive(Debug, Clone, Copy, Default)]
pub struct MgosDriver;

// SAFETY for every call below: handles only come from `mgos_hcsr04_create` and
// the driver owns the memory behind them, so they are passed back untouched.
impl NativeDriver for MgosDriver {
    fn init(&self) -> bool {
        unsafe { mgos_hcsr04_init() }
    }

    fn create(&self, trig_pin: i32, echo_pin: i32) -> Option<Handle> {
        Handle::from_ptr(unsafe { mgos_hcsr04_create(trig_pin, echo_pin) })
    }

    fn close(&self, handle: Handle) {
        unsafe { mgos_hcsr04_close(handle.as_ptr()) }
    }

    fn get_echo(&self, handle: Handle) -> i32 {
        unsafe { mgos_hcsr04_get_echo(handle.as_ptr()) }
    }

    fn get_distance(&self, handle: Handle) -> f32 {
        unsafe { mgos_hcsr04_get_distance(handle.as_ptr()) }
    }

    fn get_distance_t(&self, handle: Handle, temperature: f32) -> f32 {
        unsafe { mgos_hcsr04_get_distance_t(handle.as_ptr(), temperature) }
    }

    fn get_distance_avg(&self, handle: Handle, attempts_count: i32, attempts_delay: i32) -> f32 {
        unsafe { mgos_hcsr04_get_distance_avg(handle.as_ptr(), attempts_count, attempts_delay) }
    }

    fn get_distance_avg_t(
        &self,
        handle: Handle,
        attempts_count: i32,
        attempts_delay: i32,
        temperature: f32,
    ) -> f32 {
        unsafe {
            mgos_hcsr04_get_distance_avg_t(handle.as_ptr(), attempts_count, attempts_delay, temperature)
        }
    }
}
