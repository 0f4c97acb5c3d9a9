use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{Handle, NativeDriver, ECHO_FAILURE};

const FIRST_HANDLE: usize = 0x1000;
const HANDLE_STRIDE: usize = 0x10;

/// A call received by a [RecordingDriver], with the exact arguments
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    Init,
    Create { trig_pin: i32, echo_pin: i32 },
    Close(Handle),
    GetEcho(Handle),
    GetDistance(Handle),
    GetDistanceT(Handle, f32),
    GetDistanceAvg(Handle, i32, i32),
    GetDistanceAvgT(Handle, i32, i32, f32),
}

struct Recording {
    calls: Vec<NativeCall>,
    created: Vec<Handle>,
    init_result: bool,
    create_fails: bool,
    echo: i32,
    distance: f32,
}

/// [NativeDriver] that answers with fixed readings and records every call.
/// Used to run the binding on a host, where there is no native driver to link.
///
/// Clones share the same recording.
#[derive(Clone)]
pub struct RecordingDriver {
    inner: Arc<Mutex<Recording>>,
}

impl Default for RecordingDriver {
    fn default() -> Self {
        RecordingDriver::new()
    }
}

impl RecordingDriver {
    /// Creates a driver whose readings are all failures until configured
    pub fn new() -> Self {
        RecordingDriver {
            inner: Arc::new(Mutex::new(Recording {
                calls: Vec::new(),
                created: Vec::new(),
                init_result: true,
                create_fails: false,
                echo: ECHO_FAILURE,
                distance: f32::NAN,
            })),
        }
    }

    fn recording(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Echo duration returned by every `get_echo`
    pub fn with_echo(self, echo_us: i32) -> Self {
        self.recording().echo = echo_us;
        self
    }

    /// Distance returned by every distance reading
    pub fn with_distance(self, distance_mm: f32) -> Self {
        self.recording().distance = distance_mm;
        self
    }

    /// Makes every `create` return `NULL`
    pub fn failing_create(self) -> Self {
        self.recording().create_fails = true;
        self
    }

    /// Makes `init` report a failure
    pub fn failing_init(self) -> Self {
        self.recording().init_result = false;
        self
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<NativeCall> {
        self.recording().calls.clone()
    }

    /// Handles given out by `create`, oldest first
    pub fn created_handles(&self) -> Vec<Handle> {
        self.recording().created.clone()
    }

    fn record(&self, call: NativeCall) -> MutexGuard<'_, Recording> {
        let mut recording = self.recording();
        recording.calls.push(call);
        recording
    }
}

impl NativeDriver for RecordingDriver {
    fn init(&self) -> bool {
        self.record(NativeCall::Init).init_result
    }

    fn create(&self, trig_pin: i32, echo_pin: i32) -> Option<Handle> {
        let mut recording = self.record(NativeCall::Create { trig_pin, echo_pin });
        if recording.create_fails {
            return None;
        }
        let raw = FIRST_HANDLE + recording.created.len() * HANDLE_STRIDE;
        let handle = Handle::from_raw(NonZeroUsize::new(raw)?);
        recording.created.push(handle);
        Some(handle)
    }

    fn close(&self, handle: Handle) {
        self.record(NativeCall::Close(handle));
    }

    fn get_echo(&self, handle: Handle) -> i32 {
        self.record(NativeCall::GetEcho(handle)).echo
    }

    fn get_distance(&self, handle: Handle) -> f32 {
        self.record(NativeCall::GetDistance(handle)).distance
    }

    fn get_distance_t(&self, handle: Handle, temperature: f32) -> f32 {
        self.record(NativeCall::GetDistanceT(handle, temperature)).distance
    }

    fn get_distance_avg(&self, handle: Handle, attempts_count: i32, attempts_delay: i32) -> f32 {
        self.record(NativeCall::GetDistanceAvg(handle, attempts_count, attempts_delay))
            .distance
    }

    fn get_distance_avg_t(
        &self,
        handle: Handle,
        attempts_count: i32,
        attempts_delay: i32,
        temperature: f32,
    ) -> f32 {
        self.record(NativeCall::GetDistanceAvgT(
            handle,
            attempts_count,
            attempts_delay,
            temperature,
        ))
        .distance
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test0_clones_share_the_recording() {
        let driver = RecordingDriver::new();
        let clone = driver.clone();
        let handle = clone.create(5, 6).unwrap();
        clone.close(handle);
        assert_eq!(
            driver.calls(),
            vec![NativeCall::Create { trig_pin: 5, echo_pin: 6 }, NativeCall::Close(handle)]
        );
    }

    #[test]
    fn test1_every_created_handle_is_different() {
        let driver = RecordingDriver::new();
        let first = driver.create(1, 2).unwrap();
        let second = driver.create(3, 4).unwrap();
        assert_ne!(first, second);
        assert_eq!(driver.created_handles(), vec![first, second]);
    }

    #[test]
    fn test2_failing_create_gives_no_handle() {
        let driver = RecordingDriver::new().failing_create();
        assert_eq!(driver.create(1, 2), None);
        assert!(driver.created_handles().is_empty());
    }

    #[test]
    fn test3_readings_default_to_failure_sentinels() {
        let driver = RecordingDriver::new();
        let handle = driver.create(1, 2).unwrap();
        assert_eq!(driver.get_echo(handle), ECHO_FAILURE);
        assert!(driver.get_distance(handle).is_nan());
    }
}
