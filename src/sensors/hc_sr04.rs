use std::time::Duration;

use crate::driver::{Handle, NativeDriver, DEFAULT_ATTEMPTS_COUNT, DEFAULT_ATTEMPTS_DELAY};

#[derive(Debug, PartialEq, Eq)]
pub enum HCSR04Error {
    /// The native driver returned `NULL`. It gives no reason, usually the pins
    /// could not be configured or it ran out of memory.
    CreationFailed { trig_pin: i32, echo_pin: i32 },
}

/// Simple abstraction of the HCSR04 that forwards every reading to the native driver.
///
/// The sensor is released only by [HCSR04::close], there is no cleanup on drop.
pub struct HCSR04<D: NativeDriver> {
    driver: D,
    handle: Handle,
}

impl<D: NativeDriver> HCSR04<D> {
    /// Creates the sensor in the native driver using the received pins.
    ///
    /// # Returns
    ///
    /// The new HCSR04, or `HCSR04Error::CreationFailed` if the driver could not create it
    pub fn new(driver: D, trig_pin: i32, echo_pin: i32) -> Result<HCSR04<D>, HCSR04Error> {
        match driver.create(trig_pin, echo_pin) {
            Some(handle) => {
                log::debug!("HC-SR04 created on trig {trig_pin} echo {echo_pin}: {handle:?}");
                Ok(HCSR04 { driver, handle })
            }
            None => {
                log::warn!("Native driver could not create HC-SR04 on trig {trig_pin} echo {echo_pin}");
                Err(HCSR04Error::CreationFailed { trig_pin, echo_pin })
            }
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Releases the sensor in the native driver
    pub fn close(self) {
        log::debug!("Closing HC-SR04 {:?}", self.handle);
        self.driver.close(self.handle)
    }

    /// Returns the echo duration in microseconds, or -1 if it could not be read
    pub fn get_echo(&self) -> i32 {
        self.driver.get_echo(self.handle)
    }

    /// Returns the distance of the object in front of the sensor in millimeters.
    /// A temperature that is present, not zero and not `NaN` selects the
    /// temperature compensated measurement.
    ///
    /// # Returns
    ///
    /// A f32 with the distance in millimeters, `NaN` if it could not be measured
    pub fn get_distance(&self, temperature: Option<f32>) -> f32 {
        self.read_distance(compensation(temperature))
    }

    /// Forwards to the compensated measurement whenever a temperature is given,
    /// whatever its value. Callers that already decided on the compensation use
    /// this one.
    pub fn read_distance(&self, temperature: Option<f32>) -> f32 {
        match temperature {
            Some(temperature) => self.driver.get_distance_t(self.handle, temperature),
            None => self.driver.get_distance(self.handle),
        }
    }

    /// Performs multiple measurements and returns their average in millimeters.
    ///
    /// A missing or zero `attempts_count` leaves the amount of measurements to the
    /// native driver, a missing or zero `attempts_delay` makes it wait its default
    /// [NATIVE_DEFAULT_DELAY_MS](crate::driver::NATIVE_DEFAULT_DELAY_MS) between
    /// measurements. The temperature works as in [HCSR04::get_distance].
    ///
    /// # Returns
    ///
    /// A f32 with the average distance in millimeters, `NaN` if no measurement succeeded
    pub fn get_avg_distance(
        &self,
        attempts_count: Option<i32>,
        attempts_delay: Option<i32>,
        temperature: Option<f32>,
    ) -> f32 {
        self.read_avg_distance(
            non_zero_or(attempts_count, DEFAULT_ATTEMPTS_COUNT),
            non_zero_or(attempts_delay, DEFAULT_ATTEMPTS_DELAY),
            compensation(temperature),
        )
    }

    /// Forwards the attempts exactly as received, the temperature selects the
    /// compensated measurement as in [HCSR04::read_distance]
    pub fn read_avg_distance(
        &self,
        attempts_count: i32,
        attempts_delay: i32,
        temperature: Option<f32>,
    ) -> f32 {
        match temperature {
            Some(temperature) => self.driver.get_distance_avg_t(
                self.handle,
                attempts_count,
                attempts_delay,
                temperature,
            ),
            None => self
                .driver
                .get_distance_avg(self.handle, attempts_count, attempts_delay),
        }
    }

    /// Same as [HCSR04::get_echo] with the failure turned into `None`
    pub fn echo(&self) -> Option<Duration> {
        u64::try_from(self.get_echo()).ok().map(Duration::from_micros)
    }

    /// Same as [HCSR04::get_distance] with the failure turned into `None`
    pub fn distance(&self, temperature: Option<f32>) -> Option<f32> {
        measured(self.get_distance(temperature))
    }

    /// Same as [HCSR04::get_avg_distance] with the failure turned into `None`
    pub fn avg_distance(
        &self,
        attempts_count: Option<i32>,
        attempts_delay: Option<i32>,
        temperature: Option<f32>,
    ) -> Option<f32> {
        measured(self.get_avg_distance(attempts_count, attempts_delay, temperature))
    }
}

fn compensation(temperature: Option<f32>) -> Option<f32> {
    temperature.filter(|t| *t != 0.0 && !t.is_nan())
}

fn non_zero_or(value: Option<i32>, default: i32) -> i32 {
    value.filter(|v| *v != 0).unwrap_or(default)
}

fn measured(distance: f32) -> Option<f32> {
    (!distance.is_nan()).then_some(distance)
}
