use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{driver::NativeDriver, sensors::HCSR04};

/// Sensor table shared by every function the binding installs
pub type SharableSensorTable<D> = Arc<Mutex<SensorTable<D>>>;

/// Sensors opened from scripts, indexed by the id stored in each script object.
/// Scripts only ever see ids, native handles stay on this side.
pub struct SensorTable<D: NativeDriver> {
    driver: D,
    sensors: HashMap<u32, HCSR04<D>>,
    next_id: u32,
}

impl<D: NativeDriver> SensorTable<D> {
    pub fn new(driver: D) -> Self {
        SensorTable { driver, sensors: HashMap::new(), next_id: 1 }
    }

    pub fn new_sharable(driver: D) -> SharableSensorTable<D> {
        Arc::new(Mutex::new(SensorTable::new(driver)))
    }

    /// Creates a sensor in the native driver.
    ///
    /// # Returns
    ///
    /// The id of the new sensor, or `None` if the driver could not create it
    pub fn open(&mut self, trig_pin: i32, echo_pin: i32) -> Option<u32> {
        let sensor = HCSR04::new(self.driver.clone(), trig_pin, echo_pin).ok()?;
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.sensors.insert(id, sensor);
        Some(id)
    }

    /// Closes the sensor in the native driver. An id that is not open never
    /// reaches the driver.
    ///
    /// # Returns
    ///
    /// Whether the id belonged to an open sensor
    pub fn close(&mut self, id: u32) -> bool {
        match self.sensors.remove(&id) {
            Some(sensor) => {
                sensor.close();
                true
            }
            None => {
                log::warn!("Ignoring close of HC-SR04 {id}, it is not open");
                false
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<&HCSR04<D>> {
        self.sensors.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

pub(crate) fn lock<D: NativeDriver>(table: &SharableSensorTable<D>) -> MutexGuard<'_, SensorTable<D>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::{NativeCall, RecordingDriver};

    #[test]
    fn test0_ids_start_at_one_and_are_not_reused() {
        let mut table = SensorTable::new(RecordingDriver::new());
        let first = table.open(5, 6).unwrap();
        assert!(table.close(first));
        let second = table.open(5, 6).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test1_failed_creation_opens_nothing() {
        let mut table = SensorTable::new(RecordingDriver::new().failing_create());
        assert_eq!(table.open(5, 6), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test2_closing_twice_reaches_the_driver_once() {
        let driver = RecordingDriver::new();
        let mut table = SensorTable::new(driver.clone());
        let id = table.open(5, 6).unwrap();
        assert!(table.close(id));
        assert!(!table.close(id));
        let closes = driver
            .calls()
            .into_iter()
            .filter(|call| matches!(call, NativeCall::Close(_)))
            .count();
        assert_eq!(closes, 1);
        assert!(table.get(id).is_none());
    }

    #[test]
    fn test3_each_id_keeps_its_own_handle() {
        let driver = RecordingDriver::new();
        let mut table = SensorTable::new(driver.clone());
        let first = table.open(1, 2).unwrap();
        let second = table.open(3, 4).unwrap();
        assert_eq!(
            vec![table.get(first).unwrap().handle(), table.get(second).unwrap().handle()],
            driver.created_handles()
        );
    }
}
