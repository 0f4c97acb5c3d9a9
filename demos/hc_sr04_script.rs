//! Example using two HC-SR04 sensors. The script opens one with the trigger on
//! GPIO5 and the echo on GPIO6, the Rust side opens another on GPIO7 and GPIO8.
//! Every second both are asked for the distance of the object in front.
//!
//! On the device the `mgos_hcsr04` C library has to be linked, either built as an
//! ESP-IDF component or through `MGOS_HCSR04_LIB_DIR` (see build.rs).
//!
//! Off the device it runs against a RecordingDriver that always measures 25 cm.

use std::{thread, time::Duration};

use hcsr04_binding::{
    binding_error::BindingError,
    driver::NativeDriver,
    script::{ScriptConfig, ScriptRuntime},
    sensors::HCSR04,
};

const SCRIPT: &str = r#"
var sensor = HCSR04.create(5, 6);
function measure() {
    var d = sensor.getAvgDistance(5, 10, 21.5);
    return isNaN(d) ? 'error reading distance' : ('' + d + ' mm');
}
"#;

#[cfg(target_os = "espidf")]
fn driver() -> impl NativeDriver {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    hcsr04_binding::driver::MgosDriver
}

#[cfg(not(target_os = "espidf"))]
fn driver() -> impl NativeDriver {
    hcsr04_binding::driver::RecordingDriver::new()
        .with_echo(1457)
        .with_distance(250.0)
}

fn run() -> Result<(), BindingError> {
    let driver = driver();
    // Pins 5 and 6 are taken by the script, this one uses 7 and 8
    let sensor = HCSR04::new(driver.clone(), 7, 8)?;
    let runtime = ScriptRuntime::new(driver, ScriptConfig::default())?;
    runtime.eval::<()>(SCRIPT)?;

    for _ in 0..10 {
        match sensor.distance(None) {
            Some(distance) => println!("Rust: {distance} mm"),
            None => println!("Rust: error reading distance"),
        }
        println!("Script: {}", runtime.eval::<String>("measure()")?);
        thread::sleep(Duration::from_secs(1));
    }

    runtime.eval::<()>("sensor.close();")?;
    sensor.close();
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        println!("{:?}", err);
    }
}
