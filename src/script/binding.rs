use rquickjs::{
    convert::Coerced,
    function::{Opt, This},
    Ctx, Function, Object, Value,
};

use super::{
    sensor_table::{lock, SensorTable, SharableSensorTable},
    MethodSet, ScriptConfig, ScriptError,
};
use crate::{
    driver::{NativeDriver, DEFAULT_ATTEMPTS_COUNT, DEFAULT_ATTEMPTS_DELAY, ECHO_FAILURE},
    sensors::HCSR04,
};

const PROTOTYPE: &str = "_proto";
const HANDLE: &str = "handle";

/// Installs the HC-SR04 binding as a global object of the received context.
///
/// The global gets a `create(trig_pin, echo_pin)` function and a `_proto` object
/// shared by every sensor `create` returns. Each sensor only owns its `handle`.
///
/// # Returns
///
/// The table holding the sensors opened from scripts, or `ScriptError::DriverInitFailed`
/// if the native driver could not be initialized
pub fn install<'js, D: NativeDriver>(
    ctx: &Ctx<'js>,
    driver: D,
    config: &ScriptConfig,
) -> Result<SharableSensorTable<D>, ScriptError> {
    if !driver.init() {
        log::error!("HC-SR04 native driver failed to initialize");
        return Err(ScriptError::DriverInitFailed);
    }
    let sensors = SensorTable::new_sharable(driver);

    let prototype = Object::new(ctx.clone())?;
    prototype.set(HANDLE, Value::new_null(ctx.clone()))?;
    set_methods(ctx, &prototype, &sensors, config.methods)?;

    let binding = Object::new(ctx.clone())?;
    binding.set(PROTOTYPE, prototype)?;
    binding.set("create", create_function(ctx, &sensors, config.global_name.clone())?)?;
    ctx.globals().set(config.global_name.as_str(), binding)?;

    log::debug!("HC-SR04 binding installed as {} ({:?})", config.global_name, config.methods);
    Ok(sensors)
}

fn set_methods<'js, D: NativeDriver>(
    ctx: &Ctx<'js>,
    prototype: &Object<'js>,
    sensors: &SharableSensorTable<D>,
    methods: MethodSet,
) -> rquickjs::Result<()> {
    prototype.set("close", close_function(ctx, sensors)?)?;
    match methods {
        MethodSet::Full => {
            prototype.set("getEcho", get_echo_function(ctx, sensors)?)?;
            prototype.set("getDistance", get_distance_function(ctx, sensors, true)?)?;
            prototype.set("getAvgDistance", get_avg_distance_function(ctx, sensors)?)?;
        }
        MethodSet::DistanceOnly => {
            prototype.set("getDistance", get_distance_function(ctx, sensors, false)?)?;
        }
    }
    Ok(())
}

fn create_function<'js, D: NativeDriver>(
    ctx: &Ctx<'js>,
    sensors: &SharableSensorTable<D>,
    global_name: String,
) -> rquickjs::Result<Function<'js>> {
    let sensors = sensors.clone();
    Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>,
              trig_pin: Opt<Value<'js>>,
              echo_pin: Opt<Value<'js>>|
              -> rquickjs::Result<Value<'js>> {
            let binding: Object = ctx.globals().get(global_name.as_str())?;
            let prototype: Object = binding.get(PROTOTYPE)?;
            let object: Object = ctx.globals().get("Object")?;
            let object_create: Function = object.get("create")?;

            let trig_pin = int_arg(trig_pin)?;
            let echo_pin = int_arg(echo_pin)?;
            let Some(id) = lock(&sensors).open(trig_pin, echo_pin) else {
                return Ok(Value::new_null(ctx));
            };

            let sensor: Object = object_create.call((prototype,))?;
            sensor.set(HANDLE, id)?;
            Ok(sensor.into_value())
        },
    )
}

fn close_function<'js, D: NativeDriver>(
    ctx: &Ctx<'js>,
    sensors: &SharableSensorTable<D>,
) -> rquickjs::Result<Function<'js>> {
    let sensors = sensors.clone();
    Function::new(ctx.clone(), move |this: This<Object<'js>>| {
        match sensor_id(&this) {
            Some(id) => {
                lock(&sensors).close(id);
            }
            None => log::warn!("close called on an object without a HC-SR04 handle"),
        }
    })
}

fn get_echo_function<'js, D: NativeDriver>(
    ctx: &Ctx<'js>,
    sensors: &SharableSensorTable<D>,
) -> rquickjs::Result<Function<'js>> {
    let sensors = sensors.clone();
    Function::new(ctx.clone(), move |this: This<Object<'js>>| -> i32 {
        with_sensor(&sensors, &this, ECHO_FAILURE, |sensor| sensor.get_echo())
    })
}

/// `compensated` is false for the reduced method set, whose `getDistance`
/// ignores any temperature it receives
fn get_distance_function<'js, D: NativeDriver>(
    ctx: &Ctx<'js>,
    sensors: &SharableSensorTable<D>,
    compensated: bool,
) -> rquickjs::Result<Function<'js>> {
    let sensors = sensors.clone();
    Function::new(
        ctx.clone(),
        move |this: This<Object<'js>>, temperature: Opt<Value<'js>>| -> rquickjs::Result<f64> {
            let temperature = if compensated { optional_float(temperature)? } else { None };
            let distance =
                with_sensor(&sensors, &this, f32::NAN, |sensor| sensor.read_distance(temperature));
            Ok(distance as f64)
        },
    )
}

fn get_avg_distance_function<'js, D: NativeDriver>(
    ctx: &Ctx<'js>,
    sensors: &SharableSensorTable<D>,
) -> rquickjs::Result<Function<'js>> {
    let sensors = sensors.clone();
    Function::new(
        ctx.clone(),
        move |this: This<Object<'js>>,
              attempts_count: Opt<Value<'js>>,
              attempts_delay: Opt<Value<'js>>,
              temperature: Opt<Value<'js>>|
              -> rquickjs::Result<f64> {
            let attempts_count = int_or(attempts_count, DEFAULT_ATTEMPTS_COUNT)?;
            let attempts_delay = int_or(attempts_delay, DEFAULT_ATTEMPTS_DELAY)?;
            let temperature = optional_float(temperature)?;
            let distance = with_sensor(&sensors, &this, f32::NAN, |sensor| {
                sensor.read_avg_distance(attempts_count, attempts_delay, temperature)
            });
            Ok(distance as f64)
        },
    )
}

/// Runs `read` on the sensor behind `this`. Objects whose id is not open get
/// `failure` without reaching the native driver.
fn with_sensor<'js, D: NativeDriver, T>(
    sensors: &SharableSensorTable<D>,
    this: &This<Object<'js>>,
    failure: T,
    read: impl FnOnce(&HCSR04<D>) -> T,
) -> T {
    let Some(id) = sensor_id(this) else {
        return failure;
    };
    lock(sensors).get(id).map(read).unwrap_or(failure)
}

fn sensor_id<'js>(this: &This<Object<'js>>) -> Option<u32> {
    this.0.get::<_, Option<u32>>(HANDLE).ok().flatten()
}

fn truthy<'js>(value: &Opt<Value<'js>>) -> rquickjs::Result<bool> {
    match &value.0 {
        Some(value) => Ok(value.get::<Coerced<bool>>()?.0),
        None => Ok(false),
    }
}

fn int_arg<'js>(value: Opt<Value<'js>>) -> rquickjs::Result<i32> {
    match value.0 {
        Some(value) => Ok(value.get::<Coerced<i32>>()?.0),
        None => Ok(0),
    }
}

/// Falsy values mean "not given", as `value || default` does in scripts.
/// A truthy value is converted as is, so `0.5` reaches the driver as 0.
fn int_or<'js>(value: Opt<Value<'js>>, default: i32) -> rquickjs::Result<i32> {
    if truthy(&value)? {
        int_arg(value)
    } else {
        Ok(default)
    }
}

/// A truthy temperature is always `Some`, even when it narrows to 0 or NaN
fn optional_float<'js>(value: Opt<Value<'js>>) -> rquickjs::Result<Option<f32>> {
    if !truthy(&value)? {
        return Ok(None);
    }
    match value.0 {
        Some(value) => Ok(Some(value.get::<Coerced<f64>>()?.0 as f32)),
        None => Ok(None),
    }
}
