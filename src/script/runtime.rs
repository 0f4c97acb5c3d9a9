use rquickjs::{convert::Coerced, Context, Ctx, FromJs, Runtime};

use super::{install, ScriptConfig, ScriptError, SharableSensorTable};
use crate::driver::NativeDriver;

/// JavaScript runtime with the HC-SR04 binding already installed
pub struct ScriptRuntime<D: NativeDriver> {
    context: Context,
    _runtime: Runtime,
    sensors: SharableSensorTable<D>,
}

impl<D: NativeDriver> ScriptRuntime<D> {
    /// Creates a runtime and installs the binding on its global object.
    ///
    /// # Returns
    ///
    /// The new ScriptRuntime, or the ScriptError that stopped the installation
    pub fn new(driver: D, config: ScriptConfig) -> Result<ScriptRuntime<D>, ScriptError> {
        let runtime = Runtime::new()?;
        let context = Context::full(&runtime)?;
        let sensors = context.with(|ctx| install(&ctx, driver, &config))?;
        Ok(ScriptRuntime { context, _runtime: runtime, sensors })
    }

    /// Evaluates `source` and converts the value of its last expression
    pub fn eval<T>(&self, source: &str) -> Result<T, ScriptError>
    where
        T: for<'js> FromJs<'js>,
    {
        self.context.with(|ctx| {
            ctx.eval::<T, _>(source).map_err(|err| script_error(&ctx, err))
        })
    }

    /// Amount of sensors opened from scripts and not closed yet
    pub fn open_sensors(&self) -> usize {
        super::sensor_table::lock(&self.sensors).len()
    }
}

fn script_error(ctx: &Ctx<'_>, err: rquickjs::Error) -> ScriptError {
    if !matches!(err, rquickjs::Error::Exception) {
        return ScriptError::Engine(err);
    }
    let thrown = ctx.catch();
    let message = match thrown.as_exception() {
        Some(exception) => exception.message(),
        None => thrown.get::<Coerced<String>>().ok().map(|message| message.0),
    };
    ScriptError::Exception(message.unwrap_or_default())
}
