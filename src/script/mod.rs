mod binding;
mod runtime;
mod sensor_table;

pub use binding::install;
pub use runtime::ScriptRuntime;
pub use sensor_table::{SensorTable, SharableSensorTable};

/// Name of the global object scripts use when nothing else is configured
pub const DEFAULT_GLOBAL_NAME: &str = "HCSR04";

#[derive(Debug)]
pub enum ScriptError {
    DriverInitFailed,
    /// A script threw, with the message of what it threw
    Exception(String),
    Engine(rquickjs::Error),
}

/// Methods every sensor object gets from the shared prototype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodSet {
    /// `close`, `getEcho`, `getDistance(temperature)` and
    /// `getAvgDistance(attemptsCount, attemptsDelay, temperature)`
    #[default]
    Full,
    /// Only `close` and an uncompensated `getDistance()`
    DistanceOnly,
}

#[derive(Debug, Clone)]
pub struct ScriptConfig {
    pub global_name: String,
    pub methods: MethodSet,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig { global_name: DEFAULT_GLOBAL_NAME.to_string(), methods: MethodSet::Full }
    }
}

impl ScriptConfig {
    pub fn global_name(mut self, global_name: impl Into<String>) -> Self {
        self.global_name = global_name.into();
        self
    }

    pub fn methods(mut self, methods: MethodSet) -> Self {
        self.methods = methods;
        self
    }
}

impl From<rquickjs::Error> for ScriptError {
    fn from(value: rquickjs::Error) -> Self {
        ScriptError::Engine(value)
    }
}
