use crate::{script::ScriptError, sensors::HCSR04Error};

#[derive(Debug)]
pub enum BindingError{
    HCSR04Error(HCSR04Error),
    ScriptError(ScriptError)
}

impl From<HCSR04Error> for BindingError {
    fn from(value: HCSR04Error) -> Self {
        BindingError::HCSR04Error(value)
    }
}

impl From<ScriptError> for BindingError {
    fn from(value: ScriptError) -> Self {
        BindingError::ScriptError(value)
    }
}
