pub mod binding_error;
