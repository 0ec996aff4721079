use thiserror::Error;

/// Errors that can occur while registering a system with the scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SystemRegistrationError {
    #[error("system '{name}' is already registered")]
    DuplicateName { name: String },
}
