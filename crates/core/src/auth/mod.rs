//! Authentication helpers: password hashing and registration rules.

mod password;
mod registration;

pub use password::{PasswordError, hash_password, verify_password};
pub use registration::{
    MAX_USERNAME_LEN, MIN_PASSWORD_LEN, RegistrationError, validate_email, validate_registration,
    validate_username,
};
