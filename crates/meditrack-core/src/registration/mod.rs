//! Pending registrations: the sign-up command, its role-conditional validator and
//! the multi-step flow holder that collects fields before submission.

mod command;
mod flow;
mod validate;

pub use command::{Payment, RegistrationData, SignUpCommand};
pub use flow::RegistrationFlow;
pub use validate::{is_valid_email, ValidationOutcome, MIN_PASSWORD_LEN};
