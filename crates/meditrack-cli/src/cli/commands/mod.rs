//! CLI command handlers, one per file.

mod alerts;
mod assign;
mod caregivers;
mod devices;
mod doctors;
mod logout;
mod measurements;
mod relative;
mod seniors;
mod sign_in;
mod sign_up;
mod users;
mod whoami;

pub use alerts::run_alerts;
pub use assign::run_assign;
pub use caregivers::run_caregivers;
pub use devices::run_devices;
pub use doctors::run_doctors;
pub use logout::run_logout;
pub use measurements::run_measurements;
pub use relative::run_relative;
pub use seniors::run_seniors;
pub use sign_in::run_sign_in;
pub use sign_up::{run_sign_up, SignUpArgs};
pub use users::run_users;
pub use whoami::run_whoami;
