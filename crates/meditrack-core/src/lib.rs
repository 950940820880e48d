pub mod config;
pub mod error;
pub mod logging;

pub mod api;
pub mod assemble;
pub mod devices;
pub mod flight;
pub mod http;
pub mod loading;
pub mod model;
pub mod organization;
pub mod registration;
pub mod relatives;
pub mod session;
pub mod storage;

pub use error::ApiError;
