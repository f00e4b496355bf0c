pub mod balance;
pub mod cli;
pub mod error;
pub mod example;
pub mod logging;
pub mod model;
pub mod run;
pub mod validate;
pub mod venues;

pub use error::{Result, RotationError};
