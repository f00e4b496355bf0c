pub mod aave;
pub mod silo;

pub use aave::{AaveLending, LendingPool};
pub use silo::{CollateralType, SiloLending, SiloRouter, SiloVault};
