pub mod error;
pub mod registry;
pub mod reports;
pub mod service;
pub mod storage;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

pub use error::RaffleError;
pub use registry::{RaffleRegistry, RaffleRegistryFactory};
pub use reports::{RaffleReports, RaffleReportsFactory};
pub use service::{RaffleService, RaffleServiceFactory};
pub use types::*;
