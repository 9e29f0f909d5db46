pub mod contracts;
pub mod dtos;
pub mod handlers;
pub mod profile;

pub use contracts::ManagerContractsParser;
pub use profile::ManagerProfileParser;
