pub mod clubs;
pub mod dtos;
pub mod handlers;

pub use clubs::CompetitionClubsParser;
