pub mod dtos;
pub mod handlers;
pub mod managers;
pub mod players;
pub mod profile;

pub use managers::ClubManagersParser;
pub use players::ClubPlayersParser;
pub use profile::ClubProfileParser;
