pub mod dtos;
pub mod handlers;
pub mod transfers;

pub use transfers::PlayerTransfersParser;
