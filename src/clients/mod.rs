pub mod pingo_client;

pub use pingo_client::PingoClient;
