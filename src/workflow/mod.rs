pub mod vote_flow;

pub use vote_flow::{DispatchStats, VoteFlow};
