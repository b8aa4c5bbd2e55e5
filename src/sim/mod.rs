pub mod board;
pub mod peer;

pub use board::SimBoard;
pub use peer::{spawn_peer, PeerCommand};
