pub mod bag;
pub mod board;
pub mod bot;
pub mod conversion;
pub mod directions;
pub mod error;
pub mod rack;
pub mod scoring;
pub mod session;
pub mod tile;
pub mod trie;
pub mod turn;

pub use bag::TileBag;
pub use board::Board;
pub use conversion::*;
pub use error::GameError;
pub use rack::Rack;
pub use scoring::Scorer;
pub use session::{GameSession, GameStatus, PlayerData, PlayerId, Winner};
pub use tile::{PlacedTile, Tile};
pub use trie::Trie;
pub use turn::{BotSettings, Transition, TurnEngine, TurnOutcome, DEFAULT_BOT_ID};
