use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::bag::TileBag;
use super::board::Board;
use super::error::GameError;
use super::rack::{Rack, RACK_SIZE};

pub type PlayerId = String;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub rack: Rack,
    pub score: i32,
    #[serde(default)]
    pub hint_used: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Finished,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Finished => "finished",
        }
    }
}

/// Stored as the winner's id, or the literal `"draw"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Winner {
    Player(PlayerId),
    Draw,
}

const DRAW: &str = "draw";

impl From<String> for Winner {
    fn from(value: String) -> Self {
        if value == DRAW {
            Winner::Draw
        } else {
            Winner::Player(value)
        }
    }
}

impl From<Winner> for String {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Player(id) => id,
            Winner::Draw => DRAW.to_string(),
        }
    }
}

/// The whole state of one match. Every turn replaces it with a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub players: [PlayerId; 2],
    pub player_data: BTreeMap<PlayerId, PlayerData>,
    pub board: Board,
    pub tile_bag: TileBag,
    pub current_turn: PlayerId,
    pub status: GameStatus,
    #[serde(default)]
    pub consecutive_passes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
}

impl GameSession {
    /// Deals seven tiles to each player in seat order. The first seat moves first.
    pub fn start(first: &str, second: &str, bag: TileBag) -> Result<Self, GameError> {
        if first.is_empty() || second.is_empty() || first == second {
            return Err(GameError::InvalidPlayers);
        }

        let (first_tiles, bag) = bag.draw(RACK_SIZE);
        let (second_tiles, bag) = bag.draw(RACK_SIZE);

        let mut player_data = BTreeMap::new();
        player_data.insert(
            first.to_string(),
            PlayerData {
                rack: Rack::new(first_tiles),
                ..Default::default()
            },
        );
        player_data.insert(
            second.to_string(),
            PlayerData {
                rack: Rack::new(second_tiles),
                ..Default::default()
            },
        );

        Ok(Self {
            players: [first.to_string(), second.to_string()],
            player_data,
            board: Board::new(),
            tile_bag: bag,
            current_turn: first.to_string(),
            status: GameStatus::Active,
            consecutive_passes: 0,
            winner: None,
        })
    }

    pub fn is_participant(&self, uid: &str) -> bool {
        self.players.iter().any(|p| p == uid)
    }

    pub fn opponent_of(&self, uid: &str) -> Option<&str> {
        match &self.players {
            [a, b] if a == uid => Some(b),
            [a, b] if b == uid => Some(a),
            _ => None,
        }
    }

    pub fn player(&self, uid: &str) -> Option<&PlayerData> {
        self.player_data.get(uid)
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    /// Participant, then turn, then status: the order refusals are reported in.
    pub fn ensure_can_act(&self, uid: &str) -> Result<(), GameError> {
        if !self.is_participant(uid) {
            return Err(GameError::NotAParticipant);
        }
        if self.current_turn != uid {
            return Err(GameError::NotYourTurn);
        }
        if !self.is_active() {
            return Err(GameError::GameNotActive);
        }
        Ok(())
    }

    /// Tiles in the bag, on the board and in both racks.
    pub fn tile_count(&self) -> usize {
        self.tile_bag.len()
            + self.board.len()
            + self.player_data.values().map(|d| d.rack.len()).sum::<usize>()
    }

    pub(crate) fn hand_turn_to_opponent(&mut self, uid: &str) {
        if let Some(next) = self.opponent_of(uid) {
            self.current_turn = next.to_string();
        }
    }

    /// Highest stored score wins; equal scores draw.
    pub fn leader(&self) -> Winner {
        let [first, second] = &self.players;
        let score = |uid: &str| self.player(uid).map(|d| d.score).unwrap_or_default();

        match score(first).cmp(&score(second)) {
            std::cmp::Ordering::Greater => Winner::Player(first.clone()),
            std::cmp::Ordering::Less => Winner::Player(second.clone()),
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }

    pub(crate) fn finish(&mut self) {
        self.status = GameStatus::Finished;
        self.winner = Some(self.leader());
    }

    /// The player who went out collects the face value of the opponent's rack,
    /// and the opponent loses the same amount.
    pub(crate) fn finish_with_empty_rack(&mut self, emptier: &str) {
        if let Some(opponent) = self.opponent_of(emptier).map(str::to_string) {
            let leftover = self.player(&opponent).map(|d| d.rack.value()).unwrap_or(0) as i32;
            if let Some(data) = self.player_data.get_mut(&opponent) {
                data.score -= leftover;
            }
            if let Some(data) = self.player_data.get_mut(emptier) {
                data.score += leftover;
            }
        }
        self.finish();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(document: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(document)
    }
}
