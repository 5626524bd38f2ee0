use jiff::Timestamp;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Characters used for join codes. Leaves out 0/O and 1/I so codes can be read aloud.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const CODE_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("room is finished")]
    Finished,
    #[error("cannot move room from {from} to {to}")]
    InvalidTransition { from: RoomStatus, to: RoomStatus },
    #[error("nickname must not be empty")]
    EmptyNickname,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Active,
    Finished,
}

impl RoomStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Active => "active",
            RoomStatus::Finished => "finished",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub code: String,
    pub status: RoomStatus,
    pub majority_threshold: f64,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(majority_threshold: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: generate_code(),
            status: RoomStatus::Waiting,
            majority_threshold,
            created_at: Timestamp::now(),
        }
    }

    pub fn start(&mut self) -> Result<(), RoomError> {
        self.transition(RoomStatus::Active)
    }

    /// Ends the room. Allowed from `waiting` too, for rooms abandoned before play.
    pub fn finish(&mut self) -> Result<(), RoomError> {
        self.transition(RoomStatus::Finished)
    }

    pub fn is_finished(&self) -> bool {
        self.status == RoomStatus::Finished
    }

    fn transition(&mut self, to: RoomStatus) -> Result<(), RoomError> {
        match (self.status, to) {
            (RoomStatus::Finished, _) => Err(RoomError::Finished),
            (RoomStatus::Waiting, RoomStatus::Active)
            | (RoomStatus::Waiting, RoomStatus::Finished)
            | (RoomStatus::Active, RoomStatus::Finished) => {
                self.status = to;
                Ok(())
            },
            (from, to) => Err(RoomError::InvalidTransition { from, to }),
        }
    }
}

pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN).map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomMember {
    pub id: Uuid,
    pub room_id: Uuid,
    pub nickname: String,
    pub joined_at: Timestamp,
}

impl RoomMember {
    pub fn new(room_id: Uuid, nickname: &str) -> Result<Self, RoomError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(RoomError::EmptyNickname);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            room_id,
            nickname: nickname.to_string(),
            joined_at: Timestamp::now(),
        })
    }
}

/// A movie in a room's pool, in the order members swipe through it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomMovie {
    pub id: Uuid,
    pub room_id: Uuid,
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub vote_average: f64,
    pub display_order: u32,
}

/// A [`RoomMovie`] before it has been placed in a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieInsert {
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub vote_average: f64,
}

impl MovieInsert {
    pub fn into_room_movie(self, room_id: Uuid, display_order: u32) -> RoomMovie {
        RoomMovie {
            id: Uuid::new_v4(),
            room_id,
            tmdb_id: self.tmdb_id,
            title: self.title,
            poster_url: self.poster_url,
            overview: self.overview,
            genres: self.genres,
            vote_average: self.vote_average,
            display_order,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub room_id: Uuid,
    pub movie_id: Uuid,
    pub member_id: Uuid,
    pub liked: bool,
    pub voted_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub room_id: Uuid,
    pub movie_id: Uuid,
    pub matched_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct PoolQuery {
    pub count: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub majority_threshold: f64,
    pub movie_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedRoom {
    pub room: Room,
    pub movies: Vec<RoomMovie>,
}
