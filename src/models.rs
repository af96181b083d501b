// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_RATING: u8 = 5;

/// Ids are epoch milliseconds; anything past 9999-12-31 is not one of ours.
pub const MAX_ENTRY_ID: i64 = 253_402_300_799_999;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A catalog movie as shown on the suggestions page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub runtime: String,
    pub summary: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    #[serde(flatten)]
    pub movie: Movie,
    pub rating: u8, // placeholder, never read
    pub saved: bool,
}

impl Suggestion {
    pub fn new(movie: Movie) -> Self {
        Suggestion {
            movie,
            rating: 0,
            saved: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub saved: bool,
}

impl From<&Suggestion> for SavedMovie {
    fn from(suggestion: &Suggestion) -> Self {
        SavedMovie {
            movie: suggestion.movie.clone(),
            saved: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub runtime: String,
    pub summary: String,
    pub watch_date: NaiveDate,
    pub rating: u8,
}

impl WatchHistoryEntry {
    pub fn from_movie(id: i64, movie: &Movie, watch_date: NaiveDate) -> Self {
        WatchHistoryEntry {
            id,
            title: movie.title.clone(),
            year: movie.year,
            genre: movie.genre.clone(),
            runtime: movie.runtime.clone(),
            summary: movie.summary.clone(),
            watch_date,
            rating: 0,
        }
    }
}

/// Shape checks applied to records read back from storage, on top of what
/// serde already enforces.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for User {
    fn validate(&self) -> Result<(), String> {
        if self.id <= 0 {
            return Err(format!("user id must be positive, got {}", self.id));
        }
        if self.email.trim().is_empty() {
            return Err("user email is empty".to_string());
        }
        Ok(())
    }
}

impl Validate for WatchHistoryEntry {
    fn validate(&self) -> Result<(), String> {
        if self.id <= 0 || self.id > MAX_ENTRY_ID {
            return Err(format!("history entry id {} is out of range", self.id));
        }
        if self.rating > MAX_RATING {
            return Err(format!("history entry {} has rating {}", self.id, self.rating));
        }
        Ok(())
    }
}

impl Validate for SavedMovie {
    fn validate(&self) -> Result<(), String> {
        if !self.saved {
            return Err(format!("saved movie {} is not flagged saved", self.movie.id));
        }
        Ok(())
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentMovie {
    pub title: String,
    pub rating: u8,
    pub watch_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Friend {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub presence: Presence,
    pub movies_watched: u32,
    pub avg_rating: f32,
    pub last_active: String,
    pub recent_movies: Vec<RecentMovie>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub mutual_friends: u32,
    pub request_date: NaiveDate,
}
