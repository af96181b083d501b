// src/catalog.rs
//! Hardcoded movie and social data. Nothing here is fetched.
use crate::models::{Friend, FriendRequest, Movie, Presence, RecentMovie};
use chrono::NaiveDate;

pub const GENRES: [&str; 10] = [
    "Action",
    "Comedy",
    "Drama",
    "Horror",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "Documentary",
    "Animation",
    "Adventure",
];

pub const MOODS: [&str; 6] = ["Happy", "Sad", "Excited", "Relaxed", "Adventurous", "Nostalgic"];

pub const TONES: [&str; 6] = [
    "Light & Fun",
    "Dark & Serious",
    "Inspirational",
    "Mysterious",
    "Romantic",
    "Mind-bending",
];

fn movie(id: i64, title: &str, year: i32, genre: &str, runtime: &str, summary: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        year,
        genre: genre.to_string(),
        runtime: runtime.to_string(),
        summary: summary.to_string(),
    }
}

pub fn suggested_movies() -> Vec<Movie> {
    vec![
        movie(
            1,
            "Dune",
            2021,
            "Sci-Fi",
            "155 min",
            "Paul Atreides leads nomadic tribes in a revolt against the galactic emperor who destroyed his family and controls the desert planet Arrakis.",
        ),
        movie(
            2,
            "The French Dispatch",
            2021,
            "Comedy",
            "107 min",
            "A love letter to journalists set in an outpost of an American newspaper in a fictional 20th-century French city.",
        ),
        movie(
            3,
            "No Time to Die",
            2021,
            "Action",
            "163 min",
            "James Bond has left active service when his friend Felix Leiter enlists his help to search for a missing scientist.",
        ),
        movie(
            4,
            "Everything Everywhere All at Once",
            2022,
            "Sci-Fi",
            "139 min",
            "A middle-aged Chinese immigrant is swept up in an insane adventure, where she alone can save existence.",
        ),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn recent(title: &str, rating: u8, watch_date: NaiveDate) -> RecentMovie {
    RecentMovie {
        title: title.to_string(),
        rating,
        watch_date,
    }
}

pub fn starter_friends() -> Vec<Friend> {
    vec![
        Friend {
            id: 1,
            name: "Sarah Chen".to_string(),
            email: "sarah@example.com".to_string(),
            presence: Presence::Online,
            movies_watched: 45,
            avg_rating: 4.2,
            last_active: "2 hours ago".to_string(),
            recent_movies: vec![
                recent("Oppenheimer", 5, date(2024, 1, 20)),
                recent("Barbie", 4, date(2024, 1, 18)),
            ],
        },
        Friend {
            id: 2,
            name: "Mike Johnson".to_string(),
            email: "mike@example.com".to_string(),
            presence: Presence::Offline,
            movies_watched: 32,
            avg_rating: 3.8,
            last_active: "1 day ago".to_string(),
            recent_movies: vec![
                recent("Dune", 5, date(2024, 1, 19)),
                recent("Spider-Man: No Way Home", 4, date(2024, 1, 17)),
            ],
        },
        Friend {
            id: 3,
            name: "Emma Davis".to_string(),
            email: "emma@example.com".to_string(),
            presence: Presence::Online,
            movies_watched: 67,
            avg_rating: 4.5,
            last_active: "30 minutes ago".to_string(),
            recent_movies: vec![
                recent("Everything Everywhere All at Once", 5, date(2024, 1, 21)),
                recent("The Menu", 4, date(2024, 1, 19)),
            ],
        },
    ]
}

pub fn starter_requests() -> Vec<FriendRequest> {
    vec![
        FriendRequest {
            id: 1,
            name: "Alex Rodriguez".to_string(),
            email: "alex@example.com".to_string(),
            mutual_friends: 2,
            request_date: date(2024, 1, 20),
        },
        FriendRequest {
            id: 2,
            name: "Lisa Wang".to_string(),
            email: "lisa@example.com".to_string(),
            mutual_friends: 1,
            request_date: date(2024, 1, 19),
        },
    ]
}
