// src/pages.rs
//! The six pages and the transient state each one keeps while it is on
//! screen. Nothing in here is persisted.
use crate::catalog;
use crate::models::{Friend, FriendRequest, Presence, User, WatchHistoryEntry};
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Login,
    Home,
    Suggestions,
    History,
    Friends,
    Profile,
}

impl Page {
    /// Pages reachable once signed in, in header order.
    pub const AUTHENTICATED: [Page; 5] = [
        Page::Home,
        Page::Suggestions,
        Page::History,
        Page::Friends,
        Page::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Login => "Sign In",
            Page::Home => "Home",
            Page::Suggestions => "Suggestions",
            Page::History => "History",
            Page::Friends => "Friends",
            Page::Profile => "Profile",
        }
    }

    /// Header hotkey (1-5) for the authenticated pages.
    pub fn from_hotkey(key: char) -> Option<Page> {
        let index = key.to_digit(10)?.checked_sub(1)? as usize;
        Page::AUTHENTICATED.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFormError {
    #[error("Please fill in all required fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub show_password: bool,
}

impl AuthForm {
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
    }

    /// Fields shown for the current mode, top to bottom.
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::SignIn => &[AuthField::Email, AuthField::Password],
            AuthMode::SignUp => &[
                AuthField::Name,
                AuthField::Email,
                AuthField::Password,
                AuthField::ConfirmPassword,
            ],
        }
    }

    pub fn field_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Name => &mut self.name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    pub fn field(&self, field: AuthField) -> &str {
        match field {
            AuthField::Name => &self.name,
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn submit(&self) -> Result<User, AuthFormError> {
        self.submit_at(Utc::now().timestamp_millis())
    }

    /// Builds the user record. The name falls back to the part of the email
    /// before '@'.
    pub fn submit_at(&self, now_ms: i64) -> Result<User, AuthFormError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(AuthFormError::MissingFields);
        }
        if self.mode == AuthMode::SignUp && self.password != self.confirm_password {
            return Err(AuthFormError::PasswordMismatch);
        }
        let name = match self.name.trim() {
            "" => email.split('@').next().unwrap_or(email).to_string(),
            given => given.to_string(),
        };
        Ok(User {
            id: now_ms,
            name,
            email: email.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionFilters {
    pub genres: Vec<String>,
    pub mood: Option<String>,
    pub tone: Option<String>,
    pub custom: String,
}

impl SuggestionFilters {
    pub fn toggle_genre(&mut self, genre: &str) {
        if let Some(pos) = self.genres.iter().position(|g| g == genre) {
            self.genres.remove(pos);
        } else {
            self.genres.push(genre.to_string());
        }
    }

    pub fn select_mood(&mut self, mood: &str) {
        self.mood = Some(mood.to_string());
    }

    pub fn select_tone(&mut self, tone: &str) {
        self.tone = Some(tone.to_string());
    }

    /// Suggestions can only be requested once something is picked.
    pub fn has_selection(&self) -> bool {
        !self.genres.is_empty() || self.mood.is_some() || self.tone.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistorySort {
    #[default]
    Recent,
    Title,
    Rating,
}

impl HistorySort {
    pub fn next(self) -> Self {
        match self {
            HistorySort::Recent => HistorySort::Title,
            HistorySort::Title => HistorySort::Rating,
            HistorySort::Rating => HistorySort::Recent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistorySort::Recent => "most recent",
            HistorySort::Title => "title",
            HistorySort::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    pub search: String,
    pub sort: HistorySort,
}

impl HistoryView {
    /// Entries matching the search, in display order.
    pub fn visible<'a>(&self, history: &'a [WatchHistoryEntry]) -> Vec<&'a WatchHistoryEntry> {
        let needle = self.search.to_lowercase();
        let mut entries: Vec<&WatchHistoryEntry> = history
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.title.to_lowercase().contains(&needle)
                    || e.genre.to_lowercase().contains(&needle)
            })
            .collect();
        match self.sort {
            HistorySort::Recent => {} // stored newest first
            HistorySort::Title => entries.sort_by_key(|e| e.title.to_lowercase()),
            HistorySort::Rating => entries.sort_by(|a, b| b.rating.cmp(&a.rating)),
        }
        entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FriendsTab {
    #[default]
    Friends,
    Requests,
    Add,
}

impl FriendsTab {
    pub fn next(self) -> Self {
        match self {
            FriendsTab::Friends => FriendsTab::Requests,
            FriendsTab::Requests => FriendsTab::Add,
            FriendsTab::Add => FriendsTab::Friends,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FriendsBook {
    pub tab: FriendsTab,
    pub search: String,
    pub new_friend_email: String,
    friends: Vec<Friend>,
    requests: Vec<FriendRequest>,
    next_id: i64,
}

impl Default for FriendsBook {
    fn default() -> Self {
        FriendsBook::new(catalog::starter_friends(), catalog::starter_requests())
    }
}

impl FriendsBook {
    pub fn new(friends: Vec<Friend>, requests: Vec<FriendRequest>) -> Self {
        let next_id = friends.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        FriendsBook {
            tab: FriendsTab::default(),
            search: String::new(),
            new_friend_email: String::new(),
            friends,
            requests,
            next_id,
        }
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn requests(&self) -> &[FriendRequest] {
        &self.requests
    }

    /// Friends whose name or email contains the search text.
    pub fn filtered(&self) -> Vec<&Friend> {
        let needle = self.search.to_lowercase();
        self.friends
            .iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&needle) || f.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn accept_request(&mut self, request_id: i64) -> Option<&Friend> {
        let pos = self.requests.iter().position(|r| r.id == request_id)?;
        let request = self.requests.remove(pos);
        log::info!("Accepted friend request from {}", request.email);
        self.friends.push(Friend {
            id: self.next_id,
            name: request.name,
            email: request.email,
            presence: Presence::Offline,
            movies_watched: 0,
            avg_rating: 0.0,
            last_active: "Just joined".to_string(),
            recent_movies: Vec::new(),
        });
        self.next_id += 1;
        self.friends.last()
    }

    pub fn reject_request(&mut self, request_id: i64) {
        self.requests.retain(|r| r.id != request_id);
    }

    pub fn remove_friend(&mut self, friend_id: i64) {
        self.friends.retain(|f| f.id != friend_id);
    }

    /// Returns the address the request went to. Blank input sends nothing.
    pub fn send_request(&mut self) -> Option<String> {
        let email = self.new_friend_email.trim().to_string();
        if email.is_empty() {
            return None;
        }
        log::info!("Friend request sent to {}", email);
        self.new_friend_email.clear();
        Some(email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileSection {
    #[default]
    Account,
    Preferences,
    Privacy,
    Social,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 4] = [
        ProfileSection::Account,
        ProfileSection::Preferences,
        ProfileSection::Privacy,
        ProfileSection::Social,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileSection::Account => "Account Info",
            ProfileSection::Preferences => "Preferences",
            ProfileSection::Privacy => "Privacy",
            ProfileSection::Social => "Social",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPrefs {
    pub email: bool,
    pub push: bool,
    pub friend_requests: bool,
    pub movie_recommendations: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        NotificationPrefs {
            email: true,
            push: false,
            friend_requests: true,
            movie_recommendations: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Email,
    Push,
    FriendRequests,
    MovieRecommendations,
}

impl NotificationPrefs {
    pub fn toggle(&mut self, which: Notification) {
        let flag = match which {
            Notification::Email => &mut self.email,
            Notification::Push => &mut self.push,
            Notification::FriendRequests => &mut self.friend_requests,
            Notification::MovieRecommendations => &mut self.movie_recommendations,
        };
        *flag = !*flag;
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub section: ProfileSection,
    pub notifications: NotificationPrefs,
    pub password: PasswordChange,
    pub delete_requested: bool,
}

impl ProfileForm {
    /// A copy of `user` with the edited name; feed it to `update_user`.
    pub fn with_name(user: &User, name: &str) -> User {
        User {
            name: name.to_string(),
            ..user.clone()
        }
    }

    pub fn with_email(user: &User, email: &str) -> User {
        User {
            email: email.to_string(),
            ..user.clone()
        }
    }

    pub fn submit_password(&mut self) -> Result<(), AuthFormError> {
        if self.password.new.is_empty() {
            return Err(AuthFormError::MissingFields);
        }
        if self.password.new != self.password.confirm {
            return Err(AuthFormError::PasswordMismatch);
        }
        log::info!("Password change accepted");
        self.password = PasswordChange::default();
        Ok(())
    }

    pub fn request_account_deletion(&mut self) {
        log::warn!("Account deletion requested");
        self.delete_requested = true;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeStats {
    pub watched: usize,
    pub saved: usize,
    pub avg_rating: f64,
}

impl HomeStats {
    pub fn compute(history: &[WatchHistoryEntry], saved: usize) -> Self {
        let avg_rating = if history.is_empty() {
            0.0
        } else {
            history.iter().map(|e| f64::from(e.rating)).sum::<f64>() / history.len() as f64
        };
        HomeStats {
            watched: history.len(),
            saved,
            avg_rating,
        }
    }

    pub fn avg_rating_label(&self) -> String {
        format!("{:.1}", self.avg_rating)
    }
}
