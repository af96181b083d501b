// src/session.rs
use crate::catalog;
use crate::error::{SessionError, SessionResult, StorageError};
use crate::models::{Movie, SavedMovie, Suggestion, User, Validate, WatchHistoryEntry, MAX_RATING};
use crate::pages::{Page, SuggestionFilters};
use crate::storage::{self, KeyValueStore, SAVED_MOVIES_KEY, USER_KEY, WATCH_HISTORY_KEY};

use chrono::{Local, NaiveDate, Utc};

/// Every state change the view layer can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login(Option<User>),
    Logout,
    Navigate(Page),
    RequestSuggestions(SuggestionFilters),
    AddToWatchHistory(Movie),
    UpdateRating { id: i64, rating: u8 },
    RemoveFromHistory(i64),
    ToggleSaved(i64),
    UpdateUser(Option<User>),
    Reset,
}

/// Issues timestamp-derived ids that never repeat, even within the same
/// millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn seeded(last: i64) -> Self {
        IdGenerator { last }
    }

    pub fn next_at(&mut self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    pub fn next(&mut self) -> i64 {
        self.next_at(Utc::now().timestamp_millis())
    }
}

/// What happened while rehydrating from storage.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub user_restored: bool,
    pub history_len: usize,
    pub saved_len: usize,
    /// Set when stored data was unreadable and every key was cleared.
    pub corruption: Option<StorageError>,
}

struct Restored {
    user: Option<User>,
    watch_history: Vec<WatchHistoryEntry>,
    saved_movies: Vec<SavedMovie>,
}

fn read_all<S: KeyValueStore>(store: &S) -> Result<Restored, StorageError> {
    Ok(Restored {
        user: storage::read_record(store, USER_KEY)?,
        watch_history: storage::read_record(store, WATCH_HISTORY_KEY)?.unwrap_or_default(),
        saved_movies: storage::read_record(store, SAVED_MOVIES_KEY)?.unwrap_or_default(),
    })
}

/// The single owner of application state. The store is the durable mirror of
/// the user, the watch history and the saved movies.
pub struct Session<S: KeyValueStore> {
    store: S,
    user: Option<User>,
    authenticated: bool,
    page: Page,
    suggestions: Vec<Suggestion>,
    watch_history: Vec<WatchHistoryEntry>,
    saved_movies: Vec<SavedMovie>,
    ids: IdGenerator,
    storage_warning: Option<StorageError>,
}

impl<S: KeyValueStore> Session<S> {
    /// A blank session that has not looked at the store.
    pub fn new(store: S) -> Self {
        Session {
            store,
            user: None,
            authenticated: false,
            page: Page::Login,
            suggestions: Vec::new(),
            watch_history: Vec::new(),
            saved_movies: Vec::new(),
            ids: IdGenerator::default(),
            storage_warning: None,
        }
    }

    /// Rehydrates from `store`. Unreadable data clears all three keys and the
    /// session starts empty.
    pub fn load(store: S) -> (Self, LoadReport) {
        let mut session = Session::new(store);
        let mut report = LoadReport::default();
        log::info!("Loading session from storage");

        match read_all(&session.store) {
            Ok(restored) => {
                if let Some(user) = restored.user {
                    log::info!("Restored signed-in user {}", user.email);
                    session.user = Some(user);
                    session.authenticated = true;
                    session.page = Page::Home;
                    report.user_restored = true;
                }
                session.watch_history = restored.watch_history;
                session.saved_movies = restored.saved_movies;
                report.history_len = session.watch_history.len();
                report.saved_len = session.saved_movies.len();
            }
            Err(e) => {
                log::error!("Stored data is corrupt ({}). Clearing all saved keys.", e);
                if let Err(clear_err) = storage::clear_all(&mut session.store) {
                    log::error!("Failed to clear corrupt data: {}", clear_err);
                }
                report.corruption = Some(e);
            }
        }

        let max_id = session.watch_history.iter().map(|e| e.id).max().unwrap_or(0);
        session.ids = IdGenerator::seeded(max_id);
        log::info!(
            "Session loaded: user={}, {} history entries, {} saved movies",
            report.user_restored,
            report.history_len,
            report.saved_len
        );
        (session, report)
    }

    pub fn dispatch(&mut self, action: Action) -> SessionResult<()> {
        log::debug!("Dispatching {:?}", action);
        match action {
            Action::Login(user) => self.login(user),
            Action::Logout => self.logout(),
            Action::Navigate(page) => return self.navigate(page),
            Action::RequestSuggestions(filters) => return self.request_suggestions(&filters),
            Action::AddToWatchHistory(movie) => {
                self.add_to_watch_history(&movie);
            }
            Action::UpdateRating { id, rating } => return self.update_rating(id, rating),
            Action::RemoveFromHistory(id) => self.remove_from_history(id),
            Action::ToggleSaved(id) => return self.toggle_saved(id),
            Action::UpdateUser(user) => return self.update_user(user),
            Action::Reset => self.reset(),
        }
        Ok(())
    }

    pub fn login(&mut self, user: Option<User>) {
        let Some(user) = user else {
            log::debug!("Login skipped: no user given");
            return;
        };
        log::info!("User {} signed in", user.email);
        self.authenticated = true;
        self.page = Page::Home;
        self.persist_user(&user);
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        log::info!("User signed out");
        self.user = None;
        self.authenticated = false;
        self.page = Page::Login;
        if let Err(e) = self.store.remove_item(USER_KEY) {
            log::error!("Failed to remove stored user: {}", e);
            self.storage_warning = Some(e);
        }
    }

    pub fn navigate(&mut self, page: Page) -> SessionResult<()> {
        match (self.authenticated, page) {
            (false, Page::Login) => {}
            (false, _) => {
                log::warn!("Refused navigation to {:?} while signed out", page);
                return Err(SessionError::NotAuthenticated);
            }
            (true, Page::Login) => {
                log::warn!("Refused navigation to the login page while signed in");
                return Err(SessionError::AlreadyAuthenticated);
            }
            (true, _) => {}
        }
        self.page = page;
        Ok(())
    }

    pub fn request_suggestions(&mut self, filters: &SuggestionFilters) -> SessionResult<()> {
        if !filters.has_selection() {
            return Err(SessionError::NoPreferences);
        }
        self.suggestions = catalog::suggested_movies()
            .into_iter()
            .map(|movie| {
                let saved = self.is_saved(movie.id);
                Suggestion {
                    saved,
                    ..Suggestion::new(movie)
                }
            })
            .collect();
        log::info!("Generated {} suggestions for {:?}", self.suggestions.len(), filters);
        Ok(())
    }

    /// Records `movie` as watched today and returns the new entry's id.
    pub fn add_to_watch_history(&mut self, movie: &Movie) -> i64 {
        let today = Local::now().date_naive();
        self.add_to_watch_history_on(movie, today)
    }

    pub fn add_to_watch_history_on(&mut self, movie: &Movie, watch_date: NaiveDate) -> i64 {
        let id = self.ids.next();
        self.watch_history
            .insert(0, WatchHistoryEntry::from_movie(id, movie, watch_date));
        self.suggestions.retain(|s| s.movie.id != movie.id);
        log::info!("Added '{}' to watch history as {}", movie.title, id);
        self.persist_watch_history();
        id
    }

    pub fn update_rating(&mut self, id: i64, rating: u8) -> SessionResult<()> {
        if rating > MAX_RATING {
            return Err(SessionError::RatingOutOfRange(rating));
        }
        match self.watch_history.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.rating = rating;
                log::info!("Rated history entry {} with {} stars", id, rating);
                self.persist_watch_history();
            }
            None => log::debug!("No history entry {} to rate", id),
        }
        Ok(())
    }

    pub fn remove_from_history(&mut self, id: i64) {
        let before = self.watch_history.len();
        self.watch_history.retain(|e| e.id != id);
        if self.watch_history.len() != before {
            log::info!("Removed history entry {}", id);
            self.persist_watch_history();
        }
    }

    pub fn toggle_saved(&mut self, movie_id: i64) -> SessionResult<()> {
        if self.is_saved(movie_id) {
            self.saved_movies.retain(|m| m.movie.id != movie_id);
            if let Some(s) = self.suggestions.iter_mut().find(|s| s.movie.id == movie_id) {
                s.saved = false;
            }
            log::info!("Unsaved movie {}", movie_id);
        } else {
            let suggestion = self
                .suggestions
                .iter_mut()
                .find(|s| s.movie.id == movie_id)
                .ok_or_else(|| {
                    log::warn!("Toggle refused: movie {} is not suggested", movie_id);
                    SessionError::UnknownMovie(movie_id)
                })?;
            suggestion.saved = true;
            self.saved_movies.push(SavedMovie::from(&*suggestion));
            log::info!("Saved movie {}", movie_id);
        }
        self.persist_saved_movies();
        Ok(())
    }

    /// Replaces the signed-in user. A record that would not load back (such
    /// as a blank email) is refused so it never reaches storage.
    pub fn update_user(&mut self, user: Option<User>) -> SessionResult<()> {
        let Some(user) = user else {
            log::debug!("Profile update skipped: no user given");
            return Ok(());
        };
        if !self.authenticated {
            log::warn!("Profile update ignored while signed out");
            return Ok(());
        }
        user.validate().map_err(|message| {
            log::warn!("Profile update refused: {}", message);
            SessionError::InvalidProfile(message)
        })?;
        self.persist_user(&user);
        self.user = Some(user);
        Ok(())
    }

    /// Wipes the stored keys and every bit of in-memory state.
    pub fn reset(&mut self) {
        log::warn!("Resetting all application data");
        if let Err(e) = storage::clear_all(&mut self.store) {
            self.storage_warning = Some(e);
        }
        self.user = None;
        self.authenticated = false;
        self.page = Page::Login;
        self.suggestions.clear();
        self.watch_history.clear();
        self.saved_movies.clear();
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn watch_history(&self) -> &[WatchHistoryEntry] {
        &self.watch_history
    }

    pub fn saved_movies(&self) -> &[SavedMovie] {
        &self.saved_movies
    }

    pub fn history_entry(&self, id: i64) -> Option<&WatchHistoryEntry> {
        self.watch_history.iter().find(|e| e.id == id)
    }

    pub fn is_saved(&self, movie_id: i64) -> bool {
        self.saved_movies.iter().any(|m| m.movie.id == movie_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The last failed write, if any. Clears it.
    pub fn take_storage_warning(&mut self) -> Option<StorageError> {
        self.storage_warning.take()
    }

    fn persist_user(&mut self, user: &User) {
        if let Err(e) = storage::write_record(&mut self.store, USER_KEY, user) {
            log::error!("Failed to save user: {}", e);
            self.storage_warning = Some(e);
        }
    }

    fn persist_watch_history(&mut self) {
        let result = if self.watch_history.is_empty() {
            self.store.remove_item(WATCH_HISTORY_KEY)
        } else {
            storage::write_record(&mut self.store, WATCH_HISTORY_KEY, &self.watch_history)
        };
        if let Err(e) = result {
            log::error!("Failed to save watch history: {}", e);
            self.storage_warning = Some(e);
        }
    }

    fn persist_saved_movies(&mut self) {
        let result = if self.saved_movies.is_empty() {
            self.store.remove_item(SAVED_MOVIES_KEY)
        } else {
            storage::write_record(&mut self.store, SAVED_MOVIES_KEY, &self.saved_movies)
        };
        if let Err(e) = result {
            log::error!("Failed to save saved movies: {}", e);
            self.storage_warning = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_ENTRY_ID;
    use crate::storage::{FileStore, MemoryStore};
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn test_user() -> User {
        User {
            id: 1700000000000,
            name: "a".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    fn any_genre() -> SuggestionFilters {
        let mut filters = SuggestionFilters::default();
        filters.toggle_genre("Sci-Fi");
        filters
    }

    fn signed_in() -> Session<MemoryStore> {
        let mut session = Session::new(MemoryStore::new());
        session.login(Some(test_user()));
        session
    }

    fn dune() -> Movie {
        Movie {
            id: 7,
            title: "Dune".to_string(),
            year: 2021,
            genre: "Sci-Fi".to_string(),
            runtime: "155 min".to_string(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_id_generator_never_repeats() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.next_at(100), 100);
        assert_eq!(ids.next_at(100), 101);
        assert_eq!(ids.next_at(50), 102);
        assert_eq!(ids.next_at(500), 500);
    }

    #[test]
    fn test_history_is_most_recent_first_with_unique_ids() {
        let mut session = signed_in();
        let mut ids = Vec::new();
        for i in 0..20 {
            let mut movie = dune();
            movie.id = i;
            movie.title = format!("Movie {}", i);
            ids.push(session.add_to_watch_history(&movie));
        }
        let history = session.watch_history();
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].title, "Movie 19");
        assert_eq!(history[19].title, "Movie 0");
        let unique: HashSet<i64> = history.iter().map(|e| e.id).collect();
        assert_eq!(unique.len(), 20);
        assert!(history.iter().all(|e| e.rating == 0));
    }

    #[test]
    fn test_add_to_history_removes_suggestion() {
        let mut session = signed_in();
        session.request_suggestions(&any_genre()).unwrap();
        let first = session.suggestions()[0].movie.clone();
        session.add_to_watch_history(&first);
        assert!(session.suggestions().iter().all(|s| s.movie.id != first.id));
        assert_eq!(session.suggestions().len(), catalog::suggested_movies().len() - 1);
    }

    #[test]
    fn test_update_rating_touches_only_target() {
        let mut session = signed_in();
        let a = session.add_to_watch_history(&dune());
        let b = session.add_to_watch_history(&dune());
        session.update_rating(a, 4).unwrap();
        assert_eq!(session.history_entry(a).unwrap().rating, 4);
        assert_eq!(session.history_entry(b).unwrap().rating, 0);

        // Unknown id is a no-op.
        session.update_rating(12345, 3).unwrap();
        assert_eq!(session.history_entry(b).unwrap().rating, 0);

        assert_eq!(session.update_rating(a, 6), Err(SessionError::RatingOutOfRange(6)));
        assert_eq!(session.history_entry(a).unwrap().rating, 4);
    }

    #[test]
    fn test_remove_from_history_is_idempotent() {
        let mut session = signed_in();
        let a = session.add_to_watch_history(&dune());
        session.add_to_watch_history(&dune());
        session.remove_from_history(a);
        assert_eq!(session.watch_history().len(), 1);
        session.remove_from_history(a);
        assert_eq!(session.watch_history().len(), 1);
    }

    #[test]
    fn test_add_rate_remove_scenario_leaves_history_empty() {
        let mut session = signed_in();
        let id = session.add_to_watch_history(&dune());
        session
            .dispatch(Action::UpdateRating { id, rating: 5 })
            .unwrap();
        assert_eq!(session.history_entry(id).unwrap().rating, 5);
        session.dispatch(Action::RemoveFromHistory(id)).unwrap();
        assert!(session.watch_history().is_empty());
        assert!(!session.store().contains_key(WATCH_HISTORY_KEY));
    }

    #[test]
    fn test_toggle_saved_twice_restores_state() {
        let mut session = signed_in();
        session.request_suggestions(&any_genre()).unwrap();
        let id = session.suggestions()[1].movie.id;

        session.toggle_saved(id).unwrap();
        assert!(session.suggestions()[1].saved);
        assert_eq!(session.saved_movies().len(), 1);
        assert!(session.saved_movies()[0].saved);
        assert!(session.store().contains_key(SAVED_MOVIES_KEY));

        session.toggle_saved(id).unwrap();
        assert!(!session.suggestions()[1].saved);
        assert!(session.saved_movies().is_empty());
        assert!(!session.store().contains_key(SAVED_MOVIES_KEY));
    }

    #[test]
    fn test_toggle_saved_after_regeneration_unsaves_by_id() {
        let mut session = signed_in();
        session.request_suggestions(&any_genre()).unwrap();
        let id = session.suggestions()[0].movie.id;
        session.toggle_saved(id).unwrap();

        session.request_suggestions(&any_genre()).unwrap();
        assert!(session.suggestions()[0].saved, "regenerated suggestion keeps saved flag");

        // Unsave even when the movie is no longer suggested.
        let watched = session.suggestions()[0].movie.clone();
        session.add_to_watch_history(&watched);
        session.toggle_saved(id).unwrap();
        assert!(session.saved_movies().is_empty());
    }

    #[test]
    fn test_toggle_saved_rejects_unknown_movie() {
        let mut session = signed_in();
        assert_eq!(session.toggle_saved(99), Err(SessionError::UnknownMovie(99)));
        assert!(session.saved_movies().is_empty());
    }

    #[test]
    fn test_request_suggestions_requires_a_preference() {
        let mut session = signed_in();
        assert_eq!(
            session.request_suggestions(&SuggestionFilters::default()),
            Err(SessionError::NoPreferences)
        );
        let mut filters = SuggestionFilters::default();
        filters.select_mood("Happy");
        session.request_suggestions(&filters).unwrap();
        assert_eq!(session.suggestions().len(), 4);
        assert!(session.suggestions().iter().all(|s| !s.saved && s.rating == 0));
    }

    #[test]
    fn test_login_and_logout() {
        let mut session = Session::new(MemoryStore::new());
        session.login(None);
        assert!(!session.is_authenticated());
        assert!(!session.store().contains_key(USER_KEY));

        session.login(Some(test_user()));
        assert!(session.is_authenticated());
        assert_eq!(session.page(), Page::Home);
        assert!(session.store().contains_key(USER_KEY));

        session.add_to_watch_history(&dune());
        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(session.page(), Page::Login);
        assert!(!session.store().contains_key(USER_KEY));
        assert!(session.store().contains_key(WATCH_HISTORY_KEY));
    }

    #[test]
    fn test_navigation_guards() {
        let mut session = Session::new(MemoryStore::new());
        assert_eq!(session.navigate(Page::History), Err(SessionError::NotAuthenticated));
        assert_eq!(session.page(), Page::Login);

        session.login(Some(test_user()));
        for page in Page::AUTHENTICATED {
            session.navigate(page).unwrap();
            assert_eq!(session.page(), page);
        }
        assert_eq!(session.navigate(Page::Login), Err(SessionError::AlreadyAuthenticated));
    }

    #[test]
    fn test_update_user_persists_and_skips_none() {
        let mut session = signed_in();
        session.update_user(None).unwrap();
        assert_eq!(session.user(), Some(&test_user()));

        let renamed = User { name: "Ada".to_string(), ..test_user() };
        session.update_user(Some(renamed.clone())).unwrap();
        assert_eq!(session.user(), Some(&renamed));

        let (reloaded, _) = Session::load(session.store().clone());
        assert_eq!(reloaded.user(), Some(&renamed));
    }

    #[test]
    fn test_update_user_refuses_blank_email_and_keeps_data() {
        let mut session = signed_in();
        session.add_to_watch_history(&dune());
        let blanked = User { email: "  ".to_string(), ..test_user() };

        assert!(matches!(
            session.dispatch(Action::UpdateUser(Some(blanked))),
            Err(SessionError::InvalidProfile(_))
        ));
        assert_eq!(session.user(), Some(&test_user()));

        let (reloaded, report) = Session::load(session.store().clone());
        assert!(report.corruption.is_none());
        assert_eq!(reloaded.user(), Some(&test_user()));
        assert_eq!(reloaded.watch_history().len(), 1);
    }

    #[test]
    fn test_load_restores_everything() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(FileStore::new(dir.path()));
        session.login(Some(test_user()));
        let id = session.add_to_watch_history(&dune());
        session.update_rating(id, 3).unwrap();
        session.request_suggestions(&any_genre()).unwrap();
        session.toggle_saved(2).unwrap();

        let (reloaded, report) = Session::load(FileStore::new(dir.path()));
        assert!(report.user_restored);
        assert!(report.corruption.is_none());
        assert_eq!(reloaded.page(), Page::Home);
        assert_eq!(reloaded.watch_history(), session.watch_history());
        assert_eq!(reloaded.saved_movies(), session.saved_movies());
        assert!(reloaded.suggestions().is_empty());
    }

    #[test]
    fn test_load_new_ids_stay_above_restored_ones() {
        let mut session = signed_in();
        session.ids = IdGenerator::seeded(MAX_ENTRY_ID - 10);
        let old = session.add_to_watch_history(&dune());

        let (mut reloaded, _) = Session::load(session.store().clone());
        let new = reloaded.add_to_watch_history(&dune());
        assert!(new > old);
    }

    #[test]
    fn test_load_clears_out_of_range_history_id() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                WATCH_HISTORY_KEY,
                r#"[{"id":9223372036854775807,"title":"Dune","year":2021,"genre":"Sci-Fi","runtime":"155 min","summary":"","watchDate":"2024-01-20","rating":0}]"#,
            )
            .unwrap();

        let (mut session, report) = Session::load(store);
        assert!(report.corruption.is_some());
        assert!(session.watch_history().is_empty());
        let id = session.add_to_watch_history(&dune());
        assert!(id > 0);
    }

    #[test]
    fn test_id_generator_saturates_instead_of_overflowing() {
        let mut ids = IdGenerator::seeded(i64::MAX);
        assert_eq!(ids.next_at(100), i64::MAX);
    }

    #[test]
    fn test_load_treats_sentinels_as_absent() {
        let mut store = MemoryStore::new();
        store.set_item(USER_KEY, "null").unwrap();
        store.set_item(WATCH_HISTORY_KEY, "undefined").unwrap();
        let (session, report) = Session::load(store);
        assert!(!session.is_authenticated());
        assert!(report.corruption.is_none());
        assert!(session.watch_history().is_empty());
    }

    #[test]
    fn test_load_clears_all_keys_on_corruption() {
        let mut store = MemoryStore::new();
        storage::write_record(&mut store, USER_KEY, &test_user()).unwrap();
        store.set_item(SAVED_MOVIES_KEY, "[{\"broken\": true}]").unwrap();
        store.set_item(WATCH_HISTORY_KEY, "[]").unwrap();

        let (session, report) = Session::load(store);
        assert!(report.corruption.is_some());
        assert!(!session.is_authenticated());
        assert_eq!(session.page(), Page::Login);
        for key in storage::ALL_KEYS {
            assert!(!session.store().contains_key(key), "{} should be cleared", key);
        }
    }

    #[test]
    fn test_clearing_history_then_reloading_yields_empty() {
        let mut session = signed_in();
        let id = session.add_to_watch_history(&dune());
        session.remove_from_history(id);
        let (reloaded, report) = Session::load(session.store().clone());
        assert!(report.corruption.is_none());
        assert!(reloaded.watch_history().is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut session = Session::new(MemoryStore::with_quota(200));
        session.login(Some(test_user()));
        assert!(session.take_storage_warning().is_none());

        let mut big = dune();
        big.summary = "x".repeat(500);
        let id = session.add_to_watch_history(&big);
        assert_eq!(session.history_entry(id).map(|e| e.title.as_str()), Some("Dune"));
        assert!(matches!(
            session.take_storage_warning(),
            Some(StorageError::QuotaExceeded { .. })
        ));
        assert!(!session.store().contains_key(WATCH_HISTORY_KEY));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = signed_in();
        session.add_to_watch_history(&dune());
        session.request_suggestions(&any_genre()).unwrap();
        session.toggle_saved(1).unwrap();

        session.dispatch(Action::Reset).unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.page(), Page::Login);
        assert!(session.watch_history().is_empty());
        assert!(session.saved_movies().is_empty());
        assert!(session.suggestions().is_empty());
        for key in storage::ALL_KEYS {
            assert!(!session.store().contains_key(key));
        }
    }
}
