// src/tui.rs
use crate::catalog::{GENRES, MOODS, TONES};
use crate::config::Config;
use crate::error::{AppResult, TuiError};
use crate::pages::{
    AuthField, AuthForm, AuthMode, FriendsBook, FriendsTab, HistoryView, HomeStats, Notification,
    Page, ProfileForm, ProfileSection, SuggestionFilters,
};
use crate::session::{Action, Session};
use crate::storage::FileStore;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io::{stdout, Stdout};
use std::path::Path;
use std::time::Duration;

#[derive(PartialEq, Debug, Clone, Copy)]
enum EditTarget {
    SuggestionNotes,
    HistorySearch,
    FriendSearch,
    FriendEmail,
    ProfileName,
    ProfileEmail,
    NewPassword,
    ConfirmPassword,
}

impl EditTarget {
    fn label(self) -> &'static str {
        match self {
            EditTarget::SuggestionNotes => "Anything specific?",
            EditTarget::HistorySearch => "Search history",
            EditTarget::FriendSearch => "Search friends",
            EditTarget::FriendEmail => "Friend's email",
            EditTarget::ProfileName => "Full name",
            EditTarget::ProfileEmail => "Email",
            EditTarget::NewPassword => "New password",
            EditTarget::ConfirmPassword => "Confirm new password",
        }
    }

    fn masked(self) -> bool {
        matches!(self, EditTarget::NewPassword | EditTarget::ConfirmPassword)
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
enum InputMode {
    Normal,
    Editing(EditTarget),
}

#[derive(PartialEq, Debug, Clone, Copy, Default)]
enum FilterFocus {
    #[default]
    Genres,
    Moods,
    Tones,
    Results,
}

impl FilterFocus {
    fn next(self) -> Self {
        match self {
            FilterFocus::Genres => FilterFocus::Moods,
            FilterFocus::Moods => FilterFocus::Tones,
            FilterFocus::Tones => FilterFocus::Results,
            FilterFocus::Results => FilterFocus::Genres,
        }
    }

    fn prev(self) -> Self {
        match self {
            FilterFocus::Genres => FilterFocus::Results,
            FilterFocus::Moods => FilterFocus::Genres,
            FilterFocus::Tones => FilterFocus::Moods,
            FilterFocus::Results => FilterFocus::Tones,
        }
    }
}

pub struct App {
    should_quit: bool,
    session: Session<FileStore>,
    config: Config,
    app_status: String,
    input_mode: InputMode,
    current_input_value: String,
    auth: AuthForm,
    auth_field_index: usize,
    filters: SuggestionFilters,
    filter_focus: FilterFocus,
    filter_index: usize,
    suggestion_state: ListState,
    history_view: HistoryView,
    history_state: ListState,
    friends: FriendsBook,
    friends_state: ListState,
    profile: ProfileForm,
}

fn move_selection(state: &mut ListState, len: usize, delta: i32) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as i32;
    let new_index = (current + delta).clamp(0, len as i32 - 1);
    state.select(Some(new_index as usize));
}

fn clamp_selection(state: &mut ListState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        _ => {}
    }
}

impl App {
    pub fn new(session: Session<FileStore>, config: Config) -> Self {
        App {
            should_quit: false,
            session,
            config,
            app_status: String::new(),
            input_mode: InputMode::Normal,
            current_input_value: String::new(),
            auth: AuthForm::default(),
            auth_field_index: 0,
            filters: SuggestionFilters::default(),
            filter_focus: FilterFocus::default(),
            filter_index: 0,
            suggestion_state: ListState::default(),
            history_view: HistoryView::default(),
            history_state: ListState::default(),
            friends: FriendsBook::default(),
            friends_state: ListState::default(),
            profile: ProfileForm::default(),
        }
    }

    /// Sends `action` to the session and turns the outcome into a status line.
    fn apply(&mut self, action: Action, success: impl Into<String>) {
        match self.session.dispatch(action) {
            Ok(()) => self.app_status = success.into(),
            Err(e) => {
                log::warn!("Action refused: {}", e);
                self.app_status = e.to_string();
            }
        }
        if let Some(e) = self.session.take_storage_warning() {
            self.app_status = format!("{} (not saved: {})", self.app_status, e);
        }
    }

    fn navigate(&mut self, page: Page) {
        self.apply(Action::Navigate(page), format!("{} page", page.title()));
        self.history_view = HistoryView::default();
        self.friends.search.clear();
        clamp_selection(&mut self.history_state, self.session.watch_history().len());
        clamp_selection(&mut self.suggestion_state, self.session.suggestions().len());
    }

    pub fn on_key(&mut self, key_event: KeyEvent) {
        log::debug!("Key event received: {:?}", key_event);
        if let InputMode::Editing(target) = self.input_mode {
            self.on_edit_key(target, key_event.code);
            return;
        }
        if self.session.page() == Page::Login {
            self.on_login_key(key_event.code);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(page) = Page::from_hotkey(c) {
                    self.navigate(page);
                }
            }
            KeyCode::Char('L') => {
                self.apply(Action::Logout, "Logged out.");
                self.auth = AuthForm::default();
                self.auth_field_index = 0;
            }
            KeyCode::Char('R') if self.config.debug_tools_enabled() => {
                self.apply(Action::Reset, "All data cleared.");
                self.filters = SuggestionFilters::default();
                self.friends = FriendsBook::default();
                self.profile = ProfileForm::default();
            }
            code => match self.session.page() {
                Page::Suggestions => self.on_suggestions_key(code),
                Page::History => self.on_history_key(code),
                Page::Friends => self.on_friends_key(code),
                Page::Profile => self.on_profile_key(code),
                Page::Home | Page::Login => {}
            },
        }
    }

    fn on_login_key(&mut self, code: KeyCode) {
        let fields = self.auth.fields();
        let field = fields[self.auth_field_index.min(fields.len() - 1)];
        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(2) => {
                self.auth.toggle_mode();
                self.auth_field_index = 0;
            }
            KeyCode::F(3) => self.auth.show_password = !self.auth.show_password,
            KeyCode::Tab | KeyCode::Down => {
                self.auth_field_index = (self.auth_field_index + 1) % fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.auth_field_index = (self.auth_field_index + fields.len() - 1) % fields.len();
            }
            KeyCode::Char(c) => self.auth.field_mut(field).push(c),
            KeyCode::Backspace => {
                self.auth.field_mut(field).pop();
            }
            KeyCode::Enter => match self.auth.submit() {
                Ok(user) => {
                    let name = user.name.clone();
                    self.apply(Action::Login(Some(user)), format!("Welcome back, {}!", name));
                    self.auth = AuthForm::default();
                    self.auth_field_index = 0;
                }
                Err(e) => self.app_status = e.to_string(),
            },
            _ => {}
        }
    }

    fn begin_edit(&mut self, target: EditTarget, initial: String) {
        self.input_mode = InputMode::Editing(target);
        self.current_input_value = initial;
        log::info!("Switched to InputMode::Editing({:?})", target);
    }

    fn on_edit_key(&mut self, target: EditTarget, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.current_input_value.push(c),
            KeyCode::Backspace => {
                self.current_input_value.pop();
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.current_input_value.clear();
                self.app_status = "Edit cancelled.".to_string();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let value = std::mem::take(&mut self.current_input_value);
                self.commit_edit(target, value);
            }
            _ => {}
        }
    }

    fn commit_edit(&mut self, target: EditTarget, value: String) {
        match target {
            EditTarget::SuggestionNotes => self.filters.custom = value,
            EditTarget::HistorySearch => {
                self.history_view.search = value;
                self.history_state.select(Some(0));
            }
            EditTarget::FriendSearch => {
                self.friends.search = value;
                self.friends_state.select(Some(0));
            }
            EditTarget::FriendEmail => {
                self.friends.new_friend_email = value;
                self.app_status = match self.friends.send_request() {
                    Some(email) => format!("Friend request sent to {}", email),
                    None => "Enter an email address first.".to_string(),
                };
            }
            EditTarget::ProfileName | EditTarget::ProfileEmail => {
                let updated = self.session.user().map(|user| {
                    if target == EditTarget::ProfileName {
                        ProfileForm::with_name(user, &value)
                    } else {
                        ProfileForm::with_email(user, &value)
                    }
                });
                self.apply(Action::UpdateUser(updated), "Profile updated.");
            }
            EditTarget::NewPassword => {
                self.profile.password.new = value;
                self.begin_edit(EditTarget::ConfirmPassword, String::new());
            }
            EditTarget::ConfirmPassword => {
                self.profile.password.confirm = value;
                self.app_status = match self.profile.submit_password() {
                    Ok(()) => "Password updated successfully".to_string(),
                    Err(e) => e.to_string(),
                };
            }
        }
    }

    fn filter_options(&self) -> &'static [&'static str] {
        match self.filter_focus {
            FilterFocus::Genres => &GENRES,
            FilterFocus::Moods => &MOODS,
            FilterFocus::Tones => &TONES,
            FilterFocus::Results => &[],
        }
    }

    fn selected_suggestion_id(&self) -> Option<i64> {
        let idx = self.suggestion_state.selected()?;
        self.session.suggestions().get(idx).map(|s| s.movie.id)
    }

    fn on_suggestions_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('l') | KeyCode::Right => {
                self.filter_focus = self.filter_focus.next();
                self.filter_index = 0;
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.filter_focus = self.filter_focus.prev();
                self.filter_index = 0;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.filter_focus == FilterFocus::Results {
                    move_selection(&mut self.suggestion_state, self.session.suggestions().len(), 1);
                } else {
                    let len = self.filter_options().len();
                    self.filter_index = (self.filter_index + 1).min(len.saturating_sub(1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.filter_focus == FilterFocus::Results {
                    move_selection(&mut self.suggestion_state, self.session.suggestions().len(), -1);
                } else {
                    self.filter_index = self.filter_index.saturating_sub(1);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(option) = self.filter_options().get(self.filter_index).copied() {
                    match self.filter_focus {
                        FilterFocus::Genres => self.filters.toggle_genre(option),
                        FilterFocus::Moods => self.filters.select_mood(option),
                        FilterFocus::Tones => self.filters.select_tone(option),
                        FilterFocus::Results => {}
                    }
                }
            }
            KeyCode::Char('/') => {
                let current = self.filters.custom.clone();
                self.begin_edit(EditTarget::SuggestionNotes, current);
            }
            KeyCode::Char('g') => {
                self.apply(
                    Action::RequestSuggestions(self.filters.clone()),
                    "Here are some movies for you.",
                );
                if !self.session.suggestions().is_empty() {
                    self.filter_focus = FilterFocus::Results;
                    self.suggestion_state.select(Some(0));
                }
            }
            KeyCode::Char('w') => {
                let movie = self
                    .suggestion_state
                    .selected()
                    .and_then(|i| self.session.suggestions().get(i))
                    .map(|s| s.movie.clone());
                if let Some(movie) = movie {
                    let title = movie.title.clone();
                    self.apply(Action::AddToWatchHistory(movie), format!("'{}' marked as watched.", title));
                    clamp_selection(&mut self.suggestion_state, self.session.suggestions().len());
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_suggestion_id() {
                    let msg = if self.session.is_saved(id) { "Removed from saved." } else { "Saved for later." };
                    self.apply(Action::ToggleSaved(id), msg);
                }
            }
            _ => {}
        }
    }

    fn selected_history_id(&self) -> Option<i64> {
        let idx = self.history_state.selected()?;
        self.history_view
            .visible(self.session.watch_history())
            .get(idx)
            .map(|e| e.id)
    }

    fn on_history_key(&mut self, code: KeyCode) {
        let visible_len = self.history_view.visible(self.session.watch_history()).len();
        match code {
            KeyCode::Char('j') | KeyCode::Down => move_selection(&mut self.history_state, visible_len, 1),
            KeyCode::Char('k') | KeyCode::Up => move_selection(&mut self.history_state, visible_len, -1),
            KeyCode::Char('+') | KeyCode::Char('-') => {
                if let Some(id) = self.selected_history_id() {
                    let current = self.session.history_entry(id).map_or(0, |e| e.rating);
                    let rating = if code == KeyCode::Char('+') {
                        (current + 1).min(crate::models::MAX_RATING)
                    } else {
                        current.saturating_sub(1)
                    };
                    self.apply(Action::UpdateRating { id, rating }, format!("Rated {} stars.", rating));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_history_id() {
                    self.apply(Action::RemoveFromHistory(id), "Removed from history.");
                    let len = self.history_view.visible(self.session.watch_history()).len();
                    clamp_selection(&mut self.history_state, len);
                }
            }
            KeyCode::Char('o') => {
                self.history_view.sort = self.history_view.sort.next();
                self.app_status = format!("Sorted by {}", self.history_view.sort.label());
            }
            KeyCode::Char('/') => {
                let current = self.history_view.search.clone();
                self.begin_edit(EditTarget::HistorySearch, current);
            }
            _ => {}
        }
    }

    fn on_friends_key(&mut self, code: KeyCode) {
        let len = match self.friends.tab {
            FriendsTab::Friends => self.friends.filtered().len(),
            FriendsTab::Requests => self.friends.requests().len(),
            FriendsTab::Add => 0,
        };
        match code {
            KeyCode::Tab => {
                self.friends.tab = self.friends.tab.next();
                self.friends_state.select(Some(0));
            }
            KeyCode::Char('j') | KeyCode::Down => move_selection(&mut self.friends_state, len, 1),
            KeyCode::Char('k') | KeyCode::Up => move_selection(&mut self.friends_state, len, -1),
            KeyCode::Char('/') if self.friends.tab == FriendsTab::Friends => {
                let current = self.friends.search.clone();
                self.begin_edit(EditTarget::FriendSearch, current);
            }
            KeyCode::Char('d') if self.friends.tab == FriendsTab::Friends => {
                let selected = self
                    .friends_state
                    .selected()
                    .and_then(|i| self.friends.filtered().get(i).map(|f| (f.id, f.name.clone())));
                if let Some((id, name)) = selected {
                    self.friends.remove_friend(id);
                    self.app_status = format!("Removed {} from friends.", name);
                    clamp_selection(&mut self.friends_state, self.friends.filtered().len());
                }
            }
            KeyCode::Char('a') | KeyCode::Char('x') if self.friends.tab == FriendsTab::Requests => {
                let selected = self
                    .friends_state
                    .selected()
                    .and_then(|i| self.friends.requests().get(i).map(|r| (r.id, r.name.clone())));
                if let Some((id, name)) = selected {
                    if code == KeyCode::Char('a') {
                        self.friends.accept_request(id);
                        self.app_status = format!("You and {} are now friends.", name);
                    } else {
                        self.friends.reject_request(id);
                        self.app_status = format!("Declined {}.", name);
                    }
                    clamp_selection(&mut self.friends_state, self.friends.requests().len());
                }
            }
            KeyCode::Char('e') | KeyCode::Enter if self.friends.tab == FriendsTab::Add => {
                let current = self.friends.new_friend_email.clone();
                self.begin_edit(EditTarget::FriendEmail, current);
            }
            _ => {}
        }
    }

    fn on_profile_key(&mut self, code: KeyCode) {
        if code == KeyCode::Tab {
            let pos = ProfileSection::ALL
                .iter()
                .position(|s| *s == self.profile.section)
                .unwrap_or(0);
            self.profile.section = ProfileSection::ALL[(pos + 1) % ProfileSection::ALL.len()];
            return;
        }
        match (self.profile.section, code) {
            (ProfileSection::Account, KeyCode::Char('n')) => {
                let current = self.session.user().map(|u| u.name.clone()).unwrap_or_default();
                self.begin_edit(EditTarget::ProfileName, current);
            }
            (ProfileSection::Account, KeyCode::Char('e')) => {
                let current = self.session.user().map(|u| u.email.clone()).unwrap_or_default();
                self.begin_edit(EditTarget::ProfileEmail, current);
            }
            (ProfileSection::Account, KeyCode::Char('D')) => {
                self.profile.request_account_deletion();
                self.app_status =
                    "Account deletion requested. Please check your email for confirmation.".to_string();
            }
            (ProfileSection::Preferences, KeyCode::Char(c)) => {
                let which = match c {
                    'e' => Notification::Email,
                    'p' => Notification::Push,
                    'f' => Notification::FriendRequests,
                    'm' => Notification::MovieRecommendations,
                    _ => return,
                };
                self.profile.notifications.toggle(which);
            }
            (ProfileSection::Privacy, KeyCode::Char('p')) => {
                self.begin_edit(EditTarget::NewPassword, String::new());
            }
            _ => {}
        }
    }

    fn accent(&self) -> Color {
        if self.config.is_dark() {
            Color::Cyan
        } else {
            Color::Blue
        }
    }
}

pub fn run_tui(data_dir: &Path, config: Config) -> AppResult<()> {
    log::info!("Initializing TUI with data in {:?}...", data_dir);
    let (session, report) = Session::load(FileStore::new(data_dir));

    enable_raw_mode().map_err(|e| { log::error!("Failed to enable raw mode: {}", e); TuiError::Io(e) })?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| { log::error!("Failed to setup terminal screen: {}", e); TuiError::Io(e) })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| { log::error!("Failed to create terminal: {}", e); TuiError::Io(e) })?;

    let mut app = App::new(session, config);
    app.app_status = match (&report.corruption, app.session.user()) {
        (Some(e), _) => format!("Stored data was corrupt and has been cleared: {}", e),
        (None, Some(user)) => format!("Welcome back, {}!", user.name),
        (None, None) => "Sign in to start tracking movies.".to_string(),
    };

    log::info!("Starting TUI application loop.");
    let res = run_app_loop(&mut terminal, &mut app);
    log::info!("TUI application loop finished.");

    disable_raw_mode().map_err(|e| { log::error!("Failed to disable raw mode: {}", e); TuiError::Io(e) })?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(|e| { log::error!("Failed to restore terminal screen: {}", e); TuiError::Io(e) })?;

    res?;
    log::info!("TUI shutdown complete.");
    Ok(())
}

fn run_app_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<(), TuiError> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app)).map_err(|e| { log::error!("Terminal draw error: {}", e); TuiError::Io(e) })?;

        if event::poll(Duration::from_millis(100)).map_err(|e| { log::error!("Event poll error: {}", e); TuiError::Io(e) })? {
            if let Event::Key(key_event) = event::read().map_err(|e| { log::error!("Event read error: {}", e); TuiError::Io(e) })? {
                if key_event.kind == KeyEventKind::Press {
                    app.on_key(key_event);
                }
            }
        }
    }
    Ok(())
}

fn stars(rating: u8) -> String {
    let filled = rating.min(crate::models::MAX_RATING) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(crate::models::MAX_RATING as usize - filled))
}

fn draw_login(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.auth.mode {
        AuthMode::SignIn => "Sign In",
        AuthMode::SignUp => "Create Account",
    };
    let form_area = centered_rect(50, 60, area);
    f.render_widget(Clear, form_area);
    f.render_widget(Block::default().title(title).borders(Borders::ALL), form_area);

    let fields = app.auth.fields();
    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(constraints)
        .split(form_area);

    for (i, field) in fields.iter().enumerate() {
        let label = match field {
            AuthField::Name => "Full name",
            AuthField::Email => "Email",
            AuthField::Password => "Password",
            AuthField::ConfirmPassword => "Confirm password",
        };
        let raw = app.auth.field(*field);
        let secret = matches!(field, AuthField::Password | AuthField::ConfirmPassword);
        let mut text = if secret && !app.auth.show_password {
            "*".repeat(raw.chars().count())
        } else {
            raw.to_string()
        };
        let focused = i == app.auth_field_index;
        if focused {
            text.push('▋');
        }
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(label))
            .style(if focused { Style::default().fg(Color::Yellow) } else { Style::default() });
        f.render_widget(paragraph, chunks[i]);
    }

    let switch = match app.auth.mode {
        AuthMode::SignIn => "(F2) Sign up instead",
        AuthMode::SignUp => "(F2) Sign in instead",
    };
    let help = format!("(Tab) Next | (Enter) Submit | (F3) Show password | {} | (Esc) Quit", switch);
    f.render_widget(
        Paragraph::new(help).alignment(Alignment::Center),
        chunks[fields.len() + 1],
    );
}

fn draw_home(f: &mut Frame, app: &App, area: Rect) {
    let stats = HomeStats::compute(app.session.watch_history(), app.session.saved_movies().len());
    let name = app.session.user().map_or("", |u| u.name.as_str());
    let lines = vec![
        Line::from(Span::styled(format!("Welcome back, {}!", name), Style::default().bold())),
        Line::from("Ready to discover your next favorite movie?"),
        Line::from(""),
        Line::from(vec![Span::styled("Movies Watched: ", Style::default().bold()), Span::raw(stats.watched.to_string())]),
        Line::from(vec![Span::styled("Saved Movies:   ", Style::default().bold()), Span::raw(stats.saved.to_string())]),
        Line::from(vec![Span::styled("Avg Rating:     ", Style::default().bold()), Span::raw(stats.avg_rating_label())]),
        Line::from(""),
        Line::from("(2) Get movie suggestions | (3) View watch history | (5) Go to profile"),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Home"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn option_list<'a>(
    title: &'a str,
    options: &'a [&'a str],
    is_selected: impl Fn(&str) -> bool,
    cursor: Option<usize>,
    accent: Color,
) -> List<'a> {
    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let mark = if is_selected(option) { "[x]" } else { "[ ]" };
            let style = if cursor == Some(i) { Style::default().fg(accent).bold() } else { Style::default() };
            ListItem::new(Span::styled(format!("{} {}", mark, option), style))
        })
        .collect();
    let border = if cursor.is_some() { Style::default().fg(accent) } else { Style::default() };
    List::new(items).block(Block::default().borders(Borders::ALL).title(title).border_style(border))
}

fn draw_suggestions(f: &mut Frame, app: &mut App, area: Rect) {
    let accent = app.accent();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Length(8), Constraint::Length(8), Constraint::Min(3)])
        .split(columns[0]);

    let cursor = |focus: FilterFocus| (app.filter_focus == focus).then_some(app.filter_index);
    let filters = &app.filters;
    f.render_widget(
        option_list("Genres", &GENRES, |g| filters.genres.iter().any(|s| s == g), cursor(FilterFocus::Genres), accent),
        left[0],
    );
    f.render_widget(
        option_list("Mood", &MOODS, |m| filters.mood.as_deref() == Some(m), cursor(FilterFocus::Moods), accent),
        left[1],
    );
    f.render_widget(
        option_list("Tone", &TONES, |t| filters.tone.as_deref() == Some(t), cursor(FilterFocus::Tones), accent),
        left[2],
    );
    let notes = Paragraph::new(filters.custom.as_str())
        .block(Block::default().borders(Borders::ALL).title("Anything specific? (/)"))
        .wrap(Wrap { trim: true });
    f.render_widget(notes, left[3]);

    let results_border = if app.filter_focus == FilterFocus::Results { Style::default().fg(accent) } else { Style::default() };
    let results_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Suggestions ({})", app.session.suggestions().len()))
        .border_style(results_border);
    if app.session.suggestions().is_empty() {
        let hint = if app.filters.has_selection() {
            "Press (g) to get suggestions."
        } else {
            "Pick a genre, mood or tone, then press (g)."
        };
        f.render_widget(Paragraph::new(hint).block(results_block).alignment(Alignment::Center), columns[1]);
        return;
    }
    let items: Vec<ListItem> = app
        .session
        .suggestions()
        .iter()
        .map(|s| {
            let heart = if s.saved { "♥" } else { "♡" };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", heart), Style::default().fg(Color::Red)),
                    Span::styled(s.movie.title.clone(), Style::default().bold()),
                    Span::raw(format!("  {} · {} · {}", s.movie.year, s.movie.genre, s.movie.runtime)),
                ]),
                Line::from(Span::raw(format!("   {}", s.movie.summary))),
            ])
        })
        .collect();
    let list = List::new(items)
        .block(results_block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, columns[1], &mut app.suggestion_state);
}

fn draw_history(f: &mut Frame, app: &mut App, area: Rect) {
    let visible = app.history_view.visible(app.session.watch_history());
    let title = if app.history_view.search.is_empty() {
        format!("Watch History ({}) sorted by {}", visible.len(), app.history_view.sort.label())
    } else {
        format!(
            "Watch History ({}) matching '{}' sorted by {}",
            visible.len(),
            app.history_view.search,
            app.history_view.sort.label()
        )
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    if visible.is_empty() {
        let text = if app.session.watch_history().is_empty() {
            "No movies watched yet. Mark suggestions as watched to see them here."
        } else {
            "No movies match your search."
        };
        f.render_widget(Paragraph::new(text).block(block).alignment(Alignment::Center), area);
        return;
    }
    let date_format = app.config.date_format.as_str();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|e| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(e.title.clone(), Style::default().bold()),
                    Span::raw("  "),
                    Span::styled(stars(e.rating), Style::default().fg(Color::Yellow)),
                ]),
                Line::from(Span::raw(format!(
                    "   {} · {} · {} · Watched {}",
                    e.year,
                    e.genre,
                    e.runtime,
                    e.watch_date.format(date_format)
                ))),
            ])
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.history_state);
}

fn draw_friends(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let request_count = app.friends.requests().len();
    let titles = vec![
        "My Friends".to_string(),
        format!("Friend Requests ({})", request_count),
        "Add Friends".to_string(),
    ];
    let selected = match app.friends.tab {
        FriendsTab::Friends => 0,
        FriendsTab::Requests => 1,
        FriendsTab::Add => 2,
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Friends (Tab to switch)"))
        .select(selected)
        .highlight_style(Style::default().fg(app.accent()).bold());
    f.render_widget(tabs, chunks[0]);

    let highlight = Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray);
    match app.friends.tab {
        FriendsTab::Friends => {
            let filtered = app.friends.filtered();
            let block = Block::default().borders(Borders::ALL).title(if app.friends.search.is_empty() {
                "(/) Search | (d) Remove".to_string()
            } else {
                format!("Matching '{}' | (/) Search | (d) Remove", app.friends.search)
            });
            if filtered.is_empty() {
                let text = if app.friends.search.is_empty() { "No friends yet" } else { "No friends found" };
                f.render_widget(Paragraph::new(text).block(block).alignment(Alignment::Center), chunks[1]);
                return;
            }
            let items: Vec<ListItem> = filtered
                .iter()
                .map(|friend| {
                    let presence = match friend.presence {
                        crate::models::Presence::Online => "Online".to_string(),
                        crate::models::Presence::Offline => format!("Last seen {}", friend.last_active),
                    };
                    let mut lines = vec![
                        Line::from(vec![
                            Span::styled(friend.name.clone(), Style::default().bold()),
                            Span::raw(format!("  <{}>  {}", friend.email, presence)),
                        ]),
                        Line::from(format!(
                            "   {} movies · avg {:.1}",
                            friend.movies_watched, friend.avg_rating
                        )),
                    ];
                    for movie in friend.recent_movies.iter().take(2) {
                        lines.push(Line::from(format!("   - {} {}", movie.title, stars(movie.rating))));
                    }
                    ListItem::new(lines)
                })
                .collect();
            let list = List::new(items).block(block).highlight_style(highlight).highlight_symbol("> ");
            f.render_stateful_widget(list, chunks[1], &mut app.friends_state);
        }
        FriendsTab::Requests => {
            let block = Block::default().borders(Borders::ALL).title("(a) Accept | (x) Decline");
            if app.friends.requests().is_empty() {
                f.render_widget(Paragraph::new("No pending requests").block(block).alignment(Alignment::Center), chunks[1]);
                return;
            }
            let items: Vec<ListItem> = app
                .friends
                .requests()
                .iter()
                .map(|r| {
                    ListItem::new(format!(
                        "{} <{}> · {} mutual friends · {}",
                        r.name, r.email, r.mutual_friends, r.request_date
                    ))
                })
                .collect();
            let list = List::new(items).block(block).highlight_style(highlight).highlight_symbol("> ");
            f.render_stateful_widget(list, chunks[1], &mut app.friends_state);
        }
        FriendsTab::Add => {
            let text = vec![
                Line::from("Send a friend request by email."),
                Line::from(""),
                Line::from("(e) Enter an email address"),
            ];
            f.render_widget(
                Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Add Friends")),
                chunks[1],
            );
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn draw_profile(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(area);

    let accent = app.accent();
    let sections: Vec<ListItem> = ProfileSection::ALL
        .iter()
        .map(|s| {
            let style = if *s == app.profile.section { Style::default().fg(accent).bold() } else { Style::default() };
            ListItem::new(Span::styled(s.label(), style))
        })
        .collect();
    f.render_widget(
        List::new(sections).block(Block::default().borders(Borders::ALL).title("Sections (Tab)")),
        columns[0],
    );

    let lines: Vec<Line> = match app.profile.section {
        ProfileSection::Account => {
            let (name, email) = app
                .session
                .user()
                .map_or((String::new(), String::new()), |u| (u.name.clone(), u.email.clone()));
            let mut lines = vec![
                Line::from(vec![Span::styled("Name:  ", Style::default().bold()), Span::raw(name)]),
                Line::from(vec![Span::styled("Email: ", Style::default().bold()), Span::raw(email)]),
                Line::from(""),
                Line::from("(n) Edit name | (e) Edit email | (D) Delete account"),
            ];
            if app.profile.delete_requested {
                lines.push(Line::from(Span::styled("Deletion requested.", Style::default().fg(Color::Red))));
            }
            lines
        }
        ProfileSection::Preferences => {
            let n = &app.profile.notifications;
            vec![
                Line::from(format!("(e) Email notifications:        {}", on_off(n.email))),
                Line::from(format!("(p) Push notifications:         {}", on_off(n.push))),
                Line::from(format!("(f) Friend requests:            {}", on_off(n.friend_requests))),
                Line::from(format!("(m) Movie recommendations:      {}", on_off(n.movie_recommendations))),
            ]
        }
        ProfileSection::Privacy => vec![
            Line::from("(p) Change password"),
        ],
        ProfileSection::Social => vec![
            Line::from(format!("Movies watched: {}", app.session.watch_history().len())),
            Line::from(format!("Saved movies:   {}", app.session.saved_movies().len())),
            Line::from(format!("Friends:        {}", app.friends.friends().len())),
        ],
    };
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(app.profile.section.label()))
            .wrap(Wrap { trim: true }),
        columns[1],
    );
}

fn draw_edit_popup(f: &mut Frame, app: &App, target: EditTarget) {
    let area = centered_rect(50, 20, f.size());
    f.render_widget(Clear, area);
    let shown = if target.masked() {
        "*".repeat(app.current_input_value.chars().count())
    } else {
        app.current_input_value.clone()
    };
    let paragraph = Paragraph::new(format!("{}▋", shown))
        .block(Block::default().borders(Borders::ALL).title(format!("{} (Enter) Save | (Esc) Cancel", target.label())))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(paragraph, area);
}

/// Renders the UI widgets based on the active page.
fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(f.size());

    let page = app.session.page();
    if page == Page::Login {
        let header = Paragraph::new("Reelnote").alignment(Alignment::Center).block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);
        draw_login(f, app, chunks[1]);
    } else {
        let titles: Vec<String> = Page::AUTHENTICATED
            .iter()
            .enumerate()
            .map(|(i, p)| format!("({}) {}", i + 1, p.title()))
            .collect();
        let selected = Page::AUTHENTICATED.iter().position(|p| *p == page).unwrap_or(0);
        let user = app.session.user().map_or(String::new(), |u| u.name.clone());
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(format!("Reelnote · {}", user)))
            .select(selected)
            .highlight_style(Style::default().fg(app.accent()).bold());
        f.render_widget(tabs, chunks[0]);

        match page {
            Page::Home => draw_home(f, app, chunks[1]),
            Page::Suggestions => draw_suggestions(f, app, chunks[1]),
            Page::History => draw_history(f, app, chunks[1]),
            Page::Friends => draw_friends(f, app, chunks[1]),
            Page::Profile => draw_profile(f, app, chunks[1]),
            Page::Login => {}
        }
    }

    let keys = match page {
        Page::Login => "",
        Page::Suggestions => "(h/l) Section | (j/k) Move | (Space) Pick | (g) Get | (w) Watched | (s) Save",
        Page::History => "(j/k) Move | (+/-) Rate | (d) Remove | (o) Sort | (/) Search",
        _ => "(1-5) Pages | (L) Log out | (q) Quit",
    };
    let status_text = if keys.is_empty() {
        app.app_status.clone()
    } else {
        format!("{} | {}", app.app_status, keys)
    };
    let status = Paragraph::new(status_text).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    if let InputMode::Editing(target) = app.input_mode {
        draw_edit_popup(f, app, target);
    }
}

/// Helper to create a centered rect for popups.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    fn new_app(dir: &std::path::Path) -> App {
        let (session, _) = Session::load(FileStore::new(dir));
        App::new(session, Config::default())
    }

    fn signed_in_app(dir: &std::path::Path) -> App {
        let mut app = new_app(dir);
        type_text(&mut app, "a@b.com");
        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "x");
        app.on_key(key(KeyCode::Enter));
        app
    }

    #[test]
    fn test_login_form_signs_in() {
        let dir = tempdir().unwrap();
        let app = signed_in_app(dir.path());
        assert_eq!(app.session.page(), Page::Home);
        assert_eq!(app.session.user().map(|u| u.email.as_str()), Some("a@b.com"));
        assert_eq!(app.app_status, "Welcome back, a!");
    }

    #[test]
    fn test_login_requires_password() {
        let dir = tempdir().unwrap();
        let mut app = new_app(dir.path());
        type_text(&mut app, "a@b.com");
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.session.page(), Page::Login);
        assert_eq!(app.app_status, "Please fill in all required fields");
    }

    #[test]
    fn test_suggest_watch_and_rate_flow() {
        let dir = tempdir().unwrap();
        let mut app = signed_in_app(dir.path());
        app.on_key(key(KeyCode::Char('2')));
        assert_eq!(app.session.page(), Page::Suggestions);

        app.on_key(key(KeyCode::Char('g')));
        assert!(app.session.suggestions().is_empty(), "no preference picked yet");

        app.on_key(key(KeyCode::Char(' '))); // Action
        app.on_key(key(KeyCode::Char('g')));
        assert_eq!(app.session.suggestions().len(), 4);

        app.on_key(key(KeyCode::Char('s')));
        assert_eq!(app.session.saved_movies().len(), 1);
        app.on_key(key(KeyCode::Char('w')));
        assert_eq!(app.session.watch_history().len(), 1);
        assert_eq!(app.session.suggestions().len(), 3);

        app.on_key(key(KeyCode::Char('3')));
        app.history_state.select(Some(0));
        app.on_key(key(KeyCode::Char('+')));
        app.on_key(key(KeyCode::Char('+')));
        assert_eq!(app.session.watch_history()[0].rating, 2);
        app.on_key(key(KeyCode::Char('d')));
        assert!(app.session.watch_history().is_empty());
    }

    #[test]
    fn test_logout_returns_to_login() {
        let dir = tempdir().unwrap();
        let mut app = signed_in_app(dir.path());
        app.on_key(key(KeyCode::Char('L')));
        assert_eq!(app.session.page(), Page::Login);
        assert!(!app.session.is_authenticated());
    }

    #[test]
    fn test_profile_name_edit_updates_user() {
        let dir = tempdir().unwrap();
        let mut app = signed_in_app(dir.path());
        app.on_key(key(KeyCode::Char('5')));
        app.on_key(key(KeyCode::Char('n')));
        assert_eq!(app.input_mode, InputMode::Editing(EditTarget::ProfileName));
        app.on_key(key(KeyCode::Backspace));
        type_text(&mut app, "Ada");
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.session.user().map(|u| u.name.as_str()), Some("Ada"));

        let (reloaded, _) = Session::load(FileStore::new(dir.path()));
        assert_eq!(reloaded.user().map(|u| u.name.as_str()), Some("Ada"));
    }

    #[test]
    fn test_profile_blank_email_is_refused() {
        let dir = tempdir().unwrap();
        let mut app = signed_in_app(dir.path());
        app.session.add_to_watch_history(&crate::catalog::suggested_movies()[0]);
        app.on_key(key(KeyCode::Char('5')));
        app.on_key(key(KeyCode::Char('e')));
        for _ in 0.."a@b.com".len() {
            app.on_key(key(KeyCode::Backspace));
        }
        app.on_key(key(KeyCode::Enter));
        assert!(app.app_status.starts_with("Profile not updated"), "got {}", app.app_status);
        assert_eq!(app.session.user().map(|u| u.email.as_str()), Some("a@b.com"));

        let (reloaded, report) = Session::load(FileStore::new(dir.path()));
        assert!(report.corruption.is_none());
        assert_eq!(reloaded.watch_history().len(), 1);
    }

    #[test]
    fn test_friend_request_accept() {
        let dir = tempdir().unwrap();
        let mut app = signed_in_app(dir.path());
        app.on_key(key(KeyCode::Char('4')));
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.friends.tab, FriendsTab::Requests);
        app.on_key(key(KeyCode::Char('a')));
        assert_eq!(app.friends.friends().len(), 4);
        assert_eq!(app.friends.requests().len(), 1);
    }
}
