//! TUI module for the user console
//!
//! Terminal front-end with a connection panel, create-user form, users list,
//! statistics, and a recent-requests feed.

use crate::actions::{Actions, UiEvent};
use crate::config::SharedConfig;
use crate::render::{UserCard, UserListView, EMPTY_USERS_PLACEHOLDER};
use crate::stats::SharedStats;
use crate::status::{StatusMessage, StatusRegion};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::Duration;

const HELP_HINT: &str = "Press 'h' for help, 'q' to quit";

/// Which input currently receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    None,
    Url,
    Name,
    Email,
}

/// Users list pane state
#[derive(Debug)]
enum ListPane {
    Loading,
    Unconfigured,
    Error,
    View(UserListView),
}

/// TUI Application state
pub struct TuiApp {
    actions: Actions,
    config: SharedConfig,
    stats: SharedStats,
    events: mpsc::UnboundedReceiver<UiEvent>,
    should_quit: bool,
    focus: Focus,
    url_input: String,
    /// Restored when a URL edit is cancelled
    url_snapshot: String,
    name_input: String,
    email_input: String,
    /// Connection-status region
    connection: StatusRegion,
    /// Creation-result region
    create_result: StatusRegion,
    users: ListPane,
    /// Status bar message
    status_message: String,
}

impl TuiApp {
    /// Create a new TUI application
    pub fn new(
        actions: Actions,
        config: SharedConfig,
        stats: SharedStats,
        events: mpsc::UnboundedReceiver<UiEvent>,
    ) -> Self {
        let url_input = config.api_url();
        Self {
            actions,
            config,
            stats,
            events,
            should_quit: false,
            focus: Focus::None,
            url_input,
            url_snapshot: String::new(),
            name_input: String::new(),
            email_input: String::new(),
            connection: StatusRegion::default(),
            create_result: StatusRegion::default(),
            users: ListPane::Loading,
            status_message: HELP_HINT.to_string(),
        }
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        // Load users on startup
        let actions = self.actions.clone();
        tokio::spawn(async move { actions.refresh_users().await });

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            // Apply handler results and expire stale success messages
            self.drain_events();
            let now = Instant::now();
            self.connection.expire(now);
            self.create_result.expire(now);

            // Draw UI
            terminal.draw(|f| self.ui(f))?;

            // Handle input with timeout so handler results keep flowing in
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Connection(message) => self.connection.set(message),
            UiEvent::Create(message) => self.create_result.set(message),
            UiEvent::UserCreated => {
                self.name_input.clear();
                self.email_input.clear();
            }
            UiEvent::UsersLoading => self.users = ListPane::Loading,
            UiEvent::UsersLoaded(view) => self.users = ListPane::View(view),
            UiEvent::UsersError => self.users = ListPane::Error,
            UiEvent::UsersUnconfigured => self.users = ListPane::Unconfigured,
            UiEvent::Offline => {
                // Both status regions, without touching in-flight requests
                let message = StatusMessage::error("❌ No internet connection detected");
                self.connection.set(message.clone());
                self.create_result.set(message);
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.focus {
            Focus::None => self.handle_command_key(code),
            _ => self.handle_edit_key(code),
        }
    }

    fn handle_command_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('h') => {
                self.status_message =
                    "q=quit, t=test connection, r=refresh users, u=edit URL, n=new user"
                        .to_string();
            }
            KeyCode::Char('t') => {
                let actions = self.actions.clone();
                tokio::spawn(async move { actions.test_connection().await });
            }
            KeyCode::Char('r') => {
                let actions = self.actions.clone();
                tokio::spawn(async move { actions.refresh_users().await });
            }
            KeyCode::Char('u') => {
                self.url_snapshot = self.url_input.clone();
                self.focus = Focus::Url;
                self.status_message = "Editing API URL - Enter applies, Esc cancels".to_string();
            }
            KeyCode::Char('n') => {
                self.focus = Focus::Name;
                self.status_message =
                    "New user - Tab switches fields, Enter on email submits, Esc cancels"
                        .to_string();
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                if self.focus == Focus::Url {
                    self.url_input = self.url_snapshot.clone();
                }
                self.focus = Focus::None;
                self.status_message = HELP_HINT.to_string();
            }
            KeyCode::Enter => match self.focus {
                Focus::Url => {
                    self.actions.set_base_url(&self.url_input);
                    self.focus = Focus::None;
                    self.status_message = "API URL applied".to_string();
                }
                Focus::Name => {
                    self.focus = Focus::Email;
                }
                Focus::Email => {
                    let actions = self.actions.clone();
                    let name = self.name_input.clone();
                    let email = self.email_input.clone();
                    tokio::spawn(async move { actions.submit_user(&name, &email).await });
                    self.focus = Focus::None;
                    self.status_message = HELP_HINT.to_string();
                }
                Focus::None => {}
            },
            KeyCode::Tab => match self.focus {
                Focus::Name => self.focus = Focus::Email,
                Focus::Email => self.focus = Focus::Name,
                _ => {}
            },
            KeyCode::Backspace => {
                if let Some(field) = self.active_field_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.active_field_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn active_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Url => Some(&mut self.url_input),
            Focus::Name => Some(&mut self.name_input),
            Focus::Email => Some(&mut self.email_input),
            Focus::None => None,
        }
    }

    /// Draw the UI
    fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(16),   // Body
                Constraint::Length(3), // Status bar
            ])
            .split(f.size());

        self.draw_header(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Connection
                Constraint::Length(7), // Create form
                Constraint::Length(4), // Statistics
                Constraint::Min(4),    // Recent requests
            ])
            .split(body[0]);

        self.draw_connection(f, left[0]);
        self.draw_form(f, left[1]);
        self.draw_statistics(f, left[2]);
        self.draw_requests(f, left[3]);
        self.draw_users(f, body[1]);
        self.draw_status_bar(f, chunks[2]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        // While the URL is being edited, show the in-progress value
        let (url_display, color) = if self.focus == Focus::Url {
            (format!("{}▏", self.url_input), Color::Yellow)
        } else {
            let url = self.config.api_url();
            if url.is_empty() {
                ("(not configured)".to_string(), Color::Cyan)
            } else {
                (url, Color::Cyan)
            }
        };

        let title = format!(" User Console - API: {} ", url_display);

        let header = Paragraph::new(title)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_connection(&self, f: &mut Frame, area: Rect) {
        let line = status_line(&self.connection, "Press 't' to test the connection");
        let panel = Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Connection"));
        f.render_widget(panel, area);
    }

    fn draw_form(&self, f: &mut Frame, area: Rect) {
        let name_line = input_line("Name:  ", &self.name_input, self.focus == Focus::Name);
        let email_line = input_line("Email: ", &self.email_input, self.focus == Focus::Email);
        let result_line = status_line(&self.create_result, "Press 'n' to add a user");

        let form = Paragraph::new(vec![name_line, email_line, Line::from(""), result_line])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Create User"));
        f.render_widget(form, area);
    }

    fn draw_statistics(&self, f: &mut Frame, area: Rect) {
        let counters = self.stats.counters();
        let total_users = match &self.users {
            ListPane::View(view) => view.total(),
            _ => 0,
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(area);

        let cells = [
            (total_users as u64, "Total Users", Color::White),
            (counters.users_created, "Users Created", Color::Green),
            (counters.refreshes, "Refreshes", Color::Magenta),
        ];

        for ((value, label, color), chunk) in cells.iter().zip(chunks.iter()) {
            let cell = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("{value}"),
                    Style::default().fg(*color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(*label, Style::default().fg(Color::Gray))),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(cell, *chunk);
        }
    }

    fn draw_users(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(match &self.users {
            ListPane::View(view) => format!("Users ({})", view.total()),
            _ => "Users".to_string(),
        });

        match &self.users {
            ListPane::Loading => {
                let panel = Paragraph::new("Loading users...")
                    .style(Style::default().fg(Color::Blue))
                    .alignment(Alignment::Center)
                    .block(block);
                f.render_widget(panel, area);
            }
            ListPane::Unconfigured => {
                let panel = Paragraph::new("Please configure the API URL first")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center)
                    .block(block);
                f.render_widget(panel, area);
            }
            ListPane::Error => {
                let panel = Paragraph::new("⚠ Failed to load users. Check the API URL and connection.")
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(block);
                f.render_widget(panel, area);
            }
            ListPane::View(UserListView::Empty) => {
                let panel = Paragraph::new(EMPTY_USERS_PLACEHOLDER)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center)
                    .block(block);
                f.render_widget(panel, area);
            }
            ListPane::View(UserListView::Cards(cards)) => {
                let items: Vec<ListItem> = cards.iter().map(card_item).collect();
                let list = List::new(items).block(block);
                f.render_widget(list, area);
            }
        }
    }

    fn draw_requests(&self, f: &mut Frame, area: Rect) {
        let recent = self.stats.recent(10);
        let items: Vec<ListItem> = recent
            .iter()
            .map(|r| {
                let status_color = match r.status {
                    Some(200..=299) => Color::Green,
                    Some(300..=399) => Color::Yellow,
                    Some(400..=499) => Color::Red,
                    Some(500..=599) => Color::Magenta,
                    _ => Color::Gray,
                };
                let status = r.status.map_or("-".to_string(), |s| s.to_string());
                let text = format!("{} {} [{}] {}", r.method, r.endpoint, status, r.correlation_id);
                ListItem::new(text).style(Style::default().fg(status_color))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Recent Requests"),
        );
        f.render_widget(list, area);
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let status = Paragraph::new(self.status_message.clone())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status, area);
    }
}

fn status_line(region: &StatusRegion, empty_hint: &str) -> Line<'static> {
    match region.message() {
        Some(message) => Line::from(vec![
            Span::styled(
                format!("{} ", message.severity.glyph()),
                Style::default().fg(message.severity.color()),
            ),
            Span::styled(
                message.text.clone(),
                Style::default().fg(message.severity.color()),
            ),
        ]),
        None => Line::from(Span::styled(
            empty_hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(label.to_string(), Style::default().fg(Color::Gray)),
        Span::styled(format!("{value}{cursor}"), style),
    ])
}

fn card_item(card: &UserCard) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                card.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{}]", card.badge), Style::default().fg(Color::Green)),
        ]),
        Line::from(Span::styled(
            card.email.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("Created: {}", card.created),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("ID: {}", card.id),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ])
}

/// Watch reachability of the configured API host and report transitions.
/// Emits one `Offline` event per loss; restoration is only logged. Never
/// cancels or alters an in-flight request.
pub fn spawn_offline_watch(config: SharedConfig, events: mpsc::UnboundedSender<UiEvent>) {
    tokio::spawn(async move {
        let interval_secs = config.get().monitor.interval_secs.max(1);
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        let mut online = true;

        loop {
            ticker.tick().await;

            let url = config.api_url();
            if url.is_empty() {
                continue;
            }
            let Some(target) = connect_target(&url) else {
                continue;
            };

            let reachable = matches!(
                tokio::time::timeout(
                    Duration::from_secs(3),
                    tokio::net::TcpStream::connect(target.as_str()),
                )
                .await,
                Ok(Ok(_))
            );

            if online && !reachable {
                online = false;
                tracing::warn!(addr = %target, "Connection lost");
                let _ = events.send(UiEvent::Offline);
            } else if !online && reachable {
                online = true;
                tracing::info!(addr = %target, "Connection restored");
            }
        }
    });
}

/// host:port pair probed by the reachability watch
fn connect_target(base_url: &str) -> Option<String> {
    let url = reqwest::Url::parse(base_url).ok()?;
    let host = url.host_str()?.to_string();
    let port = url.port_or_known_default()?;
    Some(format!("{host}:{port}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_target() {
        assert_eq!(
            connect_target("http://localhost:7071").as_deref(),
            Some("localhost:7071")
        );
        assert_eq!(
            connect_target("https://api.example.com/").as_deref(),
            Some("api.example.com:443")
        );
        assert!(connect_target("not a url").is_none());
    }
}
