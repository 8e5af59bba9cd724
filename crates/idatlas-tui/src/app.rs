//! Application core; event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use idatlas_core::{ChangeOrigin, Explorer, PlaybackStatus, ViewSnapshot};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    /// The filter/selection/playback engine.
    explorer: Explorer,
    /// Latest published snapshot; mirrors what screens render from.
    snapshot: Arc<ViewSnapshot>,
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Action sender; components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver; main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(explorer: Explorer) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let snapshot = explorer.snapshot();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(explorer.store()).into_iter().collect();

        Self {
            explorer,
            snapshot,
            active_screen: ScreenId::Map,
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let explorer = self.explorer.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            crate::data_bridge::run_data_bridge(explorer, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.explorer.stop_playback();
        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            // Help
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            // Esc: close detail, else go back
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            // Playback and the year cutoff work from every screen
            (KeyModifiers::NONE, KeyCode::Char(' ')) => {
                return Ok(Some(Action::TogglePlayback));
            }
            (KeyModifiers::NONE, KeyCode::Char('[')) => return Ok(Some(Action::YearEarlier)),
            (KeyModifiers::NONE, KeyCode::Char(']')) => return Ok(Some(Action::YearLater)),
            (KeyModifiers::NONE, KeyCode::Char('0')) => return Ok(Some(Action::ClearYear)),

            // Reset every filter dimension
            (KeyModifiers::NONE, KeyCode::Char('x')) => return Ok(Some(Action::ClearFilters)),

            _ => {}
        }

        // Delegate to active screen component
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action; update app state and propagate to components.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(_, _) | Action::Render => {}

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} -> {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                // Esc closes an open detail panel before leaving the screen.
                if self.snapshot.filter.selected.is_some() {
                    self.explorer.clear_selection();
                } else if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Tick => {
                // Auto-dismiss notifications after 3 seconds
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > Duration::from_secs(3) {
                        self.notification = None;
                    }
                }
            }

            // Snapshots go to ALL screens so they stay in sync
            Action::SnapshotUpdated(snapshot) => {
                self.snapshot = Arc::clone(snapshot);
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // ── Engine events ─────────────────────────────────────────

            Action::Select(code) => {
                self.explorer.select_country(code.clone());
            }

            Action::ClearSelection => {
                self.explorer.clear_selection();
            }

            Action::ToggleLevel(level) => {
                let mut levels = self.snapshot.filter.levels.clone();
                if !levels.remove(level) {
                    levels.insert(*level);
                }
                self.explorer.set_levels(levels);
            }

            Action::ToggleType(code) => {
                let mut type_codes = self.snapshot.filter.type_codes.clone();
                if !type_codes.remove(code) {
                    type_codes.insert(*code);
                }
                self.explorer.set_type_codes(type_codes);
            }

            Action::ToggleRegion(region) => {
                let mut regions = self.snapshot.filter.regions.clone();
                if !regions.remove(region) {
                    regions.insert(region.clone());
                }
                self.explorer.set_regions(regions);
            }

            Action::ClearFilters => {
                self.explorer.set_levels(std::collections::BTreeSet::new());
                self.explorer
                    .set_type_codes(std::collections::BTreeSet::new());
                self.explorer.set_regions(std::collections::BTreeSet::new());
                if self.explorer.store().years_enabled() {
                    self.explorer.set_year_cutoff(None, ChangeOrigin::User);
                }
                self.action_tx
                    .send(Action::Notify(Notification::info("filters cleared")))?;
            }

            Action::YearEarlier => {
                self.step_year(false)?;
            }

            Action::YearLater => {
                self.step_year(true)?;
            }

            Action::ClearYear => {
                if self.explorer.store().years_enabled() {
                    self.explorer.set_year_cutoff(None, ChangeOrigin::User);
                } else {
                    self.action_tx.send(Action::Notify(Notification::warning(
                        "year index unavailable; year filtering is disabled",
                    )))?;
                }
            }

            Action::TogglePlayback => {
                if self.explorer.store().years_enabled() {
                    self.explorer.toggle_playback();
                } else {
                    self.action_tx.send(Action::Notify(Notification::warning(
                        "year index unavailable; playback is disabled",
                    )))?;
                }
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
        }

        Ok(())
    }

    /// Step the year cutoff to the adjacent known year.
    fn step_year(&mut self, forward: bool) -> Result<()> {
        if !self.explorer.store().years_enabled() {
            self.action_tx.send(Action::Notify(Notification::warning(
                "year index unavailable; year filtering is disabled",
            )))?;
            return Ok(());
        }
        let years = self.explorer.store().known_years();
        let cutoff = self.snapshot.filter.year_cutoff;
        let next = if forward {
            next_year(&years, cutoff)
        } else {
            prev_year(&years, cutoff)
        };
        // `None` means "no change"; `Some(None)` clears the cutoff.
        if let Some(new_cutoff) = next {
            self.explorer.set_year_cutoff(new_cutoff, ChangeOrigin::User);
        }
        Ok(())
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays on top (order matters: last = topmost)
        if let Some((ref notification, _)) = self.notification {
            self.render_notification(frame, area, notification);
        }

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    /// Render the bottom tab bar.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar: counter, year/playback state, hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let counter = self.snapshot.counter;
        let noun = if counter == 1 {
            "supported digital identity"
        } else {
            "supported digital identities"
        };
        let counter_span = Span::styled(
            format!("\u{25cf} {counter} {noun}"),
            Style::default().fg(theme::SEAFOAM),
        );

        let year_span = if self.explorer.store().years_enabled() {
            match self.snapshot.playback {
                PlaybackStatus::Playing { year } => Span::styled(
                    format!("  \u{25b6} {year}"),
                    Style::default().fg(theme::AMBER),
                ),
                PlaybackStatus::Stopped => match self.snapshot.filter.year_cutoff {
                    Some(year) => Span::styled(
                        format!("  \u{2264} {year}"),
                        Style::default().fg(theme::AMBER),
                    ),
                    None => Span::styled("  all years", theme::key_hint()),
                },
            }
        } else {
            Span::styled("  years unavailable", Style::default().fg(theme::CORAL))
        };

        let hints = Span::styled(
            " \u{2502} ? help  Space play  q quit",
            theme::key_hint(),
        );

        let line = Line::from(vec![Span::raw(" "), counter_span, year_span, hints]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 18u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |keys: &str, text: &str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<11}"), theme::key_hint_key()),
                Span::styled(text.to_string(), theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Navigation",
                Style::default().fg(theme::AEGEAN_BLUE),
            )),
            entry("1-3 / Tab", "Switch screen"),
            entry("hjkl \u{2190}\u{2192}\u{2191}\u{2193}", "Move around"),
            entry("Enter", "Select / toggle"),
            entry("Esc", "Close detail / back"),
            Line::from(""),
            Line::from(Span::styled(
                "  Filters & playback",
                Style::default().fg(theme::AEGEAN_BLUE),
            )),
            entry("[ / ]", "Year cutoff earlier / later"),
            entry("0", "All years"),
            entry("x", "Clear every filter"),
            entry("Space", "Play / pause the time-lapse"),
            Line::from(""),
            Line::from(Span::styled(
                "                    Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    #[allow(clippy::unused_self, clippy::cast_possible_truncation)]
    fn render_notification(&self, frame: &mut Frame, area: Rect, notification: &Notification) {
        let msg_len = notification.message.len() as u16;
        let width = (msg_len + 6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notification.level {
            NotificationLevel::Warning => (theme::AMBER, "!"),
            NotificationLevel::Info => (theme::AEGEAN_BLUE, "\u{b7}"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(theme::DIM_WHITE),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

/// Next known year strictly after the cutoff. `None` = no change,
/// `Some(Some(y))` = new cutoff. Starting from "all years" enters at the
/// first known year.
fn next_year(years: &[u16], cutoff: Option<u16>) -> Option<Option<u16>> {
    match cutoff {
        None => years.first().map(|&year| Some(year)),
        Some(current) => years
            .iter()
            .find(|&&year| year > current)
            .map(|&year| Some(year)),
    }
}

/// Last known year strictly before the cutoff; stepping below the first
/// known year clears the cutoff back to "all years".
fn prev_year(years: &[u16], cutoff: Option<u16>) -> Option<Option<u16>> {
    let current = cutoff?;
    Some(years.iter().rev().find(|&&year| year < current).copied())
}
