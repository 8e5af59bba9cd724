//! Filters screen; toggle list for the three set dimensions plus the
//! year-cutoff readout.

use std::collections::BTreeSet;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use idatlas_core::{DatasetStore, ViewSnapshot};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// One line of the filter list. Headings are skipped by the cursor.
enum FilterRow {
    Heading(&'static str),
    Level(u8),
    Type(u32),
    Region(String),
}

pub struct FiltersScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    snapshot: Option<Arc<ViewSnapshot>>,
    rows: Vec<FilterRow>,
    years_enabled: bool,
    cursor: usize,
}

impl FiltersScreen {
    pub fn new(store: &DatasetStore) -> Self {
        let rows = build_rows(store);
        let cursor = rows
            .iter()
            .position(|row| !matches!(row, FilterRow::Heading(_)))
            .unwrap_or(0);
        Self {
            focused: false,
            action_tx: None,
            snapshot: None,
            rows,
            years_enabled: store.years_enabled(),
            cursor,
        }
    }

    /// Move the cursor to the next toggleable row in `direction`.
    fn move_cursor(&mut self, direction: isize) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let mut idx = self.cursor;
        loop {
            let next = idx.checked_add_signed(direction);
            let Some(next) = next.filter(|&n| n < len) else {
                return;
            };
            idx = next;
            if !matches!(self.rows[idx], FilterRow::Heading(_)) {
                self.cursor = idx;
                return;
            }
        }
    }

    fn toggle_current(&self) -> Option<Action> {
        match self.rows.get(self.cursor)? {
            FilterRow::Heading(_) => None,
            FilterRow::Level(level) => Some(Action::ToggleLevel(*level)),
            FilterRow::Type(code) => Some(Action::ToggleType(*code)),
            FilterRow::Region(region) => Some(Action::ToggleRegion(region.clone())),
        }
    }

    fn is_checked(&self, row: &FilterRow) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        match row {
            FilterRow::Heading(_) => false,
            FilterRow::Level(level) => snapshot.filter.levels.contains(level),
            FilterRow::Type(code) => snapshot.filter.type_codes.contains(code),
            FilterRow::Region(region) => snapshot.filter.regions.contains(region),
        }
    }

    fn row_line(&self, idx: usize, row: &FilterRow) -> Line<'static> {
        match row {
            FilterRow::Heading(text) => Line::from(Span::styled(
                (*text).to_string(),
                theme::region_heading(),
            )),
            _ => {
                let checked = self.is_checked(row);
                let mark = if checked { "[x]" } else { "[ ]" };
                let label = match row {
                    FilterRow::Level(level) => format!("LoA {level}"),
                    FilterRow::Type(code) => format!("Type {code}"),
                    FilterRow::Region(region) => region.clone(),
                    FilterRow::Heading(_) => unreachable!(),
                };
                let style = if self.focused && idx == self.cursor {
                    theme::table_selected()
                } else if checked {
                    Style::default().fg(theme::SEAFOAM)
                } else {
                    theme::table_row()
                };
                Line::from(Span::styled(format!("  {mark} {label}"), style))
            }
        }
    }

    fn year_line(&self) -> Line<'static> {
        if !self.years_enabled {
            return Line::from(Span::styled(
                "  Year cutoff: unavailable (no year index)",
                Style::default().fg(theme::CORAL),
            ));
        }
        let cutoff = self
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.filter.year_cutoff);
        let text = cutoff.map_or_else(
            || "  Year cutoff: all years".to_string(),
            |year| format!("  Year cutoff: \u{2264} {year}"),
        );
        Line::from(Span::styled(text, Style::default().fg(theme::AMBER)))
    }
}

/// Every value the dataset exhibits for each dimension, ascending.
fn build_rows(store: &DatasetStore) -> Vec<FilterRow> {
    let records = store.records();

    let mut levels: BTreeSet<u8> = BTreeSet::new();
    let mut types: BTreeSet<u32> = BTreeSet::new();
    let mut regions: BTreeSet<String> = BTreeSet::new();
    for record in records.iter() {
        levels.extend(record.levels.iter().copied());
        if let Some(code) = record.type_code {
            types.insert(code);
        }
        for country in &record.countries {
            regions.insert(store.directory().region_of(country).to_string());
        }
    }

    let mut rows = Vec::new();
    rows.push(FilterRow::Heading("Assurance levels"));
    rows.extend(levels.into_iter().map(FilterRow::Level));
    rows.push(FilterRow::Heading("Scheme types"));
    rows.extend(types.into_iter().map(FilterRow::Type));
    rows.push(FilterRow::Heading("Regions"));
    rows.extend(regions.into_iter().map(FilterRow::Region));
    rows
}

impl Component for FiltersScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                Ok(None)
            }
            KeyCode::Enter => Ok(self.toggle_current()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = Some(Arc::clone(snapshot));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let restricted = self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.filter.is_restricted());
        let title = if restricted {
            " Filters (active) "
        } else {
            " Filters "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // toggle list
            Constraint::Length(1), // year readout
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let lines: Vec<Line> = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.row_line(idx, row))
            .collect();
        frame.render_widget(Paragraph::new(lines), layout[0]);

        frame.render_widget(Paragraph::new(self.year_line()), layout[1]);

        let hints = Line::from(vec![
            Span::styled(" Enter ", theme::key_hint_key()),
            Span::styled("toggle  ", theme::key_hint()),
            Span::styled("[ ] ", theme::key_hint_key()),
            Span::styled("year cutoff  ", theme::key_hint()),
            Span::styled("0 ", theme::key_hint_key()),
            Span::styled("all years  ", theme::key_hint()),
            Span::styled("x ", theme::key_hint_key()),
            Span::styled("clear filters", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "filters"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use idatlas_core::{
        CountryCode, CountryDirectory, CountryInfo, IdentityRecord, RecordId, YearIndex,
    };

    use super::*;

    fn store() -> DatasetStore {
        let records = vec![
            IdentityRecord {
                id: RecordId::from(1u64),
                name: "AlphaID".into(),
                logo: None,
                type_code: Some(1),
                levels: vec![2, 3],
                flow_types: vec![],
                scopes: vec![],
                countries: vec![CountryCode::new("us")],
                need_action: None,
            },
            IdentityRecord {
                id: RecordId::from(2u64),
                name: "BetaPass".into(),
                logo: None,
                type_code: Some(2),
                levels: vec![1],
                flow_types: vec![],
                scopes: vec![],
                countries: vec![CountryCode::new("zz")],
                need_action: None,
            },
        ];
        let directory = CountryDirectory::new(HashMap::from([(
            CountryCode::new("us"),
            CountryInfo {
                name: "United States".into(),
                region: "Americas".into(),
            },
        )]));
        DatasetStore::new(
            records,
            directory,
            Some(YearIndex::new([(RecordId::from(1u64), 2010)])),
        )
    }

    #[test]
    fn rows_cover_every_observed_dimension_value() {
        let screen = FiltersScreen::new(&store());
        let labels: Vec<String> = screen
            .rows
            .iter()
            .map(|row| match row {
                FilterRow::Heading(text) => (*text).to_string(),
                FilterRow::Level(level) => format!("L{level}"),
                FilterRow::Type(code) => format!("T{code}"),
                FilterRow::Region(region) => region.clone(),
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                "Assurance levels",
                "L1",
                "L2",
                "L3",
                "Scheme types",
                "T1",
                "T2",
                "Regions",
                "Americas",
                "Unknown",
            ]
        );
    }

    #[test]
    fn cursor_skips_headings() {
        let mut screen = FiltersScreen::new(&store());
        // Starts at the first toggleable row.
        assert!(matches!(screen.rows[screen.cursor], FilterRow::Level(1)));
        screen.move_cursor(1);
        screen.move_cursor(1);
        screen.move_cursor(1);
        // Skipped the "Scheme types" heading.
        assert!(matches!(screen.rows[screen.cursor], FilterRow::Type(1)));
    }

    #[test]
    fn toggle_reports_the_row_under_the_cursor() {
        let screen = FiltersScreen::new(&store());
        assert!(matches!(
            screen.toggle_current(),
            Some(Action::ToggleLevel(1))
        ));
    }
}
