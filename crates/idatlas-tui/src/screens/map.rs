//! Map screen; region-grouped grid of country codes with tri-state
//! coloring and a detail panel for the selected country.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use idatlas_core::{CountryCode, DatasetStore, DetailView, ViewSnapshot};

use crate::action::Action;
use crate::component::Component;
use crate::screens::join_or_dash;
use crate::theme;

/// One region bucket of the grid, fixed at construction from the full
/// dataset (filtering restyles cells, it never removes them).
struct RegionRow {
    region: String,
    countries: Vec<(CountryCode, String)>,
}

pub struct MapScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    snapshot: Option<Arc<ViewSnapshot>>,
    groups: Vec<RegionRow>,
    /// Flattened navigation order; mirrors the render order of `groups`.
    flat: Vec<CountryCode>,
    cursor: usize,
}

impl MapScreen {
    pub fn new(store: &DatasetStore) -> Self {
        let groups = build_groups(store);
        let flat = groups
            .iter()
            .flat_map(|group| group.countries.iter().map(|(code, _)| code.clone()))
            .collect();
        Self {
            focused: false,
            action_tx: None,
            snapshot: None,
            groups,
            flat,
            cursor: 0,
        }
    }

    fn cursor_code(&self) -> Option<&CountryCode> {
        self.flat.get(self.cursor)
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.flat.is_empty() {
            return;
        }
        let len = self.flat.len();
        let next = self
            .cursor
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
        self.cursor = next;
    }

    /// Jump the cursor to the first country of the next/previous region.
    fn move_region(&mut self, forward: bool) {
        let mut offset = 0usize;
        let mut starts = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            starts.push(offset);
            offset += group.countries.len();
        }
        if starts.is_empty() {
            return;
        }
        let current = starts
            .iter()
            .rposition(|&start| start <= self.cursor)
            .unwrap_or(0);
        let target = if forward {
            (current + 1).min(starts.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.cursor = starts[target];
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let Some(snapshot) = &self.snapshot else {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled("loading\u{2026}", theme::key_hint()))),
                area,
            );
            return;
        };

        // Cells are " XX " wide; wrap within the panel width.
        let per_row = usize::from((area.width / 5).max(1));
        let mut lines: Vec<Line> = Vec::new();
        let mut flat_idx = 0usize;

        for group in &self.groups {
            lines.push(Line::from(Span::styled(
                group.region.clone(),
                theme::region_heading(),
            )));

            for chunk in group.countries.chunks(per_row) {
                let mut spans: Vec<Span> = Vec::with_capacity(chunk.len());
                for (code, _) in chunk {
                    let style = snapshot.style(code);
                    let cell_style = if self.focused && flat_idx == self.cursor {
                        theme::country_cursor(style)
                    } else {
                        theme::country_cell(style)
                    };
                    spans.push(Span::styled(
                        format!(" {} ", code.display_fallback()),
                        cell_style,
                    ));
                    spans.push(Span::raw(" "));
                    flat_idx += 1;
                }
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    #[allow(clippy::unused_self)]
    fn render_detail(&self, frame: &mut Frame, area: Rect, detail: &DetailView) {
        let (title, lines) = match detail {
            DetailView::NoSelection => (
                " Detail ".to_string(),
                vec![Line::from(Span::styled(
                    "  No country selected",
                    theme::key_hint(),
                ))],
            ),
            DetailView::Empty { code, name } => (
                format!(" {name} ({}) ", code.display_fallback()),
                vec![Line::from(Span::styled(
                    "  No matching identities for the current filters",
                    Style::default().fg(theme::CORAL),
                ))],
            ),
            DetailView::Schemes {
                code,
                name,
                entries,
            } => {
                let mut lines: Vec<Line> = Vec::new();
                for entry in entries {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", entry.name),
                        Style::default()
                            .fg(theme::AMBER)
                            .add_modifier(ratatui::style::Modifier::BOLD),
                    )));
                    lines.push(detail_field(
                        "Type",
                        entry
                            .type_code
                            .map_or_else(|| "\u{2500}".into(), |code| code.to_string()),
                    ));
                    lines.push(detail_field("LoA", join_or_dash(&entry.levels)));
                    lines.push(detail_field("Flows", join_or_dash(&entry.flow_types)));
                    lines.push(detail_field("Scopes", join_or_dash(&entry.scopes)));
                    lines.push(detail_field(
                        "Action req.",
                        match entry.need_action {
                            Some(true) => "yes".into(),
                            Some(false) => "no".into(),
                            None => "\u{2500}".into(),
                        },
                    ));
                    lines.push(detail_field(
                        "First issued",
                        entry
                            .first_issued
                            .map_or_else(|| "unknown".into(), |year| year.to_string()),
                    ));
                    lines.push(Line::from(""));
                }
                (format!(" {name} ({}) ", code.display_fallback()), lines)
            }
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn detail_field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {label:<13}"), Style::default().fg(theme::DIM_WHITE)),
        Span::styled(value, Style::default().fg(theme::SEAFOAM)),
    ])
}

/// Every country any record lists, resolved and grouped by region.
/// Regions ascending, countries by display name within each.
fn build_groups(store: &DatasetStore) -> Vec<RegionRow> {
    use std::collections::BTreeMap;

    let mut codes: Vec<CountryCode> = store
        .records()
        .iter()
        .flat_map(|record| record.countries.iter().cloned())
        .collect();
    codes.sort();
    codes.dedup();

    let mut by_region: BTreeMap<String, Vec<(CountryCode, String)>> = BTreeMap::new();
    for code in codes {
        let resolved = store.directory().resolve(&code);
        by_region
            .entry(resolved.region)
            .or_default()
            .push((code, resolved.name));
    }

    by_region
        .into_iter()
        .map(|(region, mut countries)| {
            countries.sort_by(|a, b| a.1.cmp(&b.1));
            RegionRow { region, countries }
        })
        .collect()
}

impl Component for MapScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => {
                self.move_cursor(1);
                Ok(None)
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.move_cursor(-1);
                Ok(None)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_region(true);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_region(false);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.cursor = 0;
                Ok(None)
            }
            KeyCode::Char('G') => {
                self.cursor = self.flat.len().saturating_sub(1);
                Ok(None)
            }
            KeyCode::Enter => Ok(self.cursor_code().cloned().map(Action::Select)),
            KeyCode::Char('c') => Ok(Some(Action::ClearSelection)),
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
        let (active, total) = self.snapshot.as_ref().map_or((0, 0), |snapshot| {
            (snapshot.active.len(), self.flat.len())
        });
        let block = Block::default()
            .title(format!(" Map ({active}/{total} active) "))
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

        let detail = self.snapshot.as_ref().map(|snapshot| &snapshot.detail);
        let show_detail = !matches!(detail, None | Some(DetailView::NoSelection));

        let (grid_area, detail_area) = if show_detail && inner.width >= 70 {
            let chunks =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(grid_area);
        self.render_grid(frame, layout[0]);

        let hints = Line::from(vec![
            Span::styled(" \u{2190}\u{2192} ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("\u{2191}\u{2193} ", theme::key_hint_key()),
            Span::styled("region  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("c ", theme::key_hint_key()),
            Span::styled("clear selection", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);

        if let (Some(detail_area), Some(detail)) = (detail_area, detail) {
            self.render_detail(frame, detail_area, detail);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "map"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use idatlas_core::{
        CountryDirectory, CountryInfo, DatasetStore, IdentityRecord, RecordId,
    };

    use super::*;

    fn store() -> DatasetStore {
        let records = vec![
            IdentityRecord {
                id: RecordId::from(1u64),
                name: "AlphaID".into(),
                logo: None,
                type_code: Some(1),
                levels: vec![2],
                flow_types: vec![],
                scopes: vec![],
                countries: vec![CountryCode::new("US"), CountryCode::new("fr")],
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
                countries: vec![CountryCode::new("fr")],
                need_action: None,
            },
        ];
        let directory = CountryDirectory::new(HashMap::from([
            (
                CountryCode::new("us"),
                CountryInfo {
                    name: "United States".into(),
                    region: "Americas".into(),
                },
            ),
            (
                CountryCode::new("fr"),
                CountryInfo {
                    name: "France".into(),
                    region: "Europe".into(),
                },
            ),
        ]));
        DatasetStore::new(records, directory, None)
    }

    #[test]
    fn groups_are_region_sorted_and_deduplicated() {
        let screen = MapScreen::new(&store());
        let regions: Vec<&str> = screen
            .groups
            .iter()
            .map(|group| group.region.as_str())
            .collect();
        assert_eq!(regions, vec!["Americas", "Europe"]);
        // fr listed by two records appears once.
        assert_eq!(screen.flat.len(), 2);
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut screen = MapScreen::new(&store());
        screen.move_cursor(-1);
        assert_eq!(screen.cursor, 0);
        screen.move_cursor(10);
        assert_eq!(screen.cursor, 1);
    }

    #[test]
    fn region_jump_lands_on_group_start() {
        let mut screen = MapScreen::new(&store());
        screen.move_region(true);
        assert_eq!(screen.cursor_code(), Some(&CountryCode::new("fr")));
        screen.move_region(false);
        assert_eq!(screen.cursor_code(), Some(&CountryCode::new("us")));
    }
}
