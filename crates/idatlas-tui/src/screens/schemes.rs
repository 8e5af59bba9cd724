//! Schemes screen; table of the records matching the active filters.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use idatlas_core::{DatasetStore, IdentityRecord, ViewSnapshot};

use crate::action::Action;
use crate::component::Component;
use crate::screens::join_or_dash;
use crate::theme;

pub struct SchemesScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    snapshot: Option<Arc<ViewSnapshot>>,
    store: DatasetStore,
    table_state: TableState,
}

impl SchemesScreen {
    pub fn new(store: &DatasetStore) -> Self {
        Self {
            focused: false,
            action_tx: None,
            snapshot: None,
            store: store.clone(),
            table_state: TableState::default(),
        }
    }

    fn shown(&self) -> usize {
        self.snapshot
            .as_ref()
            .map_or(0, |snapshot| snapshot.filtered.len())
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.shown();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn row(&self, record: &IdentityRecord) -> Row<'static> {
        let year = self
            .store
            .year_of(&record.id)
            .map_or_else(|| "\u{2500}".into(), |year| year.to_string());
        Row::new(vec![
            Cell::from(record.id.to_string()),
            Cell::from(record.name.clone()),
            Cell::from(
                record
                    .type_code
                    .map_or_else(|| "\u{2500}".into(), |code| code.to_string()),
            ),
            Cell::from(join_or_dash(&record.levels)),
            Cell::from(join_or_dash(&record.flow_types)),
            Cell::from(
                record
                    .countries
                    .iter()
                    .map(idatlas_core::CountryCode::display_fallback)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Cell::from(year),
        ])
        .style(theme::table_row())
    }
}

impl Component for SchemesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.table_state.select(Some(0));
                Ok(None)
            }
            KeyCode::Char('G') => {
                let len = self.shown();
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
                Ok(None)
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(10);
                Ok(None)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(-10);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = Some(Arc::clone(snapshot));
            let len = self.shown();
            if len > 0 && self.table_state.selected().unwrap_or(0) >= len {
                self.table_state.select(Some(len - 1));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let shown = self.shown();
        let total = self.store.len();
        let block = Block::default()
            .title(format!(" Schemes ({shown}/{total}) "))
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

        let Some(snapshot) = &self.snapshot else {
            return;
        };

        let header = Row::new(vec!["Id", "Name", "Type", "LoA", "Flows", "Countries", "Year"])
            .style(theme::table_header());

        let rows: Vec<Row> = snapshot
            .filtered
            .iter()
            .map(|record| self.row(record))
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Min(18),
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Min(20),
            Constraint::Length(6),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "schemes"
    }
}
