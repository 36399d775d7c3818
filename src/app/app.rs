use std::io;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    widgets::TableState,
};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::app::{Portfolio, ui};

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, PartialEq)]
pub enum Screen {
    Dashboard,
    Activity,
    Settings,
}

enum ConfirmAction {
    ResetData,
    DeleteAsset(String),
    DeleteTransaction(String),
    ImportSnapshot,
}

pub struct App {
    portfolio: Portfolio,
    screen: Screen,
    detail_asset_id: Option<String>,
    dashboard_state: TableState,
    activity_state: TableState,
    detail_state: TableState,
    popup_message: Option<String>,
    error_popup: Option<String>,
    confirm: Option<(ConfirmAction, String)>,
    snapshot_path: Option<PathBuf>,
}

impl App {
    pub fn new(portfolio: Portfolio, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            portfolio,
            screen: Screen::Dashboard,
            detail_asset_id: None,
            dashboard_state: TableState::default(),
            activity_state: TableState::default(),
            detail_state: TableState::default(),
            popup_message: None,
            error_popup: None,
            confirm: None,
            snapshot_path,
        }
    }

    fn show_error_popup(&mut self, message: &str) {
        self.error_popup = Some(message.to_string());
    }

    fn ask_confirm(&mut self, action: ConfirmAction, message: &str) {
        self.confirm = Some((action, message.to_string()));
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

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
            terminal.draw(|frame| {
                ui::render(
                    frame,
                    &self.portfolio,
                    self.screen,
                    self.detail_asset_id.as_deref(),
                    &mut self.dashboard_state,
                    &mut self.activity_state,
                    &mut self.detail_state,
                    &self.popup_message,
                    &self.error_popup,
                    &self.confirm.as_ref().map(|(_, message)| message.clone()),
                )
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if self.confirm.is_some() {
                    match key.code {
                        KeyCode::Char('y') | KeyCode::Char('Y') => {
                            if let Some((action, _)) = self.confirm.take() {
                                self.perform(action).await;
                            }
                        }
                        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                            self.confirm = None;
                        }
                        _ => {}
                    }
                    continue;
                }

                if self.popup_message.is_some() || self.error_popup.is_some() {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                        self.popup_message = None;
                        self.error_popup = None;
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Tab => {
                        self.detail_asset_id = None;
                        self.screen = next_screen(self.screen);
                        self.clear_selections();
                    }
                    KeyCode::Esc => {
                        self.detail_asset_id = None;
                        self.clear_selections();
                    }
                    KeyCode::Down => self.select(1),
                    KeyCode::Up => self.select(-1),
                    KeyCode::Enter => {
                        if self.screen == Screen::Dashboard && self.detail_asset_id.is_none() {
                            if let Some(i) = self.dashboard_state.selected() {
                                self.detail_asset_id = self
                                    .portfolio
                                    .assets()
                                    .get(i)
                                    .map(|asset| asset.id().clone());
                                self.detail_state = TableState::default();
                            }
                        }
                    }
                    KeyCode::Char('d') => self.confirm_delete_transaction(),
                    KeyCode::Char('x') => {
                        if let Some(asset_id) = self.detail_asset_id.clone() {
                            self.ask_confirm(
                                ConfirmAction::DeleteAsset(asset_id),
                                "Delete this asset and all of its transactions?",
                            );
                        }
                    }
                    KeyCode::Char('c') => {
                        if self.screen == Screen::Settings {
                            let next = if self.portfolio.currency() == "USD" {
                                "MYR"
                            } else {
                                "USD"
                            };
                            if let Err(e) = self.portfolio.set_currency(next).await {
                                self.show_error_popup(&format!("Error setting currency: {:?}", e));
                            }
                        }
                    }
                    KeyCode::Char('e') => {
                        let snapshot_path = self.snapshot_path.clone();
                        match snapshot_path {
                            Some(path) => match self.portfolio.export_snapshot(&path) {
                                Ok(()) => {
                                    self.popup_message =
                                        Some(format!("Snapshot exported to {}", path.display()));
                                }
                                Err(e) => self.show_error_popup(&format!(
                                    "Error exporting snapshot: {:?}",
                                    e
                                )),
                            },
                            None => {
                                self.show_error_popup("No snapshot path configured (--snapshot)")
                            }
                        }
                    }
                    KeyCode::Char('i') => {
                        if self.snapshot_path.is_some() {
                            self.ask_confirm(
                                ConfirmAction::ImportSnapshot,
                                "Import snapshot? This replaces all current data.",
                            );
                        } else {
                            self.show_error_popup("No snapshot path configured (--snapshot)");
                        }
                    }
                    KeyCode::Char('r') => {
                        if self.screen == Screen::Settings {
                            self.ask_confirm(
                                ConfirmAction::ResetData,
                                "Reset all portfolio data? This cannot be undone.",
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    async fn perform(&mut self, action: ConfirmAction) {
        let result = match action {
            ConfirmAction::ResetData => self.portfolio.reset().await,
            ConfirmAction::DeleteAsset(asset_id) => {
                let result = self.portfolio.delete_asset(&asset_id).await;
                if result.is_ok() {
                    self.detail_asset_id = None;
                }
                result
            }
            ConfirmAction::DeleteTransaction(transaction_id) => {
                self.portfolio.delete_transaction(&transaction_id).await
            }
            ConfirmAction::ImportSnapshot => match self.snapshot_path.clone() {
                Some(path) => self.portfolio.import_snapshot(&path).await,
                None => Ok(()),
            },
        };

        self.clear_selections();

        if let Err(e) = result {
            self.show_error_popup(&format!("Error: {:?}", e));
        }
    }

    fn confirm_delete_transaction(&mut self) {
        let transaction_id = if let Some(asset_id) = &self.detail_asset_id {
            self.detail_state.selected().and_then(|i| {
                self.portfolio
                    .transactions_for(asset_id)
                    .get(i)
                    .map(|transaction| transaction.id().clone())
            })
        } else if self.screen == Screen::Activity {
            self.activity_state.selected().and_then(|i| {
                self.portfolio
                    .recent_transactions()
                    .get(i)
                    .map(|transaction| transaction.id().clone())
            })
        } else {
            None
        };

        if let Some(transaction_id) = transaction_id {
            self.ask_confirm(
                ConfirmAction::DeleteTransaction(transaction_id),
                "Delete this transaction? The asset will be recalculated.",
            );
        }
    }

    fn select(&mut self, offset: i64) {
        let (state, len) = if let Some(asset_id) = &self.detail_asset_id {
            (
                &mut self.detail_state,
                self.portfolio.transactions_for(asset_id).len(),
            )
        } else {
            match self.screen {
                Screen::Dashboard => (&mut self.dashboard_state, self.portfolio.assets().len()),
                Screen::Activity => (
                    &mut self.activity_state,
                    self.portfolio.transactions().len(),
                ),
                Screen::Settings => return,
            }
        };

        if len == 0 {
            state.select(None);
            return;
        }

        let i = match state.selected() {
            Some(i) => (i as i64 + offset).rem_euclid(len as i64) as usize,
            None => 0,
        };
        state.select(Some(i));
    }

    fn clear_selections(&mut self) {
        self.dashboard_state.select(None);
        self.activity_state.select(None);
        self.detail_state.select(None);
    }
}

fn next_screen(screen: Screen) -> Screen {
    let screens: Vec<Screen> = Screen::iter().collect();
    let position = screens.iter().position(|s| *s == screen).unwrap_or(0);
    screens[(position + 1) % screens.len()]
}
