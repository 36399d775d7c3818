use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table, TableState},
};
use rust_decimal::prelude::ToPrimitive;
use strum::IntoEnumIterator;

use crate::app::{Portfolio, Screen, utils};
use crate::models::Asset;

#[allow(clippy::too_many_arguments)]
pub fn render(
    frame: &mut Frame,
    portfolio: &Portfolio,
    screen: Screen,
    detail_asset_id: Option<&str>,
    dashboard_state: &mut TableState,
    activity_state: &mut TableState,
    detail_state: &mut TableState,
    popup_message: &Option<String>,
    error_popup: &Option<String>,
    confirm_popup: &Option<String>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(frame.area());

    render_tabs(frame, screen, chunks[0]);

    match screen {
        Screen::Dashboard => match detail_asset_id.and_then(|id| portfolio.asset(id)) {
            Some(asset) => render_asset_detail(frame, portfolio, asset, detail_state, chunks[1]),
            None => render_dashboard(frame, portfolio, dashboard_state, chunks[1]),
        },
        Screen::Activity => render_activity(frame, portfolio, activity_state, chunks[1]),
        Screen::Settings => render_settings(frame, portfolio, chunks[1]),
    }

    if let Some(message) = popup_message {
        render_popup(frame, "Info (Esc to dismiss)", message, Color::Cyan);
    }

    if let Some(message) = confirm_popup {
        render_popup(frame, "Confirm (y/n)", message, Color::Yellow);
    }

    if let Some(message) = error_popup {
        render_popup(frame, "Error (Esc to dismiss)", message, Color::Red);
    }
}

fn render_tabs(frame: &mut Frame, screen: Screen, area: Rect) {
    let labels: Vec<String> = Screen::iter()
        .map(|s| {
            if s == screen {
                format!("[{}]", s)
            } else {
                format!(" {} ", s)
            }
        })
        .collect();

    let tabs = Paragraph::new(format!("zeninvest   {}", labels.join("  ")))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(tabs, area);
}

fn render_dashboard(
    frame: &mut Frame,
    portfolio: &Portfolio,
    table_state: &mut TableState,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    render_stats(frame, portfolio, chunks[0]);
    render_history(frame, portfolio, chunks[1]);
    render_asset_table(frame, portfolio, table_state, chunks[2]);
}

fn render_stats(frame: &mut Frame, portfolio: &Portfolio, area: Rect) {
    let stats = portfolio.stats();
    let currency = portfolio.currency();

    let lines = vec![
        Line::from(format!(
            "Total value: {}    Invested: {}",
            utils::format_money(stats.total_value(), currency),
            utils::format_money(stats.total_invested(), currency),
        )),
        Line::styled(
            format!(
                "Return: {} ({})",
                utils::format_signed_money(stats.total_return(), currency),
                utils::format_percent(stats.total_return_percentage()),
            ),
            Style::default().fg(utils::gain_color(stats.total_return())),
        ),
    ];

    let summary =
        Paragraph::new(lines).block(Block::default().title("Portfolio").borders(Borders::ALL));
    frame.render_widget(summary, area);
}

fn render_history(frame: &mut Frame, portfolio: &Portfolio, area: Rect) {
    let history = portfolio.history();

    if history.is_empty() {
        let empty_message = Paragraph::new("No historical data")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("History").borders(Borders::ALL));
        frame.render_widget(empty_message, area);
        return;
    }

    let title = format!(
        "History ({} – {})",
        history[0].date(),
        history[history.len() - 1].date()
    );
    let values: Vec<u64> = history
        .iter()
        .map(|point| point.value().to_u64().unwrap_or(0))
        .collect();

    let sparkline = Sparkline::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .data(&values);
    frame.render_widget(sparkline, area);
}

fn render_asset_table(
    frame: &mut Frame,
    portfolio: &Portfolio,
    table_state: &mut TableState,
    area: Rect,
) {
    let assets = portfolio.assets();

    if assets.is_empty() {
        let empty_message = Paragraph::new("No assets yet. Import a snapshot to get started.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Assets").borders(Borders::ALL));
        frame.render_widget(empty_message, area);
        return;
    }

    let currency = portfolio.currency();
    let header_cells = ["Ticker", "Name", "Category", "Group", "Value", "Invested", "Return"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = assets.iter().map(|asset| {
        let group_name = asset
            .group_id()
            .as_deref()
            .and_then(|group_id| {
                portfolio
                    .groups()
                    .iter()
                    .find(|group| group.id() == group_id)
            })
            .map(|group| group.name().as_str())
            .unwrap_or("-");

        let asset_return = asset.current_value() - asset.total_invested();

        let cells = [
            Cell::from(asset.ticker().clone()),
            Cell::from(asset.name().clone()),
            Cell::from(asset.category().to_str()),
            Cell::from(group_name.to_string()),
            Cell::from(utils::format_money(asset.current_value(), currency)),
            Cell::from(utils::format_money(asset.total_invested(), currency)),
            Cell::from(utils::format_signed_money(&asset_return, currency))
                .style(Style::default().fg(utils::gain_color(&asset_return))),
        ];
        Row::new(cells).height(1)
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(24),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title("Assets").borders(Borders::ALL))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, area, table_state);
}

fn render_activity(
    frame: &mut Frame,
    portfolio: &Portfolio,
    table_state: &mut TableState,
    area: Rect,
) {
    let transactions = portfolio.recent_transactions();

    if transactions.is_empty() {
        let empty_message = Paragraph::new("No transactions recorded.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Activity").borders(Borders::ALL));
        frame.render_widget(empty_message, area);
        return;
    }

    let currency = portfolio.currency();
    let header_cells = ["Date", "Ticker", "Type", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = transactions.iter().map(|transaction| {
        let cells = [
            Cell::from(utils::format_datetime(transaction.date())),
            Cell::from(transaction.ticker().clone()),
            Cell::from(transaction.kind().to_str()),
            Cell::from(utils::format_money(transaction.amount(), currency)),
        ];
        Row::new(cells).height(1)
    });

    let widths = [
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Activity (d: delete selected)")
                .borders(Borders::ALL),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, area, table_state);
}

fn render_asset_detail(
    frame: &mut Frame,
    portfolio: &Portfolio,
    asset: &Asset,
    table_state: &mut TableState,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let currency = portfolio.currency();
    let asset_return = asset.current_value() - asset.total_invested();

    let lines = vec![
        Line::from(format!(
            "{} — {} ({})",
            asset.ticker(),
            asset.name(),
            asset.category().to_str()
        )),
        Line::from(format!(
            "Value: {}    Invested: {}    Checkpoints: {}",
            utils::format_money(asset.current_value(), currency),
            utils::format_money(asset.total_invested(), currency),
            asset.price_history().len(),
        )),
        Line::styled(
            format!("Return: {}", utils::format_signed_money(&asset_return, currency)),
            Style::default().fg(utils::gain_color(&asset_return)),
        ),
    ];

    let info = Paragraph::new(lines).block(
        Block::default()
            .title("Asset (Esc: back, d: delete transaction, x: delete asset)")
            .borders(Borders::ALL),
    );
    frame.render_widget(info, chunks[0]);

    let transactions = portfolio.transactions_for(asset.id());

    let header_cells = ["Date", "Type", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = transactions.iter().map(|transaction| {
        let cells = [
            Cell::from(utils::format_datetime(transaction.date())),
            Cell::from(transaction.kind().to_str()),
            Cell::from(utils::format_money(transaction.amount(), currency)),
        ];
        Row::new(cells).height(1)
    });

    let widths = [
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title("Transactions").borders(Borders::ALL))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, chunks[1], table_state);
}

fn render_settings(frame: &mut Frame, portfolio: &Portfolio, area: Rect) {
    let lines = vec![
        Line::from(format!("Currency: {}", portfolio.currency())),
        Line::from(""),
        Line::from("c : toggle currency (USD/MYR)"),
        Line::from("e : export snapshot"),
        Line::from("i : import snapshot (replaces current data)"),
        Line::from("r : reset all portfolio data"),
        Line::from("q : quit"),
    ];

    let settings =
        Paragraph::new(lines).block(Block::default().title("Settings").borders(Borders::ALL));
    frame.render_widget(settings, area);
}

fn render_popup(frame: &mut Frame, title: &str, message: &str, color: Color) {
    let area = centered_rect(60, 20, frame.area());
    let popup = Paragraph::new(message)
        .style(Style::default().fg(color))
        .block(Block::default().title(title).borders(Borders::ALL));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
