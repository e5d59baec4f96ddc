mod detail;
mod list;
mod pagination;
mod popup;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::format;
use crate::location::Route;
use crate::pagination::PER_PAGE_OPTIONS;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.route() {
        Route::List => list::render(frame, app, chunks[1]),
        Route::Detail(id) => detail::render(frame, app, id, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if let InputMode::PageSizeSelect(selected) = app.input {
        popup::render_page_size_select(frame, &PER_PAGE_OPTIONS, app.page.page_size, selected);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.route() {
        Route::List => "dex - Pokédex".to_string(),
        Route::Detail(id) => match app.detail.data() {
            Some(pokemon) => format!(
                "dex - {} {}",
                format::dex_number(pokemon.id),
                format::display_name(&pokemon.name)
            ),
            None => format!("dex - {}", format::dex_number(id)),
        },
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            app.location().to_string(),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let InputMode::Search(query) = &app.input {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(query.as_str()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ])
    } else if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Green),
        )])
    } else if app.list.is_loading() || app.detail.is_loading() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.route() {
            Route::List if app.history.can_go_back() => {
                "j/k: nav | h/l: page | g/G: first/last | :: go to | s/+/-: per page | Enter: open | /: search | q: back"
            }
            Route::List => {
                "j/k: nav | h/l: page | g/G: first/last | :: go to | s/+/-: per page | Enter: open | /: search | q: quit"
            }
            Route::Detail(_) => {
                "j/k: links | Enter: open | s: shiny | o: artwork | b: back to list | y: yank | q: back"
            }
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Placeholder text in a bordered block, for loading and error states
fn render_message(frame: &mut Frame, title: &str, message: &str, color: Color, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}
