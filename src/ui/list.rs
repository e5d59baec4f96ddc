use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::app::App;
use crate::format;
use crate::query::LoadState;

use super::{pagination, render_message};

const LOAD_ERROR: &str = "Failed to load Pokémon. Please try again later.";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    match app.list.state() {
        LoadState::Idle | LoadState::Loading => {
            render_message(frame, "Pokédex", "Loading Pokémon...", Color::Yellow, chunks[0]);
        }
        LoadState::Failed(_) => {
            render_message(frame, "Pokédex", LOAD_ERROR, Color::Red, chunks[0]);
        }
        LoadState::Ready(result) if result.items.is_empty() => {
            render_message(frame, "Pokédex", "No Pokémon on this page", Color::Gray, chunks[0]);
        }
        LoadState::Ready(result) => {
            let items: Vec<ListItem> = result
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let style = if i == app.list_index {
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };

                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:<6}", format::dex_number(item.id)),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(format::display_name(&item.name), style),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Pokédex ({} total)", result.total)),
                )
                .highlight_style(Style::default().bg(Color::DarkGray));

            let mut state = ListState::default();
            state.select(Some(app.list_index));

            frame.render_stateful_widget(list, chunks[0], &mut state);
        }
    }

    pagination::render(frame, app, chunks[1]);
}
