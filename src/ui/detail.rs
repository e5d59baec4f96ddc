use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::format;
use crate::query::LoadState;
use crate::types::{LinkKind, Pokemon, RelatedLink};

use super::render_message;

const BAR_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, app: &App, id: u32, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let title = format!("Pokémon {}", format::dex_number(id));
    match app.detail.state() {
        LoadState::Idle | LoadState::Loading => {
            render_message(frame, &title, "Loading Pokémon...", Color::Yellow, chunks[0]);
        }
        LoadState::Failed(msg) => {
            render_message(frame, &title, msg, Color::Red, chunks[0]);
        }
        LoadState::Ready(pokemon) => render_pokemon(frame, app, pokemon, chunks[0]),
    }

    // The way back to the list is there whatever state the record is in
    render_back_link(frame, app, chunks[1]);
}

fn render_pokemon(frame: &mut Frame, app: &App, pokemon: &Pokemon, area: Rect) {
    let links = pokemon.related_links();
    let link_height = if links.is_empty() {
        0
    } else {
        links.len() as u16 + 2
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(link_height)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_profile(frame, app, pokemon, columns[0]);
    render_stats(frame, pokemon, columns[1]);

    if !links.is_empty() {
        render_links(frame, app, &links, rows[1]);
    }
}

fn render_profile(frame: &mut Frame, app: &App, pokemon: &Pokemon, area: Rect) {
    let label = Style::default().fg(Color::Gray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", format::dex_number(pokemon.id)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format::display_name(&pokemon.name),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    let mut types = vec![Span::styled("Types: ", label)];
    for slot in &pokemon.types {
        types.push(Span::styled(
            format!(" {} ", slot.kind.name.to_uppercase()),
            Style::default()
                .fg(Color::Black)
                .bg(type_color(&slot.kind.name)),
        ));
        types.push(Span::raw(" "));
    }
    lines.push(Line::from(types));

    lines.push(Line::from(vec![
        Span::styled("Height: ", label),
        Span::raw(format::height_m(pokemon.height)),
        Span::raw("   "),
        Span::styled("Weight: ", label),
        Span::raw(format::weight_kg(pokemon.weight)),
    ]));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Abilities:", label)));
    for slot in &pokemon.abilities {
        let mut spans = vec![Span::raw(format!("  {}", format::link_label(&slot.ability.name)))];
        if slot.is_hidden {
            spans.push(Span::styled(" (hidden)", Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    let artwork_label = if app.show_shiny { "Artwork (shiny): " } else { "Artwork: " };
    lines.push(Line::from(vec![
        Span::styled(artwork_label, label),
        Span::styled(
            pokemon.artwork(app.show_shiny).unwrap_or("none").to_string(),
            Style::default().fg(Color::Blue),
        ),
    ]));
    if pokemon.has_shiny_artwork() {
        let toggle = if app.show_shiny { "s: show normal" } else { "s: show shiny" };
        lines.push(Line::from(Span::styled(toggle, Style::default().fg(Color::DarkGray))));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    app.set_detail_max_scroll(max_scroll);
    let scroll_offset = app.scroll_offset.min(max_scroll);

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(scroll_offset)
        .take(inner_height)
        .collect();

    frame.render_widget(Clear, area);
    let profile = Paragraph::new(Text::from(visible))
        .block(Block::default().borders(Borders::ALL).title("Profile"));
    frame.render_widget(profile, area);
}

fn render_stats(frame: &mut Frame, pokemon: &Pokemon, area: Rect) {
    let lines: Vec<Line> = pokemon
        .stats
        .iter()
        .map(|slot| {
            let filled = (format::stat_ratio(slot.base_stat) * BAR_WIDTH as f64).round() as usize;
            Line::from(vec![
                Span::styled(
                    format!("{:<16}", format::link_label(&slot.stat.name)),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(format!("{:>3} ", slot.base_stat)),
                Span::styled("█".repeat(filled), Style::default().fg(stat_color(slot.base_stat))),
                Span::styled(
                    "░".repeat(BAR_WIDTH.saturating_sub(filled)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let stats = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Base stats"));
    frame.render_widget(stats, area);
}

fn render_links(frame: &mut Frame, app: &App, links: &[RelatedLink], area: Rect) {
    let lines: Vec<Line> = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let selected = i == app.link_index;
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let kind = match link.kind {
                LinkKind::Variety => "variety",
                LinkKind::Form => "form",
            };
            Line::from(vec![
                Span::raw(if selected { "> " } else { "  " }),
                Span::styled(format::link_label(&link.name), style),
                Span::styled(format!("  ({})", kind), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Varieties & forms");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_back_link(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "← Back to Pokédex",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}  (b)", app.location().back_link()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => Color::Gray,
    }
}

fn stat_color(base_stat: u32) -> Color {
    match base_stat {
        0..=49 => Color::Red,
        50..=89 => Color::Yellow,
        90..=119 => Color::Green,
        _ => Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_have_colors() {
        assert_eq!(type_color("electric"), Color::Rgb(248, 208, 48));
        assert_eq!(type_color("shadow"), Color::Gray);
    }

    #[test]
    fn stat_color_bands() {
        assert_eq!(stat_color(35), Color::Red);
        assert_eq!(stat_color(90), Color::Green);
        assert_eq!(stat_color(255), Color::Cyan);
    }
}
