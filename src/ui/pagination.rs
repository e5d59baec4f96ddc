use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode};

/// Pagination bar under the list. Nothing is drawn while a page is
/// loading; after a failed load only the per-page selector remains.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if !app.page_size_select_visible() {
        frame.render_widget(block, area);
        return;
    }

    let mut spans = Vec::new();

    if let Some(total) = app.total_pages().filter(|_| app.controls_visible()) {
        let has_previous = app.page.has_previous();
        let has_next = app.page.has_next(total);

        spans.push(button("« first", has_previous));
        spans.push(Span::raw("  "));
        spans.push(button("‹ prev", has_previous));
        spans.push(Span::raw("   "));

        match &app.input {
            InputMode::PageInput(buf) => {
                spans.push(Span::styled("Go to page: ", Style::default().fg(Color::Yellow)));
                spans.push(Span::styled(
                    buf.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled("█", Style::default().fg(Color::Gray)));
                spans.push(Span::raw(format!(" of {}", total)));
            }
            _ => {
                spans.push(Span::raw("Page "));
                spans.push(Span::styled(
                    app.page.page.to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(format!(" of {}", total)));
            }
        }

        spans.push(Span::raw("   "));
        spans.push(button("next ›", has_next));
        spans.push(Span::raw("  "));
        spans.push(button("last »", has_next));
        spans.push(Span::raw("     "));
    }

    spans.push(Span::styled("Per page: ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        app.page.page_size.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));

    let bar = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(bar, area);
}

fn button(label: &'static str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(label, Style::default().fg(Color::White))
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}
