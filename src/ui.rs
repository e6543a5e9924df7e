use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use typedrill::{controller::SessionView, metrics, modes::GuideDisplay};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.controller.snapshot();

        if view.finished {
            render_results(self, &view, area, buf);
        } else {
            render_typing(self, &view, area, buf);
        }
    }
}

fn render_typing(app: &App, view: &SessionView, area: Rect, buf: &mut Buffer) {
    let snippet = app.controller.snippet();
    let code_lines = build_code_lines(app, view);
    let code_height = code_lines.len() as u16;

    let zen = app.controller.focus;
    let header_height = if zen { 0 } else { 2 };
    let footer_height = if zen { 0 } else { 2 };

    let top_pad = area
        .height
        .saturating_sub(code_height + header_height + footer_height)
        / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Length(top_pad),
            Constraint::Length(code_height),
            Constraint::Min(0),
            Constraint::Length(footer_height),
        ])
        .split(area);

    if !zen {
        let mut header = format!(
            "{}  {}  [{} / {}]",
            snippet.id, snippet.title, snippet.language, snippet.category
        );
        let modes = mode_tags(app);
        if !modes.is_empty() {
            header.push_str("   ");
            header.push_str(&modes);
        }
        let header_style = if app.flash_ticks > 0 {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        Paragraph::new(Span::styled(header, header_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
    }

    // Left-align the block as a whole, centered by its widest line.
    let widest = snippet
        .code
        .lines()
        .map(|l| l.width())
        .max()
        .unwrap_or(0) as u16;
    let code_area = centered_block(chunks[2], widest);
    Paragraph::new(code_lines).render(code_area, buf);

    if !zen {
        let stats = format!(
            "{} wpm   {}% acc   {}   {}%",
            view.wpm,
            view.accuracy,
            metrics::format_elapsed(view.elapsed),
            view.progress
        );
        let hints = "(esc)ape / ctrl-r restart / ctrl-b bot / \u{2190}\u{2192} snippets / F1-F6 modes";
        let footer = vec![
            Line::from(Span::styled(
                stats,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                hints,
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            )),
        ];
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

/// One styled span per target character, split into lines on the target's
/// own newlines. Typed text shows what was typed; the rest shows the guide
/// according to the resolved display state.
fn build_code_lines<'a>(app: &App, view: &SessionView) -> Vec<Line<'a>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green = bold.fg(Color::Green);
    let red = bold.fg(Color::Red);
    let dim = bold.add_modifier(Modifier::DIM);
    let ghost = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
    let cursor = dim.add_modifier(Modifier::UNDERLINED);

    let target: Vec<char> = app.controller.snippet().code.chars().collect();
    let typed: Vec<char> = view.transcript.chars().collect();
    let correct = app.controller.per_char_correct();

    let untyped_style = match view.guide {
        GuideDisplay::Full => dim,
        GuideDisplay::Ghost => ghost,
        GuideDisplay::Hidden => Style::default(),
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();

    for (idx, &expected) in target.iter().enumerate() {
        if idx < typed.len() {
            if correct[idx] {
                if expected == '\n' {
                    lines.push(Line::from(std::mem::take(&mut spans)));
                } else {
                    spans.push(Span::styled(expected.to_string(), green));
                }
            } else {
                // Show the typed character, with wrong whitespace made visible.
                let symbol = match typed[idx] {
                    ' ' | '\n' | '\t' => "\u{b7}".to_owned(),
                    c => c.to_string(),
                };
                spans.push(Span::styled(symbol, red));
                if expected == '\n' {
                    lines.push(Line::from(std::mem::take(&mut spans)));
                }
            }
        } else {
            let at_cursor = idx == typed.len();
            if expected == '\n' {
                if at_cursor {
                    spans.push(Span::styled(" ".to_owned(), cursor));
                }
                lines.push(Line::from(std::mem::take(&mut spans)));
            } else {
                let symbol = if view.guide == GuideDisplay::Hidden {
                    " ".to_owned()
                } else {
                    expected.to_string()
                };
                let style = if at_cursor { cursor } else { untyped_style };
                spans.push(Span::styled(symbol, style));
            }
        }
    }
    lines.push(Line::from(spans));
    lines
}

fn render_results(app: &App, view: &SessionView, area: Rect, buf: &mut Buffer) {
    let snippet = app.controller.snippet();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let title = format!("{}  {}  complete", snippet.id, snippet.title);
    Paragraph::new(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let mut stats = format!(
        "{} wpm   {}% acc   {}",
        view.wpm,
        view.accuracy,
        metrics::format_elapsed(view.elapsed)
    );
    if app.controller.modes.precision && view.accuracy == 100 {
        stats.push_str("   PERFECT");
    }
    let stats_style = if view.accuracy == 100 {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Paragraph::new(Span::styled(stats, stats_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if let Some(output) = &snippet.output {
        let mut lines = vec![Line::from(Span::styled(
            "output:",
            Style::default().add_modifier(Modifier::DIM),
        ))];
        lines.extend(output.lines().map(|l| {
            Line::from(Span::styled(
                l.to_owned(),
                Style::default().fg(Color::Cyan),
            ))
        }));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);
    }

    Paragraph::new(Span::styled(
        "(r)etry / (n)ext / \u{2190}\u{2192} snippets / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn mode_tags(app: &App) -> String {
    let modes = app.controller.modes;
    let mut tags: Vec<&str> = Vec::new();
    if modes.ghost {
        tags.push("[ghost]");
    }
    if modes.recall {
        tags.push("[recall]");
    }
    if modes.blind {
        tags.push("[blind]");
    }
    if modes.hardcore {
        tags.push("[hardcore]");
    }
    if modes.precision {
        tags.push("[precision]");
    }
    if app.controller.bot_running() {
        tags.push("[bot]");
    }
    tags.join(" ")
}

fn centered_block(area: Rect, content_width: u16) -> Rect {
    let width = content_width.min(area.width);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    Rect::new(x, area.y, width.max(1), area.height)
}
