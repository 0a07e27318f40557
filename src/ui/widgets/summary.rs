// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use crate::core::normalize::{format_bytes, short_path};
use crate::core::scoring;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Renders the high-level overview: score with rating, the animated gauge,
/// per-category scores, issue counts and the recommended favicon.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & rating
            Constraint::Length(1), // Gauge
            Constraint::Length(2), // Spacer
            Constraint::Length(5), // Category scores
            Constraint::Length(2), // Spacer
            Constraint::Length(3), // Issues found
            Constraint::Length(2), // Spacer
            Constraint::Min(0),    // Best favicon
        ])
        .split(area);

    if !matches!(app.state, AppState::Finished) {
        return;
    }
    let Some(result) = &app.scan_result else {
        return;
    };

    // --- Score & Rating ---
    let (rating_text, rating_style) = match app.summary.score {
        90..=100 => ("Excellent", Style::default().fg(Color::Green)),
        80..=89 => ("Good", Style::default().fg(Color::Cyan)),
        60..=79 => ("Fair", Style::default().fg(Color::Yellow)),
        40..=59 => ("Poor", Style::default().fg(Color::LightRed)),
        _ => ("Critical", Style::default().fg(Color::Red)),
    };
    let mut score_line =
        Line::from(format!("{}/100 ({})", app.summary.score, rating_text)).style(rating_style);
    if app.summary.from_cache {
        score_line.push_span(Span::styled(" cached", Style::default().fg(Color::DarkGray)));
    }
    let score_text = Text::from(vec![Line::from("Favicon Score".bold()), score_line]);
    frame.render_widget(
        Paragraph::new(score_text).alignment(Alignment::Center),
        summary_chunks[0],
    );

    // --- Gauge (animated) ---
    let score_gauge = Gauge::default()
        .percent(app.displayed_score as u16)
        .label("")
        .style(Style::default().fg(if app.displayed_score >= 80 {
            Color::Green
        } else if app.displayed_score >= 50 {
            Color::Yellow
        } else {
            Color::Red
        }));
    frame.render_widget(score_gauge, summary_chunks[1]);

    // --- Category Scores ---
    let categories_block = Block::default().title("CATEGORIES".bold());
    let categories = [
        &result.categories.basic,
        &result.categories.sizes,
        &result.categories.platforms,
        &result.categories.accessibility,
    ];
    let category_lines: Vec<Line> = categories
        .iter()
        .map(|category| {
            let style = if category.score >= 80 {
                Style::default().fg(Color::Green)
            } else if category.score >= 50 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Red)
            };
            Line::from(vec![
                Span::raw(format!("{}: ", category.name)),
                Span::styled(category.score.to_string(), style),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(category_lines).block(categories_block),
        summary_chunks[3],
    );

    // --- Issues Found ---
    let issues_block = Block::default().title("ISSUES FOUND".bold());
    let details_text = Text::from(vec![
        Line::from(vec![
            Span::raw("Failed:   "),
            Span::styled(
                app.summary.failed_checks.to_string(),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(vec![
            Span::raw("Warnings: "),
            Span::styled(
                app.summary.warning_checks.to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ]);
    frame.render_widget(
        Paragraph::new(details_text).block(issues_block),
        summary_chunks[5],
    );

    // --- Best Favicon ---
    let best_block = Block::default().title("BEST FAVICON".bold());
    let best_lines = match scoring::best_favicon(&result.favicons) {
        Some(best) => {
            let mut lines = vec![Line::from(vec![
                Span::raw("- "),
                Span::styled(short_path(&best.url), Style::default().fg(Color::Cyan)),
            ])];
            let mut attrs = Vec::new();
            if let Some(format) = best.format {
                attrs.push(format.label().to_string());
            }
            if let Some(dims) = best.dimensions {
                attrs.push(format!("{}x{}", dims.width, dims.height));
            }
            if let Some(size) = best.size {
                attrs.push(format_bytes(size));
            }
            if !attrs.is_empty() {
                lines.push(Line::from(format!("  {}", attrs.join(", "))));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No accessible favicon found.",
            Style::default().fg(Color::Red),
        ))],
    };
    frame.render_widget(
        Paragraph::new(best_lines).block(best_block),
        summary_chunks[7],
    );
}
