// src/ui/widgets/report_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::knowledge_base;
use crate::core::models::CheckStatus;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

pub fn render_report_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Favicon Report (Navigate with ↑ ↓)");

    if !matches!(app.state, AppState::Finished) {
        let content = match app.state {
            AppState::Idle => {
                Paragraph::new("Scan results will appear here...").alignment(Alignment::Center)
            }
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", spinner_char),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw("Scanning... Please wait."),
                ]))
                .alignment(Alignment::Center)
            }
            _ => Paragraph::new(""),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    if let Some(message) = &app.scan_error {
        let error_text = Text::from(vec![
            Line::from(""),
            Line::from("SCAN FAILED".bold().fg(Color::Red)),
            Line::from(""),
            Line::from(message.as_str()),
        ]);
        frame.render_widget(
            Paragraph::new(error_text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(main_block),
            area,
        );
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Min(0)])
        .split(inner_area);

    let items: Vec<ListItem> = app
        .all_checks
        .iter()
        .map(|(category_name, check)| {
            let status_style = match check.status {
                CheckStatus::Pass => Style::default().fg(Color::Green),
                CheckStatus::Fail => Style::default().fg(Color::Red),
                CheckStatus::Warning => Style::default().fg(Color::Yellow),
                CheckStatus::Info => Style::default().fg(Color::Cyan),
            };
            let line = Line::from(vec![
                Span::styled(
                    format!("[{}] ", category_name),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(check.name.clone(), status_style),
            ]);
            ListItem::new(line)
        })
        .collect();

    let check_list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(check_list, chunks[0], &mut app.check_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    if let Some(selected_index) = app.check_list_state.selected() {
        if let Some((_, check)) = app.all_checks.get(selected_index) {
            let mut text = vec![
                Line::from(""),
                Line::from("WHAT IT IS:".yellow().bold()),
                Line::from(check.description.clone()),
            ];
            if let Some(details) = &check.details {
                text.push(Line::from(""));
                text.push(Line::from("FOUND:".yellow().bold()));
                for detail_line in details.lines() {
                    text.push(Line::from(detail_line.to_string()));
                }
            }
            if let Some(recommendation) = &check.recommendation {
                text.push(Line::from(""));
                text.push(Line::from("RECOMMENDATION:".yellow().bold()));
                text.push(Line::from(recommendation.clone()));
            }
            if check.status != CheckStatus::Pass {
                if let Some(guide) = knowledge_base::fix_guide(check.id) {
                    text.push(Line::from(""));
                    text.push(Line::from("HOW TO FIX:".yellow().bold()));
                    for (i, step) in guide.steps.iter().enumerate() {
                        text.push(Line::from(format!("{}. {}", i + 1, step)));
                    }
                    if let Some(code) = guide.code {
                        text.push(Line::from(""));
                        for code_line in code.lines() {
                            text.push(Line::from(Span::styled(
                                code_line.to_string(),
                                Style::default().fg(Color::Cyan),
                            )));
                        }
                    }
                }
            }
            let p = Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .block(detail_block);
            frame.render_widget(p, chunks[1]);
            return;
        }
    }
    render_placeholder_details(frame, app, detail_block, chunks[1]);
}

fn render_placeholder_details(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let total_issues = app.summary.failed_checks + app.summary.warning_checks;

    let placeholder_text = if total_issues == 0 {
        Text::from(vec![
            Line::from(""),
            Line::from("✓ EXCELLENT FAVICON SETUP".bold().fg(Color::Green)),
            Line::from(""),
            Line::from("No failed or warning checks were found during the scan."),
            Line::from(""),
            Line::from("Every browser and platform should display your icon correctly."),
        ])
    } else {
        Text::from("Select a check above to see details.")
    };

    let p = Paragraph::new(placeholder_text)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(p, area);
}
