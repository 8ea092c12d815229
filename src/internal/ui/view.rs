use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use super::app::App;
use crate::internal::notification::NotificationType;
use crate::internal::screen::{BONUS_LABEL, ContentView, ErrorBanner, ScreenView};
use crate::utils::text::wrap_joke;

const CARD_MAX_WIDTH: u16 = 64;

const DOLPHIN: &[&str] = &[
    r"                 __",
    r"             _.-~  )",
    r"  _..--~~~~,'   ,-/     _",
    r"-.__      `-,  '(/     /,",
    r"    `~~-.__  '-.__\   //",
    r"           ~~--.__ \_//",
];

#[tracing::instrument(skip(app, f))]
pub fn draw(app: &mut App, f: &mut Frame) {
    let area = f.area();

    match app.screen.view() {
        ScreenView::Spinner => render_spinner(app, f, area),
        ScreenView::Content(view) => {
            let chunks = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

            f.render_widget(
                Block::default().style(Style::default().bg(app.palette.page)),
                area,
            );
            render_top_bar(app, &view, f, chunks[0]);
            render_content(app, &view, f, chunks[1]);
            render_status_bar(app, &view, f, chunks[2]);

            if let Some(message) = view.modal {
                render_modal(app, message, f);
            }

            if app.notification.is_some() {
                render_notification(app, f);
            }
        }
    }
}

fn render_spinner(app: &App, f: &mut Frame, area: Rect) {
    f.render_widget(
        Block::default().style(Style::default().bg(app.palette.accent)),
        area,
    );

    let elapsed = app
        .fetch_started_at
        .map(|t| format!(" {:.1}s", t.elapsed().as_secs_f32()))
        .unwrap_or_default();

    let [center] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    let spinner = Paragraph::new(format!("{} Loading...{}", app.get_spinner_char(), elapsed))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(app.palette.text)
                .bg(app.palette.accent)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(spinner, center);
}

fn render_top_bar(app: &App, view: &ContentView, f: &mut Frame, area: Rect) {
    let Some(sound_on) = view.sound_toggle else {
        return;
    };

    let indicator = match sound_on {
        true => Span::styled(" ● on ", Style::default().fg(Color::White).bg(app.palette.accent)),
        false => Span::styled(" ○ off ", Style::default().fg(Color::Black).bg(Color::Gray)),
    };
    let line = Line::from(vec![
        Span::styled("Toggle sound ", Style::default().fg(Color::Black)),
        indicator,
        Span::raw(" "),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn render_content(app: &App, view: &ContentView, f: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(4).min(CARD_MAX_WIDTH);
    // Two border columns plus one column of padding on each side.
    let text_width = width.saturating_sub(4);

    let error_lines = view
        .error
        .as_ref()
        .map(|banner| wrap_joke(&banner.message, text_width));
    let joke_lines = view
        .joke_text
        .as_deref()
        .map(|text| wrap_joke(text, text_width));

    let mut constraints = Vec::new();
    if let Some(lines) = &error_lines {
        constraints.push(Constraint::Length(lines.len() as u16 + 2));
        constraints.push(Constraint::Length(1));
    }
    if let Some(lines) = &joke_lines {
        constraints.push(Constraint::Length(lines.len() as u16 + 2));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));
    if view.bonus_button {
        constraints.push(Constraint::Length(3));
    }
    let show_illustration = view.illustration && view.modal.is_none();
    if show_illustration {
        constraints.push(Constraint::Length(DOLPHIN.len() as u16 + 1));
    }

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let rows = Layout::vertical(constraints)
        .flex(Flex::Center)
        .split(column);
    let mut rows = rows.iter().copied();

    if let (Some(banner), Some(lines)) = (&view.error, error_lines)
        && let Some(rect) = rows.next()
    {
        render_error_card(app, banner, lines, f, rect);
        rows.next();
    }

    if let Some(lines) = joke_lines
        && let Some(rect) = rows.next()
    {
        render_joke_card(app, lines, f, rect);
        rows.next();
    }

    if let Some(rect) = rows.next() {
        render_button(app, view.primary_label, "Enter", f, rect);
    }

    if view.bonus_button
        && let Some(rect) = rows.next()
    {
        render_button(app, BONUS_LABEL, "b", f, rect);
    }

    if show_illustration && let Some(rect) = rows.next() {
        let art: Vec<Line> = DOLPHIN.iter().map(|l| Line::from(*l)).collect();
        let picture = Paragraph::new(art)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.palette.accent));
        f.render_widget(picture, rect);
    }
}

fn render_error_card(
    app: &App,
    banner: &ErrorBanner,
    lines: Vec<String>,
    f: &mut Frame,
    area: Rect,
) {
    let body: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let card = Paragraph::new(body)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(app.palette.text)
                .bg(app.palette.error)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1))
                .title(format!(" ✖ {} ", banner.title))
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        );
    f.render_widget(Clear, area);
    f.render_widget(card, area);
}

fn render_joke_card(app: &App, lines: Vec<String>, f: &mut Frame, area: Rect) {
    let body: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let card = Paragraph::new(body)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(app.palette.text)
                .bg(app.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.palette.page))
                .padding(Padding::horizontal(1)),
        );
    f.render_widget(card, area);
}

fn render_button(app: &App, label: &str, key_hint: &str, f: &mut Frame, area: Rect) {
    let button = Paragraph::new(Line::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  [{}]", key_hint), Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(app.palette.text).bg(app.palette.accent))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(app.palette.page)),
    );
    f.render_widget(button, area);
}

fn render_modal(app: &App, message: &str, f: &mut Frame) {
    let area = f.area();
    let popup_width = 40.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Esc to close", Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(app.palette.text).bg(app.palette.accent))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.palette.text)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn render_status_bar(app: &App, view: &ContentView, f: &mut Frame, area: Rect) {
    let status = match (view.modal.is_some(), view.error.is_some(), view.bonus_button) {
        (true, _, _) => "Esc/Enter/Space/q: Close".to_string(),
        (false, true, _) => "Enter: Retry | x/Esc: Dismiss | s: Sound | q: Quit".to_string(),
        (false, false, true) => {
            "Enter: Another joke | b: Bonus joke | s: Sound | q: Quit".to_string()
        }
        (false, false, false) => "Enter: Get a joke | s: Sound | q: Quit".to_string(),
    };

    let p = Paragraph::new(format!("{}  v{}", status, app.app_version)).style(
        Style::default()
            .fg(app.palette.text)
            .bg(app.palette.accent),
    );
    f.render_widget(p, area);
}

fn render_notification(app: &App, f: &mut Frame) {
    if let Some(notification) = &app.notification {
        let area = f.area();

        let popup_width = (notification.message.chars().count() as u16 + 4)
            .min(area.width.saturating_sub(4));
        let popup_height = 3.min(area.height);
        let popup_x = (area.width.saturating_sub(popup_width)) / 2;
        let popup_area =
            Rect::new(popup_x, area.y + 1, popup_width, popup_height).intersection(area);

        let bg_color = match notification.notification_type {
            NotificationType::Info => app.palette.accent,
            NotificationType::Warning => Color::Yellow,
        };

        let popup = Paragraph::new(notification.message.as_str())
            .style(
                Style::default()
                    .bg(bg_color)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(notification.notification_type.title()),
            )
            .alignment(Alignment::Center);

        f.render_widget(Clear, popup_area);
        f.render_widget(popup, popup_area);
    }
}
