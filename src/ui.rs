use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, InputMode};
use crate::message::Role;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Header line, body, hint line
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    let chat_area = if app.show_sidebar {
        let [sidebar_area, chat_area] =
            Layout::horizontal([Constraint::Length(26), Constraint::Min(0)]).areas(body_area);
        render_sidebar(frame, sidebar_area);
        chat_area
    } else {
        body_area
    };

    render_chat(app, frame, chat_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Civic Assist ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "AI-Powered Civic Information ",
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [actions_area, history_area, version_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let new_chat = Paragraph::new(Line::from(Span::styled(
        " + New Chat ",
        Style::default().fg(Color::White).bg(Color::DarkGray).bold(),
    )));
    frame.render_widget(new_chat, actions_area);

    let history = Paragraph::new(vec![
        Line::from(Span::styled(
            "HISTORY",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "No previous chats",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ]);
    frame.render_widget(history, history_area);

    let version = Paragraph::new(Line::from(Span::styled(
        format!("Civic Assist v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::DarkGray),
    )))
    .centered();
    frame.render_widget(version, version_area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    // Store transcript dimensions for scroll calculations (inner size minus borders)
    app.chat_height = transcript_area.height.saturating_sub(2);
    app.chat_width = transcript_area.width.saturating_sub(2);

    let transcript_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    let mut lines: Vec<Line> = Vec::new();

    for msg in &app.messages {
        let role_label = match msg.role {
            Role::User => Span::styled(
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Role::Assistant => Span::styled(
                "Civic Assist:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::from(role_label));

        // Content is rendered verbatim, no markup interpretation
        for line in msg.content.lines() {
            lines.push(Line::from(line));
        }

        if !msg.sources.is_empty() {
            let mut spans = vec![Span::styled(
                "Sources: ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )];
            for (i, source) in msg.sources.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(", ", Style::default().fg(Color::DarkGray)));
                }
                spans.push(Span::styled(
                    source.label().to_string(),
                    Style::default().fg(Color::Magenta),
                ));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(Span::styled(
            msg.timestamp(),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::default());
    }

    if app.loading {
        lines.push(Line::from(Span::styled(
            "Civic Assist:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        // Ellipsis grows with the animation frame, one to three dots
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let transcript = Paragraph::new(Text::from(lines))
        .block(transcript_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, transcript_area);

    render_input(app, frame, input_area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Ask about civic information ");

    // Single-line window over the buffer with horizontal scrolling to keep
    // the cursor visible; embedded newlines show as a return symbol
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;
    let scroll_offset = cursor_pos.saturating_sub(inner_width.saturating_sub(1));

    let visible_text: String = app
        .input
        .chars()
        .map(|c| if c == '\n' { '⏎' } else { c })
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, area);

    // Terminal cursor only while writing
    if app.input_mode == InputMode::Editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " BROWSE ",
        InputMode::Editing => " WRITE ",
    };

    // Keycap-style hints, readable on light and dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Shift+Enter ", key_style),
            Span::styled(" newline ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" browse ", label_style),
        ],
        InputMode::Normal => vec![
            Span::styled(" i ", key_style),
            Span::styled(" write ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" b ", key_style),
            Span::styled(" sidebar ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    let footer = Paragraph::new(Line::from(spans));
    frame.render_widget(footer, area);
}
