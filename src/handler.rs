use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{App, InputMode};
use crate::tui::Event;

/// Byte offset of the `char_idx`-th character, for cursor edits on UTF-8 input
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Resize(_, _) => {}
        Event::Tick => {
            app.tick_animation();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Transcript scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_to_bottom(),

        // Toggle sidebar
        KeyCode::Char('b') => app.show_sidebar = !app.show_sidebar,

        // Back to writing
        KeyCode::Char('i') | KeyCode::Tab | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // Modified Enter inserts a literal newline; plain Enter submits
            if key.modifiers.contains(KeyModifiers::SHIFT)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.insert(byte_pos, '\n');
                app.input_cursor += 1;
            } else if let Some(text) = app.begin_submission() {
                spawn_request(app, text);
            }
        }
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
            app.input.insert(byte_pos, c);
            app.input_cursor += 1;
        }
        _ => {}
    }
}

/// Issue the one outstanding network call for an accepted submission.
fn spawn_request(app: &mut App, text: String) {
    let client = app.client.clone();
    app.request_task = Some(tokio::spawn(async move { client.ask(&text).await }));
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.scroll_down();
            app.scroll_down();
            app.scroll_down();
        }
        MouseEventKind::ScrollUp => {
            app.scroll_up();
            app.scroll_up();
            app.scroll_up();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn editing_app() -> App {
        let mut app = App::new(&Config::default());
        app.input_mode = InputMode::Editing;
        app
    }

    #[test]
    fn test_char_to_byte_index_multibyte() {
        let s = "héllo";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 2), 3);
        assert_eq!(char_to_byte_index(s, 5), s.len());
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = editing_app();
        app.input = "line one".to_string();
        app.input_cursor = app.input.chars().count();

        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));

        assert_eq!(app.input, "line one\n");
        assert_eq!(app.messages.len(), 1);
        assert!(!app.loading);
    }

    #[test]
    fn test_alt_enter_inserts_newline_at_cursor() {
        let mut app = editing_app();
        app.input = "ab".to_string();
        app.input_cursor = 1;

        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));

        assert_eq!(app.input, "a\nb");
        assert_eq!(app.input_cursor, 2);
    }

    #[test]
    fn test_plain_enter_on_blank_input_is_ignored() {
        let mut app = editing_app();
        app.input = "   ".to_string();
        app.input_cursor = 3;

        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.messages.len(), 1);
        assert!(!app.loading);
        assert!(app.request_task.is_none());
    }

    #[tokio::test]
    async fn test_plain_enter_submits_and_issues_request() {
        let config = Config {
            endpoint: Some("http://127.0.0.1:9".to_string()),
        };
        let mut app = App::new(&config);
        app.input_mode = InputMode::Editing;
        app.input = "hello".to_string();
        app.input_cursor = 5;

        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.messages.len(), 2);
        assert!(app.input.is_empty());
        assert!(app.loading);
        assert!(app.request_task.is_some());

        if let Some(task) = app.request_task.take() {
            task.abort();
        }
    }

    #[tokio::test]
    async fn test_plain_enter_while_outstanding_is_ignored() {
        let config = Config {
            endpoint: Some("http://127.0.0.1:9".to_string()),
        };
        let mut app = App::new(&config);
        app.input_mode = InputMode::Editing;
        app.input = "first".to_string();
        app.input_cursor = 5;
        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        app.input = "second".to_string();
        app.input_cursor = 6;
        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.input, "second");

        if let Some(task) = app.request_task.take() {
            task.abort();
        }
    }

    #[test]
    fn test_backspace_removes_char_before_cursor() {
        let mut app = editing_app();
        app.input = "héllo".to_string();
        app.input_cursor = 2;

        handle_key(&mut app, KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));

        assert_eq!(app.input, "hllo");
        assert_eq!(app.input_cursor, 1);
    }

    #[test]
    fn test_escape_returns_to_normal_mode() {
        let mut app = editing_app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
