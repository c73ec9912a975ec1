use anyhow::Result;
use tokio::task::JoinHandle;

use crate::client::{AskResponse, AssistClient};
use crate::config::Config;
use crate::message::Message;

/// Greeting seeded into the transcript at startup.
pub const GREETING: &str =
    "Hello! I'm Civic Assist. How can I help you with civic information today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Conversation store (append-only)
    pub messages: Vec<Message>,

    // Input state
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars

    // Request dispatch state
    pub loading: bool,
    pub request_task: Option<JoinHandle<Result<AskResponse>>>,

    // Transcript viewport state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Sidebar state
    pub show_sidebar: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub client: AssistClient,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut app = Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            messages: Vec::new(),

            input: String::new(),
            input_cursor: 0,

            loading: false,
            request_task: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            show_sidebar: true,

            animation_frame: 0,

            client: AssistClient::new(config.endpoint()),
        };

        app.push_message(Message::assistant(GREETING, Vec::new()));
        app
    }

    /// Append to the conversation. The transcript is append-only; every
    /// mutation re-pins the viewport to the newest entry.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_to_bottom();
    }

    /// Accept or reject a submission. Blank input and an outstanding request
    /// are both rejected silently. On accept, the user message is appended
    /// with the raw input text, the input buffer clears, and the text to
    /// send is returned so the caller can issue the one network call.
    pub fn begin_submission(&mut self) -> Option<String> {
        if self.input.trim().is_empty() || self.loading || self.request_task.is_some() {
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.input_cursor = 0;
        self.loading = true;
        self.push_message(Message::user(text.clone()));
        Some(text)
    }

    /// Fold the outcome of a request into the conversation. Exactly one
    /// assistant entry is appended and the outstanding-request flag clears
    /// on both paths. Failure detail goes to the diagnostic log only.
    pub fn resolve_response(&mut self, result: Result<AskResponse>) {
        let message = match result {
            Ok(response) => {
                let content = response.resolve_content();
                Message::assistant(content, response.sources)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    endpoint = self.client.endpoint(),
                    "answer request failed"
                );
                Message::assistant(self.error_notice(), Vec::new())
            }
        };

        self.loading = false;
        self.request_task = None;
        self.push_message(message);
    }

    /// Notice appended in place of an assistant reply when a request fails.
    pub fn error_notice(&self) -> String {
        format!(
            "Sorry, I encountered an error. Please make sure the backend is running at {}",
            self.client.endpoint()
        )
    }

    /// Drain a finished request task. Called from the event loop; the
    /// animation tick bounds how long a finished request can sit unobserved.
    pub async fn poll_response(&mut self) {
        let finished = self
            .request_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);

        if !finished {
            return;
        }

        if let Some(task) = self.request_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(err) => Err(anyhow::anyhow!("request task failed: {}", err)),
            };
            self.resolve_response(result);
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Transcript scrolling
    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    /// Scroll the transcript so the newest entry (or the loading indicator)
    /// is visible. Mirrors the renderer's line layout per message: role
    /// line, wrapped content, optional sources line, timestamp, blank.
    pub fn scroll_to_bottom(&mut self) {
        // The renderer records the real transcript dimensions on each draw;
        // fall back to something sane before the first one
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        let mut total_lines: u16 = 0;
        for msg in &self.messages {
            total_lines += 1; // role label
            for line in msg.content.lines() {
                // Wrapping is estimated in chars, not bytes; an empty line
                // still occupies a row
                total_lines += (line.chars().count() / wrap_width) as u16 + 1;
            }
            if !msg.sources.is_empty() {
                total_lines += 1;
            }
            total_lines += 2; // timestamp + separating blank
        }
        if self.loading {
            total_lines += 2; // role label + thinking indicator
        }

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NO_ANSWER_FALLBACK;
    use crate::message::{Role, SourceRef};
    use anyhow::anyhow;

    fn test_app() -> App {
        App::new(&Config::default())
    }

    #[test]
    fn test_starts_with_greeting() {
        let app = test_app();
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].role, Role::Assistant);
        assert_eq!(app.messages[0].content, GREETING);
        assert!(!app.loading);
    }

    #[test]
    fn test_submission_appends_user_message_and_clears_input() {
        let mut app = test_app();
        app.input = "  what are my voting rights? ".to_string();
        app.input_cursor = app.input.chars().count();

        let sent = app.begin_submission();

        assert_eq!(sent.as_deref(), Some("  what are my voting rights? "));
        assert_eq!(app.messages.len(), 2);
        let last = app.messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "  what are my voting rights? ");
        assert!(app.input.is_empty());
        assert_eq!(app.input_cursor, 0);
        assert!(app.loading);
    }

    #[test]
    fn test_blank_submission_is_ignored() {
        let mut app = test_app();
        app.input = "   \n  ".to_string();

        assert!(app.begin_submission().is_none());
        assert_eq!(app.messages.len(), 1);
        assert!(!app.loading);
        assert_eq!(app.input, "   \n  ");
    }

    #[test]
    fn test_submission_while_outstanding_is_ignored() {
        let mut app = test_app();
        app.input = "first".to_string();
        assert!(app.begin_submission().is_some());

        app.input = "second".to_string();
        assert!(app.begin_submission().is_none());
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.input, "second");
    }

    #[test]
    fn test_success_appends_assistant_and_clears_flag() {
        let mut app = test_app();
        app.input = "hello".to_string();
        app.begin_submission();

        let response: AskResponse =
            serde_json::from_str(r#"{"answer": "X", "sources": ["a", "b"]}"#).unwrap();
        app.resolve_response(Ok(response));

        assert!(!app.loading);
        assert_eq!(app.messages.len(), 3);
        let last = app.messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "X");
        let labels: Vec<_> = last.sources.iter().map(SourceRef::label).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn test_failure_appends_generic_notice_without_detail() {
        let mut app = test_app();
        app.input = "hello".to_string();
        app.begin_submission();

        app.resolve_response(Err(anyhow!("connection refused")));

        assert!(!app.loading);
        assert_eq!(app.messages.len(), 3);
        let notice = app.error_notice();
        let last = app.messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, notice);
        assert!(last.sources.is_empty());
        assert!(!last.content.contains("connection refused"));
    }

    #[test]
    fn test_round_trip_grows_conversation_by_two() {
        let mut app = test_app();
        let before = app.messages.len();

        app.input = "hello".to_string();
        app.begin_submission();
        app.resolve_response(Ok(AskResponse::default()));

        assert_eq!(app.messages.len(), before + 2);
        assert!(!app.loading);
        assert_eq!(app.messages.last().unwrap().content, NO_ANSWER_FALLBACK);
    }

    #[test]
    fn test_submission_accepted_again_after_resolution() {
        let mut app = test_app();
        app.input = "first".to_string();
        app.begin_submission();
        app.resolve_response(Err(anyhow!("boom")));

        app.input = "second".to_string();
        assert!(app.begin_submission().is_some());
        assert_eq!(app.messages.len(), 4);
    }

    #[test]
    fn test_animation_only_advances_while_loading() {
        let mut app = test_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.loading = true;
        app.tick_animation();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0); // wrapped 1 -> 2 -> 0
    }
}
