use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use souschef_core::{GenerationOutcome, GenerationRequest, TextGenerator, DEFAULT_PERSONA};

use crate::AliveFlag;

/// Greeting shown before any user input.
const GREETING: &str =
    "Bonjour! I am the Sous-Chef. Ask me anything about the Head Chef's skills or menu.";

/// Fallback notice prefix; the user's question is appended verbatim.
const DEMO_NOTICE: &str =
    "Demo mode: I cannot reach the main kitchen right now (no API key configured), \
     but I hear you asking about: ";

/// Pause before a reply lands, so demo-mode answers don't feel instant.
const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the append-only chat transcript.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// The floating chat widget's state: an append-only transcript plus a busy
/// flag the hosting view uses to disable the send affordance. Lives as long
/// as the widget instance; dropping it is the only way to clear history.
pub struct ChatSession {
    id: Uuid,
    generator: Arc<dyn TextGenerator>,
    messages: Vec<ChatMessage>,
    busy: bool,
    alive: AliveFlag,
    reply_delay: Duration,
}

impl ChatSession {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "Opening chat session");

        Self {
            id,
            generator,
            messages: vec![ChatMessage::assistant(GREETING)],
            busy: false,
            alive: AliveFlag::new(),
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }

    /// Override the artificial reply delay (tests use zero).
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while a request is outstanding; the hosting view disables the
    /// send button on this, serializing user-visible sends.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Handle for the hosting view to revoke on teardown; a result that
    /// lands afterwards is discarded.
    pub fn alive_flag(&self) -> AliveFlag {
        self.alive.clone()
    }

    /// Send one user turn and wait for the reply to land in the transcript.
    ///
    /// Blank input is a no-op: no message appended, no network call. Every
    /// failure degrades to the canned demo-mode notice; nothing here returns
    /// an error to the view.
    pub async fn send(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }
        if self.busy {
            return;
        }

        let user_text = input.to_string();
        self.messages.push(ChatMessage::user(user_text.clone()));
        self.busy = true;

        let persona = self
            .generator
            .persona()
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());
        let request =
            GenerationRequest::new(user_text.clone()).with_system_instruction(persona);
        let outcome = self.generator.generate(request).await;

        tokio::time::sleep(self.reply_delay).await;

        if !self.alive.is_alive() {
            info!(session = %self.id, "Session torn down mid-flight; discarding reply");
            return;
        }

        let reply = match outcome {
            GenerationOutcome::Success(text) => text,
            GenerationOutcome::Unavailable | GenerationOutcome::TransportError(_) => {
                format!("{DEMO_NOTICE}{user_text}")
            }
        };
        self.messages.push(ChatMessage::assistant(reply));
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::test;

    struct ScriptedGenerator {
        outcome: GenerationOutcome,
        calls: AtomicUsize,
        seen: Mutex<Vec<GenerationRequest>>,
        persona: Option<String>,
        revoke_mid_flight: Option<AliveFlag>,
    }

    impl ScriptedGenerator {
        fn new(outcome: GenerationOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                persona: None,
                revoke_mid_flight: None,
            })
        }

        fn with_persona(outcome: GenerationOutcome, persona: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                persona: Some(persona.to_string()),
                revoke_mid_flight: None,
            })
        }

        fn revoking(outcome: GenerationOutcome, flag: AliveFlag) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                persona: None,
                revoke_mid_flight: Some(flag),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> GenerationRequest {
            self.seen.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: GenerationRequest) -> GenerationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request);
            if let Some(flag) = &self.revoke_mid_flight {
                flag.revoke();
            }
            self.outcome.clone()
        }

        fn model_name(&self) -> String {
            "scripted".to_string()
        }

        fn persona(&self) -> Option<String> {
            self.persona.clone()
        }
    }

    fn session(generator: Arc<ScriptedGenerator>) -> ChatSession {
        ChatSession::new(generator).with_reply_delay(Duration::ZERO)
    }

    #[test]
    async fn opens_with_the_greeting() {
        let session = session(ScriptedGenerator::new(GenerationOutcome::Unavailable));

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, ChatRole::Assistant);
        assert_eq!(session.messages()[0].text, GREETING);
    }

    #[test]
    async fn blank_input_is_a_no_op() {
        let generator = ScriptedGenerator::new(GenerationOutcome::Success("hi".to_string()));
        let mut session = session(generator.clone());

        session.send("").await;
        session.send("   \t\n").await;

        assert_eq!(generator.call_count(), 0);
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_busy());
    }

    #[test]
    async fn success_appends_the_reply_verbatim() {
        let generator =
            ScriptedGenerator::new(GenerationOutcome::Success("Hello, world!".to_string()));
        let mut session = session(generator.clone());

        session.send("say hello").await;

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].text, "say hello");
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[2].text, "Hello, world!");
        assert_eq!(generator.call_count(), 1);
    }

    #[test]
    async fn send_uses_the_generator_persona() {
        let generator = ScriptedGenerator::with_persona(
            GenerationOutcome::Success("aye".to_string()),
            "You are a pirate chef.",
        );
        let mut session = session(generator.clone());

        session.send("ahoy").await;

        let request = generator.last_request();
        assert_eq!(
            request.system_instruction.as_deref(),
            Some("You are a pirate chef.")
        );
    }

    #[test]
    async fn send_falls_back_to_the_default_persona() {
        let generator = ScriptedGenerator::new(GenerationOutcome::Unavailable);
        let mut session = session(generator.clone());

        session.send("hello").await;

        let request = generator.last_request();
        assert_eq!(request.system_instruction.as_deref(), Some(DEFAULT_PERSONA));
    }

    #[test]
    async fn fallback_echoes_the_user_text() {
        let generator = ScriptedGenerator::new(GenerationOutcome::Unavailable);
        let mut session = session(generator.clone());

        session.send("pizza").await;

        let last = session.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert!(last.text.contains("pizza"));
        assert!(last.text.starts_with(DEMO_NOTICE));
    }

    #[test]
    async fn transport_error_degrades_like_demo_mode() {
        let generator = ScriptedGenerator::new(GenerationOutcome::TransportError(
            "HTTP Error: 500".to_string(),
        ));
        let mut session = session(generator.clone());

        session.send("pizza").await;

        let last = session.messages().last().unwrap();
        assert!(last.text.contains("pizza"));
        // The raw transport detail never reaches the transcript.
        assert!(!last.text.contains("500"));
    }

    #[test]
    async fn torn_down_session_discards_the_reply() {
        let flag_holder = ScriptedGenerator::new(GenerationOutcome::Unavailable);
        let mut session = session(flag_holder);
        let generator = ScriptedGenerator::revoking(
            GenerationOutcome::Success("too late".to_string()),
            session.alive_flag(),
        );
        session.generator = generator.clone();

        session.send("anyone there?").await;

        // The user turn landed before the flight; the reply did not.
        let last = session.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(generator.call_count(), 1);
    }
}
