//! Scripted in-memory bot used by the use case tests.
//!
//! Each question text maps to a [`Script`] describing how the fake bot
//! behaves for that exchange. Frames are only delivered after the question
//! has been sent, like the real service.

use crate::ports::bot_gateway::{BotGateway, GatewayError, ReplyStream};
use async_trait::async_trait;
use botbatch_domain::{Conversation, ConversationStarted, Frame, Token};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub(crate) type Delivery = Result<Frame, String>;

#[derive(Debug, Clone)]
pub(crate) enum Script {
    /// Deliver `frames` after `delay`, then keep the stream open.
    Frames { delay: Duration, frames: Vec<Delivery> },
    /// Never reply; the stream stays open.
    Silent,
    /// Close the stream after `delay` without replying.
    CloseAfter(Duration),
    FailToken,
    FailConversation,
    FailConnect,
    FailSend,
    PanicOnSend,
}

pub(crate) fn bot_reply(text: &str) -> Frame {
    Frame::Text(
        serde_json::json!({
            "activities": [
                {"type": "message", "from": {"id": "bot", "role": "bot"}, "text": text}
            ]
        })
        .to_string(),
    )
}

pub(crate) fn echo(text: &str) -> Frame {
    Frame::Text(
        serde_json::json!({
            "activities": [
                {"type": "message", "from": {"id": "tester", "role": "user"}, "text": text}
            ]
        })
        .to_string(),
    )
}

/// Reply after `delay` with an echo followed by the bot answer.
pub(crate) fn answers_with(text: &str, delay: Duration) -> Script {
    Script::Frames {
        delay,
        frames: vec![Ok(echo("(echo)")), Ok(bot_reply(text))],
    }
}

#[derive(Debug, Default)]
pub(crate) struct GatewayStats {
    pub tokens: AtomicUsize,
    pub conversations: AtomicUsize,
    pub connects: AtomicUsize,
    pub sends: AtomicUsize,
    pub closed: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
}

impl GatewayStats {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub(crate) struct ScriptedGateway {
    scripts: HashMap<String, Script>,
    default_delay: Duration,
    next_id: AtomicUsize,
    open: Mutex<HashMap<String, mpsc::UnboundedSender<Delivery>>>,
    pub stats: Arc<GatewayStats>,
}

impl ScriptedGateway {
    /// Every unscripted question is answered with `answer to <text>`.
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default_delay: Duration::from_millis(50),
            next_id: AtomicUsize::new(0),
            open: Mutex::new(HashMap::new()),
            stats: Arc::new(GatewayStats::default()),
        }
    }

    pub fn script(mut self, question: &str, script: Script) -> Self {
        self.scripts.insert(question.to_string(), script);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    fn script_for(&self, question: &str) -> Script {
        self.scripts.get(question).cloned().unwrap_or_else(|| {
            answers_with(&format!("answer to {question}"), self.default_delay)
        })
    }

    /// Scripts that fail before a conversation exists are keyed by the
    /// question text, which the gateway cannot see at that point; tests
    /// that need them use a gateway scripted for a single question.
    fn single_script(&self) -> Option<&Script> {
        if self.scripts.len() == 1 {
            self.scripts.values().next()
        } else {
            None
        }
    }
}

#[async_trait]
impl BotGateway for ScriptedGateway {
    async fn acquire_token(&self) -> Result<Token, GatewayError> {
        if matches!(self.single_script(), Some(Script::FailToken)) {
            return Err(GatewayError::Auth {
                status: 403,
                message: "forbidden".into(),
            });
        }
        self.stats.tokens.fetch_add(1, Ordering::SeqCst);
        Ok(Token::new("scripted-token"))
    }

    async fn start_conversation(&self, token: &Token) -> Result<Conversation, GatewayError> {
        if matches!(self.single_script(), Some(Script::FailConversation)) {
            return Err(GatewayError::Conversation("status 500".into()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.stats.conversations.fetch_add(1, Ordering::SeqCst);
        Conversation::from_started(
            ConversationStarted {
                conversation_id: Some(format!("conv-{id}")),
                stream_url: Some(format!("mock://conv-{id}")),
            },
            token.clone(),
        )
        .map_err(|e| GatewayError::Conversation(e.to_string()))
    }

    async fn connect(
        &self,
        conversation: &Conversation,
    ) -> Result<Box<dyn ReplyStream>, GatewayError> {
        if matches!(self.single_script(), Some(Script::FailConnect)) {
            return Err(GatewayError::Connect("refused".into()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.open
            .lock()
            .unwrap()
            .insert(conversation.id().to_string(), tx);
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_active.fetch_max(active, Ordering::SeqCst);
        Ok(Box::new(ScriptedStream {
            rx,
            closed: false,
            stats: Arc::clone(&self.stats),
        }))
    }

    async fn send(&self, conversation: &Conversation, text: &str) -> Result<(), GatewayError> {
        self.stats.sends.fetch_add(1, Ordering::SeqCst);
        let script = self.script_for(text);
        let tx = self.open.lock().unwrap().get(conversation.id()).cloned();
        let Some(tx) = tx else {
            return Err(GatewayError::Send {
                status: 404,
                body: "unknown conversation".into(),
            });
        };

        match script {
            Script::FailSend => Err(GatewayError::Send {
                status: 502,
                body: "bad gateway".into(),
            }),
            Script::PanicOnSend => panic!("scripted panic for '{text}'"),
            Script::Silent => Ok(()),
            Script::CloseAfter(delay) => {
                let registered = self.open.lock().unwrap().remove(conversation.id());
                drop(tx);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    drop(registered);
                });
                Ok(())
            }
            Script::Frames { delay, frames } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    for frame in frames {
                        let _ = tx.send(frame);
                    }
                });
                Ok(())
            }
            Script::FailToken | Script::FailConversation | Script::FailConnect => Ok(()),
        }
    }
}

pub(crate) struct ScriptedStream {
    rx: mpsc::UnboundedReceiver<Delivery>,
    closed: bool,
    stats: Arc<GatewayStats>,
}

impl ScriptedStream {
    fn mark_closed(&mut self) {
        if !self.closed {
            self.closed = true;
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
            self.stats.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ReplyStream for ScriptedStream {
    async fn next_frame(&mut self) -> Result<Option<Frame>, GatewayError> {
        if self.closed {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(message)) => Err(GatewayError::Transport(message)),
            None => Ok(None),
        }
    }

    async fn close(&mut self) {
        self.mark_closed();
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.mark_closed();
    }
}

/// A bare stream fed directly by the test, for listener tests.
pub(crate) fn channel_stream() -> (mpsc::UnboundedSender<Delivery>, ScriptedStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stats = Arc::new(GatewayStats::default());
    stats.active.fetch_add(1, Ordering::SeqCst);
    (
        tx,
        ScriptedStream {
            rx,
            closed: false,
            stats,
        },
    )
}
