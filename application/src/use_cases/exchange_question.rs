//! Exchange Question use case
//!
//! Drives one question through a fresh conversation:
//! token -> start conversation -> connect -> (send || listen) -> close.
//!
//! The conversation is never reused. The stream is closed before this use
//! case returns on every normal path; adapters also close on drop, which
//! covers unwinding.

use crate::ports::bot_gateway::{BotGateway, GatewayError};
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::use_cases::listen_for_answer::{AnswerListener, ListenOutcome};
use botbatch_domain::{ExchangeOutcome, Question};
use serde_json::json;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Use case for resolving a single question against the bot
pub struct ExchangeQuestionUseCase<G: BotGateway + 'static> {
    gateway: Arc<G>,
    listener: AnswerListener,
    logger: Arc<dyn ExchangeLogger>,
}

impl<G: BotGateway + 'static> ExchangeQuestionUseCase<G> {
    pub fn new(gateway: Arc<G>, listener: AnswerListener) -> Self {
        Self {
            gateway,
            listener,
            logger: Arc::new(NoExchangeLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Resolve `question`. Every failure is folded into the outcome.
    pub async fn execute(&self, question: &Question) -> ExchangeOutcome {
        let started = Instant::now();

        let outcome = match self.run(question).await {
            Ok(heard) => heard.into_exchange_outcome(),
            Err(e) => {
                warn!(
                    "Error processing question '{}' ({} stage): {}",
                    question.text(),
                    e.stage(),
                    e
                );
                ExchangeOutcome::failed(e.stage(), e.to_string())
            }
        };

        let mut payload = json!({
            "position": question.position(),
            "question": question.text(),
            "elapsed_ms": started.elapsed().as_millis() as u64,
        });
        let event_type = match &outcome {
            ExchangeOutcome::Answered(answer) => {
                payload["answer"] = json!(answer.answer);
                "exchange_answered"
            }
            ExchangeOutcome::TimedOut => "exchange_timed_out",
            ExchangeOutcome::Closed => "exchange_closed",
            ExchangeOutcome::Cancelled => "exchange_cancelled",
            ExchangeOutcome::Failed { stage, reason } => {
                payload["stage"] = json!(stage.as_str());
                payload["reason"] = json!(reason);
                "exchange_failed"
            }
        };
        self.logger.log(ExchangeEvent::new(event_type, payload));

        outcome
    }

    async fn run(&self, question: &Question) -> Result<ListenOutcome, GatewayError> {
        let token = self.gateway.acquire_token().await?;
        let conversation = self.gateway.start_conversation(&token).await?;
        debug!(
            "Conversation {} started for '{}'",
            conversation.id(),
            question.text()
        );
        self.logger.log(ExchangeEvent::new(
            "exchange_started",
            json!({
                "position": question.position(),
                "question": question.text(),
                "conversation_id": conversation.id(),
            }),
        ));

        let mut stream = self.gateway.connect(&conversation).await?;

        // Listen while the send is in flight; a failed send cancels the listener.
        let cancel = CancellationToken::new();
        let send = async {
            let sent = self.gateway.send(&conversation, question.text()).await;
            if sent.is_err() {
                cancel.cancel();
            }
            sent
        };
        let listen = self.listener.listen(stream.as_mut(), question, &cancel);
        let (sent, heard) = tokio::join!(send, listen);

        stream.close().await;
        debug!(
            "Conversation {} closed ({}, {} frames)",
            conversation.id(),
            heard.state,
            heard.frames_seen
        );

        sent?;
        Ok(heard)
    }
}
