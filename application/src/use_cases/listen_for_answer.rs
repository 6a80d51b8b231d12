//! Answer listener
//!
//! Consumes frames from an open [`ReplyStream`] until the first non-self
//! message arrives, the deadline passes, the peer closes the stream, or the
//! exchange is cancelled. Produces at most one [`Answer`].
//!
//! The socket has no "wait until absolute deadline" primitive that also
//! tolerates silence, so each receive attempt is bounded by
//! `min(poll_interval, time left)` and the deadline is re-checked between
//! attempts.

use crate::config::DispatchParams;
use crate::ports::bot_gateway::ReplyStream;
use botbatch_domain::{Answer, ExchangeOutcome, Frame, ListenerState, Question, decode_frame};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// What the listener observed for one pending exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenOutcome {
    pub state: ListenerState,
    pub answer: Option<Answer>,
    /// Frames received, including control and malformed ones.
    pub frames_seen: usize,
    /// Frames that could not be decoded into an activity envelope.
    pub malformed_frames: usize,
}

impl ListenOutcome {
    fn waiting() -> Self {
        Self {
            state: ListenerState::Waiting,
            answer: None,
            frames_seen: 0,
            malformed_frames: 0,
        }
    }

    pub fn into_exchange_outcome(self) -> ExchangeOutcome {
        match (self.state, self.answer) {
            (_, Some(answer)) => ExchangeOutcome::Answered(answer),
            (ListenerState::Closed, None) => ExchangeOutcome::Closed,
            (ListenerState::Cancelled, None) => ExchangeOutcome::Cancelled,
            (_, None) => ExchangeOutcome::TimedOut,
        }
    }
}

enum Received {
    Frame(Frame),
    Idle,
    Ended,
    Failed(String),
    Cancelled,
}

/// Deadline-bounded reply matcher for a single question.
#[derive(Debug, Clone)]
pub struct AnswerListener {
    timeout: Duration,
    poll_interval: Duration,
}

impl AnswerListener {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: crate::config::dispatch_params::DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn from_params(params: &DispatchParams) -> Self {
        Self {
            timeout: params.timeout,
            poll_interval: params.poll_interval,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Listen for the bot's reply to `question`.
    ///
    /// Never returns an error: transport failures degrade to
    /// [`ListenerState::Closed`] with no answer.
    pub async fn listen(
        &self,
        stream: &mut dyn ReplyStream,
        question: &Question,
        cancel: &CancellationToken,
    ) -> ListenOutcome {
        let deadline = Instant::now() + self.timeout;
        let mut outcome = ListenOutcome::waiting();

        while !outcome.state.is_terminal() {
            let now = Instant::now();
            if now >= deadline {
                outcome.state = ListenerState::TimedOut;
                break;
            }
            let wait = self.poll_interval.min(deadline - now);

            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => Received::Cancelled,
                result = tokio::time::timeout(wait, stream.next_frame()) => match result {
                    Err(_) => Received::Idle,
                    Ok(Ok(Some(frame))) => Received::Frame(frame),
                    Ok(Ok(None)) => Received::Ended,
                    Ok(Err(e)) => Received::Failed(e.to_string()),
                },
            };

            let frame = match received {
                Received::Frame(frame) => frame,
                Received::Idle => continue,
                Received::Ended => {
                    info!("Stream ended while waiting for '{}'", question.text());
                    outcome.state = ListenerState::Closed;
                    break;
                }
                Received::Failed(e) => {
                    warn!(
                        "Error listening for answer to '{}': {}",
                        question.text(),
                        e
                    );
                    outcome.state = ListenerState::Closed;
                    break;
                }
                Received::Cancelled => {
                    debug!("Listener for '{}' cancelled", question.text());
                    outcome.state = ListenerState::Cancelled;
                    break;
                }
            };

            outcome.frames_seen += 1;
            if frame.is_close() {
                info!("Stream closed by peer for '{}'", question.text());
                outcome.state = ListenerState::Closed;
                break;
            }

            match decode_frame(&frame) {
                Ok(Some(activities)) => {
                    if let Some(text) = activities.first_reply() {
                        debug!(
                            "Matched answer for '{}' ({} bytes)",
                            question.text(),
                            text.len()
                        );
                        outcome.answer = Some(Answer::new(question.text(), text));
                        outcome.state = ListenerState::Matched;
                    } else {
                        trace!("Frame without a reply for '{}'", question.text());
                    }
                }
                Ok(None) => trace!("Control or keep-alive frame"),
                Err(e) => {
                    outcome.malformed_frames += 1;
                    warn!(
                        "Failed to decode frame for question '{}': {}",
                        question.text(),
                        e
                    );
                }
            }
        }

        if outcome.state == ListenerState::TimedOut {
            warn!(
                "No answer for '{}' within {:?}",
                question.text(),
                self.timeout
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{bot_reply, channel_stream, echo};
    use serde_json::json;

    fn question(text: &str) -> Question {
        Question::new(0, text).unwrap()
    }

    fn listener(timeout_secs: u64) -> AnswerListener {
        AnswerListener::new(Duration::from_secs(timeout_secs))
    }

    #[tokio::test(start_paused = true)]
    async fn test_echo_then_bot_reply_records_only_bot_reply() {
        let (tx, mut stream) = channel_stream();
        tx.send(Ok(echo("What is my enrollment status?"))).unwrap();
        tx.send(Ok(bot_reply("Enrolled"))).unwrap();

        let outcome = listener(120)
            .listen(
                &mut stream,
                &question("What is my enrollment status?"),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.state, ListenerState::Matched);
        assert_eq!(
            outcome.answer,
            Some(Answer::new("What is my enrollment status?", "Enrolled"))
        );
        assert_eq!(outcome.frames_seen, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_after_first_reply() {
        let (tx, mut stream) = channel_stream();
        tx.send(Ok(bot_reply("first"))).unwrap();
        tx.send(Ok(bot_reply("second"))).unwrap();

        let outcome = listener(10)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        assert_eq!(outcome.answer.unwrap().answer, "first");
        assert_eq!(outcome.frames_seen, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_times_out_after_deadline() {
        let (_tx, mut stream) = channel_stream();
        let started = Instant::now();

        let outcome = listener(120)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        let elapsed = started.elapsed();
        assert_eq!(outcome.state, ListenerState::TimedOut);
        assert!(outcome.answer.is_none());
        assert!(elapsed >= Duration::from_secs(120));
        assert!(elapsed < Duration::from_secs(121));
    }

    #[tokio::test(start_paused = true)]
    async fn test_steady_non_matching_traffic_still_times_out() {
        let (tx, mut stream) = channel_stream();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(300)).await;
                if tx.send(Ok(Frame::Control)).is_err() {
                    break;
                }
            }
        });

        let started = Instant::now();
        let outcome = listener(5)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        assert_eq!(outcome.state, ListenerState::TimedOut);
        assert!(outcome.frames_seen > 10);
        assert!(started.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_frames_are_skipped() {
        let (tx, mut stream) = channel_stream();
        tx.send(Ok(Frame::Text(json!({"watermark": "1"}).to_string())))
            .unwrap();
        tx.send(Ok(Frame::Binary(vec![0xc3, 0x28]))).unwrap();
        tx.send(Ok(Frame::Text("{not json".into()))).unwrap();
        tx.send(Ok(Frame::Text(String::new()))).unwrap();
        tx.send(Ok(Frame::Binary(bot_reply_bytes("March 3rd"))))
            .unwrap();

        let outcome = listener(120)
            .listen(
                &mut stream,
                &question("When is my next exam?"),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(outcome.state, ListenerState::Matched);
        assert_eq!(outcome.answer.unwrap().answer, "March 3rd");
        assert_eq!(outcome.malformed_frames, 2);
        assert_eq!(outcome.frames_seen, 5);
    }

    fn bot_reply_bytes(text: &str) -> Vec<u8> {
        match bot_reply(text) {
            Frame::Text(s) => s.into_bytes(),
            _ => unreachable!(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_frames_never_produce_answer() {
        let (tx, mut stream) = channel_stream();
        tx.send(Ok(Frame::Text("garbage".into()))).unwrap();
        tx.send(Ok(Frame::Text(json!({"other": []}).to_string())))
            .unwrap();

        let outcome = listener(3)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        assert_eq!(outcome.state, ListenerState::TimedOut);
        assert!(outcome.answer.is_none());
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_peer_close_ends_listening() {
        let (tx, mut stream) = channel_stream();
        tx.send(Ok(echo("q"))).unwrap();
        tx.send(Ok(Frame::Close)).unwrap();

        let outcome = listener(120)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        assert_eq!(outcome.state, ListenerState::Closed);
        assert!(outcome.answer.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_end_is_closed() {
        let (tx, mut stream) = channel_stream();
        drop(tx);

        let outcome = listener(120)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        assert_eq!(outcome.state, ListenerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_degrades_to_no_answer() {
        let (tx, mut stream) = channel_stream();
        tx.send(Err("connection reset".into())).unwrap();

        let outcome = listener(120)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        assert_eq!(outcome.state, ListenerState::Closed);
        assert!(outcome.answer.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_listener() {
        let (_tx, mut stream) = channel_stream();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let outcome = listener(120)
            .listen(&mut stream, &question("q"), &cancel)
            .await;

        assert_eq!(outcome.state, ListenerState::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    // Permissive matching: a message with no sender role is taken as the
    // bot's answer. Kept on purpose; tightening it would drop replies from
    // bots that omit role metadata.
    #[tokio::test(start_paused = true)]
    async fn test_message_without_role_counts_as_answer() {
        let (tx, mut stream) = channel_stream();
        tx.send(Ok(Frame::Text(
            json!({"activities": [{"type": "message", "text": "who sent this?"}]}).to_string(),
        )))
        .unwrap();

        let outcome = listener(120)
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        assert_eq!(outcome.state, ListenerState::Matched);
        assert_eq!(outcome.answer.unwrap().answer, "who sent this?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_interval_is_capped_by_remaining_time() {
        let (_tx, mut stream) = channel_stream();
        let started = Instant::now();

        let outcome = AnswerListener::new(Duration::from_millis(2500))
            .with_poll_interval(Duration::from_secs(1))
            .listen(&mut stream, &question("q"), &CancellationToken::new())
            .await;

        let elapsed = started.elapsed();
        assert_eq!(outcome.state, ListenerState::TimedOut);
        assert!(elapsed >= Duration::from_millis(2500));
        assert!(elapsed < Duration::from_millis(2600));
    }
}
