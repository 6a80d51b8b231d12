//! Dispatch Questions use case
//!
//! Runs a batch of questions through a bounded pool of workers fed by a
//! FIFO [`WorkQueue`]. Completion follows the sentinel protocol: wait until
//! every real item is acknowledged, enqueue exactly one `Stop` per worker,
//! then await every worker task.

pub mod queue;
pub mod result_set;

pub use queue::{TaskDone, WorkQueue};
pub use result_set::ResultSet;

use crate::config::{DispatchParams, DispatchParamsError};
use crate::metrics::{MetricsSnapshot, RunMetrics};
use crate::ports::bot_gateway::BotGateway;
use crate::ports::progress::{BatchProgressNotifier, NoProgress};
use crate::use_cases::exchange_question::ExchangeQuestionUseCase;
use botbatch_domain::{Answer, ExchangeOutcome, Question, Stage, WorkItem};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// What a completed dispatch produced.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Matched answers in completion order.
    pub answers: Vec<Answer>,
    pub metrics: MetricsSnapshot,
    pub sentinels_sent: usize,
    /// Worker tasks that exited through a `Stop` sentinel.
    pub workers_finished: usize,
    pub elapsed: Duration,
}

/// Use case for running a whole batch through the worker pool
pub struct DispatchQuestionsUseCase<G: BotGateway + 'static> {
    exchange: Arc<ExchangeQuestionUseCase<G>>,
    params: DispatchParams,
    metrics: Arc<RunMetrics>,
    progress: Arc<dyn BatchProgressNotifier>,
}

impl<G: BotGateway + 'static> DispatchQuestionsUseCase<G> {
    pub fn new(exchange: ExchangeQuestionUseCase<G>, params: DispatchParams) -> Self {
        Self {
            exchange: Arc::new(exchange),
            params,
            metrics: Arc::new(RunMetrics::new()),
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn BatchProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Share an externally owned metrics accumulator.
    pub fn with_metrics(mut self, metrics: Arc<RunMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    pub async fn execute(
        &self,
        questions: Vec<Question>,
    ) -> Result<DispatchReport, DispatchParamsError> {
        self.params.validate()?;

        let started = Instant::now();
        let total = questions.len();
        let worker_count = self.params.workers;
        info!(
            "Dispatching {} questions to {} workers (timeout {:?})",
            total, worker_count, self.params.timeout
        );
        self.progress.on_batch_start(total);

        let queue = Arc::new(WorkQueue::new());
        for question in questions {
            queue.put(WorkItem::Job(question));
        }

        let results = ResultSet::new();
        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            let worker = Worker {
                id,
                queue: Arc::clone(&queue),
                exchange: Arc::clone(&self.exchange),
                results: results.clone(),
                metrics: Arc::clone(&self.metrics),
                progress: Arc::clone(&self.progress),
            };
            workers.spawn(worker.run());
        }

        queue.join().await;
        debug!("Queue drained, stopping {} workers", worker_count);
        for _ in 0..worker_count {
            queue.put(WorkItem::Stop);
        }

        let mut workers_finished = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(id) => {
                    debug!("Worker {} stopped", id);
                    workers_finished += 1;
                }
                Err(e) => warn!("Worker join error: {}", e),
            }
        }

        let answers = results.take().await;
        let metrics = self.metrics.snapshot();
        let elapsed = started.elapsed();
        info!(
            "Dispatch finished: {}/{} answered in {:.1}s",
            answers.len(),
            total,
            elapsed.as_secs_f64()
        );
        self.progress.on_batch_complete(&metrics);

        Ok(DispatchReport {
            answers,
            metrics,
            sentinels_sent: worker_count,
            workers_finished,
            elapsed,
        })
    }
}

struct Worker<G: BotGateway + 'static> {
    id: usize,
    queue: Arc<WorkQueue<Question>>,
    exchange: Arc<ExchangeQuestionUseCase<G>>,
    results: ResultSet,
    metrics: Arc<RunMetrics>,
    progress: Arc<dyn BatchProgressNotifier>,
}

impl<G: BotGateway + 'static> Worker<G> {
    /// Process items until a `Stop` arrives. Returns the worker id.
    async fn run(self) -> usize {
        while let Some(item) = self.queue.get().await {
            let _done = TaskDone::new(&self.queue);
            let WorkItem::Job(question) = item else {
                break;
            };
            self.process(question).await;
        }
        self.id
    }

    async fn process(&self, question: Question) {
        self.progress.on_exchange_start(&question);

        let outcome = match AssertUnwindSafe(self.exchange.execute(&question))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                error!(
                    "Worker {} panicked on question '{}': {}",
                    self.id,
                    question.text(),
                    reason
                );
                ExchangeOutcome::failed(Stage::Worker, reason)
            }
        };

        self.metrics.record(&outcome);
        self.progress.on_exchange_complete(&question, &outcome);

        match outcome {
            ExchangeOutcome::Answered(answer) => self.results.push(answer).await,
            other => debug!(
                "Worker {}: no answer for '{}' ({})",
                self.id,
                question.text(),
                other.label()
            ),
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::listen_for_answer::AnswerListener;
    use crate::use_cases::test_support::{
        GatewayStats, Script, ScriptedGateway, answers_with,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dispatcher(
        gateway: ScriptedGateway,
        params: DispatchParams,
    ) -> (DispatchQuestionsUseCase<ScriptedGateway>, Arc<GatewayStats>) {
        let stats = Arc::clone(&gateway.stats);
        let exchange = ExchangeQuestionUseCase::new(
            Arc::new(gateway),
            AnswerListener::from_params(&params),
        );
        (DispatchQuestionsUseCase::new(exchange, params), stats)
    }

    fn questions(count: usize) -> Vec<Question> {
        Question::batch((0..count).map(|i| format!("question {i}")))
    }

    fn sorted(mut answers: Vec<Answer>) -> Vec<Answer> {
        answers.sort_by(|a, b| a.question.cmp(&b.question));
        answers
    }

    fn expected(count: usize) -> Vec<Answer> {
        sorted(
            (0..count)
                .map(|i| Answer::new(format!("question {i}"), format!("answer to question {i}")))
                .collect(),
        )
    }

    #[derive(Default)]
    struct CountingProgress {
        started: AtomicUsize,
        completed: AtomicUsize,
        total: AtomicUsize,
        finished: AtomicUsize,
    }

    impl BatchProgressNotifier for CountingProgress {
        fn on_batch_start(&self, total: usize) {
            self.total.store(total, Ordering::SeqCst);
        }
        fn on_exchange_start(&self, _question: &Question) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
        fn on_exchange_complete(&self, _question: &Question, _outcome: &ExchangeOutcome) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
        fn on_batch_complete(&self, _metrics: &MetricsSnapshot) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fewer_questions_than_workers_all_answered() {
        let (use_case, stats) = dispatcher(ScriptedGateway::new(), DispatchParams::default());

        let report = use_case.execute(questions(5)).await.unwrap();

        assert_eq!(sorted(report.answers), expected(5));
        assert_eq!(report.metrics.answered, 5);
        assert_eq!(report.sentinels_sent, 20);
        assert_eq!(report.workers_finished, 20);
        assert_eq!(GatewayStats::get(&stats.conversations), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_more_questions_than_workers_all_answered() {
        let params = DispatchParams::default().with_workers(4);
        let (use_case, stats) = dispatcher(ScriptedGateway::new(), params);

        let report = use_case.execute(questions(50)).await.unwrap();

        assert_eq!(sorted(report.answers), expected(50));
        assert_eq!(report.sentinels_sent, 4);
        assert_eq!(report.workers_finished, 4);
        assert!(GatewayStats::get(&stats.max_active) <= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_worker_processes_every_question() {
        let gateway = ScriptedGateway::new().with_default_delay(Duration::from_secs(1));
        let params = DispatchParams::default().with_workers(1);
        let (use_case, stats) = dispatcher(gateway, params);

        let report = use_case.execute(questions(3)).await.unwrap();

        // One worker handles the queue in FIFO order.
        assert_eq!(report.answers, expected(3));
        assert!(report.elapsed >= Duration::from_secs(3));
        assert_eq!(report.sentinels_sent, 1);
        assert_eq!(report.workers_finished, 1);
        assert_eq!(GatewayStats::get(&stats.max_active), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_question_times_out_while_others_complete() {
        let gateway = ScriptedGateway::new().script("question 1", Script::Silent);
        let params = DispatchParams::default().with_timeout(Duration::from_secs(10));
        let (use_case, _) = dispatcher(gateway, params);

        let report = use_case.execute(questions(3)).await.unwrap();

        let answers = sorted(report.answers);
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.question != "question 1"));
        assert_eq!(report.metrics.timed_out, 1);
        assert!(report.elapsed >= Duration::from_secs(10));
        assert!(report.elapsed < Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrollment_and_exam_scenario() {
        let gateway = ScriptedGateway::new()
            .script(
                "What is my enrollment status?",
                answers_with("Enrolled", Duration::from_millis(1500)),
            )
            .script(
                "When is my next exam?",
                answers_with("March 3rd", Duration::from_secs(2)),
            );
        let (use_case, _) = dispatcher(gateway, DispatchParams::default());

        let report = use_case
            .execute(Question::batch([
                "What is my enrollment status?",
                "When is my next exam?",
            ]))
            .await
            .unwrap();

        assert_eq!(
            sorted(report.answers),
            vec![
                Answer::new("What is my enrollment status?", "Enrolled"),
                Answer::new("When is my next exam?", "March 3rd"),
            ]
        );
        assert!(report.elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_and_send_failure_do_not_stop_the_pool() {
        let gateway = ScriptedGateway::new()
            .script("question 0", Script::PanicOnSend)
            .script("question 1", Script::FailSend);
        let params = DispatchParams::default().with_workers(2);
        let (use_case, stats) = dispatcher(gateway, params);

        let report = use_case.execute(questions(6)).await.unwrap();

        assert_eq!(report.answers.len(), 4);
        assert_eq!(report.metrics.failed.worker, 1);
        assert_eq!(report.metrics.failed.send, 1);
        assert_eq!(report.metrics.lost(), 2);
        assert_eq!(report.workers_finished, 2);
        // The panicking exchange still released its stream.
        assert_eq!(
            GatewayStats::get(&stats.closed),
            GatewayStats::get(&stats.connects)
        );
        assert_eq!(GatewayStats::get(&stats.active), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_questions_get_independent_conversations() {
        let (use_case, stats) = dispatcher(ScriptedGateway::new(), DispatchParams::default());

        let report = use_case
            .execute(Question::batch(["Hi", "Hi"]))
            .await
            .unwrap();

        assert_eq!(
            report.answers,
            vec![Answer::new("Hi", "answer to Hi"), Answer::new("Hi", "answer to Hi")]
        );
        assert_eq!(GatewayStats::get(&stats.conversations), 2);
        assert_eq!(GatewayStats::get(&stats.closed), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_still_stops_every_worker() {
        let params = DispatchParams::default().with_workers(3);
        let (use_case, stats) = dispatcher(ScriptedGateway::new(), params);

        let report = use_case.execute(Vec::new()).await.unwrap();

        assert!(report.answers.is_empty());
        assert_eq!(report.sentinels_sent, 3);
        assert_eq!(report.workers_finished, 3);
        assert_eq!(GatewayStats::get(&stats.tokens), 0);
    }

    #[tokio::test]
    async fn test_zero_workers_is_rejected_before_dispatch() {
        let params = DispatchParams::default().with_workers(0);
        let (use_case, stats) = dispatcher(ScriptedGateway::new(), params);

        let result = use_case.execute(questions(2)).await;

        assert!(matches!(result, Err(DispatchParamsError::NoWorkers)));
        assert_eq!(GatewayStats::get(&stats.tokens), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_and_shared_metrics() {
        let progress = Arc::new(CountingProgress::default());
        let metrics = Arc::new(RunMetrics::new());
        let gateway = ScriptedGateway::new().script("question 2", Script::Silent);
        let params = DispatchParams::default().with_timeout(Duration::from_secs(5));
        let (use_case, _) = dispatcher(gateway, params);
        let use_case = use_case
            .with_progress(Arc::clone(&progress) as Arc<dyn BatchProgressNotifier>)
            .with_metrics(Arc::clone(&metrics));

        use_case.execute(questions(4)).await.unwrap();

        assert_eq!(progress.total.load(Ordering::SeqCst), 4);
        assert_eq!(progress.started.load(Ordering::SeqCst), 4);
        assert_eq!(progress.completed.load(Ordering::SeqCst), 4);
        assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.answered, 3);
        assert_eq!(snapshot.timed_out, 1);
    }

    #[test]
    fn test_panic_reason_extracts_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_reason(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_reason(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_reason(payload.as_ref()), "worker panicked");
    }
}
