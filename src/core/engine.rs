//! ECHOPROBE Core Engine
//!
//! Runs the scan pipeline: one producer feeding a bounded queue, a fixed
//! pool of workers each taking a target through reflection discovery and
//! per-character injection probing, and a drain handshake so the run only
//! ends once every enqueued target is finished.

use crate::core::context::Context;
use crate::core::pending::{PendingGuard, PendingWork};
use crate::core::retry::{with_retry, RetryPolicy};
use crate::http::client::HttpClient;
use crate::reporting::model::{Finding, ScanError, ScanEvent};
use crate::reporting::reporter::{ReportSummary, Reporter};
use crate::xss::probe::{probe_injection, ProbeChar};
use crate::xss::reflect::detect_reflected;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

const EVENT_BUFFER: usize = 1024;

/// A queued target; its pending slot is released when the job is dropped
struct Job {
    target: String,
    _pending: PendingGuard,
}

type WorkQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub targets: usize,
    pub findings: usize,
    pub errors: usize,
}

pub struct Engine {
    ctx: Arc<Context>,
    client: HttpClient,
}

impl Engine {
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        let client = HttpClient::new(&ctx)?;
        Ok(Self {
            ctx: Arc::new(ctx),
            client,
        })
    }

    /// Scan URLs from stdin, printing results as they arrive.
    pub async fn run(&self) -> anyhow::Result<ScanStats> {
        tracing::info!(
            "Starting scan with {} workers, {} attempts per request",
            self.ctx.concurrency,
            self.ctx.retry.attempts()
        );

        if self.ctx.verbose {
            tracing::info!("Configuration: {:?}", self.ctx);
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let reporter = tokio::spawn(Reporter::console(self.ctx.format).drain(rx));

        let input = BufReader::new(tokio::io::stdin());
        let targets = self.scan(input, tx).await?;
        let ReportSummary { findings, errors } = reporter.await?;

        let stats = ScanStats {
            targets,
            findings,
            errors,
        };
        tracing::info!(
            "Scan complete: {} targets, {} findings, {} errors",
            stats.targets,
            stats.findings,
            stats.errors
        );
        Ok(stats)
    }

    /// Drive every line of `input` through the pipeline, sending results to
    /// `events`. Returns once all targets are done and all workers have exited.
    pub async fn scan<R>(&self, input: R, events: mpsc::Sender<ScanEvent>) -> anyhow::Result<usize>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (queue_tx, queue_rx) = mpsc::channel::<Job>(self.ctx.concurrency);
        let queue: WorkQueue = Arc::new(Mutex::new(queue_rx));
        let pending = PendingWork::new();

        let mut workers = Vec::with_capacity(self.ctx.concurrency);
        for id in 0..self.ctx.concurrency {
            let worker = Worker {
                id,
                client: self.client.clone(),
                retry: self.ctx.retry,
                events: events.clone(),
            };
            workers.push(tokio::spawn(worker.run(Arc::clone(&queue))));
        }
        drop(events);

        let producer = tokio::spawn(produce(input, queue_tx, pending));

        for worker in workers {
            worker.await?;
        }
        let targets = producer.await?;

        tracing::debug!("all {} targets processed", targets);
        Ok(targets)
    }
}

/// Feed lines into the queue, then close it once the pending count drains.
async fn produce<R>(input: R, queue: mpsc::Sender<Job>, pending: Arc<PendingWork>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut enqueued = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("stopped reading input: {}", e);
                break;
            }
        };

        let job = Job {
            target: line,
            _pending: pending.add(),
        };
        if queue.send(job).await.is_err() {
            tracing::warn!("work queue closed before input was exhausted");
            break;
        }
        enqueued += 1;
    }

    tracing::debug!("input exhausted after {} targets, waiting for workers", enqueued);
    pending.wait_idle().await;
    drop(queue);
    enqueued
}

struct Worker {
    id: usize,
    client: HttpClient,
    retry: RetryPolicy,
    events: mpsc::Sender<ScanEvent>,
}

impl Worker {
    async fn run(self, queue: WorkQueue) {
        loop {
            // the lock is held only while waiting for the next job
            let next = queue.lock().await.recv().await;
            let Some(job) = next else { break };

            self.process(&job.target).await;
        }
        tracing::debug!("worker {} exiting", self.id);
    }

    async fn process(&self, target: &str) {
        tracing::debug!("worker {} scanning {}", self.id, target);

        let reflected = match with_retry(&self.retry, || detect_reflected(&self.client, target)).await {
            Ok(reflected) => reflected,
            Err(e) => {
                self.emit(ScanEvent::Error(ScanError::Detect {
                    url: target.to_string(),
                    message: e.describe(),
                }))
                .await;
                return;
            }
        };

        for param in &reflected {
            for probe in ProbeChar::ALL {
                let result = with_retry(&self.retry, || {
                    probe_injection(&self.client, target, param, probe)
                })
                .await;

                match result {
                    Ok(true) => {
                        self.emit(ScanEvent::Finding(Finding::new(target, param, probe)))
                            .await
                    }
                    Ok(false) => {}
                    Err(e) => {
                        self.emit(ScanEvent::Error(ScanError::Probe {
                            url: target.to_string(),
                            parameter: param.clone(),
                            probe,
                            message: e.describe(),
                        }))
                        .await
                    }
                }
            }
        }
    }

    async fn emit(&self, event: ScanEvent) {
        if self.events.send(event).await.is_err() {
            tracing::warn!("reporter stopped, dropping event");
        }
    }
}
