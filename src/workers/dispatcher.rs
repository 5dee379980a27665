//! Bounded worker pool that runs dubbing pipelines off the submission path.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_channel::{Receiver, Sender};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::orchestrator::Orchestrator;
use crate::modules::dubbing::model::JobRecord;

/// Default number of pipelines allowed to run at once.
pub const DEFAULT_WORKERS: usize = 2;

struct Task {
    record: JobRecord,
    done: oneshot::Sender<bool>,
}

/// Resolves to `true` when the job completed, `false` otherwise.
pub struct JobHandle {
    job_id: Uuid,
    rx: Option<oneshot::Receiver<bool>>,
}

impl JobHandle {
    fn ready(job_id: Uuid) -> Self {
        Self { job_id, rx: None }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }
}

impl Future for JobHandle {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        match self.rx.as_mut() {
            None => Poll::Ready(false),
            // a dropped sender means the worker went away; report failure
            Some(rx) => Pin::new(rx).poll(cx).map(|r| r.unwrap_or(false)),
        }
    }
}

pub struct Dispatcher {
    orchestrator: Arc<Orchestrator>,
    queue: Sender<Task>,
    workers: Mutex<JoinSet<()>>,
}

impl Dispatcher {
    /// Spawns `workers` pipeline workers on the current tokio runtime.
    pub fn start(orchestrator: Arc<Orchestrator>, workers: usize) -> Self {
        let workers = workers.max(1);
        let (queue, rx) = async_channel::unbounded::<Task>();

        let mut set = JoinSet::new();
        for i in 0..workers {
            set.spawn(worker_loop(i, orchestrator.clone(), rx.clone()));
        }
        info!("🎙️ Started dubbing worker pool with {} workers", workers);

        Self {
            orchestrator,
            queue,
            workers: Mutex::new(set),
        }
    }

    /// Marks the job processing and queues its pipeline.
    ///
    /// Only the lookup and the status write happen on the caller's task. If
    /// the job cannot be claimed the returned handle resolves to `false`
    /// immediately. A job id must be submitted at most once.
    pub async fn submit(&self, job_id: Uuid) -> JobHandle {
        let Some(record) = self.orchestrator.resolve(job_id).await else {
            return JobHandle::ready(job_id);
        };
        if !self.orchestrator.begin(job_id).await {
            return JobHandle::ready(job_id);
        }

        let (done, rx) = oneshot::channel();
        if let Err(e) = self.queue.send(Task { record, done }).await {
            // pool shut down after the claim: run the failure path inline so
            // the job does not stay processing
            error!("Dubbing queue closed; failing job {}", job_id);
            let task = e.into_inner();
            self.orchestrator.abandon(task.record.job.id).await;
            return JobHandle::ready(job_id);
        }

        debug!("Queued dubbing job {} ({} waiting)", job_id, self.queue.len());
        JobHandle {
            job_id,
            rx: Some(rx),
        }
    }

    /// Stops accepting jobs, lets queued ones finish and waits for the workers.
    pub async fn shutdown(&self) {
        self.queue.close();
        let mut workers = self.workers.lock().await;
        while let Some(result) = workers.join_next().await {
            if let Err(e) = result {
                error!("Dubbing worker ended abnormally: {}", e);
            }
        }
        info!("Dubbing worker pool stopped");
    }
}

async fn worker_loop(index: usize, orchestrator: Arc<Orchestrator>, rx: Receiver<Task>) {
    debug!("Dubbing worker {} started", index);

    while let Ok(task) = rx.recv().await {
        let job_id = task.record.job.id;
        info!("📦 Worker {} processing dubbing job {}", index, job_id);

        let success = orchestrator.execute(task.record).await;
        // the caller may have dropped its handle
        let _ = task.done.send(success);
    }

    debug!("Dubbing worker {} shutting down", index);
}
