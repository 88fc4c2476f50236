//! Notification queue and worker.
//!
//! Request handlers push [`NotificationJob`]s onto a bounded
//! [`NotificationQueue`] with `try_send`, so a slow mail server never holds
//! up a checkout. A single [`NotificationWorker`] drains the queue and reports
//! each delivery failure on its own channel, which [`log_failures`] consumes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crave_core::types::DbId;
use crave_db::repositories::OrderRepo;
use crave_db::DbPool;

use crate::delivery::email::{Mailer, OutgoingEmail};
use crate::receipts;

/// Default capacity of the job channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// How long shutdown waits for the worker to finish its current job.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Work the notification worker knows how to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationJob {
    /// Send the customer receipt and the admin alert for a new order.
    OrderPlaced { order_id: DbId },
}

/// One email that could not be delivered.
#[derive(Debug, Clone)]
pub struct NotificationFailure {
    pub order_id: DbId,
    pub recipient: String,
    pub subject: String,
    pub error: String,
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Cloneable producer half handed to request handlers.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<NotificationJob>,
}

impl NotificationQueue {
    /// Create a queue and the receiver the worker drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<NotificationJob>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Enqueue without waiting. Returns `false` when the job was dropped
    /// because the queue is full or the worker has stopped.
    pub fn enqueue(&self, job: NotificationJob) -> bool {
        match self.sender.try_send(job) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(job)) => {
                tracing::warn!(?job, "Notification queue full, job dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                tracing::warn!(?job, "Notification worker stopped, job dropped");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Consumes [`NotificationJob`]s and sends the resulting emails.
pub struct NotificationWorker {
    pool: DbPool,
    /// `None` when SMTP is not configured; jobs are then logged and skipped.
    mailer: Option<Arc<dyn Mailer>>,
    admin_email: Option<String>,
    failures: mpsc::UnboundedSender<NotificationFailure>,
}

impl NotificationWorker {
    /// Create a worker and the receiving end of its failure channel.
    pub fn new(
        pool: DbPool,
        mailer: Option<Arc<dyn Mailer>>,
        admin_email: Option<String>,
    ) -> (Self, mpsc::UnboundedReceiver<NotificationFailure>) {
        let (failures, failure_rx) = mpsc::unbounded_channel();
        let worker = Self {
            pool,
            mailer,
            admin_email: admin_email.filter(|e| !e.is_empty()),
            failures,
        };
        (worker, failure_rx)
    }

    /// Run until the queue closes or `cancel` fires.
    pub async fn run(self, mut jobs: mpsc::Receiver<NotificationJob>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Notification worker cancelled");
                    break;
                }
                job = jobs.recv() => {
                    let Some(job) = job else {
                        tracing::info!("Notification queue closed, worker shutting down");
                        break;
                    };
                    if let Err(e) = self.handle(&job).await {
                        tracing::error!(error = %e, ?job, "Failed to process notification job");
                    }
                }
            }
        }
    }

    /// Process a single job. Delivery failures go to the failure channel;
    /// only storage errors are returned.
    pub async fn handle(&self, job: &NotificationJob) -> Result<(), sqlx::Error> {
        match job {
            NotificationJob::OrderPlaced { order_id } => self.order_placed(*order_id).await,
        }
    }

    async fn order_placed(&self, order_id: DbId) -> Result<(), sqlx::Error> {
        let Some(mailer) = &self.mailer else {
            tracing::debug!(order_id, "SMTP not configured, skipping order emails");
            return Ok(());
        };

        let Some(order) = OrderRepo::find_by_id(&self.pool, order_id).await? else {
            tracing::warn!(order_id, "Order vanished before notification");
            return Ok(());
        };
        let items = OrderRepo::list_items(&self.pool, order_id).await?;

        let mut outgoing: Vec<OutgoingEmail> = Vec::with_capacity(2);
        outgoing.extend(receipts::customer_receipt(&order, &items));
        if let Some(admin_email) = &self.admin_email {
            outgoing.push(receipts::admin_alert(&order, &items, admin_email));
        }

        for email in &outgoing {
            if let Err(e) = mailer.send(email).await {
                // The receiver only disappears during shutdown.
                let _ = self.failures.send(NotificationFailure {
                    order_id,
                    recipient: email.to.clone(),
                    subject: email.subject.clone(),
                    error: e.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Log every failure reported by a worker until its channel closes.
pub async fn log_failures(mut failures: mpsc::UnboundedReceiver<NotificationFailure>) {
    while let Some(failure) = failures.recv().await {
        tracing::error!(
            order_id = failure.order_id,
            to = %failure.recipient,
            subject = %failure.subject,
            error = %failure.error,
            "Failed to send order email",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_queue_drops_jobs() {
        let (queue, _receiver) = NotificationQueue::new(1);
        assert!(queue.enqueue(NotificationJob::OrderPlaced { order_id: 1 }));
        assert!(!queue.enqueue(NotificationJob::OrderPlaced { order_id: 2 }));
    }

    #[test]
    fn closed_queue_drops_jobs() {
        let (queue, receiver) = NotificationQueue::new(4);
        drop(receiver);
        assert!(!queue.enqueue(NotificationJob::OrderPlaced { order_id: 1 }));
    }

    #[tokio::test]
    async fn enqueued_jobs_arrive_in_order() {
        let (queue, mut receiver) = NotificationQueue::new(4);
        queue.enqueue(NotificationJob::OrderPlaced { order_id: 1 });
        queue.clone().enqueue(NotificationJob::OrderPlaced { order_id: 2 });

        assert_eq!(
            receiver.recv().await,
            Some(NotificationJob::OrderPlaced { order_id: 1 })
        );
        assert_eq!(
            receiver.recv().await,
            Some(NotificationJob::OrderPlaced { order_id: 2 })
        );
    }
}
