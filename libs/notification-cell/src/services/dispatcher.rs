use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::NotificationJob;
use crate::services::mailer::Mailer;
use crate::services::worker::NotificationWorker;

/// Cloneable handle for queueing mail. Sending never blocks and never fails
/// the caller: delivery is at-most-once and best-effort.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: Option<UnboundedSender<NotificationJob>>,
}

impl NotificationDispatcher {
    /// Starts the background worker on the current tokio runtime.
    pub fn spawn(mailer: Arc<dyn Mailer>, config: Arc<AppConfig>) -> Self {
        let (dispatcher, receiver) = Self::channel();
        let worker = NotificationWorker::new(mailer, config);
        tokio::spawn(worker.run(receiver));
        dispatcher
    }

    /// Dispatcher plus the raw receiving end, for callers that drive the queue themselves.
    pub fn channel() -> (Self, UnboundedReceiver<NotificationJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender: Some(sender) }, receiver)
    }

    /// Drops every job.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn send_verification(&self, email: &str, name: &str, token: &str) {
        self.enqueue(NotificationJob::Verification {
            email: email.to_string(),
            name: name.to_string(),
            token: token.to_string(),
        });
    }

    pub fn send_login_alert(&self, email: &str, name: &str) {
        self.enqueue(NotificationJob::LoginAlert {
            email: email.to_string(),
            name: name.to_string(),
        });
    }

    pub fn send_record_copy(
        &self,
        email: &str,
        patient_name: &str,
        diagnosis: &str,
        prescription: &str,
        care_suggestion: &str,
    ) {
        self.enqueue(NotificationJob::RecordCopy {
            email: email.to_string(),
            patient_name: patient_name.to_string(),
            diagnosis: diagnosis.to_string(),
            prescription: prescription.to_string(),
            care_suggestion: care_suggestion.to_string(),
        });
    }

    fn enqueue(&self, job: NotificationJob) {
        let Some(sender) = &self.sender else {
            debug!("Notifications disabled, dropping {} job", job.kind());
            return;
        };

        let kind = job.kind();
        if sender.send(job).is_err() {
            warn!("Notification worker is gone, dropping {} job", kind);
        } else {
            debug!("Queued {} notification", kind);
        }
    }
}
