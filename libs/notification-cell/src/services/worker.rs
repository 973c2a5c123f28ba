use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, instrument};

use shared_config::AppConfig;

use crate::models::{Attachment, EmailMessage, NotificationJob};
use crate::services::mailer::Mailer;
use crate::services::{pdf, templates};

/// Drains the notification queue. Each job is attempted once; failures are
/// logged and the job is dropped.
pub struct NotificationWorker {
    mailer: Arc<dyn Mailer>,
    config: Arc<AppConfig>,
}

impl NotificationWorker {
    pub fn new(mailer: Arc<dyn Mailer>, config: Arc<AppConfig>) -> Self {
        Self { mailer, config }
    }

    pub async fn run(self, mut receiver: UnboundedReceiver<NotificationJob>) {
        info!("Notification worker started");

        while let Some(job) = receiver.recv().await {
            let kind = job.kind();
            if let Err(e) = self.process(job).await {
                error!("Failed to deliver {} notification: {:#}", kind, e);
            }
        }

        info!("Notification worker stopped");
    }

    #[instrument(skip(self, job), fields(kind = job.kind(), to = job.recipient()))]
    pub async fn process(&self, job: NotificationJob) -> anyhow::Result<()> {
        let message = self.compose(job)?;
        self.mailer
            .send(message)
            .await
            .context("mailer rejected message")?;
        Ok(())
    }

    pub fn compose(&self, job: NotificationJob) -> anyhow::Result<EmailMessage> {
        let message = match job {
            NotificationJob::Verification { email, name, token } => EmailMessage {
                to: email,
                subject: templates::VERIFICATION_SUBJECT.to_string(),
                html: templates::verification_email(&name, &self.config.verification_link(&token)),
                attachments: Vec::new(),
            },
            NotificationJob::LoginAlert { email, name } => EmailMessage {
                to: email,
                subject: templates::LOGIN_ALERT_SUBJECT.to_string(),
                html: templates::login_alert_email(
                    &name,
                    &Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                ),
                attachments: Vec::new(),
            },
            NotificationJob::RecordCopy {
                email,
                patient_name,
                diagnosis,
                prescription,
                care_suggestion,
            } => {
                let content =
                    pdf::render_medical_record(&patient_name, &diagnosis, &prescription, &care_suggestion)
                        .context("failed to render medical record PDF")?;

                EmailMessage {
                    to: email,
                    subject: templates::RECORD_COPY_SUBJECT.to_string(),
                    html: templates::record_copy_email(&patient_name),
                    attachments: vec![Attachment {
                        filename: templates::RECORD_ATTACHMENT_NAME.to_string(),
                        content_type: "application/pdf".to_string(),
                        content,
                    }],
                }
            }
        };

        Ok(message)
    }
}
