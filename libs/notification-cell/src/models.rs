/// Work queued for the background mail worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationJob {
    Verification {
        email: String,
        name: String,
        token: String,
    },
    LoginAlert {
        email: String,
        name: String,
    },
    RecordCopy {
        email: String,
        patient_name: String,
        diagnosis: String,
        prescription: String,
        care_suggestion: String,
    },
}

impl NotificationJob {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationJob::Verification { .. } => "verification",
            NotificationJob::LoginAlert { .. } => "login_alert",
            NotificationJob::RecordCopy { .. } => "record_copy",
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            NotificationJob::Verification { email, .. }
            | NotificationJob::LoginAlert { email, .. }
            | NotificationJob::RecordCopy { email, .. } => email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}
