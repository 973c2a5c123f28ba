use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Mail relay rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Mail relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Mailer is not configured: {0}")]
    Configuration(String),
}
