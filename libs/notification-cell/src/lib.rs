pub mod error;
pub mod models;
pub mod services;

pub use error::NotificationError;
pub use models::{Attachment, EmailMessage, NotificationJob};
pub use services::{
    dispatcher::NotificationDispatcher,
    mailer::{HttpMailer, LogMailer, Mailer},
};
