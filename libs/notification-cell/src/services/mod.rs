pub mod dispatcher;
pub mod mailer;
pub mod pdf;
pub mod templates;
pub mod worker;
