use std::sync::Arc;

use tracing::{info, warn};

use auth_cell::AuthState;
use medical_record_cell::RecordState;
use notification_cell::{HttpMailer, LogMailer, Mailer, NotificationDispatcher};
use satusehat_cell::SatuSehatClient;
use shared_config::AppConfig;
use shared_database::{
    DoctorDirectory, InMemoryDoctorDirectory, InMemoryRecordStore, RecordStore,
    SupabaseDoctorDirectory, SupabaseRecordStore,
};

/// Everything wired once at startup and handed to the cell routers.
#[derive(Clone)]
pub struct AppServices {
    pub config: Arc<AppConfig>,
    pub doctors: Arc<dyn DoctorDirectory>,
    pub records: Arc<dyn RecordStore>,
    pub notifications: NotificationDispatcher,
}

impl AppServices {
    /// Picks persistence and mail backends from the config. Must run inside
    /// a tokio runtime because it starts the notification worker.
    pub fn from_config(config: AppConfig) -> Self {
        let config = Arc::new(config);

        let (doctors, records): (Arc<dyn DoctorDirectory>, Arc<dyn RecordStore>) =
            if config.is_database_configured() {
                info!("Using Supabase persistence at {}", config.supabase_url);
                (
                    Arc::new(SupabaseDoctorDirectory::new(&config)),
                    Arc::new(SupabaseRecordStore::new(&config)),
                )
            } else {
                warn!("SUPABASE_URL not set, data is kept in memory and lost on restart");
                (
                    Arc::new(InMemoryDoctorDirectory::new()),
                    Arc::new(InMemoryRecordStore::new()),
                )
            };

        let mailer: Arc<dyn Mailer> = match HttpMailer::new(&config) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                warn!("{}, outgoing mail is only logged", e);
                Arc::new(LogMailer)
            }
        };

        let notifications = NotificationDispatcher::spawn(mailer, config.clone());

        Self::new(config, doctors, records, notifications)
    }

    pub fn new(
        config: Arc<AppConfig>,
        doctors: Arc<dyn DoctorDirectory>,
        records: Arc<dyn RecordStore>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            config,
            doctors,
            records,
            notifications,
        }
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState::new(self.config.clone(), self.doctors.clone(), self.notifications.clone())
    }

    pub fn record_state(&self) -> RecordState {
        RecordState::new(
            self.config.clone(),
            self.doctors.clone(),
            self.records.clone(),
            self.notifications.clone(),
        )
    }

    pub fn satusehat_client(&self) -> SatuSehatClient {
        SatuSehatClient::new(&self.config)
    }
}
