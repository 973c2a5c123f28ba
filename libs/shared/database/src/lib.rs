pub mod error;
pub mod memory;
pub mod postgrest;
pub mod repository;
pub mod supabase;

pub use error::StoreError;
pub use memory::{InMemoryDoctorDirectory, InMemoryRecordStore};
pub use postgrest::{SupabaseDoctorDirectory, SupabaseRecordStore};
pub use repository::{DoctorDirectory, RecordStore};
