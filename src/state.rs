use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserStore, UserStore};
use crate::leads::repo::{LeadStore, PgLeadStore};

/// Shared by every handler. Stores are trait objects over one injected pool.
#[derive(Clone)]
pub struct AppState {
    pub leads: Arc<dyn LeadStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self {
            leads: Arc::new(PgLeadStore::new(db.clone())),
            users: Arc::new(PgUserStore::new(db)),
        }
    }

    /// In-memory stores, no database needed.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::memory::MemoryUserStore;
        use crate::leads::memory::MemoryLeadStore;

        Self {
            leads: Arc::new(MemoryLeadStore::default()),
            users: Arc::new(MemoryUserStore::default()),
        }
    }
}
