pub mod entity;
pub mod ids;
pub mod models;
use tokio::sync::OnceCell;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::service::{
    groups::GroupsService, meetings::MeetingsService, membership::MembershipService,
    mentees::MenteesService, users::UsersService,
};

pub mod service;

pub mod error;

pub mod config;

#[cfg(test)]
pub(crate) mod test_utils;

static LIQO_CORE: OnceCell<Arc<LiqoCore>> = OnceCell::const_new();

pub async fn core() -> Arc<LiqoCore> {
    LIQO_CORE
        .get_or_init(|| async move { Arc::new(LiqoCore::start().await.expect("failed to init")) })
        .await
        .clone()
}

/// Main runtime handle for the Jejak Liqo core.
pub struct LiqoCore {
    pub config: config::LiqoConfig,

    /// Shared connection pool; every service holds a clone.
    pub db: DatabaseConnection,

    pub users: UsersService,
    pub groups: GroupsService,
    pub mentees: MenteesService,
    pub membership: MembershipService,
    pub meetings: MeetingsService,
}

impl LiqoCore {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::get_or_init().await?;

        // DB + migrations
        let db = models::open_or_create_db(&config).await;
        models::migrate_up(db.clone()).await;

        let users = UsersService::new(db.clone());
        let groups = GroupsService::new(db.clone());
        let mentees = MenteesService::new(db.clone());
        let membership = MembershipService::new(db.clone());
        let meetings = MeetingsService::new(db.clone());

        info!("liqo core started");

        Ok(Self {
            config,
            db,
            users,
            groups,
            mentees,
            membership,
            meetings,
        })
    }

    pub async fn shutdown(self) -> Result<(), Box<dyn std::error::Error>> {
        self.db.close().await?;
        Ok(())
    }
}

pub mod prelude {
    pub use super::entity;
    pub use super::ids;
    pub use super::models;

    pub use super::service;

    pub use super::error;

    pub use super::config;

    pub use super::error::{CoreError, EntityKind};
    pub use super::service::membership::TransitionOutcome;
}
