use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use nestfund_core::savings::{SavingService, SavingServiceTrait};
use nestfund_core::users::{UserService, UserServiceTrait};
use nestfund_storage_sqlite::auth_tokens::AuthTokenRepository;
use nestfund_storage_sqlite::db::{self, write_actor};
use nestfund_storage_sqlite::savings::SavingRepository;
use nestfund_storage_sqlite::users::UserRepository;

use crate::{auth::AuthManager, config::Config, uploads::FsImageStore};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub saving_service: Arc<dyn SavingServiceTrait>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("NF_LOG_FORMAT").as_deref() == Ok("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let token_repository = Arc::new(AuthTokenRepository::new(pool.clone(), writer.clone()));
    let saving_repository = Arc::new(SavingRepository::new(pool.clone(), writer.clone()));
    let image_store = Arc::new(FsImageStore::new(&config.upload_dir));

    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let saving_service = Arc::new(SavingService::new(saving_repository, image_store));
    let auth = Arc::new(AuthManager::new(user_repository, token_repository));

    Ok(Arc::new(AppState {
        user_service,
        saving_service,
        auth,
    }))
}
