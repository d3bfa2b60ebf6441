//! Server state
//!
//! Owns the long-lived pieces (config, pool, symbol table) and hands
//! out the per-domain services. Initialization fails fast: the symbol
//! seed is verified before anything else can run.

use shared::error::AppResult;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::attachments::AttachmentRegistry;
use crate::conversion::ConversionCoordinator;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::quotes::QuoteService;
use crate::symbols::SymbolTable;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub symbols: Arc<SymbolTable>,
}

impl ServerState {
    /// Open the database, apply migrations, load and verify the symbol
    /// table, prepare the upload directory.
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;

        let symbols = Arc::new(SymbolTable::load(&db.pool).await?);
        symbols.verify_seed()?;
        tracing::info!("Symbolic value seed verified");

        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .map_err(|e| {
                shared::error::AppError::config(format!("Failed to create upload dir: {e}"))
            })?;

        Ok(Self { config, db, symbols })
    }

    pub fn pool(&self) -> SqlitePool {
        self.db.pool.clone()
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.pool(), self.symbols.clone())
    }

    pub fn quotes(&self) -> QuoteService {
        QuoteService::new(self.pool(), self.symbols.clone())
    }

    pub fn conversion(&self) -> ConversionCoordinator {
        ConversionCoordinator::new(self.pool(), self.symbols.clone())
    }

    pub fn attachments(&self) -> AttachmentRegistry {
        AttachmentRegistry::new(
            self.pool(),
            self.symbols.clone(),
            self.config.upload_dir.clone(),
            self.config.max_upload_bytes,
        )
    }
}
