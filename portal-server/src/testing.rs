//! Test fixtures: an in-memory database with the seed applied, plus
//! payload builders used across the service tests.

use shared::models::{DesignSpec, OrderCreate, QuoteCreate, QuotePricing, ServiceKind};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

use crate::attachments::AttachmentRegistry;
use crate::conversion::ConversionCoordinator;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::quotes::QuoteService;
use crate::symbols::SymbolTable;

pub struct TestEnv {
    db: DbService,
    symbols: Arc<SymbolTable>,
    // Held so the upload directory outlives the test
    upload_dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let symbols = Arc::new(SymbolTable::load(&db.pool).await.unwrap());
        symbols.verify_seed().unwrap();
        let upload_dir = TempDir::new().unwrap();
        Self {
            db,
            symbols,
            upload_dir,
        }
    }

    pub fn pool(&self) -> SqlitePool {
        self.db.pool.clone()
    }

    pub fn symbols(&self) -> Arc<SymbolTable> {
        self.symbols.clone()
    }

    pub fn upload_dir(&self) -> std::path::PathBuf {
        self.upload_dir.path().to_path_buf()
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.pool(), self.symbols())
    }

    pub fn quotes(&self) -> QuoteService {
        QuoteService::new(self.pool(), self.symbols())
    }

    pub fn conversion(&self) -> ConversionCoordinator {
        ConversionCoordinator::new(self.pool(), self.symbols())
    }

    pub fn attachments(&self) -> AttachmentRegistry {
        AttachmentRegistry::new(
            self.pool(),
            self.symbols(),
            self.upload_dir(),
            25 * 1024 * 1024,
        )
    }
}

pub fn digitizing_design() -> DesignSpec {
    DesignSpec {
        design_name: "Eagle crest".to_string(),
        width: Some(4.0),
        height: Some(3.0),
        unit: Some(shared::models::MeasureUnit::Inch),
        color_count: Some(6),
        fabric: Some("twill".to_string()),
        color_type: None,
        placements: vec!["LEFT_CHEST".to_string()],
        required_formats: vec!["DST".to_string(), "PES".to_string()],
        instructions: Some("Match thread colors to the provided artwork".to_string()),
    }
}

pub fn digitizing_order() -> OrderCreate {
    OrderCreate {
        kind: ServiceKind::Digitizing,
        design: digitizing_design(),
        is_urgent: false,
    }
}

pub fn digitizing_quote() -> QuoteCreate {
    QuoteCreate {
        kind: ServiceKind::Digitizing,
        design: digitizing_design(),
        is_urgent: false,
    }
}

pub fn pricing(price_cents: i64) -> QuotePricing {
    QuotePricing {
        price_cents,
        currency: "USD".to_string(),
        remarks: Some("Standard turnaround".to_string()),
    }
}
