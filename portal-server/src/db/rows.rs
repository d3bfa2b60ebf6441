//! Raw row types
//!
//! Rows carry surrogate ids and JSON text columns as stored; decoding
//! into the shared DTOs goes through the symbol table. Row types never
//! cross the service boundary.

use shared::error::AppResult;
use shared::models::{
    DesignSpec, EntityKind, FileAttachment, FileRole, MeasureUnit, Order, OrderStatus, Quote,
    QuoteStatus, ServiceKind,
};
use sqlx::FromRow;

use crate::symbols::SymbolTable;

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub order_number: String,
    pub owner_user_id: i64,
    pub kind_id: i64,
    pub status_id: i64,
    pub design_name: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit_id: Option<i64>,
    pub color_count: Option<i64>,
    pub fabric: Option<String>,
    pub color_type: Option<String>,
    pub placements: String,
    pub required_formats: String,
    pub instructions: Option<String>,
    pub is_urgent: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct QuoteRow {
    pub id: i64,
    pub quote_number: String,
    pub owner_user_id: i64,
    pub kind_id: i64,
    pub status_id: i64,
    pub design_name: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit_id: Option<i64>,
    pub color_count: Option<i64>,
    pub fabric: Option<String>,
    pub color_type: Option<String>,
    pub placements: String,
    pub required_formats: String,
    pub instructions: Option<String>,
    pub is_urgent: bool,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub admin_remarks: Option<String>,
    pub converted_order_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct AttachmentRow {
    pub id: i64,
    pub entity_type_id: i64,
    pub entity_id: i64,
    pub file_role_id: i64,
    pub original_name: String,
    pub stored_name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploader_user_id: i64,
    pub created_at: i64,
}

/// Columns shared by order and quote inserts/updates, already encoded.
#[derive(Debug, Clone)]
pub struct DesignCols {
    pub kind_id: i64,
    pub design_name: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit_id: Option<i64>,
    pub color_count: Option<i64>,
    pub fabric: Option<String>,
    pub color_type: Option<String>,
    pub placements: String,
    pub required_formats: String,
    pub instructions: Option<String>,
    pub is_urgent: bool,
}

impl DesignCols {
    pub fn encode(
        symbols: &SymbolTable,
        kind: ServiceKind,
        design: &DesignSpec,
        is_urgent: bool,
    ) -> AppResult<Self> {
        let unit_id = match design.unit {
            Some(unit) => Some(symbols.encode(unit)?),
            None => None,
        };
        Ok(Self {
            kind_id: symbols.encode(kind)?,
            design_name: design.design_name.clone(),
            width: design.width,
            height: design.height,
            unit_id,
            color_count: design.color_count,
            fabric: design.fabric.clone(),
            color_type: design.color_type.clone(),
            placements: serde_json::to_string(&design.placements)
                .unwrap_or_else(|_| "[]".to_string()),
            required_formats: serde_json::to_string(&design.required_formats)
                .unwrap_or_else(|_| "[]".to_string()),
            instructions: design.instructions.clone(),
            is_urgent,
        })
    }
}

fn decode_design(
    symbols: &SymbolTable,
    design_name: String,
    width: Option<f64>,
    height: Option<f64>,
    unit_id: Option<i64>,
    color_count: Option<i64>,
    fabric: Option<String>,
    color_type: Option<String>,
    placements: &str,
    required_formats: &str,
    instructions: Option<String>,
) -> AppResult<DesignSpec> {
    let unit: Option<MeasureUnit> = match unit_id {
        Some(id) => Some(symbols.decode(id)?),
        None => None,
    };
    Ok(DesignSpec {
        design_name,
        width,
        height,
        unit,
        color_count,
        fabric,
        color_type,
        placements: serde_json::from_str(placements).unwrap_or_default(),
        required_formats: serde_json::from_str(required_formats).unwrap_or_default(),
        instructions,
    })
}

impl OrderRow {
    pub fn decode(self, symbols: &SymbolTable) -> AppResult<Order> {
        let kind: ServiceKind = symbols.decode(self.kind_id)?;
        let status: OrderStatus = symbols.decode(self.status_id)?;
        let design = decode_design(
            symbols,
            self.design_name,
            self.width,
            self.height,
            self.unit_id,
            self.color_count,
            self.fabric,
            self.color_type,
            &self.placements,
            &self.required_formats,
            self.instructions,
        )?;
        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            owner_user_id: self.owner_user_id,
            kind,
            status,
            design,
            is_urgent: self.is_urgent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl QuoteRow {
    pub fn decode(self, symbols: &SymbolTable) -> AppResult<Quote> {
        let kind: ServiceKind = symbols.decode(self.kind_id)?;
        let status: QuoteStatus = symbols.decode(self.status_id)?;
        let design = decode_design(
            symbols,
            self.design_name,
            self.width,
            self.height,
            self.unit_id,
            self.color_count,
            self.fabric,
            self.color_type,
            &self.placements,
            &self.required_formats,
            self.instructions,
        )?;
        Ok(Quote {
            id: self.id,
            quote_number: self.quote_number,
            owner_user_id: self.owner_user_id,
            kind,
            status,
            design,
            is_urgent: self.is_urgent,
            price_cents: self.price_cents,
            currency: self.currency,
            admin_remarks: self.admin_remarks,
            converted_order_id: self.converted_order_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AttachmentRow {
    pub fn decode(self, symbols: &SymbolTable) -> AppResult<FileAttachment> {
        let entity_kind: EntityKind = symbols.decode(self.entity_type_id)?;
        let role: FileRole = symbols.decode(self.file_role_id)?;
        Ok(FileAttachment {
            id: self.id,
            entity_kind,
            entity_id: self.entity_id,
            role,
            original_name: self.original_name,
            stored_name: self.stored_name,
            storage_path: self.storage_path,
            mime_type: self.mime_type,
            size_bytes: self.size_bytes,
            uploader_user_id: self.uploader_user_id,
            created_at: self.created_at,
        })
    }
}
