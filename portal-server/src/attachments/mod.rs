//! File attachment registry
//!
//! Attachments hang off exactly one order or quote. The registry owns
//! the storage directory: `attach` writes the blob under a UUID name
//! and records the row; `remove` deletes both. Visibility mirrors the
//! authorization guard, with one deliberate exception: a missing blob
//! on disk reports `FileNotFound`, the same as a missing row, so the
//! error code never reveals whether the file ever existed.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Actor, EntityKind, FileAttachment, FileRole, UploadMeta};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::repository::{attachment, order, quote};
use crate::db::rows::AttachmentRow;
use crate::symbols::SymbolTable;
use crate::utils::validation::{ALLOWED_UPLOAD_EXTENSIONS, MAX_FILENAME_LEN};

/// Owner id plus whether owner-side edits are locked, for whichever
/// entity the attachment belongs to.
struct ParentInfo {
    owner_user_id: i64,
    locked_for_owner: bool,
}

#[derive(Clone)]
pub struct AttachmentRegistry {
    pool: SqlitePool,
    symbols: Arc<SymbolTable>,
    upload_dir: PathBuf,
    max_upload_bytes: i64,
}

impl AttachmentRegistry {
    pub fn new(
        pool: SqlitePool,
        symbols: Arc<SymbolTable>,
        upload_dir: impl Into<PathBuf>,
        max_upload_bytes: i64,
    ) -> Self {
        Self {
            pool,
            symbols,
            upload_dir: upload_dir.into(),
            max_upload_bytes,
        }
    }

    /// Store an upload and attach it to an order or quote.
    ///
    /// Uploads by the entity owner are tagged `CUSTOMER_UPLOAD`, by an
    /// admin `ADMIN_RESPONSE`; anyone else is refused.
    pub async fn attach(
        &self,
        actor: &Actor,
        entity_kind: EntityKind,
        entity_id: i64,
        meta: UploadMeta,
        data: &[u8],
    ) -> AppResult<FileAttachment> {
        let parent = self.parent_info(entity_kind, entity_id).await?;

        let role = if actor.is_admin() {
            FileRole::AdminResponse
        } else if actor.owns(parent.owner_user_id) {
            FileRole::CustomerUpload
        } else {
            return Err(AppError::forbidden("Not allowed to attach files here"));
        };

        let extension = self.validate_upload(&meta, data)?;
        let mime_type = meta.mime_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&meta.original_name)
                .first_or_octet_stream()
                .to_string()
        });

        let stored_name = format!("{}.{extension}", Uuid::new_v4());
        let storage_path = self.upload_dir.join(&stored_name);
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to create upload dir: {e}"),
            ))?;
        tokio::fs::write(&storage_path, data).await.map_err(|e| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to store upload: {e}"),
            )
        })?;

        let new = attachment::NewAttachment {
            entity_type_id: self.symbols.encode(entity_kind)?,
            entity_id,
            file_role_id: self.symbols.encode(role)?,
            original_name: meta.original_name.clone(),
            stored_name,
            storage_path: storage_path.to_string_lossy().into_owned(),
            mime_type,
            size_bytes: data.len() as i64,
            uploader_user_id: actor.id,
        };
        let id = self.persist(&new, &storage_path).await?;

        tracing::info!(
            attachment_id = id,
            entity = %entity_kind,
            entity_id,
            size = new.size_bytes,
            "File attached"
        );
        self.load(id).await
    }

    /// List an entity's attachments, admin or parent owner only.
    pub async fn list_for(
        &self,
        actor: &Actor,
        entity_kind: EntityKind,
        entity_id: i64,
    ) -> AppResult<Vec<FileAttachment>> {
        let parent = self.parent_info(entity_kind, entity_id).await?;
        if !(actor.is_admin() || actor.owns(parent.owner_user_id)) {
            return Err(AppError::forbidden("Not allowed to list these files"));
        }

        let entity_type_id = self.symbols.encode(entity_kind)?;
        let rows = attachment::list_for_entity(&self.pool, entity_type_id, entity_id).await?;
        rows.into_iter().map(|r| r.decode(&self.symbols)).collect()
    }

    /// Authorize a download and confirm the blob is actually on disk.
    pub async fn resolve_for_download(
        &self,
        actor: &Actor,
        file_id: i64,
    ) -> AppResult<FileAttachment> {
        let row = self.require(file_id).await?;
        self.ensure_file_access(actor, &row).await?;

        if !Path::new(&row.storage_path).exists() {
            // Missing blob reads the same as a missing row
            return Err(AppError::new(ErrorCode::FileNotFound));
        }
        row.decode(&self.symbols)
    }

    /// Remove an attachment row and its blob. Admins always; the
    /// uploader only while the parent is still open for owner edits.
    pub async fn remove(&self, actor: &Actor, file_id: i64) -> AppResult<()> {
        let row = self.require(file_id).await?;

        if !actor.is_admin() {
            let entity_kind: EntityKind = self.symbols.decode(row.entity_type_id)?;
            let parent = self.parent_info(entity_kind, row.entity_id).await?;
            let is_uploader = actor.owns(row.uploader_user_id);
            if !(is_uploader && actor.owns(parent.owner_user_id) && !parent.locked_for_owner) {
                return Err(AppError::forbidden("Not allowed to remove this file"));
            }
        }

        attachment::delete(&self.pool, file_id).await?;
        if let Err(e) = tokio::fs::remove_file(&row.storage_path).await {
            tracing::warn!(attachment_id = file_id, error = %e, "Failed to remove stored blob");
        }
        tracing::info!(attachment_id = file_id, "Attachment removed");
        Ok(())
    }

    /// Record the row for an already-stored blob. The row is the
    /// source of truth; if the insert fails the blob is removed again
    /// so it never sits on disk unreferenced.
    async fn persist(&self, new: &attachment::NewAttachment, storage_path: &Path) -> AppResult<i64> {
        match attachment::insert(&self.pool, new, now_millis()).await {
            Ok(id) => Ok(id),
            Err(e) => {
                if let Err(fs_err) = tokio::fs::remove_file(storage_path).await {
                    tracing::warn!(
                        path = %storage_path.display(),
                        error = %fs_err,
                        "Failed to clean up stored blob after insert error"
                    );
                }
                Err(e)
            }
        }
    }

    fn validate_upload(&self, meta: &UploadMeta, data: &[u8]) -> AppResult<String> {
        if data.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }
        if data.len() as i64 > self.max_upload_bytes {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!(
                    "File is {} bytes, limit is {}",
                    data.len(),
                    self.max_upload_bytes
                ),
            ));
        }
        let name = meta.original_name.trim();
        if name.is_empty() {
            return Err(AppError::new(ErrorCode::NoFilename));
        }
        if name.len() > MAX_FILENAME_LEN {
            return Err(AppError::validation("Filename is too long"));
        }

        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !ALLOWED_UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("File type '.{extension}' is not accepted"),
            ));
        }
        Ok(extension)
    }

    /// File-level visibility: admin, uploader, or parent owner.
    async fn ensure_file_access(&self, actor: &Actor, row: &AttachmentRow) -> AppResult<()> {
        if actor.is_admin() || actor.owns(row.uploader_user_id) {
            return Ok(());
        }
        let entity_kind: EntityKind = self.symbols.decode(row.entity_type_id)?;
        let parent = self.parent_info(entity_kind, row.entity_id).await?;
        if actor.owns(parent.owner_user_id) {
            Ok(())
        } else {
            Err(AppError::forbidden("Not allowed to access this file"))
        }
    }

    async fn parent_info(&self, entity_kind: EntityKind, entity_id: i64) -> AppResult<ParentInfo> {
        match entity_kind {
            EntityKind::Order => {
                let row = order::find_by_id(&self.pool, entity_id)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::AttachmentParentNotFound))?;
                let status: shared::models::OrderStatus = self.symbols.decode(row.status_id)?;
                Ok(ParentInfo {
                    owner_user_id: row.owner_user_id,
                    locked_for_owner: status.is_terminal(),
                })
            }
            EntityKind::Quote => {
                let row = quote::find_by_id(&self.pool, entity_id)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::AttachmentParentNotFound))?;
                let status: shared::models::QuoteStatus = self.symbols.decode(row.status_id)?;
                Ok(ParentInfo {
                    owner_user_id: row.owner_user_id,
                    locked_for_owner: status != shared::models::QuoteStatus::Pending,
                })
            }
        }
    }

    async fn require(&self, id: i64) -> AppResult<AttachmentRow> {
        attachment::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::FileNotFound))
    }

    async fn load(&self, id: i64) -> AppResult<FileAttachment> {
        self.require(id).await?.decode(&self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn upload(name: &str) -> UploadMeta {
        UploadMeta {
            original_name: name.to_string(),
            mime_type: None,
        }
    }

    #[tokio::test]
    async fn test_attach_tags_role_by_actor() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);
        let admin = Actor::admin(1);
        let quote = env
            .quotes()
            .create(&owner, testing::digitizing_quote())
            .await
            .unwrap();

        let file = env
            .attachments()
            .attach(&owner, EntityKind::Quote, quote.id, upload("art.png"), PNG_BYTES)
            .await
            .unwrap();
        assert_eq!(file.role, FileRole::CustomerUpload);
        assert_eq!(file.mime_type, "image/png");
        assert!(file.stored_name.ends_with(".png"));

        let file = env
            .attachments()
            .attach(&admin, EntityKind::Quote, quote.id, upload("proof.pdf"), PNG_BYTES)
            .await
            .unwrap();
        assert_eq!(file.role, FileRole::AdminResponse);

        let stranger = Actor::customer(11);
        let err = env
            .attachments()
            .attach(&stranger, EntityKind::Quote, quote.id, upload("x.png"), PNG_BYTES)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_attach_validates_upload() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);
        let quote = env
            .quotes()
            .create(&owner, testing::digitizing_quote())
            .await
            .unwrap();
        let registry = env.attachments();

        let err = registry
            .attach(&owner, EntityKind::Quote, quote.id, upload("art.png"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);

        let err = registry
            .attach(&owner, EntityKind::Quote, quote.id, upload("  "), PNG_BYTES)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoFilename);

        let err = registry
            .attach(&owner, EntityKind::Quote, quote.id, upload("run.exe"), PNG_BYTES)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = registry
            .attach(
                &owner,
                EntityKind::Quote,
                999,
                upload("art.png"),
                PNG_BYTES,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AttachmentParentNotFound);
    }

    #[tokio::test]
    async fn test_size_cap() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);
        let quote = env
            .quotes()
            .create(&owner, testing::digitizing_quote())
            .await
            .unwrap();

        let registry = AttachmentRegistry::new(
            env.pool(),
            env.symbols(),
            env.upload_dir(),
            4, // tiny cap
        );
        let err = registry
            .attach(&owner, EntityKind::Quote, quote.id, upload("art.png"), PNG_BYTES)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }

    #[tokio::test]
    async fn test_download_visibility_and_missing_blob() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);
        let stranger = Actor::customer(11);
        let quote = env
            .quotes()
            .create(&owner, testing::digitizing_quote())
            .await
            .unwrap();

        let file = env
            .attachments()
            .attach(&owner, EntityKind::Quote, quote.id, upload("art.png"), PNG_BYTES)
            .await
            .unwrap();

        assert!(env
            .attachments()
            .resolve_for_download(&owner, file.id)
            .await
            .is_ok());

        let err = env
            .attachments()
            .resolve_for_download(&stranger, file.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        // Blob gone from disk: NotFound, not Forbidden
        tokio::fs::remove_file(&file.storage_path).await.unwrap();
        let err = env
            .attachments()
            .resolve_for_download(&owner, file.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[tokio::test]
    async fn test_remove_rules() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);
        let stranger = Actor::customer(11);
        let admin = Actor::admin(1);
        let quote = env
            .quotes()
            .create(&owner, testing::digitizing_quote())
            .await
            .unwrap();

        let file = env
            .attachments()
            .attach(&owner, EntityKind::Quote, quote.id, upload("art.png"), PNG_BYTES)
            .await
            .unwrap();

        let err = env
            .attachments()
            .remove(&stranger, file.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        // Uploader can remove while the quote is still pending
        env.attachments().remove(&owner, file.id).await.unwrap();
        let err = env
            .attachments()
            .remove(&owner, file.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);

        // After pricing the quote is locked for the owner; only admins remove
        let file = env
            .attachments()
            .attach(&owner, EntityKind::Quote, quote.id, upload("art2.png"), PNG_BYTES)
            .await
            .unwrap();
        env.quotes()
            .set_pricing(&admin, quote.id, testing::pricing(5_000))
            .await
            .unwrap();
        let err = env.attachments().remove(&owner, file.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        env.attachments().remove(&admin, file.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_insert_cleans_up_stored_blob() {
        let env = testing::TestEnv::new().await;
        let registry = env.attachments();

        let storage_path = env.upload_dir().join("orphan.png");
        tokio::fs::write(&storage_path, PNG_BYTES).await.unwrap();

        // entity_type_id violates the symbolic_value foreign key, so
        // the insert fails after the blob was already stored
        let new = attachment::NewAttachment {
            entity_type_id: 999_999,
            entity_id: 1,
            file_role_id: 999_999,
            original_name: "orphan.png".to_string(),
            stored_name: "orphan.png".to_string(),
            storage_path: storage_path.to_string_lossy().into_owned(),
            mime_type: "image/png".to_string(),
            size_bytes: PNG_BYTES.len() as i64,
            uploader_user_id: 10,
        };
        let err = registry.persist(&new, &storage_path).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!storage_path.exists());
    }
}
