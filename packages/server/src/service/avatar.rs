use std::collections::HashMap;

use common::storage::{BoxReader, FileStore};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, warn};

use crate::entity::avatar;
use crate::error::AppError;
use crate::models::avatar::{
    AVATAR_PAGE_SIZE, AvatarListResponse, AvatarSummary, AvatarUpload, Pagination,
};
use crate::repository::avatar::AvatarFields;
use crate::repository::{AvatarRepository, StudentRepository};
use crate::utils::filename::{avatar_file_name, stored_file_name};

pub struct AvatarService<'a> {
    db: &'a DatabaseConnection,
    store: &'a dyn FileStore,
}

impl<'a> AvatarService<'a> {
    pub fn new(db: &'a DatabaseConnection, store: &'a dyn FileStore) -> Self {
        Self { db, store }
    }

    /// Creates or replaces the student's avatar row and writes the image to
    /// `{student_id}.{ext}`.
    ///
    /// The row change and the file write share a transaction that commits
    /// only after the file is in place, so a failed write leaves the old row.
    /// A failed commit after a successful write leaves the new bytes on disk
    /// under the old row. When the extension changes, the previous file is
    /// removed after commit.
    ///
    /// Not synchronized: two concurrent uploads for one student race on both
    /// the file and the find-or-create, and may leave two rows.
    pub async fn upload(
        &self,
        student_id: i32,
        upload: AvatarUpload,
    ) -> Result<avatar::Model, AppError> {
        StudentRepository::new(self.db)
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))?;

        let file_name = avatar_file_name(student_id, &upload.file_name)
            .map_err(|e| AppError::Validation(e.message().into()))?;
        let media_type = media_type_of(&upload);
        let path = self.store.path(&file_name)?;

        let fields = AvatarFields {
            media_type,
            file_size: i64::try_from(upload.bytes.len()).unwrap_or(i64::MAX),
            data: upload.bytes,
            file_path: path.to_string_lossy().into_owned(),
        };

        let txn = self.db.begin().await?;
        let repo = AvatarRepository::new(&txn);

        let existing = repo.find_first_by_student(student_id).await?;
        let replaced = existing
            .as_ref()
            .and_then(|m| stored_file_name(&m.file_path))
            .filter(|old| *old != file_name)
            .map(str::to_string);
        let model = match existing {
            Some(existing) => repo.update(existing, fields).await?,
            None => repo.insert(student_id, fields).await?,
        };

        self.store.put(&file_name, &model.data).await?;
        txn.commit().await?;

        if let Some(old) = replaced
            && let Err(e) = self.store.delete(&old).await
        {
            warn!(student_id, file = %old, "Failed to remove replaced avatar file: {e}");
        }

        info!(
            avatar_id = model.id,
            student_id,
            size = model.file_size,
            "Avatar stored"
        );
        Ok(model)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<avatar::Model, AppError> {
        AvatarRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Avatar not found".into()))
    }

    /// Opens the stored file of an avatar for streaming.
    pub async fn open_file(&self, id: i32) -> Result<(avatar::Model, BoxReader), AppError> {
        let model = self.get_by_id(id).await?;
        let name = stored_file_name(&model.file_path)
            .ok_or_else(|| AppError::Internal(format!("Bad avatar path: {}", model.file_path)))?
            .to_string();
        let reader = self.store.get_stream(&name).await?;
        Ok((model, reader))
    }

    /// One page of avatar summaries; `page` is 1-based. Pages past the last
    /// one are empty.
    pub async fn list_page(&self, page: u64) -> Result<AvatarListResponse, AppError> {
        let page = page.max(1);
        let avatars = AvatarRepository::new(self.db);

        let total = avatars.count().await?;
        let pagination = Pagination::new(page, AVATAR_PAGE_SIZE, total);
        let offset = match (page - 1).checked_mul(AVATAR_PAGE_SIZE) {
            Some(offset) if page <= pagination.total_pages => offset,
            _ => {
                return Ok(AvatarListResponse {
                    data: Vec::new(),
                    pagination,
                });
            }
        };
        let ids = avatars.find_page_ids(offset, AVATAR_PAGE_SIZE).await?;

        let student_ids = ids.iter().map(|&(_, student_id)| student_id).collect();
        let names: HashMap<i32, String> = StudentRepository::new(self.db)
            .find_names_by_ids(student_ids)
            .await?
            .into_iter()
            .collect();

        let data = ids
            .into_iter()
            .filter_map(|(avatar_id, student_id)| {
                names.get(&student_id).map(|name| AvatarSummary {
                    avatar_id,
                    student_id,
                    student_name: name.clone(),
                })
            })
            .collect();

        Ok(AvatarListResponse { data, pagination })
    }
}

/// Declared media type, else a guess from the file name.
fn media_type_of(upload: &AvatarUpload) -> String {
    upload
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .map(str::to_string)
        .or_else(|| {
            mime_guess::from_path(&upload.file_name)
                .first()
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
