use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entity::avatar;

/// Column values written on every upload.
pub struct AvatarFields {
    pub media_type: String,
    pub file_size: i64,
    pub data: Vec<u8>,
    pub file_path: String,
}

pub struct AvatarRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AvatarRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<avatar::Model>, DbErr> {
        avatar::Entity::find_by_id(id).one(self.db).await
    }

    /// The lowest-id avatar of a student.
    pub async fn find_first_by_student(
        &self,
        student_id: i32,
    ) -> Result<Option<avatar::Model>, DbErr> {
        avatar::Entity::find()
            .filter(avatar::Column::StudentId.eq(student_id))
            .order_by_asc(avatar::Column::Id)
            .one(self.db)
            .await
    }

    pub async fn insert(&self, student_id: i32, fields: AvatarFields) -> Result<avatar::Model, DbErr> {
        avatar::ActiveModel {
            student_id: Set(student_id),
            media_type: Set(fields.media_type),
            file_size: Set(fields.file_size),
            data: Set(fields.data),
            file_path: Set(fields.file_path),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        existing: avatar::Model,
        fields: AvatarFields,
    ) -> Result<avatar::Model, DbErr> {
        let mut active: avatar::ActiveModel = existing.into();
        active.media_type = Set(fields.media_type);
        active.file_size = Set(fields.file_size);
        active.data = Set(fields.data);
        active.file_path = Set(fields.file_path);
        active.update(self.db).await
    }

    /// Stored file paths of a student's avatars.
    pub async fn find_paths_by_student(&self, student_id: i32) -> Result<Vec<String>, DbErr> {
        avatar::Entity::find()
            .select_only()
            .column(avatar::Column::FilePath)
            .filter(avatar::Column::StudentId.eq(student_id))
            .into_tuple::<String>()
            .all(self.db)
            .await
    }

    pub async fn delete_by_student(&self, student_id: i32) -> Result<u64, DbErr> {
        let res = avatar::Entity::delete_many()
            .filter(avatar::Column::StudentId.eq(student_id))
            .exec(self.db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        avatar::Entity::find().count(self.db).await
    }

    /// `(avatar_id, student_id)` pairs ordered by avatar id, skipping `offset`.
    pub async fn find_page_ids(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<(i32, i32)>, DbErr> {
        avatar::Entity::find()
            .select_only()
            .column(avatar::Column::Id)
            .column(avatar::Column::StudentId)
            .order_by_asc(avatar::Column::Id)
            .offset(Some(offset))
            .limit(Some(limit))
            .into_tuple::<(i32, i32)>()
            .all(self.db)
            .await
    }
}
