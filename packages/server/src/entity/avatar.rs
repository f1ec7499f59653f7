use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's profile image. The bytes are kept both on disk (`file_path`)
/// and in the row itself (`data`).
///
/// There is no unique constraint on `student_id`; one avatar per student is
/// maintained by the upload path's find-or-create.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "avatar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub student_id: i32,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    pub media_type: String,
    pub file_size: i64, // in bytes
    pub data: Vec<u8>,
    pub file_path: String, // absolute
}

impl ActiveModelBehavior for ActiveModel {}
