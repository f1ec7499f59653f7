use serde::{Deserialize, Serialize};

use crate::entity::avatar;

pub use super::shared::Pagination;

/// Fixed page size of the avatar listing.
pub const AVATAR_PAGE_SIZE: u64 = 5;

/// An uploaded image as read from the multipart body.
pub struct AvatarUpload {
    /// Original file name supplied by the client.
    pub file_name: String,
    /// Media type declared by the client, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Avatar metadata. The image bytes are served by the `from-db` and
/// `from-file` endpoints.
#[derive(Serialize, Debug, utoipa::ToSchema)]
pub struct AvatarResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 7)]
    pub student_id: i32,
    #[schema(example = "image/png")]
    pub media_type: String,
    /// Size in bytes.
    #[schema(example = 48213)]
    pub file_size: i64,
    /// Absolute path of the stored file.
    #[schema(example = "/var/lib/school/avatars/7.png")]
    pub file_path: String,
}

#[derive(Serialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct AvatarSummary {
    pub avatar_id: i32,
    pub student_id: i32,
    #[schema(example = "Ivan")]
    pub student_name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AvatarListResponse {
    pub data: Vec<AvatarSummary>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvatarPageQuery {
    /// Page number (1-based, default 1).
    pub page: Option<u64>,
}

impl From<avatar::Model> for AvatarResponse {
    fn from(m: avatar::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            media_type: m.media_type,
            file_size: m.file_size,
            file_path: m.file_path,
        }
    }
}
