use serde::{Deserialize, Serialize};

use crate::entity::faculty;
use crate::error::AppError;

use super::shared::validate_text;

/// Body of both create and update; update replaces name and color.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct FacultyRequest {
    #[schema(example = "Gryffindor")]
    pub name: String,
    #[schema(example = "red")]
    pub color: String,
}

#[derive(Serialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct FacultyResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Gryffindor")]
    pub name: String,
    #[schema(example = "red")]
    pub color: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ColorQuery {
    /// Exact color to match.
    pub color: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ColorOrNameQuery {
    /// Case-insensitive substring matched against color or name.
    #[serde(rename = "colorOrName")]
    pub color_or_name: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentIdQuery {
    #[serde(rename = "studentId")]
    pub student_id: i32,
}

pub fn validate_faculty(payload: &FacultyRequest) -> Result<(), AppError> {
    validate_text("Name", &payload.name)?;
    validate_text("Color", &payload.color)
}

impl From<faculty::Model> for FacultyResponse {
    fn from(m: faculty::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            color: m.color,
        }
    }
}
