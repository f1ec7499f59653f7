use serde::{Deserialize, Serialize};

use crate::entity::student;
use crate::error::AppError;

use super::shared::{validate_age, validate_text};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateStudentRequest {
    #[schema(example = "Ivan")]
    pub name: String,
    #[schema(example = 20)]
    pub age: i32,
    /// Faculty the student belongs to. Fixed at creation.
    pub faculty_id: Option<i32>,
}

/// Full replacement of the mutable student fields.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateStudentRequest {
    #[schema(example = "Ivan")]
    pub name: String,
    #[schema(example = 21)]
    pub age: i32,
}

#[derive(Serialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct StudentResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ivan")]
    pub name: String,
    #[schema(example = 20)]
    pub age: i32,
    pub faculty_id: Option<i32>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AgeQuery {
    /// Exact age to match.
    pub age: i32,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AgeRangeQuery {
    /// Lower bound, inclusive.
    pub min: i32,
    /// Upper bound, inclusive.
    pub max: i32,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FacultyIdQuery {
    #[serde(rename = "facultyId")]
    pub faculty_id: i32,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LetterQuery {
    /// A single character; matched against the first character of each name ignoring ASCII case.
    pub letter: String,
}

impl LetterQuery {
    pub fn single_char(&self) -> Result<char, AppError> {
        let mut chars = self.letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(AppError::Validation(
                "letter must be exactly one character".into(),
            )),
        }
    }
}

pub fn validate_create_student(payload: &CreateStudentRequest) -> Result<(), AppError> {
    validate_text("Name", &payload.name)?;
    validate_age(payload.age)
}

pub fn validate_update_student(payload: &UpdateStudentRequest) -> Result<(), AppError> {
    validate_text("Name", &payload.name)?;
    validate_age(payload.age)
}

impl From<student::Model> for StudentResponse {
    fn from(m: student::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            age: m.age,
            faculty_id: m.faculty_id,
        }
    }
}
