use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;

use crate::entity::faculty;
use crate::error::AppError;
use crate::models::faculty::FacultyRequest;
use crate::repository::{FacultyRepository, StudentRepository};

pub struct FacultyService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FacultyService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, payload: FacultyRequest) -> Result<faculty::Model, AppError> {
        let model = FacultyRepository::new(self.db)
            .insert(
                payload.name.trim().to_string(),
                payload.color.trim().to_string(),
            )
            .await?;
        info!(faculty_id = model.id, "Faculty created");
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        payload: FacultyRequest,
    ) -> Result<faculty::Model, AppError> {
        let repo = FacultyRepository::new(self.db);
        let existing = find_faculty(&repo, id).await?;
        Ok(repo
            .update_name_and_color(
                existing,
                payload.name.trim().to_string(),
                payload.color.trim().to_string(),
            )
            .await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<faculty::Model, AppError> {
        find_faculty(&FacultyRepository::new(self.db), id).await
    }

    pub async fn list_all(&self) -> Result<Vec<faculty::Model>, AppError> {
        Ok(FacultyRepository::new(self.db).find_all().await?)
    }

    /// Deletes the faculty. Its students stay, with their faculty link cleared.
    pub async fn delete(&self, id: i32) -> Result<faculty::Model, AppError> {
        let txn = self.db.begin().await?;

        let faculties = FacultyRepository::new(&txn);
        let existing = find_faculty(&faculties, id).await?;
        let detached = StudentRepository::new(&txn)
            .detach_from_faculty(id)
            .await?;
        faculties.delete_by_id(id).await?;

        txn.commit().await?;
        info!(faculty_id = id, detached, "Faculty deleted");
        Ok(existing)
    }

    pub async fn find_by_color(&self, color: &str) -> Result<Vec<faculty::Model>, AppError> {
        Ok(FacultyRepository::new(self.db).find_by_color(color).await?)
    }

    /// Case-insensitive substring match of one value against color or name.
    pub async fn find_by_color_or_name(
        &self,
        color_or_name: &str,
    ) -> Result<Vec<faculty::Model>, AppError> {
        Ok(FacultyRepository::new(self.db)
            .find_by_color_or_name_containing(color_or_name)
            .await?)
    }

    pub async fn find_by_student(&self, student_id: i32) -> Result<faculty::Model, AppError> {
        let student = StudentRepository::new(self.db)
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
        let faculty_id = student
            .faculty_id
            .ok_or_else(|| AppError::NotFound("Student has no faculty".into()))?;
        find_faculty(&FacultyRepository::new(self.db), faculty_id).await
    }

    /// Name with the most characters. Ties go to whichever comes first in id order.
    pub async fn longest_name(&self) -> Result<String, AppError> {
        let names = FacultyRepository::new(self.db).find_all_names().await?;
        longest(names).ok_or_else(|| AppError::NotFound("No faculties".into()))
    }
}

async fn find_faculty<C: sea_orm::ConnectionTrait>(
    repo: &FacultyRepository<'_, C>,
    id: i32,
) -> Result<faculty::Model, AppError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Faculty not found".into()))
}

fn longest(names: Vec<String>) -> Option<String> {
    names.into_iter().fold(None, |best, name| match best {
        Some(b) if b.chars().count() >= name.chars().count() => Some(b),
        _ => Some(name),
    })
}
