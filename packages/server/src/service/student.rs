use common::storage::FileStore;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, warn};

use crate::entity::student;
use crate::error::AppError;
use crate::models::student::{CreateStudentRequest, UpdateStudentRequest};
use crate::repository::{AvatarRepository, FacultyRepository, StudentRepository};
use crate::utils::filename::stored_file_name;

/// Number of students returned by [`StudentService::last_five`].
pub const LAST_STUDENTS_LIMIT: u64 = 5;

pub struct StudentService<'a> {
    db: &'a DatabaseConnection,
    avatar_store: &'a dyn FileStore,
}

impl<'a> StudentService<'a> {
    pub fn new(db: &'a DatabaseConnection, avatar_store: &'a dyn FileStore) -> Self {
        Self { db, avatar_store }
    }

    pub async fn create(&self, payload: CreateStudentRequest) -> Result<student::Model, AppError> {
        if let Some(faculty_id) = payload.faculty_id {
            find_faculty_exists(self.db, faculty_id).await?;
        }

        let model = StudentRepository::new(self.db)
            .insert(payload.name.trim().to_string(), payload.age, payload.faculty_id)
            .await?;
        info!(student_id = model.id, "Student created");
        Ok(model)
    }

    /// Replaces name and age. Id and faculty cannot change here.
    pub async fn update(
        &self,
        id: i32,
        payload: UpdateStudentRequest,
    ) -> Result<student::Model, AppError> {
        let repo = StudentRepository::new(self.db);
        let existing = find_student(&repo, id).await?;
        Ok(repo
            .update_name_and_age(existing, payload.name.trim().to_string(), payload.age)
            .await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<student::Model, AppError> {
        find_student(&StudentRepository::new(self.db), id).await
    }

    pub async fn list_all(&self) -> Result<Vec<student::Model>, AppError> {
        Ok(StudentRepository::new(self.db).find_all().await?)
    }

    /// Deletes the student and its avatar rows in one transaction, then removes
    /// the avatar files. Returns the deleted student.
    pub async fn delete(&self, id: i32) -> Result<student::Model, AppError> {
        let txn = self.db.begin().await?;

        let students = StudentRepository::new(&txn);
        let avatars = AvatarRepository::new(&txn);

        let existing = find_student(&students, id).await?;
        let avatar_paths = avatars.find_paths_by_student(id).await?;
        avatars.delete_by_student(id).await?;
        students.delete_by_id(id).await?;

        txn.commit().await?;
        info!(student_id = id, avatars = avatar_paths.len(), "Student deleted");

        for path in avatar_paths {
            let Some(name) = stored_file_name(&path) else {
                continue;
            };
            if let Err(e) = self.avatar_store.delete(name).await {
                warn!(student_id = id, path = %path, "Failed to remove avatar file: {e}");
            }
        }

        Ok(existing)
    }

    pub async fn find_by_age(&self, age: i32) -> Result<Vec<student::Model>, AppError> {
        Ok(StudentRepository::new(self.db).find_by_age(age).await?)
    }

    /// Inclusive on both ends; `min > max` matches nothing.
    pub async fn find_by_age_between(
        &self,
        min: i32,
        max: i32,
    ) -> Result<Vec<student::Model>, AppError> {
        Ok(StudentRepository::new(self.db)
            .find_by_age_between(min, max)
            .await?)
    }

    pub async fn find_by_faculty(&self, faculty_id: i32) -> Result<Vec<student::Model>, AppError> {
        find_faculty_exists(self.db, faculty_id).await?;
        Ok(StudentRepository::new(self.db)
            .find_by_faculty(faculty_id)
            .await?)
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        Ok(StudentRepository::new(self.db).count().await?)
    }

    /// Average age as computed by the database.
    pub async fn average_age(&self) -> Result<f64, AppError> {
        StudentRepository::new(self.db)
            .average_age()
            .await?
            .ok_or_else(no_students)
    }

    /// Average age computed over all loaded rows. Agrees with [`Self::average_age`].
    pub async fn average_age_computed(&self) -> Result<f64, AppError> {
        let ages: Vec<i32> = StudentRepository::new(self.db)
            .find_all()
            .await?
            .into_iter()
            .map(|s| s.age)
            .collect();
        mean_age(&ages).ok_or_else(no_students)
    }

    /// The most recently created students, newest first.
    pub async fn last_five(&self) -> Result<Vec<student::Model>, AppError> {
        Ok(StudentRepository::new(self.db)
            .find_latest(LAST_STUDENTS_LIMIT)
            .await?)
    }

    pub async fn names_starting_with(&self, letter: char) -> Result<Vec<String>, AppError> {
        let names = StudentRepository::new(self.db).find_all_names().await?;
        Ok(filter_names_starting_with(names, letter))
    }
}

async fn find_student<C: sea_orm::ConnectionTrait>(
    repo: &StudentRepository<'_, C>,
    id: i32,
) -> Result<student::Model, AppError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".into()))
}

async fn find_faculty_exists(db: &DatabaseConnection, faculty_id: i32) -> Result<(), AppError> {
    FacultyRepository::new(db)
        .find_by_id(faculty_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Faculty not found".into()))
}

fn no_students() -> AppError {
    AppError::NotFound("No students to average".into())
}

fn mean_age(ages: &[i32]) -> Option<f64> {
    if ages.is_empty() {
        return None;
    }
    let sum: i64 = ages.iter().copied().map(i64::from).sum();
    Some(sum as f64 / ages.len() as f64)
}

fn filter_names_starting_with(names: Vec<String>, letter: char) -> Vec<String> {
    let letter = letter.to_ascii_lowercase();
    names
        .into_iter()
        .filter(|name| {
            name.chars()
                .next()
                .is_some_and(|first| first.to_ascii_lowercase() == letter)
        })
        .collect()
}
