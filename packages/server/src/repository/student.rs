use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entity::student;

pub struct StudentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StudentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        name: String,
        age: i32,
        faculty_id: Option<i32>,
    ) -> Result<student::Model, DbErr> {
        student::ActiveModel {
            name: Set(name),
            age: Set(age),
            faculty_id: Set(faculty_id),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .order_by_asc(student::Column::Id)
            .all(self.db)
            .await
    }

    /// Overwrites name and age; the faculty link is left untouched.
    pub async fn update_name_and_age(
        &self,
        existing: student::Model,
        name: String,
        age: i32,
    ) -> Result<student::Model, DbErr> {
        let mut active: student::ActiveModel = existing.into();
        active.name = Set(name);
        active.age = Set(age);
        active.update(self.db).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbErr> {
        let res = student::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(res.rows_affected)
    }

    pub async fn find_by_age(&self, age: i32) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .filter(student::Column::Age.eq(age))
            .order_by_asc(student::Column::Id)
            .all(self.db)
            .await
    }

    /// Students with `min <= age <= max`.
    pub async fn find_by_age_between(
        &self,
        min: i32,
        max: i32,
    ) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .filter(student::Column::Age.between(min, max))
            .order_by_asc(student::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_by_faculty(&self, faculty_id: i32) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .filter(student::Column::FacultyId.eq(faculty_id))
            .order_by_asc(student::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        student::Entity::find().count(self.db).await
    }

    /// `AVG(age)` computed by the database; `None` when the table is empty.
    pub async fn average_age(&self) -> Result<Option<f64>, DbErr> {
        // Postgres averages integers as NUMERIC, so cast to get a float back.
        let avg = student::Entity::find()
            .select_only()
            .column_as(
                Expr::cust("AVG(CAST(\"age\" AS DOUBLE PRECISION))"),
                "average_age",
            )
            .into_tuple::<Option<f64>>()
            .one(self.db)
            .await?;
        Ok(avg.flatten())
    }

    /// The `limit` students with the highest ids, newest first.
    pub async fn find_latest(&self, limit: u64) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .order_by_desc(student::Column::Id)
            .limit(Some(limit))
            .all(self.db)
            .await
    }

    pub async fn find_all_names(&self) -> Result<Vec<String>, DbErr> {
        student::Entity::find()
            .select_only()
            .column(student::Column::Name)
            .order_by_asc(student::Column::Id)
            .into_tuple::<String>()
            .all(self.db)
            .await
    }

    /// Clears the faculty link of every student in `faculty_id`.
    pub async fn detach_from_faculty(&self, faculty_id: i32) -> Result<u64, DbErr> {
        let res = student::Entity::update_many()
            .col_expr(student::Column::FacultyId, Expr::value(Option::<i32>::None))
            .filter(student::Column::FacultyId.eq(faculty_id))
            .exec(self.db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn find_names_by_ids(&self, ids: Vec<i32>) -> Result<Vec<(i32, String)>, DbErr> {
        student::Entity::find()
            .select_only()
            .column(student::Column::Id)
            .column(student::Column::Name)
            .filter(student::Column::Id.is_in(ids))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await
    }
}
