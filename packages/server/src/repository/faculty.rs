use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entity::faculty;
use crate::models::shared::{LIKE_ESCAPE, escape_like};

pub struct FacultyRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FacultyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn insert(&self, name: String, color: String) -> Result<faculty::Model, DbErr> {
        faculty::ActiveModel {
            name: Set(name),
            color: Set(color),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<faculty::Model>, DbErr> {
        faculty::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<faculty::Model>, DbErr> {
        faculty::Entity::find()
            .order_by_asc(faculty::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn update_name_and_color(
        &self,
        existing: faculty::Model,
        name: String,
        color: String,
    ) -> Result<faculty::Model, DbErr> {
        let mut active: faculty::ActiveModel = existing.into();
        active.name = Set(name);
        active.color = Set(color);
        active.update(self.db).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbErr> {
        let res = faculty::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(res.rows_affected)
    }

    pub async fn find_by_color(&self, color: &str) -> Result<Vec<faculty::Model>, DbErr> {
        faculty::Entity::find()
            .filter(faculty::Column::Color.eq(color))
            .order_by_asc(faculty::Column::Id)
            .all(self.db)
            .await
    }

    /// Faculties whose color or name contains `term`, ignoring case.
    pub async fn find_by_color_or_name_containing(
        &self,
        term: &str,
    ) -> Result<Vec<faculty::Model>, DbErr> {
        let pattern = format!("%{}%", escape_like(term).to_lowercase());
        let contains = |column: faculty::Column| {
            Expr::expr(Func::lower(Expr::col(column)))
                .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE))
        };

        faculty::Entity::find()
            .filter(
                Condition::any()
                    .add(contains(faculty::Column::Color))
                    .add(contains(faculty::Column::Name)),
            )
            .order_by_asc(faculty::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_all_names(&self) -> Result<Vec<String>, DbErr> {
        faculty::Entity::find()
            .select_only()
            .column(faculty::Column::Name)
            .order_by_asc(faculty::Column::Id)
            .into_tuple::<String>()
            .all(self.db)
            .await
    }
}
