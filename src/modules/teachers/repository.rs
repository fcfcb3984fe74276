use sqlx::PgPool;

use classroom_core::PageOptions;
use classroom_models::classes::Class;
use classroom_models::ids::TeacherId;
use classroom_models::value_types::{Email, ValueTypeError};

use crate::modules::classes::repository::CLASS_COLUMNS;
use crate::modules::teachers::model::{CreateTeacherDto, NewTeacher, Teacher, TeacherChanges};

pub(crate) const TEACHER_COLUMNS: &str =
    "id, first_name, last_name, email, is_active, version, created_at, updated_at";

pub struct TeacherRepository;

impl TeacherRepository {
    /// One page ordered by id, plus the total row count.
    pub async fn find_page(
        db: &PgPool,
        options: &PageOptions,
    ) -> Result<(Vec<Teacher>, i64), sqlx::Error> {
        let item_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers")
            .fetch_one(db)
            .await?;

        let sql = format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY id {} LIMIT $1 OFFSET $2",
            options.order().as_sql()
        );
        let teachers = sqlx::query_as::<_, Teacher>(&sql)
            .bind(options.take())
            .bind(options.skip())
            .fetch_all(db)
            .await?;

        Ok((teachers, item_count))
    }

    pub async fn find_by_id(db: &PgPool, id: TeacherId) -> Result<Option<Teacher>, sqlx::Error> {
        let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1");
        sqlx::query_as::<_, Teacher>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Builds the row to insert. Nothing is persisted until [`Self::save`].
    pub fn create(dto: CreateTeacherDto) -> Result<NewTeacher, ValueTypeError> {
        NewTeacher::try_from(dto)
    }

    pub async fn save(db: &PgPool, teacher: &NewTeacher) -> Result<Teacher, sqlx::Error> {
        let sql = format!(
            "INSERT INTO teachers (first_name, last_name, email, is_active)
             VALUES ($1, $2, $3, $4)
             RETURNING {TEACHER_COLUMNS}"
        );
        sqlx::query_as::<_, Teacher>(&sql)
            .bind(&teacher.first_name)
            .bind(&teacher.last_name)
            .bind(&teacher.email)
            .bind(teacher.is_active)
            .fetch_one(db)
            .await
    }

    /// Locks the row, merges `changes` and bumps `version` in one
    /// transaction. `None` when no teacher has this id.
    pub async fn update(
        db: &PgPool,
        id: TeacherId,
        changes: &TeacherChanges,
    ) -> Result<Option<Teacher>, sqlx::Error> {
        let mut tx = db.begin().await?;

        let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Teacher>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let sql = format!(
            "UPDATE teachers
             SET first_name = $2, last_name = $3, email = $4, is_active = $5,
                 version = version + 1, updated_at = NOW()
             WHERE id = $1
             RETURNING {TEACHER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Teacher>(&sql)
            .bind(id)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.email)
            .bind(changes.is_active.unwrap_or(current.is_active))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    /// Hard delete. `false` when nothing matched.
    pub async fn remove(db: &PgPool, id: TeacherId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive email lookup, optionally ignoring one teacher.
    pub async fn exists_by_email(
        db: &PgPool,
        email: &Email,
        exclude_id: Option<TeacherId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM teachers
                WHERE LOWER(email) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
            )"#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(db)
        .await
    }

    /// Classes this teacher is assigned to, by id.
    pub async fn find_classes(db: &PgPool, id: TeacherId) -> Result<Vec<Class>, sqlx::Error> {
        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes WHERE teacher_id = $1 ORDER BY id");
        sqlx::query_as::<_, Class>(&sql)
            .bind(id)
            .fetch_all(db)
            .await
    }
}
