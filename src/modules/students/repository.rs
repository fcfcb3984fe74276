use sqlx::PgPool;

use classroom_core::PageOptions;
use classroom_models::ids::StudentId;
use classroom_models::value_types::{Email, ValueTypeError};

use crate::modules::students::model::{CreateStudentDto, NewStudent, Student, StudentChanges};

pub(crate) const STUDENT_COLUMNS: &str =
    "id, first_name, last_name, email, is_active, version, created_at, updated_at";

pub struct StudentRepository;

impl StudentRepository {
    /// One page ordered by id, plus the total row count.
    pub async fn find_page(
        db: &PgPool,
        options: &PageOptions,
    ) -> Result<(Vec<Student>, i64), sqlx::Error> {
        let item_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(db)
            .await?;

        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id {} LIMIT $1 OFFSET $2",
            options.order().as_sql()
        );
        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(options.take())
            .bind(options.skip())
            .fetch_all(db)
            .await?;

        Ok((students, item_count))
    }

    pub async fn find_by_id(db: &PgPool, id: StudentId) -> Result<Option<Student>, sqlx::Error> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Builds the row to insert. Nothing is persisted until [`Self::save`].
    pub fn create(dto: CreateStudentDto) -> Result<NewStudent, ValueTypeError> {
        NewStudent::try_from(dto)
    }

    pub async fn save(db: &PgPool, student: &NewStudent) -> Result<Student, sqlx::Error> {
        let sql = format!(
            "INSERT INTO students (first_name, last_name, email, is_active)
             VALUES ($1, $2, $3, $4)
             RETURNING {STUDENT_COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&sql)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(&student.email)
            .bind(student.is_active)
            .fetch_one(db)
            .await
    }

    /// Locks the row, merges `changes` and bumps `version` in one
    /// transaction. `None` when no student has this id.
    pub async fn update(
        db: &PgPool,
        id: StudentId,
        changes: &StudentChanges,
    ) -> Result<Option<Student>, sqlx::Error> {
        let mut tx = db.begin().await?;

        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let sql = format!(
            "UPDATE students
             SET first_name = $2, last_name = $3, email = $4, is_active = $5,
                 version = version + 1, updated_at = NOW()
             WHERE id = $1
             RETURNING {STUDENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Student>(&sql)
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

    /// Hard delete; enrolments go with it (`ON DELETE CASCADE`). `false`
    /// when nothing matched.
    pub async fn remove(db: &PgPool, id: StudentId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive email lookup, optionally ignoring one student.
    pub async fn exists_by_email(
        db: &PgPool,
        email: &Email,
        exclude_id: Option<StudentId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM students
                WHERE LOWER(email) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
            )"#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(db)
        .await
    }
}
