use sqlx::PgPool;

use classroom_core::PageOptions;
use classroom_models::ids::{ClassId, StudentId, TeacherId};
use classroom_models::students::Student;
use classroom_models::teachers::Teacher;
use classroom_models::value_types::{ClassName, ValueTypeError};

use crate::modules::classes::model::{Class, ClassChanges, ClassStudent, CreateClassDto, NewClass};
use crate::modules::teachers::repository::TEACHER_COLUMNS;

pub(crate) const CLASS_COLUMNS: &str =
    "id, name, description, teacher_id, is_active, version, created_at, updated_at";

pub struct ClassRepository;

impl ClassRepository {
    pub async fn find_page(
        db: &PgPool,
        options: &PageOptions,
    ) -> Result<(Vec<Class>, i64), sqlx::Error> {
        let item_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classes")
            .fetch_one(db)
            .await?;

        let sql = format!(
            "SELECT {CLASS_COLUMNS} FROM classes ORDER BY id {} LIMIT $1 OFFSET $2",
            options.order().as_sql()
        );
        let classes = sqlx::query_as::<_, Class>(&sql)
            .bind(options.take())
            .bind(options.skip())
            .fetch_all(db)
            .await?;

        Ok((classes, item_count))
    }

    pub async fn find_by_id(db: &PgPool, id: ClassId) -> Result<Option<Class>, sqlx::Error> {
        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1");
        sqlx::query_as::<_, Class>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub fn create(dto: CreateClassDto) -> Result<NewClass, ValueTypeError> {
        NewClass::try_from(dto)
    }

    pub async fn save(db: &PgPool, class: &NewClass) -> Result<Class, sqlx::Error> {
        let sql = format!(
            "INSERT INTO classes (name, description, is_active)
             VALUES ($1, $2, $3)
             RETURNING {CLASS_COLUMNS}"
        );
        sqlx::query_as::<_, Class>(&sql)
            .bind(&class.name)
            .bind(&class.description)
            .bind(class.is_active)
            .fetch_one(db)
            .await
    }

    /// Locks the row, merges `changes` and bumps `version`. The assigned
    /// teacher is left untouched.
    pub async fn update(
        db: &PgPool,
        id: ClassId,
        changes: &ClassChanges,
    ) -> Result<Option<Class>, sqlx::Error> {
        let mut tx = db.begin().await?;

        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Class>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let sql = format!(
            "UPDATE classes
             SET name = $2, description = $3, is_active = $4,
                 version = version + 1, updated_at = NOW()
             WHERE id = $1
             RETURNING {CLASS_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Class>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.is_active.unwrap_or(current.is_active))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    /// Hard delete; enrolments are removed by cascade.
    pub async fn remove(db: &PgPool, id: ClassId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn exists_by_name(
        db: &PgPool,
        name: &ClassName,
        exclude_id: Option<ClassId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM classes
                WHERE UPPER(name) = UPPER($1) AND ($2::BIGINT IS NULL OR id <> $2)
            )"#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(db)
        .await
    }

    /// The class with its teacher, if one is assigned.
    pub async fn with_teacher(
        db: &PgPool,
        id: ClassId,
    ) -> Result<Option<(Class, Option<Teacher>)>, sqlx::Error> {
        let Some(class) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };

        let teacher = match class.teacher_id {
            Some(teacher_id) => {
                let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1");
                sqlx::query_as::<_, Teacher>(&sql)
                    .bind(teacher_id)
                    .fetch_optional(db)
                    .await?
            }
            None => None,
        };

        Ok(Some((class, teacher)))
    }

    /// The class with one entry per enrolment row, in enrolment order. A
    /// student enrolled twice appears twice.
    pub async fn with_students(
        db: &PgPool,
        id: ClassId,
    ) -> Result<Option<(Class, Vec<Student>)>, sqlx::Error> {
        let Some(class) = Self::find_by_id(db, id).await? else {
            return Ok(None);
        };

        let students = sqlx::query_as::<_, Student>(
            r#"SELECT s.id, s.first_name, s.last_name, s.email, s.is_active, s.version,
                      s.created_at, s.updated_at
               FROM class_students cs
               JOIN students s ON s.id = cs.student_id
               WHERE cs.class_id = $1
               ORDER BY cs.id"#,
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(Some((class, students)))
    }

    /// Replaces the class's teacher and bumps `version`.
    pub async fn set_teacher(
        db: &PgPool,
        id: ClassId,
        teacher_id: TeacherId,
    ) -> Result<Option<Class>, sqlx::Error> {
        let sql = format!(
            "UPDATE classes
             SET teacher_id = $2, version = version + 1, updated_at = NOW()
             WHERE id = $1
             RETURNING {CLASS_COLUMNS}"
        );
        sqlx::query_as::<_, Class>(&sql)
            .bind(id)
            .bind(teacher_id)
            .fetch_optional(db)
            .await
    }

    /// Appends one enrolment row. Not idempotent.
    pub async fn add_student(
        db: &PgPool,
        id: ClassId,
        student_id: StudentId,
    ) -> Result<ClassStudent, sqlx::Error> {
        sqlx::query_as::<_, ClassStudent>(
            r#"INSERT INTO class_students (class_id, student_id)
               VALUES ($1, $2)
               RETURNING id, class_id, student_id, created_at"#,
        )
        .bind(id)
        .bind(student_id)
        .fetch_one(db)
        .await
    }
}
