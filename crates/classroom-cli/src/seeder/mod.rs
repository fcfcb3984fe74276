//! Fake data seeding for teachers, students and classes.

pub mod classes;
pub mod models;
pub mod people;

use sqlx::PgPool;
use std::time::Instant;

use classroom_models::{StudentId, TeacherId};

pub use models::SeedConfig;
pub use people::PersonTable;

/// Identifies one seeding run so generated emails and class names do not
/// collide with rows from earlier runs.
fn run_id() -> u32 {
    rand::random::<u32>() % 1_000_000
}

/// Seeds teachers, students, classes and enrolments.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let run = run_id();

    println!("🌱 Seeding database...\n");

    let teacher_ids = people::seed_teachers(db, config.teachers, run).await?;
    let student_ids = people::seed_students(db, config.students, run).await?;
    let class_ids = classes::seed_classes(db, config.classes, &teacher_ids, run).await?;
    classes::seed_enrolments(db, &class_ids, &student_ids, config.students_per_class).await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());

    Ok(())
}

pub async fn seed_teachers_only(
    db: &PgPool,
    count: usize,
) -> Result<Vec<TeacherId>, Box<dyn std::error::Error>> {
    people::seed_teachers(db, count, run_id()).await
}

pub async fn seed_students_only(
    db: &PgPool,
    count: usize,
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    people::seed_students(db, count, run_id()).await
}

/// Deletes every class, enrolment, student and teacher. Classes go first
/// because they reference teachers.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    classes::clear_classes(db).await?;
    people::clear_people(db, PersonTable::Students).await?;
    people::clear_people(db, PersonTable::Teachers).await?;

    println!("\n✅ Cleared all data in {:?}", start_time.elapsed());

    Ok(())
}
