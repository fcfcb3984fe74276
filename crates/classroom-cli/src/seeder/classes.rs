//! Class seeding and enrolment.

use classroom_models::{ClassId, ClassName, StudentId, TeacherId};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::ClassSeed;

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Literature",
    "Music",
    "Art",
    "Computer Science",
];

/// 3 params per row
const CLASS_BATCH_SIZE: usize = 1000;
/// 2 params per row
const ENROLMENT_BATCH_SIZE: usize = 2000;

/// Generates classes, each taught by a random teacher when any exist.
/// Names are uppercase and carry `run` to stay unique across seeding runs.
pub fn generate_classes(count: usize, teacher_ids: &[TeacherId], run: u32) -> Vec<ClassSeed> {
    (0..count)
        .into_par_iter()
        .filter_map(|idx| {
            let subject = SUBJECTS[idx % SUBJECTS.len()];
            let name = ClassName::parse(&format!("{subject} {run}-{idx}")).ok()?;
            let description: String = Sentence(3..8).fake();
            let teacher_id = teacher_ids.choose(&mut rand::thread_rng()).copied();

            Some(ClassSeed {
                name,
                description,
                teacher_id,
            })
        })
        .collect()
}

/// Picks `per_class` distinct students for every class.
pub fn generate_enrolments(
    class_ids: &[ClassId],
    student_ids: &[StudentId],
    per_class: usize,
) -> Vec<(ClassId, StudentId)> {
    class_ids
        .par_iter()
        .flat_map(|&class_id| {
            student_ids
                .choose_multiple(&mut rand::thread_rng(), per_class)
                .map(|&student_id| (class_id, student_id))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_classes(
    db: &PgPool,
    count: usize,
    teacher_ids: &[TeacherId],
    run: u32,
) -> Result<Vec<ClassId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} classes...", count);

    let classes = generate_classes(count, teacher_ids, run);
    let class_ids = insert_classes_batch(db, &classes).await?;

    println!(
        "   ✓ Inserted {} classes in {:?}",
        class_ids.len(),
        start_time.elapsed()
    );

    Ok(class_ids)
}

pub async fn seed_enrolments(
    db: &PgPool,
    class_ids: &[ClassId],
    student_ids: &[StudentId],
    per_class: usize,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📝 Enrolling up to {} students per class...", per_class);

    let enrolments = generate_enrolments(class_ids, student_ids, per_class);

    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for chunk in enrolments.chunks(ENROLMENT_BATCH_SIZE) {
        inserted += insert_enrolments_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} enrolments in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

pub async fn insert_classes_batch(
    db: &PgPool,
    classes: &[ClassSeed],
) -> Result<Vec<ClassId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    let mut all_ids = Vec::with_capacity(classes.len());
    for chunk in classes.chunks(CLASS_BATCH_SIZE) {
        all_ids.extend(insert_classes_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_classes_chunk(
    tx: &mut Transaction<'_, Postgres>,
    classes: &[ClassSeed],
) -> Result<Vec<ClassId>, Box<dyn std::error::Error>> {
    if classes.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO classes (name, description, teacher_id) VALUES ");

    for i in 0..classes.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 3;
        query.push_str(&format!(
            "(${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3
        ));
    }

    query.push_str(" ON CONFLICT (name) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, ClassId>(&query);
    for class in classes {
        q = q
            .bind(&class.name)
            .bind(&class.description)
            .bind(class.teacher_id);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_enrolments_chunk(
    tx: &mut Transaction<'_, Postgres>,
    enrolments: &[(ClassId, StudentId)],
) -> Result<u64, Box<dyn std::error::Error>> {
    if enrolments.is_empty() {
        return Ok(0);
    }

    let mut query = String::from("INSERT INTO class_students (class_id, student_id) VALUES ");

    for i in 0..enrolments.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 2;
        query.push_str(&format!("(${}, ${})", param_idx + 1, param_idx + 2));
    }

    let mut q = sqlx::query(&query);
    for (class_id, student_id) in enrolments {
        q = q.bind(class_id).bind(student_id);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

/// Deletes every class; enrolments go with them.
pub async fn clear_classes(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing classes...");

    let result = sqlx::query("DELETE FROM classes")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} classes in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
