//! Teacher and student seeding.
//!
//! Both tables have the same columns, so one generator and one batch
//! insert serve both; [`PersonTable`] picks the target.

use classroom_models::{Email, StudentId, TeacherId};
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::PersonSeed;

/// 3 params per row
const BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonTable {
    Teachers,
    Students,
}

impl PersonTable {
    fn table(self) -> &'static str {
        match self {
            Self::Teachers => "teachers",
            Self::Students => "students",
        }
    }

    fn role(self) -> &'static str {
        match self {
            Self::Teachers => "teacher",
            Self::Students => "student",
        }
    }
}

/// Generates people in parallel. `run` keeps emails unique across seeding
/// runs.
pub fn generate_people(table: PersonTable, count: usize, run: u32) -> Vec<PersonSeed> {
    (0..count)
        .into_par_iter()
        .filter_map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            let email = format!(
                "{}.{}+{}{}-{}@example.com",
                email_safe(&first_name),
                email_safe(&last_name),
                table.role(),
                run,
                idx
            );

            Email::parse(&email).ok().map(|email| PersonSeed {
                first_name,
                last_name,
                email,
            })
        })
        .collect()
}

fn email_safe(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}

pub async fn seed_teachers(
    db: &PgPool,
    count: usize,
    run: u32,
) -> Result<Vec<TeacherId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧑‍🏫 Seeding {} teachers...", count);

    let teachers = generate_people(PersonTable::Teachers, count, run);
    let ids = insert_people_batch(db, PersonTable::Teachers, &teachers).await?;
    let ids: Vec<TeacherId> = ids.into_iter().map(TeacherId::from).collect();

    println!(
        "   ✓ Inserted {} teachers in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn seed_students(
    db: &PgPool,
    count: usize,
    run: u32,
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} students...", count);

    let students = generate_people(PersonTable::Students, count, run);
    let ids = insert_people_batch(db, PersonTable::Students, &students).await?;
    let ids: Vec<StudentId> = ids.into_iter().map(StudentId::from).collect();

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts people in one transaction using multi-value INSERT statements.
/// Rows whose email is already stored are skipped.
pub async fn insert_people_batch(
    db: &PgPool,
    table: PersonTable,
    people: &[PersonSeed],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    let mut all_ids = Vec::with_capacity(people.len());
    for chunk in people.chunks(BATCH_SIZE) {
        all_ids.extend(insert_people_chunk(&mut tx, table, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_people_chunk(
    tx: &mut Transaction<'_, Postgres>,
    table: PersonTable,
    people: &[PersonSeed],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    if people.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = format!(
        "INSERT INTO {} (first_name, last_name, email) VALUES ",
        table.table()
    );

    for i in 0..people.len() {
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

    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    for person in people {
        q = q
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(&person.email);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn clear_people(
    db: &PgPool,
    table: PersonTable,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing {}...", table.table());

    let result = sqlx::query(&format!("DELETE FROM {}", table.table()))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} {} in {:?}",
        result,
        table.table(),
        start_time.elapsed()
    );

    Ok(result)
}
