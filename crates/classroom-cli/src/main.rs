use classroom_cli::seeder::{self, SeedConfig};
use classroom_config::DatabaseConfig;
use classroom_db::{PgPool, init_db_pool};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "classroom-cli")]
#[command(about = "Classroom CLI - Seed and clear Classroom API data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the database with fake teachers, students and classes
    Seed {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "10")]
        teachers: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "100")]
        students: usize,

        /// Number of classes to create
        #[arg(short = 'c', long, default_value = "8")]
        classes: usize,

        /// Number of students enrolled in each class
        #[arg(long, default_value = "12")]
        students_per_class: usize,
    },
    /// Seed only teachers
    SeedTeachers {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "10")]
        teachers: usize,
    },
    /// Seed only students
    SeedStudents {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "100")]
        students: usize,
    },
    /// Delete every class, enrolment, student and teacher
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Seed {
            teachers,
            students,
            classes,
            students_per_class,
        } => {
            let config =
                SeedConfig::new(teachers, students).with_classes(classes, students_per_class);
            handle_seed(&pool, config).await
        }
        Commands::SeedTeachers { teachers } => handle_seed_teachers(&pool, teachers).await,
        Commands::SeedStudents { students } => handle_seed_students(&pool, students).await,
        Commands::Clear { yes } => handle_clear(&pool, yes).await,
    }
}

async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    Ok(init_db_pool(&config).await?)
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_seed_teachers(pool: &PgPool, count: usize) {
    match seeder::seed_teachers_only(pool, count).await {
        Ok(ids) => println!("✅ Created {} teachers", ids.len()),
        Err(e) => {
            eprintln!("\n❌ Error seeding teachers: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_students(pool: &PgPool, count: usize) {
    match seeder::seed_students_only(pool, count).await {
        Ok(ids) => println!("✅ Created {} students", ids.len()),
        Err(e) => {
            eprintln!("\n❌ Error seeding students: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear(pool: &PgPool, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete ALL teachers, students and classes?")
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmed {
            println!("Aborted");
            return;
        }
    }

    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing data: {}", e);
        std::process::exit(1);
    }
}
