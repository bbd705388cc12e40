use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use gradebook_cli::report;
use gradebook_cli::seeder::{self, SeedConfig};
use gradebook_config::DatabaseConfig;
use gradebook_models::CursoId;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "gradebook-cli")]
#[command(about = "Gradebook CLI - Administrative tools for Gradebook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Seed the database with fake courses, units, grades and students
    Seed {
        /// Number of courses to create
        #[arg(short = 'c', long, default_value = "6")]
        cursos: usize,

        /// Number of teaching units per course
        #[arg(short = 'n', long, default_value = "4")]
        nucleos: usize,

        /// Number of grades per teaching unit
        #[arg(long, default_value = "5")]
        notas: usize,

        /// Number of students to create
        #[arg(short = 'a', long, default_value = "60")]
        alumnos: usize,

        /// Maximum number of courses each student is enrolled in
        #[arg(long, default_value = "3")]
        cursos_por_alumno: usize,
    },
    /// Delete all students, courses, units and grades
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Print each teaching unit's average for a course
    Report {
        /// Course id
        curso_id: i64,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let config = DatabaseConfig::from_env();
    let pool = match gradebook_db::connect(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::Seed {
            cursos,
            nucleos,
            notas,
            alumnos,
            cursos_por_alumno,
        } => {
            let config = SeedConfig {
                num_cursos: cursos,
                nucleos_per_curso: nucleos,
                notas_per_nucleo: notas,
                num_alumnos: alumnos,
                cursos_per_alumno: cursos_por_alumno,
            };
            handle_seed(&pool, config).await
        }
        Commands::Clear { yes } => handle_clear(&pool, yes).await,
        Commands::Report { curso_id } => handle_report(&pool, CursoId::new(curso_id)).await,
    }
}

async fn handle_migrate(pool: &PgPool) {
    match gradebook_db::run_migrations(pool).await {
        Ok(_) => {
            println!("✅ Migrations applied");
        }
        Err(e) => {
            eprintln!("\n❌ Error running migrations: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    match seeder::seed_all(pool, config).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear(pool: &PgPool, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("This deletes every student, course, unit and grade. Continue?")
            .default(false)
            .interact();

        match confirmed {
            Ok(true) => {}
            Ok(false) => {
                println!("Aborted");
                return;
            }
            Err(e) => {
                eprintln!("\n❌ Error reading confirmation: {}", e);
                std::process::exit(1);
            }
        }
    }

    match seeder::clear_all(pool).await {
        Ok(_) => {
            println!("✅ Cleared gradebook data");
        }
        Err(e) => {
            eprintln!("\n❌ Error clearing data: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_report(pool: &PgPool, curso_id: CursoId) {
    match report::build_report(pool, curso_id).await {
        Ok(Some(report)) => {
            print!("{}", report);
        }
        Ok(None) => {
            eprintln!("❌ Course {} not found", curso_id);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\n❌ Error building report: {}", e);
            std::process::exit(1);
        }
    }
}
