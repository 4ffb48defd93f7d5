use clap::Parser;

use services::{AppServices, Clock};

mod config;
mod desktop;
mod logging;
mod seed;

use config::{Cli, Command, prepare_sqlite_file};
use logging::{LogConfig, init_logging};
use seed::{SeedOutcome, seed_demo_quiz};

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.into_config()?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&config.db_url)?;
    let services = AppServices::new_sqlite(
        &config.db_url,
        Clock::default_clock(),
        config.file_id.clone(),
        config.shuffle_questions,
    )
    .await?;
    tracing::info!(db = %config.db_url, file_id = %config.file_id, "storage ready");

    match config.command {
        Command::Ui => {
            desktop::launch(services);
            Ok(())
        }
        Command::Seed => {
            match seed_demo_quiz(&services.catalog(), services.file_id()).await? {
                SeedOutcome::Created(quiz_id) => {
                    tracing::info!(quiz_id = %quiz_id, "demo quiz created");
                }
                SeedOutcome::AlreadyPresent => {
                    tracing::info!(file_id = %config.file_id, "file already has quizzes; nothing seeded");
                }
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    if let Err(err) = init_logging(&LogConfig::from_verbosity(cli.verbose)) {
        eprintln!("logging disabled: {err}");
    }

    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "learnlab exited with an error");
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
