//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `todo_insert` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use todo_insert::initialization::init_logger_with;
use todo_insert::{
    init_db_pool_with_config, run_migrations, InsertRow, KeyHolder, Opt, OutputFormat,
    TodoInserter,
};

/// What the insert produced, ready for printing.
enum Outcome {
    Rows(u64),
    Keys(KeyHolder),
}

async fn run(opt: &Opt) -> Result<Outcome> {
    let config = opt.database_config();
    let pool = init_db_pool_with_config(&config)
        .await
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let inserter = TodoInserter::new(&pool)
        .await
        .context("Failed to prepare todo insert")?;

    let row = InsertRow::new()
        .with("c_title", opt.title.as_str())
        .with("c_details", opt.details.clone());

    let outcome = if opt.return_keys {
        Outcome::Keys(
            inserter
                .execute_and_return_key_holder(&row)
                .await
                .context("Failed to insert todo")?,
        )
    } else {
        Outcome::Rows(inserter.execute(&row).await.context("Failed to insert todo")?)
    };

    pool.close().await;
    Ok(outcome)
}

fn render(outcome: &Outcome, format: &OutputFormat) -> Result<String> {
    Ok(match (outcome, format) {
        (Outcome::Rows(count), OutputFormat::Plain) => format!("affected_rows={count}"),
        (Outcome::Rows(count), OutputFormat::Json) => {
            serde_json::json!({ "affected_rows": count }).to_string()
        }
        (Outcome::Keys(keys), OutputFormat::Plain) => keys
            .keys()
            .iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        (Outcome::Keys(keys), OutputFormat::Json) => {
            serde_json::to_string(keys).context("Failed to serialize generated keys")?
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), e.g. TODO_DB_PATH
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(&opt).await.and_then(|outcome| render(&outcome, &opt.output)) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("todo_insert error: {:#}", e);
            process::exit(1);
        }
    }
}
