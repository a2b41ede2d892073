mod importer;
mod themes;

use clap::Parser;
use importer::import_themes;
use sqlx::SqlitePool;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seed", about = "Seed the theme catalog from JSON theme files")]
struct Args {
    /// Theme JSON file, or a directory of them
    #[arg(short, long)]
    themes: PathBuf,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Clear the whole catalog before import
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Connecting to database...");
    let pool = SqlitePool::connect(&args.database_url).await?;

    // Run migrations to ensure schema exists
    sqlx::migrate!("../../backend/migrations").run(&pool).await?;

    if args.clear {
        println!("Clearing existing themes...");
        sqlx::query("DELETE FROM theme_words").execute(&pool).await?;
        sqlx::query("DELETE FROM theme_teams").execute(&pool).await?;
        sqlx::query("DELETE FROM themes").execute(&pool).await?;
    }

    println!("Parsing themes: {:?}", args.themes);
    let themes = themes::parse_themes(&args.themes)?;
    println!("Found {} themes", themes.len());

    println!("Importing themes...");
    let stats = import_themes(&pool, themes).await?;

    println!();
    println!("Import complete:");
    println!("  Themes imported:          {}", stats.themes);
    println!("  Words inserted:           {}", stats.words);
    println!("  Words skipped (blank/dup): {}", stats.skipped_words);
    println!("  Themes skipped (empty):   {}", stats.skipped_themes);

    Ok(())
}
