use clap::Parser;
use color_eyre::Result;
use tempo_tui::{Config, Database, Profile, cli::{Cli, Commands}};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Log lines go to stderr; RUST_LOG controls the filter
    env_logger::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // Initialize database
    let db_path = config.get_database_path();
    let db = Database::new(
        db_path.to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?
    )?;

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let data_dir = tempo_tui::utils::get_data_dir(profile)
                .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine data directory"))?;
            let app = tempo_tui::tui::App::new(config, db, data_dir)?;
            tempo_tui::tui::run_event_loop(app)?;
        }
        Commands::AddTask { title, due, status } => {
            tempo_tui::cli::handle_add_task(title, due, status, &db)?;
        }
        Commands::AddEvent { title, date, category } => {
            tempo_tui::cli::handle_add_event(title, date, category, &db)?;
        }
        Commands::AddJournal { title, content, mood } => {
            tempo_tui::cli::handle_add_journal(title, content, mood, &db)?;
        }
        Commands::Summary => {
            tempo_tui::cli::handle_summary(&db)?;
        }
        Commands::Export => {
            tempo_tui::cli::handle_export(&db)?;
        }
    }

    Ok(())
}
