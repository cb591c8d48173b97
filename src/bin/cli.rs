use anyhow::Result;
use clap::{Parser, Subcommand};
use faculty_finder::{
    api::{DirectoryApi, HttpDirectoryClient, SearchTarget},
    models::{
        faculty::FacultyId,
        update::{AdminCredentials, UpdateMessage},
    },
    telemetry, view, AppConfig,
};
use std::process::exit;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[arg(short, long)]
    config: Option<String>,

    /// Log at info level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the whole faculty roster
    List,
    /// Search faculty by name
    SearchName { query: String },
    /// Search faculty by research interest
    SearchInterest { query: String },
    /// Show one faculty record
    Show { id: FacultyId },
    /// Run the administrative data refresh
    Update {
        #[arg(short, long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        exit(1);
    });

    telemetry::init_tracing(if cli.verbose { "info" } else { cfg.log_level.as_str() });
    let _guard = telemetry::init_sentry(&cfg);

    let client = HttpDirectoryClient::new(&cfg)?;

    match &cli.command {
        Commands::List => {
            let roster = client.list_all().await?;
            print!("{}", view::render_results(&roster));
        }
        Commands::SearchName { query } => {
            let results = client.search(&SearchTarget::Name(query.clone())).await?;
            print!("{}", view::render_results(&results));
        }
        Commands::SearchInterest { query } => {
            let results = client
                .search(&SearchTarget::Interest(query.clone()))
                .await?;
            print!("{}", view::render_results(&results));
        }
        Commands::Show { id } => match client.faculty_detail(*id).await {
            Ok(detail) => print!("{}", view::render_detail(&detail)),
            Err(e) => {
                eprintln!("error: {}", e);
                exit(1);
            }
        },
        Commands::Update { user } => {
            let password = rpassword::prompt_password("Password: ")
                .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
            let credentials = AdminCredentials::new(user.clone(), password);
            if !credentials.is_complete() {
                eprintln!("Username and password are required");
                exit(1);
            }

            println!("Updating...");
            match client.run_update(&credentials).await {
                Ok(receipt) => {
                    println!("✅ Success: {} records updated", receipt.record_count);
                    let roster = client.list_after_update().await?;
                    println!("Directory now lists {} faculty", roster.len());
                }
                Err(e) => {
                    println!("❌ {}", UpdateMessage::from_error(&e));
                    exit(1);
                }
            }
        }
    }

    Ok(())
}
