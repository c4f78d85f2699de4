use clap::{Parser, Subcommand};
use data_management::DataManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "TrackCLI")]
#[command(about = "A CLI to inspect, export and import recorded tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored track records, newest first
    List,
    /// Print a track record as JSON
    Show { record_id: i64 },
    /// Delete a track record and its points
    Delete { record_id: i64 },
    /// Export a track record as a GPX file
    Export {
        record_id: i64,
        /// Output directory, defaults to the current one
        out_dir: Option<String>,
    },
    /// Import a GPX file as a new track record
    Import { gpx_file: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let data_manager = DataManager::start().await?;

    match &cli.command {
        Commands::List => {
            for record in data_manager.list_records().await? {
                println!(
                    "{}\t{}\t{:.2} km\t{}\t{}",
                    record.record_id,
                    record.start_time.format("%d/%m/%Y %H:%M"),
                    record.stats.total_distance_km(),
                    record.format_duration(),
                    record.route_name.as_deref().unwrap_or("-"),
                );
            }
        }
        Commands::Show { record_id } => {
            let record = data_manager.get_record(*record_id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Delete { record_id } => {
            data_manager.delete_record(*record_id).await?;
            println!("deleted record {record_id}");
        }
        Commands::Export { record_id, out_dir } => {
            let path = data_manager
                .export_gpx(*record_id, out_dir.as_deref().unwrap_or("."))
                .await?;
            println!("wrote {}", path.display());
        }
        Commands::Import { gpx_file } => {
            let record_id = data_manager.import_gpx(gpx_file).await?;
            println!("created record with id: {record_id}");
        }
    }

    Ok(())
}
