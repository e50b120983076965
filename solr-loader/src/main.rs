use clap::{Args, Parser, Subcommand};
use std::error::Error as _;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use solr_loader::tasks::{self, DriverPlan};
use solr_loader::{AppError, Dependencies, Settings};
use solr_loader_ingest::CsvEncoding;
use solr_loader_shared::{SearchQuery, DEFAULT_ROWS};

#[derive(Parser)]
#[command(name = "solr-loader")]
#[command(about = "Provision Solr collections, load CSV data and run queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Solr base URL including the context path
    #[arg(long, global = true)]
    solr_url: Option<String>,

    /// Solr command-line tool used to create collections
    #[arg(long, global = true)]
    solr_bin: Option<PathBuf>,

    /// CSV file to load
    #[arg(long, global = true)]
    csv_path: Option<PathBuf>,

    /// CSV encoding (latin1|utf8)
    #[arg(long, global = true)]
    encoding: Option<CsvEncoding>,

    /// Column normalized to a timestamp
    #[arg(long, global = true)]
    date_column: Option<String>,

    /// Input format of the date column
    #[arg(long, global = true)]
    date_format: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Maximum records per add request
    #[arg(long, global = true)]
    max_batch_size: Option<usize>,

    /// Column copied into the id field before loading
    #[arg(long, global = true)]
    id_column: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

impl Cli {
    /// Apply command-line overrides on top of environment settings.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(url) = &self.solr_url {
            settings.solr_url = url.clone();
        }
        if let Some(bin) = &self.solr_bin {
            settings.solr_bin = bin.clone();
        }
        if let Some(path) = &self.csv_path {
            settings.csv_path = path.clone();
        }
        if let Some(encoding) = self.encoding {
            settings.encoding = encoding;
        }
        if let Some(column) = &self.date_column {
            settings.date_column = column.clone();
        }
        if let Some(format) = &self.date_format {
            settings.date_format = format.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if self.max_batch_size.is_some() {
            settings.max_batch_size = self.max_batch_size;
        }
        if let Some(column) = &self.id_column {
            settings.id_column = Some(column.clone());
        }
        settings
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full create, load, query sequence (default)
    Run(RunArgs),
    /// Create a collection unless it already exists
    Create { collection: String },
    /// Load the CSV file into a collection, excluding one column
    Index {
        collection: String,
        #[arg(long)]
        exclude: String,
    },
    /// Search a collection for documents where FIELD matches VALUE
    Search {
        collection: String,
        field: String,
        value: String,
        #[arg(long, default_value_t = DEFAULT_ROWS)]
        rows: u32,
        /// Send the value without escaping query syntax
        #[arg(long)]
        raw: bool,
    },
    /// Print the number of documents in a collection
    Count { collection: String },
    /// Delete a document by id
    Delete { collection: String, id: String },
    /// Print value counts for a field
    Facet {
        collection: String,
        #[arg(long, default_value = "Department")]
        field: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// First collection
    #[arg(long, default_value = "Hash_Dileep")]
    primary: String,
    /// Second collection
    #[arg(long, default_value = "Hash_1234")]
    secondary: String,
    /// Document deleted from the first collection
    #[arg(long, default_value = "E02003")]
    delete_id: String,
    /// Column excluded when loading the first collection
    #[arg(long, default_value = "Department")]
    primary_exclude: String,
    /// Column excluded when loading the second collection
    #[arg(long, default_value = "Gender")]
    secondary_exclude: String,
    /// Field faceted on both collections
    #[arg(long, default_value = "Department")]
    facet_field: String,
    /// Search to run as COLLECTION:FIELD:VALUE; repeat for several
    #[arg(long = "search", value_parser = parse_search_step)]
    searches: Vec<(String, SearchQuery)>,
}

impl RunArgs {
    fn plan(&self) -> DriverPlan {
        let plan = DriverPlan::new(&self.primary, &self.secondary)
            .with_delete_id(&self.delete_id)
            .with_excludes(&self.primary_exclude, &self.secondary_exclude)
            .with_facet_field(&self.facet_field);

        if self.searches.is_empty() {
            plan
        } else {
            plan.with_searches(self.searches.clone())
        }
    }
}

/// Parse `COLLECTION:FIELD:VALUE`. The value may itself contain colons.
fn parse_search_step(s: &str) -> Result<(String, SearchQuery), String> {
    let mut parts = s.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(collection), Some(field), Some(value))
            if !collection.is_empty() && !field.is_empty() =>
        {
            Ok((collection.to_string(), SearchQuery::field(field, value)))
        }
        _ => Err(format!("expected COLLECTION:FIELD:VALUE, got '{}'", s)),
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {}", err);
            source = err.source();
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = cli.apply(Settings::from_env()?);
    let deps = Dependencies::new(&settings)?;
    let mut out = io::stdout().lock();

    match cli.command {
        None => {
            info!("Starting full run");
            tasks::run_all(&deps, &DriverPlan::default(), &mut out).await;
        }
        Some(Commands::Run(args)) => {
            info!("Starting full run");
            tasks::run_all(&deps, &args.plan(), &mut out).await;
        }
        Some(Commands::Create { collection }) => {
            tasks::create_collection(&deps, &collection, &mut out).await?;
        }
        Some(Commands::Index {
            collection,
            exclude,
        }) => {
            tasks::index_data(&deps, &collection, &exclude, &mut out).await?;
        }
        Some(Commands::Search {
            collection,
            field,
            value,
            rows,
            raw,
        }) => {
            let mut query = SearchQuery::field(field, value).with_rows(rows);
            if raw {
                query = query.raw();
            }
            tasks::search_by_field(&deps, &collection, &query, &mut out).await?;
        }
        Some(Commands::Count { collection }) => {
            tasks::count_documents(&deps, &collection, &mut out).await?;
        }
        Some(Commands::Delete { collection, id }) => {
            tasks::delete_by_id(&deps, &collection, &id, &mut out).await?;
        }
        Some(Commands::Facet { collection, field }) => {
            tasks::facet_counts(&deps, &collection, &field, &mut out).await?;
        }
    }

    Ok(())
}
