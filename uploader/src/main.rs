//! Bulletin CLI - Upload pricing bulletins and inspect validation errors
//!
//! # Commands
//!
//! ```bash
//! bulletin upload pricing.xlsx              # Upload a workbook
//! bulletin upload pricing.xlsx --export .   # Upload, export errors on failure
//! bulletin errors <session-id> --search ZZZ # Show error records of a session
//! bulletin export <session-id> --out .      # Export error records as CSV
//! bulletin classify errors.json             # Summarize error records offline
//! ```
//!
//! Connection settings come from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and
//! `SUPABASE_ACCESS_TOKEN` (a `.env` file is honored), overridable with
//! `--url` and `--token`.

use bulletin::config::{ENV_ACCESS_TOKEN, ENV_ANON_KEY, SHEET_NAME_HINT};
use bulletin::{
    classify_errors, export_errors, render_session, Config, ConfigError, DetailView,
    ErrorFetcher, ErrorStore, HttpTransport, NoticeCenter, RestErrorStore, StaticSession,
    SummaryView, UploadErrorRecord, UploadOrchestrator, UploadOutcome,
};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

#[derive(Parser)]
#[command(name = "bulletin")]
#[command(about = "Upload pricing bulletins and review validation errors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Backend connection overrides.
#[derive(Args)]
struct Connection {
    /// Backend base URL (default: $SUPABASE_URL)
    #[arg(long)]
    url: Option<String>,

    /// Access token (default: $SUPABASE_ACCESS_TOKEN)
    #[arg(long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a pricing workbook (.xlsx)
    Upload {
        /// Workbook to upload
        file: PathBuf,

        /// Export the error records into this directory if the upload fails
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print the upload result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        connection: Connection,
    },

    /// Show the error records of an upload session
    Errors {
        /// Upload session id
        session_id: String,

        /// Only show records matching this text
        #[arg(short, long)]
        search: Option<String>,

        /// Show the grouped summary instead of the record list
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        connection: Connection,
    },

    /// Export the error records of an upload session as CSV
    Export {
        /// Upload session id
        session_id: String,

        /// Output directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        #[command(flatten)]
        connection: Connection,
    },

    /// Summarize error records from a JSON file
    Classify {
        /// JSON file (array of error records)
        input: PathBuf,

        /// Print the error groups as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Upload {
            file,
            export,
            json,
            connection,
        } => cmd_upload(&file, export.as_deref(), json, &connection).await,

        Commands::Errors {
            session_id,
            search,
            summary,
            connection,
        } => cmd_errors(&session_id, search.as_deref(), summary, &connection).await,

        Commands::Export {
            session_id,
            out,
            connection,
        } => cmd_export(&session_id, &out, &connection).await,

        Commands::Classify { input, json } => cmd_classify(&input, json),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(connection: &Connection) -> Result<Config, ConfigError> {
    let mut config = match &connection.url {
        Some(url) => {
            let mut config = Config::new(url)?;
            if let Ok(key) = std::env::var(ENV_ANON_KEY) {
                config = config.with_anon_key(key);
            }
            if let Ok(token) = std::env::var(ENV_ACCESS_TOKEN) {
                config = config.with_access_token(token);
            }
            config
        }
        None => Config::from_env()?,
    };

    if let Some(token) = &connection.token {
        config = config.with_access_token(token.clone());
    }
    Ok(config)
}

/// Print notices to stderr until every `NoticeCenter` clone is dropped.
fn spawn_notice_printer(notices: &NoticeCenter) -> JoinHandle<()> {
    let mut stream = Box::pin(notices.stream());
    tokio::spawn(async move {
        while let Some(notice) = stream.next().await {
            eprintln!("{} [{}] {}", notice.level.emoji(), notice.timestamp, notice.message);
        }
    })
}

async fn cmd_upload(
    file: &Path,
    export_dir: Option<&Path>,
    json: bool,
    connection: &Connection,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(connection)?;
    let auth = Arc::new(StaticSession::from_config(&config));
    let store: Arc<dyn ErrorStore> = Arc::new(RestErrorStore::new(&config, auth.clone()));

    let notices = NoticeCenter::new();
    let printer = spawn_notice_printer(&notices);

    eprintln!("📄 Sheet naming: {}", SHEET_NAME_HINT);
    eprintln!("📤 Uploading: {}", file.display());

    let mut uploader = UploadOrchestrator::new(
        Arc::new(HttpTransport::new(&config)),
        store.clone(),
        auth,
        notices.clone(),
    )
    .on_complete(|session| {
        log::info!("Bulletin pricing refreshed (session {})", session.session_id);
    });

    let outcome = uploader.upload(file).await;
    let groups = uploader.groups();
    drop(uploader);

    if let (Some(dir), UploadOutcome::FailedWithDetail { session, errors }) = (export_dir, &outcome) {
        if !errors.is_empty() {
            fs::create_dir_all(dir)?;
            export_errors(store.as_ref(), &session.session_id, dir, &notices).await;
        }
    }

    drop(notices);
    let _ = printer.await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.session())?);
    } else if let Some(session) = outcome.session() {
        println!("{}", render_session(session));
        if let UploadOutcome::FailedWithDetail { errors, .. } = &outcome {
            if !errors.is_empty() {
                println!("\n{}", SummaryView::new(&groups).render());
                print!("{}", DetailView::new(errors, "").render());
            }
        }
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

async fn cmd_errors(
    session_id: &str,
    search: Option<&str>,
    summary: bool,
    connection: &Connection,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(connection)?;
    let auth = Arc::new(StaticSession::from_config(&config));

    let notices = NoticeCenter::new();
    let printer = spawn_notice_printer(&notices);

    let mut fetcher = ErrorFetcher::new(Arc::new(RestErrorStore::new(&config, auth)), notices);
    let loaded = fetcher.load(session_id).await;
    let records = fetcher.errors().to_vec();
    drop(fetcher);
    let _ = printer.await;

    if !loaded {
        return Err(format!("could not load errors of session {}", session_id).into());
    }

    if summary {
        print!("{}", SummaryView::new(&classify_errors(&records)).render());
    } else {
        print!("{}", DetailView::new(&records, search.unwrap_or("")).render());
    }

    Ok(())
}

async fn cmd_export(
    session_id: &str,
    out: &Path,
    connection: &Connection,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(connection)?;
    let auth = Arc::new(StaticSession::from_config(&config));
    let store = RestErrorStore::new(&config, auth);

    fs::create_dir_all(out)?;

    let notices = NoticeCenter::new();
    let printer = spawn_notice_printer(&notices);
    let written = export_errors(&store, session_id, out, &notices).await;
    drop(notices);
    let _ = printer.await;

    if let Some(path) = written {
        println!("{}", path.display());
    }

    Ok(())
}

fn cmd_classify(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📊 Classifying: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records: Vec<UploadErrorRecord> = serde_json::from_str(&content)?;
    let groups = classify_errors(&records);

    eprintln!("   {} records, {} error types", records.len(), groups.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        print!("{}", SummaryView::new(&groups).render());
    }

    Ok(())
}
