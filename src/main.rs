use anyhow::{Context, Result};
use circapi::api::{format_api_error, ApiClient, ApiError, DEBUG_LOG_TARGET};
use circapi::config::{Config, Overrides};
use circapi::resource::{
    self, ops, Annotation, Maintenance, Resource, SearchFilter, SearchQuery, User,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

/// Circonus API client
#[derive(Parser, Debug)]
#[command(name = "circapi", version, about, long_about = None)]
struct Args {
    /// API root URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// API token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Application name registered with the token
    #[arg(long, global = true)]
    app_name: Option<String>,

    /// Echo request and response payloads to the log
    #[arg(long, global = true)]
    debug: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Maintenance windows
    Maintenance {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Annotations
    Annotation {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Normalize and validate a CID without contacting the API
    Resolve {
        /// Resource type (maintenance, annotation, user)
        resource: String,
        /// Full CID or trailing id
        id: String,
    },
    /// Store --url, --token, --app-name and --debug in the config file
    Configure,
}

#[derive(Subcommand, Debug)]
enum RecordAction {
    /// Fetch one or more records by CID
    Get {
        #[arg(required = true)]
        cids: Vec<String>,
    },
    /// Fetch all records
    List,
    /// Search by free text and/or filters
    Search {
        #[arg(short, long)]
        query: Option<String>,
        /// Filter as name=value, repeatable
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },
    /// Create a record from a JSON document (file or stdin)
    Create { file: Option<PathBuf> },
    /// Update a record from a JSON document (file or stdin)
    Update { file: Option<PathBuf> },
    /// Delete a record by CID
    Delete { cid: String },
}

#[derive(Subcommand, Debug)]
enum UserAction {
    /// Fetch users by CID, or the token's own user when none is given
    Get { cids: Vec<String> },
    /// Fetch all users
    List,
    /// Search by filters
    Search {
        /// Filter as name=value, repeatable
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },
    /// Update a user from a JSON document (file or stdin)
    Update { file: Option<PathBuf> },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// File logging at `level`, plus payload echo lines on stderr with `--debug`
fn setup_logging(level: LogLevel, debug: bool) -> Option<WorkerGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guard = None;

    let log_path = get_log_path();
    if let Some(tracing_level) = level.to_tracing_level() {
        if let Some((layer, file_guard)) = file_layer(&log_path, tracing_level) {
            layers.push(layer);
            guard = Some(file_guard);
        }
    }

    if debug {
        layers.push(debug_layer(std::io::stderr));
    }

    if layers.is_empty() {
        return None;
    }

    tracing_subscriber::registry().with(layers).init();

    if guard.is_some() {
        tracing::info!("circapi started with log level: {:?}", level);
        tracing::info!("Log file: {:?}", log_path);
    }

    guard
}

fn file_layer(
    log_path: &Path,
    tracing_level: Level,
) -> Option<(Box<dyn Layer<Registry> + Send + Sync>, WorkerGuard)> {
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(LevelFilter::from_level(tracing_level))
        .boxed();

    Some((layer, guard))
}

/// Bare message lines for the payload echo target only
fn debug_layer<W>(make_writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(make_writer)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .without_time()
        .with_filter(Targets::new().with_target(DEBUG_LOG_TARGET, Level::INFO))
        .boxed()
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("circapi").join("circapi.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".circapi").join("circapi.log");
    }
    PathBuf::from("circapi.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::load();

    // Held until main returns so the file appender flushes
    let _log_guard = setup_logging(args.log_level, args.debug || config.debug);

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            match err.downcast_ref::<ApiError>() {
                Some(api_err) => eprintln!("Error: {}", format_api_error(api_err)),
                None => eprintln!("Error: {err:?}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, mut config: Config) -> Result<()> {
    let overrides = Overrides {
        api_url: args.url.clone(),
        api_token: args.token.clone(),
        app_name: args.app_name.clone(),
        debug: args.debug,
    };

    match args.command {
        Command::Configure => {
            config.apply(&overrides);
            let path = config.save()?;
            println!("Saved configuration to {}", path.display());
            Ok(())
        }
        Command::Resolve { resource: key, id } => {
            let def = resource::get_resource(&key).with_context(|| {
                format!(
                    "Unknown resource '{}' (expected one of: {})",
                    key,
                    resource::get_all_resource_keys().join(", ")
                )
            })?;
            println!("{}", def.resolve(Some(id.as_str()))?);
            Ok(())
        }
        Command::Maintenance { action } => {
            let client = connect(&config, &overrides)?;
            run_record::<Maintenance>(&client, action, args.output).await
        }
        Command::Annotation { action } => {
            let client = connect(&config, &overrides)?;
            run_record::<Annotation>(&client, action, args.output).await
        }
        Command::User { action } => {
            let client = connect(&config, &overrides)?;
            run_user(&client, action, args.output).await
        }
    }
}

fn connect(config: &Config, overrides: &Overrides) -> Result<ApiClient> {
    let api_config = config.api_config(overrides)?;
    tracing::info!("Using API at {}", api_config.url);
    ApiClient::new(&api_config)
}

async fn run_record<T: Resource>(
    client: &ApiClient,
    action: RecordAction,
    output: OutputFormat,
) -> Result<()> {
    match action {
        RecordAction::Get { cids } => {
            let cids: Vec<&str> = cids.iter().map(String::as_str).collect();
            let records: Vec<T> = ops::fetch_many(client, &cids).await?;
            if let [record] = records.as_slice() {
                print_output(record, output)
            } else {
                print_output(&records, output)
            }
        }
        RecordAction::List => print_output(&ops::fetch_all::<T, _>(client).await?, output),
        RecordAction::Search { query, filters } => {
            let query = query.as_deref().map(SearchQuery::new);
            let filter = parse_filters(&filters)?;
            let records: Vec<T> = ops::search(client, query.as_ref(), Some(&filter)).await?;
            print_output(&records, output)
        }
        RecordAction::Create { file } => {
            let record: Option<T> = read_record(file)?;
            print_output(&ops::create(client, record.as_ref()).await?, output)
        }
        RecordAction::Update { file } => {
            let record: Option<T> = read_record(file)?;
            print_output(&ops::update(client, record.as_ref()).await?, output)
        }
        RecordAction::Delete { cid } => {
            ops::delete_by_cid::<T, _>(client, Some(cid.as_str())).await?;
            println!("Deleted {}", T::def().resolve(Some(cid.as_str()))?);
            Ok(())
        }
    }
}

async fn run_user(client: &ApiClient, action: UserAction, output: OutputFormat) -> Result<()> {
    match action {
        UserAction::Get { cids } if cids.is_empty() => {
            print_output(&client.fetch_user(None).await?, output)
        }
        UserAction::Get { cids } => {
            let cids: Vec<&str> = cids.iter().map(String::as_str).collect();
            let users: Vec<User> = ops::fetch_many(client, &cids).await?;
            print_output(&users, output)
        }
        UserAction::List => print_output(&client.fetch_users().await?, output),
        UserAction::Search { filters } => {
            let filter = parse_filters(&filters)?;
            print_output(&client.search_users(Some(&filter)).await?, output)
        }
        UserAction::Update { file } => {
            let record: Option<User> = read_record(file)?;
            print_output(&ops::update(client, record.as_ref()).await?, output)
        }
    }
}

fn parse_filters(pairs: &[String]) -> Result<SearchFilter> {
    let mut filter = SearchFilter::new();
    for pair in pairs {
        filter
            .add_pair(pair)
            .with_context(|| format!("Invalid filter '{}', expected name=value", pair))?;
    }
    Ok(filter)
}

/// Read a JSON record from a file, or stdin for `-`/none. A `null` document
/// yields `None`, which the operations reject as an invalid config.
fn read_record<T: Resource>(file: Option<PathBuf>) -> Result<Option<T>> {
    let content = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read record from stdin")?;
            buf
        }
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} JSON", T::def().kind))
}

fn print_output<S: Serialize + ?Sized>(value: &S, output: OutputFormat) -> Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use circapi::api::ApiConfig;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// In-memory stand-in for stderr
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    async fn fetch_current_user(debug: bool) -> String {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/user/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_cid": "/user/7" })))
            .mount(&server)
            .await;

        let captured = Captured::default();
        let sink = captured.clone();
        let _subscriber = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(debug_layer(move || sink.clone())),
        );

        let mut config = ApiConfig::new("test-token");
        config.url = format!("{}/v2", server.uri());
        config.debug = debug;
        let client = ApiClient::new(&config).unwrap();

        let user = client.fetch_user(None).await.unwrap();
        assert_eq!(user.cid, "/user/7");

        captured.text()
    }

    #[tokio::test]
    async fn test_debug_echoes_received_json() {
        let echoed = fetch_current_user(true).await;

        assert_eq!(
            echoed.trim(),
            r#"fetch user, received JSON: {"_cid":"/user/7"}"#
        );
    }

    #[tokio::test]
    async fn test_no_echo_without_debug() {
        assert!(fetch_current_user(false).await.is_empty());
    }

    #[test]
    fn test_no_subscriber_when_quiet() {
        assert!(setup_logging(LogLevel::Off, false).is_none());
    }
}
