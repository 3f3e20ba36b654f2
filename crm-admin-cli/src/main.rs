mod error;
mod paths;
mod render;

use std::fs::File;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use crm_admin_lib::AdminClient;
use crm_admin_lib::api::CollectionPoller;
use crm_admin_lib::api::FormErrors;
use crm_admin_lib::api::MutationOutcome;
use crm_admin_lib::api::PollConfig;
use crm_admin_lib::auth::StaticTokenProvider;
use crm_admin_lib::model::Entity;
use crm_admin_lib::model::Record;
use crm_admin_lib::model::Value;
use crm_admin_lib::permissions::CategoryRules;
use crm_admin_lib::screens::Screen;
use crm_admin_lib::table::PageSize;
use crm_admin_lib::table::SortDirection;
use crm_admin_lib::table::TableConfig;
use crm_admin_lib::table::TabularDataController;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "crm-admin")]
#[command(about = "Browse and edit CRM admin collections from the terminal")]
#[command(
    after_help = "Environment:\n  CRM_API_URL     Admin API base URL\n  CRM_API_TOKEN   Bearer token from an authenticated session"
)]
struct Cli {
    /// Admin API base URL, e.g. https://crm.example.com/api
    #[arg(long, global = true, env = "CRM_API_URL")]
    url: Option<String>,
    /// Bearer token for the session
    #[arg(long, global = true, env = "CRM_API_TOKEN", hide_env_values = true, default_value = "")]
    token: String,
    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Table)]
    format: Format,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of a collection
    List(TableArgs),
    /// Re-fetch a collection on an interval and redraw the page
    Watch {
        #[command(flatten)]
        table: TableArgs,
        /// Seconds between refreshes
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
    /// Summarize and group each record's permissions
    Permissions {
        /// Collection to read
        #[arg(default_value = "roles")]
        entity: String,
        /// Field holding the permission map
        #[arg(long)]
        field: Option<String>,
        /// Field used as the row label
        #[arg(long, default_value = "name")]
        name_field: String,
        /// Only show records matching this term
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a record
    Create {
        entity: String,
        /// Field assignment, e.g. --set email=ada@example.com (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
        /// Identifier field, for collections without a preset
        #[arg(long, default_value = "id")]
        id_field: String,
    },
    /// Update a record by identifier
    Update {
        entity: String,
        id: String,
        /// Field assignment, e.g. --set status=approved (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
        /// Identifier field, for collections without a preset
        #[arg(long, default_value = "id")]
        id_field: String,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Collection to show: users, requests, roles, or any other name
    entity: String,
    /// Case-insensitive search term
    #[arg(long)]
    search: Option<String>,
    /// Fields to search, overriding the screen's defaults
    #[arg(long = "search-field", value_delimiter = ',')]
    search_fields: Vec<String>,
    /// Field to sort by
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,
    /// 1-based page number; out-of-range pages clamp
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    page: i64,
    /// Rows per page
    #[arg(long)]
    page_size: Option<i64>,
    /// Columns to show, comma separated
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
    /// Identifier field, for collections without a preset
    #[arg(long, default_value = "id")]
    id_field: String,
    /// Identifiers to mark as selected, comma separated
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,
    /// Select every record on the shown page
    #[arg(long)]
    select_page: bool,
}

fn init_logging(verbose: u8) -> Result<(), CliError> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| CliError::Logger(e.to_string()))?;
    }
    let file = File::create(&path).map_err(|e| CliError::Logger(e.to_string()))?;
    WriteLogger::init(level, Config::default(), file).map_err(|e| CliError::Logger(e.to_string()))
}

fn build_client(cli: &Cli) -> Result<AdminClient, CliError> {
    let url = cli.url.clone().ok_or(CliError::MissingUrl)?;
    let client = AdminClient::builder()
        .url(url)
        .token_provider(StaticTokenProvider::new(cli.token.clone()))
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;
    Ok(client)
}

/// The identifier field of `entity`: the screen's when it has one,
/// otherwise `fallback` from the command line.
fn id_field_for<'a>(entity: &Entity, fallback: &'a str) -> &'a str {
    Screen::for_entity(entity).map_or(fallback, |s| s.id_field())
}

/// Builds the controller for `args`, starting from the screen preset when
/// the collection has one.
fn controller(entity: &Entity, args: &TableArgs, records: Vec<Record>) -> Result<TabularDataController, CliError> {
    let screen = Screen::for_entity(entity);

    let id_field = id_field_for(entity, &args.id_field);
    let search_fields: Vec<String> = if !args.search_fields.is_empty() {
        args.search_fields.clone()
    } else {
        screen
            .map(|s| s.search_fields().iter().map(|f| f.to_string()).collect())
            .unwrap_or_default()
    };

    let mut builder = TableConfig::builder(id_field).search_fields(search_fields);
    if let Some(size) = args.page_size {
        // an explicit size is always offered alongside the defaults
        let mut sizes = crm_admin_lib::table::DEFAULT_PAGE_SIZES.to_vec();
        sizes.push(size);
        builder = builder.page_sizes(sizes).default_page_size(size);
    }

    let mut table = TabularDataController::new(builder.build()?, records);
    apply_view(&mut table, args)?;
    Ok(table)
}

/// Applies search, sort, page and selection from the command line.
fn apply_view(table: &mut TabularDataController, args: &TableArgs) -> Result<(), CliError> {
    if let Some(size) = args.page_size {
        table.set_page_size(PageSize::new(size)?);
    }
    if let Some(term) = &args.search {
        table.set_search_term(term.as_str());
    }
    match &args.sort {
        Some(key) if args.desc => table.set_sort(key, SortDirection::Descending),
        Some(key) => table.set_sort(key, SortDirection::Ascending),
        None => table.clear_sort(),
    }
    table.set_current_page(args.page);

    table.clear_selection();
    for id in &args.select {
        table.toggle_select(id.as_str(), true);
    }
    if args.select_page {
        table.select_all_visible(true);
    }
    Ok(())
}

fn print_page(table: &TabularDataController, entity: &Entity, args: &TableArgs, format: Format) -> Result<(), CliError> {
    let view = table.view();

    if format == Format::Json {
        let page = serde_json::json!({
            "records": view.records(),
            "page": view.page(),
            "total_pages": view.total_pages(),
            "filtered_count": view.filtered_count(),
            "total_count": view.total_count(),
            "selected": table.selection().iter().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    let screen = Screen::for_entity(entity);
    let columns = if !args.columns.is_empty() {
        args.columns.clone()
    } else if let Some(screen) = screen {
        screen.columns().iter().map(|c| c.to_string()).collect()
    } else {
        render::columns_of(&view)
    };

    let id_field = table.config().id_field();
    let text = render::table(&view, &columns, screen.and_then(Screen::permissions_field), |record| {
        record.key(id_field).is_some_and(|id| table.is_selected(&id))
    });
    println!("{}", text);
    if !table.selection().is_empty() {
        println!("{} selected", table.selection().len());
    }
    Ok(())
}

async fn list(client: &AdminClient, args: &TableArgs, format: Format) -> Result<(), CliError> {
    let entity = Entity::named(args.entity.as_str());
    let records = client.fetch(&entity).await?;
    let table = controller(&entity, args, records)?;
    print_page(&table, &entity, args, format)
}

async fn watch(client: AdminClient, args: &TableArgs, interval: u64, format: Format) -> Result<(), CliError> {
    let entity = Entity::named(args.entity.as_str());
    let mut table = controller(&entity, args, Vec::new())?;

    let config = PollConfig::default().with_interval(Duration::from_secs(interval.max(1)));
    let (poller, mut updates) = CollectionPoller::spawn(client, entity.clone(), config);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = updates.recv() => {
                let Some(result) = update else { break };
                match result {
                    Ok(records) => {
                        table.replace_collection(records);
                        // the page requested on the command line may exist now
                        table.set_current_page(args.page);
                        if format == Format::Table {
                            print!("\x1B[2J\x1B[H");
                        }
                        print_page(&table, &entity, args, format)?;
                    }
                    // keep showing the last good page
                    Err(e) => eprintln!("refresh failed: {}", e),
                }
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}

async fn permissions(
    client: &AdminClient,
    entity: &str,
    field: Option<&str>,
    name_field: &str,
    search: Option<&str>,
) -> Result<(), CliError> {
    let entity = Entity::named(entity);
    let screen = Screen::for_entity(&entity);
    let field = field
        .or_else(|| screen.and_then(Screen::permissions_field))
        .ok_or_else(|| CliError::NoPermissionsField(entity.to_string()))?;

    let records = client.fetch(&entity).await?;
    let rows = match search {
        Some(term) => crm_admin_lib::table::filter(&records, term, &[name_field, field]),
        None => records.iter().collect(),
    };

    let rules = screen.map_or_else(CategoryRules::crm_defaults, Screen::category_rules);
    print!("{}", render::permissions(&rows, name_field, field, &rules));
    Ok(())
}

/// Parses `field=value`. Values that parse as JSON keep their type, so
/// `active=true` is a bool and `tags=["a","b"]` a list; anything else is a
/// string.
fn parse_assignments(assignments: &[String]) -> Result<Record, CliError> {
    if assignments.is_empty() {
        return Err(CliError::EmptyRecord);
    }
    let mut record = Record::new();
    for assignment in assignments {
        let (field, raw) = assignment
            .split_once('=')
            .filter(|(field, _)| !field.trim().is_empty())
            .ok_or_else(|| CliError::InvalidAssignment(assignment.clone()))?;
        let value = serde_json::from_str::<serde_json::Value>(raw)
            .map(Value::from_json)
            .unwrap_or_else(|_| Value::from(raw));
        record.insert(field.trim(), value);
    }
    Ok(record)
}

fn saved_line(record: &Record, id_field: &str) -> String {
    match record.key(id_field) {
        Some(id) => format!("Saved {}", id),
        None => "Saved".to_string(),
    }
}

fn report_mutation(
    result: Result<MutationOutcome, crm_admin_lib::error::Error>,
    entity: &Entity,
    id_field: &str,
    format: Format,
) -> Result<(), CliError> {
    match result {
        Ok(MutationOutcome::Record(record)) => {
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                Format::Table => println!("{}", saved_line(&record, id_field_for(entity, id_field))),
            }
            Ok(())
        }
        Ok(MutationOutcome::Acknowledged) => {
            println!("Saved");
            Ok(())
        }
        Err(e) => {
            let fields = Screen::for_entity(entity).map_or(&[][..], Screen::form_fields);
            let errors = FormErrors::from_error(&e, fields);
            for error in errors.fields() {
                eprintln!("  {}", error);
            }
            Err(e.into())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = build_client(&cli)?;
    let format = cli.format;

    match cli.command {
        Commands::List(args) => list(&client, &args, format).await,
        Commands::Watch { table, interval } => watch(client, &table, interval, format).await,
        Commands::Permissions {
            entity,
            field,
            name_field,
            search,
        } => {
            permissions(
                &client,
                &entity,
                field.as_deref(),
                &name_field,
                search.as_deref(),
            )
            .await
        }
        Commands::Create {
            entity,
            assignments,
            id_field,
        } => {
            let entity = Entity::named(entity);
            let record = parse_assignments(&assignments)?;
            report_mutation(client.create(&entity, &record).await, &entity, &id_field, format)
        }
        Commands::Update {
            entity,
            id,
            assignments,
            id_field,
        } => {
            let entity = Entity::named(entity);
            let changes = parse_assignments(&assignments)?;
            report_mutation(
                client.update(&entity, &id, &changes).await,
                &entity,
                &id_field,
                format,
            )
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
