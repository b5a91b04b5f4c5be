pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod query;
pub mod store;
pub mod value;

use anyhow::{Context, bail};
use serde_json::json;
use tracing::info;

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use query::{Query, QueryOptions, matches, matches_with};
pub use store::{Database, Document, DocumentStore, JsonFileStore, MemoryStore, StoreError};
pub use value::{Record, Timestamp, Value};

fn parse_record(text: &str, what: &str) -> anyhow::Result<Record> {
    serde_json::from_str::<Record>(text)
        .with_context(|| format!("{what} must be a JSON object, got: {text}"))
}

fn parse_records(text: &str) -> anyhow::Result<Vec<Record>> {
    serde_json::from_str::<Vec<Record>>(text)
        .with_context(|| format!("Records must be a JSON array of objects, got: {text}"))
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    logging::init_subscriber(cli.verbose, cli.quiet);

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let mut config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(path) = &cli.db {
        config.storage.path = path.clone();
    }
    info!(
        path = %config.storage.path.display(),
        max_depth = config.query.max_depth,
        "opening database"
    );

    let path = &config.storage.path;
    let store = JsonFileStore::open_with_indent(path, config.storage.indent)
        .with_context(|| format!("Failed to open database '{}'", path.display()))?;
    let mut db = Database::new(store).with_query_options(config.query.options());
    let format = cli.format;

    match &cli.command {
        Commands::Create { collection, record } => {
            let record = parse_record(record, "Record")?;
            let id = db.create(collection, record)?;
            match format {
                OutputFormat::Text => println!("{id}"),
                OutputFormat::Json => println!("{}", output::to_pretty_json(&json!({ "id": id }))),
            }
        }
        Commands::CreateMany {
            collection,
            records,
        } => {
            let records = parse_records(records)?;
            let ids = db.create_many(collection, records)?;
            match format {
                OutputFormat::Text => ids.iter().for_each(|id| println!("{id}")),
                OutputFormat::Json => {
                    println!("{}", output::to_pretty_json(&json!({ "ids": ids })))
                }
            }
        }
        Commands::Insert {
            collection,
            id,
            record,
        } => {
            let record = parse_record(record, "Record")?;
            db.insert(collection, id, record)?;
            match format {
                OutputFormat::Text => println!("{id}"),
                OutputFormat::Json => println!("{}", output::to_pretty_json(&json!({ "id": id }))),
            }
        }
        Commands::InsertMany {
            collection,
            ids,
            records,
        } => {
            let records = parse_records(records)?;
            let inserted = db.insert_many(collection, ids, records)?;
            match format {
                OutputFormat::Text => {
                    for (id, ok) in ids.iter().zip(&inserted) {
                        if *ok {
                            println!("{id}: inserted");
                        } else {
                            println!("{id}: skipped (id already exists)");
                        }
                    }
                }
                OutputFormat::Json => {
                    let rows: Vec<_> = ids
                        .iter()
                        .zip(&inserted)
                        .map(|(id, ok)| json!({ "id": id, "inserted": ok }))
                        .collect();
                    println!("{}", output::to_pretty_json(&rows));
                }
            }
        }
        Commands::Read {
            collection,
            id,
            filter,
        } => {
            if let Some(id) = id {
                let Some(record) = db.read(collection, id) else {
                    bail!("Record '{id}' not found in collection '{collection}'");
                };
                match format {
                    OutputFormat::Text => print!("{}", output::format_record_text(id, &record)),
                    OutputFormat::Json => println!(
                        "{}",
                        output::to_pretty_json(&Document::new(id.as_str(), record))
                    ),
                }
            } else {
                let documents = match filter {
                    Some(expression) => db.read_where(collection, expression),
                    None => db.read_all(collection),
                };
                match format {
                    OutputFormat::Text => {
                        print!("{}", output::format_documents_text(collection, &documents))
                    }
                    OutputFormat::Json => println!("{}", output::to_pretty_json(&documents)),
                }
            }
        }
        Commands::Update {
            collection,
            id,
            fields,
        } => {
            let fields = parse_record(fields, "Fields")?;
            if !db.update(collection, id, fields)? {
                bail!("Record '{id}' not found in collection '{collection}'");
            }
            if format == OutputFormat::Text {
                println!("Updated {id}");
            } else {
                let body = json!({ "id": id, "updated": true });
                println!("{}", output::to_pretty_json(&body));
            }
        }
        Commands::Delete { collection, id } => {
            if !db.delete(collection, id)? {
                bail!("Record '{id}' not found in collection '{collection}'");
            }
            if format == OutputFormat::Text {
                println!("Deleted {id}");
            } else {
                let body = json!({ "id": id, "deleted": true });
                println!("{}", output::to_pretty_json(&body));
            }
        }
        Commands::Collections => {
            let names = db.list_collections();
            match format {
                OutputFormat::Text => names.iter().for_each(|name| println!("{name}")),
                OutputFormat::Json => println!("{}", output::to_pretty_json(&names)),
            }
        }
    }

    Ok(())
}
