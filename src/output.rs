use crate::store::Document;
use crate::value::{Record, Value};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use std::collections::BTreeSet;
use std::fmt::Write;

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Str(s)) => s.clone(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// Render documents as a table with one column per field seen in any document
pub fn format_documents_text(collection: &str, documents: &[Document]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        collection.bold().bright_white(),
        format!(
            "({} record{})",
            documents.len(),
            if documents.len() == 1 { "" } else { "s" }
        )
        .dimmed()
    );

    if documents.is_empty() {
        let _ = writeln!(out, "No matching records found.");
        return out;
    }

    let fields: BTreeSet<&str> = documents
        .iter()
        .flat_map(|doc| doc.fields.keys().map(String::as_str))
        .filter(|name| *name != "id")
        .collect();

    let mut headers = vec!["id"];
    headers.extend(fields.iter().copied());
    let mut table = create_styled_table(&headers);

    for doc in documents {
        let record = doc.to_record();
        table.add_row(
            headers
                .iter()
                .map(|name| Cell::new(cell_text(record.get(*name)))),
        );
    }

    let _ = writeln!(out, "{table}");
    out
}

pub fn format_record_text(id: &str, record: &Record) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", id.bold().bright_white());

    let mut table = create_styled_table(&["Field", "Value", "Type"]);
    for (name, value) in record {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(cell_text(Some(value))),
            Cell::new(value.type_name()),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| "{\"error\":\"failed to serialize output\"}".to_string())
}
