//! list command - List buckets or objects
//!
//! `-b` prints every bucket the credentials can see; `-o BUCKET` prints a
//! table of the objects in one bucket.

use clap::Args;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets};
use s3sync_core::{RemoteObjectEntry, SyncOptions};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List buckets or the objects in a bucket
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ListArgs {
    /// List all buckets
    #[arg(short, long)]
    pub buckets: bool,

    /// List the objects in BUCKET
    #[arg(short, long, value_name = "BUCKET")]
    pub objects: Option<String>,
}

#[derive(Debug, Serialize)]
struct BucketsOutput {
    buckets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ObjectInfo {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
    last_modified: String,
}

impl From<&RemoteObjectEntry> for ObjectInfo {
    fn from(entry: &RemoteObjectEntry) -> Self {
        Self {
            key: entry.key.clone(),
            size_bytes: entry.size_bytes,
            size_human: entry
                .size_bytes
                .map(|size| humansize::format_size(size, humansize::BINARY)),
            last_modified: entry.last_modified.strftime("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ObjectsOutput {
    bucket: String,
    objects: Vec<ObjectInfo>,
    total_objects: usize,
    total_size_bytes: u64,
}

/// Execute the list command
pub async fn execute(
    args: ListArgs,
    options: SyncOptions,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let engine = match super::connect(&formatter, options).await {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    match args.objects {
        Some(bucket) => {
            let objects = match engine.list_objects(&bucket).await {
                Ok(objects) => objects,
                Err(e) => {
                    formatter.error(&e.to_string());
                    return ExitCode::from_error(&e);
                }
            };
            print_objects(&bucket, &objects, &formatter);
        }
        None => {
            let buckets = match engine.list_buckets().await {
                Ok(buckets) => buckets,
                Err(e) => {
                    formatter.error(&e.to_string());
                    return ExitCode::from_error(&e);
                }
            };
            print_buckets(buckets, &formatter);
        }
    }

    ExitCode::Success
}

fn print_buckets(buckets: Vec<String>, formatter: &Formatter) {
    if formatter.is_json() {
        formatter.json(&BucketsOutput { buckets });
        return;
    }

    formatter.println(&formatter.bold("Current Buckets:"));
    for bucket in &buckets {
        formatter.println(&format!(" - {bucket}"));
    }
}

fn print_objects(bucket: &str, objects: &[RemoteObjectEntry], formatter: &Formatter) {
    let infos: Vec<ObjectInfo> = objects.iter().map(ObjectInfo::from).collect();
    let total_size: u64 = objects.iter().filter_map(|o| o.size_bytes).sum();

    if formatter.is_json() {
        formatter.json(&ObjectsOutput {
            bucket: bucket.to_string(),
            total_objects: infos.len(),
            total_size_bytes: total_size,
            objects: infos,
        });
        return;
    }

    if infos.is_empty() {
        formatter.println(&format!("Bucket {} is empty.", formatter.bold(bucket)));
        return;
    }

    formatter.println(&format!("Objects in {}:", formatter.bold(bucket)));
    formatter.println(&object_table(&infos).to_string());
    formatter.println(&format!(
        "Total: {} objects, {}",
        infos.len(),
        humansize::format_size(total_size, humansize::BINARY)
    ));
}

fn object_table(infos: &[ObjectInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Key", "Size", "Last Modified"]);

    for info in infos {
        table.add_row(vec![
            Cell::new(&info.key),
            Cell::new(info.size_human.as_deref().unwrap_or("-"))
                .set_alignment(CellAlignment::Right),
            Cell::new(&info.last_modified),
        ]);
    }
    table
}
