use std::io::Write;

use anyhow::Result;
use bytesize::ByteSize;
use chrono::{Local, TimeZone};
use cli_table::{
    format::{Border, Justify, Separator},
    Cell, Table,
};
use filectl_core::{select::select, types::FileRecord};

use crate::{
    cli::{Action, Args, Plan},
    client::FileStore,
};

/// Validates the selection flags, then runs the action against `store`.
///
/// A selection error surfaces as a `SelectionError` inside the returned
/// error, and `store` has not been called at that point.
pub async fn execute<S: FileStore, W: Write>(args: &Args, store: &S, out: &mut W) -> Result<()> {
    let plan = args.plan()?;
    run(store, &plan, out).await
}

pub async fn run<S: FileStore, W: Write>(store: &S, plan: &Plan, out: &mut W) -> Result<()> {
    let records = store.list().await?;
    let fetched = records.len();
    let selected = select(records, &plan.selection, plan.limit);
    tracing::info!(fetched, selected = selected.len(), "selected files");

    if selected.is_empty() {
        tracing::info!("no files matched the selection");
        return Ok(());
    }

    match plan.action {
        Action::Show if plan.table => show_table(&selected, &Local, out),
        Action::Show => show(&selected, &Local, out),
        Action::Delete => delete(store, &selected, out).await,
    }
}

fn show<Tz, W>(records: &[FileRecord], tz: &Tz, out: &mut W) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    W: Write,
{
    for record in records {
        writeln!(out, "{}:", record.filename)?;
        writeln!(out, "  ID: {}", record.id)?;
        writeln!(out, "  File Size: {}", record.bytes)?;
        writeln!(out, "  Created At: {}", record.created_at_in(tz))?;
    }
    Ok(())
}

fn show_table<Tz, W>(records: &[FileRecord], tz: &Tz, out: &mut W) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    W: Write,
{
    let table = records
        .iter()
        .map(|record| {
            vec![
                record.id.as_str().cell(),
                record.filename.as_str().cell(),
                record.purpose.as_deref().unwrap_or("-").cell(),
                ByteSize(record.bytes)
                    .to_string()
                    .cell()
                    .justify(Justify::Right),
                record.created_at_in(tz).cell(),
            ]
        })
        .collect::<Vec<_>>()
        .table()
        .title(vec![
            "ID".cell(),
            "FILENAME".cell(),
            "PURPOSE".cell(),
            "SIZE".cell(),
            "CREATED AT".cell(),
        ])
        .separator(
            Separator::builder()
                .column(None)
                .row(None)
                .title(None)
                .build(),
        )
        .border(Border::builder().build());
    writeln!(out, "{}", table.display()?)?;
    Ok(())
}

/// Deletes one file at a time. A file the service refuses to delete is
/// reported and skipped; request errors abort.
async fn delete<S: FileStore, W: Write>(
    store: &S,
    records: &[FileRecord],
    out: &mut W,
) -> Result<()> {
    for record in records {
        let status = store.delete(&record.id).await?;
        if status.deleted {
            tracing::debug!(id = %record.id, "file deleted");
            writeln!(out, "Deleted file: {}", record.filename)?;
        } else {
            tracing::warn!(id = %record.id, filename = %record.filename, "file not deleted");
            writeln!(out, "Failed to delete file: {}", record.filename)?;
        }
    }
    Ok(())
}
