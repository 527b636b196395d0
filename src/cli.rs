use std::io::Write;

use anyhow::{Context, Result, bail};

use crate::api::ProjectApi;
use crate::crud::list::{self, COLUMNS, EMPTY_PLACEHOLDER, TableRow};
use crate::crud::notice::{self, Operation};

/// Fetches every project and prints it as a table, or as pretty JSON.
pub async fn list(api: &dyn ProjectApi, json: bool, out: &mut impl Write) -> Result<()> {
    let projects = match api.list().await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!(error = %e, "failed to list projects");
            bail!(notice::failed(Operation::Load, &e).text);
        }
    };
    tracing::debug!(count = projects.len(), "projects fetched");

    if json {
        let body = serde_json::to_string_pretty(&projects).context("failed to encode projects")?;
        writeln!(out, "{body}")?;
        return Ok(());
    }

    let rendered: Vec<[String; 6]> = list::rows(&projects)
        .into_iter()
        .filter_map(|row| match row {
            TableRow::Project(row) => Some(row.cells().map(str::to_string)),
            TableRow::Placeholder => None,
        })
        .collect();

    if rendered.is_empty() {
        writeln!(out, "{EMPTY_PLACEHOLDER}")?;
        return Ok(());
    }

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for cells in &rendered {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, &COLUMNS.map(str::to_string), &widths)?;
    write_line(out, &widths.map(|w| "-".repeat(w)), &widths)?;
    for cells in &rendered {
        write_line(out, cells, &widths)?;
    }
    Ok(())
}

fn write_line(out: &mut impl Write, cells: &[String; 6], widths: &[usize; 6]) -> Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}
