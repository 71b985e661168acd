//! Output formatters for resolved price tables

use colored::*;
use precios_core::{Attempt, Resolution, Table};
use serde_json::json;

/// Print the table in human-readable aligned columns with a provenance
/// caption, the way the dashboard renders it.
pub fn print_human(resolution: &Resolution, table: &Table, query: &str) {
    if let Some(label) = &resolution.report_label {
        println!("{}", label.bold());
        println!();
    }

    if table.row_count() == 0 {
        if query.is_empty() {
            println!("{}", "The report contains no rows.".yellow());
        } else {
            println!("{}", format!("No products match {:?}.", query).yellow());
        }
    } else {
        let widths: Vec<usize> = table
            .columns()
            .iter()
            .map(|col| {
                col.cells
                    .iter()
                    .map(|c| c.display_text().chars().count())
                    .chain(std::iter::once(col.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header = table
            .columns()
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", col.name, width = *w))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", header.cyan().bold());

        for row in 0..table.row_count() {
            let line = table
                .row(row)
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell.display_text(), width = *w))
                .collect::<Vec<_>>()
                .join("  ");
            println!("{}", line);
        }
        println!();
        println!(
            "{} {} {}",
            format!("{}", table.row_count()).bold(),
            if table.row_count() == 1 { "row" } else { "rows" },
            if query.is_empty() {
                String::new()
            } else {
                format!("matching {:?}", query)
            }
        );
    }

    println!();
    println!(
        "{} {} ({})",
        "Source:".bold(),
        resolution.address,
        resolution.date
    );
}

/// Print the filtered table as JSON for machine consumption
pub fn print_json(resolution: &Resolution, table: &Table, query: &str) -> anyhow::Result<()> {
    let rows: Vec<serde_json::Value> = (0..table.row_count())
        .map(|i| {
            let mut object = serde_json::Map::new();
            for (col, cell) in table.columns().iter().zip(table.row(i)) {
                object.insert(col.name.clone(), serde_json::to_value(cell)?);
            }
            Ok(serde_json::Value::Object(object))
        })
        .collect::<anyhow::Result<_>>()?;

    let output = json!({
        "source": resolution.address,
        "date": resolution.date.to_string(),
        "report_label": resolution.report_label,
        "query": query,
        "rows": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Explain an exhausted resolution cycle: which dates were tried and why
/// each one failed.
pub fn print_exhausted(attempts: &[Attempt]) {
    eprintln!(
        "{}",
        "No report available for the requested window.".red().bold()
    );
    for attempt in attempts {
        eprintln!(
            "  {} {} — {} ({})",
            "tried".dimmed(),
            attempt.date,
            attempt.reason,
            attempt.detail
        );
    }
}
