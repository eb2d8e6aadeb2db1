//! Output formatting module

use lotsync_domain::model::RunSummary;
use lotsync_types::{Lot, OutputFormat, Result, Vehicle};

pub fn output_run_summary(output_format: OutputFormat, summary: &RunSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(summary)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nImport Result");
    println!("=============");
    println!("Acquired:   {}", if summary.acquired { "Yes" } else { "No (cached)" });
    if !summary.processed {
        println!("Processing skipped");
        return Ok(());
    }
    println!("Records:    {}", summary.records);

    if summary.commits.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{:<32} {:>8} {:>8} {:>8} {:>10}",
        "Lot", "Created", "Updated", "Deleted", "Unaltered"
    );
    println!("{}", "-".repeat(70));
    for commit in &summary.commits {
        println!(
            "{:<32} {:>8} {:>8} {:>8} {:>10}",
            truncate(&commit.lot.to_string(), 32),
            commit.created,
            commit.updated,
            commit.deleted,
            commit.unaltered
        );
    }
    println!("{}", "-".repeat(70));
    println!(
        "{:<32} {:>8} {:>8} {:>8} {:>10}",
        "Total",
        summary.created(),
        summary.updated(),
        summary.deleted(),
        summary.unaltered()
    );

    Ok(())
}

pub fn output_inventory(output_format: OutputFormat, vehicles: &[Vehicle]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(vehicles)?;
        println!("{}", content);
        return Ok(());
    }

    if vehicles.is_empty() {
        println!("No vehicles found");
        return Ok(());
    }

    println!(
        "{:>6} {:<5} {:<18} {:<10} {:>5} {:<24} {:>10} {:<17}",
        "ID", "Lot", "VIN", "Stock", "Year", "Vehicle", "Price", "Modified"
    );
    println!("{}", "-".repeat(102));
    for v in vehicles {
        let name = format!("{} {}", v.feed.make, v.feed.model);
        println!(
            "{:>6} {:<5} {:<18} {:<10} {:>5} {:<24} {:>10.2} {:<17}",
            v.id.map(|id| id.to_string()).unwrap_or_default(),
            v.lot.lot_type.to_string(),
            v.key().vin().unwrap_or("-"),
            v.key().stock().unwrap_or("-"),
            v.feed.year,
            truncate(&name, 24),
            v.feed.price,
            v.last_modified.format("%Y-%m-%d %H:%M").to_string()
        );
    }
    println!("\n{} vehicle(s)", vehicles.len());

    Ok(())
}

pub fn output_lots(output_format: OutputFormat, lots: &[Lot]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(lots)?;
        println!("{}", content);
        return Ok(());
    }

    if lots.is_empty() {
        println!("No inventory stored");
        return Ok(());
    }

    println!("{:>8} {:<5} {}", "Dealer", "Type", "Name");
    println!("{}", "-".repeat(40));
    for lot in lots {
        println!("{:>8} {:<5} {}", lot.dealer_id, lot.lot_type.to_string(), lot.dealer_name);
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
