use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rentcheck_rs::dataset::{self, DEFAULT_DATA_DIR, DataConfig};
use rentcheck_rs::pages::format_currency;
use rentcheck_rs::{ZipIndex, ZipLookup, affordability, lookup};

fn usage(program: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("  {} check <zip|rent> <salary>", program);
    eprintln!("      zip: 5-digit zip looked up in $DATA_DIR/zip_index.json");
    eprintln!("      rent: monthly rent in dollars");
    eprintln!("      salary: annual salary, commas allowed (e.g. 65,000)");
    eprintln!("  {} build-index <geo_dir> <output>", program);
    eprintln!("      build the zip index from per-state city files");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("rentcheck-rs");

    match args.get(1).map(String::as_str) {
        Some("check") if args.len() == 4 => check(&args[2], &args[3]).await,
        Some("build-index") if args.len() == 4 => {
            build_index(Path::new(&args[2]), Path::new(&args[3])).await
        }
        _ => usage(program),
    }
}

async fn check(place: &str, salary: &str) -> Result<()> {
    let Some(annual_salary) = affordability::parse_salary(salary) else {
        bail!("Salary '{}' is not a positive number", salary);
    };

    let (label, rent) = if place.len() == 5 && place.bytes().all(|b| b.is_ascii_digit()) {
        let config = DataConfig {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            zip_index_url: None,
        };
        let index = dataset::load_zip_index(&config.zip_index_path()).await?;
        match lookup(Some(&index), place) {
            ZipLookup::Found(record) => (
                format!("{} ({}, {})", record.city.to_uppercase(), record.zip, record.state_slug),
                record.rent,
            ),
            _ => bail!("LOCATION NOT FOUND: no rent data for zip {}", place),
        }
    } else {
        let rent = affordability::parse_rent(place)
            .with_context(|| format!("'{}' is neither a 5-digit zip nor a rent", place))?;
        ("Custom rent".to_string(), rent)
    };

    let Some(result) = affordability::evaluate(Some(annual_salary), Some(rent)) else {
        bail!("Rent must be greater than zero");
    };

    println!("Location: {}", label);
    println!("Average 2-Bed Rent: ${}/mo", format_currency(u64::from(rent)));
    println!(
        "Estimated take-home: ${}/mo",
        format_currency(result.monthly_net.round() as u64)
    );
    println!("Rent is {}% of your income.", result.percent_display());
    println!(
        "Affordable: {}",
        if result.is_affordable { "YES" } else { "NO" }
    );
    println!(
        "Salary typically needed to get approved: ${}/yr",
        format_currency(affordability::recommended_salary(rent))
    );

    Ok(())
}

async fn build_index(geo_dir: &Path, output: &Path) -> Result<()> {
    let states = dataset::load_states(geo_dir).await?;
    if states.is_empty() {
        bail!("No state files found in {}", geo_dir.display());
    }

    let index = ZipIndex::from_states(&states);
    let json = serde_json::to_string(index.entries()).context("Failed to serialize zip index")?;
    tokio::fs::write(output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Index created with {} zip codes from {} states.",
        index.len(),
        states.len()
    );
    println!("Saved to: {}", output.display());
    Ok(())
}
