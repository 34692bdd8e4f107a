//! # Seed Data Generator
//!
//! Populates the database with laptop stock (and a few sales) for development.
//!
//! ## Usage
//! ```bash
//! # Add 40 batches of stock (default)
//! cargo run -p laptrack-db --bin laptrack-seed
//!
//! # Custom amount, plus 10 sales
//! cargo run -p laptrack-db --bin laptrack-seed -- --count 100 --sales 10
//!
//! # Specify database path
//! cargo run -p laptrack-db --bin laptrack-seed -- --db ./data/laptrack.db
//! ```
//!
//! Each batch is 1-4 identical units, so the inventory view shows real
//! groups. Every fourth model repeats an earlier batch's attributes at the
//! same cost so that batches added at different times merge into one group.

use chrono::{Duration, Utc};
use clap::Parser;
use laptrack_core::{group_units, settle, Condition, Money, UnitDraft};
use laptrack_db::{Database, DbConfig};

/// (brand, model, processor, graphics card)
const MODELS: &[(&str, &str, &str, Option<&str>)] = &[
    ("Dell", "Latitude 7420", "Intel Core i7-1185G7", None),
    ("Dell", "XPS 13 9310", "Intel Core i7-1165G7", None),
    ("Dell", "Precision 5550", "Intel Core i7-10850H", Some("NVIDIA Quadro T2000")),
    ("HP", "EliteBook 840 G8", "Intel Core i5-1135G7", None),
    ("HP", "ZBook Firefly 14", "Intel Core i7-1165G7", Some("NVIDIA T500")),
    ("HP", "ProBook 450 G7", "Intel Core i5-10210U", None),
    ("Lenovo", "ThinkPad T14 Gen 2", "AMD Ryzen 5 PRO 5650U", None),
    ("Lenovo", "ThinkPad X1 Carbon Gen 9", "Intel Core i7-1165G7", None),
    ("Lenovo", "Legion 5", "AMD Ryzen 7 5800H", Some("NVIDIA RTX 3060")),
    ("Apple", "MacBook Air M1", "Apple M1", None),
    ("Apple", "MacBook Pro 14", "Apple M1 Pro", None),
    ("Asus", "ZenBook 14", "AMD Ryzen 7 5700U", None),
    ("Asus", "ROG Zephyrus G14", "AMD Ryzen 9 5900HS", Some("NVIDIA RTX 3060")),
    ("Acer", "Swift 3", "Intel Core i5-1135G7", None),
];

const RAM_SIZES: &[u32] = &[8, 16, 32];

const STORAGE: &[&str] = &["256GB SSD", "512GB SSD", "1TB SSD"];

/// Populates a LapTrack database with development data.
#[derive(Debug, Parser)]
#[command(name = "laptrack-seed", about = "LapTrack Seed Data Generator")]
struct SeedArgs {
    /// Number of stock batches to add
    #[arg(short, long, default_value_t = 40)]
    count: usize,

    /// Number of sales to record afterwards
    #[arg(short, long, default_value_t = 0)]
    sales: usize,

    /// Database file path
    #[arg(short, long, default_value = "./laptrack_dev.db")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let SeedArgs {
        count,
        sales,
        db: db_path,
    } = SeedArgs::parse();

    println!("🌱 LapTrack Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Batches:  {}", count);
    println!("Sales:    {}", sales);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.stock().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} units in stock", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Adding stock...");

    let start = std::time::Instant::now();
    // Spread batches over the last `count` hours, oldest first.
    let base = Utc::now() - Duration::hours(count as i64);
    let mut units_added = 0;

    for n in 0..count {
        let draft = generate_draft(n);
        let quantity = 1 + (n % 4) as u32;
        let label = format!("{} {}", draft.brand, draft.model);

        let batch = match draft.into_batch(quantity, base + Duration::hours(n as i64)) {
            Ok(batch) => batch,
            Err(e) => {
                eprintln!("Invalid batch {}: {}", label, e);
                continue;
            }
        };

        match db.stock().add_units(&batch).await {
            Ok(stored) => units_added += stored.len(),
            Err(e) => eprintln!("Failed to add {}: {}", label, e),
        }
    }

    println!(
        "✓ Added {} units in {} batches ({:?})",
        units_added,
        count,
        start.elapsed()
    );

    if sales > 0 {
        println!();
        println!("Recording sales...");

        let mut recorded = 0;
        for n in 0..sales {
            let groups = group_units(&db.stock().list().await?);
            let Some(group) = groups.get(n % groups.len().max(1)) else {
                println!("  Stock exhausted after {} sales", recorded);
                break;
            };

            // Alternate between a markup and the odd loss-making sale.
            let cost = group.representative().buying_cost;
            let price = if n % 5 == 4 {
                Money::from_cents(cost.cents() * 9 / 10)
            } else {
                Money::from_cents(cost.cents() * 6 / 5)
            };

            let settlement = settle(group, 1, price, Utc::now())?;
            db.sales().commit_sale(&settlement).await?;
            recorded += 1;
        }

        println!("✓ Recorded {} sales", recorded);
    }

    let snapshot = db.load_snapshot().await?;
    let stats = snapshot.dashboard();
    println!();
    println!("Summary:");
    println!("  Groups in stock: {}", snapshot.groups().len());
    println!("  Units in stock:  {}", stats.stock_count);
    println!("  Stock value:     {}", stats.stock_value.format_with("₹"));
    println!("  Total profit:    {}", stats.total_profit.format_with("₹"));

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one batch's attributes from the batch index.
fn generate_draft(seed: usize) -> UnitDraft {
    // Every fourth batch reuses the attributes of the batch three before it.
    let variant = if seed % 4 == 3 { seed - 3 } else { seed };
    let (brand, model, processor, graphics_card) = MODELS[variant % MODELS.len()];

    let ram_gb = RAM_SIZES[variant % RAM_SIZES.len()];
    let storage = STORAGE[(variant / 2) % STORAGE.len()];
    let condition = if variant % 3 == 0 {
        Condition::New
    } else {
        Condition::Used
    };

    // ₹25,000 - ₹84,000 in steps of ₹1,000, plus a GPU premium
    let mut cost_rupees = 25_000 + ((variant * 7_919) % 60) as i64 * 1_000;
    if graphics_card.is_some() {
        cost_rupees += 15_000;
    }
    let buying_cost = Money::from_major_minor(cost_rupees, 0);

    UnitDraft {
        brand: brand.to_string(),
        model: model.to_string(),
        processor: processor.to_string(),
        ram_gb,
        storage: storage.to_string(),
        graphics_card: graphics_card.map(str::to_string),
        condition,
        buying_cost,
        target_selling_price: Some(Money::from_cents(buying_cost.cents() * 5 / 4)),
        image_url: None,
    }
}
