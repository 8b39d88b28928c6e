//! # Seed Data Generator
//!
//! Populates a development database with a small menu and a few prepaid
//! customers so the purchase flow can be exercised end to end.
//!
//! ## Usage
//! ```bash
//! # Seed ./canteen_dev.db (default)
//! cargo run -p canteen-db --bin seed
//!
//! # Specify database path
//! cargo run -p canteen-db --bin seed -- --db ./data/canteen.db
//! ```
//!
//! ## Seeded Data
//! - Menu items with fixed ids (10..), spread over food/drink/misc
//! - Customers CARD-001..CARD-003 with topped-up balances
//!
//! Seeding is skipped when the database already holds items or customers, so
//! repeated runs never create duplicates. Delete the file to regenerate.

use std::env;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use canteen_core::{ItemCategory, Money, NewCustomer, NewItem};
use canteen_db::{Database, DbConfig};

/// Menu fixtures: (fixed id, category, name, price in minor units, stock).
const MENU: &[(i64, ItemCategory, &str, i64, i64)] = &[
    (10, ItemCategory::Food, "Beef Noodles", 12000, 40),
    (11, ItemCategory::Food, "Spring Rolls", 12000, 60),
    (12, ItemCategory::Food, "Fried Rice", 10000, 50),
    (13, ItemCategory::Food, "Banh Mi", 8000, 30),
    (20, ItemCategory::Drink, "Iced Tea", 4000, 100),
    (21, ItemCategory::Drink, "Soda", 6000, 80),
    (22, ItemCategory::Drink, "Fresh Juice", 9000, 40),
    (30, ItemCategory::Misc, "Instant Noodle Cup", 5000, 70),
    (31, ItemCategory::Misc, "Yogurt", 7000, 45),
];

/// Customer fixtures: (card id, name, type, opening balance in minor units).
const CUSTOMERS: &[(&str, &str, &str, i64)] = &[
    ("CARD-001", "An Nguyen", "student", 50000),
    ("CARD-002", "Binh Tran", "student", 20000),
    ("CARD-003", "Chi Le", "staff", 100000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./canteen_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Canteen POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./canteen_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %db_path, "Connecting to database");
    let db = Database::new(DbConfig::new(&db_path)).await?;
    info!("Connected, migrations applied");

    let existing_items = db.catalog().count().await?;
    let existing_customers = db.customers().count().await?;
    if existing_items > 0 || existing_customers > 0 {
        warn!(
            items = existing_items,
            customers = existing_customers,
            "Database already seeded; skipping. Delete the file to regenerate."
        );
        return Ok(());
    }

    info!("Seeding menu items");
    for (id, category, name, price, stock) in MENU {
        db.catalog()
            .insert_with_id(
                *id,
                &NewItem {
                    category: *category,
                    name: (*name).to_string(),
                    price: Money::from_minor(*price),
                    description: String::new(),
                    stock: *stock,
                },
            )
            .await?;
    }

    info!("Registering customers");
    for (id, name, customer_type, balance) in CUSTOMERS {
        db.customers()
            .insert(&NewCustomer {
                id: (*id).to_string(),
                name: (*name).to_string(),
                customer_type: (*customer_type).to_string(),
            })
            .await?;
        db.customers()
            .top_up(id, Money::from_minor(*balance))
            .await?;
    }

    info!(
        items = MENU.len(),
        customers = CUSTOMERS.len(),
        "Seed complete"
    );

    Ok(())
}
