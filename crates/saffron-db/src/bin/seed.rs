//! # Seed Data Loader
//!
//! Populates the database with a starter menu and floor plan.
//!
//! ## Usage
//! ```bash
//! # Seed ./saffron_dev.db (default)
//! cargo run -p saffron-db --bin seed
//!
//! # Specify database path
//! cargo run -p saffron-db --bin seed -- --db ./data/saffron.db
//! ```
//!
//! ## What Gets Loaded
//! - Categories (appetizers through smoothies)
//! - Menu items with prices
//! - Modifiers, linked to the menu sections they are offered on
//! - Tables T01..T12, VIP01, VIP02, BAR01
//!
//! Skips everything when menu items already exist.

use std::collections::HashMap;
use std::env;

use saffron_core::TableStatus;
use saffron_db::{Database, DbConfig};

/// Modifier groups: (group key, [(name, price delta in cents)])
const MODIFIERS: &[(&str, &[(&str, i64)])] = &[
    ("size", &[("Extra Large", 300), ("Large", 200), ("Small", -100)]),
    (
        "toppings",
        &[
            ("Extra Cheese", 150),
            ("Extra Bacon", 200),
            ("Avocado", 150),
            ("Fried Egg", 100),
            ("Mushrooms", 100),
            ("Gluten Free Bun", 150),
        ],
    ),
    ("veggies", &[("Jalapeños", 50), ("Onions", 0), ("Tomatoes", 0), ("Lettuce", 0)]),
    (
        "protein",
        &[("Extra Chicken", 350), ("Extra Beef", 400), ("Grilled Shrimp", 500), ("Salmon", 550)],
    ),
    (
        "sauce",
        &[
            ("BBQ Sauce", 0),
            ("Ranch Dressing", 0),
            ("Hot Sauce", 0),
            ("Garlic Aioli", 50),
            ("Truffle Mayo", 100),
        ],
    ),
    (
        "drink",
        &[
            ("Extra Shot Espresso", 75),
            ("Almond Milk", 60),
            ("Oat Milk", 60),
            ("Sugar Free", 0),
            ("Extra Ice", 0),
            ("No Ice", 0),
            ("Whipped Cream", 50),
        ],
    ),
    (
        "cooking",
        &[("Well Done", 0), ("Medium", 0), ("Rare", 0), ("Extra Spicy", 0), ("Mild", 0)],
    ),
];

/// Menu sections: (category, offered modifier groups, [(item, price in cents)])
const MENU: &[(&str, &[&str], &[(&str, i64)])] = &[
    (
        "Appetizers",
        &["sauce"],
        &[
            ("Chicken Wings", 899),
            ("Mozzarella Sticks", 799),
            ("Garlic Bread", 599),
            ("Calamari Rings", 1099),
            ("Spring Rolls", 699),
        ],
    ),
    (
        "Main Courses",
        &["cooking", "sauce"],
        &[
            ("Grilled Salmon", 1899),
            ("Ribeye Steak", 2499),
            ("Grilled Chicken Breast", 1499),
            ("BBQ Ribs", 1999),
            ("Fish and Chips", 1399),
        ],
    ),
    (
        "Pasta & Rice",
        &["protein"],
        &[
            ("Spaghetti Carbonara", 1299),
            ("Fettuccine Alfredo", 1199),
            ("Penne Arrabbiata", 1099),
            ("Seafood Paella", 1699),
            ("Chicken Fried Rice", 999),
        ],
    ),
    (
        "Pizza",
        &["size", "veggies"],
        &[
            ("Margherita Pizza", 1199),
            ("Pepperoni Pizza", 1399),
            ("Hawaiian Pizza", 1399),
            ("Quattro Formaggi", 1499),
        ],
    ),
    (
        "Burgers & Sandwiches",
        &["toppings", "veggies", "sauce"],
        &[
            ("Classic Beef Burger", 1099),
            ("Cheeseburger", 1199),
            ("Bacon Burger", 1299),
            ("Veggie Burger", 999),
            ("Club Sandwich", 1199),
        ],
    ),
    (
        "Salads",
        &["protein", "sauce"],
        &[("Caesar Salad", 899), ("Greek Salad", 999), ("Garden Salad", 799)],
    ),
    (
        "Desserts",
        &[],
        &[
            ("Chocolate Lava Cake", 699),
            ("Tiramisu", 799),
            ("New York Cheesecake", 699),
            ("Apple Pie", 599),
        ],
    ),
    (
        "Hot Drinks",
        &["drink", "size"],
        &[
            ("Espresso", 299),
            ("Cappuccino", 399),
            ("Latte", 449),
            ("Americano", 349),
            ("Green Tea", 299),
        ],
    ),
    (
        "Cold Drinks",
        &["drink", "size"],
        &[("Iced Coffee", 449), ("Iced Latte", 499), ("Iced Tea", 349), ("Lemonade", 399)],
    ),
    (
        "Soft Drinks",
        &[],
        &[("Coca Cola", 249), ("Sprite", 249), ("Sparkling Water", 299)],
    ),
    (
        "Smoothies & Juices",
        &["size"],
        &[("Strawberry Smoothie", 599), ("Mango Smoothie", 599), ("Orange Juice", 399)],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./saffron_dev.db");

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
                println!("Saffron POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./saffron_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Saffron POS Seed Data Loader");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count_menu_items().await?;
    if existing > 0 {
        println!("⚠ Database already has {} menu items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = db.catalog();

    // Modifiers first so menu items can link to them
    let mut groups: HashMap<&str, Vec<String>> = HashMap::new();
    let mut modifier_count = 0;
    for (group, modifiers) in MODIFIERS {
        for (name, price_change_cents) in modifiers.iter() {
            let modifier = catalog.insert_modifier(name, *price_change_cents).await?;
            groups.entry(group).or_default().push(modifier.id);
            modifier_count += 1;
        }
    }
    println!("✓ {} modifiers", modifier_count);

    let mut item_count = 0;
    for (category_name, offered, items) in MENU {
        let category = catalog.insert_category(category_name).await?;

        for (name, price_cents) in items.iter() {
            let item = catalog
                .insert_menu_item(&category.id, name, None, *price_cents, true)
                .await?;

            for group in offered.iter() {
                for modifier_id in groups.get(group).into_iter().flatten() {
                    catalog.link_modifier(&item.id, modifier_id).await?;
                }
            }
            item_count += 1;
        }
    }
    println!("✓ {} categories, {} menu items", MENU.len(), item_count);

    let tables = db.tables();
    if tables.count().await? == 0 {
        let numbers = (1..=12)
            .map(|n| format!("T{:02}", n))
            .chain(["VIP01", "VIP02", "BAR01"].map(String::from));

        let mut table_count = 0;
        for number in numbers {
            tables.insert(&number, TableStatus::Available).await?;
            table_count += 1;
        }
        println!("✓ {} tables", table_count);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
