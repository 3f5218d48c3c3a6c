//! Basic usage example
//!
//! This example demonstrates the core API:
//! - Opening a database
//! - Inserting with a reused, rebound prepared statement inside a transaction
//! - Mapping rows into a struct
//! - Extracting a single typed column
//!
//! Run with: cargo run --example basic_usage

use rust_sqlite_access::prelude::*;

#[derive(Debug)]
struct Player {
    id: i64,
    name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Rust SQLite Access - Basic Usage Example ===\n");

    println!("1. Opening database...");
    let conn = Connection::open_in_memory()?;
    println!("   ✓ Opened {}\n", conn.path());

    println!("2. Creating tables...");
    conn.execute(
        "CREATE TABLE IF NOT EXISTS players (id INTEGER PRIMARY KEY, name TEXT);
         CREATE TABLE IF NOT EXISTS ships (id INTEGER PRIMARY KEY, type TEXT, speed REAL);",
    )?;
    println!("   ✓ Tables created\n");

    println!("3. Inserting players in a transaction...");
    {
        let tx = TransactionGuard::begin(&conn)?;
        let mut insert = conn.prepare("INSERT INTO players (name) VALUES (:name)")?;
        for name in ["Alice", "Bob", "Charlie"] {
            insert.bind_named(":name", name)?;
            insert.execute()?;
            println!("   ✓ Inserted {} (id {})", name, conn.last_insert_rowid());
        }
        tx.commit()?;
    }
    println!();

    println!("4. Inserting ships with positional parameters...");
    let mut insert = conn.prepare("INSERT INTO ships (type, speed) VALUES (?1, ?2)")?;
    for (kind, speed) in [("frigate", 12.5), ("cruiser", 9.0), ("scout", 21.75)] {
        insert.bind_values([DatabaseValue::from(kind), DatabaseValue::from(speed)])?;
        insert.execute()?;
    }
    println!("   ✓ Ships inserted\n");

    println!("5. Mapping rows into structs...");
    let mut select = conn.prepare("SELECT id, name FROM players ORDER BY id")?;
    let players = select.map_rows(|row| {
        Ok(Player {
            id: row.get_int(0),
            name: row.get_text(1),
        })
    })?;
    for p in &players {
        println!("   {}: {}", p.id, p.name);
    }
    println!();

    println!("6. Streaming rows with the step cursor...");
    let mut fast = conn.prepare("SELECT type, speed FROM ships WHERE speed > ?1 ORDER BY speed")?;
    fast.bind(1, 10.0)?;
    while fast.step()? {
        println!("   • {} ({:.2} knots)", fast.get_text(0), fast.get_double(1));
    }
    fast.reset();
    println!();

    println!("7. Extracting single columns...");
    let mut names = conn.prepare("SELECT name FROM players ORDER BY id")?;
    println!("   Names:  {:?}", names.column::<String>(0)?);
    let mut speeds = conn.prepare("SELECT speed FROM ships ORDER BY id")?;
    println!("   Speeds: {:?}", speeds.column::<f64>(0)?);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
