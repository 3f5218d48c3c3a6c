//! Whole-string query facade example
//!
//! This example demonstrates the `DbConnect` facade:
//! - Running raw SQL strings
//! - Materializing results and walking them with `fetch_array`
//! - Escaping user input with `sql_escape`
//! - Dropping down to prepared statements through `database()`
//!
//! Run with: cargo run --example legacy_api

use rust_sqlite_access::facade::{sql_escape, DbConnect, QueryResults};
use rust_sqlite_access::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Rust SQLite Access - Facade Example ===\n");

    let db = DbConnect::from_connection(Connection::open_in_memory()?);

    println!("1. Creating and filling the users table...");
    db.query("CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")?;
    db.query("INSERT INTO users (name, age) VALUES ('Alice', 30)")?;
    db.query("INSERT INTO users (name, age) VALUES ('Bob', 25)")?;
    db.query("INSERT INTO users (name, age) VALUES ('Charlie', 35)")?;
    println!("   ✓ Last inserted row id: {}\n", db.last_rowid());

    println!("2. Querying into a result set...");
    let mut results = QueryResults::new();
    if !db.query_into(&mut results, "SELECT * FROM users WHERE age > 25") {
        println!("   ✗ Query failed: {}", results.error_message);
    }
    println!(
        "   Found {} rows with {} fields {:?}\n",
        results.num_rows, results.num_fields, results.fields
    );

    println!("3. Walking rows with fetch_array...");
    while let Some(row) = db.fetch_array(&mut results) {
        println!("   ID: {}, Name: {}, Age: {}", row["id"], row["name"], row["age"]);
    }
    println!();

    println!("4. Iterating the materialized rows directly...");
    for row in &results.results {
        println!("   ID: {}, Name: {}, Age: {}", row["id"], row["name"], row["age"]);
    }
    println!();

    println!("5. Escaping user input...");
    let unsafe_input = "O'Brien";
    let safe = sql_escape(unsafe_input);
    println!("   Original: {}", unsafe_input);
    println!("   Escaped:  {}", safe);
    db.query(&format!(
        "INSERT INTO users (name, age) VALUES ('{}', 40)",
        safe
    ))?;
    println!("   ✓ Inserted with id {}\n", db.last_rowid());

    println!("6. Reporting a failed query...");
    let mut failed = QueryResults::new();
    if !db.query_into(&mut failed, "SELECT * FROM nonexistent_table") {
        println!("   ✗ {}\n", failed.error_message);
    }

    println!("7. Checking tables...");
    println!(
        "   Table 'users' exists: {}",
        if db.does_table_exist("users") { "yes" } else { "no" }
    );
    println!(
        "   Table 'foo' exists: {}\n",
        if db.does_table_exist("foo") { "yes" } else { "no" }
    );

    println!("8. Mixing with prepared statements...");
    let mut count = db.database().prepare("SELECT COUNT(*) FROM users")?;
    if count.step()? {
        println!("   Total users: {}", count.get_int(0));
    }
    count.reset();

    let mut older = db.database().prepare("SELECT name FROM users WHERE age >= :age ORDER BY age")?;
    older.bind_named(":age", 35)?;
    println!("   Aged 35 or more: {:?}", older.column::<String>(0)?);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
