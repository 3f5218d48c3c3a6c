//! Transaction example
//!
//! This example demonstrates transaction management including:
//! - Committing changes
//! - Rolling back on errors
//! - Automatic rollback when a guard is dropped
//! - The closure-based `transaction` helper
//!
//! Run with: cargo run --example transactions

use rust_sqlite_access::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Rust SQLite Access - Transaction Example ===\n");

    let conn = Connection::open_in_memory()?;

    println!("1. Setting up accounts table...");
    conn.execute(
        "CREATE TABLE accounts (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            balance REAL NOT NULL CHECK(balance >= 0)
        )",
    )?;

    let mut insert = conn.prepare("INSERT INTO accounts (id, name, balance) VALUES (?, ?, ?)")?;
    for (id, name, balance) in [(1, "Alice", 1000.0), (2, "Bob", 500.0), (3, "Charlie", 750.0)] {
        insert.bind(1, id)?;
        insert.bind(2, name)?;
        insert.bind(3, balance)?;
        insert.execute()?;
    }
    println!("   ✓ Accounts created\n");

    print_balances(&conn)?;

    // Example 1: Successful transaction
    println!("\n2. Example 1: Successful transaction (Alice -> Bob: $100)");
    let tx = TransactionGuard::begin(&conn)?;
    match transfer(&conn, 1, 2, 100.0) {
        Ok(()) => {
            tx.commit()?;
            println!("   ✓ Transaction committed");
        }
        Err(e) => {
            tx.rollback()?;
            println!("   ✗ Transaction rolled back: {}", e);
        }
    }
    print_balances(&conn)?;

    // Example 2: Failed transaction (CHECK constraint)
    println!("\n3. Example 2: Failed transaction (Bob -> Alice: $1000 - insufficient funds)");
    let tx = TransactionGuard::begin(&conn)?;
    match transfer(&conn, 2, 1, 1000.0) {
        Ok(()) => {
            tx.commit()?;
            println!("   ✓ Transaction committed");
        }
        Err(e) => {
            tx.rollback()?;
            println!("   ✗ Transaction rolled back: {}", e);
        }
    }
    print_balances(&conn)?;

    // Example 3: Guard dropped by an early return
    println!("\n4. Example 3: Early return inside a transaction");
    if let Err(e) = rotate_funds(&conn) {
        println!("   ✗ {} - guard rolled back automatically", e);
    }
    print_balances(&conn)?;

    // Example 4: Closure helper
    println!("\n5. Example 4: Multiple operations with Database::transaction");
    let moved = conn.transaction(|c| {
        transfer(c, 1, 2, 50.0)?;
        transfer(c, 2, 3, 100.0)?;
        transfer(c, 3, 1, 25.0)?;
        Ok(175.0)
    })?;
    println!("   ✓ Moved ${:.2} in one transaction", moved);
    print_balances(&conn)?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

/// Transfer money between accounts
fn transfer(conn: &Connection, from_id: i64, to_id: i64, amount: f64) -> Result<()> {
    let mut withdraw = conn.prepare("UPDATE accounts SET balance = balance - ?1 WHERE id = ?2")?;
    withdraw.bind_values([DatabaseValue::from(amount), DatabaseValue::from(from_id)])?;
    withdraw.execute()?;
    if conn.changes() == 0 {
        return Err(DatabaseError::config(format!("no account with id {}", from_id)));
    }

    let mut deposit = conn.prepare("UPDATE accounts SET balance = balance + ?1 WHERE id = ?2")?;
    deposit.bind_values([DatabaseValue::from(amount), DatabaseValue::from(to_id)])?;
    deposit.execute()?;

    Ok(())
}

/// Chained transfers where a later one fails; `?` leaves the guard pending
fn rotate_funds(conn: &Connection) -> Result<()> {
    let tx = TransactionGuard::begin(conn)?;
    transfer(conn, 3, 1, 10.0)?;
    transfer(conn, 1, 99, 10.0)?;
    transfer(conn, 99, 3, 10.0)?;
    tx.commit()
}

/// Print all account balances
fn print_balances(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("SELECT name, balance FROM accounts ORDER BY id")?;
    println!("   Current balances:");
    stmt.for_each_row(|row| {
        println!("   - {}: ${:.2}", row.get_text(0), row.get_double(1));
        Ok(())
    })?;
    Ok(())
}
