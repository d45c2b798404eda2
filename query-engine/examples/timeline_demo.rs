//! Demo of joining two relations and scrolling the result.
//!
//! This example demonstrates:
//! - Building relations from raw text rows
//! - Static schema inference before execution
//! - Hash and theta joins over the same inputs
//! - Stepping backwards through results with a Timeline

use relalg_common::{ColumnType, Relation, Schema};
use relalg_engine::executor::{build_join, JoinKind};
use relalg_engine::{col, lit, Executor, Timeline, VolcanoIterator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut users = Relation::empty(Schema::from_pairs([
        ("user_id", ColumnType::Integer),
        ("name", ColumnType::String),
        ("active", ColumnType::Boolean),
    ])?);
    users.add_row(&[("user_id", "1"), ("name", "Alice"), ("active", "true")])?;
    users.add_row(&[("user_id", "2"), ("name", "Bob"), ("active", "false")])?;
    users.add_row(&[("user_id", "3"), ("name", "Charlie"), ("active", "true")])?;

    let mut orders = Relation::empty(Schema::from_pairs([
        ("buyer", ColumnType::Integer),
        ("total", ColumnType::Float),
    ])?);
    orders.add_row(&[("buyer", "1"), ("total", "19.99")])?;
    orders.add_row(&[("buyer", "3"), ("total", "5.25")])?;
    orders.add_row(&[("buyer", "1"), ("total", "42.0")])?;

    let hash = build_join(
        JoinKind::Hash {
            on: vec![("user_id".to_string(), "buyer".to_string())],
        },
        &users,
        &orders,
    )?;
    println!(
        "Joined columns: {:?}",
        hash.schema().column_names().collect::<Vec<_>>()
    );

    let mut timeline = Timeline::new(hash);
    timeline.open()?;
    println!("\nForward:");
    while let Some(tuple) = timeline.next()? {
        print_row(&tuple);
    }
    println!("\nBackward:");
    while let Ok(tuple) = timeline.previous() {
        print_row(&tuple);
    }
    timeline.close();

    let predicate = col("user_id")
        .eq(col("buyer"))
        .and(col("total").gt(lit(10.0)));
    let mut big_orders = build_join(JoinKind::Theta(predicate), &users, &orders)?;
    println!("\nOrders over 10:");
    big_orders.open()?;
    while let Some(tuple) = big_orders.next()? {
        print_row(&tuple);
    }
    big_orders.close();

    Ok(())
}

fn print_row(tuple: &relalg_common::Tuple) {
    let cells: Vec<String> = tuple.values().map(|v| v.to_string()).collect();
    println!("  {}", cells.join(" | "));
}
