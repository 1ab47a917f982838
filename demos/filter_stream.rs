//! Order processing demo for the stream pipeline
//!
//! Pipeline:
//! 1. Observe: log every order that is visited
//! 2. Distinct: one order per customer
//! 3. Filter: keep orders above a minimum amount
//! 4. Map: render a summary line
//! 5. Limit: stop after the first three matches
//!
//! Usage: RUST_LOG=debug cargo run --example filter_stream

use seq_stream::{map_stream, SyncList, WorkQueue};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Order {
    id: u32,
    customer: u64,
    amount_cents: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    // Orders arrive from several producers into a shared list
    let orders = SyncList::new();
    let mut producers = WorkQueue::new(2)?;
    for producer in 0..4u32 {
        let orders = orders.clone();
        producers.add_task(move || {
            for n in 0..10u32 {
                let id = producer * 100 + n;
                orders.add(Order {
                    id,
                    customer: u64::from(id % 7),
                    amount_cents: u64::from(id % 13) * 250,
                });
            }
        });
    }
    producers.run()?;
    info!(orders = orders.size(), "orders received");

    let snapshot = orders.to_simple_list();
    let (summaries, stats) = map_stream(snapshot.as_slice())
        .map(|o: &Order| {
            format!(
                "order {} customer {} ${:.2}",
                o.id,
                o.customer,
                o.amount_cents as f64 / 100.0
            )
        })
        .observe(|index, order| info!(index, id = order.id, "visiting order"))
        .distinct(|order| order.customer as i64)
        .filter(|order| order.amount_cents >= 1_000)
        .limit(3)
        .collect_with_stats();

    println!("=== Selected Orders ===");
    for line in &summaries {
        println!("{line}");
    }
    println!(
        "\nVisited: {}, Accepted: {}, Rejected: {}, Early exit: {}",
        stats.visited, stats.accepted, stats.rejected, stats.early_exit
    );
    println!("Queue: {}", producers.metrics().snapshot().format());

    Ok(())
}
