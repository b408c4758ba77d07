//! # Example: slow_subscriber
//!
//! Demonstrates slow-consumer eviction in a [`BroadcastSource`].
//!
//! Shows how to:
//! - Subscribe several readers with their own bounded feeds
//! - Publish without ever blocking the producer
//! - Observe a reader that cannot keep up being evicted (its feed ends)
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► source (capacity 4)
//!   ├─► reader "eager": drains as fast as possible
//!   ├─► reader "sleepy": 30ms per update, falls behind
//!   ├─► producer: 40 updates, 5ms apart
//!   └─► close(): remaining feeds end, readers report totals
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=incsignal=debug cargo run --example slow_subscriber
//! ```

use std::time::Duration;

use incsignal::{BroadcastSource, Feed, SourceConfig};
use tracing_subscriber::EnvFilter;

async fn read(name: &'static str, mut feed: Feed<u32>, pause: Duration) -> usize {
    let mut received = 0;
    while let Some(v) = feed.recv().await {
        received += 1;
        println!("[{name}] got {v}");
        tokio::time::sleep(pause).await;
    }
    println!("[{name}] feed ended after {received} updates");
    received
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source = BroadcastSource::with_config(SourceConfig { capacity: 4 });

    let (_, eager) = source.subscribe();
    let (_, sleepy) = source.subscribe();
    let eager = tokio::spawn(read("eager", eager, Duration::ZERO));
    let sleepy = tokio::spawn(read("sleepy", sleepy, Duration::from_millis(30)));

    for i in 0..40 {
        source.update(i)?;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    println!("active subscribers before close: {}", source.subscriber_count());
    source.close();

    println!("eager={} sleepy={}", eager.await?, sleepy.await?);
    Ok(())
}
