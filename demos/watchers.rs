//! # Example: watchers
//!
//! Several consumers follow one [`VersionClock`] at different speeds.
//!
//! Shows how to:
//! - Bump the clock from a producer task
//! - Follow it with independent [`Waiter`] cursors
//! - See bursts of bumps coalesce into one wakeup for a slow watcher
//! - Stop watchers with a [`CancellationToken`]
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► spawn producer: bump() in bursts of 3, every 50ms
//!   ├─► spawn watcher "fast": wait() and report every version
//!   ├─► spawn watcher "slow": wait(), then sleep 120ms (misses bursts)
//!   └─► after 500ms: cancel token, join all
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=incsignal=trace cargo run --example watchers
//! ```

use std::time::Duration;

use incsignal::{VersionClock, Waiter};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

async fn watch(
    name: &'static str,
    mut waiter: Waiter,
    pause: Duration,
    stop: CancellationToken,
) -> usize {
    let mut wakeups = 0;
    loop {
        let before = waiter.at();
        let seen = waiter.wait_or_cancel(&stop).await;
        if seen == before {
            break;
        }
        wakeups += 1;
        println!("[{name}] woke at {seen}");
        tokio::time::sleep(pause).await;
    }
    wakeups
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clock = VersionClock::new();
    let stop = CancellationToken::new();

    let producer = {
        let clock = clock.clone();
        let stop = stop.clone();
        tokio::spawn(async move {
            let mut bumps = 0;
            while !stop.is_cancelled() {
                for _ in 0..3 {
                    clock.bump();
                    bumps += 1;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            bumps
        })
    };

    let fast = tokio::spawn(watch("fast", clock.waiter(), Duration::ZERO, stop.clone()));
    let slow = tokio::spawn(watch(
        "slow",
        clock.waiter(),
        Duration::from_millis(120),
        stop.clone(),
    ));

    tokio::time::sleep(Duration::from_millis(500)).await;
    stop.cancel();

    let bumps = producer.await?;
    let fast = fast.await?;
    let slow = slow.await?;
    println!("bumps={bumps} fast_wakeups={fast} slow_wakeups={slow} final={}", clock.at());
    Ok(())
}
