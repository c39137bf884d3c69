//! # Demo: cancel_during_backoff
//!
//! Runs the suspending retrier against an operation that never succeeds,
//! then cancels the invocation while it waits between attempts. The loop
//! aborts immediately with a cancellation outcome; the exhaustion
//! disposition is never consulted.
//!
//! ## Run
//! ```bash
//! cargo run --example cancel_during_backoff
//! ```

use std::time::Duration;

use retrier::{async_hook, AsyncHooks, AsyncRetrier, Backoff};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let retrier: AsyncRetrier<(), String> = AsyncRetrier::builder()
        .name("doomed-probe")
        .unbounded()
        .backoff(Backoff::constant(Duration::from_secs(5)))
        .hooks(AsyncHooks::any(async_hook(|| async {
            println!("[hook] probe failed, scheduling another attempt");
        })))
        .build()?;

    let token = CancellationToken::new();
    let canceler = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        println!("[main] canceling while the retrier waits");
        canceler.cancel();
    });

    let out = retrier
        .execute_cancellable(&token, || async {
            println!("[probe] still down");
            Err::<(), _>("endpoint unreachable".to_string())
        })
        .await;

    println!("[main] outcome: {}", out.unwrap_err());
    Ok(())
}
