//! # Demo: flaky_fetch
//!
//! Retries a blocking operation that fails twice before succeeding, with
//! exponential backoff and a hook that fires on every transient failure.
//!
//! ## Run
//! ```bash
//! cargo run --example flaky_fetch
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use retrier::{hook, Backoff, Hooks, Jitter, Retrier};

static CALLS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
enum FetchError {
    Transient(String),
    Permanent(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transient(m) => write!(f, "transient: {m}"),
            FetchError::Permanent(m) => write!(f, "permanent: {m}"),
        }
    }
}

fn fetch() -> Result<&'static str, FetchError> {
    let call = CALLS.fetch_add(1, Ordering::Relaxed) + 1;
    println!("[fetch] attempt {call}");
    if call <= 2 {
        Err(FetchError::Transient(format!("connection reset #{call}")))
    } else {
        Ok("payload")
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let retrier: Retrier<&'static str, FetchError> = Retrier::builder()
        .name("flaky-fetch")
        .retries(4)
        .retry_if(|e: &FetchError| matches!(e, FetchError::Transient(_)))
        .backoff(
            Backoff::exponential(Duration::from_millis(100))
                .with_jitter(Jitter::Uniform(Duration::from_millis(25)))
                .with_max(Duration::from_secs(2)),
        )
        .hooks(Hooks::any(hook(|| println!("[hook] transient failure, alerting"))))
        .build()?;

    let payload = retrier.execute(fetch)?;
    println!("[main] got {payload:?} after {} calls", CALLS.load(Ordering::Relaxed));

    // A permanent failure is rejected on the spot, no retries.
    let out = retrier.execute(|| Err::<&'static str, _>(FetchError::Permanent("bad creds".into())));
    println!("[main] permanent failure outcome: {}", out.unwrap_err());

    Ok(())
}
