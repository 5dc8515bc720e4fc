//! Merged Producers Example
//!
//! Two Tokio tasks feed one channel, so the order in which their values
//! arrive is not deterministic. The probe records whatever order the
//! runtime produces and `has_value_set` checks the values without caring
//! about it.
//!
//! Run with:
//!
//! ```text
//! cargo run --example merged
//! ```

use std::time::Duration;

use rxprobe::{StreamError, assert_that, sources};
use tokio::{runtime::Handle, sync::mpsc};
use tokio_stream::wrappers::ReceiverStream;

#[tokio::main]
async fn main() -> rxprobe::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (tx, rx) = mpsc::channel::<Result<u32, StreamError>>(16);
    for offset in [0, 100] {
        let tx = tx.clone();
        tokio::spawn(async move {
            for i in 0..5 {
                tokio::time::sleep(Duration::from_millis(i % 3)).await;
                if tx.send(Ok(offset + i as u32)).await.is_err() {
                    return;
                }
            }
        });
    }
    // The stream ends once both producers dropped their senders.
    drop(tx);

    let probe = rxprobe::attach(sources::from_stream(
        ReceiverStream::new(rx),
        Handle::current(),
    ));

    assert_that(&probe)
        .settle()
        .within(Duration::from_secs(2))
        .await?
        .has_no_errors()?
        .has_value_count(10)?
        .has_value_set([0, 1, 2, 3, 4, 100, 101, 102, 103, 104])?
        .are_exactly(5, |v| *v >= 100)?
        .is_complete()?;

    assert_that(&probe).dump();
    Ok(())
}
