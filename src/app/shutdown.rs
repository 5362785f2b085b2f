//! Interrupt handling and background task shutdown.

use log::warn;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `interrupt` on Ctrl-C.
///
/// The watcher exits without touching `interrupt` once `stop` is cancelled.
/// The process-wide Ctrl-C handler it installs cannot be removed, so after
/// `stop` a Ctrl-C no longer terminates the process: report writing always
/// runs to completion.
pub fn spawn_interrupt_watcher(
    interrupt: CancellationToken,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => {
                        warn!("Interrupted, finishing with the results collected so far");
                        interrupt.cancel();
                    }
                    Err(e) => warn!("Unable to listen for Ctrl-C: {e}"),
                }
            }
            _ = stop.cancelled() => {}
        }
    })
}

/// Stops the background tasks watching `stop` and waits for them.
///
/// Ctrl-C stays caught afterwards; see [`spawn_interrupt_watcher`].
pub async fn shutdown_gracefully(stop: CancellationToken, tasks: Vec<JoinHandle<()>>) {
    stop.cancel();
    for task in tasks {
        let _ = task.await;
    }
}
