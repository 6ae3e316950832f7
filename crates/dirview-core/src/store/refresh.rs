/// Periodic refresh — re-crawls the store on a fixed interval.
///
/// One named background thread waits on a `crossbeam_channel::tick` timer
/// and a shutdown channel. Crawls happen on this thread (and its rayon
/// pool), never on a request path.
use super::SnapshotStore;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle to the refresh thread. Dropping it stops the thread.
pub struct RefreshWorker {
    shutdown_tx: Option<Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RefreshWorker {
    /// Start refreshing `store` every `interval`. The first refresh happens
    /// one full interval after this call.
    pub fn spawn(store: Arc<SnapshotStore>, interval: Duration) -> io::Result<Self> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);

        let thread = thread::Builder::new()
            .name("dirview-refresh".into())
            .spawn(move || run(&store, interval, &shutdown_rx))?;

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Signal the thread and wait for it. A crawl already in progress runs
    /// to completion first.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Refresh worker panicked");
            }
        }
    }
}

fn run(store: &SnapshotStore, interval: Duration, shutdown_rx: &Receiver<()>) {
    info!(
        "Refreshing {} every {:?}",
        store.root().display(),
        interval
    );
    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                store.refresh();
            }
            recv(shutdown_rx) -> msg => {
                match msg {
                    Ok(()) => debug!("Refresh worker shutting down"),
                    Err(_) => warn!("Refresh shutdown channel disconnected; stopping worker"),
                }
                break;
            }
        }
    }
}

impl Drop for RefreshWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
