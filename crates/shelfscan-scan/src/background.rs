//! Running a scan off the async runtime.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use shelfscan_core::{ScanConfig, ScanEvent};

use crate::progress::ScanSummary;
use crate::scanner::Scanner;
use crate::sink::ChannelSink;

/// Buffer size for the event channel of a background scan.
pub const SCAN_CHANNEL_SIZE: usize = 256;

/// Start a scan on tokio's blocking pool.
///
/// Returns a receiver streaming events in traversal order and a handle
/// resolving to the summary once the walk finishes. Cancel `token` to stop
/// early; events already delivered stay delivered.
pub fn start_scan(
    config: ScanConfig,
    token: CancellationToken,
) -> (mpsc::Receiver<ScanEvent>, JoinHandle<ScanSummary>) {
    let (tx, rx) = mpsc::channel(SCAN_CHANNEL_SIZE);

    let handle = tokio::task::spawn_blocking(move || {
        let scanner = Scanner::new().with_cancellation(token);
        let mut sink = ChannelSink::new(tx);
        scanner.scan(&config, &mut sink)
    });

    (rx, handle)
}
