//! Shared run state and the progress spinner that displays it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 6);

/// State shared between a pipeline and its [`Ticker`].
#[derive(Debug)]
pub struct RunStatus {
    packets: AtomicU64,
    running: AtomicBool,
}

impl Default for RunStatus {
    fn default() -> Self {
        RunStatus::new()
    }
}

impl RunStatus {
    pub fn new() -> RunStatus {
        RunStatus { packets: AtomicU64::new(0), running: AtomicBool::new(true) }
    }

    /// Counts one more processed record.
    pub fn add_packet(&self) {
        self.packets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn packets(&self) -> u64 {
        self.packets.load(Ordering::Relaxed)
    }

    /// Resets the counter before a new pass.
    pub fn reset(&self) {
        self.packets.store(0, Ordering::Relaxed);
        self.running.store(true, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn finish(&self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Spinner thread showing the packet counter of a [`RunStatus`].
///
/// The thread stops when the status is finished or the ticker is dropped.
pub struct Ticker {
    status: Arc<RunStatus>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(status: Arc<RunStatus>, label: &str, show_counter: bool, hidden: bool) -> Ticker {
        let bar = if hidden {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new_spinner()
        };
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        bar.set_message(label.to_string());

        let label = label.to_string();
        let shared = Arc::clone(&status);
        let handle = thread::spawn(move || {
            while shared.is_running() {
                if show_counter {
                    bar.set_message(format!("{label} {} packets", shared.packets()));
                }
                bar.tick();
                thread::sleep(TICK_INTERVAL);
            }
            bar.finish_and_clear();
        });

        Ticker { status, handle: Some(handle) }
    }

    /// Stops the spinner and waits for its thread.
    pub fn stop(mut self) {
        self.join();
    }

    fn join(&mut self) {
        self.status.finish();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.join();
    }
}
