//! Background redress.
//!
//! The warp is CPU-bound, so a session can hand it to a worker thread and
//! keep handling drag events. The worker either delivers a complete image,
//! a [`RedressFailure`], or nothing at all once cancelled. Dropping the
//! handle cancels and discards the result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::corners::CornerSet;
use crate::decode::DecodedImage;
use crate::redress::{redress_cancellable, RedressFailure, RedressOptions};

/// Outcome delivered by a finished worker.
pub type RedressResult = Result<DecodedImage, RedressFailure>;

/// Handle to a redress running on a worker thread.
#[derive(Debug)]
pub struct PendingRedress {
    receiver: Receiver<RedressResult>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PendingRedress {
    /// Start redressing `image` on a new thread.
    pub fn spawn(image: Arc<DecodedImage>, corners: CornerSet, options: RedressOptions) -> Self {
        let (sender, receiver) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        let handle = thread::spawn(move || {
            if let Some(result) = redress_cancellable(&image, &corners, &options, &worker_cancel) {
                // The receiver is gone when the session was torn down.
                let _ = sender.send(result);
            }
        });

        Self {
            receiver,
            cancel,
            handle: Some(handle),
        }
    }

    /// Ask the worker to stop. A result already produced is still delivered.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Poll for the result without blocking.
    ///
    /// `None` while running, and forever after a cancelled worker exits.
    pub fn try_take(&mut self) -> Option<RedressResult> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                None
            }
        }
    }

    /// Block until the worker finishes. `None` if it was cancelled first.
    pub fn wait(mut self) -> Option<RedressResult> {
        let result = self.receiver.recv().ok();
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("redress worker panicked");
            }
        }
    }
}

impl Drop for PendingRedress {
    fn drop(&mut self) {
        // Detach: the worker notices the flag at its next row and exits.
        if self.handle.is_some() {
            self.cancel();
        }
    }
}
