//! The designated single-writer cache context
//!
//! All cache and pending-state mutation happens on one event-loop thread
//! that owns the [`ImageCache`](crate::cache::ImageCache) outright. Code
//! reaches that state only by posting a job through a [`CacheHandle`], so
//! the single-writer invariant is enforced by ownership rather than by a
//! thread-identity assertion: there is no `&mut ImageCache` to misuse off
//! the loop. Fetch completions are posted as ordinary jobs, which makes the
//! hand-off the only synchronization point between the parallel fetch path
//! and coordinator state.

use crate::cache::ImageCache;
use crate::error::{Error, Result};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::trace;

type Job = Box<dyn FnOnce(&mut ImageCache) + Send + 'static>;

enum Message {
  Run(Job),
  Shutdown,
}

/// Owns the context thread; dropping it stops the loop.
pub(crate) struct CacheContext {
  sender: Sender<Message>,
  thread: Option<JoinHandle<()>>,
}

impl CacheContext {
  /// Spawn the context loop. `build` constructs the coordinator state from
  /// the loop's own handle, so the cache can post its fetch completions
  /// back to itself.
  pub(crate) fn spawn<F>(build: F) -> Result<(Self, CacheHandle)>
  where
    F: FnOnce(CacheHandle) -> Result<ImageCache>,
  {
    let (sender, receiver) = mpsc::channel();
    let handle = CacheHandle {
      sender: sender.clone(),
    };
    let cache = build(handle.clone())?;

    let thread = thread::Builder::new()
      .name("thumbcache-context".to_string())
      .spawn(move || run_loop(cache, receiver))
      .map_err(|e| Error::WorkerPool(e.to_string()))?;

    Ok((
      Self {
        sender,
        thread: Some(thread),
      },
      handle,
    ))
  }
}

impl Drop for CacheContext {
  fn drop(&mut self) {
    let _ = self.sender.send(Message::Shutdown);
    if let Some(thread) = self.thread.take() {
      let _ = thread.join();
    }
  }
}

fn run_loop(mut cache: ImageCache, receiver: Receiver<Message>) {
  while let Ok(message) = receiver.recv() {
    match message {
      Message::Run(job) => job(&mut cache),
      Message::Shutdown => break,
    }
  }
  trace!("cache context stopped");
}

/// Cloneable handle that posts jobs onto the cache context.
///
/// Jobs receive `&mut ImageCache` and run in posting order. Handles held by
/// in-flight fetches keep delivering completions until the context stops;
/// after that, posts fail with [`Error::ContextClosed`].
#[derive(Clone)]
pub struct CacheHandle {
  sender: Sender<Message>,
}

impl CacheHandle {
  /// Post a job to the cache context without waiting for it.
  pub fn dispatch<F>(&self, job: F) -> Result<()>
  where
    F: FnOnce(&mut ImageCache) + Send + 'static,
  {
    self
      .sender
      .send(Message::Run(Box::new(job)))
      .map_err(|_| Error::ContextClosed)
  }

  /// Post a job to the cache context and block until it has run, returning
  /// its result. This is how off-context callers get the synchronous
  /// hit-or-miss answer from `load_image`.
  pub fn call<F, R>(&self, job: F) -> Result<R>
  where
    F: FnOnce(&mut ImageCache) -> R + Send + 'static,
    R: Send + 'static,
  {
    let (result_tx, result_rx) = mpsc::channel();
    self.dispatch(move |cache| {
      let _ = result_tx.send(job(cache));
    })?;
    result_rx.recv().map_err(|_| Error::ContextClosed)
  }
}
