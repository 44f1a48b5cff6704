//! The feedback channel.
//!
//! Executor results are queued as `exe_done` events and dispatched by a
//! dedicated consumer task, one event at a time, through the same entry point
//! as externally fired events.

use jobwire_core::{Event, Params};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::dispatcher::Dispatcher;

/// Sending half of the feedback queue, held by every spawned job.
#[derive(Debug, Clone)]
pub(crate) struct FeedbackSender {
  // Unbounded: a finishing job never waits on dispatch.
  sender: mpsc::UnboundedSender<Event>,
}

impl FeedbackSender {
  /// Queue an executor result. Returns `false` once the consumer is gone.
  pub(crate) fn send(&self, result: Params) -> bool {
    self.sender.send(Event::feedback(result)).is_ok()
  }
}

pub(crate) fn channel() -> (FeedbackSender, mpsc::UnboundedReceiver<Event>) {
  let (sender, receiver) = mpsc::unbounded_channel();
  (FeedbackSender { sender }, receiver)
}

/// Dispatch queued feedback events until cancelled.
pub(crate) async fn run_consumer(
  mut receiver: mpsc::UnboundedReceiver<Event>,
  dispatcher: Dispatcher,
  cancel: CancellationToken,
) {
  loop {
    tokio::select! {
      biased;
      _ = cancel.cancelled() => break,
      event = receiver.recv() => match event {
        Some(event) => dispatcher.dispatch_event(event),
        None => break,
      },
    }
  }
}
