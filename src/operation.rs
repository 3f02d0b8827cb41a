//! Handles to in-flight background operations, and the loaders that start them.

use std::future::Future;

use crossbeam_channel::Sender;
use makepad_widgets::{log, warning, SignalToUI};
use matrix_sdk::ruma::{OwnedRoomId, RoomId};
use tokio::{runtime::Handle, task::{AbortHandle, JoinHandle}};

/// A handle to a background operation that can be cancelled.
///
/// Cancelling must be idempotent: cancelling twice,
/// or cancelling an operation that already finished, does nothing.
pub trait OperationHandle {
    fn cancel(&self);
}

impl OperationHandle for AbortHandle {
    fn cancel(&self) {
        self.abort();
    }
}

impl<T> OperationHandle for JoinHandle<T> {
    fn cancel(&self) {
        self.abort();
    }
}

/// Identifies one load started by a view model.
///
/// Each `LoadData` action starts a new generation, so a result that was already
/// in flight when its load was cancelled can be told apart from the current one.
pub type LoadGeneration = u64;

/// The outcome of loading a room's creation events, as delivered to the UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadResult {
    pub room_id: OwnedRoomId,
    pub generation: LoadGeneration,
    pub outcome: Result<(), String>,
}

/// Starts loading the data shown by the room-creation events modal.
pub trait CreationEventsLoader {
    /// Begins loading in the background, returning a handle that cancels it.
    ///
    /// The eventual [`LoadResult`] must carry the given `generation`.
    fn start(&self, room_id: &RoomId, generation: LoadGeneration) -> Box<dyn OperationHandle>;
}

/// A [`CreationEventsLoader`] that runs an async function on a tokio runtime
/// and sends its outcome over a channel.
///
/// The receiver (usually the UI thread) should pass each [`LoadResult`]
/// to the matching view model's `handle_load_result()`.
pub struct TaskLoader<F> {
    runtime: Handle,
    load_fn: F,
    result_sender: Sender<LoadResult>,
}

impl<F, Fut> TaskLoader<F>
where
    F: Fn(OwnedRoomId) -> Fut,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    pub fn new(runtime: Handle, load_fn: F, result_sender: Sender<LoadResult>) -> Self {
        Self { runtime, load_fn, result_sender }
    }
}

impl<F, Fut> CreationEventsLoader for TaskLoader<F>
where
    F: Fn(OwnedRoomId) -> Fut,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    fn start(&self, room_id: &RoomId, generation: LoadGeneration) -> Box<dyn OperationHandle> {
        let room_id = room_id.to_owned();
        let load_future = (self.load_fn)(room_id.clone());
        let sender = self.result_sender.clone();
        log!("Starting load #{generation} of creation events for room {room_id}");
        let join_handle = self.runtime.spawn(async move {
            let outcome = load_future.await;
            if sender.send(LoadResult { room_id, generation, outcome }).is_err() {
                warning!("Creation events were loaded, but nobody is listening for them anymore.");
            }
            SignalToUI::set_ui_signal();
        });
        Box::new(join_handle.abort_handle())
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use matrix_sdk::ruma::owned_room_id;

    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap()
    }

    #[test]
    fn task_loader_sends_outcome() {
        let rt = runtime();
        let (sender, receiver) = crossbeam_channel::unbounded();
        let loader = TaskLoader::new(
            rt.handle().clone(),
            |room_id: OwnedRoomId| async move {
                if room_id.as_str().starts_with("!ok") { Ok(()) } else { Err("not found".to_owned()) }
            },
            sender,
        );

        let _ok = loader.start(&owned_room_id!("!ok:example.org"), 1);
        let result = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            result,
            LoadResult { room_id: owned_room_id!("!ok:example.org"), generation: 1, outcome: Ok(()) },
        );

        let _err = loader.start(&owned_room_id!("!missing:example.org"), 7);
        let result = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.generation, 7);
        assert_eq!(result.outcome, Err("not found".to_owned()));
    }

    #[test]
    fn cancelled_task_never_reports() {
        let rt = runtime();
        let (sender, receiver) = crossbeam_channel::unbounded();
        let loader = TaskLoader::new(
            rt.handle().clone(),
            |_room_id: OwnedRoomId| async move {
                std::future::pending::<Result<(), String>>().await
            },
            sender,
        );

        let handle = loader.start(&owned_room_id!("!slow:example.org"), 1);
        handle.cancel();
        handle.cancel();
        assert!(receiver.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
