//! The view model behind the modal that lists the events which created a room.
//!
//! When the timeline shows a collapsed "room created" group, tapping it opens
//! this modal. The view model flattens the group's chain of [`EventBatch`]es
//! once, at construction, and then answers queries about it:
//! the number of rows, the text of each row, the room's display name,
//! its creation date, and its avatar.
//!
//! The modal's lifecycle is driven by [`RoomCreationEventsModalViewAction`]s
//! passed to [`RoomCreationEventsModalViewModel::process()`].
//! Every resulting [`ViewState`] change, plus the request to close the modal,
//! is sent to the observer as a [`RoomCreationEventsModalUpdate`].

use std::{cell::RefCell, collections::BTreeSet};

use crossbeam_channel::Sender;
use makepad_widgets::{error, log, warning, ActionDefaultRef, DefaultNone};

use crate::{
    avatar::AvatarSpec,
    errors::{ConfigurationError, FormattingError, RowIndexOutOfRange},
    event_preview::{EventFormatter, StateEventFormatter},
    operation::{CreationEventsLoader, LoadGeneration, LoadResult, OperationHandle},
    room::{event_batch::{EventBatch, TimelineEvent}, room_state::RoomStateSnapshot},
    settings::{validate_date_format, AppSettings, DEFAULT_FULL_DATE_FORMAT},
    utils,
};

/// The text shown in place of an event that could not be formatted.
pub const UNFORMATTABLE_EVENT_TEXT: &str = "[Unable to display event]";

/// The lifecycle stage of the modal, as rendered by its view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Actions sent from the modal's view to its view model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomCreationEventsModalViewAction {
    /// Start loading the modal's data.
    LoadData,
    /// The user tapped the close button.
    Close,
    /// Stop any in-flight load.
    Cancel,
}

/// Updates sent from the view model to the modal's view and its coordinator.
#[derive(Clone, Debug, PartialEq, Eq, DefaultNone)]
pub enum RoomCreationEventsModalUpdate {
    /// The modal's view state changed.
    ViewStateChanged(ViewState),
    /// The modal asked its coordinator to dismiss it.
    Close,
    None,
}

/// The content of one row of the modal.
#[derive(Clone, Debug, PartialEq)]
pub enum CreationEventRow {
    /// The event was formatted successfully.
    Formatted(String),
    /// The event could not be formatted; the row shows [`UNFORMATTABLE_EVENT_TEXT`].
    Failed(FormattingError),
}
impl CreationEventRow {
    /// Returns the text to display for this row.
    pub fn title(&self) -> &str {
        match self {
            CreationEventRow::Formatted(text) => text,
            CreationEventRow::Failed(_) => UNFORMATTABLE_EVENT_TEXT,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CreationEventRow::Failed(_))
    }
}

/// The view model of the room-creation events modal.
///
/// Dropping the view model cancels any operation that is still in flight.
pub struct RoomCreationEventsModalViewModel {
    room_state: RoomStateSnapshot,
    /// Every event of the collapsed group, in timeline order.
    events: Vec<TimelineEvent>,
    formatter: Box<dyn EventFormatter>,
    loader: Option<Box<dyn CreationEventsLoader>>,
    current_operation: Option<Box<dyn OperationHandle>>,
    /// The generation of the most recently started load.
    load_generation: LoadGeneration,
    view_state: ViewState,
    /// Set once the modal has been closed; all further actions are ignored.
    closed: bool,
    full_date_format: String,
    /// Rows whose formatting failure has already been logged.
    reported_format_failures: RefCell<BTreeSet<usize>>,
    updates: Sender<RoomCreationEventsModalUpdate>,
}

impl RoomCreationEventsModalViewModel {
    /// Creates a view model for the collapsed group that starts with `first_batch`.
    ///
    /// Uses the [`StateEventFormatter`] and no loader;
    /// see [`Self::with_formatter()`] and [`Self::with_loader()`].
    pub fn new(
        first_batch: &EventBatch,
        room_state: RoomStateSnapshot,
        updates: Sender<RoomCreationEventsModalUpdate>,
    ) -> Result<Self, ConfigurationError> {
        let events = first_batch.flatten()?;
        log!("Created RoomCreationEventsModalViewModel for room {} with {} events", room_state.room_id, events.len());
        Ok(Self {
            room_state,
            events,
            formatter: Box::new(StateEventFormatter),
            loader: None,
            current_operation: None,
            load_generation: 0,
            view_state: ViewState::Idle,
            closed: false,
            full_date_format: DEFAULT_FULL_DATE_FORMAT.to_owned(),
            reported_format_failures: RefCell::new(BTreeSet::new()),
            updates,
        })
    }

    /// Replaces the formatter used to produce each row's text.
    pub fn with_formatter(mut self, formatter: impl EventFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Sets the loader that is started upon [`RoomCreationEventsModalViewAction::LoadData`].
    pub fn with_loader(mut self, loader: impl CreationEventsLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Sets the `chrono` format string for [`Self::derived_creation_date()`].
    ///
    /// Fails if the format is empty or contains an unknown specifier.
    pub fn with_full_date_format(mut self, format: impl Into<String>) -> Result<Self, ConfigurationError> {
        let format = format.into();
        validate_date_format(&format)?;
        self.full_date_format = format;
        Ok(self)
    }

    /// Applies the app's settings to this view model.
    pub fn with_settings(self, settings: &AppSettings) -> Result<Self, ConfigurationError> {
        self.with_full_date_format(settings.full_date_format.clone())
    }

    pub fn row_count(&self) -> usize {
        self.events.len()
    }

    /// Returns the content of the row at the given `index`.
    ///
    /// The row's text is formatted anew on every call.
    pub fn row(&self, index: usize) -> Result<CreationEventRow, RowIndexOutOfRange> {
        let event = self.events.get(index).ok_or(RowIndexOutOfRange {
            index,
            row_count: self.events.len(),
        })?;
        Ok(match self.formatter.format(event, &self.room_state) {
            Ok(text) => CreationEventRow::Formatted(text),
            Err(e) => {
                if self.reported_format_failures.borrow_mut().insert(index) {
                    error!("Failed to format row {index} ({}) of room {}: {e}", event.event_type, self.room_state.room_id);
                }
                CreationEventRow::Failed(e)
            }
        })
    }

    /// Returns the room's name if it's non-empty,
    /// otherwise its first alias, otherwise `None`.
    pub fn derived_room_name(&self) -> Option<String> {
        self.room_state.display_name()
    }

    /// Returns the full local date of the first `m.room.create` event,
    /// or `None` if there is no such event.
    pub fn derived_creation_date(&self) -> Option<String> {
        let creation_event = self.events.iter().find(|e| e.is_room_create())?;
        let dt = utils::unix_time_millis_to_datetime(&creation_event.origin_server_ts)?;
        let formatted = utils::format_full_date(&dt, &self.full_date_format);
        if formatted.is_none() {
            error!("Invalid full date format {:?} for room {}", self.full_date_format, self.room_state.room_id);
        }
        formatted
    }

    /// Returns the avatar to display for this room.
    pub fn avatar(&self) -> AvatarSpec {
        AvatarSpec::for_room(&self.room_state, self.derived_room_name())
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn room_state(&self) -> &RoomStateSnapshot {
        &self.room_state
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn has_pending_operation(&self) -> bool {
        self.current_operation.is_some()
    }

    /// Handles an action from the modal's view.
    pub fn process(&mut self, action: RoomCreationEventsModalViewAction) {
        if self.closed {
            warning!("Ignoring {action:?} for room {}: the modal was already closed.", self.room_state.room_id);
            return;
        }
        match action {
            RoomCreationEventsModalViewAction::LoadData => self.load_data(),
            RoomCreationEventsModalViewAction::Close => self.close(),
            RoomCreationEventsModalViewAction::Cancel => self.cancel(),
        }
    }

    /// Relays the outcome of a load to the observer.
    ///
    /// Outcomes for other rooms, from an earlier load,
    /// or that arrive after the load was cancelled are dropped.
    pub fn handle_load_result(&mut self, result: LoadResult) {
        if result.room_id != self.room_state.room_id {
            return;
        }
        if self.closed || self.view_state != ViewState::Loading {
            warning!("Dropping load result for room {}: no load is in progress.", result.room_id);
            return;
        }
        if result.generation != self.load_generation {
            warning!(
                "Dropping stale result of load #{} for room {}; load #{} is current.",
                result.generation, result.room_id, self.load_generation,
            );
            return;
        }
        self.current_operation = None;
        match result.outcome {
            Ok(()) => self.update(ViewState::Loaded),
            Err(reason) => self.update(ViewState::Failed(reason)),
        }
    }

    fn load_data(&mut self) {
        self.cancel_operations();
        self.load_generation += 1;
        self.update(ViewState::Loading);
        if let Some(loader) = self.loader.as_ref() {
            self.current_operation = Some(loader.start(&self.room_state.room_id, self.load_generation));
        }
    }

    fn cancel(&mut self) {
        self.cancel_operations();
        if self.view_state == ViewState::Loading {
            self.update(ViewState::Idle);
        }
    }

    fn close(&mut self) {
        self.cancel_operations();
        self.closed = true;
        log!("Closing the room creation events modal for room {}", self.room_state.room_id);
        self.notify(RoomCreationEventsModalUpdate::Close);
    }

    fn update(&mut self, view_state: ViewState) {
        self.view_state = view_state.clone();
        self.notify(RoomCreationEventsModalUpdate::ViewStateChanged(view_state));
    }

    fn notify(&self, update: RoomCreationEventsModalUpdate) {
        // A disconnected receiver just means the view is already gone.
        let _ = self.updates.send(update);
    }

    /// Cancels the in-flight operation, if any. Each handle is cancelled at most once.
    fn cancel_operations(&mut self) {
        if let Some(operation) = self.current_operation.take() {
            log!("Cancelling in-flight load for room {}", self.room_state.room_id);
            operation.cancel();
        }
    }
}

impl Drop for RoomCreationEventsModalViewModel {
    fn drop(&mut self) {
        self.cancel_operations();
    }
}
