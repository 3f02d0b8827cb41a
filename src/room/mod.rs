pub mod creation_events_modal;
pub mod event_batch;
pub mod room_state;
