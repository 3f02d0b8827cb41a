//! The data behind one entry in the sidebar's list of spaces.

use matrix_sdk::ruma::OwnedRoomId;

use crate::{avatar::AvatarSpec, room::room_state::RoomStateSnapshot};

/// The corner radius of the highlight drawn behind a selected entry.
pub const SELECTION_CORNER_RADIUS: f64 = 8.0;
/// How long the selection highlight takes to fade in or out, in seconds.
pub const SELECTION_ANIMATION_SECS: f64 = 0.3;

/// What a space list entry displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpaceListItemViewData {
    pub space_id: OwnedRoomId,
    pub title: String,
    pub avatar: AvatarSpec,
}

impl SpaceListItemViewData {
    /// Builds the view data for a space from a snapshot of its state.
    ///
    /// Spaces with no name or alias are titled by their room ID.
    pub fn from_room_state(room_state: &RoomStateSnapshot) -> Self {
        let display_name = room_state.display_name();
        Self {
            space_id: room_state.room_id.clone(),
            title: display_name.clone().unwrap_or_else(|| room_state.room_id.to_string()),
            avatar: AvatarSpec::for_room(room_state, display_name),
        }
    }
}

/// How the selection highlight should change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionTransition {
    pub target_opacity: f64,
    pub duration_secs: f64,
}

/// One entry in the space list.
#[derive(Clone, Debug, Default)]
pub struct SpaceListEntry {
    view_data: Option<SpaceListItemViewData>,
    selected: bool,
}

impl SpaceListEntry {
    pub fn fill(&mut self, view_data: SpaceListItemViewData) {
        self.view_data = Some(view_data);
    }

    pub fn view_data(&self) -> Option<&SpaceListItemViewData> {
        self.view_data.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Selects or deselects this entry, returning how its highlight should fade.
    pub fn set_selected(&mut self, selected: bool, animated: bool) -> SelectionTransition {
        self.selected = selected;
        SelectionTransition {
            target_opacity: if selected { 1.0 } else { 0.0 },
            duration_secs: if animated { SELECTION_ANIMATION_SECS } else { 0.0 },
        }
    }
}


#[cfg(test)]
mod tests {
    use matrix_sdk::ruma::{owned_room_alias_id, owned_room_id};

    use super::*;

    #[test]
    fn title_falls_back_to_alias_then_room_id() {
        let state = RoomStateSnapshot::new(owned_room_id!("!space:example.org"));
        assert_eq!(SpaceListItemViewData::from_room_state(&state).title, "!space:example.org");

        let state = state.with_aliases([owned_room_alias_id!("#team:example.org")]);
        assert_eq!(SpaceListItemViewData::from_room_state(&state).title, "#team:example.org");

        let state = state.with_name("Team");
        let data = SpaceListItemViewData::from_room_state(&state);
        assert_eq!(data.title, "Team");
        assert_eq!(data.avatar.placeholder().first_letter(), "T");
    }

    #[test]
    fn selection_transitions() {
        let mut entry = SpaceListEntry::default();
        entry.fill(SpaceListItemViewData::from_room_state(
            &RoomStateSnapshot::new(owned_room_id!("!space:example.org"))
        ));
        assert!(!entry.is_selected());

        assert_eq!(
            entry.set_selected(true, true),
            SelectionTransition { target_opacity: 1.0, duration_secs: SELECTION_ANIMATION_SECS },
        );
        assert!(entry.is_selected());

        assert_eq!(
            entry.set_selected(false, false),
            SelectionTransition { target_opacity: 0.0, duration_secs: 0.0 },
        );
        assert!(!entry.is_selected());
        assert!(entry.view_data().is_some());
    }
}
