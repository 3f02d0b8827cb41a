//! A read-only snapshot of a room's display metadata.

use matrix_sdk::{
    Room,
    ruma::{OwnedMxcUri, OwnedRoomAliasId, OwnedRoomId, RoomId},
};

/// The metadata of a room at a point in time: its ID, name, aliases, and avatar.
///
/// The modals in this crate never mutate a snapshot; take a new one to observe changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomStateSnapshot {
    pub room_id: OwnedRoomId,
    /// The room's explicit name, if one was set.
    pub name: Option<String>,
    /// The room's aliases, with the canonical alias (if any) first.
    pub aliases: Vec<OwnedRoomAliasId>,
    pub avatar_url: Option<OwnedMxcUri>,
}

impl RoomStateSnapshot {
    /// Creates a snapshot for a room with no name, aliases, or avatar.
    pub fn new(room_id: OwnedRoomId) -> Self {
        Self {
            room_id,
            name: None,
            aliases: Vec::new(),
            avatar_url: None,
        }
    }

    /// Takes a snapshot of the given room's current state.
    pub fn from_room(room: &Room) -> Self {
        let mut aliases: Vec<OwnedRoomAliasId> = room.canonical_alias().into_iter().collect();
        for alias in room.alt_aliases() {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        Self {
            room_id: room.room_id().to_owned(),
            name: room.name(),
            aliases,
            avatar_url: room.avatar_url(),
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Returns the room's name if it's non-empty,
    /// otherwise its first alias, otherwise `None`.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return Some(name.to_owned());
        }
        self.aliases.first().map(|alias| alias.to_string())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = OwnedRoomAliasId>) -> Self {
        self.aliases = aliases.into_iter().collect();
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: OwnedMxcUri) -> Self {
        self.avatar_url = Some(avatar_url);
        self
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use matrix_sdk::ruma::{owned_room_alias_id, owned_room_id};

    fn snapshot() -> RoomStateSnapshot {
        RoomStateSnapshot::new(owned_room_id!("!room:example.org"))
    }

    #[test]
    fn explicit_name_beats_aliases() {
        let state = snapshot()
            .with_name("Design")
            .with_aliases([owned_room_alias_id!("#design:example.org")]);
        assert_eq!(state.display_name().as_deref(), Some("Design"));
    }

    #[test]
    fn first_alias_is_used_when_name_is_empty_or_absent() {
        let aliases = [
            owned_room_alias_id!("#first:example.org"),
            owned_room_alias_id!("#second:example.org"),
        ];
        let unnamed = snapshot().with_aliases(aliases.clone());
        assert_eq!(unnamed.display_name().as_deref(), Some("#first:example.org"));

        let empty_name = snapshot().with_name("").with_aliases(aliases);
        assert_eq!(empty_name.display_name().as_deref(), Some("#first:example.org"));
    }

    #[test]
    fn no_name_and_no_aliases_is_absent() {
        assert_eq!(snapshot().display_name(), None);
        assert_eq!(snapshot().with_name("").display_name(), None);
    }
}
