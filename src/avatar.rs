//! What to show as a room's or space's avatar.
//!
//! An avatar is either a generated placeholder (one letter on a colored circle)
//! or a remote image. The placeholder is always available, so it is also shown
//! while the remote image is still being fetched.

use matrix_sdk::{
    media::MediaRequestParameters,
    ruma::{events::room::MediaSource, OwnedMxcUri, OwnedRoomId},
};

use crate::{room::room_state::RoomStateSnapshot, utils};

/// The number of distinct placeholder background colors.
pub const PLACEHOLDER_COLOR_COUNT: usize = 8;

/// A generated avatar for a room that has no avatar image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarPlaceholder {
    pub room_id: OwnedRoomId,
    pub display_name: Option<String>,
}

impl AvatarPlaceholder {
    /// Returns the first "letter" (Unicode grapheme) of the room's display name or ID.
    pub fn first_letter(&self) -> &str {
        self.display_name.as_deref()
            .and_then(utils::name_first_letter)
            .or_else(|| utils::name_first_letter(self.room_id.as_str()))
            .unwrap_or("?")
    }

    /// Returns which of the [`PLACEHOLDER_COLOR_COUNT`] background colors to use.
    ///
    /// The color depends only on the room ID, so it stays stable across renames.
    pub fn color_index(&self) -> usize {
        let sum = self.room_id.as_str()
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_add(b as usize));
        sum % PLACEHOLDER_COLOR_COUNT
    }
}

/// Describes which avatar should be displayed.
///
/// Fetching and decoding the image is left to a media loader,
/// see [`AvatarCache`](crate::avatar_cache::AvatarCache).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarSpec {
    /// No avatar image is set; show the placeholder.
    Placeholder(AvatarPlaceholder),
    /// An avatar image is hosted at the given MXC URI.
    /// The placeholder should be shown until the image has been loaded.
    Remote {
        mxc_uri: OwnedMxcUri,
        placeholder: AvatarPlaceholder,
    },
}

impl AvatarSpec {
    /// Chooses the avatar for the given room, using `display_name` for its placeholder.
    pub fn for_room(room_state: &RoomStateSnapshot, display_name: Option<String>) -> Self {
        let placeholder = AvatarPlaceholder {
            room_id: room_state.room_id.clone(),
            display_name,
        };
        match room_state.avatar_url.clone() {
            Some(mxc_uri) => Self::Remote { mxc_uri, placeholder },
            None => Self::Placeholder(placeholder),
        }
    }

    pub fn placeholder(&self) -> &AvatarPlaceholder {
        match self {
            Self::Placeholder(placeholder) => placeholder,
            Self::Remote { placeholder, .. } => placeholder,
        }
    }

    pub fn mxc_uri(&self) -> Option<&OwnedMxcUri> {
        match self {
            Self::Placeholder(_) => None,
            Self::Remote { mxc_uri, .. } => Some(mxc_uri),
        }
    }

    /// Returns the request for a cropped square thumbnail of this avatar,
    /// or `None` if there is no remote image.
    pub fn thumbnail_request(&self, size: u32) -> Option<MediaRequestParameters> {
        self.mxc_uri().map(|mxc_uri| MediaRequestParameters {
            source: MediaSource::Plain(mxc_uri.clone()),
            format: utils::avatar_thumbnail_format(size),
        })
    }
}


#[cfg(test)]
mod tests {
    use matrix_sdk::{media::MediaFormat, ruma::{owned_mxc_uri, owned_room_id}};

    use super::*;

    fn room_state() -> RoomStateSnapshot {
        RoomStateSnapshot::new(owned_room_id!("!room:example.org"))
    }

    #[test]
    fn placeholder_without_avatar_url() {
        let spec = AvatarSpec::for_room(&room_state(), Some("Design".into()));
        assert!(matches!(spec, AvatarSpec::Placeholder(_)));
        assert_eq!(spec.placeholder().first_letter(), "D");
        assert!(spec.thumbnail_request(40).is_none());
    }

    #[test]
    fn remote_with_avatar_url() {
        let state = room_state().with_avatar_url(owned_mxc_uri!("mxc://example.org/abc"));
        let spec = AvatarSpec::for_room(&state, None);
        assert_eq!(spec.mxc_uri().map(|u| u.as_str()), Some("mxc://example.org/abc"));
        // falls back to the room ID when there's no display name
        assert_eq!(spec.placeholder().first_letter(), "r");

        let request = spec.thumbnail_request(40).unwrap();
        assert!(matches!(&request.source, MediaSource::Plain(uri) if uri.as_str() == "mxc://example.org/abc"));
        assert!(matches!(request.format, MediaFormat::Thumbnail(_)));
    }

    #[test]
    fn placeholder_color_is_stable() {
        let a = AvatarSpec::for_room(&room_state(), Some("A".into()));
        let b = AvatarSpec::for_room(&room_state(), Some("B".into()));
        assert_eq!(a.placeholder().color_index(), b.placeholder().color_index());
        assert!(a.placeholder().color_index() < PLACEHOLDER_COLOR_COUNT);
    }
}
