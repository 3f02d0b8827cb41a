//! Functions for generating one-line text of the events that set up a room.
//!
//! These texts are used for the rows of the room-creation events modal,
//! where each row shows one event of the collapsed "room created" group.

use matrix_sdk::ruma::{room::RoomType, events::{
    TimelineEventType,
    room::{
        avatar::RoomAvatarEventContent,
        canonical_alias::RoomCanonicalAliasEventContent,
        create::RoomCreateEventContent,
        encryption::RoomEncryptionEventContent,
        guest_access::{GuestAccess, RoomGuestAccessEventContent},
        history_visibility::{HistoryVisibility, RoomHistoryVisibilityEventContent},
        join_rules::{JoinRule, RoomJoinRulesEventContent},
        member::{MembershipState, RoomMemberEventContent},
        message::RoomMessageEventContent,
        name::RoomNameEventContent,
        topic::RoomTopicEventContent,
    },
}};
use serde::Deserialize;

use crate::{
    errors::FormattingError,
    room::{event_batch::TimelineEvent, room_state::RoomStateSnapshot},
};

/// Turns a timeline event into display text, in the context of its room.
pub trait EventFormatter {
    fn format(
        &self,
        event: &TimelineEvent,
        room_state: &RoomStateSnapshot,
    ) -> Result<String, FormattingError>;
}

/// What should be displayed before the text preview of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeforeText {
    /// Nothing should be displayed before the text preview.
    Nothing,
    /// The sender's username with a colon should be displayed before the text preview.
    UsernameWithColon,
    /// The sender's username (without a colon) should be displayed before the text preview.
    UsernameWithoutColon,
}

/// A text preview of a timeline event, plus how a username should be displayed before it.
///
/// Call [`TextPreview::format_with()`] to generate displayable text
/// with the appropriately-formatted preceding username.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPreview {
    text: String,
    before_text: BeforeText,
}
impl From<(String, BeforeText)> for TextPreview {
    fn from((text, before_text): (String, BeforeText)) -> Self {
        Self { text, before_text }
    }
}
impl TextPreview {
    /// Formats the text preview with the appropriate preceding username.
    pub fn format_with(self, username: &str) -> String {
        let Self { text, before_text } = self;
        match before_text {
            BeforeText::Nothing => text,
            BeforeText::UsernameWithColon => format!("{username}: {text}"),
            BeforeText::UsernameWithoutColon => format!("{username} {text}"),
        }
    }
}

/// The default [`EventFormatter`], which knows the state events
/// that are typically sent while a room is being created.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateEventFormatter;

impl EventFormatter for StateEventFormatter {
    fn format(
        &self,
        event: &TimelineEvent,
        room_state: &RoomStateSnapshot,
    ) -> Result<String, FormattingError> {
        text_preview_of_creation_event(event, room_state)
            .map(|preview| preview.format_with(event.sender.as_str()))
    }
}

fn parse_content<'a, C: Deserialize<'a>>(event: &'a TimelineEvent) -> Result<C, FormattingError> {
    C::deserialize(&event.content).map_err(|e| FormattingError::InvalidContent {
        event_type: event.event_type.clone(),
        reason: e.to_string(),
    })
}

/// Returns a text preview of the given room-setup event.
pub fn text_preview_of_creation_event(
    event: &TimelineEvent,
    room_state: &RoomStateSnapshot,
) -> Result<TextPreview, FormattingError> {
    let text = match &event.event_type {
        TimelineEventType::RoomCreate => {
            let content: RoomCreateEventContent = parse_content(event)?;
            if matches!(content.room_type, Some(RoomType::Space)) {
                format!("created this space (v{}).", content.room_version.as_str())
            } else {
                format!("created this room (v{}).", content.room_version.as_str())
            }
        }
        TimelineEventType::RoomMember => {
            let content: RoomMemberEventContent = parse_content(event)?;
            return Ok(text_preview_of_member_event(event, &content));
        }
        TimelineEventType::RoomName => {
            let content: RoomNameEventContent = parse_content(event)?;
            format!("changed this room's name to {:?}.", content.name)
        }
        TimelineEventType::RoomTopic => {
            let content: RoomTopicEventContent = parse_content(event)?;
            format!("changed this room's topic to {:?}.", content.topic)
        }
        TimelineEventType::RoomAvatar => {
            let content: RoomAvatarEventContent = parse_content(event)?;
            if content.url.is_some() {
                String::from("set this room's avatar picture.")
            } else {
                String::from("removed this room's avatar picture.")
            }
        }
        TimelineEventType::RoomCanonicalAlias => {
            let content: RoomCanonicalAliasEventContent = parse_content(event)?;
            format!("set the main address of this room to {}.",
                content.alias.as_ref().map(|a| a.as_str()).unwrap_or("none")
            )
        }
        TimelineEventType::RoomJoinRules => {
            let content: RoomJoinRulesEventContent = parse_content(event)?;
            match content.join_rule {
                JoinRule::Public => String::from("set this room to be joinable by anyone."),
                JoinRule::Knock => String::from("set this room to be joinable by invite only or by request."),
                JoinRule::Private => String::from("set this room to be private."),
                JoinRule::Restricted(_) => String::from("set this room to be joinable by invite only or with restrictions."),
                JoinRule::KnockRestricted(_) => String::from("set this room to be joinable by invite only or requestable with restrictions."),
                JoinRule::Invite | _ => String::from("set this room to be joinable by invite only."),
            }
        }
        TimelineEventType::RoomHistoryVisibility => {
            let content: RoomHistoryVisibilityEventContent = parse_content(event)?;
            let visibility = match content.history_visibility {
                HistoryVisibility::Invited => "invited users, since they were invited.",
                HistoryVisibility::Joined => "joined users, since they joined.",
                HistoryVisibility::Shared => "joined users, for all of time.",
                HistoryVisibility::WorldReadable | _ => "anyone for all time.",
            };
            format!("set this room's history to be visible by {visibility}")
        }
        TimelineEventType::RoomGuestAccess => {
            let content: RoomGuestAccessEventContent = parse_content(event)?;
            match content.guest_access {
                GuestAccess::CanJoin => String::from("has allowed guests to join this room."),
                GuestAccess::Forbidden | _ => String::from("has forbidden guests from joining this room."),
            }
        }
        TimelineEventType::RoomEncryption => {
            let _content: RoomEncryptionEventContent = parse_content(event)?;
            String::from("enabled encryption in this room.")
        }
        TimelineEventType::RoomPowerLevels => String::from("set the power levels for this room."),
        TimelineEventType::RoomServerAcl => String::from("set the server access control list for this room."),
        TimelineEventType::RoomMessage => {
            let content: RoomMessageEventContent = parse_content(event)?;
            return Ok(TextPreview::from((
                content.msgtype.body().to_owned(),
                BeforeText::UsernameWithColon,
            )));
        }
        other => return Err(FormattingError::UnsupportedEventType(other.clone())),
    };
    // Only mention the room by name once it has one, e.g. "created Design (v10)."
    let text = match room_state.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) if event.event_type == TimelineEventType::RoomCreate => {
            text.replacen("this room", name, 1).replacen("this space", name, 1)
        }
        _ => text,
    };
    Ok(TextPreview::from((text, BeforeText::UsernameWithoutColon)))
}

/// Returns a text preview of the given `m.room.member` event.
fn text_preview_of_member_event(
    event: &TimelineEvent,
    content: &RoomMemberEventContent,
) -> TextPreview {
    let target = content.displayname.as_deref()
        .or(event.state_key.as_deref())
        .unwrap_or("someone");
    let is_self = event.state_key.as_deref() == Some(event.sender.as_str());
    let text = match &content.membership {
        MembershipState::Join => String::from("joined this room."),
        MembershipState::Invite => format!("invited {target} to this room."),
        MembershipState::Leave if is_self => String::from("left this room."),
        MembershipState::Leave => format!("kicked {target} from this room."),
        MembershipState::Ban => format!("banned {target} from this room."),
        MembershipState::Knock => String::from("requested to join this room."),
        _ => String::from("underwent a membership change."),
    };
    TextPreview::from((text, BeforeText::UsernameWithoutColon))
}
