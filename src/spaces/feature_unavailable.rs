//! Presents dialogs for space features that this app does not support yet.
//!
//! Each dialog explains what is unavailable and offers a link
//! to continue in the web client (or to the space itself).
//! The presenter can be used without a Makepad widget context:
//! dialogs are enqueued here and picked up by the UI thread
//! via [`take_pending_space_feature_unavailable()`].

use crossbeam_queue::SegQueue;
use makepad_widgets::{log, ActionDefaultRef, DefaultNone, SignalToUI};
use url::Url;

use crate::{errors::ConfigurationError, settings::AppSettings};

pub const INVITES_UNAVAILABLE_TEXT: &str =
    "Inviting people to a space isn't available in this app yet. \
    You can invite people using the web app.";
pub const SPACE_LINK_UNAVAILABLE_TEXT: &str =
    "Spaces aren't available in this app yet. \
    You can open this space using the link below.";
pub const OPEN_SPACE_UNAVAILABLE_TEXT: &str =
    "Opening a space isn't available in this app yet. \
    You can browse this space using the web app.";
/// The label of the dialog's only button, which dismisses it.
pub const DISMISS_BUTTON_TEXT: &str = "OK";

static PENDING_DIALOGS: SegQueue<SpaceFeatureUnavailableAction> = SegQueue::new();

/// The content of a "feature unavailable" dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpaceFeatureUnavailableViewData {
    pub information_text: String,
    pub share_link: Url,
}

/// Actions that show or hide a "feature unavailable" dialog.
#[derive(Clone, Debug, PartialEq, Eq, DefaultNone)]
pub enum SpaceFeatureUnavailableAction {
    /// Show a dialog with the given content.
    Present {
        view_data: SpaceFeatureUnavailableViewData,
        animated: bool,
    },
    /// The user tapped [`DISMISS_BUTTON_TEXT`].
    Dismiss,
    None,
}

/// Builds and enqueues "feature unavailable" dialogs for spaces.
#[derive(Clone, Debug)]
pub struct SpaceFeatureUnavailablePresenter {
    web_app_url: Url,
}

impl SpaceFeatureUnavailablePresenter {
    /// Creates a presenter that links to the web app configured in `settings`.
    ///
    /// Fails if that URL is malformed, so the caller can disable space features
    /// instead of showing broken links.
    pub fn new(settings: &AppSettings) -> Result<Self, ConfigurationError> {
        Ok(Self { web_app_url: settings.web_app_url()? })
    }

    pub fn web_app_url(&self) -> &Url {
        &self.web_app_url
    }

    pub fn invites_unavailable_view_data(&self) -> SpaceFeatureUnavailableViewData {
        SpaceFeatureUnavailableViewData {
            information_text: INVITES_UNAVAILABLE_TEXT.to_owned(),
            share_link: self.web_app_url.clone(),
        }
    }

    pub fn space_link_unavailable_view_data(&self, space_link: Url) -> SpaceFeatureUnavailableViewData {
        SpaceFeatureUnavailableViewData {
            information_text: SPACE_LINK_UNAVAILABLE_TEXT.to_owned(),
            share_link: space_link,
        }
    }

    pub fn open_space_unavailable_view_data(&self) -> SpaceFeatureUnavailableViewData {
        SpaceFeatureUnavailableViewData {
            information_text: OPEN_SPACE_UNAVAILABLE_TEXT.to_owned(),
            share_link: self.web_app_url.clone(),
        }
    }

    pub fn present_invites_unavailable(&self, animated: bool) {
        present_unavailable_feature(self.invites_unavailable_view_data(), animated);
    }

    pub fn present_space_link_unavailable(&self, space_link: Url, animated: bool) {
        present_unavailable_feature(self.space_link_unavailable_view_data(space_link), animated);
    }

    pub fn present_open_space_unavailable(&self, animated: bool) {
        present_unavailable_feature(self.open_space_unavailable_view_data(), animated);
    }
}

/// Enqueues a "feature unavailable" dialog with the given content.
pub fn present_unavailable_feature(view_data: SpaceFeatureUnavailableViewData, animated: bool) {
    log!("Presenting space feature unavailable dialog linking to {}", view_data.share_link);
    PENDING_DIALOGS.push(SpaceFeatureUnavailableAction::Present { view_data, animated });
    SignalToUI::set_ui_signal();
}

/// Enqueues the dismissal of the current "feature unavailable" dialog.
pub fn dismiss_unavailable_feature() {
    PENDING_DIALOGS.push(SpaceFeatureUnavailableAction::Dismiss);
    SignalToUI::set_ui_signal();
}

/// Returns the next pending dialog action, if any, in the order they were enqueued.
pub fn take_pending_space_feature_unavailable() -> Option<SpaceFeatureUnavailableAction> {
    PENDING_DIALOGS.pop()
}
