use std::{collections::BTreeMap, sync::Arc};

use makepad_widgets::{error, log};
use matrix_sdk::{media::MediaRequestParameters, ruma::{events::room::MediaSource, OwnedMxcUri}};

use crate::{avatar::AvatarSpec, settings::AppSettings, utils};

/// Something that can fetch media in the background.
///
/// Implementors must not block; the result is handed back later
/// through [`AvatarCache::insert_fetched()`].
pub trait MediaFetcher {
    fn fetch(&self, request: MediaRequestParameters);
}

/// An entry in the avatar cache.
#[derive(Clone, Debug)]
pub enum AvatarCacheEntry {
    /// A request has been issued and we're waiting for it to complete.
    Requested,
    /// The avatar has been successfully loaded from the server.
    Loaded(Arc<[u8]>),
    /// The avatar failed to load from the server.
    Failed,
}
impl AvatarCacheEntry {
    fn to_option(&self) -> Option<Arc<[u8]>> {
        match self {
            AvatarCacheEntry::Loaded(data) => Some(data.clone()),
            _ => None,
        }
    }
}

/// What an avatar view should currently draw.
#[derive(Clone, Debug)]
pub enum AvatarDisplay<'a> {
    /// Draw the generated placeholder's letter.
    Letter(&'a str),
    /// Draw the fetched image data.
    Image(Arc<[u8]>),
}

/// An in-memory cache of avatar thumbnails, indexed by MXC URI.
pub struct AvatarCache {
    entries: BTreeMap<OwnedMxcUri, AvatarCacheEntry>,
    thumbnail_size: u32,
}

impl AvatarCache {
    pub const fn new(thumbnail_size: u32) -> Self {
        Self {
            entries: BTreeMap::new(),
            thumbnail_size,
        }
    }

    /// Creates a cache that requests thumbnails of the size given in `settings`.
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.avatar_thumbnail_size)
    }

    /// Quickly try to fetch an avatar from the cache.
    ///
    /// This is suitable for use in a latency-sensitive context, such as a UI draw routine.
    pub fn try_get_avatar(&self, mxc_uri: &OwnedMxcUri) -> Option<Arc<[u8]>> {
        self.entries.get(mxc_uri).and_then(AvatarCacheEntry::to_option)
    }

    /// Tries to get the avatar from the cache, or asks `fetcher` to fetch it.
    ///
    /// This method *does not* block or wait for the avatar to be fetched,
    /// and will return `None` while the request is in flight.
    /// If a request is already in flight or has failed, this will return `None`
    /// and not issue a new redundant request.
    pub fn try_get_avatar_or_fetch(
        &mut self,
        mxc_uri: &OwnedMxcUri,
        fetcher: &dyn MediaFetcher,
    ) -> Option<Arc<[u8]>> {
        match self.entries.get(mxc_uri) {
            Some(AvatarCacheEntry::Requested) => return None,
            Some(AvatarCacheEntry::Loaded(data)) => return Some(Arc::clone(data)),
            Some(AvatarCacheEntry::Failed) => return None,
            None => { } // fall through to send a request.
        }

        fetcher.fetch(MediaRequestParameters {
            source: MediaSource::Plain(mxc_uri.clone()),
            format: utils::avatar_thumbnail_format(self.thumbnail_size),
        });
        self.entries.insert(mxc_uri.clone(), AvatarCacheEntry::Requested);
        None
    }

    /// Returns what to draw for the given avatar right now,
    /// requesting the remote image if it hasn't been requested yet.
    pub fn resolve<'a>(&mut self, spec: &'a AvatarSpec, fetcher: &dyn MediaFetcher) -> AvatarDisplay<'a> {
        if let Some(mxc_uri) = spec.mxc_uri()
            && let Some(data) = self.try_get_avatar_or_fetch(mxc_uri, fetcher)
        {
            return AvatarDisplay::Image(data);
        }
        AvatarDisplay::Letter(spec.placeholder().first_letter())
    }

    /// Inserts the result of a completed fetch into the cache.
    pub fn insert_fetched(&mut self, mxc_uri: OwnedMxcUri, data: matrix_sdk::Result<Vec<u8>>) {
        let entry = match data {
            Ok(data) => {
                log!("Fetched avatar at {mxc_uri} ({} bytes)", data.len());
                AvatarCacheEntry::Loaded(data.into())
            }
            Err(e) => {
                error!("Failed to fetch avatar at {mxc_uri}: {e:?}");
                AvatarCacheEntry::Failed
            }
        };
        self.entries.insert(mxc_uri, entry);
    }

    pub fn entry(&self, mxc_uri: &OwnedMxcUri) -> Option<&AvatarCacheEntry> {
        self.entries.get(mxc_uri)
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use matrix_sdk::{media::MediaFormat, ruma::{owned_mxc_uri, owned_room_id, UInt}};

    use super::*;
    use crate::room::room_state::RoomStateSnapshot;

    #[derive(Default)]
    struct RecordingFetcher {
        requests: RefCell<Vec<MediaRequestParameters>>,
    }
    impl MediaFetcher for RecordingFetcher {
        fn fetch(&self, request: MediaRequestParameters) {
            self.requests.borrow_mut().push(request);
        }
    }

    #[test]
    fn fetches_each_uri_only_once() {
        let mxc_uri = owned_mxc_uri!("mxc://example.org/avatar");
        let fetcher = RecordingFetcher::default();
        let mut cache = AvatarCache::new(40);

        assert!(cache.try_get_avatar_or_fetch(&mxc_uri, &fetcher).is_none());
        assert!(cache.try_get_avatar_or_fetch(&mxc_uri, &fetcher).is_none());
        assert_eq!(fetcher.requests.borrow().len(), 1);
        assert!(matches!(cache.entry(&mxc_uri), Some(AvatarCacheEntry::Requested)));

        cache.insert_fetched(mxc_uri.clone(), Ok(vec![1, 2, 3]));
        let data = cache.try_get_avatar_or_fetch(&mxc_uri, &fetcher).unwrap();
        assert_eq!(&*data, &[1, 2, 3]);
        assert_eq!(fetcher.requests.borrow().len(), 1);
    }

    #[test]
    fn resolve_shows_letter_until_loaded() {
        let mxc_uri = owned_mxc_uri!("mxc://example.org/avatar");
        let state = RoomStateSnapshot::new(owned_room_id!("!room:example.org"))
            .with_avatar_url(mxc_uri.clone());
        let spec = AvatarSpec::for_room(&state, Some("Design".into()));
        let fetcher = RecordingFetcher::default();
        let mut cache = AvatarCache::new(40);

        assert!(matches!(cache.resolve(&spec, &fetcher), AvatarDisplay::Letter("D")));
        cache.insert_fetched(mxc_uri, Ok(vec![7]));
        assert!(matches!(cache.resolve(&spec, &fetcher), AvatarDisplay::Image(_)));
    }

    #[test]
    fn thumbnail_size_comes_from_settings() {
        let settings = AppSettings { avatar_thumbnail_size: 96, ..AppSettings::default() };
        let fetcher = RecordingFetcher::default();
        let mut cache = AvatarCache::from_settings(&settings);
        cache.try_get_avatar_or_fetch(&owned_mxc_uri!("mxc://example.org/avatar"), &fetcher);

        let requests = fetcher.requests.borrow();
        assert!(matches!(
            &requests[0].format,
            MediaFormat::Thumbnail(thumbnail) if thumbnail.width == UInt::from(96u32) && thumbnail.height == UInt::from(96u32)
        ));
    }

    #[test]
    fn placeholder_specs_never_fetch() {
        let state = RoomStateSnapshot::new(owned_room_id!("!room:example.org"));
        let spec = AvatarSpec::for_room(&state, None);
        let fetcher = RecordingFetcher::default();
        let mut cache = AvatarCache::new(40);
        assert!(matches!(cache.resolve(&spec, &fetcher), AvatarDisplay::Letter("r")));
        assert!(fetcher.requests.borrow().is_empty());
    }
}
