use std::fmt::Write;

use chrono::{format::{Item, StrftimeItems}, DateTime, Local, TimeZone};
use matrix_sdk::{
    media::{MediaFormat, MediaThumbnailSettings},
    ruma::{media::Method, MilliSecondsSinceUnixEpoch, UInt},
};
use unicode_segmentation::UnicodeSegmentation;


pub fn unix_time_millis_to_datetime(millis: &MilliSecondsSinceUnixEpoch) -> Option<DateTime<Local>> {
    let millis: i64 = millis.get().into();
    Local.timestamp_millis_opt(millis).single()
}

/// Returns `true` if `format` is a non-empty `chrono` format string
/// whose every specifier is recognized.
pub fn is_valid_date_format(format: &str) -> bool {
    !format.trim().is_empty()
        && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Formats the given date-time with the given `chrono` format string.
///
/// Returns `None` if the format string is invalid.
pub fn format_full_date<Tz>(dt: &DateTime<Tz>, format: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut formatted = String::new();
    write!(formatted, "{}", dt.format(format)).ok()?;
    Some(formatted)
}

/// Returns the first "letter" (Unicode grapheme) of the given room or user name,
/// skipping any leading Matrix sigil (`#`, `!`, `@`) and whitespace.
pub fn name_first_letter(name: &str) -> Option<&str> {
    name.trim_start_matches(['#', '!', '@'])
        .trim_start()
        .graphemes(true)
        .next()
}

/// Returns the media format used for room and space avatars:
/// a square thumbnail of the given size, cropped to fill its bounds.
///
/// This is a function instead of a const because `UInt` has no const constructor.
pub fn avatar_thumbnail_format(size: u32) -> MediaFormat {
    MediaFormat::Thumbnail(MediaThumbnailSettings::with_method(
        Method::Crop,
        UInt::from(size),
        UInt::from(size),
    ))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn first_letter_skips_sigils() {
        assert_eq!(name_first_letter("#design:example.org"), Some("d"));
        assert_eq!(name_first_letter("@alice:example.org"), Some("a"));
        assert_eq!(name_first_letter("  Ünïcode room"), Some("Ü"));
        assert_eq!(name_first_letter("🇫🇷 France"), Some("🇫🇷"));
        assert_eq!(name_first_letter("#"), None);
        assert_eq!(name_first_letter(""), None);
    }

    #[test]
    fn full_date_formatting() {
        let dt = Utc.timestamp_millis_opt(1_602_849_600_000).single().unwrap();
        assert_eq!(
            format_full_date(&dt, crate::settings::DEFAULT_FULL_DATE_FORMAT).as_deref(),
            Some("Friday, October 16, 2020"),
        );
    }

    #[test]
    fn invalid_date_formats_do_not_panic() {
        let dt = Utc.timestamp_millis_opt(1_602_849_600_000).single().unwrap();
        for format in ["%Q", "%", "%A %Q"] {
            assert!(!is_valid_date_format(format), "{format:?} should be invalid");
            assert_eq!(format_full_date(&dt, format), None);
        }
        assert!(is_valid_date_format(crate::settings::DEFAULT_FULL_DATE_FORMAT));
        assert!(!is_valid_date_format("  "));
    }

    #[test]
    fn millis_conversion_matches_local_time() {
        let ts = MilliSecondsSinceUnixEpoch(UInt::new(1_602_849_600_000).unwrap());
        let dt = unix_time_millis_to_datetime(&ts).unwrap();
        assert_eq!(dt.timestamp_millis(), i64::from(ts.get()));
    }
}
