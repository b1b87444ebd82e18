//! Parser for the host's recorded-TV URLs
//!
//! Recordings are addressed as
//!
//! ```text
//! pvr://recordings/tv/active/[<folder>/...]<title>, TV (<channel>), <YYYYMMDD>_<HHMMSS>, <id>.pvr
//! ```
//!
//! percent-encoded. Titles and channels may themselves contain `", TV ("` or
//! `"), "`; when several splits are possible the longest folder prefix wins,
//! then the longest title, then the longest channel name.

use chrono::NaiveDate;
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tracing::debug;

use crate::error::CutterError;
use crate::metrics::MetricsCollector;
use crate::models::RecordingReference;

const RECORDINGS_PREFIX: &str = "pvr://recordings/";
const ACTIVE_TV_PREFIX: &str = "pvr://recordings/tv/active/";
const PVR_EXTENSION: &str = ".pvr";
const CHANNEL_OPEN: &str = ", TV (";
const CHANNEL_CLOSE: &str = "), ";
const FIELD_SEPARATOR: &str = ", ";
/// `YYYYMMDD_HHMMSS`
const STAMP_LEN: usize = 15;

/// Why a recording URL was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecordingUrl {
    /// Does not start with `pvr://recordings/tv/active/`
    #[error("not an active TV recording URL")]
    MissingPrefix,
    /// Does not end with `.pvr`
    #[error("missing .pvr extension")]
    MissingExtension,
    /// The name does not split into title, channel, start and id
    #[error("no title, channel and start time found")]
    NoMatch,
    /// The start stamp is well-formed but not a real date or time
    #[error("start time {0} is not a valid date")]
    InvalidStart(String),
}

impl From<MalformedRecordingUrl> for CutterError {
    fn from(err: MalformedRecordingUrl) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

/// Start time components exactly as they appear in the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StartStamp {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl StartStamp {
    /// Read `YYYYMMDD_HHMMSS`. Years must start with 19 or 20.
    fn scan(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != STAMP_LEN || bytes[8] != b'_' {
            return None;
        }
        if !bytes[..8].iter().chain(&bytes[9..]).all(u8::is_ascii_digit) {
            return None;
        }
        if !(text.starts_with("19") || text.starts_with("20")) {
            return None;
        }

        let field = |range: std::ops::Range<usize>| text[range].parse::<u32>().ok();
        Some(Self {
            year: text[0..4].parse().ok()?,
            month: field(4..6)?,
            day: field(6..8)?,
            hour: field(9..11)?,
            minute: field(11..13)?,
            second: field(13..15)?,
        })
    }

    /// Seconds since the epoch, reading the components as UTC.
    fn epoch_seconds(self) -> Option<i64> {
        let start = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            self.second,
        )?;
        Some(start.and_utc().timestamp())
    }
}

/// Fields matched out of a recording URL body
#[derive(Debug, PartialEq, Eq)]
struct Matched<'a> {
    title: &'a str,
    channel: &'a str,
    stamp: &'a str,
    start: StartStamp,
}

/// Match `<channel>), <stamp>, <id>` with the longest channel first.
fn match_channel(text: &str) -> Option<(&str, &str, StartStamp)> {
    for (idx, _) in text.rmatch_indices(CHANNEL_CLOSE) {
        if idx == 0 {
            continue;
        }
        let tail = &text[idx + CHANNEL_CLOSE.len()..];
        let Some(stamp) = tail.get(..STAMP_LEN) else {
            continue;
        };
        let Some(id) = tail[STAMP_LEN..].strip_prefix(FIELD_SEPARATOR) else {
            continue;
        };
        if id.is_empty() {
            continue;
        }
        if let Some(start) = StartStamp::scan(stamp) {
            return Some((&text[..idx], stamp, start));
        }
    }
    None
}

/// Match `<title>, TV (<rest>` with the longest title first.
fn match_title(text: &str) -> Option<Matched<'_>> {
    for (idx, _) in text.rmatch_indices(CHANNEL_OPEN) {
        if idx == 0 {
            continue;
        }
        if let Some((channel, stamp, start)) = match_channel(&text[idx + CHANNEL_OPEN.len()..]) {
            return Some(Matched {
                title: &text[..idx],
                channel,
                stamp,
                start,
            });
        }
    }
    None
}

/// Match the part between the active-TV prefix and the extension.
fn match_body(body: &str) -> Option<Matched<'_>> {
    let folder_ends = body.rmatch_indices('/').map(|(idx, _)| idx + 1).chain(std::iter::once(0));
    for folder_end in folder_ends {
        if let Some(matched) = match_title(&body[folder_end..]) {
            return Some(matched);
        }
    }
    None
}

fn parse_decoded(url: &str) -> Result<RecordingReference, MalformedRecordingUrl> {
    let rest = url
        .strip_prefix(ACTIVE_TV_PREFIX)
        .ok_or(MalformedRecordingUrl::MissingPrefix)?;
    let body = rest
        .strip_suffix(PVR_EXTENSION)
        .ok_or(MalformedRecordingUrl::MissingExtension)?;

    let matched = match_body(body).ok_or(MalformedRecordingUrl::NoMatch)?;
    let start_epoch_seconds = matched
        .start
        .epoch_seconds()
        .ok_or_else(|| MalformedRecordingUrl::InvalidStart(matched.stamp.to_string()))?;

    Ok(RecordingReference {
        title: matched.title.to_string(),
        channel_name: matched.channel.to_string(),
        start_epoch_seconds,
    })
}

/// Parse a percent-encoded recording URL into title, channel and start time.
pub fn parse_recording_url(url: &str) -> Result<RecordingReference, CutterError> {
    let decoded = percent_decode_str(url).decode_utf8_lossy();
    parse_decoded(&decoded).map_err(|reason| {
        MetricsCollector::default().record_parse_failure();
        debug!(url, %reason, "Rejected recording URL");
        CutterError::from(reason)
    })
}

/// Whether `url` addresses a recording at all, without parsing it.
///
/// Checked on the decoded form, so every URL [`parse_recording_url`]
/// accepts is recognised here too.
pub fn is_recording_url(url: &str) -> bool {
    let decoded = percent_decode_str(url).decode_utf8_lossy();
    decoded
        .strip_prefix(RECORDINGS_PREFIX)
        .and_then(|rest| rest.strip_suffix(PVR_EXTENSION))
        .is_some_and(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Result<RecordingReference, MalformedRecordingUrl> {
        parse_decoded(url)
    }

    #[test]
    fn test_parse_plain_recording() {
        let recording = parse("pvr://recordings/tv/active/MyShow, TV (Channel1), 20230615_143000, abc.pvr").unwrap();
        assert_eq!(recording.title, "MyShow");
        assert_eq!(recording.channel_name, "Channel1");
        assert_eq!(recording.start_epoch_seconds, 1_686_839_400);
    }

    #[test]
    fn test_parse_strips_nested_folders() {
        let recording = parse("pvr://recordings/tv/active/Series/Season 2/Episode, TV (ZDF HD), 19991231_235959, 42.pvr").unwrap();
        assert_eq!(recording.title, "Episode");
        assert_eq!(recording.channel_name, "ZDF HD");
        assert_eq!(recording.start_epoch_seconds, 946_684_799);
    }

    #[test]
    fn test_parse_title_containing_marker_is_greedy() {
        let recording = parse("pvr://recordings/tv/active/A, TV (B), C, TV (Das Erste), 20200101_000000, x.pvr").unwrap();
        assert_eq!(recording.title, "A, TV (B), C");
        assert_eq!(recording.channel_name, "Das Erste");
    }

    #[test]
    fn test_parse_channel_containing_close_marker() {
        let recording = parse("pvr://recordings/tv/active/News, TV (One), Two), 20200101_120000, x.pvr").unwrap();
        assert_eq!(recording.title, "News");
        assert_eq!(recording.channel_name, "One), Two");
    }

    #[test]
    fn test_parse_slash_in_id_backtracks_folder() {
        let recording = parse("pvr://recordings/tv/active/Show, TV (Ch), 20200101_120000, a/b.pvr").unwrap();
        assert_eq!(recording.title, "Show");
        assert_eq!(recording.channel_name, "Ch");
    }

    #[test]
    fn test_parse_rejects_year_window() {
        assert_eq!(
            parse("pvr://recordings/tv/active/Old, TV (Ch), 18991231_000000, x.pvr"),
            Err(MalformedRecordingUrl::NoMatch)
        );
        assert_eq!(
            parse("pvr://recordings/tv/active/New, TV (Ch), 21000101_000000, x.pvr"),
            Err(MalformedRecordingUrl::NoMatch)
        );
    }

    #[test]
    fn test_parse_rejects_missing_pieces() {
        assert_eq!(
            parse("pvr://recordings/tv/active/Show, TV (Ch), 20230615_143000, abc"),
            Err(MalformedRecordingUrl::MissingExtension)
        );
        assert_eq!(
            parse("pvr://recordings/radio/active/Show, TV (Ch), 20230615_143000, abc.pvr"),
            Err(MalformedRecordingUrl::MissingPrefix)
        );
        assert_eq!(
            parse("pvr://recordings/tv/active/Show, TV (Ch), 20230615_143000, .pvr"),
            Err(MalformedRecordingUrl::NoMatch)
        );
        assert_eq!(
            parse("pvr://recordings/tv/active/, TV (Ch), 20230615_143000, a.pvr"),
            Err(MalformedRecordingUrl::NoMatch)
        );
        assert_eq!(
            parse("pvr://recordings/tv/active/Show, TV (Ch), 2023061_1143000, a.pvr"),
            Err(MalformedRecordingUrl::NoMatch)
        );
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        assert_eq!(
            parse("pvr://recordings/tv/active/Show, TV (Ch), 20231345_143000, a.pvr"),
            Err(MalformedRecordingUrl::InvalidStart("20231345_143000".to_string()))
        );
    }

    #[test]
    fn test_parse_recording_url_decodes_percent_escapes() {
        let url = "pvr://recordings/tv/active/Tatort%3A%20Der%20Fall, TV (Das%20Erste%20HD), 20230615_201500, 7.pvr";
        let recording = parse_recording_url(url).unwrap();
        assert_eq!(recording.title, "Tatort: Der Fall");
        assert_eq!(recording.channel_name, "Das Erste HD");
    }

    #[test]
    fn test_parse_recording_url_error_is_malformed_input() {
        let err = parse_recording_url("https://example.com/video.mkv").unwrap_err();
        assert!(matches!(err, CutterError::MalformedInput(_)));
    }

    #[test]
    fn test_is_recording_url() {
        assert!(is_recording_url("pvr://recordings/tv/active/MyShow, TV (Channel1), 20230615_143000, abc.pvr"));
        assert!(is_recording_url("pvr://recordings/radio/deleted/x.pvr"));
        assert!(!is_recording_url("pvr://recordings/.pvr"));
        assert!(!is_recording_url("pvr://channels/tv/1.pvr"));
        assert!(!is_recording_url("/videos/movie.mkv"));
        assert!(!is_recording_url(""));
    }

    #[test]
    fn test_stamp_scan() {
        assert!(StartStamp::scan("20230615_143000").is_some());
        assert!(StartStamp::scan("2023061514300").is_none());
        assert!(StartStamp::scan("20230615-143000").is_none());
        assert!(StartStamp::scan("2023O615_143000").is_none());
    }
}
