//! Rendering bookmark lists for the command line.
//!
//! TXT is one aligned line per bookmark, CSV has a header row, JSON is a
//! pretty-printed array of the full records.

use std::io::Write;

use csv::Writer;

use crate::error::Result;
use crate::models::{Bookmark, OutputFormat};

/// Write `bookmarks` to `out` in `format`.
pub fn write_bookmarks<W: Write>(out: &mut W, bookmarks: &[Bookmark], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Txt => write_txt(out, bookmarks),
        OutputFormat::Csv => write_csv(out, bookmarks),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, bookmarks)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_txt<W: Write>(out: &mut W, bookmarks: &[Bookmark]) -> Result<()> {
    for bookmark in bookmarks {
        writeln!(
            out,
            "{:>6}  {} / {}  {}",
            bookmark.id, bookmark.time_str, bookmark.total_time_str, bookmark.thumbnail_path
        )?;
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, bookmarks: &[Bookmark]) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(["id", "time", "total_time", "time_seconds", "total_time_seconds", "thumbnail", "file"])?;
    for bookmark in bookmarks {
        writer.write_record([
            bookmark.id.to_string(),
            bookmark.time_str.clone(),
            bookmark.total_time_str.clone(),
            bookmark.time_seconds.to_string(),
            bookmark.total_time_seconds.to_string(),
            bookmark.thumbnail_path.clone(),
            bookmark.full_path(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Bookmark> {
        vec![
            Bookmark::new(3, 61, 3600, "special://thumbnails/a.jpg", "/videos/", "movie.mkv"),
            Bookmark::new(5, 3661, 3600, "special://thumbnails/b.jpg", "/videos/", "movie.mkv"),
        ]
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_bookmarks(&mut buf, &sample(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_txt_output() {
        let text = render(OutputFormat::Txt);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "     3  00:01:01 / 01:00:00  special://thumbnails/a.jpg");
    }

    #[test]
    fn test_csv_output() {
        let text = render(OutputFormat::Csv);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,time,total_time,time_seconds,total_time_seconds,thumbnail,file")
        );
        assert_eq!(
            lines.next(),
            Some("3,00:01:01,01:00:00,61,3600,special://thumbnails/a.jpg,/videos/movie.mkv")
        );
    }

    #[test]
    fn test_json_output() {
        let text = render(OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[1]["id"], 5);
        assert_eq!(parsed[1]["time_str"], "01:01:01");
        assert_eq!(parsed[1]["file_name"], "movie.mkv");
    }
}
