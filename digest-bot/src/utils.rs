use digest_common::models::KeywordHitRow;

use crate::response::format_timestamp;

pub(crate) const TELEGRAM_MAX_LENGTH: usize = 4096;

pub(crate) const DEFAULT_EXPORT_DAYS: i64 = 7;

/// Byte order mark so spreadsheet apps pick UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn split_telegram_message(text: String) -> Vec<String> {
    let utf16 = text.encode_utf16().collect::<Vec<_>>();
    let total_len = utf16.len();

    if total_len <= TELEGRAM_MAX_LENGTH {
        return vec![text];
    }

    let mut parts = Vec::new();
    let mut start = 0;

    while start < total_len {
        let mut end = (start + TELEGRAM_MAX_LENGTH).min(total_len);

        if end < total_len {
            // Look for a newline to split at
            let search_start = start + TELEGRAM_MAX_LENGTH / 2;
            if let Some(newline_pos) = utf16[search_start..end]
                .iter()
                .rposition(|&c| c == b'\n' as u16)
            {
                end = search_start + newline_pos + 1;
            }

            // never cut a surrogate pair in half
            if (0xD800..=0xDBFF).contains(&utf16[end - 1]) {
                end -= 1;
            }
        }

        let part_utf16 = &utf16[start..end];
        parts.push(String::from_utf16_lossy(part_utf16));
        start = end;
    }

    parts
}

/// `/export_hits` argument: a positive number of days, 7 otherwise.
pub fn parse_export_days(arg: &str) -> i64 {
    arg.split_whitespace()
        .next()
        .and_then(|days| days.parse::<i64>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_EXPORT_DAYS)
}

pub fn export_file_name(days: i64) -> String {
    format!("keyword_hits_{days}d.csv")
}

/// Renders keyword hits as a UTF-8 CSV with a BOM.
pub fn hits_csv(rows: &[KeywordHitRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer.write_record(["datetime_utc", "user", "matched_keywords", "message"])?;

    for row in rows {
        writer.write_record([
            format_timestamp(row.date).as_str(),
            row.author.as_str(),
            row.matched.as_str(),
            row.text.replace('\n', " ").as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))
}
