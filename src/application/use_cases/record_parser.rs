// ============================================================
// RECORD PARSER
// ============================================================
// Split pasted text into marker-delimited chunks and each chunk into
// key/value pairs. Pure: no state is touched here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::{AppError, Result};
use crate::domain::record::RawRecord;

pub const DEFAULT_MARKER: &str = "编号";

static DEFAULT_PARSER: Lazy<RecordParser> = Lazy::new(|| RecordParser {
    boundary: Regex::new(r"(?m)^编号[:：]").unwrap(),
});

const PREVIEW_CHARS: usize = 20;

/// Parse with the default identifier marker.
pub fn parse(raw_text: &str) -> Result<Vec<RawRecord>> {
    DEFAULT_PARSER.parse(raw_text)
}

#[derive(Debug, Clone)]
pub struct RecordParser {
    boundary: Regex,
}

impl Default for RecordParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

fn boundary_pattern(marker: &str) -> Result<Regex> {
    Regex::new(&format!(r"(?m)^{}[:：]", regex::escape(marker)))
        .map_err(|e| AppError::ConfigError(format!("invalid identifier marker: {}", e)))
}

impl RecordParser {
    pub fn new(marker: &str) -> Result<Self> {
        let marker = marker.trim();
        if marker.is_empty() {
            return Err(AppError::ConfigError(
                "identifier marker must not be empty".to_string(),
            ));
        }
        Ok(Self {
            boundary: boundary_pattern(marker)?,
        })
    }

    /// One record per marker-prefixed chunk, in input order.
    pub fn parse(&self, raw_text: &str) -> Result<Vec<RawRecord>> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(AppError::EmptyInput);
        }

        let chunks = self.split_chunks(text)?;
        let records: Vec<RawRecord> = chunks.into_iter().map(parse_chunk).collect();

        tracing::debug!(records = records.len(), "parsed pasted text");
        Ok(records)
    }

    fn split_chunks<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let starts: Vec<usize> = self.boundary.find_iter(text).map(|m| m.start()).collect();

        let Some(&first) = starts.first() else {
            return Err(AppError::NoRecordsFound);
        };

        let preamble = text[..first].trim();
        if !preamble.is_empty() {
            let preview: String = preamble.chars().take(PREVIEW_CHARS).collect();
            return Err(AppError::LeadingText(preview));
        }

        let mut chunks = Vec::with_capacity(starts.len());
        for (idx, &start) in starts.iter().enumerate() {
            let end = starts.get(idx + 1).copied().unwrap_or(text.len());
            let chunk = &text[start..end];
            if !chunk.trim().is_empty() {
                chunks.push(chunk);
            }
        }

        if chunks.is_empty() {
            return Err(AppError::NoRecordsFound);
        }
        Ok(chunks)
    }
}

/// Lines split at the first half- or full-width colon. Lines without a colon
/// or with a blank key are skipped.
fn parse_chunk(chunk: &str) -> RawRecord {
    let mut record = RawRecord::new();
    for line in chunk.lines() {
        let Some((key, value)) = line.split_once(|c: char| c == ':' || c == '：') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        record.insert(key.to_string(), value.trim().to_string());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = "编号：1818781769481982541\n段位：黑鹰\n号主在线时间:上午9点~下午10:30\n联系电话:13330779331\n\n编号:42\n段位：钻石\n";

    #[test]
    fn test_parse_counts_marker_blocks() {
        let records = parse(TWO_RECORDS).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["编号"], "1818781769481982541");
        assert_eq!(records[1]["编号"], "42");
        assert_eq!(records[1]["段位"], "钻石");
    }

    #[test]
    fn test_only_first_colon_splits() {
        let records = parse("编号：1\n联系电话:13330779331:ext").unwrap();
        assert_eq!(records[0]["联系电话"], "13330779331:ext");

        let records = parse(TWO_RECORDS).unwrap();
        assert_eq!(records[0]["号主在线时间"], "上午9点~下午10:30");
    }

    #[test]
    fn test_mixed_colon_widths() {
        let records = parse("编号:7\n等级：30\n体力:5").unwrap();
        assert_eq!(records[0]["等级"], "30");
        assert_eq!(records[0]["体力"], "5");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(AppError::EmptyInput));
        assert_eq!(parse("   \n\t"), Err(AppError::EmptyInput));
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(parse("段位：黑鹰\n等级：30"), Err(AppError::NoRecordsFound));
    }

    #[test]
    fn test_marker_needs_colon() {
        assert_eq!(parse("编号 1\n段位：黑鹰"), Err(AppError::NoRecordsFound));
    }

    #[test]
    fn test_leading_text_is_rejected() {
        let err = parse("hello\n编号：1").unwrap_err();
        assert_eq!(err, AppError::LeadingText("hello".to_string()));
    }

    #[test]
    fn test_lines_without_colon_or_key_are_skipped() {
        let records = parse("编号：1\nno separator here\n：orphan value\n  \n段位：黑鹰").unwrap();
        let keys: Vec<_> = records[0].keys().cloned().collect();
        assert_eq!(keys, vec!["编号", "段位"]);
    }

    #[test]
    fn test_marker_only_at_line_start() {
        let records = parse("编号：1\n备注：旧编号：9").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["备注"], "旧编号：9");
    }

    #[test]
    fn test_line_order_does_not_change_content() {
        let a = parse("编号：1\n段位：黑鹰\n等级：30").unwrap();
        let b = parse("编号：1\n等级：30\n段位：黑鹰").unwrap();
        let mut a_pairs: Vec<_> = a[0].iter().collect();
        let mut b_pairs: Vec<_> = b[0].iter().collect();
        a_pairs.sort();
        b_pairs.sort();
        assert_eq!(a_pairs, b_pairs);
    }

    #[test]
    fn test_crlf_input() {
        let records = parse("编号：1\r\n段位：黑鹰\r\n编号：2\r\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["段位"], "黑鹰");
    }

    #[test]
    fn test_custom_marker() {
        let parser = RecordParser::new("ID").unwrap();
        let records = parser.parse("ID: a\nname: x\nID: b").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["ID"], "b");
    }

    #[test]
    fn test_custom_marker_is_escaped() {
        let parser = RecordParser::new("No.").unwrap();
        assert_eq!(parser.parse("NoX: 1"), Err(AppError::NoRecordsFound));
        assert_eq!(parser.parse("No.: 1").unwrap().len(), 1);
    }

    #[test]
    fn test_blank_marker_rejected() {
        assert!(matches!(
            RecordParser::new("  "),
            Err(AppError::ConfigError(_))
        ));
    }
}
