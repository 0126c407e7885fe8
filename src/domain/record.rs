use indexmap::IndexMap;

/// One logical entity as field name -> field value.
///
/// Insertion order is kept so that the dynamic header list can follow
/// first-seen key order across records.
pub type Record = IndexMap<String, String>;

/// Key/value pairs exactly as read from pasted text, before any key mapping.
pub type RawRecord = Record;

/// Ordered column names used for the table view and for export.
pub type HeaderList = Vec<String>;

/// Blank header entries are spacer columns in fixed-schema exports.
pub fn is_spacer(header: &str) -> bool {
    header.trim().is_empty()
}

/// Value of `header` in `record`, empty when absent.
pub fn field_value<'a>(record: &'a Record, header: &str) -> &'a str {
    record.get(header).map(String::as_str).unwrap_or("")
}

/// Cell values in header order for export; missing values are empty.
pub fn row_values(headers: &[String], record: &Record) -> Vec<String> {
    headers
        .iter()
        .map(|h| field_value(record, h).to_string())
        .collect()
}

/// Build a record from `(key, value)` pairs, trimming both sides and
/// skipping pairs whose key is empty. Later duplicates overwrite earlier
/// values but keep the first position.
pub fn record_from_pairs<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut record = Record::new();
    for (key, value) in pairs {
        let key = key.as_ref().trim();
        if key.is_empty() {
            continue;
        }
        record.insert(key.to_string(), value.as_ref().trim().to_string());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_defaults_to_empty() {
        let mut record = Record::new();
        record.insert("段位".to_string(), "黑鹰".to_string());
        assert_eq!(field_value(&record, "段位"), "黑鹰");
        assert_eq!(field_value(&record, "等级"), "");
    }

    #[test]
    fn test_row_values_keep_empty() {
        let headers = vec!["编号".to_string(), "段位".to_string(), "等级".to_string()];
        let mut record = Record::new();
        record.insert("等级".to_string(), "30".to_string());
        record.insert("编号".to_string(), "1".to_string());
        assert_eq!(row_values(&headers, &record), vec!["1", "", "30"]);
    }

    #[test]
    fn test_record_from_pairs_skips_blank_keys() {
        let record = record_from_pairs([(" 段位 ", " 黑鹰 "), ("  ", "x"), ("等级", "")]);
        assert_eq!(record.len(), 2);
        assert_eq!(record["段位"], "黑鹰");
        assert_eq!(record["等级"], "");
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let record = record_from_pairs([("a", "1"), ("b", "2"), ("a", "3")]);
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record["a"], "3");
    }

    #[test]
    fn test_spacer_detection() {
        assert!(is_spacer(""));
        assert!(is_spacer("  "));
        assert!(!is_spacer("备注"));
    }
}
