// ============================================================
// SCHEMA POLICIES
// ============================================================
// Decide the column set/order for display and export, and canonicalize
// raw keys. One implementation is chosen at configuration time.

use indexmap::IndexSet;

use crate::domain::app_config::{AppConfig, SchemaMode};
use crate::domain::fixed_profile::FixedProfile;
use crate::domain::record::{HeaderList, RawRecord, Record};

pub trait SchemaPolicy: Send + Sync {
    /// Header list for the current records. Must be a pure function of
    /// `records` so that add/delete is reflected on the next call.
    fn headers(&self, records: &[Record]) -> HeaderList;

    /// Turn a freshly parsed or manually entered record into its stored form.
    fn canonicalize(&self, raw: RawRecord) -> Record;

    /// Whether at least one key of `raw` survives `canonicalize`.
    fn accepts_any(&self, raw: &RawRecord) -> bool {
        !raw.is_empty()
    }

    /// Column styling for export, when the policy carries one.
    fn profile(&self) -> Option<&FixedProfile> {
        None
    }

    fn mode(&self) -> SchemaMode;
}

/// Fixed mode always uses the built-in profile, whose identifier column is
/// `编号`; `identifier_marker` only drives record splitting and the dynamic
/// pinned column.
pub fn policy_for(config: &AppConfig) -> Box<dyn SchemaPolicy> {
    match config.schema_mode {
        SchemaMode::Dynamic => Box::new(DynamicSchema::new(&config.identifier_marker)),
        SchemaMode::Fixed => Box::new(FixedSchema::new(FixedProfile::builtin())),
    }
}

/// Union of keys in first-seen order, pinned key first.
pub fn reconcile_dynamic(records: &[Record], pinned: &str) -> HeaderList {
    let mut keys: IndexSet<&str> = IndexSet::new();
    for record in records {
        for key in record.keys() {
            keys.insert(key.as_str());
        }
    }

    let mut headers = HeaderList::with_capacity(keys.len());
    if keys.contains(pinned) {
        headers.push(pinned.to_string());
    }
    headers.extend(
        keys.into_iter()
            .filter(|k| *k != pinned)
            .map(str::to_string),
    );
    headers
}

fn maps_onto_header(raw_key: &str, profile: &FixedProfile) -> bool {
    profile
        .canonical_for(raw_key)
        .map_or(false, |canonical| profile.has_header(canonical))
}

/// Keep only keys the synonym table maps onto a header of `profile`; every
/// header starts out as an empty string.
pub fn map_keys(raw: &RawRecord, profile: &FixedProfile) -> Record {
    let mut record: Record = profile
        .headers()
        .iter()
        .map(|h| (h.clone(), String::new()))
        .collect();

    for (raw_key, value) in raw {
        match profile.canonical_for(raw_key) {
            Some(canonical) if profile.has_header(canonical) => {
                record.insert(canonical.to_string(), value.clone());
            }
            _ => {
                tracing::trace!(key = %raw_key, "dropping unmapped key");
            }
        }
    }
    record
}

#[derive(Debug, Clone)]
pub struct DynamicSchema {
    pinned: String,
}

impl DynamicSchema {
    pub fn new(pinned: &str) -> Self {
        Self {
            pinned: pinned.trim().to_string(),
        }
    }
}

impl SchemaPolicy for DynamicSchema {
    fn headers(&self, records: &[Record]) -> HeaderList {
        reconcile_dynamic(records, &self.pinned)
    }

    fn canonicalize(&self, raw: RawRecord) -> Record {
        raw
    }

    fn mode(&self) -> SchemaMode {
        SchemaMode::Dynamic
    }
}

#[derive(Debug, Clone)]
pub struct FixedSchema {
    profile: FixedProfile,
}

impl FixedSchema {
    pub fn new(profile: FixedProfile) -> Self {
        Self { profile }
    }
}

impl SchemaPolicy for FixedSchema {
    fn headers(&self, _records: &[Record]) -> HeaderList {
        self.profile.headers().clone()
    }

    fn canonicalize(&self, raw: RawRecord) -> Record {
        map_keys(&raw, &self.profile)
    }

    fn accepts_any(&self, raw: &RawRecord) -> bool {
        raw.keys().any(|key| maps_onto_header(key, &self.profile))
    }

    fn profile(&self) -> Option<&FixedProfile> {
        Some(&self.profile)
    }

    fn mode(&self) -> SchemaMode {
        SchemaMode::Fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::record_from_pairs;

    #[test]
    fn test_dynamic_union_in_first_seen_order() {
        let records = vec![
            record_from_pairs([("A", "1"), ("B", "2")]),
            record_from_pairs([("C", "3")]),
        ];
        assert_eq!(reconcile_dynamic(&records, "编号"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_dynamic_pins_identifier_first() {
        let records = vec![
            record_from_pairs([("B", "2")]),
            record_from_pairs([("编号", "9")]),
        ];
        assert_eq!(reconcile_dynamic(&records, "编号"), vec!["编号", "B"]);
    }

    #[test]
    fn test_dynamic_deduplicates() {
        let records = vec![
            record_from_pairs([("A", "1"), ("B", "2")]),
            record_from_pairs([("B", "3"), ("A", "4"), ("D", "5")]),
        ];
        assert_eq!(reconcile_dynamic(&records, "编号"), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_dynamic_recomputes_after_removal() {
        let mut records = vec![
            record_from_pairs([("编号", "1"), ("A", "1")]),
            record_from_pairs([("C", "3")]),
        ];
        let policy = DynamicSchema::new("编号");
        assert_eq!(policy.headers(&records), vec!["编号", "A", "C"]);
        records.remove(0);
        assert_eq!(policy.headers(&records), vec!["C"]);
        assert!(policy.headers(&[]).is_empty());
    }

    #[test]
    fn test_fixed_headers_ignore_records() {
        let policy = FixedSchema::new(FixedProfile::builtin());
        let records = vec![record_from_pairs([("whatever", "1")])];
        assert_eq!(policy.headers(&records), policy.headers(&[]));
        assert_eq!(policy.headers(&[])[0], "编号");
    }

    #[test]
    fn test_synonyms_fill_same_column() {
        let profile = FixedProfile::builtin();
        let a = map_keys(&record_from_pairs([("皮肤", "龙王")]), &profile);
        let b = map_keys(&record_from_pairs([("特殊皮肤", "龙王")]), &profile);
        assert_eq!(a["特殊皮肤"], "龙王");
        assert_eq!(a, b);
    }

    #[test]
    fn test_unmapped_key_is_dropped() {
        let profile = FixedProfile::builtin();
        let record = map_keys(
            &record_from_pairs([("编号", "1"), ("不存在字段", "x")]),
            &profile,
        );
        assert!(!record.contains_key("不存在字段"));
        assert!(record.values().all(|v| v != "x"));
        assert_eq!(record["编号"], "1");
    }

    #[test]
    fn test_alias_to_unknown_header_is_dropped() {
        let profile = FixedProfile::builtin();
        let record = map_keys(&record_from_pairs([("号主在线时间", "9点")]), &profile);
        assert!(!record.contains_key("在线时间"));
    }

    #[test]
    fn test_mapped_record_covers_every_header() {
        let profile = FixedProfile::builtin();
        let record = map_keys(&record_from_pairs([("段位", "黑鹰")]), &profile);
        for header in profile.headers() {
            assert!(record.contains_key(header));
        }
        assert_eq!(record["段位"], "黑鹰");
        assert_eq!(record["备注"], "");
    }

    #[test]
    fn test_accepts_any() {
        let fixed = FixedSchema::new(FixedProfile::builtin());
        assert!(!fixed.accepts_any(&record_from_pairs([("不存在字段", "x")])));
        assert!(!fixed.accepts_any(&record_from_pairs([("号主在线时间", "9点")])));
        assert!(fixed.accepts_any(&record_from_pairs([("皮肤", "龙王")])));

        let dynamic = DynamicSchema::new("编号");
        assert!(dynamic.accepts_any(&record_from_pairs([("不存在字段", "x")])));
        assert!(!dynamic.accepts_any(&RawRecord::new()));
    }

    #[test]
    fn test_policy_for_config() {
        let mut config = AppConfig::default();
        assert_eq!(policy_for(&config).mode(), SchemaMode::Dynamic);
        assert!(policy_for(&config).profile().is_none());
        config.schema_mode = SchemaMode::Fixed;
        let policy = policy_for(&config);
        assert_eq!(policy.mode(), SchemaMode::Fixed);
        assert!(policy.profile().is_some());
    }
}
