// Fixed-schema column layout for listing exports.
//
// Column order, header styling, and the raw-key synonym table all live here as
// plain tables so they can be edited or localized without touching the
// mapping logic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::HeaderList;

/// Presentation of one header cell in a fixed-schema export.
/// Alignment is always centered and wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderStyle {
    pub bold: bool,
    pub font_size: f64,
    /// 0xRRGGBB
    pub font_color: u32,
    /// 0xRRGGBB, solid fill
    pub fill_color: u32,
}

const IDENTITY: HeaderStyle = HeaderStyle {
    bold: true,
    font_size: 11.0,
    font_color: 0xFFFFFF,
    fill_color: 0x1F4E78,
};

const ASSET: HeaderStyle = HeaderStyle {
    bold: true,
    font_size: 11.0,
    font_color: 0x833C0C,
    fill_color: 0xFCE4D6,
};

const PRICE: HeaderStyle = HeaderStyle {
    bold: true,
    font_size: 11.0,
    font_color: 0x375623,
    fill_color: 0xE2EFDA,
};

const SPACER: HeaderStyle = HeaderStyle {
    bold: false,
    font_size: 11.0,
    font_color: 0x000000,
    fill_color: 0xD9D9D9,
};

const NOTES: HeaderStyle = HeaderStyle {
    bold: true,
    font_size: 11.0,
    font_color: 0x7F6000,
    fill_color: 0xFFF2CC,
};

pub const HEADER_ROW_HEIGHT: f64 = 32.0;

/// (header, column width, header style). A blank header is a spacer column.
pub const FIXED_COLUMNS: &[(&str, f64, HeaderStyle)] = &[
    ("编号", 22.0, IDENTITY),
    ("哈夫币", 12.0, ASSET),
    ("段位", 10.0, ASSET),
    ("等级", 8.0, ASSET),
    ("保险格数", 10.0, ASSET),
    ("体力", 8.0, ASSET),
    ("负重", 8.0, ASSET),
    ("特殊皮肤", 24.0, ASSET),
    ("特殊道具", 24.0, ASSET),
    ("KD", 8.0, ASSET),
    ("租金", 10.0, PRICE),
    ("押金", 10.0, PRICE),
    ("合计", 10.0, PRICE),
    ("租期", 10.0, PRICE),
    ("登录方式", 12.0, PRICE),
    ("租售比", 10.0, PRICE),
    ("", 4.0, SPACER),
    ("", 4.0, SPACER),
    ("备注", 30.0, NOTES),
];

// NOTE:
// - Aliases are matched against a normalized key (see `normalize_key`).
// - An alias may point at a canonical name outside FIXED_COLUMNS; such
//   pairs are dropped at mapping time.
pub const KEY_ALIASES: &[(&str, &str)] = &[
    ("编号", "编号"),
    ("账号编号", "编号"),
    ("id", "编号"),
    ("哈夫币", "哈夫币"),
    ("哈弗币", "哈夫币"),
    ("哈夫币数量", "哈夫币"),
    ("仓库哈夫币", "哈夫币"),
    ("段位", "段位"),
    ("当前段位", "段位"),
    ("等级", "等级"),
    ("账号等级", "等级"),
    ("保险", "保险格数"),
    ("保险格", "保险格数"),
    ("保险格数", "保险格数"),
    ("安全箱", "保险格数"),
    ("体力", "体力"),
    ("体力等级", "体力"),
    ("负重", "负重"),
    ("负重等级", "负重"),
    ("皮肤", "特殊皮肤"),
    ("特殊皮肤", "特殊皮肤"),
    ("特殊道具", "特殊道具"),
    ("稀有道具", "特殊道具"),
    ("大红", "特殊道具"),
    ("kd", "KD"),
    ("k/d", "KD"),
    ("战绩kd", "KD"),
    ("租金", "租金"),
    ("租价", "租金"),
    ("押金", "押金"),
    ("合计", "合计"),
    ("总计", "合计"),
    ("总价", "合计"),
    ("租期", "租期"),
    ("租赁时长", "租期"),
    ("登录方式", "登录方式"),
    ("上号方式", "登录方式"),
    ("比例", "租售比"),
    ("租售比", "租售比"),
    ("备注", "备注"),
    ("说明", "备注"),
    ("号主在线时间", "在线时间"),
];

/// Lowercase ASCII letters and drop all whitespace, so `K D`, `kd` and
/// `KD` hit the same alias.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Header list, synonym table and export styling for fixed-schema mode.
#[derive(Debug, Clone)]
pub struct FixedProfile {
    headers: HeaderList,
    aliases: HashMap<String, String>,
    styles: Vec<HeaderStyle>,
    widths: Vec<f64>,
    header_row_height: f64,
}

impl FixedProfile {
    /// The built-in listing layout.
    pub fn builtin() -> Self {
        Self::new(FIXED_COLUMNS, KEY_ALIASES, HEADER_ROW_HEIGHT)
    }

    pub fn new(
        columns: &[(&str, f64, HeaderStyle)],
        aliases: &[(&str, &str)],
        header_row_height: f64,
    ) -> Self {
        Self {
            headers: columns.iter().map(|(h, _, _)| h.to_string()).collect(),
            widths: columns.iter().map(|(_, w, _)| *w).collect(),
            styles: columns.iter().map(|(_, _, s)| *s).collect(),
            aliases: aliases
                .iter()
                .map(|(raw, canonical)| (normalize_key(raw), canonical.to_string()))
                .collect(),
            header_row_height,
        }
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Canonical header for a raw key, if the synonym table knows it.
    pub fn canonical_for(&self, raw_key: &str) -> Option<&str> {
        self.aliases.get(&normalize_key(raw_key)).map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        !name.trim().is_empty() && self.headers.iter().any(|h| h == name)
    }

    pub fn style_at(&self, column: usize) -> Option<&HeaderStyle> {
        self.styles.get(column)
    }

    pub fn width_at(&self, column: usize) -> Option<f64> {
        self.widths.get(column).copied()
    }

    pub fn header_row_height(&self) -> f64 {
        self.header_row_height
    }
}
