//! Fixed-column extraction for text reports.
//!
//! Report generators such as DSSR align their tables by character position,
//! and neighbouring fields may touch or contain blanks. Every field is
//! therefore addressed by a half-open character range `[start, end)` into the
//! *trimmed* report line. Ranges past the end of a line are clamped, so a
//! short line yields empty (absent) fields rather than an error.

/// How the text of a column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A signed decimal, possibly followed by an annotation: `-81(BI)`.
    Decimal,
    /// A categorical token, kept verbatim.
    Token,
}

/// One named column of a fixed-layout report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
    pub kind: FieldKind,
}

impl Column {
    pub const fn new(name: &'static str, start: usize, end: usize, kind: FieldKind) -> Self {
        Column { name, start, end, kind }
    }

    /// The trimmed text of this column, or `None` if it is blank.
    pub fn text<'a>(&self, line: &'a str) -> Option<&'a str> {
        non_blank(column_text(line, self.start, self.end))
    }
}

/// Returns the trimmed characters `[start, end)` of the trimmed `line`.
pub fn column_text(line: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let line = line.trim();
    let byte_offset = |c: usize| {
        line.char_indices()
            .nth(c)
            .map(|(b, _)| b)
            .unwrap_or(line.len())
    };
    let (s, e) = (byte_offset(start), byte_offset(end));
    line[s..e].trim()
}

/// Maps blank text and the `---` placeholder to `None`.
pub fn non_blank(text: &str) -> Option<&str> {
    if text.is_empty() || text.chars().all(|c| c == '-') {
        None
    } else {
        Some(text)
    }
}

/// Parses the leading signed decimal of a token, ignoring any trailing
/// annotation such as `(anti)` or `(BI)`.
pub fn leading_decimal(token: &str) -> Option<f64> {
    let end = token
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    token[..end].parse().ok()
}

/// Implemented by every fixed-layout section of a report.
pub trait ReportSection: Default {
    /// Keyword that, together with `nt`, marks the section header line.
    const KEYWORD: &'static str;
    /// The column layout of the section, in output order.
    const COLUMNS: &'static [Column];

    /// Reads every column of this section from one data line.
    fn from_line(line: &str) -> Self;
}

macro_rules! field_type {
    (Decimal) => { Option<f64> };
    (Token) => { Option<String> };
}

macro_rules! field_value {
    (Decimal, $text:expr) => { $text.and_then($crate::columns::leading_decimal) };
    (Token, $text:expr) => { $text.map(str::to_owned) };
}

macro_rules! column_name {
    ($field:ident) => { stringify!($field) };
    ($field:ident, $rename:literal) => { $rename };
}

/// Declares a report section: the record struct, its column table and the
/// line reader, all generated from one layout table.
macro_rules! report_section {
    (
        $(#[$meta:meta])*
        $name:ident, keyword = $keyword:literal {
            $( $field:ident : $kind:ident [$start:literal, $end:literal] $(as $rename:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $(
                $(#[serde(rename = $rename)])?
                pub $field: $crate::columns::field_type!($kind),
            )*
        }

        impl $crate::columns::ReportSection for $name {
            const KEYWORD: &'static str = $keyword;
            const COLUMNS: &'static [$crate::columns::Column] = &[
                $( $crate::columns::Column::new(
                    $crate::columns::column_name!($field $(, $rename)?),
                    $start,
                    $end,
                    $crate::columns::FieldKind::$kind,
                ), )*
            ];

            fn from_line(line: &str) -> Self {
                Self {
                    $( $field: $crate::columns::field_value!(
                        $kind,
                        $crate::columns::non_blank(
                            $crate::columns::column_text(line, $start, $end))
                    ), )*
                }
            }
        }
    };
}

pub(crate) use field_type;
pub(crate) use field_value;
pub(crate) use column_name;
pub(crate) use report_section;
