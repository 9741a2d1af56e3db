use std::borrow::Cow;

use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::RowMapError;

lazy_static! {
    // Quoted spans (possibly unterminated) are matched whole so their contents survive; only the
    // `ws` group is rewritten.
    static ref KEY_TOKEN: Regex = Regex::new(
        r#"'(?:[^']|'')*(?:'|\z)|"(?:[^"]|"")*(?:"|\z)|`[^`]*(?:`|\z)|\[[^\]]*(?:\]|\z)|(?P<ws>\s+)"#
    )
    .expect("static cache key pattern");
}

/// How query text is turned into a column-map cache key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyMode {
    /// The exact SQL text, byte for byte.
    #[default]
    Literal,
    /// Whitespace runs collapsed to one space and the ends trimmed. Text inside `'...'`,
    /// `"..."`, `` `...` `` and `[...]` is kept as written, so `AS "a  b"` and `AS "a b"` stay
    /// distinct entries.
    CollapseWhitespace,
}

impl CacheKeyMode {
    /// Apply this mode to `query`, borrowing when nothing changes.
    #[must_use]
    pub fn key<'q>(self, query: &'q str) -> Cow<'q, str> {
        match self {
            CacheKeyMode::Literal => Cow::Borrowed(query),
            CacheKeyMode::CollapseWhitespace => {
                KEY_TOKEN.replace_all(query.trim(), |caps: &Captures<'_>| {
                    if caps.name("ws").is_some() {
                        " ".to_string()
                    } else {
                        caps[0].to_string()
                    }
                })
            }
        }
    }
}

/// Which reported position decides where a column name lands in the column map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// 1-based ordinal of the column within the result set.
    #[default]
    ResultOrdinal,
    /// 1-based attribute number of the source table column, when the driver reports one.
    /// Computed columns fall back to their result ordinal.
    ///
    /// Only lines up for `SELECT *` over a table without dropped columns. A projection such as
    /// `SELECT name FROM t` reports attribute numbers past the column count and fails with
    /// `InvalidColumnPosition`; a computed column whose ordinal equals another column's
    /// attribute number fails with `DuplicateColumnPosition`.
    TableAttribute,
}

/// Options shared by every call made through one [`crate::RowMapper`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    pub cache_key: CacheKeyMode,
    pub positions: PositionSource,
}

impl MapperOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cache_key(mut self, cache_key: CacheKeyMode) -> Self {
        self.cache_key = cache_key;
        self
    }

    #[must_use]
    pub fn with_positions(mut self, positions: PositionSource) -> Self {
        self.positions = positions;
        self
    }

    /// Parse options from JSON such as `{"cache_key": "collapse_whitespace"}`. Missing fields
    /// keep their defaults.
    ///
    /// # Errors
    /// Returns `RowMapError::ConfigError` if the JSON is malformed or names an unknown mode.
    pub fn from_json_str(raw: &str) -> Result<Self, RowMapError> {
        serde_json::from_str(raw)
            .map_err(|e| RowMapError::ConfigError(format!("invalid mapper options: {e}")))
    }
}

/// Fluent builder for [`MapperOptions`].
#[derive(Debug, Clone, Default)]
pub struct MapperOptionsBuilder {
    opts: MapperOptions,
}

impl MapperOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cache_key(mut self, cache_key: CacheKeyMode) -> Self {
        self.opts.cache_key = cache_key;
        self
    }

    #[must_use]
    pub fn positions(mut self, positions: PositionSource) -> Self {
        self.opts.positions = positions;
        self
    }

    #[must_use]
    pub fn finish(self) -> MapperOptions {
        self.opts
    }
}
