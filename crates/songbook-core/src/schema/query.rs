//! Filtered song queries.
//!
//! A [`QueryFilter`] is an ordered list of `{column, operator, value}`
//! predicates compiled to parameterized SQL. Values are always bound as
//! positional parameters (`?1`, `?2`, ...) and never interpolated into the
//! query text. The same WHERE clause serves the COUNT query and the page
//! query.

use chrono::NaiveDate;
use rusqlite::types::Value;

use crate::model::{PageRequest, SongFilter};

/// Tables every song query reads from. Headers without a detail row still
/// surface.
pub(crate) const SONG_FROM: &str = "FROM songs s LEFT JOIN song_details d ON s.id = d.song_id";

/// Columns read by [`crate::schema::db`] when assembling a [`crate::model::Song`].
pub(crate) const SONG_COLUMNS: &str = "s.id, s.group_name, s.song_name, d.link, d.artist, \
     d.album, d.release_date, d.text, d.genre, d.duration, d.key, d.tempo";

/// SQL scalar that lower-cases text with full Unicode case mapping.
/// Registered on every connection by [`crate::schema::Database`].
pub(crate) const CASEFOLD_FN: &str = "casefold";

/// Storage format of `song_details.release_date`.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a predicate compares its column against its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Case-insensitive substring match.
    ContainsIgnoreCase,
    /// Exact equality.
    Equals,
}

/// A single `{column, operator, value}` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    fn to_sql(&self, index: usize) -> String {
        match self.operator {
            Operator::ContainsIgnoreCase => format!(
                "{CASEFOLD_FN}({}) LIKE {CASEFOLD_FN}(?{}) ESCAPE '\\'",
                self.column, index
            ),
            Operator::Equals => format!("{} = ?{}", self.column, index),
        }
    }
}

/// Ordered conjunction of predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    predicates: Vec<Predicate>,
}

impl QueryFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the predicates for a [`SongFilter`].
    ///
    /// Fields are visited in a fixed order (group, artist, album, title,
    /// release date) so the generated SQL and parameter numbering are
    /// deterministic. Empty fields are skipped.
    #[must_use]
    pub fn from_song_filter(filter: &SongFilter) -> Self {
        let mut query = Self::new();
        let text_fields = [
            ("s.group_name", &filter.group),
            ("d.artist", &filter.artist),
            ("COALESCE(d.album, '')", &filter.album),
            ("s.song_name", &filter.title),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                query = query.contains(column, value);
            }
        }
        if let Some(date) = filter.release_date {
            query = query.equals("d.release_date", format_date(date));
        }
        query
    }

    /// Append a case-insensitive substring predicate. `%`, `_` and `\` in
    /// `value` match literally.
    #[must_use]
    pub fn contains(mut self, column: &'static str, value: &str) -> Self {
        self.predicates.push(Predicate {
            column,
            operator: Operator::ContainsIgnoreCase,
            value: Value::Text(format!("%{}%", escape_like(value))),
        });
        self
    }

    /// Append an equality predicate.
    #[must_use]
    pub fn equals(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate {
            column,
            operator: Operator::Equals,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// ` WHERE ...` with a leading space, or an empty string when there are
    /// no predicates.
    #[must_use]
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        let conditions: Vec<String> = self
            .predicates
            .iter()
            .enumerate()
            .map(|(i, predicate)| predicate.to_sql(i + 1))
            .collect();
        format!(" WHERE {}", conditions.join(" AND "))
    }

    /// Bound values for [`Self::where_clause`], in parameter order.
    #[must_use]
    pub fn params(&self) -> Vec<Value> {
        self.predicates.iter().map(|p| p.value.clone()).collect()
    }

    #[must_use]
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) {SONG_FROM}{}", self.where_clause())
    }

    /// Page query; LIMIT and OFFSET take the two parameters after the
    /// predicates.
    #[must_use]
    pub fn page_sql(&self) -> String {
        let limit_index = self.predicates.len() + 1;
        format!(
            "SELECT {SONG_COLUMNS} {SONG_FROM}{} ORDER BY s.id ASC LIMIT ?{} OFFSET ?{}",
            self.where_clause(),
            limit_index,
            limit_index + 1
        )
    }

    /// Bound values for [`Self::page_sql`].
    #[must_use]
    pub fn page_params(&self, page: PageRequest) -> Vec<Value> {
        let mut params = self.params();
        params.push(Value::Integer(i64::from(page.page_size())));
        params.push(Value::Integer(
            i64::try_from(page.offset()).unwrap_or(i64::MAX),
        ));
        params
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let query = QueryFilter::from_song_filter(&SongFilter::default());
        assert!(query.is_empty());
        assert_eq!(query.where_clause(), "");
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM songs s LEFT JOIN song_details d ON s.id = d.song_id"
        );
    }

    #[test]
    fn test_predicates_follow_fixed_field_order() {
        let date = NaiveDate::from_ymd_opt(2009, 9, 7).unwrap();
        let filter = SongFilter::default()
            .with_release_date(date)
            .with_title("rising")
            .with_album("resist")
            .with_artist("muse")
            .with_group("mu");
        let query = QueryFilter::from_song_filter(&filter);

        let columns: Vec<&str> = query.predicates().iter().map(|p| p.column).collect();
        assert_eq!(
            columns,
            vec![
                "s.group_name",
                "d.artist",
                "COALESCE(d.album, '')",
                "s.song_name",
                "d.release_date"
            ]
        );
        assert_eq!(
            query.where_clause(),
            " WHERE casefold(s.group_name) LIKE casefold(?1) ESCAPE '\\' \
             AND casefold(d.artist) LIKE casefold(?2) ESCAPE '\\' \
             AND casefold(COALESCE(d.album, '')) LIKE casefold(?3) ESCAPE '\\' \
             AND casefold(s.song_name) LIKE casefold(?4) ESCAPE '\\' \
             AND d.release_date = ?5"
        );
        assert_eq!(query.params()[0], Value::Text("%mu%".to_string()));
        assert_eq!(query.params()[4], Value::Text("2009-09-07".to_string()));
    }

    #[test]
    fn test_empty_strings_are_skipped() {
        let filter = SongFilter::default().with_group("").with_title("Uprising");
        let query = QueryFilter::from_song_filter(&filter);
        assert_eq!(
            query.where_clause(),
            " WHERE casefold(s.song_name) LIKE casefold(?1) ESCAPE '\\'"
        );
    }

    #[test]
    fn test_values_are_never_interpolated() {
        let filter = SongFilter::default().with_group("'; DROP TABLE songs; --");
        let query = QueryFilter::from_song_filter(&filter);
        assert!(!query.count_sql().contains("DROP"));
        assert_eq!(
            query.params(),
            vec![Value::Text("%'; DROP TABLE songs; --%".to_string())]
        );
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        let query = QueryFilter::new().contains("s.song_name", r"100%_a\b");
        assert_eq!(query.params(), vec![Value::Text(r"%100\%\_a\\b%".to_string())]);
    }

    #[test]
    fn test_page_sql_numbers_limit_after_predicates() {
        let filter = SongFilter::default().with_group("Muse").with_artist("Muse");
        let query = QueryFilter::from_song_filter(&filter);
        assert!(query.page_sql().ends_with("ORDER BY s.id ASC LIMIT ?3 OFFSET ?4"));

        let page = PageRequest::new(3, 20).unwrap();
        let params = query.page_params(page);
        assert_eq!(params.len(), 4);
        assert_eq!(params[2], Value::Integer(20));
        assert_eq!(params[3], Value::Integer(40));
    }

    #[test]
    fn test_page_sql_without_filter() {
        let query = QueryFilter::new();
        assert!(query.page_sql().ends_with("d.song_id ORDER BY s.id ASC LIMIT ?1 OFFSET ?2"));
    }
}
