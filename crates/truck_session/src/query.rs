//! Serialization of filter/sort/batch intent into the resource query string.

use crate::clock::{format_hour, Clock};
use crate::command::RecognizedOptions;
use crate::error::SessionError;

pub const DEFAULT_SORT_KEY: &str = "applicant";
pub const DEFAULT_BATCH_SIZE: i64 = 10;

const WHERE_JOINER: &str = "%20AND%20";

/// Construction parameters for a [`QueryBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Restrict to records whose schedule covers the current hour.
    pub open_filter: bool,
    pub sort_key: String,
    pub batch_size: i64,
    pub offset: i64,
    /// Fields to request; empty means the endpoint's default columns.
    pub projected_fields: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            open_filter: true,
            sort_key: DEFAULT_SORT_KEY.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            offset: 0,
            projected_fields: Vec::new(),
        }
    }
}

impl QueryConfig {
    #[must_use]
    pub fn new(open_filter: bool, sort_key: impl Into<String>, batch_size: i64) -> Self {
        Self {
            open_filter,
            sort_key: sort_key.into(),
            batch_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_projected_fields(
        mut self,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.projected_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Query state for one paginated session.
///
/// Time bounds are computed once, from the clock hour at construction. The
/// offset only moves forward, through [`QueryBuilder::advance_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    open_filter: bool,
    sort_key: String,
    batch_size: usize,
    offset: u64,
    projected_fields: Vec<String>,
    start_bound: String,
    end_bound: String,
}

impl QueryBuilder {
    pub fn new(config: QueryConfig, clock: &dyn Clock) -> Result<Self, SessionError> {
        let sort_key = config.sort_key.trim();
        if sort_key.is_empty() {
            return Err(SessionError::invalid_argument(
                "sortBy",
                "sort key must not be empty",
            ));
        }
        check_column_expr("sortBy", sort_key, true)?;
        let batch_size = usize::try_from(config.batch_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                SessionError::invalid_argument(
                    "batchSize",
                    format!("must be a positive integer, got {}", config.batch_size),
                )
            })?;
        let offset = u64::try_from(config.offset).map_err(|_| {
            SessionError::invalid_argument(
                "offset",
                format!("must not be negative, got {}", config.offset),
            )
        })?;

        let mut projected_fields: Vec<String> = Vec::new();
        for field in config.projected_fields {
            let field = field.trim();
            if !field.is_empty() {
                check_column_expr("projectedFields", field, false)?;
            }
            if !field.is_empty() && !projected_fields.iter().any(|seen| seen == field) {
                projected_fields.push(field.to_string());
            }
        }

        let hour = format_hour(clock.current_hour());
        let (start_bound, end_bound) = if config.open_filter {
            (
                format!("starttime<=\"{hour}\""),
                format!("endtime>=\"{hour}\""),
            )
        } else {
            (format!("starttime<\"{hour}\""), format!("endtime>\"{hour}\""))
        };

        Ok(Self {
            open_filter: config.open_filter,
            sort_key: sort_key.to_string(),
            batch_size,
            offset,
            projected_fields,
            start_bound,
            end_bound,
        })
    }

    /// Builds from parsed command options, applying defaults for omitted ones.
    ///
    /// `isOpen` must be `true` or `false` and `batchSize` a positive integer.
    pub fn from_options(
        options: &RecognizedOptions,
        clock: &dyn Clock,
    ) -> Result<Self, SessionError> {
        let mut config = QueryConfig::default();

        if let Some(sort_by) = &options.sort_by {
            config.sort_key = sort_by.clone();
        }
        if let Some(is_open) = &options.is_open {
            config.open_filter = parse_bool("isOpen", is_open)?;
        }
        if let Some(batch_size) = &options.batch_size {
            config.batch_size = batch_size.trim().parse::<i64>().map_err(|_| {
                SessionError::invalid_argument(
                    "batchSize",
                    format!("must be a positive integer, got '{batch_size}'"),
                )
            })?;
        }

        Self::new(config, clock)
    }

    /// Serializes the current state into the endpoint's query string.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut query = format!(
            "$where={}{WHERE_JOINER}{}&$order={}&$limit={}&$offset={}",
            self.start_bound, self.end_bound, self.sort_key, self.batch_size, self.offset
        );
        if !self.projected_fields.is_empty() {
            query.push_str("&$select=");
            query.push_str(&self.projected_fields.join(","));
        }
        query
    }

    /// Moves the offset forward by one.
    ///
    /// The offset counts pages, not rows: the `$offset` parameter grows by 1
    /// per fetched page regardless of the batch size. This mirrors the query
    /// strings existing deployments send and should be checked against the
    /// endpoint's paging contract before relying on it for row-exact paging.
    pub fn advance_page(&mut self) {
        self.offset += 1;
    }

    #[must_use]
    pub fn open_filter(&self) -> bool {
        self.open_filter
    }

    #[must_use]
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn projected_fields(&self) -> &[String] {
        &self.projected_fields
    }

    #[must_use]
    pub fn start_bound(&self) -> &str {
        &self.start_bound
    }

    #[must_use]
    pub fn end_bound(&self) -> &str {
        &self.end_bound
    }
}

/// Accepts column names (`applicant`, `:id`) and, for sort keys, a direction
/// suffix such as `starttime DESC`. Anything else could add or cut query
/// parameters once written into the query string.
fn check_column_expr(
    name: &'static str,
    value: &str,
    allow_space: bool,
) -> Result<(), SessionError> {
    let invalid = value.chars().find(|ch| {
        !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':') || (allow_space && *ch == ' '))
    });
    match invalid {
        Some(ch) => Err(SessionError::invalid_argument(
            name,
            format!("unsupported character {ch:?} in '{value}'"),
        )),
        None => Ok(()),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, SessionError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(SessionError::invalid_argument(
            name,
            format!("expected 'true' or 'false', got '{other}'"),
        )),
    }
}
