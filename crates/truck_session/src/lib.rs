//! Paginated query sessions over a remote tabular resource.
//!
//! A [`QueryBuilder`] serializes filter/sort/batch intent into the endpoint's
//! query string, a [`PaginatedSession`] fetches one page per logical offset
//! through an injected [`page_fetch::PageFetcher`] and caches every page it
//! has seen, and [`parse_options`] turns a user command into the options a
//! builder is constructed from.
//!
//! Known limitations carried for wire compatibility:
//! - time bounds use a coarse hour format in which midnight and noon collapse
//!   (`0AM`, `12AM`), see [`format_hour`];
//! - the `$offset` parameter advances by one per page rather than by the batch
//!   size, see [`QueryBuilder::advance_page`].

pub mod cache;
pub mod clock;
pub mod command;
pub mod error;
pub mod query;
pub mod record;
pub mod session;

pub use cache::PageCache;
pub use clock::{format_hour, Clock, FixedClock, SystemClock};
pub use command::{
    parse_options, parse_prompt_line, ParsedCommand, PromptCommand, RecognizedOptions,
};
pub use error::SessionError;
pub use query::{QueryBuilder, QueryConfig};
pub use record::{parse_page, ResultRecord};
pub use session::{PageView, PaginatedSession, SessionState};
