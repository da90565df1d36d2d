//! Interactive food truck pager.
//!
//! ## Fetcher selection
//!
//! - `TRUCK_PAGER_FETCHER=soda` (default) pages through the Socrata resource
//!   at `TRUCK_PAGER_ENDPOINT`, or the San Francisco mobile food schedule
//!   when unset.
//! - `TRUCK_PAGER_FETCHER=mock` serves canned records for offline runs.
//!
//! `TRUCK_PAGER_TIMEOUT_MS` bounds each request. Logs go to stderr, or to
//! `TRUCK_PAGER_LOG` when set; `TRUCK_PAGER_DEBUG=1` raises the level.

pub mod app;
pub mod fetchers;
