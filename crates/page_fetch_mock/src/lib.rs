//! Deterministic scripted implementation of the `page_fetch` contract.
//!
//! This crate contains no transport logic and is intended for offline runs
//! and contract-level testing of paginated sessions.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use page_fetch::{FetchError, PageFetcher};
use serde_json::Value;

/// Stable fetcher identifier used for explicit startup selection.
pub const MOCK_FETCHER_ID: &str = "mock";

/// Body returned once the script has been consumed.
pub const EXHAUSTED_BODY: &str = "[]";

/// Fetcher that answers requests from a fixed script, in order.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<String, FetchError>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    /// Creates a fetcher that replays `responses` one per request.
    #[must_use]
    pub fn new(responses: Vec<Result<String, FetchError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a fetcher whose responses are the given JSON pages.
    #[must_use]
    pub fn json_pages(pages: Vec<Value>) -> Self {
        Self::new(pages.into_iter().map(|page| Ok(page.to_string())).collect())
    }

    /// Appends one more scripted response.
    pub fn push_response(&self, response: Result<String, FetchError>) {
        lock_unpoisoned(&self.script).push_back(response);
    }

    /// Returns every URL requested so far, in request order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        lock_unpoisoned(&self.requests).clone()
    }

    /// Returns the number of requests served so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock_unpoisoned(&self.requests).len()
    }

    /// Returns the number of scripted responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        lock_unpoisoned(&self.script).len()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetcher_id(&self) -> &str {
        MOCK_FETCHER_ID
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        lock_unpoisoned(&self.requests).push(url.to_string());
        lock_unpoisoned(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(EXHAUSTED_BODY.to_string()))
    }
}

/// Row limit the endpoint applies when a request has no `$limit`.
pub const DEFAULT_SAMPLE_LIMIT: usize = 1000;

/// Fetcher over a fixed set of canned food-truck records that honours the
/// request's `$limit` and `$offset`.
///
/// `$offset` counts pages, as sessions send it: offset `k` with limit `n`
/// serves records `k * n .. (k + 1) * n`.
#[derive(Debug, Default)]
pub struct SampleFetcher {
    records: Vec<Value>,
    requests: Mutex<Vec<String>>,
}

impl SampleFetcher {
    #[must_use]
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            requests: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        lock_unpoisoned(&self.requests).clone()
    }
}

impl PageFetcher for SampleFetcher {
    fn fetcher_id(&self) -> &str {
        MOCK_FETCHER_ID
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        lock_unpoisoned(&self.requests).push(url.to_string());

        let limit = query_param(url, "$limit")?.unwrap_or(DEFAULT_SAMPLE_LIMIT);
        let page = query_param(url, "$offset")?.unwrap_or(0);
        let start = page.saturating_mul(limit).min(self.records.len());
        let end = start.saturating_add(limit).min(self.records.len());

        Ok(Value::Array(self.records[start..end].to_vec()).to_string())
    }
}

fn query_param(url: &str, name: &str) -> Result<Option<usize>, FetchError> {
    let Some((_, query)) = url.split_once('?') else {
        return Ok(None);
    };
    let Some(value) = query
        .split('&')
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
    else {
        return Ok(None);
    };
    value.parse::<usize>().map(Some).map_err(|_| FetchError::Status {
        status: 400,
        message: format!("invalid {name} value '{value}'"),
    })
}

/// Canned food-truck records for offline runs of the interactive client.
#[must_use]
pub fn sample_fetcher(total_records: usize) -> SampleFetcher {
    let records = (0..total_records)
        .map(|index| {
            serde_json::json!({
                "locationid": format!("{}", 1_000_000 + index),
                "starttime": "10AM",
                "endtime": "2PM",
                "optionaltext": "Tacos, burritos, aguas frescas",
                "applicant": format!("Sample Truck {index:03}"),
                "location": format!("{} MARKET ST", 100 + index),
            })
        })
        .collect();
    SampleFetcher::new(records)
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use page_fetch::{FetchError, PageFetcher};
    use serde_json::json;

    use super::{sample_fetcher, ScriptedFetcher, EXHAUSTED_BODY, MOCK_FETCHER_ID};

    const BASE: &str = "https://example.invalid/resource/trucks.json";

    fn page_len(body: &str) -> usize {
        serde_json::from_str::<serde_json::Value>(body)
            .expect("json")
            .as_array()
            .map_or(0, Vec::len)
    }

    #[test]
    fn replays_script_in_order_and_records_urls() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok("[1]".to_string()),
            Err(FetchError::transport("down")),
        ]);

        assert_eq!(fetcher.fetch("u1").expect("first response"), "[1]");
        assert_eq!(
            fetcher.fetch("u2").expect_err("second response fails"),
            FetchError::transport("down")
        );
        assert_eq!(fetcher.requested_urls(), vec!["u1", "u2"]);
        assert_eq!(fetcher.fetcher_id(), MOCK_FETCHER_ID);
    }

    #[test]
    fn answers_empty_array_after_script_runs_out() {
        let fetcher = ScriptedFetcher::json_pages(vec![json!([{"applicant": "a"}])]);
        fetcher.fetch("u").expect("scripted page");

        assert_eq!(fetcher.remaining(), 0);
        assert_eq!(fetcher.fetch("u").expect("fallback body"), EXHAUSTED_BODY);
        assert_eq!(fetcher.call_count(), 2);
    }

    #[test]
    fn sample_fetcher_slices_by_limit_and_page_offset() {
        let fetcher = sample_fetcher(25);

        let first = fetcher
            .fetch(&format!("{BASE}?$order=applicant&$limit=3&$offset=0"))
            .expect("first page");
        assert_eq!(page_len(&first), 3);
        assert!(first.contains("Sample Truck 000"));

        let second = fetcher
            .fetch(&format!("{BASE}?$order=applicant&$limit=3&$offset=1"))
            .expect("second page");
        assert!(second.contains("Sample Truck 003"));

        let whole = fetcher
            .fetch(&format!("{BASE}?$limit=25&$offset=0"))
            .expect("whole set");
        assert_eq!(page_len(&whole), 25);

        let tail = fetcher
            .fetch(&format!("{BASE}?$limit=10&$offset=2"))
            .expect("short tail");
        assert_eq!(page_len(&tail), 5);

        let past_end = fetcher
            .fetch(&format!("{BASE}?$limit=10&$offset=7"))
            .expect("past the end");
        assert_eq!(past_end, EXHAUSTED_BODY);
        assert_eq!(fetcher.requested_urls().len(), 5);
    }

    #[test]
    fn sample_fetcher_defaults_and_rejects_bad_params() {
        let fetcher = sample_fetcher(4);
        assert_eq!(page_len(&fetcher.fetch(BASE).expect("no query")), 4);
        assert_eq!(
            fetcher
                .fetch(&format!("{BASE}?$limit=ten"))
                .expect_err("bad limit")
                .status(),
            Some(400)
        );
    }

    #[test]
    fn push_response_extends_script() {
        let fetcher = ScriptedFetcher::default();
        fetcher.push_response(Ok("[]".to_string()));
        assert_eq!(fetcher.remaining(), 1);
    }
}
