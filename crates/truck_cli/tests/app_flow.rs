use std::io;
use std::sync::{Arc, Mutex};

use page_fetch::FetchError;
use page_fetch_mock::{sample_fetcher, ScriptedFetcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use truck_cli::app::{App, Mode, END_OF_RESULTS, RETRY_HINT};
use truck_pager::{NavKey, NAVIGATION_HINT};
use truck_session::FixedClock;

const ENDPOINT: &str = "https://data.example.org/resource/trucks.json";

fn truck(id: u32, applicant: &str) -> serde_json::Value {
    json!({
        "locationid": id.to_string(),
        "starttime": "10AM",
        "endtime": "6PM",
        "applicant": applicant,
        "location": "1 MARKET ST",
    })
}

fn app_with(fetcher: &ScriptedFetcher) -> App<&ScriptedFetcher, FixedClock> {
    App::with_clock(fetcher, ENDPOINT, FixedClock(16))
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        let bytes = self.0.lock().map(|bytes| bytes.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn unrecognized_options_are_listed_and_nothing_is_fetched() {
    let fetcher = ScriptedFetcher::json_pages(vec![]);
    let mut app = app_with(&fetcher);

    let output = app.handle_line("run -sortBy=starttime,-foo=1,-batchSize=25");

    assert_eq!(output, vec!["Invalid Prompt(s)!: -foo".to_string()]);
    assert_eq!(app.mode(), Mode::AwaitingCommand);
    assert_eq!(fetcher.call_count(), 0);
}

#[test]
fn zero_batch_size_is_rejected_before_any_fetch() {
    let fetcher = ScriptedFetcher::json_pages(vec![]);
    let mut app = app_with(&fetcher);

    let output = app.handle_line("run -batchSize=0");

    assert_eq!(output.len(), 1);
    assert!(output[0].contains("batchSize"), "{output:?}");
    assert_eq!(app.mode(), Mode::AwaitingCommand);
    assert!(app.session().is_none());
    assert_eq!(fetcher.call_count(), 0);
}

#[test]
fn run_renders_first_page_and_enters_browsing() {
    let fetcher = ScriptedFetcher::json_pages(vec![json!([
        truck(1, "Ben's Tacos"),
        truck(2, "Curry Up Now")
    ])]);
    let mut app = app_with(&fetcher);

    let output = app.handle_line("run -batchSize=2");

    assert_eq!(app.mode(), Mode::Browsing);
    assert_eq!(output[0], "Page 1");
    assert!(output.iter().any(|line| line.contains("Ben's Tacos")));
    assert!(output.iter().any(|line| line.contains("Curry Up Now")));
    assert_eq!(output.last().map(String::as_str), Some(NAVIGATION_HINT));

    let urls = fetcher.requested_urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with(&format!("{ENDPOINT}?$where=")));
    assert!(urls[0].contains("4PM"));
    assert!(urls[0].ends_with("&$order=applicant&$limit=2&$offset=0"));
}

#[test]
fn arrows_page_forward_and_back_through_the_cache() {
    let fetcher = ScriptedFetcher::json_pages(vec![
        json!([truck(1, "Ben's Tacos"), truck(2, "Curry Up Now")]),
        json!([truck(3, "Senor Sisig")]),
    ]);
    let mut app = app_with(&fetcher);
    app.handle_line("run -batchSize=2");

    let second = app.handle_key(NavKey::Next);
    assert_eq!(second[0], "Page 2");
    assert!(second.iter().any(|line| line.contains("Senor Sisig")));
    assert_eq!(second.last().map(String::as_str), Some(END_OF_RESULTS));
    assert_eq!(fetcher.call_count(), 2);

    // Exhausted: the last page repeats without another request.
    let again = app.handle_key(NavKey::Next);
    assert_eq!(again, second);
    assert_eq!(fetcher.call_count(), 2);

    let first = app.handle_key(NavKey::Previous);
    assert_eq!(first[0], "Page 1");
    let top = app.handle_key(NavKey::Previous);
    assert_eq!(top, first);

    let forward = app.handle_key(NavKey::Next);
    assert_eq!(forward, second);
    assert_eq!(fetcher.call_count(), 2);
}

#[test]
fn empty_result_set_renders_no_results() {
    let fetcher = ScriptedFetcher::json_pages(vec![json!([])]);
    let mut app = app_with(&fetcher);

    let output = app.handle_line("run");

    assert_eq!(
        output,
        vec!["No results found".to_string(), NAVIGATION_HINT.to_string()]
    );
}

#[test]
fn failed_first_fetch_keeps_browsing_and_down_retries() {
    let fetcher = ScriptedFetcher::new(vec![
        Err(FetchError::transport("connection refused")),
        Ok(json!([truck(1, "Ben's Tacos")]).to_string()),
    ]);
    let mut app = app_with(&fetcher);

    let output = app.handle_line("run -batchSize=5");
    assert_eq!(app.mode(), Mode::Browsing);
    assert!(output[0].contains("connection refused"), "{output:?}");
    assert_eq!(output[1], RETRY_HINT);

    let retried = app.handle_key(NavKey::Next);
    assert_eq!(retried[0], "Page 1");

    let urls = fetcher.requested_urls();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0], urls[1]);
}

#[test]
fn quit_commands_and_keys_exit() {
    let fetcher = ScriptedFetcher::json_pages(vec![json!([truck(1, "Ben's Tacos")])]);

    let mut at_prompt = app_with(&fetcher);
    assert_eq!(at_prompt.handle_line("  QUIT "), Vec::<String>::new());
    assert_eq!(at_prompt.mode(), Mode::Exiting);

    let mut browsing = app_with(&fetcher);
    browsing.handle_line("run");
    assert_eq!(browsing.handle_key(NavKey::Quit), Vec::<String>::new());
    assert_eq!(browsing.mode(), Mode::Exiting);
}

#[test]
fn unknown_prompt_words_are_rejected() {
    let fetcher = ScriptedFetcher::json_pages(vec![]);
    let mut app = app_with(&fetcher);

    assert_eq!(
        app.handle_line("search tacos"),
        vec!["Invalid Prompt(s)!: search".to_string()]
    );
    assert_eq!(app.handle_line("   "), Vec::<String>::new());
    assert_eq!(app.mode(), Mode::AwaitingCommand);
}

#[test]
fn keys_before_a_session_do_nothing() {
    let fetcher = ScriptedFetcher::json_pages(vec![]);
    let mut app = app_with(&fetcher);

    assert_eq!(app.handle_key(NavKey::Next), Vec::<String>::new());
    assert_eq!(app.handle_key(NavKey::Previous), Vec::<String>::new());
    assert_eq!(fetcher.call_count(), 0);
}

#[test]
fn failed_fetch_is_logged_once() {
    let fetcher = ScriptedFetcher::new(vec![Err(FetchError::transport("connection refused"))]);
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let output = tracing::subscriber::with_default(subscriber, || {
        app_with(&fetcher).handle_line("run -batchSize=5")
    });

    assert_eq!(output.len(), 3, "{output:?}");
    let text = logs.text();
    let warnings: Vec<&str> = text.lines().filter(|line| line.contains("WARN")).collect();
    assert_eq!(warnings.len(), 1, "{text}");
    assert!(warnings[0].contains("connection refused"), "{text}");
}

#[test]
fn sample_data_pages_by_the_requested_batch_size() {
    let fetcher = sample_fetcher(25);
    let mut app = App::with_clock(&fetcher, ENDPOINT, FixedClock(16));

    let first = app.handle_line("run -batchSize=3");
    assert_eq!(first[0], "Page 1");
    assert!(first.iter().any(|line| line.contains("Sample Truck 002")));
    assert!(!first.iter().any(|line| line.contains("Sample Truck 003")));

    let second = app.handle_key(NavKey::Next);
    assert_eq!(second[0], "Page 2");
    assert!(second.iter().any(|line| line.contains("Sample Truck 003")));
    assert!(!app.session().is_some_and(|session| session.is_exhausted()));

    let mut whole = App::with_clock(&fetcher, ENDPOINT, FixedClock(16));
    let all = whole.handle_line("run -batchSize=25");
    assert!(all.iter().any(|line| line.contains("Sample Truck 024")));
    assert!(!whole.session().is_some_and(|session| session.is_exhausted()));
}

#[test]
fn options_key_returns_to_prompt_and_run_requeries_with_empty_cache() {
    let fetcher = ScriptedFetcher::json_pages(vec![
        json!([truck(1, "Ben's Tacos"), truck(2, "Curry Up Now")]),
        json!([truck(3, "Senor Sisig")]),
        json!([truck(4, "Zzz Pizza")]),
    ]);
    let mut app = app_with(&fetcher);
    app.handle_line("run -batchSize=2");
    app.handle_key(NavKey::Next);

    let help = app.handle_key(NavKey::Options);
    assert_eq!(app.mode(), Mode::AwaitingCommand);
    assert_eq!(help, app.greeting());
    assert_eq!(app.handle_key(NavKey::Next), Vec::<String>::new());

    let fresh = app.handle_line("run -sortBy=location,-batchSize=4");
    assert_eq!(app.mode(), Mode::Browsing);
    assert_eq!(fresh[0], "Page 1");
    assert!(fresh.iter().any(|line| line.contains("Zzz Pizza")));
    assert!(!fresh.iter().any(|line| line.contains("Ben's Tacos")));

    let session = app.session().expect("session");
    assert_eq!(session.cache().len(), 1);
    assert_eq!(session.cursor(), Some(0));

    let urls = fetcher.requested_urls();
    assert_eq!(urls.len(), 3);
    assert!(urls[2].ends_with("&$order=location&$limit=4&$offset=0"), "{urls:?}");

    // Back on the first page of the new query.
    assert_eq!(app.handle_key(NavKey::Previous), fresh[..fresh.len() - 1].to_vec());
}
