use page_fetch::PageFetcher;
use tracing::info;
use truck_pager::{
    invalid_prompt_line, render_table, NavKey, HELP_TEXT, NAVIGATION_HINT, NO_RESULTS,
};
use truck_session::record::FIELD_NAMES;
use truck_session::{
    parse_prompt_line, Clock, PageView, PaginatedSession, PromptCommand, QueryBuilder,
    SessionError, SystemClock,
};

pub const DEFAULT_WIDTH: usize = 120;
pub const END_OF_RESULTS: &str = "End of results";
pub const RETRY_HINT: &str = "Press the down arrow key to retry";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AwaitingCommand,
    Browsing,
    Exiting,
}

/// Prompt and navigation state of the interactive client.
///
/// Every handler returns the lines to print. The first `run` command that
/// gets past validation builds the session and switches to
/// [`Mode::Browsing`]. Pressing `m` while browsing returns to the prompt, and
/// a later `run` re-queries the same session with an empty cache. Rejected
/// commands leave the prompt in place.
pub struct App<F, C = SystemClock> {
    endpoint: String,
    fetcher: Option<F>,
    clock: C,
    width: usize,
    mode: Mode,
    session: Option<PaginatedSession<F>>,
}

impl<F: PageFetcher> App<F> {
    pub fn new(fetcher: F, endpoint: impl Into<String>) -> Self {
        Self::with_clock(fetcher, endpoint, SystemClock)
    }
}

impl<F: PageFetcher, C: Clock> App<F, C> {
    pub fn with_clock(fetcher: F, endpoint: impl Into<String>, clock: C) -> Self {
        Self {
            endpoint: endpoint.into(),
            fetcher: Some(fetcher),
            clock,
            width: DEFAULT_WIDTH,
            mode: Mode::AwaitingCommand,
            session: None,
        }
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> Option<&PaginatedSession<F>> {
        self.session.as_ref()
    }

    pub fn greeting(&self) -> Vec<String> {
        HELP_TEXT.lines().map(str::to_string).collect()
    }

    /// Handles one line typed at the command prompt.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        if self.mode != Mode::AwaitingCommand {
            return Vec::new();
        }

        match parse_prompt_line(line) {
            PromptCommand::Empty => Vec::new(),
            PromptCommand::Quit => {
                self.mode = Mode::Exiting;
                Vec::new()
            }
            PromptCommand::Unknown(word) => vec![invalid_prompt_line(&[word])],
            PromptCommand::Run(parsed) => {
                let options = match parsed.into_result() {
                    Ok(options) => options,
                    Err(SessionError::InvalidCommand { tokens }) => {
                        return vec![invalid_prompt_line(&tokens)];
                    }
                    Err(error) => return vec![error.to_string()],
                };
                match QueryBuilder::from_options(&options, &self.clock) {
                    Ok(query) => self.begin_browsing(query),
                    Err(error) => vec![error.to_string()],
                }
            }
        }
    }

    /// Handles one navigation key while browsing.
    pub fn handle_key(&mut self, key: NavKey) -> Vec<String> {
        if key == NavKey::Quit {
            self.mode = Mode::Exiting;
            return Vec::new();
        }

        if self.mode != Mode::Browsing {
            return Vec::new();
        }
        if key == NavKey::Options {
            self.mode = Mode::AwaitingCommand;
            return self.greeting();
        }

        let width = self.width;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        match key {
            NavKey::Next => match session.next() {
                Ok(view) => {
                    let mut lines = render_page(view, width);
                    if session.is_exhausted()
                        && session.cursor() == session.cache().last_index()
                    {
                        lines.push(END_OF_RESULTS.to_string());
                    }
                    lines
                }
                Err(error) => vec![error.to_string(), RETRY_HINT.to_string()],
            },
            NavKey::Previous => render_page(session.retreat(), width),
            NavKey::Options | NavKey::Quit => Vec::new(),
        }
    }

    fn begin_browsing(&mut self, query: QueryBuilder) -> Vec<String> {
        info!(
            sort_key = query.sort_key(),
            open_filter = query.open_filter(),
            batch_size = query.batch_size(),
            "starting session"
        );

        match self.session.as_mut() {
            Some(session) => session.requery(query),
            None => {
                let Some(fetcher) = self.fetcher.take() else {
                    return vec!["No fetcher available".to_string()];
                };
                self.session = Some(PaginatedSession::new(self.endpoint.clone(), query, fetcher));
            }
        }
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        self.mode = Mode::Browsing;
        let width = self.width;

        let mut lines = match session.start() {
            Ok(view) => render_page(view, width),
            Err(error) => vec![error.to_string(), RETRY_HINT.to_string()],
        };
        lines.push(NAVIGATION_HINT.to_string());
        lines
    }
}

/// Renders a page as a numbered table, or [`NO_RESULTS`] when it has no rows.
pub fn render_page(view: PageView<'_>, width: usize) -> Vec<String> {
    match view {
        PageView::Page { index, records } if !records.is_empty() => {
            let rows: Vec<Vec<Option<&str>>> = records
                .iter()
                .map(|record| record.fields().to_vec())
                .collect();
            let mut lines = vec![format!("Page {}", index + 1)];
            lines.extend(render_table(&FIELD_NAMES, &rows, width));
            lines
        }
        _ => vec![NO_RESULTS.to_string()],
    }
}
