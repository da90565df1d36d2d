use page_fetch::PageFetcher;
use page_fetch_mock::{sample_fetcher, MOCK_FETCHER_ID};
use page_fetch_soda_api::{SodaApiFetcher, SodaApiFetcherConfig, SODA_API_FETCHER_ID};
use soda_api::normalize_resource_url;
use truck_pager::EnvConfig;

pub const DEFAULT_FETCHER_ID: &str = SODA_API_FETCHER_ID;

/// Records served by the mock fetcher.
pub const SAMPLE_RECORD_COUNT: usize = 25;

/// Fetcher chosen at startup and the endpoint sessions page through.
pub struct SelectedFetcher {
    pub fetcher: Box<dyn PageFetcher>,
    pub endpoint: String,
}

pub fn fetcher_from_config(config: &EnvConfig) -> Result<SelectedFetcher, String> {
    fetcher_for_id(
        config.fetcher.as_deref().unwrap_or(DEFAULT_FETCHER_ID),
        config,
    )
}

pub fn fetcher_for_id(fetcher_id: &str, config: &EnvConfig) -> Result<SelectedFetcher, String> {
    match fetcher_id {
        SODA_API_FETCHER_ID => {
            let mut fetcher_config = SodaApiFetcherConfig::default();
            if let Some(endpoint) = &config.endpoint {
                fetcher_config = fetcher_config.with_base_url(endpoint.clone());
            }
            if let Some(timeout) = config.timeout {
                fetcher_config = fetcher_config.with_timeout(timeout);
            }

            let fetcher = SodaApiFetcher::new(fetcher_config)
                .map_err(|error| format!("Failed to initialize fetcher 'soda': {error}"))?;
            let endpoint = fetcher.resource_url();
            Ok(SelectedFetcher {
                fetcher: Box::new(fetcher),
                endpoint,
            })
        }
        MOCK_FETCHER_ID => Ok(SelectedFetcher {
            fetcher: Box::new(sample_fetcher(SAMPLE_RECORD_COUNT)),
            endpoint: normalize_resource_url(config.endpoint.as_deref().unwrap_or_default()),
        }),
        unknown => Err(format!(
            "Unsupported fetcher '{unknown}'. Available fetchers: {SODA_API_FETCHER_ID}, {MOCK_FETCHER_ID}"
        )),
    }
}
