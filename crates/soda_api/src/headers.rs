use std::collections::BTreeMap;

use crate::config::SodaApiConfig;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Build a deterministic header map for resource requests.
pub fn build_headers(config: &SodaApiConfig) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    headers.insert(HEADER_ACCEPT.to_owned(), "application/json".to_owned());

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        headers.insert(key, value.trim().to_owned());
    }

    headers
}

fn default_user_agent() -> String {
    format!(
        "truck-pager/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        normalize_arch(std::env::consts::ARCH)
    )
}

fn normalize_arch(arch: &str) -> String {
    match arch.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" => "x64".to_owned(),
        "x86" | "i386" | "i686" => "ia32".to_owned(),
        "aarch64" => "arm64".to_owned(),
        normalized => normalized.to_owned(),
    }
}
