use super::BirdFetcherConfig;

/// Overlay environment values onto a loaded config.
///
/// `lookup` is `std::env::var(..).ok()` in production; tests pass a map
/// so they never touch the process-wide environment.
pub fn apply_env_overrides<F>(config: &mut BirdFetcherConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("BIRDFETCHER_APPLICATION_ID") {
        config.skill.application_id = v;
    }
    if let Some(v) = lookup("BIRDFETCHER_HOST") {
        config.server.host = v;
    }
    if let Some(v) = lookup("BIRDFETCHER_PORT") {
        if let Ok(port) = v.parse::<u16>() {
            config.server.port = port;
        }
    }
    if let Some(v) = lookup("BIRDFETCHER_GEOCODING_API_KEY") {
        config.geocoding.api_key = Some(v);
    }
    if let Some(v) = lookup("BIRDFETCHER_EBIRD_API_TOKEN") {
        config.observations.api_token = Some(v);
    }
}
