use super::http::{Fetch, expect_ok};

use serde_json::Value;
use std::time::Duration;

pub const RELEASES_URL: &str = "https://github.com/AhmedAlfahdi/GOG-UpdateChecker/releases";
const LATEST_RELEASE_API: &str =
    "https://api.github.com/repos/AhmedAlfahdi/GOG-UpdateChecker/releases/latest";

/// Asks GitHub for the newest release tag and reports whether it is ahead of
/// the running binary. Any failure counts as "no update".
pub fn check_for_checker_update(fetch: &impl Fetch) -> bool {
    let body = match fetch
        .get(LATEST_RELEASE_API, "application/vnd.github+json", Duration::from_secs(10))
        .and_then(expect_ok)
    {
        Ok(body) => body,
        Err(err) => {
            log::debug!("Self update check failed: {err}");
            return false;
        }
    };

    let Ok(release) = serde_json::from_str::<Value>(&body) else {
        return false;
    };
    release["tag_name"]
        .as_str()
        .map(|tag| is_newer(tag, env!("CARGO_PKG_VERSION")))
        .unwrap_or(false)
}

/// `v1.2.0` vs `1.1.9` -> true. Tags that aren't semver never count as newer.
pub fn is_newer(tag: &str, current: &str) -> bool {
    let latest = tag.strip_prefix('v').unwrap_or(tag);
    match (semver::Version::parse(latest), semver::Version::parse(current)) {
        (Ok(latest), Ok(current)) => latest > current,
        _ => false,
    }
}
