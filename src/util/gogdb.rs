use super::http::{Fetch, FetchError, expect_ok};
use crate::build_id::{BuildIdentifier, extract_identifier};

use serde_json::Value;
use std::time::Duration;

pub const GOGDB_PRODUCT_URL: &str = "https://www.gogdb.org/data/products";

const SKIPPED_TAGS: [&str; 3] = ["windows", "english", "offline"];
const NO_TAGS: &str = "🎮";

/// Newest build gogdb.org knows about for one product.
#[derive(Clone, Debug)]
pub struct LatestBuild {
    pub identifier: BuildIdentifier,
    pub version: Option<String>,
    pub build_count: usize,
    pub tags: String,
}

pub struct GogDbClient<F: Fetch> {
    fetch: F,
    timeout: Duration,
}

impl<F: Fetch> GogDbClient<F> {
    pub fn new(fetch: F, timeout: Duration) -> Self {
        Self { fetch, timeout }
    }

    pub fn product_url(product_id: &str) -> String {
        format!("{GOGDB_PRODUCT_URL}/{product_id}/product.json")
    }

    pub fn latest(&self, product_id: &str) -> Result<LatestBuild, FetchError> {
        let url = Self::product_url(product_id);
        let response = self.fetch.get(&url, "application/json", self.timeout)?;
        let body = expect_ok(response)?;
        parse_product(&body)
    }
}

/// Reads the last entry of `builds[]`. Bodies that are not shaped like a
/// gogdb product go through the generic identifier extraction instead.
pub fn parse_product(body: &str) -> Result<LatestBuild, FetchError> {
    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(err) => {
            return extract_fallback(body).ok_or(FetchError::Json(err));
        }
    };

    let builds = json["builds"].as_array().map(Vec::as_slice).unwrap_or_default();
    let Some(last) = builds.last() else {
        return extract_fallback(body).ok_or(FetchError::NoBuilds);
    };

    let raw_id = match &last["id"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    let identifier = if raw_id.trim().is_empty() {
        BuildIdentifier::unknown()
    } else {
        BuildIdentifier::classify(&raw_id)
    };

    Ok(LatestBuild {
        identifier,
        version: last["version"]
            .as_str()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        build_count: builds.len(),
        tags: summarize_tags(&json),
    })
}

fn extract_fallback(body: &str) -> Option<LatestBuild> {
    let identifier = extract_identifier(body);
    if identifier.is_unknown() {
        return None;
    }
    Some(LatestBuild {
        identifier,
        version: None,
        build_count: 1,
        tags: NO_TAGS.to_string(),
    })
}

/// Short "Action • RPG • ⭐Achievements" style summary for the table.
pub fn summarize_tags(product: &Value) -> String {
    let mut tags: Vec<String> = Vec::new();

    if let Some(list) = product["tags"].as_array() {
        for tag in list.iter().take(5) {
            let name = match tag {
                Value::Object(_) => tag["name"].as_str().unwrap_or_default().to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let lower = name.to_lowercase();
            if name.is_empty() || SKIPPED_TAGS.iter().any(|skip| lower.contains(skip)) {
                continue;
            }
            tags.push(name);
            if tags.len() >= 3 {
                break;
            }
        }
    }

    if let Some(features) = product["features"].as_array() {
        for feature in features.iter().take(2) {
            let name = match feature {
                Value::Object(_) => feature["name"].as_str().unwrap_or_default(),
                Value::String(s) => s.as_str(),
                _ => "",
            };
            if !name.is_empty() && name.chars().count() < 15 {
                tags.push(format!("⭐{name}"));
            }
        }
    }

    if tags.is_empty() {
        NO_TAGS.to_string()
    } else {
        tags.truncate(3);
        tags.join(" • ")
    }
}
