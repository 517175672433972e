use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Build identifiers shorter than this are treated as plain version strings.
pub const MIN_BUILD_ID_DIGITS: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdentifierKind {
    BuildId,
    VersionString,
    OpaqueId,
    Unknown,
}

/// Identifier pulled out of a metadata file or API response.
///
/// `numeric_value` is only ever populated for [`IdentifierKind::BuildId`], so
/// the fields stay private and every value goes through one of the
/// constructors below.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildIdentifier {
    raw_value: String,
    kind: IdentifierKind,
    numeric_value: Option<u128>,
}

impl BuildIdentifier {
    /// Classifies a candidate value found in source text. The raw value is
    /// kept as-is; whitespace and stray quotes are only ignored while
    /// checking whether it is a numeric build id.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        let numeric_value = if trimmed.len() >= MIN_BUILD_ID_DIGITS
            && trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            trimmed.parse::<u128>().ok()
        } else {
            None
        };

        Self {
            raw_value: raw.to_string(),
            kind: match numeric_value {
                Some(_) => IdentifierKind::BuildId,
                None => IdentifierKind::VersionString,
            },
            numeric_value,
        }
    }

    /// Fallback identifier such as a catalog product id. Never numeric, even
    /// when the id happens to be all digits.
    pub fn opaque(id: &str) -> Self {
        Self {
            raw_value: id.to_string(),
            kind: IdentifierKind::OpaqueId,
            numeric_value: None,
        }
    }

    pub fn unknown() -> Self {
        Self {
            raw_value: String::new(),
            kind: IdentifierKind::Unknown,
            numeric_value: None,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn numeric_value(&self) -> Option<u128> {
        self.numeric_value
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == IdentifierKind::Unknown
    }

    /// Text shown in tables and reports.
    pub fn display(&self) -> &str {
        match self.kind {
            IdentifierKind::Unknown => "Unknown",
            _ => self.raw_value.trim(),
        }
    }

    /// Short description of what kind of identifier this is.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            IdentifierKind::BuildId => "Build ID",
            IdentifierKind::VersionString => "Version",
            IdentifierKind::OpaqueId => "GOG ID",
            IdentifierKind::Unknown => "Unknown",
        }
    }
}

impl Default for BuildIdentifier {
    fn default() -> Self {
        Self::unknown()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComparisonResult {
    UpdateAvailable,
    UpToDate,
    NewerInstalled,
    Indeterminate,
}

impl ComparisonResult {
    pub fn label(&self) -> &'static str {
        match self {
            ComparisonResult::UpdateAvailable => "Update Available",
            ComparisonResult::UpToDate => "Up to Date",
            ComparisonResult::NewerInstalled => "Newer Version Installed",
            ComparisonResult::Indeterminate => "Different Version",
        }
    }
}

// Keys in priority order, and whether an unquoted number counts as a value.
// `.info` files carry a bare `"version": 1` format marker, so `version` only
// matches quoted text.
const KEYS: [(&str, bool); 4] = [
    ("buildId", true),
    ("build_id", true),
    ("build", true),
    ("version", false),
];

static MATCHERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    KEYS.iter()
        .filter_map(|&(key, bare_numbers)| {
            let quoted = r#""((?:[^"\\]|\\.)*)""#;
            let value = match bare_numbers {
                true => format!(r"(?:{quoted}|(\d+))"),
                false => quoted.to_string(),
            };
            Regex::new(&format!(r#"(?i)"{key}"\s*:\s*{value}"#)).ok()
        })
        .collect()
});

/// Finds the highest-priority identifier field in loosely JSON-shaped text.
/// Absence of any usable field is reported as [`IdentifierKind::Unknown`].
pub fn extract_identifier(text: &str) -> BuildIdentifier {
    for matcher in MATCHERS.iter() {
        if let Some(raw) = first_value(matcher, text) {
            return BuildIdentifier::classify(raw);
        }
    }
    BuildIdentifier::unknown()
}

/// First non-blank value captured by `matcher`. Blank values do not stop the
/// search, a later occurrence of the same key may still carry one.
fn first_value<'t>(matcher: &Regex, text: &'t str) -> Option<&'t str> {
    matcher.captures_iter(text).find_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .filter(|value| !value.trim().trim_matches(|c| c == '"' || c == '\'').is_empty())
    })
}

/// Classifies installed vs. latest.
///
/// Numeric ordering applies only when both sides are build ids. Any other
/// pairing falls back to exact raw string equality, so a build id compared
/// with a version string is almost always `Indeterminate`.
pub fn compare(installed: &BuildIdentifier, latest: &BuildIdentifier) -> ComparisonResult {
    if let (Some(a), Some(b)) = (installed.numeric_value, latest.numeric_value) {
        return match a.cmp(&b) {
            Ordering::Less => ComparisonResult::UpdateAvailable,
            Ordering::Greater => ComparisonResult::NewerInstalled,
            Ordering::Equal => ComparisonResult::UpToDate,
        };
    }

    if installed.is_unknown() || latest.is_unknown() {
        return ComparisonResult::Indeterminate;
    }

    if installed.raw_value == latest.raw_value {
        ComparisonResult::UpToDate
    } else {
        ComparisonResult::Indeterminate
    }
}
