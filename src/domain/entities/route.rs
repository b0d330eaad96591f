//! Route entity: a short key mapped to a destination URL.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use url::Url;
use validator::{Validate, ValidationError};

use crate::error::StoreResult;

/// Layout used to persist timestamps in both dialects.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keys that would shadow HTTP endpoints.
const RESERVED_KEYS: &[&str] = &["api", "health"];

static SHORT_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").unwrap());

/// Naive email shape: `local@domain.tld`.
static PRINCIPAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,})+$").unwrap());

/// A go-link route.
///
/// `team` defaults to the creator and `last_modified_by` to the creator when a
/// route is built with [`Route::new`]. Timestamps carry second precision, which
/// is what the database keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Route {
    #[validate(custom(function = "validate_short_key"))]
    pub short_key: String,

    #[validate(custom(function = "validate_absolute_url"))]
    pub url: String,

    #[validate(
        length(min = 3, max = 254),
        regex(path = "*PRINCIPAL_REGEX", message = "Invalid creator address")
    )]
    pub creator: String,

    #[validate(
        length(min = 3, max = 254),
        regex(path = "*PRINCIPAL_REGEX", message = "Invalid team address")
    )]
    pub team: String,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,

    #[validate(
        length(min = 3, max = 254),
        regex(path = "*PRINCIPAL_REGEX", message = "Invalid last modified by address")
    )]
    pub last_modified_by: String,

    /// Locked routes can only be changed by an admin.
    #[serde(default)]
    pub locked: bool,
}

impl Route {
    /// Builds and validates a new route owned by `creator`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError::Validation`] if the key, URL, creator
    /// or team is malformed.
    pub fn new(
        short_key: impl Into<String>,
        url: impl Into<String>,
        creator: impl Into<String>,
        team: Option<&str>,
    ) -> StoreResult<Self> {
        let now = now();
        let creator = creator.into();
        let team = team
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| creator.clone());

        let route = Self {
            short_key: short_key.into(),
            url: url.into(),
            team,
            created_at: now,
            modified_at: now,
            last_modified_by: creator.clone(),
            creator,
            locked: false,
        };
        route.check()?;
        Ok(route)
    }

    /// Runs every field validator.
    pub fn check(&self) -> StoreResult<()> {
        self.validate()?;
        Ok(())
    }

    /// Returns a copy pointing at `url`, attributed to `modifier`.
    pub fn modified_by(&self, url: impl Into<String>, modifier: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_modified_by: modifier.into(),
            modified_at: now(),
            ..self.clone()
        }
    }
}

/// Current time truncated to the persisted precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIME_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Checks that `principal` is email-shaped.
pub fn is_valid_principal(principal: &str) -> bool {
    (3..=254).contains(&principal.len()) && PRINCIPAL_REGEX.is_match(principal)
}

fn validate_short_key(key: &str) -> Result<(), ValidationError> {
    if !SHORT_KEY_REGEX.is_match(key) {
        return Err(ValidationError::new("short_key").with_message(Cow::Borrowed(
            "Short key must be 1-64 characters of letters, digits, '.', '_' or '-'",
        )));
    }
    if RESERVED_KEYS.contains(&key) {
        return Err(ValidationError::new("short_key_reserved")
            .with_message(Cow::Borrowed("Short key is reserved")));
    }
    Ok(())
}

fn validate_absolute_url(raw: &str) -> Result<(), ValidationError> {
    let invalid =
        || ValidationError::new("url").with_message(Cow::Borrowed("URL must be absolute"));

    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if !host.is_empty() && !url.scheme().is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
