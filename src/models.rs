// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, DurationRound, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Timestamps persist as fixed-width RFC 3339 with millisecond
/// precision so the string form orders chronologically in both
/// backends (the document database compares them as plain strings).
pub fn fmt_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time at the persisted precision. Every timestamp a service
/// stamps on a record goes through here, so the value handed back from
/// a create or update is byte-identical to what a later read yields.
pub fn now() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.duration_trunc(Duration::milliseconds(1)).unwrap_or(dt)
}

pub(crate) mod iso {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&fmt_iso(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) mod iso_opt {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_some(&fmt_iso(dt)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_true() -> bool {
    true
}

fn default_payment_method() -> String {
    "Cash".to_string()
}

fn default_color() -> String {
    "#cccccc".to_string()
}

fn default_icon() -> String {
    "fa-tag".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(rename = "notificationsEnabled", default = "default_true")]
    pub notifications_enabled: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            currency: default_currency(),
            theme: default_theme(),
            notifications_enabled: true,
        }
    }
}

/// Partial settings update. Only the supplied keys overwrite the
/// stored settings; everything else is preserved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub currency: Option<String>,
    pub theme: Option<String>,
    #[serde(rename = "notificationsEnabled")]
    pub notifications_enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn validate(&self) -> ServiceResult<()> {
        if let Some(currency) = &self.currency {
            if currency.chars().count() > 4 {
                return Err(ServiceError::validation("currency must be a short string"));
            }
        }
        if let Some(theme) = &self.theme {
            if theme != "light" && theme != "dark" {
                return Err(ServiceError::validation("theme must be 'light' or 'dark'"));
            }
        }
        Ok(())
    }

    pub fn apply(&self, settings: &mut UserSettings) {
        if let Some(currency) = &self.currency {
            settings.currency = currency.clone();
        }
        if let Some(theme) = &self.theme {
            settings.theme = theme.clone();
        }
        if let Some(enabled) = self.notifications_enabled {
            settings.notifications_enabled = enabled;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    /// Argon2 hash, never the plaintext. Excluded from `SafeUser`.
    pub password: String,
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(rename = "createdAt", with = "iso")]
    pub created_at: DateTime<Utc>,
    #[serde(
        rename = "updatedAt",
        default,
        with = "iso_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outward projection of a user without the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct SafeUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub settings: UserSettings,
    #[serde(rename = "createdAt", with = "iso")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn safe(&self) -> SafeUser {
        SafeUser {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            settings: self.settings.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.username.trim().is_empty() {
            return Err(ServiceError::validation("username is required"));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(ServiceError::validation("a valid email is required"));
        }
        if self.password.chars().count() < 6 {
            return Err(ServiceError::validation(
                "password must be at least 6 characters",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub settings: Option<SettingsPatch>,
}

impl UserPatch {
    pub fn validate(&self) -> ServiceResult<()> {
        if let Some(username) = &self.username {
            if username.trim().is_empty() {
                return Err(ServiceError::validation("username must be non-empty"));
            }
        }
        if let Some(email) = &self.email {
            if email.trim().is_empty() || !email.contains('@') {
                return Err(ServiceError::validation("email must be a valid address"));
            }
        }
        if let Some(settings) = &self.settings {
            settings.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    #[serde(with = "iso")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "paymentMethod", default = "default_payment_method")]
    pub payment_method: String,
    #[serde(
        rename = "updatedAt",
        default,
        with = "iso_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    /// Raw date input; anything unparseable falls back to "now".
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.title.trim().is_empty() {
            return Err(ServiceError::validation("title is required"));
        }
        if !(self.amount > 0.0) {
            return Err(ServiceError::validation("amount must be a positive number"));
        }
        if self.category.trim().is_empty() {
            return Err(ServiceError::validation("category is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxPatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TxKind>,
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
}

impl TxPatch {
    pub fn validate(&self) -> ServiceResult<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ServiceError::validation("title must be non-empty"));
            }
        }
        if let Some(amount) = self.amount {
            if !(amount > 0.0) {
                return Err(ServiceError::validation("amount must be a positive number"));
            }
        }
        Ok(())
    }
}

/// Parse a caller-supplied date, falling back to `now` for anything
/// missing or unparseable. Accepts RFC 3339 or a bare `YYYY-MM-DD`.
pub fn normalize_date(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = value else { return now };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return truncate_to_millis(dt.with_timezone(&Utc));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return dt.and_utc();
        }
    }
    now
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    /// `None` marks a global default category, read-only for everyone.
    pub user: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(rename = "createdAt", with = "iso")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("name is required"));
        }
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(ServiceError::validation(
                    "color must be a hex code like #3498db",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> ServiceResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ServiceError::validation("name must be a non-empty string"));
            }
        }
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(ServiceError::validation(
                    "color must be a hex code like #3498db",
                ));
            }
        }
        Ok(())
    }
}

pub struct CatalogEntry {
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Seed catalog for the global (ownerless) categories, installed the
/// first time an empty category collection is read.
pub const DEFAULT_EXPENSE_CATEGORIES: &[CatalogEntry] = &[
    CatalogEntry { name: "Food", color: "#e74c3c", icon: "fa-utensils" },
    CatalogEntry { name: "Transport", color: "#3498db", icon: "fa-bus" },
    CatalogEntry { name: "Rent", color: "#9b59b6", icon: "fa-home" },
    CatalogEntry { name: "Education", color: "#f1c40f", icon: "fa-book" },
    CatalogEntry { name: "Entertainment", color: "#e67e22", icon: "fa-film" },
    CatalogEntry { name: "Utilities", color: "#1abc9c", icon: "fa-bolt" },
    CatalogEntry { name: "Health", color: "#2ecc71", icon: "fa-heartbeat" },
    CatalogEntry { name: "Other", color: "#95a5a6", icon: "fa-tag" },
];

pub const DEFAULT_INCOME_CATEGORIES: &[CatalogEntry] = &[
    CatalogEntry { name: "Allowance", color: "#2ecc71", icon: "fa-hand-holding-usd" },
    CatalogEntry { name: "Scholarship", color: "#3498db", icon: "fa-graduation-cap" },
    CatalogEntry { name: "Part-time Job", color: "#9b59b6", icon: "fa-briefcase" },
    CatalogEntry { name: "Freelance", color: "#e67e22", icon: "fa-laptop" },
    CatalogEntry { name: "Other", color: "#95a5a6", icon: "fa-tag" },
];

/// Materialize the seed catalog with fresh ids and timestamps.
pub fn default_catalog(now: DateTime<Utc>) -> Vec<Category> {
    let mut seeded = Vec::new();
    for (kind, entries) in [
        (TxKind::Expense, DEFAULT_EXPENSE_CATEGORIES),
        (TxKind::Income, DEFAULT_INCOME_CATEGORIES),
    ] {
        for entry in entries {
            seeded.push(Category {
                id: new_id(),
                user: None,
                name: entry.name.to_string(),
                kind,
                color: entry.color.to_string(),
                icon: entry.icon.to_string(),
                created_at: now,
            });
        }
    }
    seeded
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub category: String,
    pub limit: f64,
    pub month: i32,
    pub year: i32,
    #[serde(rename = "createdAt", with = "iso")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", with = "iso")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetInput {
    pub category: String,
    pub limit: f64,
    pub month: i32,
    pub year: i32,
}

impl BudgetInput {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.category.trim().is_empty() {
            return Err(ServiceError::validation("category is required"));
        }
        if !(self.limit > 0.0) {
            return Err(ServiceError::validation("limit must be a positive number"));
        }
        if !(1..=12).contains(&self.month) {
            return Err(ServiceError::validation("month must be between 1 and 12"));
        }
        if self.year < 2000 {
            return Err(ServiceError::validation("year must be 2000 or later"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "createdAt", with = "iso")]
    pub created_at: DateTime<Utc>,
}
