//! Pure analytics over the entity collections: acceptance rate, response
//! latency, monthly activity series, month-over-month movement, and profile
//! completeness. Everything here is derived; nothing writes back.

pub mod priority;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::{
    ClientProfile, Contract, ContractStatus, Offer, OfferStatus, ProviderProfile, Request,
};

/// How many trailing calendar months a series covers, current month included.
pub const SERIES_MONTHS: usize = 6;

/// Share of decided offers the client accepted, as a rounded percent.
/// Zero decided offers yields 0, never a division by zero.
pub fn acceptance_rate(offers: &[Offer]) -> u8 {
    let accepted = offers
        .iter()
        .filter(|o| o.status == OfferStatus::Accepted)
        .count();
    let declined = offers
        .iter()
        .filter(|o| o.status == OfferStatus::Declined)
        .count();
    let decided = (accepted + declined).max(1);
    ((accepted as f64 / decided as f64) * 100.0).round() as u8
}

/// Mean minutes between an offer being sent and its last status change.
///
/// Only positive, finite deltas count: an offer that was never touched after
/// creation (or carries garbage timestamps) is not a response sample. An
/// empty sample is `None` ("unavailable"), not zero.
pub fn avg_response_minutes(offers: &[Offer]) -> Option<f64> {
    let samples: Vec<f64> = offers
        .iter()
        .map(|o| (o.updated_at - o.created_at).num_seconds() as f64 / 60.0)
        .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
        .collect();
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// One month's worth of activity in a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthPoint {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub total_amount: f64,
}

fn month_key(date: DateTime<Utc>) -> (i32, u32) {
    (date.year(), date.month())
}

/// The trailing `SERIES_MONTHS` (year, month) pairs ending at `now`,
/// oldest first.
fn trailing_months(now: DateTime<Utc>) -> Vec<(i32, u32)> {
    let mut months = Vec::with_capacity(SERIES_MONTHS);
    let (mut year, mut month) = month_key(now);
    for _ in 0..SERIES_MONTHS {
        months.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

/// Buckets timestamped amounts into the trailing months, oldest first.
/// Items outside the window are dropped; months without items stay at zero.
pub fn monthly_series<I>(items: I, now: DateTime<Utc>) -> Vec<MonthPoint>
where
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    let mut points: Vec<MonthPoint> = trailing_months(now)
        .into_iter()
        .map(|(year, month)| MonthPoint {
            year,
            month,
            count: 0,
            total_amount: 0.0,
        })
        .collect();
    for (when, amount) in items {
        let key = month_key(when);
        if let Some(point) = points.iter_mut().find(|p| (p.year, p.month) == key) {
            point.count += 1;
            point.total_amount += amount;
        }
    }
    points
}

/// Completed contracts bucketed by completion month, with summed price.
pub fn contract_completion_series(contracts: &[Contract], now: DateTime<Utc>) -> Vec<MonthPoint> {
    monthly_series(
        contracts.iter().filter_map(|c| {
            let completed_at = c.completed_at?;
            (c.status == ContractStatus::Completed).then_some((completed_at, c.price_amount))
        }),
        now,
    )
}

/// Requests bucketed by creation month, with the suggested price summed
/// where the client named one.
pub fn request_creation_series(requests: &[Request], now: DateTime<Utc>) -> Vec<MonthPoint> {
    monthly_series(
        requests
            .iter()
            .map(|r| (r.created_at, r.price.unwrap_or(0.0))),
        now,
    )
}

/// Month-over-month movement of a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomDelta {
    /// Activity appeared this month with no base month to compare against.
    New,
    /// Signed, rounded percentage change.
    Percent(i32),
}

impl std::fmt::Display for MomDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MomDelta::New => f.write_str("new"),
            MomDelta::Percent(pct) if *pct > 0 => write!(f, "+{pct}%"),
            MomDelta::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Compares this month's count against last month's.
///
/// A zero base month is `New` when anything happened and a plain 0% when
/// nothing did. The `as i32` cast collapses a rounded `-0.0` into 0, so a
/// tiny negative change never renders as "-0%".
pub fn mom_delta(current: usize, previous: usize) -> MomDelta {
    if previous == 0 {
        return if current == 0 {
            MomDelta::Percent(0)
        } else {
            MomDelta::New
        };
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    MomDelta::Percent(change.round() as i32)
}

/// Month-over-month movement of the last two points of a series.
pub fn series_mom_delta(series: &[MonthPoint]) -> MomDelta {
    let mut tail = series.iter().rev();
    let current = tail.next().map(|p| p.count).unwrap_or(0);
    let previous = tail.next().map(|p| p.count).unwrap_or(0);
    mom_delta(current, previous)
}

fn has_text(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Weighted completeness of a provider profile, 0..=100.
pub fn provider_completeness(profile: &ProviderProfile) -> u8 {
    let mut score = 0u32;
    if has_text(&profile.display_name) {
        score += 15;
    }
    if has_text(&profile.bio) {
        score += 15;
    }
    if profile.city_id.is_some() {
        score += 15;
    }
    if !profile.service_keys.is_empty() {
        score += 25;
    }
    if profile.base_price.is_some_and(|p| p > 0.0) {
        score += 10;
    }
    if has_text(&profile.company_name) || has_text(&profile.vat_id) {
        score += 10;
    }
    if profile.is_active && !profile.is_blocked {
        score += 10;
    }
    score.min(100) as u8
}

/// Weighted completeness of a client profile, 0..=100.
pub fn client_completeness(profile: &ClientProfile) -> u8 {
    let mut score = 0u32;
    if has_text(&profile.name) {
        score += 20;
    }
    if has_text(&profile.email) {
        score += 20;
    }
    if profile.city_id.is_some() {
        score += 20;
    }
    if has_text(&profile.phone) {
        score += 15;
    }
    if has_text(&profile.avatar_url) {
        score += 15;
    }
    if profile.privacy_accepted {
        score += 5;
    }
    if profile.client_profile_linked {
        score += 5;
    }
    score.min(100) as u8
}
