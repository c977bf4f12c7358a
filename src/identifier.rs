//! Row identifiers: a local `YYYYMMDDHHMMSS` timestamp followed by a six-digit
//! random suffix. Identifiers are not checked against existing rows.

use chrono::{DateTime, Local, TimeZone};
use rand::Rng;

/// Smallest random suffix (keeps the suffix at six digits)
pub const SUFFIX_MIN: u32 = 100_000;

/// Largest random suffix
pub const SUFFIX_MAX: u32 = 999_999;

/// Length of the timestamp prefix
pub const TIMESTAMP_LEN: usize = 14;

/// Total identifier length
pub const IDENTIFIER_LEN: usize = 20;

/// Generate an identifier from the local clock and the thread RNG.
pub fn generate() -> String {
    generate_at(&Local::now(), &mut rand::thread_rng())
}

pub fn generate_at<Tz, R>(now: &DateTime<Tz>, rng: &mut R) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    R: Rng + ?Sized,
{
    let suffix = rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX);
    format!("{}{}", now.format("%Y%m%d%H%M%S"), suffix)
}
