// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow period strings.
//!
//! A period is a whole number with an optional unit suffix: `90s`,
//! `15m`, `4h`, `2d`. A bare number counts seconds. The definition
//! schema keeps periods whole; fractions and sub-second values are
//! rejected.

use std::time::Duration;

/// Parse a `period` setting value into a Duration.
pub fn parse_period(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (digits, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(format!("period must start with a number: '{value}'")),
        Some(split) => value.split_at(split),
        None if value.is_empty() => return Err("empty period".to_string()),
        None => (value, "s"),
    };

    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("period out of range: '{value}'"))?;

    let seconds = match unit.trim() {
        "s" => amount,
        "m" => amount * 60,
        "h" => amount * 3_600,
        "d" => amount * 86_400,
        other => return Err(format!("unknown period unit '{other}' (use s, m, h or d)")),
    };
    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
#[path = "period_tests.rs"]
mod tests;
