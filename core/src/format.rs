//! Won amounts as display text for advisory messages.
//!
//! Amounts of 10,000 won or more are shown in 만 (10^4) units, and
//! amounts of 100,000,000 or more in 억 (10^8) plus 만 units. Numeric
//! results are never rounded through here.

use crate::types::Won;

const MAN: Won = 10_000;
const EOK: Won = 100_000_000;

/// Smallest difference a formatted amount can hide.
pub const FORMAT_GRANULARITY: Won = MAN;

pub fn format_won(amount: Won) -> String {
    if amount < 0 {
        return format!("-{}", format_won(-amount));
    }
    if amount >= EOK {
        let eok = amount / EOK;
        let man = (amount % EOK) / MAN;
        if man > 0 {
            format!("{}억 {}만원", group_thousands(eok), group_thousands(man))
        } else {
            format!("{}억원", group_thousands(eok))
        }
    } else if amount >= MAN {
        let man = (amount as f64 / MAN as f64).round() as Won;
        format!("{}만원", group_thousands(man))
    } else {
        format!("{}원", group_thousands(amount))
    }
}

pub fn format_monthly(amount: Won) -> String {
    format!("월 {}", format_won(amount))
}

/// Parse text produced by `format_won` or `format_monthly` back into won.
pub fn parse_won(text: &str) -> Option<Won> {
    let text = text.trim();
    let text = text.strip_prefix("월").unwrap_or(text).trim();
    if let Some(rest) = text.strip_prefix('-') {
        return parse_won(rest).map(|v| -v);
    }
    let body = text.strip_suffix('원')?.trim();

    let (eok_part, rest) = match body.split_once('억') {
        Some((eok, rest)) => (Some(eok.trim()), rest.trim()),
        None => (None, body),
    };
    let mut total = match eok_part {
        Some(eok) => parse_group(eok)? * EOK,
        None => 0,
    };
    if rest.is_empty() {
        return eok_part.map(|_| total);
    }
    match rest.strip_suffix('만') {
        Some(man) => total += parse_group(man.trim())? * MAN,
        None if eok_part.is_none() => total += parse_group(rest)?,
        None => return None,
    }
    Some(total)
}

/// "1234567" -> "1,234,567"
pub fn group_thousands(amount: Won) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn parse_group(text: &str) -> Option<Won> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
