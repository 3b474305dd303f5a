//! Best-effort extraction of landmark guesses from model output.
//!
//! The model is asked for `id:confidence` lines but is free to drift: JSON,
//! YAML-ish `id: x / confidence: y` records, prose with percentages. Anything
//! that does not resolve to a catalog id is dropped silently. Only empty or
//! binary-looking output is reported as an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::catalog::Catalog;
use crate::error::ProviderError;
use crate::types::Detection;

static ID_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:landmark_id|landmark|id)\b["']?\s*[:=]\s*["'`]?(?P<id>[\p{L}\p{N}_\-]+)"#)
        .expect("id field pattern")
});

static CONF_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:confidence|conf|score|probability)\b["']?\s*[:=]\s*["']?(?P<conf>[+-]?[\d.,]*\d[\d.,]*\s*%?|\p{L}+)"#,
    )
    .expect("confidence field pattern")
});

static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<id>[\p{L}\p{N}_\-]+)["'`*]*\s*(?:[:=(,]|->|[-–—])?\s*(?i:(?:confidence|score|probability)\s*[:=]?\s*)?["'`*(]*(?P<conf>[+-]?[\d.,]*\d[\d.,]*\s*%?)"#,
    )
    .expect("pair pattern")
});

// A bare confidence following an id field that has no confidence key.
static BARE_CONF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<conf>[+-]?\d+(?:[.,]\d+)?\s*%?)"#).expect("bare confidence pattern")
});

/// Parse raw provider text into detections, most confident first.
///
/// Ties keep catalog declaration order. The same text always yields the same
/// detections.
#[instrument(level = "debug", skip_all, fields(len = raw.len()))]
pub fn parse_detections(raw: &str, catalog: &Catalog) -> Result<Vec<Detection>, ProviderError> {
    if raw.trim().is_empty() {
        return Err(ProviderError::MalformedOutput("empty completion".into()));
    }
    if looks_binary(raw) {
        return Err(ProviderError::MalformedOutput(
            "completion is not readable text".into(),
        ));
    }

    let mut pairs = fielded_pairs(raw, catalog);
    if pairs.is_empty() {
        trace!("no fielded records, falling back to delimited pairs");
        pairs = delimited_pairs(raw, catalog);
    }

    let mut best: HashMap<usize, f64> = HashMap::new();
    for (pos, confidence) in pairs {
        let slot = best.entry(pos).or_insert(confidence);
        if confidence > *slot {
            *slot = confidence;
        }
    }

    let mut ranked: Vec<(usize, f64)> = best.into_iter().collect();
    ranked.sort_by(|(pa, ca), (pb, cb)| cb.total_cmp(ca).then(pa.cmp(pb)));

    let detections: Vec<Detection> = ranked
        .into_iter()
        .map(|(pos, confidence)| Detection {
            landmark_id: catalog.entries()[pos].id.clone(),
            confidence,
        })
        .collect();
    debug!(count = detections.len(), "parsed detections");
    Ok(detections)
}

/// Records with explicit `id` and `confidence` fields, in any key order.
fn fielded_pairs(raw: &str, catalog: &Catalog) -> Vec<(usize, f64)> {
    let ids: Vec<_> = ID_FIELD_RE.captures_iter(raw).collect();
    if ids.is_empty() {
        return Vec::new();
    }
    let confs: Vec<_> = CONF_FIELD_RE
        .captures_iter(raw)
        .filter_map(|c| {
            let whole = c.get(0)?;
            Some((whole.start(), c.name("conf")?.as_str()))
        })
        .collect();
    let mut used = vec![false; confs.len()];
    let mut pairs = Vec::new();

    for (i, cap) in ids.iter().enumerate() {
        let (Some(whole), Some(id)) = (cap.get(0), cap.name("id")) else {
            continue;
        };
        let next_start = ids
            .get(i + 1)
            .and_then(|c| c.get(0))
            .map_or(raw.len(), |m| m.start());
        let prev_end = i
            .checked_sub(1)
            .and_then(|p| ids[p].get(0))
            .map_or(0, |m| m.end());

        // Prefer the confidence that follows the id, then one just before it.
        let slot = match (0..confs.len())
            .find(|&k| !used[k] && confs[k].0 >= whole.end() && confs[k].0 < next_start)
        {
            Some(k) => Some(k),
            None => (0..confs.len())
                .rev()
                .find(|&k| !used[k] && confs[k].0 >= prev_end && confs[k].0 < whole.start()),
        };
        let conf_token = match slot {
            Some(k) => {
                used[k] = true;
                Some(confs[k].1)
            }
            None => BARE_CONF_RE
                .captures(&raw[whole.end()..next_start])
                .and_then(|c| c.name("conf"))
                .map(|m| m.as_str()),
        };
        let Some(conf_token) = conf_token else {
            trace!(token = id.as_str(), "id field without a confidence");
            continue;
        };

        match catalog.resolve(id.as_str()).and_then(|e| catalog.position(&e.id)) {
            Some(pos) => pairs.push((pos, parse_confidence(conf_token))),
            None => trace!(token = id.as_str(), "dropping unknown id"),
        }
    }
    pairs
}

/// Loose `token:number` style pairs.
fn delimited_pairs(raw: &str, catalog: &Catalog) -> Vec<(usize, f64)> {
    PAIR_RE
        .captures_iter(raw)
        .filter_map(|cap| {
            let token = cap.name("id")?.as_str();
            let entry = catalog.resolve(token).or_else(|| {
                trace!(token, "dropping unknown id");
                None
            })?;
            let pos = catalog.position(&entry.id)?;
            Some((pos, parse_confidence(cap.name("conf")?.as_str())))
        })
        .collect()
}

/// Turn a confidence token into a value in `[0.0, 1.0]`.
///
/// `92%` means 0.92 and `0,5` means 0.5. Anything unparseable, non-finite or
/// outside the unit range becomes 0.0.
pub fn parse_confidence(token: &str) -> f64 {
    let token = token.trim();
    let (number, percent) = match token.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (token, false),
    };
    let Ok(mut value) = number.replace(',', ".").parse::<f64>() else {
        return 0.0;
    };
    if percent {
        value /= 100.0;
    }
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        value
    } else {
        0.0
    }
}

fn looks_binary(raw: &str) -> bool {
    let total = raw.chars().count();
    let noise = raw
        .chars()
        .filter(|&c| (c.is_control() && !c.is_whitespace()) || c == char::REPLACEMENT_CHARACTER)
        .count();
    noise * 4 > total
}
