//! Decoder for the `Range` header grammar.
//!
//! ```text
//! header         := bounds-clause [ws options-clause]
//! bounds-clause  := sort-token ws? bounds? ";"
//! bounds         := ["~"] start-token ".." [end-token]
//! options-clause := option ("," option)* ";"
//! option         := "max=" integer | "order=" ("asc" | "desc")
//! ```

use crate::escape::unescape;
use crate::{KeyRange, RangeError};

/// Raw, still-escaped pieces of the bounds clause.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Bounds<'a> {
    sort: &'a str,
    start: &'a str,
    end: &'a str,
}

/// Raw values of the options clause, validated by [`parse_range`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Options<'a> {
    max: Option<&'a str>,
    order: Option<&'a str>,
}

pub(crate) fn parse_range(s: &str) -> Result<KeyRange, RangeError> {
    let Some((bounds, rest)) = s.split_once(';') else {
        tracing::debug!(header = s, "range bounds clause is not terminated");
        return Err(RangeError::InvalidFormat);
    };

    let bounds = parse_bounds(bounds)?;
    let mut range = KeyRange {
        sort: unescape(bounds.sort)?,
        ..KeyRange::default()
    };
    if let Some(start) = bounds.start.strip_prefix('~') {
        range.start = unescape(start)?;
        range.start_exclusive = true;
    } else {
        range.start = unescape(bounds.start)?;
    }
    range.end = unescape(bounds.end)?;

    // an unterminated options clause is dropped rather than rejected
    let Some((opts, _)) = rest.split_once(';') else {
        return Ok(range);
    };

    let opts = parse_options(opts)?;
    if let Some(max) = opts.max {
        range.limit = max.parse().map_err(|_| {
            tracing::debug!(max, "range limit is not a non-negative integer");
            RangeError::InvalidFormat
        })?;
    }
    if let Some(order) = opts.order {
        range.descending = match order {
            "desc" => true,
            "asc" => false,
            _ => {
                tracing::debug!(order, "unknown range order");
                return Err(RangeError::InvalidFormat);
            }
        };
    }

    Ok(range)
}

fn parse_bounds(s: &str) -> Result<Bounds<'_>, RangeError> {
    let mut words = s.split_whitespace();
    let Some(sort) = words.next() else {
        tracing::debug!("range has no sort token");
        return Err(RangeError::InvalidFormat);
    };

    let mut bounds = Bounds { sort, ..Bounds::default() };
    let Some(spec) = words.next() else {
        return Ok(bounds);
    };

    let parts: Vec<&str> = spec.split("..").collect();
    match parts[..] {
        [start] => bounds.start = start,
        [start, end] => {
            bounds.start = start;
            bounds.end = end;
        }
        _ => {
            tracing::debug!(bounds = spec, "range has more than one `..` separator");
            return Err(RangeError::InvalidFormat);
        }
    }

    Ok(bounds)
}

fn parse_options(s: &str) -> Result<Options<'_>, RangeError> {
    let mut opts = Options::default();
    let s = s.trim();
    if s.is_empty() {
        return Ok(opts);
    }

    for opt in s.split(',') {
        let kv: Vec<&str> = opt.trim().split('=').collect();
        let [key, value] = kv[..] else {
            tracing::debug!(option = opt, "range option is not a single key=value pair");
            return Err(RangeError::InvalidFormat);
        };
        match key {
            "max" => opts.max = Some(value),
            "order" => opts.order = Some(value),
            _ => {
                tracing::debug!(key, "unknown range option");
                return Err(RangeError::InvalidFormat);
            }
        }
    }

    Ok(opts)
}
