//! Validated interval tables.
//!
//! A `RangeTable` partitions a closed integer domain into contiguous,
//! non-overlapping buckets. Contiguity is checked in the constructor and on
//! deserialization, so every value that exists answers every lookup in its
//! domain.

use crate::error::TableError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field position seen from the defense, 0-100
pub const POSITION_DOMAIN: BucketRange = BucketRange { low: 0, high: 100 };
/// Call difference, 0-1500
pub const DIFFERENCE_DOMAIN: BucketRange = BucketRange { low: 0, high: 1500 };

/// Inclusive range `low..=high`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketRange {
    pub low: u32,
    pub high: u32,
}

impl BucketRange {
    pub fn new(low: u32, high: u32) -> Result<Self, TableError> {
        if low > high {
            return Err(TableError::InvertedRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn contains(&self, value: u32) -> bool {
        self.low <= value && value <= self.high
    }
}

impl FromStr for BucketRange {
    type Err = TableError;

    /// Parse `"low-high"`. Any non-digit separator is accepted, but exactly
    /// two numbers must be present.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut numbers = Vec::with_capacity(2);
        let mut current: Option<u32> = None;
        for c in s.chars() {
            match c.to_digit(10) {
                Some(d) => {
                    let value = current
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(d))
                        .ok_or_else(|| TableError::MalformedRange(s.to_string()))?;
                    current = Some(value);
                }
                None => {
                    if let Some(value) = current.take() {
                        numbers.push(value);
                    }
                }
            }
        }
        if let Some(value) = current {
            numbers.push(value);
        }

        match numbers.as_slice() {
            [low, high] => BucketRange::new(*low, *high),
            _ => Err(TableError::MalformedRange(s.to_string())),
        }
    }
}

impl fmt::Display for BucketRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket<T> {
    pub range: BucketRange,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeTableData<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct RangeTable<T> {
    domain: BucketRange,
    buckets: Vec<Bucket<T>>,
}

#[derive(Deserialize)]
struct RangeTableData<T> {
    domain: BucketRange,
    buckets: Vec<Bucket<T>>,
}

impl<T> TryFrom<RangeTableData<T>> for RangeTable<T> {
    type Error = TableError;

    fn try_from(data: RangeTableData<T>) -> Result<Self, Self::Error> {
        RangeTable::new(data.domain, data.buckets.into_iter().map(|b| (b.range, b.value)))
    }
}

impl<T> RangeTable<T> {
    /// Build a table, rejecting gaps, overlaps and incomplete coverage of `domain`
    pub fn new<I>(domain: BucketRange, entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (BucketRange, T)>,
    {
        let mut buckets: Vec<Bucket<T>> =
            entries.into_iter().map(|(range, value)| Bucket { range, value }).collect();
        buckets.sort_by_key(|b| b.range.low);

        let (first, last) = match (buckets.first(), buckets.last()) {
            (Some(first), Some(last)) => (first.range, last.range),
            _ => return Err(TableError::Empty),
        };

        if first.low != domain.low {
            return Err(TableError::StartGap { expected: domain.low, found: first.low });
        }
        for pair in buckets.windows(2) {
            let previous_high = pair[0].range.high;
            let next_low = pair[1].range.low;
            if next_low <= previous_high {
                return Err(TableError::Overlap { previous_high, next_low });
            }
            if next_low != previous_high + 1 {
                return Err(TableError::Gap { previous_high, next_low });
            }
        }
        if last.high != domain.high {
            return Err(TableError::EndGap { expected: domain.high, found: last.high });
        }

        Ok(Self { domain, buckets })
    }

    /// Binary search for the bucket containing `value`
    pub fn lookup(&self, value: u32) -> Option<&T> {
        let index = self.buckets.partition_point(|b| b.range.high < value);
        self.buckets.get(index).filter(|b| b.range.contains(value)).map(|b| &b.value)
    }

    pub fn domain(&self) -> BucketRange {
        self.domain
    }

    pub fn buckets(&self) -> &[Bucket<T>] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
