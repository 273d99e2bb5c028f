//! Batch frame unwrapping with an explicit policy for inconsistent events

use std::collections::BTreeMap;

use bifrost_units::Time;
use log::{debug, warn};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::phase_space::{PhaseSpace, Unwrapped};

/// What to do with events that fit no transmitted region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InconsistentEventPolicy {
    /// Mark the event as `None` and count it
    Exclude,
    /// Abort with [Error::PhaseSpaceInconsistency]
    Fail,
}

/// Counts collected while unwrapping a batch of events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwrapSummary {
    /// Events processed
    pub total: usize,
    /// Events excluded as inconsistent
    pub excluded: usize,
    /// Number of unwrapped events for each pulse offset
    pub offsets: BTreeMap<u32, usize>,
}

impl UnwrapSummary {
    /// Events that were unwrapped
    pub fn unwrapped(&self) -> usize {
        self.total - self.excluded
    }

    /// Fraction of events excluded, zero for an empty batch
    pub fn excluded_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.excluded as f64 / self.total as f64
        }
    }

    /// Combine the counts of two batches
    pub fn merge(&mut self, other: &UnwrapSummary) {
        self.total += other.total;
        self.excluded += other.excluded;
        for (offset, n) in &other.offsets {
            *self.offsets.entry(*offset).or_default() += n;
        }
    }
}

impl std::fmt::Display for UnwrapSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "events:   {}", self.total)?;
        writeln!(f, "excluded: {}", self.excluded)?;
        for (offset, n) in &self.offsets {
            writeln!(f, "  offset {offset:>2}: {n}")?;
        }
        Ok(())
    }
}

/// Unwrap every event
///
/// `aliased` and `secondary` are aligned per event. The output keeps the
/// event order. Under [InconsistentEventPolicy::Fail] the first inconsistent
/// event in input order is reported.
pub fn unwrap_frames(
    phase_space: &PhaseSpace,
    aliased: &[Time],
    secondary: &[Time],
    policy: InconsistentEventPolicy,
) -> Result<(Vec<Option<Unwrapped>>, UnwrapSummary)> {
    if aliased.len() != secondary.len() {
        return Err(Error::LengthMismatch {
            what: "secondary flight times",
            expected: aliased.len(),
            found: secondary.len(),
        });
    }

    let events: Vec<Option<Unwrapped>> = aliased
        .par_iter()
        .zip(secondary.par_iter())
        .map(|(tau, t_sec)| phase_space.unwrap_event(*tau, *t_sec))
        .collect();

    let mut summary = UnwrapSummary {
        total: events.len(),
        ..Default::default()
    };

    for (i, event) in events.iter().enumerate() {
        match event {
            Some(e) => *summary.offsets.entry(e.offset).or_default() += 1,
            None if policy == InconsistentEventPolicy::Fail => {
                return Err(Error::PhaseSpaceInconsistency {
                    event: i,
                    time: aliased[i],
                });
            }
            None => summary.excluded += 1,
        }
    }

    if summary.excluded > 0 {
        warn!(
            "{} of {} events are outside the transmitted phase space ({:.2}%)",
            summary.excluded,
            summary.total,
            100.0 * summary.excluded_fraction()
        );
    }
    debug!("Unwrapped {} events", summary.unwrapped());

    Ok((events, summary))
}
