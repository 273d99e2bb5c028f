//! Raw event tables and reduced coordinate tables

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bifrost_conservation::SettingId;
use bifrost_primary::{UnwrapSummary, Unwrapped};
use bifrost_secondary::PixelId;
use bifrost_units::{Energy, Time, Wavenumber};
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column-wise table of recorded events
///
/// One row per detected neutron: the pixel it hit, its time since the most
/// recent source pulse, and the instrument setting it was recorded in. The
/// table is never modified by the reduction; every derived per-event array
/// follows its row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    pixels: Vec<PixelId>,
    times: Vec<Time>,
    settings: Vec<SettingId>,
}

impl EventTable {
    /// Table from aligned columns
    pub fn new(pixels: Vec<PixelId>, times: Vec<Time>, settings: Vec<SettingId>) -> Result<Self> {
        if pixels.len() != times.len() || pixels.len() != settings.len() {
            return Err(Error::RaggedEventTable {
                pixels: pixels.len(),
                times: times.len(),
                settings: settings.len(),
            });
        }
        Ok(Self {
            pixels,
            times,
            settings,
        })
    }

    /// Table from untyped columns, times in seconds
    pub fn from_raw(pixels: &[u32], times: &[f64], settings: &[u32]) -> Result<Self> {
        Self::new(
            pixels.iter().map(|p| PixelId(*p)).collect(),
            times.iter().map(|t| Time::new(*t)).collect(),
            settings.iter().map(|s| SettingId(*s)).collect(),
        )
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True if there are no events
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel of every event
    pub fn pixels(&self) -> &[PixelId] {
        &self.pixels
    }

    /// Aliased time of every event
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Setting of every event
    pub fn settings(&self) -> &[SettingId] {
        &self.settings
    }

    /// Rows of every setting, settings in ascending order
    pub fn segments(&self) -> Vec<(SettingId, Vec<usize>)> {
        let mut segments: BTreeMap<SettingId, Vec<usize>> = BTreeMap::new();
        for (i, setting) in self.settings.iter().enumerate() {
            segments.entry(*setting).or_default().push(i);
        }
        segments.into_iter().collect()
    }

    /// New table holding the given rows, in the given order
    ///
    /// Panics if a row is out of range.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            pixels: rows.iter().map(|i| self.pixels[*i]).collect(),
            times: rows.iter().map(|i| self.times[*i]).collect(),
            settings: rows.iter().map(|i| self.settings[*i]).collect(),
        }
    }
}

/// On-disk layout of an event table
#[derive(Serialize, Deserialize, Debug)]
struct RawEvents {
    pixel: Vec<u32>,
    /// Seconds since the most recent pulse
    time: Vec<f64>,
    setting: Vec<u32>,
}

/// Read an event table from a JSON file of three aligned columns
///
/// ```json
/// { "pixel": [0, 1], "time": [0.0123, 0.0456], "setting": [0, 0] }
/// ```
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<EventTable> {
    let path: &Path = Path::new(path.as_ref());
    let reader = BufReader::new(File::open(path)?);
    let raw: RawEvents = serde_json::from_reader(reader)?;
    let table = EventTable::from_raw(&raw.pixel, &raw.time, &raw.setting)?;
    debug!("Read {} events from {}", table.len(), path.display());
    Ok(table)
}

/// Output of frame unwrapping for a whole event table
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUnwrapping {
    /// Unwrapped event, `None` if excluded as inconsistent
    pub events: Vec<Option<Unwrapped>>,
    /// Counts over the table
    pub summary: UnwrapSummary,
}

impl FrameUnwrapping {
    /// Table positions of the events that were unwrapped
    pub fn retained(&self) -> Vec<usize> {
        self.events
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.is_some().then_some(i))
            .collect()
    }

    /// Unwrapped events only, in table order
    pub fn unwrapped(&self) -> impl Iterator<Item = &Unwrapped> {
        self.events.iter().flatten()
    }
}

/// Per-event scattering coordinates
///
/// Only retained events appear. `event` gives the row of the event table each
/// entry came from, so excluded events can be matched back up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReducedEvents {
    /// Row in the event table
    pub event: Vec<usize>,
    /// Energy transfer ΔE = Ei - Ef
    pub energy_transfer: Vec<Energy>,
    /// Momentum transfer in the sample frame (Å⁻¹)
    pub q: Vec<Vector3<f64>>,
    /// |Q|
    pub q_magnitude: Vec<Wavenumber>,
    /// Unwrapping counts
    pub summary: UnwrapSummary,
}

impl ReducedEvents {
    /// Number of retained events
    pub fn len(&self) -> usize {
        self.event.len()
    }

    /// True if no event was retained
    pub fn is_empty(&self) -> bool {
        self.event.is_empty()
    }

    /// Combine reduced segments into one table ordered by event row
    pub fn concat<I: IntoIterator<Item = ReducedEvents>>(parts: I) -> Self {
        let mut summary = UnwrapSummary::default();
        let mut rows = Vec::new();

        for part in parts {
            summary.merge(&part.summary);
            for i in 0..part.len() {
                rows.push((
                    part.event[i],
                    part.energy_transfer[i],
                    part.q[i],
                    part.q_magnitude[i],
                ));
            }
        }
        rows.sort_by_key(|row| row.0);

        let mut reduced = Self {
            summary,
            ..Default::default()
        };
        for (event, de, q, q_abs) in rows {
            reduced.event.push(event);
            reduced.energy_transfer.push(de);
            reduced.q.push(q);
            reduced.q_magnitude.push(q_abs);
        }
        reduced
    }
}
