//! Reduction of event tables to scattering coordinates

use std::sync::Arc;

use bifrost_pipeline::Pipeline;
use log::{debug, info};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::events::{EventTable, ReducedEvents};
use crate::instrument::Instrument;
use crate::quantities::*;

/// Supply the event columns of `events` to a pipeline
pub fn insert_events(pipeline: &mut Pipeline, events: &EventTable) {
    pipeline
        .insert::<EventPixels>(events.pixels().to_vec())
        .insert::<AliasedTimes>(events.times().to_vec())
        .insert::<EventSettings>(events.settings().to_vec());
}

/// Reduce a whole event table in one pipeline
pub fn reduce(instrument: &Instrument, events: &EventTable) -> Result<ReducedEvents> {
    info!("Reducing {} events", events.len());
    let mut pipeline = instrument.pipeline()?;
    insert_events(&mut pipeline, events);
    let reduced = pipeline.get::<Reduced>()?;
    drop(pipeline);
    Ok(Arc::unwrap_or_clone(reduced))
}

/// Reduce every setting in its own pipeline, in parallel
///
/// Instrument-only quantities (pixel paths, transmitted phase space) are
/// resolved once and every segment starts from a copy of that pipeline. The
/// result has one table per setting in ascending setting order, with `event`
/// holding rows of the full table. Use [ReducedEvents::concat()] to merge.
///
/// Errors name rows of the full table as well. When several settings fail,
/// the first one in setting order is reported.
pub fn reduce_segments(instrument: &Instrument, events: &EventTable) -> Result<Vec<ReducedEvents>> {
    let segments = events.segments();
    info!("Reducing {} events in {} segments", events.len(), segments.len());

    let mut base = instrument.pipeline()?;
    base.get::<Secondary>()?;
    base.get::<TransmittedPhaseSpace>()?;

    let results: Vec<Result<ReducedEvents>> = segments
        .par_iter()
        .map(|(setting, rows)| -> Result<ReducedEvents> {
            let mut pipeline = base.clone();
            insert_events(&mut pipeline, &events.select(rows));
            let segment = pipeline
                .get::<Reduced>()
                .map_err(|e| in_table(Error::from(e), rows))?;
            debug!("Setting {setting}: {} of {} events retained", segment.len(), rows.len());

            let mut reduced = (*segment).clone();
            reduced.event = reduced.event.iter().map(|i| row_of(rows, *i)).collect();
            Ok(reduced)
        })
        .collect();

    results.into_iter().collect()
}

/// Row of the full table for row `i` of a segment
fn row_of(rows: &[usize], i: usize) -> usize {
    rows.get(i).copied().unwrap_or(i)
}

/// Rewrite per-event errors of a segment to name rows of the full table
fn in_table(error: Error, rows: &[usize]) -> Error {
    use bifrost_conservation::Error as Conservation;
    use bifrost_primary::Error as Primary;

    match error {
        Error::Primary(Primary::PhaseSpaceInconsistency { event, time }) => {
            Error::Primary(Primary::PhaseSpaceInconsistency {
                event: row_of(rows, event),
                time,
            })
        }
        Error::Conservation(Conservation::UnknownSetting { event, setting }) => {
            Error::Conservation(Conservation::UnknownSetting {
                event: row_of(rows, event),
                setting,
            })
        }
        other => other,
    }
}
