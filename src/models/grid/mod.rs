//! Value types produced by a render pass.
//!
//! Cells, span widths and slot placements are created fresh for every
//! render pass and never mutated afterwards.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use super::event::Event;

/// Structural row a grid cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "hour", rename_all = "snake_case")]
pub enum CellType {
    AllDay,
    MultiDay,
    /// Hour of day, 0-23
    Hour(u32),
}

/// One cell of a day/week grid. Boundaries are wall-clock times in the
/// render pass timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub cell_type: CellType,
    pub day_index: u32,
}

/// Width of a multi-day bar in day columns, and whether it was cut at the
/// end of the visible week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpanWidth {
    /// 1..=7
    pub width: u8,
    pub overflows_week: bool,
}

/// Placement of one event in an hourly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutResult<'a> {
    pub event: &'a Event,
    pub hour: u32,
    /// 5-minute stacking key; the event's displayed time is unchanged
    pub minute_bucket: u32,
    /// Already-placed events on the same day that intersect this one
    pub overlap_count: usize,
}

/// Hour -> minute bucket -> placements, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSlotMap<'a> {
    slots: BTreeMap<u32, BTreeMap<u32, Vec<LayoutResult<'a>>>>,
}

impl<'a> RenderedSlotMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: LayoutResult<'a>) {
        self.slots
            .entry(result.hour)
            .or_default()
            .entry(result.minute_bucket)
            .or_default()
            .push(result);
    }

    /// Placements in one slot, empty when nothing starts there.
    pub fn get(&self, hour: u32, minute_bucket: u32) -> &[LayoutResult<'a>] {
        self.slots
            .get(&hour)
            .and_then(|minutes| minutes.get(&minute_bucket))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Minute buckets used in `hour`.
    pub fn hour(&self, hour: u32) -> Option<&BTreeMap<u32, Vec<LayoutResult<'a>>>> {
        self.slots.get(&hour)
    }

    /// All placements ordered by hour, then bucket, then insertion.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutResult<'a>> {
        self.slots
            .values()
            .flat_map(|minutes| minutes.values())
            .flat_map(|results| results.iter())
    }

    /// Placement of the event with `event_id`, if it was laid out.
    pub fn find(&self, event_id: i64) -> Option<&LayoutResult<'a>> {
        self.iter().find(|result| result.event.id == event_id)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
