// Calendar Layout
// Runs one render pass over a JSON file of events and prints the layout

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;

use calendar_layout::models::event::{Event, EventRecord};
use calendar_layout::models::grid::{RenderedSlotMap, SpanWidth};
use calendar_layout::models::settings::LayoutSettings;
use calendar_layout::models::timezone::Timezone;
use calendar_layout::models::view_type::ViewType;
use calendar_layout::services::classifier::DayBuckets;
use calendar_layout::services::grid::PlacedCell;
use calendar_layout::services::projection::TimezoneProjector;
use calendar_layout::services::render::{RenderPass, SpanBar};

#[derive(Parser)]
#[command(name = "calendar-layout")]
#[command(about = "Lay out calendar events for a day, week or month view")]
struct Cli {
    /// JSON file holding an array of event records
    events: PathBuf,

    /// View to render (day, week, month); defaults to the configured view
    #[arg(short, long)]
    view: Option<ViewType>,

    /// Date inside the view, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Visitor timezone (IANA name or offset), overrides the settings file
    #[arg(short, long)]
    tz: Option<String>,

    /// Settings file (defaults to the per-user config location)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match cli.config.or_else(LayoutSettings::default_path) {
        Some(path) => LayoutSettings::load_or_default(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => LayoutSettings::default(),
    };
    if let Some(tz) = cli.tz {
        settings.visitor_timezone = Some(tz);
    }

    let content = std::fs::read_to_string(&cli.events)
        .with_context(|| format!("Failed to read {}", cli.events.display()))?;
    let records: Vec<EventRecord> =
        serde_json::from_str(&content).context("Event file must be a JSON array of events")?;
    let events = records
        .into_iter()
        .map(Event::try_from)
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid event record")?;

    let view = cli.view.unwrap_or(settings.default_view);
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    log::info!("Rendering {} view for {} ({} events)", view, date, events.len());

    let mut pass = RenderPass::new(&events, &settings)?;
    let tz = pass.visitor_timezone();

    let output = match view {
        ViewType::Day => {
            let layout = pass.day_view(date);
            json!({
                "view": "day",
                "date": layout.date,
                "buckets": buckets_json(&layout.buckets),
                "cells": cells_json(&layout.cells),
                "slots": slots_json(&layout.slots, tz),
            })
        }
        ViewType::Week => {
            let layout = pass.week_view(date);
            json!({
                "view": "week",
                "days": layout.days,
                "cells": cells_json(&layout.cells),
                "slots": layout.slots.iter().map(|slots| slots_json(slots, tz)).collect::<Vec<_>>(),
                "bars": bars_json(&layout.bars),
            })
        }
        ViewType::Month => {
            let layout = pass.month_view(date.year(), date.month())?;
            let rows: Vec<Value> = layout
                .rows
                .iter()
                .map(|row| {
                    json!({
                        "days": row.days.iter().map(|day| json!({
                            "date": day.date,
                            "in_month": day.in_month,
                            "events": buckets_json(&day.buckets),
                        })).collect::<Vec<_>>(),
                        "bars": bars_json(&row.bars),
                    })
                })
                .collect();
            json!({
                "view": "month",
                "year": layout.year,
                "month": layout.month,
                "rows": rows,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn event_json(event: &Event, tz: Option<Timezone>) -> Value {
    let projection = TimezoneProjector::project_opt(event, tz);
    json!({
        "id": event.id,
        "title": event.title,
        "start": projection.start.map(|start| start.wall_clock()),
        "end": projection.end.map(|end| end.wall_clock()),
        "all_day": event.all_day,
    })
}

fn ids(events: &[&Event]) -> Vec<i64> {
    events.iter().map(|event| event.id).collect()
}

fn buckets_json(buckets: &DayBuckets<'_>) -> Value {
    json!({
        "multi_day": ids(&buckets.multi_day),
        "all_day": ids(&buckets.all_day),
        "simple": ids(&buckets.simple),
    })
}

fn cells_json(cells: &[PlacedCell<'_>]) -> Vec<Value> {
    cells
        .iter()
        .filter(|placed| !placed.events.is_empty())
        .map(|placed| {
            json!({
                "cell": placed.cell,
                "events": ids(&placed.events),
            })
        })
        .collect()
}

fn slots_json(slots: &RenderedSlotMap<'_>, tz: Option<Timezone>) -> Vec<Value> {
    slots
        .iter()
        .map(|result| {
            json!({
                "hour": result.hour,
                "minute": result.minute_bucket,
                "overlap_count": result.overlap_count,
                "event": event_json(result.event, tz),
            })
        })
        .collect()
}

fn bars_json(bars: &[SpanBar<'_>]) -> Vec<Value> {
    bars.iter()
        .map(|bar| {
            let SpanWidth {
                width,
                overflows_week,
            } = bar.span;
            json!({
                "event": bar.event.id,
                "row": bar.row,
                "column": bar.column,
                "width": width,
                "overflows_week": overflows_week,
                "continued": bar.continued,
            })
        })
        .collect()
}
