use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::schedule::calculator::{
    Candidate, Mode, SchedulePlan, TimeDisplayMode, format_time,
};
use crate::settings::Settings;

pub trait Renderer {
    fn render(&self, out: &mut dyn Write, plan: &SchedulePlan, settings: &Settings) -> Result<()>;
}

pub struct TextRenderer {
    pub display: TimeDisplayMode,
}

impl Renderer for TextRenderer {
    fn render(&self, out: &mut dyn Write, plan: &SchedulePlan, settings: &Settings) -> Result<()> {
        let anchor = format_time(plan.anchor, self.display);
        match plan.mode {
            Mode::Wake => writeln!(out, "Bedtimes for waking at {anchor}")?,
            Mode::Sleep => writeln!(out, "Wake times for a {anchor} bedtime")?,
        }

        let range = plan.range;
        if range.is_empty() {
            writeln!(
                out,
                "Recommended window: none ({}-{} cycles)",
                range.min, range.max
            )?;
        } else {
            writeln!(out, "Recommended window: {}-{} cycles", range.min, range.max)?;
        }

        if plan.candidates.is_empty() {
            writeln!(out, "  (no candidates)")?;
            return Ok(());
        }

        for candidate in &plan.candidates {
            let noun = if candidate.cycles == 1 { "cycle" } else { "cycles" };
            let badge = if candidate.recommended {
                "  recommended"
            } else {
                ""
            };
            writeln!(
                out,
                "  {}  {:>2} {:<6}  {}{}",
                format_time(candidate.time, self.display),
                candidate.cycles,
                noun,
                format_sleep(sleep_minutes(candidate, settings)),
                badge
            )?;
        }
        Ok(())
    }
}

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonReport {
    mode: &'static str,
    anchor: String,
    range: JsonRange,
    candidates: Vec<JsonCandidate>,
}

#[derive(Serialize)]
struct JsonRange {
    min: u32,
    max: u32,
}

#[derive(Serialize)]
struct JsonCandidate {
    time: String,
    date: String,
    cycles: u32,
    sleep_minutes: i64,
    recommended: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, out: &mut dyn Write, plan: &SchedulePlan, settings: &Settings) -> Result<()> {
        let report = JsonReport {
            mode: plan.mode.as_str(),
            anchor: plan.anchor.format("%Y-%m-%dT%H:%M").to_string(),
            range: JsonRange {
                min: plan.range.min,
                max: plan.range.max,
            },
            candidates: plan
                .candidates
                .iter()
                .map(|candidate| JsonCandidate {
                    time: format_time(candidate.time, TimeDisplayMode::Hour24),
                    date: candidate.time.format("%Y-%m-%d").to_string(),
                    cycles: candidate.cycles,
                    sleep_minutes: sleep_minutes(candidate, settings),
                    recommended: candidate.recommended,
                })
                .collect(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        Ok(())
    }
}

/// Time actually asleep, excluding the latency.
fn sleep_minutes(candidate: &Candidate, settings: &Settings) -> i64 {
    i64::from(candidate.cycles).saturating_mul(settings.cycle_length_min)
}

fn format_sleep(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.unsigned_abs();
    format!("{sign}{}h{:02}", minutes / 60, minutes % 60)
}
