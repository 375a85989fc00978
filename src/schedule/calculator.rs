use chrono::{NaiveDateTime, TimeDelta, Timelike};
use thiserror::Error;
use tracing::trace;

use crate::schedule::advisor::{CycleRange, recommended_range};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// The anchor is a wake-up time; candidates are bedtimes.
    Wake,
    /// The anchor is a bedtime; candidates are wake-up times.
    Sleep,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Wake => "wake",
            Mode::Sleep => "sleep",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Candidate {
    pub time: NaiveDateTime,
    pub cycles: u32,
    pub recommended: bool,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ScheduleError {
    #[error("offset for {cycles} cycle(s) falls outside the supported date range")]
    OutOfRange { cycles: u32 },
}

/// Minutes between lying down and waking for `cycles` full cycles.
pub fn offset_minutes(cycles: u32, settings: &Settings) -> Option<i64> {
    i64::from(cycles)
        .checked_mul(settings.cycle_length_min)?
        .checked_add(settings.sleep_latency_min)
}

/// Bedtimes ending on `wake_time`, most cycles (earliest bedtime) first.
pub fn compute_bedtimes(
    wake_time: NaiveDateTime,
    settings: &Settings,
) -> Result<Vec<Candidate>, ScheduleError> {
    let range = recommended_range(settings);
    (1..=settings.num_options)
        .rev()
        .map(|cycles| candidate_for(Mode::Wake, wake_time, cycles, settings, range))
        .collect()
}

/// Wake times starting from `bedtime`, fewest cycles (earliest wake) first.
pub fn compute_wake_times(
    bedtime: NaiveDateTime,
    settings: &Settings,
) -> Result<Vec<Candidate>, ScheduleError> {
    let range = recommended_range(settings);
    (1..=settings.num_options)
        .map(|cycles| candidate_for(Mode::Sleep, bedtime, cycles, settings, range))
        .collect()
}

pub fn compute(
    mode: Mode,
    anchor: NaiveDateTime,
    settings: &Settings,
) -> Result<Vec<Candidate>, ScheduleError> {
    match mode {
        Mode::Wake => compute_bedtimes(anchor, settings),
        Mode::Sleep => compute_wake_times(anchor, settings),
    }
}

fn candidate_for(
    mode: Mode,
    anchor: NaiveDateTime,
    cycles: u32,
    settings: &Settings,
    range: CycleRange,
) -> Result<Candidate, ScheduleError> {
    let out_of_range = || ScheduleError::OutOfRange { cycles };
    let minutes = offset_minutes(cycles, settings).ok_or_else(out_of_range)?;
    let offset = TimeDelta::try_minutes(minutes).ok_or_else(out_of_range)?;
    let time = match mode {
        Mode::Wake => anchor.checked_sub_signed(offset),
        Mode::Sleep => anchor.checked_add_signed(offset),
    }
    .ok_or_else(out_of_range)?;

    trace!(mode = mode.as_str(), cycles, minutes, %time, "candidate");
    Ok(Candidate {
        time,
        cycles,
        recommended: range.contains(cycles),
    })
}

/// A finished calculation: the anchor it started from, the window used to
/// flag candidates, and the candidates in display order.
#[derive(Debug, Clone)]
pub struct SchedulePlan {
    pub mode: Mode,
    pub anchor: NaiveDateTime,
    pub range: CycleRange,
    pub candidates: Vec<Candidate>,
}

impl SchedulePlan {
    pub fn build(
        mode: Mode,
        anchor: NaiveDateTime,
        settings: &Settings,
    ) -> Result<Self, ScheduleError> {
        Ok(Self {
            mode,
            anchor,
            range: recommended_range(settings),
            candidates: compute(mode, anchor, settings)?,
        })
    }

    pub fn recommended_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|candidate| candidate.recommended)
            .count()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimeDisplayMode {
    Hour24,
    Hour12,
}

pub fn format_time(time: NaiveDateTime, mode: TimeDisplayMode) -> String {
    match mode {
        TimeDisplayMode::Hour24 => format!("{:02}:{:02}", time.hour(), time.minute()),
        TimeDisplayMode::Hour12 => {
            let (is_pm, hour12) = time.hour12();
            let meridiem = if is_pm { "PM" } else { "AM" };
            format!("{:02}:{:02} {}", hour12, time.minute(), meridiem)
        }
    }
}
