use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Wall-clock source used to decide which calendar day an anchor falls on.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
    fn label(&self) -> String;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn label(&self) -> String {
        "local".to_string()
    }
}

pub struct ZonedClock {
    zone: Tz,
}

impl ZonedClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.zone).naive_local()
    }

    fn label(&self) -> String {
        self.zone.name().to_string()
    }
}

pub fn select_clock(zone: Option<&str>) -> Result<Box<dyn Clock>> {
    match zone {
        None => Ok(Box::new(SystemClock)),
        Some(name) => {
            let zone = name
                .trim()
                .parse::<Tz>()
                .map_err(|err| anyhow!("unknown time zone '{name}': {err}"))?;
            Ok(Box::new(ZonedClock::new(zone)))
        }
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn label(&self) -> String {
        "fixed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn no_zone_selects_local_clock() {
        let clock = select_clock(None).expect("local clock");
        assert_eq!(clock.label(), "local");
    }

    #[test]
    fn named_zone_is_resolved() {
        let clock = select_clock(Some("Europe/Paris")).expect("known zone");
        assert_eq!(clock.label(), "Europe/Paris");
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let err = match select_clock(Some("Mars/Olympus_Mons")) {
            Ok(_) => panic!("unknown zone should fail"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("unknown time zone 'Mars/Olympus_Mons'"));
    }

    #[test]
    fn zoned_clock_tracks_utc_offset() {
        let utc = ZonedClock::new(chrono_tz::UTC).now();
        let tokyo = ZonedClock::new(chrono_tz::Asia::Tokyo).now();
        let drift = (tokyo - utc) - TimeDelta::hours(9);
        assert!(drift.num_seconds().abs() < 5);
    }
}
