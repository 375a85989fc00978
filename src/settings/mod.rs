pub mod store;

pub const DEFAULT_CYCLE_LENGTH_MIN: i64 = 90;
pub const DEFAULT_SLEEP_LATENCY_MIN: i64 = 15;
pub const DEFAULT_NUM_OPTIONS: u32 = 10;
pub const DEFAULT_AGE: u32 = 30;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl ActivityLevel {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// Calculation inputs, already normalized by whoever loaded them.
///
/// Durations are signed minutes: the calculator does no validation of its
/// own, so a negative value produced by a caller flows straight through the
/// arithmetic.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Settings {
    pub cycle_length_min: i64,
    pub sleep_latency_min: i64,
    pub num_options: u32,
    pub age: u32,
    pub activity_level: ActivityLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cycle_length_min: DEFAULT_CYCLE_LENGTH_MIN,
            sleep_latency_min: DEFAULT_SLEEP_LATENCY_MIN,
            num_options: DEFAULT_NUM_OPTIONS,
            age: DEFAULT_AGE,
            activity_level: ActivityLevel::default(),
        }
    }
}

impl Settings {
    pub fn with_overrides(self, overrides: &SettingsOverrides) -> Self {
        Self {
            cycle_length_min: overrides.cycle_length_min.unwrap_or(self.cycle_length_min),
            sleep_latency_min: overrides
                .sleep_latency_min
                .unwrap_or(self.sleep_latency_min),
            num_options: overrides.num_options.unwrap_or(self.num_options),
            age: overrides.age.unwrap_or(self.age),
            activity_level: overrides.activity_level.unwrap_or(self.activity_level),
        }
    }
}

/// Per-invocation replacements layered over the stored settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsOverrides {
    pub cycle_length_min: Option<i64>,
    pub sleep_latency_min: Option<i64>,
    pub num_options: Option<u32>,
    pub age: Option<u32>,
    pub activity_level: Option<ActivityLevel>,
}

impl SettingsOverrides {
    pub fn is_empty(&self) -> bool {
        self.cycle_length_min.is_none()
            && self.sleep_latency_min.is_none()
            && self.num_options.is_none()
            && self.age.is_none()
            && self.activity_level.is_none()
    }
}
