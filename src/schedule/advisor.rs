use crate::settings::{ActivityLevel, Settings};

const SENIOR_AGE: u32 = 65;

/// Inclusive window of cycle counts worth highlighting.
///
/// Clamping to the number of options can leave `max < min`; such a window is
/// kept as computed and simply contains nothing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CycleRange {
    pub min: u32,
    pub max: u32,
}

impl CycleRange {
    pub fn contains(&self, cycles: u32) -> bool {
        self.min <= cycles && cycles <= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }
}

pub fn recommended_range(settings: &Settings) -> CycleRange {
    let mut min = 5_u32;
    let mut max = 6_u32;

    if settings.activity_level == ActivityLevel::High {
        min = 6;
        max = 7;
    } else if settings.activity_level == ActivityLevel::Low {
        min = 4;
        max = 6;
    }

    if settings.age >= SENIOR_AGE {
        min = min.saturating_sub(1).max(4);
        max = max.min(6);
    }

    CycleRange {
        min: min.max(1),
        max: max.min(settings.num_options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(age: u32, activity_level: ActivityLevel, num_options: u32) -> Settings {
        Settings {
            age,
            activity_level,
            num_options,
            ..Settings::default()
        }
    }

    #[test]
    fn default_profile_gets_five_to_six() {
        let range = recommended_range(&Settings::default());
        assert_eq!(range, CycleRange { min: 5, max: 6 });
    }

    #[test]
    fn high_activity_shifts_window_up() {
        let range = recommended_range(&profile(30, ActivityLevel::High, 10));
        assert_eq!(range, CycleRange { min: 6, max: 7 });
    }

    #[test]
    fn low_activity_widens_window_down() {
        let range = recommended_range(&profile(30, ActivityLevel::Low, 10));
        assert_eq!(range, CycleRange { min: 4, max: 6 });
    }

    #[test]
    fn seniors_with_moderate_activity_get_four_to_six() {
        let range = recommended_range(&profile(70, ActivityLevel::Moderate, 10));
        assert_eq!(range, CycleRange { min: 4, max: 6 });
    }

    #[test]
    fn senior_rule_applies_after_activity() {
        let high = recommended_range(&profile(65, ActivityLevel::High, 10));
        assert_eq!(high, CycleRange { min: 5, max: 6 });

        let low = recommended_range(&profile(80, ActivityLevel::Low, 10));
        assert_eq!(low, CycleRange { min: 4, max: 6 });
    }

    #[test]
    fn age_sixty_four_is_not_senior() {
        let range = recommended_range(&profile(64, ActivityLevel::High, 10));
        assert_eq!(range, CycleRange { min: 6, max: 7 });
    }

    #[test]
    fn max_is_capped_by_option_count() {
        let range = recommended_range(&profile(30, ActivityLevel::High, 6));
        assert_eq!(range, CycleRange { min: 6, max: 6 });
        assert!(!range.is_empty());
    }

    #[test]
    fn small_option_count_leaves_degenerate_window() {
        let range = recommended_range(&profile(30, ActivityLevel::Moderate, 3));
        assert_eq!(range, CycleRange { min: 5, max: 3 });
        assert!(range.is_empty());
        assert!((0..=10).all(|cycles| !range.contains(cycles)));
    }

    #[test]
    fn bounds_hold_for_every_profile() {
        let levels = [
            ActivityLevel::Low,
            ActivityLevel::Moderate,
            ActivityLevel::High,
        ];
        for num_options in 0..=12 {
            for age in [0, 30, 64, 65, 90] {
                for level in levels {
                    let range = recommended_range(&profile(age, level, num_options));
                    assert!(range.min >= 1);
                    assert!(range.max <= num_options);
                }
            }
        }
    }
}
