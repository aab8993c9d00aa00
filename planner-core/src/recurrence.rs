//! Recurrence rule model.
//!
//! Plain data describing how an event repeats, plus the validation that turns
//! a stored rule into a [`Cadence`] the generator can walk. Nothing here
//! computes dates.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Upper bound on generated occurrences for a rule without `endAfterOccurrences`.
pub const SAFETY_CAP: u32 = 100;

/// Named repetition shape stored on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// A set of weekdays, indexed 0 (Sunday) through 6 (Saturday).
///
/// Serialized as a sorted list of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn from_indices<I>(indices: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = u8>,
    {
        indices.into_iter().try_fold(Self::EMPTY, |set, index| {
            if index > 6 {
                Err(RuleError::WeekdayOutOfRange(index))
            } else {
                Ok(WeekdaySet(set.0 | (1 << index)))
            }
        })
    }

    pub fn from_weekdays<I>(weekdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        weekdays.into_iter().fold(Self::EMPTY, |set, weekday| {
            WeekdaySet(set.0 | (1 << weekday.num_days_from_sunday()))
        })
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_sunday()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Indices in ascending order (Sunday first).
    pub fn indices(self) -> impl Iterator<Item = u8> {
        (0..7u8).filter(move |index| self.0 & (1 << index) != 0)
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = RuleError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(indices)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices().collect()
    }
}

/// Parameters of a `custom` pattern, also the home of the end conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRecurrence {
    /// Signed so that broken stored values survive loading and fail validation instead.
    pub interval: i64,
    pub unit: RecurrenceUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_days: Option<WeekdaySet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_after_occurrences: Option<u32>,
}

impl CustomRecurrence {
    pub fn every(interval: i64, unit: RecurrenceUnit) -> Self {
        CustomRecurrence {
            interval,
            unit,
            selected_days: None,
            end_date: None,
            end_after_occurrences: None,
        }
    }

    fn checked_interval(&self) -> Result<u32, RuleError> {
        if self.interval <= 0 {
            return Err(RuleError::NonPositiveInterval(self.interval));
        }
        Ok(u32::try_from(self.interval).unwrap_or(u32::MAX))
    }
}

/// Validated, resolved form of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Not recurring: the event is emitted as-is.
    Once,
    /// Fixed increment of `interval` units from the first occurrence.
    Step { interval: u32, unit: RecurrenceUnit },
    /// Selected weekdays during the first week of every `interval_weeks` block.
    Weekdays { interval_weeks: u32, days: WeekdaySet },
}

/// When a series stops, independent of the query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndCondition {
    /// Last calendar date (inclusive) an occurrence may start on.
    pub end_date: Option<NaiveDate>,
    /// Occurrences counted from the first one, including those before any window.
    pub max_occurrences: u32,
}

impl Default for EndCondition {
    fn default() -> Self {
        EndCondition {
            end_date: None,
            max_occurrences: SAFETY_CAP,
        }
    }
}

impl EndCondition {
    /// Whether the occurrence with this zero-based ordinal starting at `start` is still part of the series.
    pub fn allows(&self, ordinal: u32, start: NaiveDateTime) -> bool {
        ordinal < self.max_occurrences && self.end_date.is_none_or(|end| start.date() <= end)
    }
}

/// Borrowed view over the recurrence fields of an event.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceRule<'a> {
    pub is_recurring: bool,
    pub pattern: RecurrencePattern,
    pub custom: Option<&'a CustomRecurrence>,
}

impl RecurrenceRule<'_> {
    pub fn cadence(&self) -> Result<Cadence, RuleError> {
        let step = |unit| -> Result<Cadence, RuleError> { Ok(Cadence::Step { interval: 1, unit }) };

        if !self.is_recurring {
            return Ok(Cadence::Once);
        }

        match self.pattern {
            RecurrencePattern::None => Ok(Cadence::Once),
            RecurrencePattern::Daily => step(RecurrenceUnit::Days),
            RecurrencePattern::Weekly => step(RecurrenceUnit::Weeks),
            RecurrencePattern::Monthly => step(RecurrenceUnit::Months),
            RecurrencePattern::Yearly => step(RecurrenceUnit::Years),
            RecurrencePattern::Custom => {
                let custom = self.custom.ok_or(RuleError::MissingCustomRecurrence)?;
                let interval = custom.checked_interval()?;

                match custom.selected_days {
                    Some(days) if !days.is_empty() => Ok(Cadence::Weekdays {
                        interval_weeks: interval,
                        days,
                    }),
                    _ => Ok(Cadence::Step {
                        interval,
                        unit: custom.unit,
                    }),
                }
            }
        }
    }

    /// End conditions come from `customRecurring` whenever it is present, whatever the pattern.
    pub fn end_condition(&self) -> Result<EndCondition, RuleError> {
        let Some(custom) = self.custom else {
            return Ok(EndCondition::default());
        };

        let max_occurrences = match custom.end_after_occurrences {
            Some(0) => return Err(RuleError::ZeroOccurrenceLimit),
            Some(n) => n,
            None => SAFETY_CAP,
        };

        Ok(EndCondition {
            end_date: custom.end_date,
            max_occurrences,
        })
    }

    /// Validate both halves of the rule at once.
    pub fn validate(&self) -> Result<(Cadence, EndCondition), RuleError> {
        Ok((self.cadence()?, self.end_condition()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: RecurrencePattern, custom: Option<&CustomRecurrence>) -> RecurrenceRule<'_> {
        RecurrenceRule {
            is_recurring: true,
            pattern,
            custom,
        }
    }

    #[test]
    fn named_patterns_step_by_one_unit() {
        assert_eq!(
            rule(RecurrencePattern::Daily, None).cadence(),
            Ok(Cadence::Step { interval: 1, unit: RecurrenceUnit::Days })
        );
        assert_eq!(
            rule(RecurrencePattern::Yearly, None).cadence(),
            Ok(Cadence::Step { interval: 1, unit: RecurrenceUnit::Years })
        );
    }

    #[test]
    fn not_recurring_is_once_whatever_the_pattern() {
        let r = RecurrenceRule {
            is_recurring: false,
            pattern: RecurrencePattern::Daily,
            custom: None,
        };
        assert_eq!(r.cadence(), Ok(Cadence::Once));
        assert_eq!(rule(RecurrencePattern::None, None).cadence(), Ok(Cadence::Once));
    }

    #[test]
    fn custom_without_rule_is_rejected() {
        assert_eq!(
            rule(RecurrencePattern::Custom, None).cadence(),
            Err(RuleError::MissingCustomRecurrence)
        );
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        let zero = CustomRecurrence::every(0, RecurrenceUnit::Days);
        let negative = CustomRecurrence::every(-2, RecurrenceUnit::Weeks);

        assert_eq!(
            rule(RecurrencePattern::Custom, Some(&zero)).cadence(),
            Err(RuleError::NonPositiveInterval(0))
        );
        assert_eq!(
            rule(RecurrencePattern::Custom, Some(&negative)).cadence(),
            Err(RuleError::NonPositiveInterval(-2))
        );
    }

    #[test]
    fn selected_days_switch_to_weekday_cadence() {
        let mut custom = CustomRecurrence::every(2, RecurrenceUnit::Weeks);
        custom.selected_days = Some(WeekdaySet::from_indices([1, 3]).unwrap());

        assert_eq!(
            rule(RecurrencePattern::Custom, Some(&custom)).cadence(),
            Ok(Cadence::Weekdays {
                interval_weeks: 2,
                days: WeekdaySet::from_weekdays([Weekday::Mon, Weekday::Wed]),
            })
        );
    }

    #[test]
    fn empty_selected_days_fall_back_to_fixed_step() {
        let mut custom = CustomRecurrence::every(3, RecurrenceUnit::Days);
        custom.selected_days = Some(WeekdaySet::EMPTY);

        assert_eq!(
            rule(RecurrencePattern::Custom, Some(&custom)).cadence(),
            Ok(Cadence::Step { interval: 3, unit: RecurrenceUnit::Days })
        );
    }

    #[test]
    fn end_condition_defaults_to_safety_cap() {
        let custom = CustomRecurrence::every(1, RecurrenceUnit::Days);
        let end = rule(RecurrencePattern::Custom, Some(&custom)).end_condition().unwrap();

        assert_eq!(end.max_occurrences, SAFETY_CAP);
        assert_eq!(end.end_date, None);
        assert_eq!(
            rule(RecurrencePattern::Daily, None).end_condition(),
            Ok(EndCondition::default())
        );
    }

    #[test]
    fn zero_occurrence_limit_is_rejected() {
        let mut custom = CustomRecurrence::every(1, RecurrenceUnit::Days);
        custom.end_after_occurrences = Some(0);

        assert_eq!(
            rule(RecurrencePattern::Daily, Some(&custom)).end_condition(),
            Err(RuleError::ZeroOccurrenceLimit)
        );
    }

    #[test]
    fn end_date_is_inclusive_of_the_whole_day() {
        let end = EndCondition {
            end_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            max_occurrences: SAFETY_CAP,
        };
        let late = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let next_day = NaiveDate::from_ymd_opt(2024, 1, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert!(end.allows(0, late));
        assert!(!end.allows(0, next_day));
        assert!(!end.allows(SAFETY_CAP, late));
    }

    #[test]
    fn weekday_set_rejects_out_of_range_index() {
        assert_eq!(
            WeekdaySet::from_indices([1, 7]),
            Err(RuleError::WeekdayOutOfRange(7))
        );
    }

    #[test]
    fn weekday_set_serializes_as_sorted_indices() {
        let set = WeekdaySet::from_indices([5, 1, 3, 1]).unwrap();
        assert_eq!(set.indices().count(), 3);
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,3,5]");

        let parsed: WeekdaySet = serde_json::from_str("[0,6]").unwrap();
        assert!(parsed.contains(Weekday::Sun));
        assert!(parsed.contains(Weekday::Sat));
        assert!(!parsed.contains(Weekday::Mon));

        assert!(serde_json::from_str::<WeekdaySet>("[9]").is_err());
    }

    #[test]
    fn custom_recurrence_uses_camel_case_fields() {
        let json = r#"{
            "interval": 2,
            "unit": "weeks",
            "selectedDays": [1, 3],
            "endDate": "2024-06-30",
            "endAfterOccurrences": 10
        }"#;
        let custom: CustomRecurrence = serde_json::from_str(json).unwrap();

        assert_eq!(custom.interval, 2);
        assert_eq!(custom.unit, RecurrenceUnit::Weeks);
        assert_eq!(custom.end_date, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert_eq!(custom.end_after_occurrences, Some(10));
    }
}
