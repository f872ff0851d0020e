use chrono::{DateTime, Local, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceType {
    /// Case-insensitive parse of the wire name. An empty string is `Once`.
    pub fn rt_from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "once" => Some(Self::Once),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecurrenceType::Once => "once",
            RecurrenceType::Daily => "daily",
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Monthly => "monthly",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "once" | "" => Some(RecurrenceType::Once),
            "daily" => Some(RecurrenceType::Daily),
            "weekly" => Some(RecurrenceType::Weekly),
            "monthly" => Some(RecurrenceType::Monthly),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceType::Once)
    }
}

/// Parse a lowercase-insensitive English weekday name ("monday" .. "sunday").
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Rule describing whether and when a reminder repeats.
///
/// Only one of `days` / `date` is meaningful for a given `kind`; the other is
/// carried along untouched because storage may hold it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    #[serde(rename = "type", default)]
    pub kind: RecurrenceType,
    /// Weekday names, meaningful for `Weekly`.
    #[serde(default)]
    pub days: Vec<String>,
    /// Day of month (1-31), meaningful for `Monthly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<u32>,
    /// `None` = unbounded.
    #[serde(default, with = "crate::utils::serde_ts")]
    pub end_date: Option<DateTime<Local>>,
}

impl RecurrencePattern {
    pub fn once() -> Self {
        Self::default()
    }

    pub fn daily() -> Self {
        Self {
            kind: RecurrenceType::Daily,
            ..Self::default()
        }
    }

    pub fn weekly<S: AsRef<str>>(days: &[S]) -> Self {
        Self {
            kind: RecurrenceType::Weekly,
            days: days.iter().map(|d| d.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn monthly(date: u32) -> Self {
        Self {
            kind: RecurrenceType::Monthly,
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn until(mut self, end_date: DateTime<Local>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.kind.is_recurring()
    }

    pub fn includes_weekday(&self, day: Weekday) -> bool {
        self.days.iter().any(|d| parse_weekday(d) == Some(day))
    }

    /// Structural check for the type-specific fields.
    /// Weekly needs a non-empty set of valid weekday names, monthly a date in
    /// 1..=31. Other types accept anything.
    pub fn validate(&self) -> Result<(), String> {
        match self.kind {
            RecurrenceType::Once | RecurrenceType::Daily => Ok(()),
            RecurrenceType::Weekly => {
                if self.days.is_empty() {
                    return Err("weekly recurrence requires at least one day".into());
                }
                match self.days.iter().find(|d| parse_weekday(d).is_none()) {
                    Some(bad) => Err(format!("invalid weekday in recurrence pattern: {}", bad)),
                    None => Ok(()),
                }
            }
            RecurrenceType::Monthly => match self.date {
                Some(d) if (1..=31).contains(&d) => Ok(()),
                _ => Err("monthly recurrence requires a date between 1 and 31".into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names_ignore_case() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday(" SUNDAY "), Some(Weekday::Sun));
        assert_eq!(parse_weekday("mon"), None);
    }

    #[test]
    fn unbounded_pattern_serializes_empty_end_date() {
        let json = serde_json::to_value(RecurrencePattern::weekly(&["monday"])).unwrap();
        assert_eq!(json["type"], "weekly");
        assert_eq!(json["end_date"], "");
        assert!(json.get("date").is_none());

        let back: RecurrencePattern = serde_json::from_value(json).unwrap();
        assert_eq!(back.end_date, None);
    }

    #[test]
    fn unknown_weekday_never_matches() {
        let p = RecurrencePattern::weekly(&["funday"]);
        assert!(p.validate().is_err());
        assert!(!p.includes_weekday(Weekday::Mon));
    }
}
