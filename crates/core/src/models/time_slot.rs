use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded interval on a specific date offered by a teacher.
///
/// The interval is half-open: `[start_time, end_time)`. `current_capacity`
/// never exceeds `max_capacity` for slots read back from storage; slots built
/// from client input are checked by the validator instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub slot_id: Uuid,
    pub teacher_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub max_capacity: u32,
    pub current_capacity: u32,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_reason: Option<String>,
}

fn default_available() -> bool {
    true
}

impl TimeSlot {
    /// Length of the slot in fractional hours. Inverted slots report zero.
    pub fn duration_hours(&self) -> f64 {
        let minutes = (self.end_time - self.start_time).num_minutes().max(0);
        minutes as f64 / 60.0
    }

    /// True when the slot describes a non-empty forward interval.
    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }

    /// Midnight (naive UTC) of the slot's date; notice is counted from here.
    pub fn day_start(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    /// `HH:MM-HH:MM`, as shown in user-facing messages.
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// Wall-clock times travel as `HH:MM`; `HH:MM:SS` is accepted on input since
/// that is how PostgreSQL renders a `TIME` column.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }

    /// The same format for optional fields.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    de::Error::custom(format!("invalid time '{}', expected HH:MM", raw))
                }),
                None => Ok(None),
            }
        }
    }
}
