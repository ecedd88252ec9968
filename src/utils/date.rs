use chrono::NaiveDateTime;

pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn format_date(date: NaiveDateTime) -> String {
    format!("{}", date.format(DATE_FMT))
}

pub fn parse_date(str_time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(str_time, DATE_FMT).ok()
}

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, DATE_FMT};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        format_date(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        let time = NaiveDateTime::parse_from_str(&str_time, DATE_FMT).map_err(D::Error::custom)?;
        Ok(time)
    }
}

// opt_serializer keeps open timestamps (returned_at, stop_at, ...) as null
pub mod opt_serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, DATE_FMT};

    pub fn serialize<S: Serializer>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        time.map(format_date).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let str_time: Option<String> = Deserialize::deserialize(deserializer)?;
        match str_time {
            Some(s) if !s.is_empty() => {
                let time = NaiveDateTime::parse_from_str(&s, DATE_FMT).map_err(D::Error::custom)?;
                Ok(Some(time))
            }
            _ => Ok(None),
        }
    }
}
