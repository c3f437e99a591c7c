use chrono::{DateTime, Local, TimeZone};

/// Current local time in the format printed under exported signatures,
/// e.g. `3/5/2024 2:07:09 PM`.
pub fn date_stamp() -> String {
    format_date_stamp(&Local::now())
}

pub fn format_date_stamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%-m/%-d/%Y %-I:%M:%S %p").to_string()
}
