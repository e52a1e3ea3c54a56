use chrono::prelude::Local;

/// Date format used on the exported dashboard (`16/01/2025`)
pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn get_utc_iso_datetime() -> String {
    let timestamp = chrono::Utc::now().to_rfc3339();
    return timestamp;
}

pub fn get_local_datetime_with_format(format: &str) -> String {
    return Local::now().format(format).to_string();
}

/// Today's date as printed on the dashboard
pub fn report_date_today() -> String {
    get_local_datetime_with_format(REPORT_DATE_FORMAT)
}

/// Convert an Excel serial date (days since 1899-12-30) into a naive datetime
pub fn excel_serial_to_datetime(value: f64) -> Option<chrono::NaiveDateTime> {
    use chrono::{Duration, NaiveDate};
    if !value.is_finite() {
        return None;
    }
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value.trunc() as i64;
    let seconds = ((value - days as f64) * 86400.0).round() as i64;
    excel_base
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))
}
