pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// "2m 5s" style duration used in the history table
pub fn format_duration(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// "2 minutes and 5 seconds" style duration used on the results screen
pub fn format_duration_long(secs: u64) -> String {
    format!("{} minutes and {} seconds", secs / 60, secs % 60)
}
