/// Format a duration in seconds as human-readable prose, e.g. "15 minutes"
/// or "1 hour 3 minutes". Sub-minute remainders are dropped once the
/// duration reaches a minute.
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    fn unit(value: u64, name: &str) -> String {
        if value == 1 {
            format!("1 {}", name)
        } else {
            format!("{} {}s", value, name)
        }
    }

    if hours > 0 {
        if minutes > 0 {
            format!("{} {}", unit(hours, "hour"), unit(minutes, "minute"))
        } else {
            unit(hours, "hour")
        }
    } else if minutes > 0 {
        unit(minutes, "minute")
    } else {
        unit(secs, "second")
    }
}

/// Check if the current environment has required external tools
pub async fn check_dependencies(yt_dlp_path: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(yt_dlp_path).await {
        missing.push(format!(
            "{} - required for the tooling fallback and metadata extraction",
            yt_dlp_path
        ));
    }

    missing
}

/// Check if a command is available in PATH
pub async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(0.0), "0 seconds");
        assert_eq!(format_duration(1.0), "1 second");
        assert_eq!(format_duration(45.0), "45 seconds");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(60.0), "1 minute");
        assert_eq!(format_duration(900.0), "15 minutes");
        // Sub-minute remainder dropped
        assert_eq!(format_duration(903.0), "15 minutes");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(3600.0), "1 hour");
        assert_eq!(format_duration(3780.0), "1 hour 3 minutes");
        assert_eq!(format_duration(7500.0), "2 hours 5 minutes");
    }

    #[test]
    fn test_format_duration_negative_clamped() {
        assert_eq!(format_duration(-5.0), "0 seconds");
    }

    #[tokio::test]
    async fn test_missing_command_reported() {
        let missing = check_dependencies("definitely-not-a-real-binary").await;
        assert_eq!(missing.len(), 1);
    }
}
