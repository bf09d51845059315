use chrono::{DateTime, Utc};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Human-readable age of a timestamp ("just now", "5m ago", "2h ago", "3d ago")
pub fn format_age(at: DateTime<Utc>) -> String {
    format_age_since(at, Utc::now())
}

fn format_age_since(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(at);

    if age.num_minutes() < 1 {
        "just now".to_string()
    } else if age.num_hours() < 1 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_days() < 1 {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}d ago", age.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Angular", 3), "Ang");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("Über Angular Kurs", 8), "Über ...");
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age_since(now - Duration::seconds(10), now), "just now");
        assert_eq!(format_age_since(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_age_since(now - Duration::hours(2), now), "2h ago");
        assert_eq!(format_age_since(now - Duration::days(3), now), "3d ago");
    }
}
