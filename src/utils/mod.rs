/// Characters that are not allowed in file names on common platforms
const DISALLOWED_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Sanitize filename for safe filesystem usage
///
/// Each disallowed character becomes a single `_`; surrounding whitespace is trimmed.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if DISALLOWED_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split a comma-separated language list, falling back to `default` when nothing is given
pub fn parse_language_list(input: &str, default: &[String]) -> Vec<String> {
    let languages: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .collect();

    if languages.is_empty() {
        default.to_vec()
    } else {
        languages
    }
}

/// Parse a batch list: one URL or video ID per line, blank lines and `#` comments ignored
pub fn parse_batch_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(3661.0), "1h 1m 1s");
        assert_eq!(format_duration(-5.0), "0s");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My: Video?"), "My_ Video_");
        assert_eq!(sanitize_filename("test/file?name"), "test_file_name");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
        assert_eq!(sanitize_filename("Hello World!"), "Hello World!");
    }

    #[test]
    fn test_parse_language_list() {
        let default = vec!["en".to_string()];
        assert_eq!(parse_language_list("de, en ,fr", &default), vec!["de", "en", "fr"]);
        assert_eq!(parse_language_list("", &default), vec!["en"]);
        assert_eq!(parse_language_list(" , ", &default), vec!["en"]);
    }

    #[test]
    fn test_parse_batch_list() {
        let content = "dQw4w9WgXcQ\n\n# comment\n  https://youtu.be/_NuH3D4SN-c  \n";
        assert_eq!(
            parse_batch_list(content),
            vec!["dQw4w9WgXcQ", "https://youtu.be/_NuH3D4SN-c"]
        );
    }
}
