use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Lowercase `text`, replacing every run of non-alphanumerics with a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Generate chart filename with format: weather-{city}-{filter}-{YYMMDD}.svg
pub fn generate_chart_filename(dir: &Path, city: &str, filter_title: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year

    let filename = format!(
        "weather-{}-{}-{:02}{:02}{:02}.svg",
        slugify(city),
        slugify(filter_title),
        year,
        now.month(),
        now.day()
    );
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("DE_BILT"), "de-bilt");
        assert_eq!(slugify("2020-01-01 to 2020-12-31"), "2020-01-01-to-2020-12-31");
        assert_eq!(slugify("Winter (all years)"), "winter-all-years");
        assert_eq!(slugify("  "), "");
    }

    #[test]
    fn test_generate_chart_filename() {
        let filename = generate_chart_filename(Path::new("charts"), "DE_BILT", "All-time");
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.starts_with("charts"));
        assert!(filename_str.ends_with(".svg"));

        let file_part = filename.file_name().unwrap().to_string_lossy();
        assert!(file_part.starts_with("weather-de-bilt-all-time-"));
        // "weather-de-bilt-all-time-" + YYMMDD + ".svg"
        assert_eq!(file_part.len(), "weather-de-bilt-all-time-".len() + 6 + 4);
    }
}
