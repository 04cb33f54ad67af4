//! # Front Matter Generation
//!
//! Builds the metadata header written at the top of every output document.
//! The title comes from the input file name: `tokyo-city-guide` becomes
//! `Tokyo City Guide`, but only the first character of each hyphen-separated
//! segment is touched, so `tokyo-cITY` becomes `Tokyo cITY`.

use chrono::NaiveDate;
use serde::Serialize;

/// Fixed-schema metadata block for one output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    /// Title derived from the file name.
    pub title: String,
    /// Same as `title`.
    pub description: String,
    /// Same as `title`.
    pub meta_title: String,
    /// Always empty.
    pub author: String,
    /// Processing date, `YYYY-MM-DD`.
    pub date: String,
    /// The caller-supplied category.
    pub categories: Vec<String>,
    /// Always empty.
    pub image: String,
    /// The caller-supplied tag.
    pub tags: Vec<String>,
    /// Always `false`.
    pub draft: bool,
}

impl FrontMatter {
    /// Builds front matter for the file with base name `base_name`.
    pub fn new(
        base_name: &str,
        category: &str,
        tag: &str,
        date: NaiveDate,
    ) -> Self {
        let title = format_title(base_name);
        Self {
            description: title.clone(),
            meta_title: title.clone(),
            title,
            author: String::new(),
            date: date.format("%Y-%m-%d").to_string(),
            categories: vec![category.to_string()],
            image: String::new(),
            tags: vec![tag.to_string()],
            draft: false,
        }
    }
}

/// Turns a hyphenated file name into a space-separated title.
///
/// Empty segments are kept, so leading, trailing or doubled hyphens leave
/// extra spaces in the result.
pub fn format_title(base_name: &str) -> String {
    base_name
        .split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ShellRenderer;
    use serde_yml::Value as YamlValue;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_title_capitalizes_each_segment() {
        assert_eq!(format_title("tokyo-city-guide"), "Tokyo City Guide");
        assert_eq!(format_title("kyoto"), "Kyoto");
    }

    #[test]
    fn test_title_leaves_rest_of_segment_untouched() {
        assert_eq!(format_title("tokyo-ABC-guide"), "Tokyo ABC Guide");
        assert_eq!(format_title("tokyo-cITY"), "Tokyo cITY");
        assert_eq!(format_title("2024-trip"), "2024 Trip");
    }

    #[test]
    fn test_title_keeps_empty_segments() {
        assert_eq!(format_title("-osaka-"), " Osaka ");
        assert_eq!(format_title("nara--park"), "Nara  Park");
        assert_eq!(format_title(""), "");
    }

    #[test]
    fn test_title_handles_non_ascii_first_letter() {
        assert_eq!(format_title("école-guide"), "École Guide");
    }

    #[test]
    fn test_fields() {
        let fm = FrontMatter::new("tokyo-city-guide", "travel", "japan", date());
        assert_eq!(fm.title, "Tokyo City Guide");
        assert_eq!(fm.description, fm.title);
        assert_eq!(fm.meta_title, fm.title);
        assert_eq!(fm.author, "");
        assert_eq!(fm.image, "");
        assert_eq!(fm.date, "2024-03-09");
        assert_eq!(fm.categories, vec!["travel"]);
        assert_eq!(fm.tags, vec!["japan"]);
        assert!(!fm.draft);
    }

    #[test]
    fn test_rendered_block_layout() {
        let renderer = ShellRenderer::new().unwrap();
        let fm = FrontMatter::new("tokyo-city-guide", "travel", "japan", date());

        let block = renderer.render_front_matter(&fm).unwrap();
        assert_eq!(
            block,
            "---\n\
             title: \"Tokyo City Guide\"\n\
             description: \"Tokyo City Guide\"\n\
             meta_title: \"Tokyo City Guide\"\n\
             author: \"\"\n\
             date: 2024-03-09\n\
             categories: [\"travel\"]\n\
             image: \"\"\n\
             tags: [\"japan\"]\n\
             draft: false\n\
             ---\n\n"
        );
    }

    #[test]
    fn test_rendered_block_is_valid_yaml() {
        let renderer = ShellRenderer::new().unwrap();
        let fm = FrontMatter::new("shinjuku-night", "city", "nightlife", date());
        let block = renderer.render_front_matter(&fm).unwrap();

        let yaml = block
            .trim_end()
            .trim_start_matches("---\n")
            .trim_end_matches("---");
        let parsed: YamlValue = serde_yml::from_str(yaml).unwrap();
        assert_eq!(parsed["title"].as_str(), Some("Shinjuku Night"));
        assert_eq!(parsed["categories"][0].as_str(), Some("city"));
        assert_eq!(parsed["tags"][0].as_str(), Some("nightlife"));
        assert_eq!(parsed["draft"].as_bool(), Some(false));
    }
}
