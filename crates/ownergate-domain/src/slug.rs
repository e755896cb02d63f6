//! Slug generation for note titles.
//!
//! Titles are mostly Russian, so Cyrillic letters are transliterated to
//! Latin before everything outside `[a-z0-9]` is dropped.

use crate::error::{DomainError, DomainResult};

/// Maximum slug length, in characters.
pub const SLUG_MAX_LEN: usize = 100;

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Builds a URL slug from free text.
///
/// Lowercases, turns `&` into `and`, transliterates Cyrillic, collapses runs
/// of whitespace and hyphens into one hyphen, drops every other symbol and
/// truncates to [`SLUG_MAX_LEN`]. May return an empty string when the input
/// has no usable characters.
pub fn slugify(input: &str) -> String {
    let lowered = input
        .to_lowercase()
        .replace("&amp;", " and ")
        .replace('&', " and ");

    let mut slug = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_whitespace() || ch == '-' {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
        } else if let Some(latin) = transliterate(ch) {
            slug.push_str(latin);
        }
    }

    // Output is ASCII, so byte truncation is char truncation.
    slug.truncate(SLUG_MAX_LEN);
    slug.trim_end_matches('-').to_string()
}

/// Returns true if `value` is usable as a note slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= SLUG_MAX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Validates a slug taken from a request path.
pub fn parse_slug(value: &str) -> DomainResult<&str> {
    if is_valid_slug(value) {
        Ok(value)
    } else {
        Err(DomainError::InvalidSlug {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_transliterates_cyrillic() {
        assert_eq!(slugify("Заголовок"), "zagolovok");
        assert_eq!(slugify("Новый заголовок"), "novyj-zagolovok");
        assert_eq!(slugify("Щука и ёж"), "schuka-i-yozh");
    }

    #[test]
    fn test_slugify_collapses_separators_and_drops_symbols() {
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("Tom & Jerry"), "tom-and-jerry");
        assert_eq!(slugify("Подъезд"), "podezd");
    }

    #[test]
    fn test_slugify_truncates_to_max_length() {
        let title = "слово ".repeat(40);
        let slug = slugify(&title);
        assert!(slug.len() <= SLUG_MAX_LEN);
        assert!(!slug.ends_with('-'));
        assert!(is_valid_slug(&slug));
    }

    #[test]
    fn test_slugify_of_symbols_only_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("new-slug"));
        assert!(is_valid_slug("note_1"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Upper"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug(&"a".repeat(SLUG_MAX_LEN + 1)));

        assert_eq!(parse_slug("ok"), Ok("ok"));
        assert!(matches!(
            parse_slug("../etc"),
            Err(DomainError::InvalidSlug { .. })
        ));
    }
}
