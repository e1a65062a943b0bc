use regex::Regex;
use std::sync::OnceLock;

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex"))
}

fn label_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9_]+$").expect("label key regex"))
}

/// "Men's Tops & Tees" -> "mens-tops-tees"
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch == '\'' || ch == '’' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= 128 && slug_re().is_match(slug)
}

/// SizeLabel.key 以及 labelType 使用同一种格式，例如 SIZE_SM
pub fn is_valid_label_key(key: &str) -> bool {
    key.len() <= 64 && label_key_re().is_match(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Men's Tops & Tees"), "mens-tops-tees");
        assert_eq!(slugify("  Women  Dresses "), "women-dresses");
        assert_eq!(slugify("Kids (4-12)"), "kids-4-12");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("mens-tops"));
        assert!(is_valid_slug("a1"));
        assert!(!is_valid_slug("Mens"));
        assert!(!is_valid_slug("-mens"));
        assert!(!is_valid_slug("mens--tops"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn label_key_validation() {
        assert!(is_valid_label_key("SIZE_SM"));
        assert!(!is_valid_label_key("size_sm"));
        assert!(!is_valid_label_key("SIZE-SM"));
    }
}
