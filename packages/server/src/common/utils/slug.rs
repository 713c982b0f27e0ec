use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").expect("valid slug regex");
}

/// "Deep Cleaning (2 BHK)" -> "deep-cleaning-2-bhk"
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Deep Cleaning (2 BHK)"), "deep-cleaning-2-bhk");
        assert_eq!(slugify("  AC   Repair!! "), "ac-repair");
        assert_eq!(slugify("---"), "");
    }
}
