use uuid::Uuid;

/// Fresh identifier of the form `{prefix}-{uuid}`. Every call is independent, so ids
/// never repeat across entities created in the same millisecond.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Replace every character that is not an ASCII letter, an ASCII digit or a Hangul
/// syllable with `_`, keeping exported file names portable.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ('\u{AC00}'..='\u{D7A3}').contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_unique() {
        let a = new_id("screen");
        let b = new_id("screen");
        assert!(a.starts_with("screen-"));
        assert_ne!(a, b);
    }

    #[test]
    fn file_stem_keeps_hangul_and_alphanumerics() {
        assert_eq!(sanitize_file_stem("Bank App: 송금!"), "Bank_App__송금_");
    }
}
