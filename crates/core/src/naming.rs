//! Derived names: category slugs and stored upload file names.

/// Derive a category slug: lowercase, spaces become hyphens.
///
/// ```
/// use crave_core::naming::category_slug;
///
/// assert_eq!(category_slug("Wedding Cakes"), "wedding-cakes");
/// ```
pub fn category_slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Name under which an uploaded file is stored: `<unix_ts>_<sanitized>`.
///
/// Only the final path component of `original` is kept and every character
/// outside `[A-Za-z0-9._-]` becomes `_`, so the result can never escape the
/// upload directory.
///
/// ```
/// use crave_core::naming::upload_file_name;
///
/// assert_eq!(upload_file_name(1700000000, "../Red Velvet.jpg"), "1700000000_Red_Velvet.jpg");
/// ```
pub fn upload_file_name(unix_ts: i64, original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let clean = clean.trim_start_matches('.');
    let clean = if clean.is_empty() { "upload" } else { clean };
    format!("{unix_ts}_{clean}")
}

/// Lower-cased extension of a file name, if any.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word() {
        assert_eq!(category_slug("Cupcakes"), "cupcakes");
    }

    #[test]
    fn multiple_words() {
        assert_eq!(category_slug("Birthday Cakes For Kids"), "birthday-cakes-for-kids");
    }

    #[test]
    fn surrounding_whitespace_trimmed() {
        assert_eq!(category_slug("  Tarts "), "tarts");
    }

    #[test]
    fn upload_name_strips_directories_and_odd_characters() {
        assert_eq!(upload_file_name(5, "/etc/passwd"), "5_passwd");
        assert_eq!(upload_file_name(5, "C:\\Users\\me\\cake (1).png"), "5_cake__1_.png");
        assert_eq!(upload_file_name(5, "..."), "5_upload");
        assert_eq!(upload_file_name(5, ".hidden.jpg"), "5_hidden.jpg");
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Cake.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".gitignore"), None);
    }
}
