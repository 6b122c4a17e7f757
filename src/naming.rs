use rand::distributions::Alphanumeric;
use rand::Rng;

/// Suffix length used for stored media filenames.
pub const MEDIA_SUFFIX_LEN: usize = 6;

/// Suffix length used for generated page filenames.
pub const PAGE_SUFFIX_LEN: usize = 8;

/// Random alphanumeric suffix (upper + lower case letters and digits).
///
/// Not cryptographically secure; the suffix only has to make name collisions
/// negligibly likely, never to be unguessable.
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Insert `_{suffix}` between the stem and the extension of a filename.
///
/// A filename whose only dot is the leading one (e.g. `.bashrc`) is treated
/// as having no extension, matching how upload clients name such files.
pub fn suffixed(filename: &str, suffix: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{filename}_{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_has_requested_length_and_alphabet() {
        for len in [MEDIA_SUFFIX_LEN, PAGE_SUFFIX_LEN] {
            let s = random_suffix(len);
            assert_eq!(s.len(), len);
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn suffixed_keeps_extension() {
        assert_eq!(suffixed("clip.mp4", "Ab3x9Z"), "clip_Ab3x9Z.mp4");
        assert_eq!(suffixed("my.clip.mp4", "Ab3x9Z"), "my.clip_Ab3x9Z.mp4");
    }

    #[test]
    fn suffixed_without_extension_appends() {
        assert_eq!(suffixed("clip", "Ab3x9Z"), "clip_Ab3x9Z");
        assert_eq!(suffixed(".bashrc", "Ab3x9Z"), ".bashrc_Ab3x9Z");
    }

    #[test]
    fn consecutive_suffixes_differ() {
        // 62^6 possibilities; two draws colliding would indicate a broken RNG.
        assert_ne!(random_suffix(MEDIA_SUFFIX_LEN), random_suffix(MEDIA_SUFFIX_LEN));
    }
}
