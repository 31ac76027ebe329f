use std::time::{SystemTime, UNIX_EPOCH};

/// Length of the tag appended to an archived form's identifier.
pub const ARCHIVE_TAG_LEN: usize = 13;

/// Suffix of the file an archived definition is copied to.
pub const ARCHIVE_FILE_SUFFIX: &str = ".form.yaml.deleted";

/// Drop a trailing `-<13 lowercase alphanumerics>` tag, so archiving an
/// already archived form does not stack tags.
pub fn strip_archive_tag(identifier: &str) -> &str {
    match identifier.rsplit_once('-') {
        Some((base, tag))
            if !base.is_empty()
                && tag.len() == ARCHIVE_TAG_LEN
                && tag.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) =>
        {
            base
        }
        _ => identifier,
    }
}

pub fn archive_identifier(identifier: &str, tag: &str) -> String {
    format!("{}-{}", strip_archive_tag(identifier), tag)
}

pub fn archive_file_name(archive_identifier: &str) -> String {
    format!("{}{}", archive_identifier, ARCHIVE_FILE_SUFFIX)
}

/// Fresh tag for `identifier`: hex digest of the identifier and the current
/// time, cut to `ARCHIVE_TAG_LEN`.
pub fn archive_tag(identifier: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let mut tag = text_fingerprint(&format!("{}:{}", identifier, nanos));
    tag.truncate(ARCHIVE_TAG_LEN);
    tag
}

pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
