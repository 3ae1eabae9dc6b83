/// XOR of every byte between the leading `$` and the `*` delimiter (or end of input).
///
/// Returns `None` when the sentence does not start with `$`.
pub fn sentence_checksum(raw: &str) -> Option<u8> {
    let body = raw.trim_end_matches(['\r', '\n']).strip_prefix('$')?;
    let body = body.split('*').next().unwrap_or("");
    Some(body.bytes().fold(0u8, |acc, byte| acc ^ byte))
}

/// Compares the trailing `*hh` checksum with the computed one.
///
/// `None` means the sentence carries no checksum to compare against.
pub fn checksum_matches(raw: &str) -> Option<bool> {
    let trimmed = raw.trim_end_matches(['\r', '\n']);
    let (_, declared) = trimmed.rsplit_once('*')?;
    let declared = u8::from_str_radix(declared.trim(), 16).ok()?;
    Some(sentence_checksum(trimmed)? == declared)
}
