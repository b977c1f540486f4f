//! CRC32-derived constructor IDs for definitions written without `#id`.

/// Telegram derives a missing ID as the CRC32 of the whole definition
/// (including `= Type`) after normalisation: whitespace collapsed,
/// `flags.N?true` parameters dropped, `bytes` spelled `string`, generic
/// braces removed and `Vector<T>` written `Vector T`.
pub(crate) fn tl_id(definition: &str) -> u32 {
    let tokens = definition
        .trim()
        .trim_end_matches(';')
        .split_whitespace()
        .filter(|token| !is_flag_only_param(token))
        .map(|token| {
            if let Some(head) = token.strip_suffix(":bytes") {
                format!("{head}:string")
            } else if let Some(head) = token.strip_suffix("?bytes") {
                format!("{head}?string")
            } else {
                token.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let normalised = tokens
        .replace('<', " ")
        .replace(['>', '{', '}'], "");
    crc32fast::hash(normalised.as_bytes())
}

/// `name:flags.N?true`, which never reaches the wire.
fn is_flag_only_param(token: &str) -> bool {
    token
        .split_once(':')
        .is_some_and(|(_, ty)| ty.contains('.') && ty.ends_with("?true"))
}
