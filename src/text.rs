use encoding_rs::GBK;

/// Replacement for an area that only carries the publisher placeholder.
pub const UNKNOWN_AREA: &str = "未知";

/// Area texts meaning "no area recorded".
pub const SENTINEL_AREAS: [&str; 2] = ["CZ88.NET", " CZ88.NET"];

/// Decode legacy GBK bytes into a `String`.
///
/// Malformed sequences are replaced with U+FFFD; the lookup never fails on them.
///
/// 将 GBK 字节解码为字符串，非法序列以替换字符代替。
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, had_errors) = GBK.decode_without_bom_handling(bytes);
    if had_errors {
        log::debug!("lossy GBK decode of {} bytes: {:02x?}", bytes.len(), bytes);
    }
    text.into_owned()
}

/// Decode an area field, mapping the placeholder text to [`UNKNOWN_AREA`].
///
/// 解码地区字段，占位文本映射为 [`UNKNOWN_AREA`]。
pub fn decode_area(bytes: &[u8]) -> String {
    let area = decode_text(bytes);
    if SENTINEL_AREAS.contains(&area.as_str()) {
        UNKNOWN_AREA.to_string()
    } else {
        area
    }
}
