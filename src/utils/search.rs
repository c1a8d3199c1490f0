//! 有界子串查找
//!
//! 所有查找都限定在传入切片之内，越过缓冲区边界的起点视为空窗口。

/// 在haystack中查找needle的首次出现位置
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if haystack.len() < needle.len() {
        return None;
    }
    let first = needle[0];
    let last_start = haystack.len() - needle.len();

    (0..=last_start).find(|&i| haystack[i] == first && &haystack[i..i + needle.len()] == needle)
}

/// haystack中是否包含needle
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

/// 从start开始的窗口内是否包含needle，start越界时返回false
pub fn contains_from(data: &[u8], start: usize, needle: &[u8]) -> bool {
    data.get(start..)
        .map(|window| contains(window, needle))
        .unwrap_or(false)
}
