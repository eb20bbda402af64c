/// Case- and whitespace-insensitive lookup key for addresses and region names.
pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_key;

    #[test]
    fn normalize_key_removes_invisible_characters_and_case() {
        assert_eq!(
            normalize_key("\u{feff}123  Main   St,\tApt 4"),
            "123 main st, apt 4"
        );
    }
}
