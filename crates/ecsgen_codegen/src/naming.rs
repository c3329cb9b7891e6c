//! Identifier helpers shared by the synthesizers.

/// Strip the first matching suffix, unless that would leave nothing.
pub fn strip_suffix<'a>(name: &'a str, suffixes: &[String]) -> &'a str {
    suffixes
        .iter()
        .filter(|s| !s.is_empty())
        .find_map(|s| name.strip_suffix(s.as_str()).filter(|rest| !rest.is_empty()))
        .unwrap_or(name)
}

pub fn first_char_lower(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn first_char_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `player_id` / `playerId` -> `PlayerId`.
pub fn upper_camel(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(first_char_upper)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_suffix() {
        let cmd = suffixes(&["Cmd", "Command"]);
        assert_eq!(strip_suffix("SpawnCmd", &cmd), "Spawn");
        assert_eq!(strip_suffix("SelectSkinCommand", &cmd), "SelectSkin");
        // Only a trailing match counts.
        assert_eq!(strip_suffix("CmdQueue", &cmd), "CmdQueue");
        // Never strip down to an empty name.
        assert_eq!(strip_suffix("Command", &cmd), "Command");
        assert_eq!(strip_suffix("HealthComponent", &suffixes(&["Component"])), "Health");
        assert_eq!(strip_suffix("Health", &[]), "Health");
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(first_char_lower("MaxSpeed"), "maxSpeed");
        assert_eq!(first_char_lower(""), "");
        assert_eq!(upper_camel("player_id"), "PlayerId");
        assert_eq!(upper_camel("playerId"), "PlayerId");
        assert_eq!(upper_camel("Id"), "Id");
    }
}
