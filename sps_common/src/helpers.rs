/// Reads an on/off switch out of an environment value. Accepted spellings are `1`/`0`,
/// `true`/`false`, `yes`/`no` and `on`/`off` in any case; anything else, including an unset
/// variable, yields `default`.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
