/// Interpret an environment-variable style boolean flag. Unset or unrecognisable values fall back to
/// `default` rather than failing, so a typo'd flag never prevents startup.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        })
        .unwrap_or(default)
}
