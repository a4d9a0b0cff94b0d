//! Static lookup tables: department abbreviations, weekday codes, campus codes.

use chrono::Weekday;

/// Department name/alias → catalog subject code.
const DEPARTMENT_ABBREVIATIONS: &[(&str, &str)] = &[
    // Computer Science
    ("CS", "198"),
    ("COMPSCI", "198"),
    // Data science is listed under CS
    ("DATA", "198"),
    ("MATH", "640"),
    ("PHYS", "750"),
    ("CHEM", "160"),
    ("BIO", "120"),
    ("BIOL", "120"),
    ("ENGL", "350"),
    ("HIST", "510"),
    ("PSYCH", "830"),
    ("PSY", "830"),
    ("ECON", "220"),
    ("BUS", "010"),
    ("ENG", "440"),
    ("INFO", "547"),
    ("IT", "547"),
    ("STAT", "960"),
];

const CAMPUS_NAMES: &[(&str, &str)] = &[
    ("BUS", "Busch"),
    ("CAC", "College Avenue"),
    ("D/C", "Douglass/Cook"),
    ("LIV", "Livingston"),
    ("ONL", "Online"),
    ("NB", "New Brunswick"),
    ("NK", "Newark"),
    ("CM", "Camden"),
];

/// Resolve a department abbreviation (case-insensitive) to its subject code.
pub fn resolve_subject(abbrev: &str) -> Option<&'static str> {
    let key = abbrev.trim();
    DEPARTMENT_ABBREVIATIONS
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, code)| *code)
}

/// Weekday from a provider day code ("M", "TH", "H", "SU") or a day name.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    let code = code.trim().to_uppercase();
    match code.as_str() {
        "M" => Some(Weekday::Mon),
        "T" => Some(Weekday::Tue),
        "W" => Some(Weekday::Wed),
        // Some SOC entries use H for Thursday
        "TH" | "H" => Some(Weekday::Thu),
        "F" => Some(Weekday::Fri),
        "S" => Some(Weekday::Sat),
        "SU" | "U" => Some(Weekday::Sun),
        "" => None,
        other => other.parse::<Weekday>().ok(),
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Campus code → display name; unknown codes pass through.
pub fn campus_name(code: &str) -> String {
    CAMPUS_NAMES
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_subject() {
        assert_eq!(resolve_subject("CS"), Some("198"));
        assert_eq!(resolve_subject("math"), Some("640"));
        assert_eq!(resolve_subject("BUS"), Some("010"));
        assert_eq!(resolve_subject("ART"), None);
    }

    #[test]
    fn test_weekday_codes() {
        assert_eq!(weekday_from_code("M"), Some(Weekday::Mon));
        assert_eq!(weekday_from_code("TH"), Some(Weekday::Thu));
        assert_eq!(weekday_from_code("H"), Some(Weekday::Thu));
        assert_eq!(weekday_from_code("Wednesday"), Some(Weekday::Wed));
        assert_eq!(weekday_from_code(""), None);
        assert_eq!(weekday_from_code("X"), None);
    }

    #[test]
    fn test_campus_name_passthrough() {
        assert_eq!(campus_name("LIV"), "Livingston");
        assert_eq!(campus_name("D/C"), "Douglass/Cook");
        assert_eq!(campus_name("ZZ"), "ZZ");
    }
}
