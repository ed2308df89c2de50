//! Form-field normalization.
//!
//! Browsers submit every named input, so an untouched text box arrives as
//! `field=`. Handlers want "absent" for that case, the same as a field that
//! was never sent.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, mapping the empty string to `None`.
///
/// Use with `#[serde(default, deserialize_with = "empty_as_none")]` so that
/// a missing key also yields `None`.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Lookup {
        #[serde(default, deserialize_with = "empty_as_none")]
        id: Option<String>,
    }

    #[test]
    fn missing_field_is_none() {
        let lookup: Lookup = serde_urlencoded::from_str("").unwrap();
        assert_eq!(lookup.id, None);
    }

    #[test]
    fn blank_field_is_none() {
        let lookup: Lookup = serde_urlencoded::from_str("id=").unwrap();
        assert_eq!(lookup.id, None);
    }

    #[test]
    fn filled_field_is_kept_verbatim() {
        let lookup: Lookup = serde_urlencoded::from_str("id=P-94458432VR012762KRWBZEUA").unwrap();
        assert_eq!(lookup.id.as_deref(), Some("P-94458432VR012762KRWBZEUA"));
    }

    #[test]
    fn whitespace_is_not_blank() {
        let lookup: Lookup = serde_urlencoded::from_str("id=+").unwrap();
        assert_eq!(lookup.id.as_deref(), Some(" "));
    }
}
