//! Shared row fragments and cell formatting helpers

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Reference to another entity: either a bare id or a populated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartyRef {
    Populated {
        #[serde(default, alias = "_id")]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        title: Option<String>,
    },
    Id(String),
}

impl PartyRef {
    pub fn display_name(&self) -> String {
        match self {
            PartyRef::Populated {
                name, title, id, ..
            } => name
                .clone()
                .or_else(|| title.clone())
                .or_else(|| id.clone())
                .unwrap_or_else(|| NA.to_string()),
            PartyRef::Id(id) => id.clone(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            PartyRef::Populated { email, .. } => email.as_deref(),
            PartyRef::Id(_) => None,
        }
    }
}

pub const NA: &str = "N/A";

pub fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NA.to_string(),
    }
}

pub fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NA.to_string()
    } else {
        values.join(", ")
    }
}

pub fn party_or_na(party: Option<&PartyRef>) -> String {
    party.map(PartyRef::display_name).unwrap_or_else(|| NA.to_string())
}

/// Render an amount without a trailing `.0` for whole numbers
pub fn amount(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{:.2}", v),
        None => "0".to_string(),
    }
}

/// Date part of an ISO-8601 timestamp
pub fn date_only(value: Option<&str>) -> String {
    match value {
        Some(v) if v.len() >= 10 => v[..10].to_string(),
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NA.to_string(),
    }
}

/// Case-insensitive substring test over several optional fields
pub fn any_contains(fields: &[Option<&str>], term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Truncate to a display width, marking the cut with an ellipsis
pub fn truncate(value: &str, width: usize) -> String {
    if value.width() <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut used = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}

/// Left-align into exactly `width` display columns
pub fn pad(value: &str, width: usize) -> String {
    let cut = truncate(value, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_party_ref_accepts_id_or_object() {
        let bare: PartyRef = serde_json::from_value(json!("64ab")).unwrap();
        assert_eq!(bare.display_name(), "64ab");

        let populated: PartyRef =
            serde_json::from_value(json!({"_id": "1", "name": "Asha", "email": "a@x.io"})).unwrap();
        assert_eq!(populated.display_name(), "Asha");
        assert_eq!(populated.email(), Some("a@x.io"));

        let project: PartyRef = serde_json::from_value(json!({"title": "Launch"})).unwrap();
        assert_eq!(project.display_name(), "Launch");
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(or_na(Some("  ")), "N/A");
        assert_eq!(join_or_na(&["ig".to_string(), "yt".to_string()]), "ig, yt");
        assert_eq!(amount(Some(150.0)), "150");
        assert_eq!(amount(Some(12.5)), "12.50");
        assert_eq!(date_only(Some("2024-06-01T10:00:00Z")), "2024-06-01");
    }

    #[test]
    fn test_truncate_and_pad_respect_display_width() {
        assert_eq!(truncate("influencer", 6), "influ…");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("日本語テキスト", 5).width(), 5);
    }

    #[test]
    fn test_any_contains() {
        assert!(any_contains(&[Some("Hello World"), None], "world"));
        assert!(!any_contains(&[Some("Hello")], "bye"));
        assert!(any_contains(&[None], "  "));
    }
}
