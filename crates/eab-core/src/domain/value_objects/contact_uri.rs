//! Contact URI value object.

use crate::EabError;
use serde::{Deserialize, Serialize};
use std::fmt;

const URI_SCHEMES: [&str; 3] = ["sips:", "sip:", "tel:"];

/// External identifier of a contact: `sip:`/`tel:` URI or bare
/// `number@domain`.
///
/// The original text is preserved exactly so that query results can echo it
/// back; [`ContactUri::number`] gives the normalized dialable part used for
/// contact resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactUri(String);

impl ContactUri {
    /// Parses a contact URI, rejecting blank input and embedded whitespace.
    pub fn parse(uri: impl Into<String>) -> Result<Self, EabError> {
        let uri = uri.into();
        let trimmed = uri.trim();

        if trimmed.is_empty() {
            return Err(EabError::InvalidUri("empty contact URI".to_string()));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EabError::InvalidUri(format!("whitespace in '{}'", trimmed)));
        }

        let uri = Self(trimmed.to_string());
        if uri.number().is_empty() {
            return Err(EabError::InvalidUri(format!("no user part in '{}'", trimmed)));
        }
        Ok(uri)
    }

    /// Creates a URI without validation (for trusted sources such as rows
    /// already accepted by the store).
    #[must_use]
    pub fn new_unchecked(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Returns the URI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the scheme (`sip`, `sips`, `tel`) if present.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        let lower = self.0.to_ascii_lowercase();
        URI_SCHEMES
            .iter()
            .find(|scheme| lower.starts_with(*scheme))
            .map(|scheme| &self.0[..scheme.len() - 1])
    }

    /// Returns the dialable number: scheme, URI parameters, host part and
    /// visual separators stripped.
    ///
    /// `sip:+1 (666) 123-4567@ims.example;user=phone` → `+16661234567`.
    #[must_use]
    pub fn number(&self) -> String {
        let without_scheme = match self.scheme() {
            Some(scheme) => &self.0[scheme.len() + 1..],
            None => self.0.as_str(),
        };
        let user_part = without_scheme
            .split(['@', ';', '?'])
            .next()
            .unwrap_or_default();

        user_part
            .chars()
            .filter(|c| !matches!(c, '-' | '.' | '(' | ')' | ' '))
            .collect()
    }
}

impl fmt::Display for ContactUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ContactUri {
    type Error = EabError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for ContactUri {
    type Error = EabError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ContactUri> for String {
    fn from(uri: ContactUri) -> Self {
        uri.0
    }
}

impl AsRef<str> for ContactUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_number_at_domain() {
        let uri = ContactUri::parse("16661234567@android.test").unwrap();
        assert_eq!(uri.as_str(), "16661234567@android.test");
        assert_eq!(uri.scheme(), None);
        assert_eq!(uri.number(), "16661234567");
    }

    #[test]
    fn test_tel_uri_with_parameters() {
        let uri = ContactUri::parse("tel:+1-666-123-4567;phone-context=ims.test").unwrap();
        assert_eq!(uri.scheme(), Some("tel"));
        assert_eq!(uri.number(), "+16661234567");
    }

    #[test]
    fn test_sip_uri_with_user_phone() {
        let uri = ContactUri::parse("SIP:+16661234567@ims.example;user=phone").unwrap();
        assert_eq!(uri.scheme(), Some("SIP"));
        assert_eq!(uri.number(), "+16661234567");
    }

    #[test]
    fn test_sips_is_not_mistaken_for_sip() {
        let uri = ContactUri::parse("sips:5551234@secure.example").unwrap();
        assert_eq!(uri.scheme(), Some("sips"));
        assert_eq!(uri.number(), "5551234");
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let uri = ContactUri::parse("  tel:5551234  ").unwrap();
        assert_eq!(uri.as_str(), "tel:5551234");
    }

    #[test]
    fn test_invalid_uris() {
        assert!(ContactUri::parse("").is_err());
        assert!(ContactUri::parse("   ").is_err());
        assert!(ContactUri::parse("tel:555 1234").is_err());
        assert!(ContactUri::parse("sip:@example.com").is_err());
    }

    #[test]
    fn test_serde_roundtrip_preserves_text() {
        let uri = ContactUri::parse("sip:alice@example.com").unwrap();
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, "\"sip:alice@example.com\"");
        let parsed: ContactUri = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, uri);
    }

    #[test]
    fn test_deserialization_rejects_blank() {
        assert!(serde_json::from_str::<ContactUri>("\"\"").is_err());
    }
}
