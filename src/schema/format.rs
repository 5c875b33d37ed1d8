//! String formats understood by string rules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Hyphenated UUID, any version.
    Uuid,
    Email,
}

impl Format {
    pub fn check(self, s: &str) -> bool {
        match self {
            Format::Uuid => is_uuid(s),
            Format::Email => is_email(s),
        }
    }

    /// What the value must be, for error messages.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Format::Uuid => "a valid GUID",
            Format::Email => "a valid email",
        }
    }
}

fn is_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok()
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || local.contains(char::is_whitespace) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let label_ok = |l: &&str| {
        !l.is_empty()
            && !l.starts_with('-')
            && !l.ends_with('-')
            && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !labels.iter().all(label_ok) {
        return false;
    }

    labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}
