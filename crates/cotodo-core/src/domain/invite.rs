//! Invite Links
//!
//! An invitation travels inside the URL fragment as
//! `#/invite/<list-id>/<secret>`. The secret is opaque; the engine maps it to
//! a group and a role.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{ListId, RecordId};

const INVITE_PREFIX: &str = "/invite/";

/// Opaque capability secret minted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteSecret(String);

impl InviteSecret {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded invitation: which list it opens and the secret that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteLink {
    pub target: ListId,
    pub secret: InviteSecret,
}

impl InviteLink {
    pub fn new(target: ListId, secret: InviteSecret) -> Self {
        Self { target, secret }
    }

    /// Fragment form, without the leading `#`.
    pub fn to_fragment(&self) -> String {
        format!("{INVITE_PREFIX}{}/{}", self.target, self.secret)
    }

    /// Full shareable URL on top of the page's base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}#{}", base_url.trim_end_matches('#'), self.to_fragment())
    }

    /// Parse a fragment (with or without the leading `#`).
    ///
    /// Returns `None` for anything that is not a well-formed invite, which
    /// callers treat as a plain list reference.
    pub fn parse_fragment(fragment: &str) -> Option<Self> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let rest = fragment.strip_prefix(INVITE_PREFIX)?;
        let (target, secret) = rest.split_once('/')?;
        if target.is_empty() || secret.is_empty() || secret.contains('/') {
            return None;
        }
        Some(Self {
            target: ListId::new(RecordId::new(target)),
            secret: InviteSecret::new(secret),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> InviteLink {
        InviteLink::new(ListId::new(RecordId::from("co_zlist")), InviteSecret::new("inviteSecret_zabc"))
    }

    #[test]
    fn test_to_url() {
        assert_eq!(
            link().to_url("https://todo.example/app"),
            "https://todo.example/app#/invite/co_zlist/inviteSecret_zabc"
        );
    }

    #[test]
    fn test_parse_fragment() {
        assert_eq!(InviteLink::parse_fragment("#/invite/co_zlist/inviteSecret_zabc"), Some(link()));
        assert_eq!(InviteLink::parse_fragment("/invite/co_zlist/inviteSecret_zabc"), Some(link()));
    }

    #[test]
    fn test_plain_reference_is_not_an_invite() {
        assert_eq!(InviteLink::parse_fragment("co_zlist"), None);
        assert_eq!(InviteLink::parse_fragment(""), None);
        assert_eq!(InviteLink::parse_fragment("/invite/co_zlist"), None);
        assert_eq!(InviteLink::parse_fragment("/invite//secret"), None);
        assert_eq!(InviteLink::parse_fragment("/invite/co_zlist/a/b"), None);
    }
}
