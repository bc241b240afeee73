//! Attribution Resolver
//!
//! Turns "who last wrote this field" into a name badge with a color pair
//! seeded by the editor's identity.

use palette::{FromColor, Hsl, Srgb};

use crate::config::BadgeConfig;
use crate::domain::{AccountId, RecordId};
use crate::session::Session;

/// Identity-seeded colors; `light` is the bright variant, `dark` the deep one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeColors {
    pub light: String,
    pub dark: String,
}

impl BadgeColors {
    pub fn for_identity(identity: &str, config: &BadgeConfig) -> Self {
        Self {
            light: identity_color(identity, config.saturation, config.light_lightness),
            dark: identity_color(identity, config.saturation, config.dark_lightness),
        }
    }

    /// Dark text on the bright variant for light schemes, the reverse for dark.
    pub fn style(&self, prefers_dark: bool) -> BadgeStyle {
        let (foreground, background) = if prefers_dark {
            (&self.light, &self.dark)
        } else {
            (&self.dark, &self.light)
        };
        BadgeStyle {
            foreground: foreground.clone(),
            background: background.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeStyle {
    pub foreground: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub account: AccountId,
    pub name: String,
    pub colors: BadgeColors,
    pub style: BadgeStyle,
}

/// 32-bit string hash over UTF-16 code units (`h * 31 + c`, wrapping).
fn hash_identity(identity: &str) -> u32 {
    identity
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Map `hash` into `[low, high)`, or onto `low` for an empty range.
fn bound(hash: u32, low: u32, high: u32) -> u32 {
    match high.abs_diff(low) {
        0 => low,
        span => hash % span + low,
    }
}

/// `#rrggbb` for the identity's hue and saturation at a fixed lightness.
pub fn identity_color(identity: &str, saturation: (u8, u8), lightness: u8) -> String {
    let hash = hash_identity(identity);
    let hue = bound(hash, 0, 360) as f32;
    let saturation = bound(hash, u32::from(saturation.0), u32::from(saturation.1)) as f32 / 100.0;
    let lightness = f32::from(lightness.min(100)) / 100.0;

    let hsl: Hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb<u8> = Srgb::<f32>::from_color(hsl).into_format();
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Badge for a known editor, `None` without a non-empty profile name.
pub fn badge_for_account(session: &Session, account: &AccountId) -> Option<Badge> {
    let profile = session.engine().profile(account)?;
    if profile.name.trim().is_empty() {
        return None;
    }
    let colors = BadgeColors::for_identity(account.as_str(), &session.config().badge);
    let style = colors.style(session.env().color_scheme.prefers_dark());
    Some(Badge {
        account: account.clone(),
        name: profile.name,
        colors,
        style,
    })
}

/// Badge for whoever last wrote `field` of `record`.
pub fn badge_for(session: &Session, record: &RecordId, field: &str) -> Option<Badge> {
    let editor = session.engine().last_editor(record, field)?;
    badge_for_account(session, &editor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task;
    use crate::engine::AccessControl;
    use crate::test_utils::TestBed;
    use crate::view_model::ListViewModel;

    fn is_hex(color: &str) -> bool {
        color.len() == 7 && color.starts_with('#') && color[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn test_hash_matches_string_hash() {
        assert_eq!(hash_identity(""), 0);
        assert_eq!(hash_identity("a"), 97);
        assert_eq!(hash_identity("ab"), 97 * 31 + 98);
        // Overflow wraps like a 32-bit signed integer.
        let long = "co_zsomeverylongidentitystring";
        assert_eq!(hash_identity(long), hash_identity(long));
    }

    #[test]
    fn test_bound() {
        assert_eq!(bound(97, 0, 360), 97);
        assert_eq!(bound(400, 0, 360), 40);
        assert_eq!(bound(97, 50, 55), 52);
        assert_eq!(bound(97, 80, 80), 80);
    }

    #[test]
    fn test_colors_are_deterministic() {
        let config = BadgeConfig::default();
        let first = BadgeColors::for_identity("co_zalice", &config);
        let second = BadgeColors::for_identity("co_zalice", &config);
        let other = BadgeColors::for_identity("co_zbob", &config);

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(is_hex(&first.light) && is_hex(&first.dark));
        assert_ne!(first.light, first.dark);
    }

    #[test]
    fn test_lightness_extremes() {
        assert_eq!(identity_color("anyone", (50, 55), 100), "#ffffff");
        assert_eq!(identity_color("anyone", (50, 55), 0), "#000000");
    }

    #[test]
    fn test_style_follows_scheme() {
        let colors = BadgeColors::for_identity("co_zalice", &BadgeConfig::default());
        let light = colors.style(false);
        let dark = colors.style(true);
        assert_eq!(light.background, colors.light);
        assert_eq!(light.foreground, colors.dark);
        assert_eq!(dark.background, colors.dark);
        assert_eq!(dark.foreground, colors.light);
    }

    #[test]
    fn test_badge_for_last_editor() {
        let bed = TestBed::new("Alice");
        let list = ListViewModel::create_list(&bed.session, "Groceries").unwrap();
        let vm = ListViewModel::new(bed.session.clone(), list);
        let milk = vm.create_task("Milk").unwrap();

        let badge = badge_for(&bed.session, milk.record(), task::TEXT).unwrap();
        assert_eq!(badge.name, "Alice");
        assert_eq!(badge.account, bed.node.me());
        assert_eq!(badge.style.background, badge.colors.light);

        bed.scheme.dark.set(true);
        let badge = badge_for(&bed.session, milk.record(), task::TEXT).unwrap();
        assert_eq!(badge.style.background, badge.colors.dark);

        assert!(badge_for(&bed.session, milk.record(), task::DELETED).is_none());
    }

    #[test]
    fn test_no_badge_without_name() {
        let bed = TestBed::new("Alice");
        let list = ListViewModel::create_list(&bed.session, "Groceries").unwrap();
        bed.node.set_profile_name("   ");
        assert!(badge_for(&bed.session, list.record(), crate::domain::list::TITLE).is_none());
    }
}
