//! Access & Invite Manager
//!
//! Role lookup for the active list and the invite flow: mint a link scoped
//! to a role, render it as a QR image, put it on the clipboard.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::{InviteLink, ListId, Role};
use crate::env::Toast;
use crate::error::{ActionError, ActionResult};
use crate::session::Session;

pub const INVITE_COPIED: &str = "Copied invite link to clipboard!";

/// Clears the in-flight flag on every exit path.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct InviteManager {
    session: Session,
    list: ListId,
    links: RefCell<HashMap<Role, String>>,
    in_flight: Cell<bool>,
}

impl InviteManager {
    pub fn new(session: Session, list: ListId) -> Self {
        Self {
            session,
            list,
            links: RefCell::new(HashMap::new()),
            in_flight: Cell::new(false),
        }
    }

    pub fn list(&self) -> &ListId {
        &self.list
    }

    /// The caller's role in the list's group.
    pub fn role(&self) -> Option<Role> {
        let engine = self.session.engine();
        let group = engine.group_of(self.list.record()).ok()?;
        engine.role_in(&group)
    }

    pub fn can_invite(&self) -> bool {
        self.role().is_some_and(|role| role.can_invite())
    }

    /// Mint a link granting `role`, or return the one minted earlier.
    pub fn mint_invite(&self, role: Role) -> ActionResult<String> {
        if let Some(link) = self.links.borrow().get(&role) {
            return Ok(link.clone());
        }
        if !self.can_invite() {
            return Err(ActionError::Forbidden { required: Role::Admin });
        }

        let engine = self.session.engine();
        let group = engine.group_of(self.list.record())?;
        let secret = engine.mint_invite(&group, role)?;
        let link = InviteLink::new(self.list.clone(), secret)
            .to_url(&self.session.env().location.base_url());

        info!(list = %self.list, %role, "invite minted");
        self.links.borrow_mut().insert(role, link.clone());
        Ok(link)
    }

    /// Render `link` as a QR image, copy it, and tell the user.
    pub async fn present_invite(&self, link: &str) -> ActionResult<()> {
        let env = self.session.env().clone();

        let image = match env.code_renderer.render(link).await {
            Ok(image) => image,
            Err(reason) => return Err(self.capability_failed("QR code", reason)),
        };
        if let Err(reason) = env.clipboard.write_text(link).await {
            return Err(self.capability_failed("clipboard", reason));
        }

        self.session.notify(Toast::info(INVITE_COPIED).with_image(image));
        Ok(())
    }

    /// Mint-or-reuse then present. Refuses to run twice concurrently.
    pub async fn invite(&self, role: Role) -> ActionResult<String> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(ActionError::Busy)?;
        let link = self.mint_invite(role)?;
        self.present_invite(&link).await?;
        Ok(link)
    }

    fn capability_failed(&self, capability: &'static str, reason: String) -> ActionError {
        warn!(list = %self.list, capability, %reason, "invite presentation failed");
        self.session
            .notify(Toast::error("Couldn't share invite", format!("{capability}: {reason}")));
        ActionError::Capability { capability, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InviteSecret, RECORD_ID_PREFIX};
    use crate::engine::AccessControl;
    use crate::env::ToastKind;
    use crate::test_utils::{TestBed, BASE_URL};
    use crate::view_model::ListViewModel;

    fn manager(bed: &TestBed) -> InviteManager {
        let list = ListViewModel::create_list(&bed.session, "Groceries").unwrap();
        InviteManager::new(bed.session.clone(), list)
    }

    fn parse(url: &str) -> InviteLink {
        let fragment = url.strip_prefix(BASE_URL).expect("link should start with base url");
        InviteLink::parse_fragment(fragment).expect("link should carry an invite fragment")
    }

    #[test]
    fn test_creator_can_invite() {
        let bed = TestBed::new("Alice");
        let manager = manager(&bed);
        assert_eq!(manager.role(), Some(Role::Admin));
        assert!(manager.can_invite());
    }

    #[test]
    fn test_mint_is_cached_per_role() {
        let bed = TestBed::new("Alice");
        let manager = manager(&bed);

        let first = manager.mint_invite(Role::Writer).unwrap();
        let second = manager.mint_invite(Role::Writer).unwrap();
        let reader = manager.mint_invite(Role::Reader).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, reader);
        let link = parse(&first);
        assert_eq!(&link.target, manager.list());
        assert!(link.target.as_str().starts_with(RECORD_ID_PREFIX));
    }

    #[tokio::test]
    async fn test_invite_round_trip_grants_minted_role() {
        let alice = TestBed::new("Alice");
        let manager = manager(&alice);
        let bob = alice.peer("Bob");

        for role in [Role::Reader, Role::Writer] {
            let carol = alice.peer("Carol");
            let link = parse(&manager.mint_invite(role).unwrap());
            let granted = carol
                .node
                .accept_invite(link.target.record(), &link.secret)
                .await
                .unwrap();
            assert_eq!(granted, role);
        }

        let bob_manager = InviteManager::new(bob.session.clone(), manager.list().clone());
        assert_eq!(bob_manager.role(), None);
        assert!(!bob_manager.can_invite());
    }

    #[tokio::test]
    async fn test_non_admin_cannot_mint() {
        let alice = TestBed::new("Alice");
        let manager = manager(&alice);
        let bob = alice.peer("Bob");
        let link = parse(&manager.mint_invite(Role::Writer).unwrap());
        bob.node.accept_invite(link.target.record(), &link.secret).await.unwrap();

        let bob_manager = InviteManager::new(bob.session.clone(), manager.list().clone());
        assert_eq!(bob_manager.role(), Some(Role::Writer));
        assert_eq!(
            bob_manager.mint_invite(Role::Reader),
            Err(ActionError::Forbidden { required: Role::Admin })
        );
        assert_eq!(
            bob_manager.invite(Role::Reader).await,
            Err(ActionError::Forbidden { required: Role::Admin })
        );
    }

    #[tokio::test]
    async fn test_invite_copies_and_shows_code() {
        let bed = TestBed::new("Alice");
        let manager = manager(&bed);

        let link = manager.invite(Role::Writer).await.unwrap();

        assert_eq!(bed.clipboard.contents.borrow().as_deref(), Some(link.as_str()));
        let toasts = bed.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Info);
        assert_eq!(toasts[0].title, INVITE_COPIED);
        assert_eq!(toasts[0].image, Some(format!("data:image/png;base64,{}", link.len())));
    }

    #[tokio::test]
    async fn test_clipboard_failure_keeps_cached_link() {
        let bed = TestBed::new("Alice");
        let manager = manager(&bed);
        bed.clipboard.fail.set(true);

        let result = manager.invite(Role::Writer).await;
        assert!(matches!(result, Err(ActionError::Capability { capability: "clipboard", .. })));
        assert_eq!(bed.toasts()[0].kind, ToastKind::Error);

        bed.clipboard.fail.set(false);
        let cached = manager.mint_invite(Role::Writer).unwrap();
        assert_eq!(manager.invite(Role::Writer).await.unwrap(), cached);
    }

    #[tokio::test]
    async fn test_render_failure_skips_clipboard() {
        let bed = TestBed::new("Alice");
        let manager = manager(&bed);
        bed.renderer.fail.set(true);

        let result = manager.invite(Role::Writer).await;
        assert!(matches!(result, Err(ActionError::Capability { capability: "QR code", .. })));
        assert!(bed.clipboard.contents.borrow().is_none());
    }

    #[test]
    fn test_concurrent_invite_is_busy() {
        let bed = TestBed::new("Alice");
        let manager = manager(&bed);

        let guard = InFlight::acquire(&manager.in_flight).unwrap();
        let result = futures::executor::block_on(manager.invite(Role::Writer));
        assert_eq!(result, Err(ActionError::Busy));
        assert_eq!(bed.renderer.calls.get(), 0);
        drop(guard);

        assert!(futures::executor::block_on(manager.invite(Role::Writer)).is_ok());
    }

    #[test]
    fn test_forged_secret_is_rejected() {
        let alice = TestBed::new("Alice");
        let manager = manager(&alice);
        let bob = alice.peer("Bob");
        let forged = InviteSecret::new("inviteSecret_zforged".to_string());

        let result = futures::executor::block_on(
            bob.node.accept_invite(manager.list().record(), &forged),
        );
        assert!(result.is_err());
    }
}
