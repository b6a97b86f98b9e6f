//! Permission resolution over the live role/permission relation.

use std::sync::Arc;

use tracing::debug;

use handsoft_core::result::AppResult;
use handsoft_database::stores::RbacStore;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// Answers authorization questions for a set of role names.
///
/// Every call queries the store; results are never cached. Store failures
/// propagate as errors and are never turned into a deny.
#[derive(Clone)]
pub struct RbacResolver {
    store: Arc<dyn RbacStore>,
}

impl std::fmt::Debug for RbacResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacResolver").finish_non_exhaustive()
    }
}

impl RbacResolver {
    /// Creates a resolver over the given store.
    pub fn new(store: Arc<dyn RbacStore>) -> Self {
        Self { store }
    }

    /// True iff any of the roles carries the super-admin flag.
    pub async fn is_super_admin(&self, roles: &[String]) -> AppResult<bool> {
        self.store.any_super_admin(roles).await
    }

    /// True iff any of the roles is granted exactly `code`.
    pub async fn has_permission(&self, roles: &[String], code: &str) -> AppResult<bool> {
        self.store.any_grants(roles, code).await
    }

    /// Decide whether the roles satisfy `required`.
    ///
    /// Checked in order, stopping at the first match: super-admin flag,
    /// exact grant, then the `module:*` grant when `required` has the
    /// `module:action` shape.
    pub async fn authorize(&self, roles: &[String], required: &str) -> AppResult<Decision> {
        if self.is_super_admin(roles).await? {
            debug!(permission = required, "Allowed by super-admin role");
            return Ok(Decision::Allow);
        }

        if self.has_permission(roles, required).await? {
            return Ok(Decision::Allow);
        }

        if let Some(wildcard) = module_wildcard(required) {
            if self.has_permission(roles, &wildcard).await? {
                debug!(permission = required, wildcard = %wildcard, "Allowed by module wildcard");
                return Ok(Decision::Allow);
            }
        }

        Ok(Decision::Deny)
    }

    /// Gate for administration routes: the exact role name, or any role
    /// flagged super-admin.
    pub async fn authorize_admin(
        &self,
        roles: &[String],
        super_admin_role: &str,
    ) -> AppResult<Decision> {
        if Self::require_role(roles, super_admin_role).is_allowed() {
            return Ok(Decision::Allow);
        }
        self.is_super_admin(roles).await.map(Decision::from)
    }

    /// Exact role-name membership. No super-admin bypass, no wildcards.
    pub fn require_role(roles: &[String], name: &str) -> Decision {
        roles.iter().any(|r| r == name).into()
    }
}

/// The `module:*` code covering `code`, defined only when `code` contains
/// exactly one `:` with a non-empty module part.
pub fn module_wildcard(code: &str) -> Option<String> {
    let (module, action) = code.split_once(':')?;
    if module.is_empty() || action.contains(':') {
        return None;
    }
    Some(format!("{module}:*"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsoft_database::memory::MemoryStore;

    fn names(roles: &[&str]) -> Vec<String> {
        roles.iter().map(|r| r.to_string()).collect()
    }

    async fn resolver() -> (Arc<MemoryStore>, RbacResolver) {
        let store = Arc::new(MemoryStore::new());
        store.add_role("root", true).await;
        store.grant("warehouse_manager", "warehouse:*").await;
        store.grant("exporter", "dashboard:export").await;
        store.grant("auditor", "other:*").await;
        store.grant("plain", "reports").await;
        let resolver = RbacResolver::new(store.clone());
        (store, resolver)
    }

    #[test]
    fn test_module_wildcard() {
        assert_eq!(module_wildcard("warehouse:create").as_deref(), Some("warehouse:*"));
        assert_eq!(module_wildcard("warehouse:*").as_deref(), Some("warehouse:*"));
        assert_eq!(module_wildcard("reports"), None);
        assert_eq!(module_wildcard(":create"), None);
        assert_eq!(module_wildcard("a:b:c"), None);
    }

    #[tokio::test]
    async fn test_super_admin_allows_any_code() {
        let (_, resolver) = resolver().await;
        for code in ["warehouse:delete", "anything", "x:y:z"] {
            let decision = resolver.authorize(&names(&["root"]), code).await.unwrap();
            assert_eq!(decision, Decision::Allow, "{code}");
        }
    }

    #[tokio::test]
    async fn test_exact_and_wildcard_grants() {
        let (_, resolver) = resolver().await;

        let allow = resolver
            .authorize(&names(&["warehouse_manager"]), "warehouse:delete")
            .await
            .unwrap();
        assert_eq!(allow, Decision::Allow);

        let exact = resolver
            .authorize(&names(&["exporter"]), "dashboard:export")
            .await
            .unwrap();
        assert_eq!(exact, Decision::Allow);

        let other_module = resolver
            .authorize(&names(&["auditor"]), "dashboard:export")
            .await
            .unwrap();
        assert_eq!(other_module, Decision::Deny);

        let nothing = resolver
            .authorize(&names(&["user"]), "dashboard:export")
            .await
            .unwrap();
        assert_eq!(nothing, Decision::Deny);
    }

    #[tokio::test]
    async fn test_code_without_separator_is_exact_only() {
        let (store, resolver) = resolver().await;
        store.grant("weird", "reports:*").await;

        assert!(resolver.authorize(&names(&["plain"]), "reports").await.unwrap().is_allowed());
        assert_eq!(
            resolver.authorize(&names(&["weird"]), "reports").await.unwrap(),
            Decision::Deny
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_not_a_deny() {
        let (store, resolver) = resolver().await;
        store.set_failing(true);

        let err = resolver
            .authorize(&names(&["warehouse_manager"]), "warehouse:read")
            .await
            .unwrap_err();
        assert!(err.kind.is_system());
    }

    #[tokio::test]
    async fn test_admin_gate() {
        let (_, resolver) = resolver().await;

        let by_name = resolver
            .authorize_admin(&names(&["super_admin"]), "super_admin")
            .await
            .unwrap();
        assert_eq!(by_name, Decision::Allow);

        let by_flag = resolver
            .authorize_admin(&names(&["root"]), "super_admin")
            .await
            .unwrap();
        assert_eq!(by_flag, Decision::Allow);

        let denied = resolver
            .authorize_admin(&names(&["user", "warehouse_manager"]), "super_admin")
            .await
            .unwrap();
        assert_eq!(denied, Decision::Deny);
    }

    #[test]
    fn test_require_role_is_exact() {
        assert!(RbacResolver::require_role(&names(&["editor"]), "editor").is_allowed());
        assert!(!RbacResolver::require_role(&names(&["Editor"]), "editor").is_allowed());
        assert!(!RbacResolver::require_role(&[], "editor").is_allowed());
    }
}
