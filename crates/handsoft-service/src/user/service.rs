//! Profile lookup for the authenticated caller.

use std::sync::Arc;

use tracing::debug;

use handsoft_core::error::AppError;
use handsoft_core::result::AppResult;
use handsoft_database::stores::CredentialStore;
use handsoft_entity::user::UserProfile;

use crate::context::RequestContext;

/// Reads user profiles.
#[derive(Clone)]
pub struct UserService {
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Full profile of the caller: user, contact, phones, address, location
    /// and current role names.
    ///
    /// The role names come from the database, not from the token.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<UserProfile> {
        debug!(user_id = ctx.user_id, "Loading profile");
        self.credentials
            .find_profile(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsoft_core::error::ErrorKind;
    use handsoft_database::memory::MemoryStore;
    use handsoft_database::stores::AddressStore;
    use handsoft_entity::address::AddressKey;
    use handsoft_entity::user::NewUser;

    #[tokio::test]
    async fn test_profile_includes_location_and_roles() {
        let store = Arc::new(MemoryStore::new());
        let commune = store.add_commune("Ñuñoa").await;
        let address = store
            .insert_address(&AddressKey {
                commune_id: commune,
                street: "Irarrázaval".into(),
                street_number: "1500".into(),
                ..AddressKey::default()
            })
            .await
            .unwrap();
        let user = store
            .create_registered(&NewUser {
                email: "ana@example.com".into(),
                username: "ana".into(),
                password_hash: "hash".into(),
                commune_id: commune,
                address_id: address.id,
                full_name: "Ana".into(),
                phone: None,
                role_names: vec!["user".into()],
            })
            .await
            .unwrap();

        let service = UserService::new(store.clone());
        let profile = service
            .profile(&RequestContext::new(user.id, vec!["stale".into()]))
            .await
            .unwrap();

        assert_eq!(profile.user.id, user.id);
        assert_eq!(profile.roles, vec!["user".to_string()]);
        assert_eq!(profile.location.unwrap().commune.name, "Ñuñoa");
        assert!(profile.phones.is_empty());
    }

    #[tokio::test]
    async fn test_profile_of_deleted_user_is_not_found() {
        let service = UserService::new(Arc::new(MemoryStore::new()));
        let err = service
            .profile(&RequestContext::new(99, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
