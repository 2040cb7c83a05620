use crate::shared::config::AppConfig;
use crate::shared::data::{use_repository, Repository};
use contracts::system::auth::{AuthSession, AuthUser};
use contracts::system::users::{UserAccount, UserRole};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

pub const INACTIVE_ACCOUNT: &str = "Conta desativada. Procure um administrador da cooperativa.";

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub account: Option<UserAccount>,
    /// A stored session is being refreshed at startup
    pub restoring: bool,
}

impl AuthState {
    pub fn signed_in(access_token: String, account: UserAccount) -> Self {
        Self {
            access_token: Some(access_token),
            account: Some(account),
            restoring: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.account.as_ref().is_some_and(UserAccount::is_admin)
    }

    pub fn display_name(&self) -> String {
        self.account
            .as_ref()
            .map(|a| {
                if a.full_name.trim().is_empty() {
                    a.email.clone()
                } else {
                    a.full_name.clone()
                }
            })
            .unwrap_or_default()
    }
}

/// Account row of the signed-in user. Without a row the user gets the
/// default role; a deactivated row refuses the login.
pub fn resolve_account(users: &[UserAccount], user: &AuthUser) -> Result<UserAccount, String> {
    match users.iter().find(|u| u.id == user.id) {
        Some(account) if !account.active => Err(INACTIVE_ACCOUNT.to_string()),
        Some(account) => Ok(account.clone()),
        None => {
            let email = user.email.clone().unwrap_or_default();
            Ok(UserAccount {
                id: user.id,
                full_name: email.clone(),
                email,
                role: UserRole::default(),
                active: true,
            })
        }
    }
}

/// Role lookup in `usuarios`. A failed read degrades to the default role.
pub async fn load_account(repo: &dyn Repository, user: &AuthUser) -> Result<UserAccount, String> {
    let users = match repo.fetch_users().await {
        Ok(users) => users,
        Err(e) => {
            log::warn!("role lookup failed, using default role: {}", e);
            Vec::new()
        }
    };
    resolve_account(&users, user)
}

/// Store the session tokens, then resolve the account. Tokens go first so
/// the role lookup already runs with the user's bearer.
async fn establish(repo: &dyn Repository, session: AuthSession) -> Result<AuthState, String> {
    storage::save_tokens(&session.access_token, &session.refresh_token);
    match load_account(repo, &session.user).await {
        Ok(account) => {
            log::info!("signed in as {}", account.email);
            Ok(AuthState::signed_in(session.access_token, account))
        }
        Err(message) => {
            storage::clear_tokens();
            Err(message)
        }
    }
}

#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let stored_refresh = storage::get_refresh_token();
    let (auth_state, set_auth_state) = signal(AuthState {
        restoring: stored_refresh.is_some(),
        ..Default::default()
    });

    if let Some(refresh_token) = stored_refresh {
        let config = expect_context::<AppConfig>();
        let repo = use_repository();
        spawn_local(async move {
            let restored = match api::refresh_session(&config, refresh_token).await {
                Ok(session) => establish(repo.as_ref(), session).await,
                Err(e) => Err(e.to_string()),
            };
            match restored {
                Ok(state) => set_auth_state.set(state),
                Err(message) => {
                    log::info!("stored session not restored: {}", message);
                    storage::clear_tokens();
                    set_auth_state.set(AuthState::default());
                }
            }
        });
    }

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Password login followed by the role lookup
pub async fn do_login(
    config: &AppConfig,
    repo: &dyn Repository,
    email: String,
    password: String,
) -> Result<AuthState, String> {
    let session = api::sign_in(config, email, password)
        .await
        .map_err(|e| e.to_string())?;
    establish(repo, session).await
}

pub async fn do_logout(config: &AppConfig, set_auth_state: WriteSignal<AuthState>) {
    if let Some(token) = storage::get_access_token() {
        api::sign_out(config, &token).await;
    }
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::InMemoryRepository;
    use crate::shared::data::DataError;
    use futures::executor::block_on;
    use uuid::Uuid;

    fn auth_user(n: u128) -> AuthUser {
        AuthUser {
            id: Uuid::from_u128(n),
            email: Some("ana@coop.org".into()),
        }
    }

    fn account(n: u128, role: UserRole, active: bool) -> UserAccount {
        UserAccount {
            id: Uuid::from_u128(n),
            email: "ana@coop.org".into(),
            full_name: "Ana Souza".into(),
            role,
            active,
        }
    }

    #[test]
    fn test_resolve_existing_account() {
        let users = vec![account(2, UserRole::Usuario, true), account(1, UserRole::Admin, true)];
        let resolved = resolve_account(&users, &auth_user(1)).unwrap();
        assert_eq!(resolved.role, UserRole::Admin);
        assert!(AuthState::signed_in("t".into(), resolved).is_admin());
    }

    #[test]
    fn test_missing_account_gets_default_role() {
        let resolved = resolve_account(&[], &auth_user(9)).unwrap();
        assert_eq!(resolved.role, UserRole::Usuario);
        assert_eq!(resolved.email, "ana@coop.org");
        assert!(!AuthState::signed_in("t".into(), resolved).is_admin());
    }

    #[test]
    fn test_inactive_account_rejected() {
        let users = vec![account(1, UserRole::Admin, false)];
        assert_eq!(
            resolve_account(&users, &auth_user(1)),
            Err(INACTIVE_ACCOUNT.to_string())
        );
    }

    #[test]
    fn test_load_account_degrades_on_read_error() {
        let repo = InMemoryRepository::new().failing(DataError::Network("offline".into()));
        let resolved = block_on(load_account(&repo, &auth_user(1))).unwrap();
        assert_eq!(resolved.role, UserRole::Usuario);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut acc = account(1, UserRole::Gestor, true);
        acc.full_name = " ".into();
        assert_eq!(AuthState::signed_in("t".into(), acc).display_name(), "ana@coop.org");
        assert_eq!(AuthState::default().display_name(), "");
    }
}
