use crate::domain::common::lenient::{lenient_string, null_as_default};
use crate::domain::common::AggregateRoot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Gestor,
    #[default]
    #[serde(other)]
    Usuario,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Gestor, UserRole::Usuario];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Gestor => "gestor",
            UserRole::Usuario => "usuario",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrador",
            UserRole::Gestor => "Gestor",
            UserRole::Usuario => "Usuário",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .unwrap_or_default()
    }
}

/// Application account (`usuarios`), keyed by the auth user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "nome", default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(rename = "perfil", default, deserialize_with = "null_as_default")]
    pub role: UserRole,
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl UserAccount {
    /// Admin screens need an active admin account
    pub fn is_admin(&self) -> bool {
        self.active && self.role == UserRole::Admin
    }
}

impl AggregateRoot for UserAccount {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "sys"
    }

    fn collection_name() -> &'static str {
        "usuarios"
    }

    fn element_name() -> &'static str {
        "Usuário"
    }

    fn list_name() -> &'static str {
        "Usuários"
    }

    fn tab_suffix() -> &'static str {
        "users"
    }
}

/// Role and status are the only editable fields; accounts are never deleted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserAccountPatch {
    #[serde(rename = "perfil", skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(rename = "ativo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UserAccountPatch {
    pub fn between(original: &UserAccount, role: UserRole, active: bool) -> Self {
        Self {
            role: (original.role != role).then_some(role),
            active: (original.active != active).then_some(active),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.active.is_none()
    }

    pub fn apply_to(&self, account: &mut UserAccount) {
        if let Some(role) = self.role {
            account.role = role;
        }
        if let Some(active) = self.active {
            account.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_defaults() {
        let u: UserAccount = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000002",
            "email": "gestor@coop.org",
            "perfil": "diretor"
        }))
        .unwrap();
        assert_eq!(u.role, UserRole::Usuario);
        assert!(u.active);
        assert!(!u.is_admin());
    }

    #[test]
    fn test_deactivated_admin_is_not_admin() {
        let mut u: UserAccount = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000003",
            "perfil": "admin",
            "ativo": true
        }))
        .unwrap();
        assert!(u.is_admin());
        let patch = UserAccountPatch::between(&u, UserRole::Admin, false);
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"ativo": false}));
        patch.apply_to(&mut u);
        assert!(!u.is_admin());
    }
}
