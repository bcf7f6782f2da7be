//! Credential checks and the role hierarchy.
//!
//! Passwords are stored as lowercase SHA-256 hex digests. Authentication
//! yields an explicit [`AuthContext`] that callers pass into the services;
//! there is no ambient session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::raffle::error::RaffleError;
use crate::raffle::storage::RaffleStorage;

const LOG_TARGET: &str = "auth";

/// Access levels, lowest to highest. Ordering is the permission lattice:
/// a role grants everything the roles below it grant.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Role {
    Apostador,
    Assistente,
    Administrador,
    Desenvolvedor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Apostador => "Apostador",
            Role::Assistente => "Assistente",
            Role::Administrador => "Administrador",
            Role::Desenvolvedor => "Desenvolvedor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RaffleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "apostador" => Ok(Role::Apostador),
            "assistente" => Ok(Role::Assistente),
            "administrador" => Ok(Role::Administrador),
            "desenvolvedor" => Ok(Role::Desenvolvedor),
            other => Err(RaffleError::validation(format!("unknown role: {other}"))),
        }
    }
}

/// Proof of who is calling, threaded through every privileged operation.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    /// Set when the account is tied to a bettor record.
    pub nickname: Option<String>,
}

impl AuthContext {
    pub fn require(&self, required: Role) -> Result<(), RaffleError> {
        if self.role >= required {
            Ok(())
        } else {
            Err(RaffleError::Forbidden(required.as_str()))
        }
    }
}

pub fn hash_password(raw: &str) -> String {
    Sha256::digest(raw.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Checks a username/password pair against the active user table. Unknown
/// users, inactive accounts, and wrong passwords all come back as `None`.
pub async fn authenticate(
    storage: &dyn RaffleStorage,
    username: &str,
    password: &str,
) -> Result<Option<AuthContext>, RaffleError> {
    let mut txn = storage.begin().await?;
    let result = txn.find_active_user(username).await;
    let user = match result {
        Ok(user) => {
            txn.commit().await?;
            user
        }
        Err(err) => {
            txn.rollback().await;
            return Err(err);
        }
    };

    let Some(user) = user else {
        return Ok(None);
    };
    if hash_password(password) != user.password_hash.to_lowercase() {
        warn!(target: LOG_TARGET, username, "failed login attempt");
        return Ok(None);
    }
    let role = user.perfil.parse()?;
    Ok(Some(AuthContext {
        user_id: user.id,
        username: user.username,
        role,
        nickname: user.apelido,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: 1,
            username: "tester".into(),
            role,
            nickname: None,
        }
    }

    #[test]
    fn hash_matches_known_vector() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn roles_order_from_apostador_up() {
        assert!(Role::Apostador < Role::Assistente);
        assert!(Role::Assistente < Role::Administrador);
        assert!(Role::Administrador < Role::Desenvolvedor);
    }

    #[test]
    fn higher_role_passes_lower_requirement() {
        assert!(context(Role::Desenvolvedor).require(Role::Assistente).is_ok());
        assert!(context(Role::Administrador).require(Role::Administrador).is_ok());
    }

    #[test]
    fn lower_role_is_refused() {
        let err = context(Role::Apostador).require(Role::Administrador);
        assert!(matches!(err, Err(RaffleError::Forbidden(_))));
    }

    #[test]
    fn role_parsing_is_case_insensitive() -> anyhow::Result<()> {
        assert_eq!(Role::from_str("ADMINISTRADOR")?, Role::Administrador);
        assert_eq!(Role::from_str(" assistente ")?, Role::Assistente);
        assert!(Role::from_str("gerente").is_err());
        Ok(())
    }
}
