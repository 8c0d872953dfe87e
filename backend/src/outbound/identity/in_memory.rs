//! Process-local identity store with an optional JSON snapshot.
//!
//! Accounts, role memberships, Argon2 password hashes and pending reset
//! tokens live behind one lock. Reset tokens are handed out once and only
//! their SHA-256 fingerprint is kept; each account holds at most one, so
//! issuing a new token revokes the previous one.
//!
//! A store opened with [`InMemoryIdentityManager::persistent`] mirrors every
//! change to a snapshot file. Changes are applied to a copy of the state,
//! written atomically and only then swapped in, so a failed write leaves the
//! store untouched.

use std::collections::HashSet;
use std::io;
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::password::{PasswordPolicy, hash_password, verify_password};
use crate::domain::ports::{IdentityError, IdentityManager};
use crate::domain::{Role, UserAccount, UserId};
use crate::outbound::atomic_io::write_atomic;

const RESET_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    account: UserAccount,
    password_hash: Option<String>,
    roles: Vec<Role>,
    #[serde(default)]
    reset_fingerprint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct IdentityState {
    users: Vec<StoredUser>,
    roles: HashSet<Role>,
}

impl IdentityState {
    fn user(&self, id: &UserId) -> Result<&StoredUser, IdentityError> {
        self.users
            .iter()
            .find(|user| &user.account.id == id)
            .ok_or_else(|| missing_user(id))
    }

    fn user_mut(&mut self, id: &UserId) -> Result<&mut StoredUser, IdentityError> {
        self.users
            .iter_mut()
            .find(|user| &user.account.id == id)
            .ok_or_else(|| missing_user(id))
    }

    fn name_taken(&self, user_name: &str, except: &UserId) -> bool {
        self.users.iter().any(|user| {
            &user.account.id != except && user.account.user_name.eq_ignore_ascii_case(user_name)
        })
    }

    fn email_taken(&self, email: &str, except: &UserId) -> bool {
        self.users.iter().any(|user| {
            &user.account.id != except && user.account.email.eq_ignore_ascii_case(email)
        })
    }
}

fn missing_user(id: &UserId) -> IdentityError {
    IdentityError::rejected_with(format!("User {id} not found."))
}

fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Snapshot file mirroring the state.
#[derive(Debug)]
struct Snapshot {
    dir: Dir,
    file_name: String,
    path: Utf8PathBuf,
}

impl Snapshot {
    fn open(path: &Utf8Path) -> Result<(Self, IdentityState), IdentityError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| IdentityError::unavailable(format!("{path}: not a file path")))?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| IdentityError::unavailable(format!("{parent}: {err}")))?;
        let snapshot = Self {
            dir,
            file_name,
            path: path.to_path_buf(),
        };
        let state = snapshot.load()?;
        Ok((snapshot, state))
    }

    fn load(&self) -> Result<IdentityState, IdentityError> {
        let raw = match self.dir.read_to_string(&self.file_name) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path, "identity snapshot missing; starting empty");
                return Ok(IdentityState::default());
            }
            Err(err) => return Err(IdentityError::unavailable(format!("{}: {err}", self.path))),
        };
        if raw.trim().is_empty() {
            return Ok(IdentityState::default());
        }
        serde_json::from_str(&raw)
            .map_err(|err| IdentityError::unavailable(format!("{}: {err}", self.path)))
    }

    fn store(&self, state: &IdentityState) -> Result<(), IdentityError> {
        let contents = serde_json::to_string_pretty(state)
            .map_err(|err| IdentityError::unavailable(err.to_string()))?;
        write_atomic(&self.dir, &self.file_name, &contents)
            .map_err(|err| IdentityError::unavailable(err.to_string()))
    }
}

/// [`IdentityManager`] keeping every account in memory, optionally mirrored
/// to a snapshot file.
#[derive(Debug, Default)]
pub struct InMemoryIdentityManager {
    state: RwLock<IdentityState>,
    policy: PasswordPolicy,
    snapshot: Option<Snapshot>,
}

impl InMemoryIdentityManager {
    /// Store that forgets everything when dropped.
    pub fn new(policy: PasswordPolicy) -> Self {
        Self {
            state: RwLock::default(),
            policy,
            snapshot: None,
        }
    }

    /// Store backed by the snapshot at `path`. A missing file starts an
    /// empty store and is created on the first change; the parent directory
    /// must exist.
    ///
    /// # Errors
    /// Returns [`IdentityError::Unavailable`] when the directory cannot be
    /// opened or the snapshot cannot be parsed.
    pub fn persistent(policy: PasswordPolicy, path: &Utf8Path) -> Result<Self, IdentityError> {
        let (snapshot, state) = Snapshot::open(path)?;
        info!(
            path = %path,
            users = state.users.len(),
            roles = state.roles.len(),
            "identity snapshot loaded"
        );
        Ok(Self {
            state: RwLock::new(state),
            policy,
            snapshot: Some(snapshot),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IdentityState>, IdentityError> {
        self.state
            .read()
            .map_err(|_| IdentityError::unavailable("identity state lock poisoned"))
    }

    /// Apply `change` to a copy of the state, persist it, then swap it in.
    fn commit<R>(
        &self,
        change: impl FnOnce(&mut IdentityState) -> Result<R, IdentityError>,
    ) -> Result<R, IdentityError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| IdentityError::unavailable("identity state lock poisoned"))?;
        let mut next = state.clone();
        let outcome = change(&mut next)?;
        if let Some(snapshot) = &self.snapshot {
            snapshot.store(&next)?;
        }
        *state = next;
        Ok(outcome)
    }

    fn hashed(&self, password: &str) -> Result<String, IdentityError> {
        let violations = self.policy.violations(password);
        if !violations.is_empty() {
            return Err(IdentityError::rejected(violations));
        }
        hash_password(password).map_err(IdentityError::unavailable)
    }

    fn find(
        &self,
        matches: impl Fn(&UserAccount) -> bool,
    ) -> Result<Option<UserAccount>, IdentityError> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|user| matches(&user.account))
            .map(|user| user.account.clone()))
    }
}

#[async_trait]
impl IdentityManager for InMemoryIdentityManager {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, IdentityError> {
        self.find(|account| &account.id == id)
    }

    async fn find_by_name(&self, user_name: &str) -> Result<Option<UserAccount>, IdentityError> {
        self.find(|account| account.user_name.eq_ignore_ascii_case(user_name))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, IdentityError> {
        self.find(|account| account.email.eq_ignore_ascii_case(email))
    }

    async fn list(&self) -> Result<Vec<UserAccount>, IdentityError> {
        Ok(self
            .read()?
            .users
            .iter()
            .map(|user| user.account.clone())
            .collect())
    }

    async fn create(
        &self,
        account: &UserAccount,
        password: &str,
    ) -> Result<UserAccount, IdentityError> {
        let password_hash = self.hashed(password)?;
        self.commit(|state| {
            let mut errors = Vec::new();
            if state.users.iter().any(|user| user.account.id == account.id) {
                errors.push(format!("User {} already exists.", account.id));
            }
            if state.name_taken(&account.user_name, &account.id) {
                errors.push(format!("User name '{}' is already taken.", account.user_name));
            }
            if state.email_taken(&account.email, &account.id) {
                errors.push(format!("Email '{}' is already taken.", account.email));
            }
            if !errors.is_empty() {
                return Err(IdentityError::rejected(errors));
            }

            state.users.push(StoredUser {
                account: account.clone(),
                password_hash: Some(password_hash),
                roles: Vec::new(),
                reset_fingerprint: None,
            });
            Ok(())
        })?;
        info!(user_id = %account.id, "account created");
        Ok(account.clone())
    }

    async fn update(&self, account: &UserAccount) -> Result<(), IdentityError> {
        self.commit(|state| {
            if state.name_taken(&account.user_name, &account.id) {
                return Err(IdentityError::rejected_with(format!(
                    "User name '{}' is already taken.",
                    account.user_name
                )));
            }
            if state.email_taken(&account.email, &account.id) {
                return Err(IdentityError::rejected_with(format!(
                    "Email '{}' is already taken.",
                    account.email
                )));
            }
            state.user_mut(&account.id)?.account = account.clone();
            Ok(())
        })
    }

    async fn delete(&self, id: &UserId) -> Result<(), IdentityError> {
        self.commit(|state| {
            let before = state.users.len();
            state.users.retain(|user| &user.account.id != id);
            if state.users.len() == before {
                return Err(missing_user(id));
            }
            Ok(())
        })?;
        info!(user_id = %id, "account deleted");
        Ok(())
    }

    async fn role_exists(&self, role: Role) -> Result<bool, IdentityError> {
        Ok(self.read()?.roles.contains(&role))
    }

    async fn create_role(&self, role: Role) -> Result<(), IdentityError> {
        self.commit(|state| {
            if state.roles.insert(role) {
                Ok(())
            } else {
                Err(IdentityError::rejected_with(format!(
                    "Role name '{role}' is already taken."
                )))
            }
        })
    }

    async fn roles_of(&self, id: &UserId) -> Result<Vec<String>, IdentityError> {
        Ok(self
            .read()?
            .user(id)?
            .roles
            .iter()
            .map(|role| role.as_str().to_owned())
            .collect())
    }

    async fn add_to_role(&self, id: &UserId, role: Role) -> Result<(), IdentityError> {
        self.commit(|state| {
            if !state.roles.contains(&role) {
                return Err(IdentityError::rejected_with(format!(
                    "Role {role} does not exist."
                )));
            }
            let user = state.user_mut(id)?;
            if user.roles.contains(&role) {
                return Err(IdentityError::rejected_with(format!(
                    "User already in role '{role}'."
                )));
            }
            user.roles.push(role);
            Ok(())
        })
    }

    async fn remove_from_role(&self, id: &UserId, role: Role) -> Result<(), IdentityError> {
        self.commit(|state| {
            let user = state.user_mut(id)?;
            let before = user.roles.len();
            user.roles.retain(|assigned| *assigned != role);
            if user.roles.len() == before {
                return Err(IdentityError::rejected_with(format!(
                    "User is not in role '{role}'."
                )));
            }
            Ok(())
        })
    }

    async fn users_in_role(&self, role: Role) -> Result<Vec<UserAccount>, IdentityError> {
        Ok(self
            .read()?
            .users
            .iter()
            .filter(|user| user.roles.contains(&role))
            .map(|user| user.account.clone())
            .collect())
    }

    async fn check_password(&self, id: &UserId, password: &str) -> Result<bool, IdentityError> {
        let stored = self.read()?.user(id)?.password_hash.clone();
        Ok(stored.is_some_and(|hash| verify_password(password, &hash)))
    }

    async fn change_password(
        &self,
        id: &UserId,
        current: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        if !self.check_password(id, current).await? {
            return Err(IdentityError::rejected_with("Incorrect password."));
        }
        let hash = self.hashed(new_password)?;
        self.commit(|state| {
            state.user_mut(id)?.password_hash = Some(hash);
            Ok(())
        })
    }

    async fn remove_password(&self, id: &UserId) -> Result<(), IdentityError> {
        self.commit(|state| {
            state.user_mut(id)?.password_hash = None;
            Ok(())
        })
    }

    async fn add_password(&self, id: &UserId, password: &str) -> Result<(), IdentityError> {
        if self.read()?.user(id)?.password_hash.is_some() {
            return Err(IdentityError::rejected_with(
                "User already has a password set.",
            ));
        }
        let hash = self.hashed(password)?;
        self.commit(|state| {
            let user = state.user_mut(id)?;
            if user.password_hash.is_some() {
                return Err(IdentityError::rejected_with(
                    "User already has a password set.",
                ));
            }
            user.password_hash = Some(hash);
            Ok(())
        })
    }

    async fn generate_password_reset_token(&self, id: &UserId) -> Result<String, IdentityError> {
        let mut bytes = [0_u8; RESET_TOKEN_BYTES];
        rand::thread_rng().fill(&mut bytes);
        let token = hex::encode(bytes);
        let replaced = self.commit(|state| {
            Ok(state
                .user_mut(id)?
                .reset_fingerprint
                .replace(fingerprint(&token))
                .is_some())
        })?;
        debug!(user_id = %id, replaced, "password reset token issued");
        Ok(token)
    }

    async fn reset_password(
        &self,
        id: &UserId,
        token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let presented = fingerprint(token.trim());
        if self.read()?.user(id)?.reset_fingerprint.as_ref() != Some(&presented) {
            return Err(IdentityError::rejected_with("Invalid token."));
        }
        let hash = self.hashed(new_password)?;

        self.commit(|state| {
            let user = state.user_mut(id)?;
            if user.reset_fingerprint.as_ref() != Some(&presented) {
                return Err(IdentityError::rejected_with("Invalid token."));
            }
            user.reset_fingerprint = None;
            user.password_hash = Some(hash);
            Ok(())
        })?;
        info!(user_id = %id, "password reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "in_memory_tests.rs"]
mod tests;
