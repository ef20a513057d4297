//! In-memory repository for service tests. Mirrors the schema's unique
//! indexes and the reserved-username check.

use std::collections::BTreeMap;

use accounts_database::{NewUser, UniqueField, User, UserError, UserOrdering, UserResult};
use chrono::Utc;
use tokio::sync::Mutex;

use super::user_service::UserRepo;
use crate::types::UserId;

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, User>,
    last_id: UserId,
}

impl State {
    fn check_constraints(&self, candidate: &NewUser, own_id: Option<UserId>) -> UserResult<()> {
        if let Some(username) = &candidate.username {
            if username.as_str().eq_ignore_ascii_case("me") {
                return Err(UserError::ConstraintViolation {
                    constraint: "username_is_not_me".to_string(),
                });
            }
        }

        for (id, existing) in &self.users {
            if Some(*id) == own_id {
                continue;
            }
            if existing.email == candidate.email {
                return Err(UserError::UniquenessViolation {
                    field: UniqueField::Email,
                });
            }
            if candidate.username.is_some() && existing.username == candidate.username {
                return Err(UserError::UniquenessViolation {
                    field: UniqueField::Username,
                });
            }
        }

        Ok(())
    }
}

fn fields_of(user: &User) -> NewUser {
    NewUser {
        email: user.email.clone(),
        username: user.username.clone(),
        role: user.role,
        bio: user.bio.clone(),
        is_staff: user.is_staff,
        is_superuser: user.is_superuser,
        is_active: user.is_active,
    }
}

pub struct MemoryUserRepository {
    state: Mutex<State>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }
}

impl UserRepo for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn list(&self, ordering: UserOrdering) -> UserResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        match ordering {
            UserOrdering::IdAsc => {}
            UserOrdering::IdDesc => users.reverse(),
            UserOrdering::Email => {
                users.sort_by(|a, b| a.email.as_str().cmp(b.email.as_str()));
            }
            UserOrdering::Username => {
                users.sort_by(|a, b| {
                    let a = a.username.as_ref().map(|u| u.as_str());
                    let b = b.username.as_ref().map(|u| u.as_str());
                    a.cmp(&b)
                });
            }
        }
        Ok(users)
    }

    async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        let mut state = self.state.lock().await;
        state.check_constraints(new_user, None)?;

        state.last_id += 1;
        let user = User::restore(state.last_id, Utc::now(), new_user.clone());
        state.users.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> UserResult<User> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user.id()) {
            return Err(UserError::UserNotFound);
        }
        state.check_constraints(&fields_of(user), Some(user.id()))?;

        state.users.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        self.state
            .lock()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(UserError::UserNotFound)
    }
}
