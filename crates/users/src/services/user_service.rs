//! User service for registration, profile and privilege changes.

use accounts_config::{AccountsConfig, Locale};
use accounts_database::{
    Email, FieldLimits, NewUser, SqlitePool, User, UserError, UserOrdering, UserRepository,
    UserResult, UserRole, Username, ValidationError,
};
use tracing::{info, warn};

use crate::types::{PrivilegeUpdate, ProfileUpdate, RegisterRequest, UserId};

/// Service for managing user operations
pub struct UserService<R> {
    user_repository: R,
    limits: FieldLimits,
    locale: Locale,
}

impl UserService<UserRepository> {
    /// Create a service backed by the SQLite repository
    pub fn new(pool: SqlitePool, config: &AccountsConfig) -> Self {
        Self::with_repository(UserRepository::new(pool), config)
    }
}

impl<R> UserService<R>
where
    R: UserRepo,
{
    pub fn with_repository(user_repository: R, config: &AccountsConfig) -> Self {
        Self {
            user_repository,
            limits: FieldLimits::from(config),
            locale: config.locale,
        }
    }

    /// Language used when rendering errors for end users
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Register a new user. The username is required at this point even
    /// though the stored field is nullable.
    pub async fn register(&self, request: RegisterRequest) -> UserResult<User> {
        let email = self.parse_email(&request.email)?;
        let username = match request.username.as_deref() {
            Some(username) if !username.is_empty() => Username::parse(username, &self.limits)?,
            _ => return Err(ValidationError::MissingField("username").into()),
        };

        let role = request
            .role
            .as_deref()
            .map(|role| role.parse::<UserRole>())
            .transpose()?
            .unwrap_or_default();

        let mut new_user = NewUser::new(email)
            .with_username(username)
            .with_role(role);
        new_user.bio = normalize_bio(request.bio);

        let user = self.user_repository.create(&new_user).await?;
        info!(user_id = user.id(), role = %user.role, "user registered");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: UserId) -> UserResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    /// Look a user up by login address
    pub async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let email = self.parse_email(email)?;
        self.user_repository.find_by_email(email.as_str()).await
    }

    pub async fn list_users(&self, ordering: UserOrdering) -> UserResult<Vec<User>> {
        self.user_repository.list(ordering).await
    }

    /// Change email, username or bio
    pub async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> UserResult<User> {
        if update.is_empty() {
            return self.get_user(user_id).await;
        }

        let email = update
            .email
            .as_deref()
            .map(|email| self.parse_email(email))
            .transpose()?;
        let username = match update.username {
            Some(Some(username)) => Some(Some(Username::parse(username, &self.limits)?)),
            Some(None) => Some(None),
            None => None,
        };

        let mut user = self.get_user(user_id).await?;
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(username) = username {
            user.username = username;
        }
        if let Some(bio) = update.bio {
            user.bio = normalize_bio(bio);
        }

        let user = self.user_repository.save(&user).await?;
        info!(user_id, "profile updated");
        Ok(user)
    }

    /// Change role and platform flags
    pub async fn change_privileges(
        &self,
        user_id: UserId,
        update: PrivilegeUpdate,
    ) -> UserResult<User> {
        if update.is_empty() {
            return self.get_user(user_id).await;
        }

        let role = update
            .role
            .as_deref()
            .map(|role| role.parse::<UserRole>())
            .transpose()?;

        let mut user = self.get_user(user_id).await?;
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(is_staff) = update.is_staff {
            user.is_staff = is_staff;
        }
        if let Some(is_superuser) = update.is_superuser {
            user.is_superuser = is_superuser;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }

        let user = self.user_repository.save(&user).await?;
        info!(
            user_id,
            role = %user.role,
            is_staff = user.is_staff,
            is_superuser = user.is_superuser,
            is_admin = user.is_admin(),
            "privileges changed"
        );
        Ok(user)
    }

    /// Delete a user account
    pub async fn delete_account(&self, user_id: UserId) -> UserResult<()> {
        self.get_user(user_id).await?;
        self.user_repository.delete(user_id).await?;
        warn!(user_id, "user deleted");
        Ok(())
    }

    fn parse_email(&self, email: &str) -> UserResult<Email> {
        if email.trim().is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        Ok(Email::parse(email, &self.limits)?)
    }
}

/// Blank biographies are stored as absent.
fn normalize_bio(bio: Option<String>) -> Option<String> {
    bio.filter(|bio| !bio.trim().is_empty())
}

/// Storage operations the service needs
pub trait UserRepo {
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;
    async fn list(&self, ordering: UserOrdering) -> UserResult<Vec<User>>;
    async fn create(&self, new_user: &NewUser) -> UserResult<User>;
    async fn save(&self, user: &User) -> UserResult<User>;
    async fn delete(&self, id: UserId) -> UserResult<()>;
}

impl UserRepo for UserRepository {
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.find_by_email(email).await
    }

    async fn list(&self, ordering: UserOrdering) -> UserResult<Vec<User>> {
        self.list(ordering).await
    }

    async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        self.create(new_user).await
    }

    async fn save(&self, user: &User) -> UserResult<User> {
        self.save(user).await
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        self.delete(id).await
    }
}
