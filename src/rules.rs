//! Write-path checks for blogs and users.
//!
//! These functions decide whether a request is well-formed and permitted. They
//! never touch storage themselves: callers fetch whatever the decision needs
//! (the target blog, an existing user) and pass it in.

use thiserror::Error;
use uuid::Uuid;

use crate::plugins::blogs::models::{Blog, BlogCreate, BlogPatch, BlogUpdate, NewBlog};
use crate::plugins::users::models::{CreateUser, User, ValidSignup};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Auth,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("User not found")]
    UserNotFound,
    #[error("Blog title is required")]
    TitleRequired,
    #[error("Blog not found")]
    NotFound,
    #[error("token missing or invalid")]
    Unauthenticated,
    #[error("unauthorized")]
    Forbidden,
    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,
    #[error("Password must be at least 3 characters long")]
    PasswordTooShort,
    #[error("Username must be unique")]
    UsernameTaken,
    /// The store refused the record, e.g. a required field was missing.
    #[error("{0}")]
    PersistenceRejected(String),
}

impl Rejection {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Rejection::TitleRequired
            | Rejection::UsernameTooShort
            | Rejection::PasswordTooShort
            | Rejection::PersistenceRejected(_) => ErrorKind::Validation,
            Rejection::NotFound => ErrorKind::NotFound,
            Rejection::UserNotFound | Rejection::Unauthenticated | Rejection::Forbidden => ErrorKind::Auth,
            Rejection::UsernameTaken => ErrorKind::Conflict,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::UserNotFound => "user_not_found",
            Rejection::TitleRequired => "title_required",
            Rejection::NotFound => "not_found",
            Rejection::Unauthenticated => "unauthenticated",
            Rejection::Forbidden => "forbidden",
            Rejection::UsernameTooShort => "username_too_short",
            Rejection::PasswordTooShort => "password_too_short",
            Rejection::UsernameTaken => "username_taken",
            Rejection::PersistenceRejected(_) => "persistence_rejected",
        }
    }
}

/// Validates a create request. `likes` falls back to 0; `author` and `url`
/// pass through untouched.
pub fn new_blog(identity: Option<Uuid>, payload: BlogCreate) -> Result<NewBlog, Rejection> {
    let user = identity.ok_or(Rejection::UserNotFound)?;
    let title = match payload.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(Rejection::TitleRequired),
    };

    Ok(NewBlog {
        title,
        author: payload.author,
        url: payload.url,
        likes: payload.likes.unwrap_or(0),
        user,
    })
}

/// Only provided fields are overwritten. There is no ownership check on
/// update, unlike delete.
pub fn blog_patch(payload: BlogUpdate) -> Result<BlogPatch, Rejection> {
    if payload.title.as_deref() == Some("") {
        return Err(Rejection::TitleRequired);
    }
    Ok(BlogPatch {
        title: payload.title,
        author: payload.author,
        url: payload.url,
        likes: payload.likes,
    })
}

/// Checks run in order: the blog exists, a caller is authenticated, and the
/// caller owns the blog. Returns the owner id.
pub fn authorize_delete(blog: Option<&Blog>, identity: Option<Uuid>) -> Result<Uuid, Rejection> {
    let blog = blog.ok_or(Rejection::NotFound)?;
    let caller = identity.ok_or(Rejection::Unauthenticated)?;
    match blog.user {
        Some(owner) if owner == caller => Ok(owner),
        _ => Err(Rejection::Forbidden),
    }
}

pub fn new_user(payload: CreateUser) -> Result<ValidSignup, Rejection> {
    let username = payload.username.unwrap_or_default();
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(Rejection::UsernameTooShort);
    }
    let password = payload.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Rejection::PasswordTooShort);
    }

    Ok(ValidSignup {
        username,
        name: payload.name,
        password,
    })
}

/// Advisory uniqueness check. The store's own constraint has the final say.
pub fn ensure_username_free(existing: Option<&User>) -> Result<(), Rejection> {
    match existing {
        Some(_) => Err(Rejection::UsernameTaken),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_blog(owner: Option<Uuid>) -> Blog {
        Blog {
            id: Uuid::new_v4(),
            title: "Type wars".into(),
            author: Some("Robert C. Martin".into()),
            url: "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html".into(),
            likes: 2,
            user: owner,
        }
    }

    #[test]
    fn create_requires_identity_even_with_title() {
        let payload = BlogCreate { title: Some("New Blog".into()), ..Default::default() };
        assert_eq!(new_blog(None, payload), Err(Rejection::UserNotFound));
    }

    #[test]
    fn create_rejects_missing_or_empty_title() {
        let user = Some(Uuid::new_v4());
        let empty = BlogCreate {
            title: Some(String::new()),
            author: Some("a".into()),
            url: Some("http://example.com".into()),
            likes: Some(3),
        };
        assert_eq!(new_blog(user, empty), Err(Rejection::TitleRequired));
        assert_eq!(new_blog(user, BlogCreate::default()), Err(Rejection::TitleRequired));
    }

    #[test]
    fn create_defaults_likes_and_sets_owner() {
        let user = Uuid::new_v4();
        let payload = BlogCreate {
            title: Some("New Blog".into()),
            author: None,
            url: Some("http://example.com/new".into()),
            likes: None,
        };
        let blog = new_blog(Some(user), payload).unwrap();
        assert_eq!(blog.likes, 0);
        assert_eq!(blog.user, user);
        assert_eq!(blog.author, None);
    }

    #[test]
    fn patch_keeps_only_provided_fields() {
        let patch = blog_patch(BlogUpdate { likes: Some(99), ..Default::default() }).unwrap();
        let mut blog = owned_blog(None);
        let before = blog.clone();
        patch.apply(&mut blog);
        assert_eq!(blog.likes, 99);
        assert_eq!(blog.title, before.title);
        assert_eq!(blog.url, before.url);
    }

    #[test]
    fn patch_rejects_empty_title() {
        let payload = BlogUpdate { title: Some(String::new()), ..Default::default() };
        assert_eq!(blog_patch(payload), Err(Rejection::TitleRequired));
    }

    #[test]
    fn delete_checks_existence_first() {
        assert_eq!(authorize_delete(None, None), Err(Rejection::NotFound));
    }

    #[test]
    fn delete_requires_identity() {
        let blog = owned_blog(Some(Uuid::new_v4()));
        assert_eq!(authorize_delete(Some(&blog), None), Err(Rejection::Unauthenticated));
    }

    #[test]
    fn delete_by_other_user_is_forbidden() {
        let blog = owned_blog(Some(Uuid::new_v4()));
        let err = authorize_delete(Some(&blog), Some(Uuid::new_v4())).unwrap_err();
        assert_eq!(err, Rejection::Forbidden);
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn delete_of_ownerless_blog_is_forbidden() {
        let blog = owned_blog(None);
        assert_eq!(authorize_delete(Some(&blog), Some(Uuid::new_v4())), Err(Rejection::Forbidden));
    }

    #[test]
    fn delete_by_owner_is_allowed() {
        let owner = Uuid::new_v4();
        let blog = owned_blog(Some(owner));
        assert_eq!(authorize_delete(Some(&blog), Some(owner)), Ok(owner));
    }

    #[test]
    fn signup_checks_username_before_password() {
        let payload = CreateUser { username: Some("ab".into()), name: None, password: Some("x".into()) };
        assert_eq!(new_user(payload), Err(Rejection::UsernameTooShort));
        let payload = CreateUser { username: Some("abc".into()), name: None, password: Some("xy".into()) };
        assert_eq!(new_user(payload), Err(Rejection::PasswordTooShort));
        assert_eq!(new_user(CreateUser::default()), Err(Rejection::UsernameTooShort));
    }

    #[test]
    fn signup_counts_characters_not_bytes() {
        let payload = CreateUser { username: Some("éé".into()), name: None, password: Some("secret".into()) };
        assert_eq!(new_user(payload), Err(Rejection::UsernameTooShort));
    }

    #[test]
    fn signup_passes_valid_input_through() {
        let payload = CreateUser {
            username: Some("mluukkai".into()),
            name: Some("Matti Luukkainen".into()),
            password: Some("salainen".into()),
        };
        let signup = new_user(payload).unwrap();
        assert_eq!(signup.username, "mluukkai");
        assert_eq!(signup.password, "salainen");
    }

    #[test]
    fn taken_username_is_a_conflict() {
        let existing = User {
            id: Uuid::new_v4(),
            username: "root".into(),
            name: None,
            password_hash: "hash".into(),
            blogs: vec![],
        };
        let err = ensure_username_free(Some(&existing)).unwrap_err();
        assert_eq!(err, Rejection::UsernameTaken);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(ensure_username_free(None).is_ok());
    }
}
