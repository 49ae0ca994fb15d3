use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

use crate::kernel::{build_app, Plugin};
use crate::plugins::auth::{LoginPlugin, PasswordHasher, TokenAuthority};
use crate::plugins::blogs::models::Blog;
use crate::plugins::blogs::BlogsPlugin;
use crate::plugins::health::HealthPlugin;
use crate::plugins::users::models::NewUser;
use crate::plugins::users::UsersPlugin;
use crate::store::{DynStore, InMemoryStore, Store};

pub const TEST_PASSWORD: &str = "password";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
    pub tokens: Arc<TokenAuthority>,
    pub hasher: PasswordHasher,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let dyn_store: DynStore = store.clone();
        let hasher = PasswordHasher::new(4);
        let tokens = Arc::new(TokenAuthority::new("test-secret", chrono::Duration::hours(1)));
        let plugins: Vec<Box<dyn Plugin>> = vec![
            Box::new(HealthPlugin),
            Box::new(BlogsPlugin::new(dyn_store.clone())),
            Box::new(UsersPlugin::new(dyn_store.clone(), hasher)),
            Box::new(LoginPlugin::new(dyn_store, hasher)),
        ];
        let app = build_app(&plugins, tokens.clone()).await;
        Self { app, store, tokens, hasher }
    }

    /// Creates a user whose password is [`TEST_PASSWORD`] and returns its id
    /// with a valid bearer token.
    pub async fn user(&self, username: &str) -> (Uuid, String) {
        let password_hash = self.hasher.hash(TEST_PASSWORD).unwrap();
        let user = self
            .store
            .insert_user(NewUser { username: username.into(), name: Some("Test User".into()), password_hash })
            .await
            .unwrap();
        let token = self.tokens.issue(user.id, &user.username).unwrap();
        (user.id, token)
    }

    pub fn seed_initial_blogs(&self) -> Vec<Blog> {
        let blogs: Vec<Blog> = [
            ("React patterns", "Michael Chan", "https://reactpatterns.com/", 7),
            ("Go To Statement Considered Harmful", "Edsger W. Dijkstra", "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html", 5),
            ("Canonical string reduction", "Edsger W. Dijkstra", "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html", 12),
            ("First class tests", "Robert C. Martin", "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll", 10),
            ("TDD harms architecture", "Robert C. Martin", "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html", 0),
            ("Type wars", "Robert C. Martin", "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html", 2),
        ]
        .into_iter()
        .map(|(title, author, url, likes)| Blog {
            id: Uuid::new_v4(),
            title: title.into(),
            author: Some(author.into()),
            url: url.into(),
            likes,
            user: None,
        })
        .collect();
        for blog in &blogs {
            self.store.seed_blog(blog.clone());
        }
        blogs
    }

    pub async fn blog_count(&self) -> usize {
        self.store.list_blogs().await.unwrap().len()
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {}", t));
        }
        let req = match body {
            Some(b) => req.header("content-type", "application/json").body(Body::from(b.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }
}
