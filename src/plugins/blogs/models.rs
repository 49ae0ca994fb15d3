use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored blog entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
    /// Owning user, absent for seeded records.
    pub user: Option<Uuid>,
}

/// Body of `POST /api/blogs`. Every field is optional on the wire so that
/// missing values turn into domain rejections instead of parse errors.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct BlogCreate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

/// Body of `PUT /api/blogs/:id`.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

/// A validated blog ready to be inserted. `url` stays optional here: the
/// store owns that schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlog {
    pub title: String,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: u32,
    pub user: Uuid,
}

/// Field-level overwrite; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

impl BlogPatch {
    pub fn apply(self, blog: &mut Blog) {
        if let Some(title) = self.title {
            blog.title = title;
        }
        if let Some(author) = self.author {
            blog.author = Some(author);
        }
        if let Some(url) = self.url {
            blog.url = url;
        }
        if let Some(likes) = self.likes {
            blog.likes = likes;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

/// Blog as listed by `GET /api/blogs`, with the owner populated.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BlogView {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
    pub user: Option<OwnerSummary>,
}

impl BlogView {
    pub fn new(blog: Blog, user: Option<OwnerSummary>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BlogStats {
    pub total_likes: u64,
    pub favorite_blog: Option<Blog>,
    pub most_blogs: crate::stats::MostBlogs,
    pub most_likes: crate::stats::MostLikes,
}
