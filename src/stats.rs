//! Summary statistics over a list of blogs.
//!
//! Every function is pure and keeps input order significant: ties go to the
//! entry (or author) seen first. Statistics that have no meaningful value for
//! an empty or absent list return `None` rather than zero.

use serde::{Deserialize, Serialize};

use crate::plugins::blogs::models::Blog;

/// Anything carrying an author and a like count.
pub trait Entry {
    fn author(&self) -> Option<&str>;
    fn likes(&self) -> u32;
}

impl Entry for Blog {
    fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    fn likes(&self) -> u32 {
        self.likes
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MostBlogs {
    pub author: Option<String>,
    pub blogs: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MostLikes {
    pub author: Option<String>,
    pub likes: Option<u64>,
}

pub fn total_likes<T: Entry>(blogs: &[T]) -> u64 {
    blogs.iter().map(|b| u64::from(b.likes())).sum()
}

/// The entry with the most likes; the earliest one wins a tie.
pub fn favorite_blog<T: Entry>(blogs: Option<&[T]>) -> Option<&T> {
    let mut iter = blogs?.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |favorite, current| {
        if current.likes() > favorite.likes() {
            current
        } else {
            favorite
        }
    }))
}

pub fn most_blogs<T: Entry>(blogs: Option<&[T]>) -> MostBlogs {
    match blogs.and_then(|b| leader(tally(b, |_| 1))) {
        Some((author, count)) => MostBlogs {
            author: author.map(str::to_owned),
            blogs: Some(count),
        },
        None => MostBlogs::default(),
    }
}

pub fn most_likes<T: Entry>(blogs: Option<&[T]>) -> MostLikes {
    match blogs.and_then(|b| leader(tally(b, |blog| u64::from(blog.likes())))) {
        Some((author, likes)) => MostLikes {
            author: author.map(str::to_owned),
            likes: Some(likes),
        },
        None => MostLikes::default(),
    }
}

// Groups keep first-appearance order so that `leader` breaks ties stably.
fn tally<'a, T: Entry>(blogs: &'a [T], weight: impl Fn(&T) -> u64) -> Vec<(Option<&'a str>, u64)> {
    let mut groups: Vec<(Option<&'a str>, u64)> = Vec::new();
    for blog in blogs {
        let author = blog.author();
        match groups.iter_mut().find(|(a, _)| *a == author) {
            Some((_, total)) => *total += weight(blog),
            None => groups.push((author, weight(blog))),
        }
    }
    groups
}

fn leader(groups: Vec<(Option<&str>, u64)>) -> Option<(Option<&str>, u64)> {
    groups.into_iter().fold(None, |best, (author, total)| match best {
        Some((_, best_total)) if best_total >= total => best,
        _ => Some((author, total)),
    })
}
