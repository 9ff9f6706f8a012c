use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::models::{Post, PostInput};
use crate::error::{ApiError, Result};

#[derive(Debug)]
struct PostTable {
    posts: Vec<Post>,
    // Never rewinds, so ids stay unique across deletions.
    next_id: u64,
}

/// In-memory post collection in insertion order.
#[derive(Clone, Debug)]
pub struct PostRepository {
    table: Arc<RwLock<PostTable>>,
}

impl PostRepository {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    /// Seeds the collection; seeded posts get ids `1..=n`.
    pub fn with_posts(seed: Vec<PostInput>) -> Self {
        let posts: Vec<Post> = seed
            .into_iter()
            .zip(1u64..)
            .map(|(input, id)| Post {
                id,
                title: input.title,
                content: input.content,
            })
            .collect();
        let next_id = posts.len() as u64 + 1;

        Self {
            table: Arc::new(RwLock::new(PostTable { posts, next_id })),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, PostTable>> {
        self.table
            .read()
            .map_err(|e| ApiError::Internal(format!("post store lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PostTable>> {
        self.table
            .write()
            .map_err(|e| ApiError::Internal(format!("post store lock poisoned: {}", e)))
    }

    pub fn list(&self) -> Result<Vec<Post>> {
        Ok(self.read()?.posts.clone())
    }

    pub fn get(&self, id: u64) -> Result<Option<Post>> {
        Ok(self.read()?.posts.iter().find(|p| p.id == id).cloned())
    }

    pub fn create(&self, input: PostInput) -> Result<Post> {
        let mut table = self.write()?;
        let post = Post {
            id: table.next_id,
            title: input.title,
            content: input.content,
        };
        table.next_id += 1;
        table.posts.push(post.clone());
        Ok(post)
    }

    /// Returns the updated post, or `None` when no post has `id`.
    pub fn update(&self, id: u64, input: PostInput) -> Result<Option<Post>> {
        let mut table = self.write()?;
        let updated = table.posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.title = input.title;
            post.content = input.content;
            post.clone()
        });
        Ok(updated)
    }

    /// Returns the removed post, or `None` when no post has `id`.
    pub fn delete(&self, id: u64) -> Result<Option<Post>> {
        let mut table = self.write()?;
        let index = table.posts.iter().position(|p| p.id == id);
        Ok(index.map(|index| table.posts.remove(index)))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.posts.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for PostRepository {
    fn default() -> Self {
        Self::new()
    }
}
