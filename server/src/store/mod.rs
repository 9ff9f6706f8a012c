pub mod models;
pub mod posts;
pub mod users;

pub use models::{Post, PostInput, User};
pub use posts::PostRepository;
pub use users::UserRepository;

/// Process-lifetime state shared by every worker.
#[derive(Clone, Debug, Default)]
pub struct BlogStore {
    posts: PostRepository,
    users: UserRepository,
}

impl BlogStore {
    pub fn new(seed_posts: Vec<PostInput>) -> Self {
        Self {
            posts: PostRepository::with_posts(seed_posts),
            users: UserRepository::new(),
        }
    }

    pub fn posts(&self) -> &PostRepository {
        &self.posts
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }
}
