//! In-memory record store
//!
//! Holds users and posts behind a single async lock. Uniqueness rules mirror
//! what a relational schema would enforce: email, nickname and post title are
//! unique, and deleting a user removes that user's posts.

use std::collections::BTreeMap;
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{Post, PostId, User, UserId};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    next_user_id: u64,
    next_post_id: u64,
}

impl Tables {
    fn check_user_unique(
        &self,
        nickname: &str,
        email: &str,
        except: Option<UserId>,
    ) -> Result<(), StoreError> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.email == email {
                return Err(StoreError::EmailTaken);
            }
            if user.nickname == nickname {
                return Err(StoreError::NicknameTaken);
            }
        }
        Ok(())
    }

    fn check_title_unique(&self, title: &str, except: Option<PostId>) -> Result<(), StoreError> {
        if self
            .posts
            .values()
            .any(|p| Some(p.id) != except && p.title == title)
        {
            return Err(StoreError::TitleTaken);
        }
        Ok(())
    }
}

/// Shared handle to the user and post tables. Cloning is cheap.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a user. `password_hash` must already be hashed.
    pub async fn create_user(
        &self,
        nickname: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(nickname, email, None)?;

        tables.next_user_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: UserId(tables.next_user_id),
            nickname: nickname.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn find_user(&self, id: UserId) -> Option<User> {
        self.tables.read().await.users.get(&id).cloned()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.tables.read().await.users.values().cloned().collect()
    }

    /// Replace a user's profile and credential record in one step.
    pub async fn update_user(
        &self,
        id: UserId,
        nickname: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(nickname, email, Some(id))?;

        let user = tables
            .users
            .get_mut(&id)
            .ok_or(StoreError::NotFound("user"))?;
        user.nickname = nickname.to_string();
        user.email = email.to_string();
        user.password_hash = password_hash;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    /// Delete a user together with every post they authored.
    pub async fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .users
            .remove(&id)
            .ok_or(StoreError::NotFound("user"))?;
        tables.posts.retain(|_, p| p.author_id != id);
        Ok(())
    }

    // =========================================================================
    // Posts
    // =========================================================================

    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        author_id: UserId,
    ) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&author_id) {
            return Err(StoreError::NotFound("author"));
        }
        tables.check_title_unique(title, None)?;

        tables.next_post_id += 1;
        let now = OffsetDateTime::now_utc();
        let post = Post {
            id: PostId(tables.next_post_id),
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    pub async fn find_post(&self, id: PostId) -> Option<Post> {
        self.tables.read().await.posts.get(&id).cloned()
    }

    pub async fn list_posts(&self) -> Vec<Post> {
        self.tables.read().await.posts.values().cloned().collect()
    }

    /// Change a post's title and content. The author is never modified here.
    pub async fn update_post(
        &self,
        id: PostId,
        title: &str,
        content: &str,
    ) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_title_unique(title, Some(id))?;

        let post = tables
            .posts
            .get_mut(&id)
            .ok_or(StoreError::NotFound("post"))?;
        post.title = title.to_string();
        post.content = content.to_string();
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("post"))
    }
}
