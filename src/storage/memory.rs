// src/storage/memory.rs
//
// In-process backend: the whole dataset lives in one arena of integer-keyed
// maps behind a single reader/writer lock. Every mutation takes the write
// guard for its entire read-modify-write sequence, so multi-index updates
// (comment creation touches the comment map, the parent's child set and the
// subscriber pending lists) are atomic. The thread read path traverses under
// one read guard. No guard is ever held across an await point.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{comment::CommentView, like::LikeCounts, post::PostView};
use crate::storage::shared::{self, DELETED_BODY};
use crate::storage::{NewComment, NewPost, NewUser, PostPatch, Store};

/// Full user record. Only the login and the owned-post set are read back by
/// store operations; the rest is held for the lifetime of the record (there
/// is no user read or delete operation in the contract).
#[derive(Debug)]
#[allow(dead_code)]
struct UserRec {
    id: i64,
    login: String,
    name: String,
    surname: String,
    phone: String,
    email: String,
    create_date: DateTime<Utc>,
    /// Owned-post set; delete_post removes the id so listings skip it.
    posts: HashSet<i64>,
}

#[derive(Debug)]
struct PostRec {
    id: i64,
    author_id: i64,
    title: String,
    body: String,
    is_commented: bool,
    is_deleted: bool,
    create_date: DateTime<Utc>,
    upd_date: DateTime<Utc>,
}

#[derive(Debug)]
struct CommentRec {
    id: i64,
    post_id: i64,
    /// 0 means root.
    parent_id: i64,
    author_id: i64,
    body: String,
    is_deleted: bool,
    create_date: DateTime<Utc>,
    upd_date: DateTime<Utc>,
    /// Direct children. A deleted comment is detached from its parent's set,
    /// so this only ever holds live comments.
    children: HashSet<i64>,
}

#[derive(Debug)]
struct SubRec {
    id: i64,
    is_deleted: bool,
    upd_date: DateTime<Utc>,
    /// Comment ids accumulated since the subscriber last drained.
    pending: Vec<i64>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<i64, UserRec>,
    posts: HashMap<i64, PostRec>,
    comments: HashMap<i64, CommentRec>,
    /// Active reactions keyed by (actor, target); absence means none.
    post_likes: HashMap<(i64, i64), bool>,
    comment_likes: HashMap<(i64, i64), bool>,
    /// post id -> subscriber user id -> subscription.
    subscriptions: HashMap<i64, HashMap<i64, SubRec>>,
    next_user_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
    next_sub_id: i64,
    /// Case-insensitive uniqueness reservations, held for the record's
    /// lifetime.
    logins: HashSet<String>,
    phones: HashSet<String>,
    emails: HashSet<String>,
}

impl Inner {
    fn post_like_counts(&self, post_id: i64) -> LikeCounts {
        let mut counts = LikeCounts::default();
        for (&(_, target), &is_like) in &self.post_likes {
            if target == post_id {
                if is_like {
                    counts.likes += 1;
                } else {
                    counts.dislikes += 1;
                }
            }
        }
        counts
    }

    fn comment_like_counts(&self, comment_id: i64) -> LikeCounts {
        let mut counts = LikeCounts::default();
        for (&(_, target), &is_like) in &self.comment_likes {
            if target == comment_id {
                if is_like {
                    counts.likes += 1;
                } else {
                    counts.dislikes += 1;
                }
            }
        }
        counts
    }

    fn login_of(&self, user_id: i64) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.login.clone())
            .unwrap_or_default()
    }

    fn comment_view(&self, c: &CommentRec) -> CommentView {
        let counts = self.comment_like_counts(c.id);
        CommentView {
            id: c.id,
            post_id: c.post_id,
            parent_id: c.parent_id,
            author_id: c.author_id,
            login: self.login_of(c.author_id),
            body: if c.is_deleted {
                DELETED_BODY.to_string()
            } else {
                c.body.clone()
            },
            create_date: c.create_date,
            upd_date: c.upd_date,
            likes: counts.likes,
            dislikes: counts.dislikes,
            child_count: c.children.len() as i64,
        }
    }
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<i64, AppError> {
        let mut db = self.write();

        let login_key = input.login.to_lowercase();
        let phone_key = input.phone.to_lowercase();
        let email_key = input.email.to_lowercase();
        if db.logins.contains(&login_key) {
            return Err(AppError::Conflict("login is not unique".to_string()));
        }
        if db.phones.contains(&phone_key) {
            return Err(AppError::Conflict("phone is not unique".to_string()));
        }
        if db.emails.contains(&email_key) {
            return Err(AppError::Conflict("email is not unique".to_string()));
        }

        db.next_user_id += 1;
        let id = db.next_user_id;
        db.users.insert(
            id,
            UserRec {
                id,
                login: input.login,
                name: input.name,
                surname: input.surname,
                phone: input.phone,
                email: input.email,
                create_date: Utc::now(),
                posts: HashSet::new(),
            },
        );
        db.logins.insert(login_key);
        db.phones.insert(phone_key);
        db.emails.insert(email_key);

        Ok(id)
    }

    async fn create_post(&self, input: NewPost) -> Result<i64, AppError> {
        let mut db = self.write();

        if !db.users.contains_key(&input.author_id) {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        db.next_post_id += 1;
        let id = db.next_post_id;
        let now = Utc::now();
        db.posts.insert(
            id,
            PostRec {
                id,
                author_id: input.author_id,
                title: input.title,
                body: input.body,
                is_commented: input.is_commented,
                is_deleted: false,
                create_date: now,
                upd_date: now,
            },
        );
        if let Some(author) = db.users.get_mut(&input.author_id) {
            author.posts.insert(id);
        }

        Ok(id)
    }

    async fn update_post(&self, patch: PostPatch) -> Result<i64, AppError> {
        let mut db = self.write();

        let post = db
            .posts
            .get_mut(&patch.post_id)
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(body) = patch.body {
            post.body = body;
        }
        if let Some(is_commented) = patch.is_commented {
            post.is_commented = is_commented;
        }
        post.upd_date = Utc::now();

        Ok(post.id)
    }

    async fn delete_post(&self, post_id: i64) -> Result<i64, AppError> {
        let mut db = self.write();

        let post = db
            .posts
            .get_mut(&post_id)
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
        post.is_deleted = true;
        post.upd_date = Utc::now();
        let author_id = post.author_id;

        // Drops out of the author's listing; the record itself stays
        // addressable for comment rendering.
        if let Some(author) = db.users.get_mut(&author_id) {
            author.posts.remove(&post_id);
        }

        Ok(post_id)
    }

    async fn get_posts(&self, user_id: i64) -> Result<Vec<PostView>, AppError> {
        let db = self.read();

        let user = db
            .users
            .get(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        let mut records: Vec<&PostRec> = user
            .posts
            .iter()
            .filter_map(|id| db.posts.get(id))
            .filter(|p| !p.is_deleted)
            .collect();
        records.sort_by(|a, b| b.upd_date.cmp(&a.upd_date).then(b.id.cmp(&a.id)));

        let views = records
            .into_iter()
            .map(|p| {
                let counts = db.post_like_counts(p.id);
                PostView {
                    id: p.id,
                    author_id: p.author_id,
                    title: p.title.clone(),
                    body: p.body.clone(),
                    is_commented: p.is_commented,
                    create_date: p.create_date,
                    upd_date: p.upd_date,
                    likes: counts.likes,
                    dislikes: counts.dislikes,
                }
            })
            .collect();

        Ok(views)
    }

    async fn create_comment(&self, input: NewComment) -> Result<i64, AppError> {
        let mut db = self.write();

        if !db.posts.contains_key(&input.post_id) {
            return Err(AppError::NotFound("post not found".to_string()));
        }
        if !db.users.contains_key(&input.author_id) {
            return Err(AppError::NotFound("user not found".to_string()));
        }
        if input.parent_id != 0 {
            let ok = db
                .comments
                .get(&input.parent_id)
                .map(|p| p.post_id == input.post_id)
                .unwrap_or(false);
            if !ok {
                return Err(AppError::NotFound("parent comment not found".to_string()));
            }
        }

        db.next_comment_id += 1;
        let id = db.next_comment_id;
        let now = Utc::now();
        db.comments.insert(
            id,
            CommentRec {
                id,
                post_id: input.post_id,
                parent_id: input.parent_id,
                author_id: input.author_id,
                body: input.body,
                is_deleted: false,
                create_date: now,
                upd_date: now,
                children: HashSet::new(),
            },
        );

        if input.parent_id != 0 {
            if let Some(parent) = db.comments.get_mut(&input.parent_id) {
                parent.children.insert(id);
            }
        }

        // Fan out to every active subscriber of the post.
        if let Some(subs) = db.subscriptions.get_mut(&input.post_id) {
            for sub in subs.values_mut() {
                if !sub.is_deleted {
                    sub.pending.push(id);
                }
            }
        }

        Ok(id)
    }

    async fn update_comment(&self, comment_id: i64, body: String) -> Result<i64, AppError> {
        let mut db = self.write();

        let comment = db
            .comments
            .get_mut(&comment_id)
            .filter(|c| !c.is_deleted)
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
        comment.body = body;
        comment.upd_date = Utc::now();

        Ok(comment_id)
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<i64, AppError> {
        let mut db = self.write();

        let comment = db
            .comments
            .get_mut(&comment_id)
            .filter(|c| !c.is_deleted)
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
        comment.is_deleted = true;
        comment.upd_date = Utc::now();
        let parent_id = comment.parent_id;

        // Detach from the parent's child set. The deleted comment's own
        // children stay linked to it so they can still render under it.
        if parent_id != 0 {
            if let Some(parent) = db.comments.get_mut(&parent_id) {
                parent.children.remove(&comment_id);
            }
        }

        Ok(comment_id)
    }

    async fn get_comments(
        &self,
        post_id: i64,
        parent_id: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<CommentView>, AppError> {
        let db = self.read();

        if !db.posts.contains_key(&post_id) {
            return Err(AppError::NotFound("post not found".to_string()));
        }

        // Candidate roots: every comment of the post at this level that is
        // not hidden (deleted with nothing left under it).
        let mut roots: Vec<&CommentRec> = db
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.parent_id == parent_id)
            .filter(|c| shared::is_visible(c.is_deleted, c.children.len()))
            .collect();
        roots.sort_by(|a, b| a.create_date.cmp(&b.create_date).then(a.id.cmp(&b.id)));

        let (start, end) = shared::page_window(roots.len(), page, per_page);
        let page_roots = &roots[start..end];

        let mut result = Vec::with_capacity(page_roots.len() * 2);
        for root in page_roots {
            result.push(db.comment_view(root));

            // The single earliest visible reply, flattened under its root.
            let preview = root
                .children
                .iter()
                .filter_map(|id| db.comments.get(id))
                .filter(|c| shared::is_visible(c.is_deleted, c.children.len()))
                .min_by(|a, b| a.create_date.cmp(&b.create_date).then(a.id.cmp(&b.id)));
            if let Some(child) = preview {
                result.push(db.comment_view(child));
            }
        }

        Ok(result)
    }

    async fn upd_post_likes(
        &self,
        actor_id: i64,
        post_id: i64,
        is_like: bool,
    ) -> Result<(), AppError> {
        let mut db = self.write();

        if !db.posts.contains_key(&post_id) {
            return Err(AppError::NotFound("post not found".to_string()));
        }
        if !db.users.contains_key(&actor_id) {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        let key = (actor_id, post_id);
        let current = db.post_likes.get(&key).copied();
        match shared::toggle(current, is_like) {
            Some(value) => db.post_likes.insert(key, value),
            None => db.post_likes.remove(&key),
        };

        Ok(())
    }

    async fn upd_comment_likes(
        &self,
        actor_id: i64,
        comment_id: i64,
        is_like: bool,
    ) -> Result<(), AppError> {
        let mut db = self.write();

        if !db.comments.contains_key(&comment_id) {
            return Err(AppError::NotFound("comment not found".to_string()));
        }
        if !db.users.contains_key(&actor_id) {
            return Err(AppError::NotFound("user not found".to_string()));
        }

        let key = (actor_id, comment_id);
        let current = db.comment_likes.get(&key).copied();
        match shared::toggle(current, is_like) {
            Some(value) => db.comment_likes.insert(key, value),
            None => db.comment_likes.remove(&key),
        };

        Ok(())
    }

    async fn get_post_likes(&self, post_id: i64) -> Result<LikeCounts, AppError> {
        let db = self.read();
        if !db.posts.contains_key(&post_id) {
            return Err(AppError::NotFound("post not found".to_string()));
        }
        Ok(db.post_like_counts(post_id))
    }

    async fn get_comment_likes(&self, comment_id: i64) -> Result<LikeCounts, AppError> {
        let db = self.read();
        if !db.comments.contains_key(&comment_id) {
            return Err(AppError::NotFound("comment not found".to_string()));
        }
        Ok(db.comment_like_counts(comment_id))
    }

    async fn create_subscription(&self, user_id: i64, post_id: i64) -> Result<i64, AppError> {
        let mut db = self.write();

        if !db.users.contains_key(&user_id) {
            return Err(AppError::NotFound("user not found".to_string()));
        }
        if !db.posts.contains_key(&post_id) {
            return Err(AppError::NotFound("post not found".to_string()));
        }

        if let Some(existing) = db
            .subscriptions
            .get_mut(&post_id)
            .and_then(|subs| subs.get_mut(&user_id))
        {
            // Reactivation keeps whatever pending comments accumulated.
            existing.is_deleted = false;
            existing.upd_date = Utc::now();
            return Ok(existing.id);
        }

        db.next_sub_id += 1;
        let id = db.next_sub_id;
        db.subscriptions.entry(post_id).or_default().insert(
            user_id,
            SubRec {
                id,
                is_deleted: false,
                upd_date: Utc::now(),
                pending: Vec::new(),
            },
        );

        Ok(id)
    }

    async fn delete_subscription(&self, user_id: i64, post_id: i64) -> Result<i64, AppError> {
        let mut db = self.write();

        let sub = db
            .subscriptions
            .get_mut(&post_id)
            .and_then(|subs| subs.get_mut(&user_id))
            .ok_or_else(|| AppError::NotFound("subscription not found".to_string()))?;
        sub.is_deleted = true;
        sub.upd_date = Utc::now();
        sub.pending.clear();

        Ok(sub.id)
    }

    async fn check_subscription(&self, user_id: i64, post_id: i64) -> Result<(), AppError> {
        let db = self.read();

        let active = db
            .subscriptions
            .get(&post_id)
            .and_then(|subs| subs.get(&user_id))
            .map(|s| !s.is_deleted)
            .unwrap_or(false);
        if !active {
            return Err(AppError::NotFound("subscription not found".to_string()));
        }

        Ok(())
    }

    async fn drain_new_comments(&self, user_id: i64, post_id: i64) -> Result<i64, AppError> {
        let mut db = self.write();

        let sub = db
            .subscriptions
            .get_mut(&post_id)
            .and_then(|subs| subs.get_mut(&user_id))
            .ok_or_else(|| AppError::NotFound("subscription not found".to_string()))?;

        let count = sub.pending.len() as i64;
        sub.pending.clear();

        Ok(count)
    }
}
