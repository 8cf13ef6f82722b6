// src/comments.rs
//
// Threaded comments for stories. All reads and writes for the comment
// tables go through `CommentService`; HTTP handlers stay thin shells
// around it so the rules here also hold for any future callers.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::comment::{Comment, CommentNode, CommentOrder, CommentTreeRow, LikeOutcome},
};

/// Deepest allowed nesting level. Top-level comments sit at depth 0,
/// so a thread holds three levels total: comment, reply, reply-to-reply.
pub const MAX_COMMENT_DEPTH: i64 = 2;

#[derive(Clone)]
pub struct CommentService {
    pool: SqlitePool,
}

impl CommentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a comment, either top-level or as a reply.
    ///
    /// A reply's depth is its parent's depth plus one; replies under a
    /// comment already at `MAX_COMMENT_DEPTH` are rejected rather than
    /// reattached elsewhere. All checks run before the insert, inside one
    /// transaction, so a failed create leaves nothing behind.
    pub async fn create(
        &self,
        story_id: i64,
        author_id: i64,
        body: &str,
        parent_id: Option<i64>,
    ) -> Result<Comment, AppError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::BadRequest(
                "Comment body must not be empty".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let story = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM stories WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(story_id)
        .fetch_optional(&mut *tx)
        .await?;
        if story.is_none() {
            return Err(AppError::NotFound("Story not found".to_string()));
        }

        let author = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await?;
        if author.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let depth = match parent_id {
            Some(pid) => {
                let (parent_story_id, parent_depth) = sqlx::query_as::<_, (i64, i64)>(
                    "SELECT story_id, depth FROM comments WHERE id = ?",
                )
                .bind(pid)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::NotFound("Parent comment not found".to_string()))?;

                if parent_story_id != story_id {
                    return Err(AppError::BadRequest(
                        "Parent comment belongs to a different story".to_string(),
                    ));
                }
                if parent_depth >= MAX_COMMENT_DEPTH {
                    return Err(AppError::DepthExceeded(format!(
                        "Comments can only be nested {} levels deep",
                        MAX_COMMENT_DEPTH + 1
                    )));
                }
                parent_depth + 1
            }
            None => 0,
        };

        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (story_id, user_id, parent_id, depth, body, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(story_id)
        .bind(author_id)
        .bind(parent_id)
        .bind(depth)
        .bind(body)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Comment {
            id,
            story_id,
            user_id: author_id,
            parent_id,
            depth,
            body: body.to_string(),
            created_at: now,
        })
    }

    /// Fetches the full comment forest for a story.
    ///
    /// One query regardless of thread size: comments joined with their
    /// authors and like aggregates, then stitched into a tree in memory.
    /// Siblings come back in creation order at every level ('oldest'
    /// default; 'newest' flips each level).
    pub async fn tree(
        &self,
        story_id: i64,
        viewer: Option<i64>,
        order: CommentOrder,
    ) -> Result<Vec<CommentNode>, AppError> {
        let story = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM stories WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(story_id)
        .fetch_optional(&self.pool)
        .await?;
        if story.is_none() {
            return Err(AppError::NotFound("Story not found".to_string()));
        }

        let rows = sqlx::query_as::<_, CommentTreeRow>(
            r#"
            SELECT
                c.id, c.story_id, c.user_id,
                u.username,
                u.full_name AS author_full_name,
                u.avatar_url AS author_avatar_url,
                c.parent_id, c.depth, c.body, c.created_at,
                COUNT(cl.user_id) AS like_count,
                COALESCE(SUM(cl.user_id = ?1), 0) AS liked_by_viewer
            FROM comments c
            JOIN users u ON u.id = c.user_id
            LEFT JOIN comment_likes cl ON cl.comment_id = c.id
            WHERE c.story_id = ?2
            GROUP BY c.id
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(viewer)
        .bind(story_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble_tree(rows, order))
    }

    /// Toggles the requesting user's like on a comment and returns the new
    /// state with the authoritative count.
    ///
    /// Delete-then-insert inside one transaction. The INSERT is
    /// conflict-tolerant, and the UNIQUE (comment_id, user_id) key is the
    /// backstop: concurrent duplicate requests can never net more than
    /// one stored like.
    pub async fn toggle_like(
        &self,
        comment_id: i64,
        user_id: i64,
    ) -> Result<LikeOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let comment = sqlx::query_scalar::<_, i64>("SELECT id FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&mut *tx)
            .await?;
        if comment.is_none() {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        let user = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if user.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let removed = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let liked = if removed == 0 {
            sqlx::query(
                r#"
                INSERT INTO comment_likes (comment_id, user_id, created_at)
                VALUES (?, ?, ?)
                ON CONFLICT (comment_id, user_id) DO NOTHING
                "#,
            )
            .bind(comment_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
            true
        } else {
            false
        };

        let like_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?",
        )
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LikeOutcome { liked, like_count })
    }

    /// Deletes a comment.
    ///
    /// Allowed for the comment's author and for moderators/admins.
    /// Replies and likes go with it via ON DELETE CASCADE.
    pub async fn delete(&self, comment_id: i64, requester_id: i64) -> Result<(), AppError> {
        let role = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = ?")
            .bind(requester_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

        let author_id = sqlx::query_scalar::<_, i64>("SELECT user_id FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("Comment not found".to_string()))?;

        let is_moderator = matches!(role.as_str(), "moderator" | "admin");
        if author_id != requester_id && !is_moderator {
            return Err(AppError::Forbidden(
                "Only the comment author or a moderator can delete a comment".to_string(),
            ));
        }

        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Total comments on a story, derived on demand.
    pub async fn count_for_story(&self, story_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE story_id = ?")
                .bind(story_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

/// Buckets flat rows by depth, then attaches the deepest level first so
/// parents already carry their subtrees when they are attached themselves.
/// Rows arrive sorted ascending by (created_at, id); 'newest' ordering
/// reverses each sibling list rather than re-sorting.
fn assemble_tree(rows: Vec<CommentTreeRow>, order: CommentOrder) -> Vec<CommentNode> {
    let mut roots: Vec<CommentNode> = Vec::new();
    let mut replies: Vec<CommentNode> = Vec::new();
    let mut leaves: Vec<CommentNode> = Vec::new();

    for row in rows {
        let node = CommentNode::from(row);
        match node.depth {
            0 => roots.push(node),
            1 => replies.push(node),
            _ => leaves.push(node),
        }
    }

    attach(&mut replies, leaves, order);
    attach(&mut roots, replies, order);

    if order == CommentOrder::Newest {
        roots.reverse();
    }
    roots
}

fn attach(parents: &mut [CommentNode], children: Vec<CommentNode>, order: CommentOrder) {
    let mut by_parent: HashMap<i64, Vec<CommentNode>> = HashMap::new();
    for child in children {
        if let Some(parent_id) = child.parent_id {
            by_parent.entry(parent_id).or_default().push(child);
        }
    }

    for parent in parents.iter_mut() {
        if let Some(mut kids) = by_parent.remove(&parent.id) {
            if order == CommentOrder::Newest {
                kids.reverse();
            }
            parent.replies = kids;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn row(id: i64, parent_id: Option<i64>, depth: i64, offset_secs: i64) -> CommentTreeRow {
        CommentTreeRow {
            id,
            story_id: 1,
            user_id: 1,
            username: "author".to_string(),
            author_full_name: None,
            author_avatar_url: None,
            parent_id,
            depth,
            body: format!("comment {}", id),
            created_at: Utc::now() + Duration::seconds(offset_secs),
            like_count: 0,
            liked_by_viewer: 0,
        }
    }

    #[test]
    fn assembles_three_levels() {
        let rows = vec![
            row(1, None, 0, 0),
            row(2, Some(1), 1, 1),
            row(3, Some(2), 2, 2),
            row(4, None, 0, 3),
        ];

        let tree = assemble_tree(rows, CommentOrder::Oldest);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].id, 2);
        assert_eq!(tree[0].replies[0].replies[0].id, 3);
        assert!(tree[1].replies.is_empty());
    }

    #[test]
    fn newest_order_reverses_every_level() {
        let rows = vec![
            row(1, None, 0, 0),
            row(2, None, 0, 1),
            row(3, Some(1), 1, 2),
            row(4, Some(1), 1, 3),
        ];

        let tree = assemble_tree(rows, CommentOrder::Newest);

        assert_eq!(tree[0].id, 2);
        assert_eq!(tree[1].id, 1);
        assert_eq!(tree[1].replies[0].id, 4);
        assert_eq!(tree[1].replies[1].id, 3);
    }

    #[test]
    fn oldest_order_keeps_creation_order() {
        let rows = vec![
            row(1, None, 0, 0),
            row(2, None, 0, 1),
            row(3, Some(2), 1, 2),
            row(4, Some(2), 1, 3),
        ];

        let tree = assemble_tree(rows, CommentOrder::Oldest);

        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[1].id, 2);
        assert_eq!(tree[1].replies[0].id, 3);
        assert_eq!(tree[1].replies[1].id, 4);
    }
}
