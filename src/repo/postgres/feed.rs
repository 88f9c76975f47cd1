// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::error::{Error, Result};
use crate::models::{Comment, Like, Post};
use crate::repo::FeedRepo;
use crate::schema::{comments, likes, posts};

use super::PostgresRepo;

#[async_trait]
impl FeedRepo for PostgresRepo {
    async fn insert_post(&self, post: Post) -> Result<()> {
        let mut conn = self.conn().await?;
        diesel::insert_into(posts::table)
            .values(&post)
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        Ok(())
    }

    async fn feed(&self) -> Result<Vec<Post>> {
        let mut conn = self.conn().await?;
        posts::table
            .order(posts::created_at.desc())
            .select(Post::as_select())
            .load(&mut conn)
            .await
            .map_err(Error::backend)
    }

    async fn post(&self, id: &str) -> Result<Option<Post>> {
        let mut conn = self.conn().await?;
        posts::table
            .find(id)
            .select(Post::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Error::backend)
    }

    async fn delete_post(&self, id: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        // Comments and likes go with the post via ON DELETE CASCADE.
        diesel::delete(posts::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        Ok(())
    }

    async fn like_exists(&self, post_id: &str, account_id: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let count: i64 = likes::table
            .filter(likes::post_id.eq(post_id))
            .filter(likes::account_id.eq(account_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(Error::backend)?;
        Ok(count > 0)
    }

    async fn add_like(&self, like: Like) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(likes::table)
                    .values(&like)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                if inserted > 0 {
                    diesel::update(posts::table.find(&like.post_id))
                        .set(posts::like_count.eq(posts::like_count + 1))
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(Error::backend)
    }

    async fn remove_like(&self, post_id: &str, account_id: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let removed = diesel::delete(
                    likes::table
                        .filter(likes::post_id.eq(post_id))
                        .filter(likes::account_id.eq(account_id)),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    diesel::update(posts::table.find(post_id))
                        .set(posts::like_count.eq(diesel::dsl::sql::<diesel::sql_types::Integer>(
                            "GREATEST(like_count - 1, 0)",
                        )))
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(Error::backend)
    }

    async fn add_comment(&self, comment: Comment) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(comments::table)
                    .values(&comment)
                    .execute(conn)
                    .await?;
                diesel::update(posts::table.find(&comment.post_id))
                    .set(posts::comment_count.eq(posts::comment_count + 1))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(Error::backend)
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let mut conn = self.conn().await?;
        comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::created_at.desc())
            .select(Comment::as_select())
            .load(&mut conn)
            .await
            .map_err(Error::backend)
    }
}
