// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::error::{Error, Result};
use crate::models::{Board, Movement, Player};
use crate::repo::TacticsRepo;
use crate::schema::boards;

use super::PostgresRepo;

/// Row shape: player and movement lists travel as JSONB.
#[derive(Debug, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct BoardRow {
    id: String,
    owner_id: String,
    title: String,
    description: String,
    players: serde_json::Value,
    movements: serde_json::Value,
    image: Option<String>,
    is_shared: bool,
    created_at: DateTime<Utc>,
}

impl BoardRow {
    fn from_board(board: Board) -> Result<Self> {
        Ok(Self {
            id: board.id,
            owner_id: board.owner_id,
            title: board.title,
            description: board.description,
            players: serde_json::to_value(&board.players).map_err(Error::backend)?,
            movements: serde_json::to_value(&board.movements).map_err(Error::backend)?,
            image: board.image,
            is_shared: board.is_shared,
            created_at: board.created_at,
        })
    }

    fn into_board(self) -> Result<Board> {
        let players: Vec<Player> =
            serde_json::from_value(self.players).map_err(Error::backend)?;
        let movements: Vec<Movement> =
            serde_json::from_value(self.movements).map_err(Error::backend)?;
        Ok(Board {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            players,
            movements,
            image: self.image,
            is_shared: self.is_shared,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl TacticsRepo for PostgresRepo {
    async fn upsert_board(&self, board: Board) -> Result<()> {
        let mut conn = self.conn().await?;
        let row = BoardRow::from_board(board)?;
        diesel::insert_into(boards::table)
            .values(&row)
            .on_conflict(boards::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        Ok(())
    }

    async fn board(&self, id: &str) -> Result<Option<Board>> {
        let mut conn = self.conn().await?;
        let row: Option<BoardRow> = boards::table
            .find(id)
            .select(BoardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Error::backend)?;
        row.map(BoardRow::into_board).transpose()
    }

    async fn boards_by_owner(&self, owner_id: &str) -> Result<Vec<Board>> {
        let mut conn = self.conn().await?;
        let rows: Vec<BoardRow> = boards::table
            .filter(boards::owner_id.eq(owner_id))
            .order(boards::created_at.desc())
            .select(BoardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(Error::backend)?;
        rows.into_iter().map(BoardRow::into_board).collect()
    }

    async fn shared_boards(&self) -> Result<Vec<Board>> {
        let mut conn = self.conn().await?;
        let rows: Vec<BoardRow> = boards::table
            .filter(boards::is_shared.eq(true))
            .order(boards::created_at.desc())
            .select(BoardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(Error::backend)?;
        rows.into_iter().map(BoardRow::into_board).collect()
    }

    async fn delete_board(&self, id: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        diesel::delete(boards::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        Ok(())
    }

    async fn set_shared(&self, id: &str, value: bool) -> Result<()> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(boards::table.find(id))
            .set(boards::is_shared.eq(value))
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        if updated == 0 {
            return Err(Error::NotFound("board", id.to_string()));
        }
        Ok(())
    }
}
