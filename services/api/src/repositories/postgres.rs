//! PostgreSQL implementation of the store

use async_trait::async_trait;
use common::{
    error::{DatabaseError, DatabaseResult},
    ids::{FavouriteId, NoteId, UserId},
};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;

use super::Store;
use crate::models::{Favourite, NewFavourite, Note, User};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach notes to freshly loaded favourites, preserving favourite order
    async fn with_notes(&self, favourites: Vec<Favourite>) -> DatabaseResult<Vec<Favourite>> {
        if favourites.is_empty() {
            return Ok(favourites);
        }

        let ids: Vec<i64> = favourites.iter().map(|f| f.id.0).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, favourite_id, content, created_at, updated_at
            FROM notes
            WHERE favourite_id = ANY($1)
            ORDER BY id DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        let mut by_favourite: HashMap<FavouriteId, Vec<Note>> = HashMap::new();
        for row in &rows {
            let note = note_from_row(row);
            by_favourite.entry(note.favourite_id).or_default().push(note);
        }

        Ok(favourites
            .into_iter()
            .map(|mut favourite| {
                favourite.notes = by_favourite.remove(&favourite.id).unwrap_or_default();
                favourite
            })
            .collect())
    }
}

fn favourite_from_row(row: &PgRow) -> Favourite {
    Favourite {
        id: row.get("id"),
        user_id: row.get("user_id"),
        pokemon_id: row.get("pokemon_id"),
        pokemon_name: row.get("pokemon_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        notes: Vec::new(),
    }
}

fn note_from_row(row: &PgRow) -> Note {
    Note {
        id: row.get("id"),
        favourite_id: row.get("favourite_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: UserId) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            username: row.get("username"),
            name: row.get("name"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    async fn favourite_owner(&self, id: FavouriteId) -> DatabaseResult<Option<UserId>> {
        sqlx::query_scalar("SELECT user_id FROM favourites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn note_owner(&self, id: NoteId) -> DatabaseResult<Option<UserId>> {
        sqlx::query_scalar(
            r#"
            SELECT f.user_id
            FROM notes n
            JOIN favourites f ON f.id = n.favourite_id
            WHERE n.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn list_favourites(&self, user_id: UserId) -> DatabaseResult<Vec<Favourite>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, pokemon_id, pokemon_name, created_at, updated_at
            FROM favourites
            WHERE user_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        let favourites = rows.iter().map(favourite_from_row).collect();
        self.with_notes(favourites).await
    }

    async fn find_favourite(&self, id: FavouriteId) -> DatabaseResult<Option<Favourite>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, pokemon_id, pokemon_name, created_at, updated_at
            FROM favourites
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        match row {
            Some(row) => {
                let mut favourite = favourite_from_row(&row);
                favourite.notes = self.list_notes(favourite.id).await?;
                Ok(Some(favourite))
            }
            None => Ok(None),
        }
    }

    async fn find_favourite_by_pokemon(
        &self,
        user_id: UserId,
        pokemon_id: i32,
    ) -> DatabaseResult<Option<Favourite>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, pokemon_id, pokemon_name, created_at, updated_at
            FROM favourites
            WHERE user_id = $1 AND pokemon_id = $2
            "#,
        )
        .bind(user_id)
        .bind(pokemon_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(favourite_from_row))
    }

    async fn insert_favourite(&self, new: &NewFavourite) -> DatabaseResult<Favourite> {
        let row = sqlx::query(
            r#"
            INSERT INTO favourites (user_id, pokemon_id, pokemon_name)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, pokemon_id, pokemon_name, created_at, updated_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.pokemon_id)
        .bind(&new.pokemon_name)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(favourite_from_row(&row))
    }

    async fn delete_favourite(&self, id: FavouriteId) -> DatabaseResult<bool> {
        // Notes go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM favourites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_notes(&self, favourite_id: FavouriteId) -> DatabaseResult<Vec<Note>> {
        let rows = sqlx::query(
            r#"
            SELECT id, favourite_id, content, created_at, updated_at
            FROM notes
            WHERE favourite_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(favourite_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn find_note(&self, id: NoteId) -> DatabaseResult<Option<Note>> {
        let row = sqlx::query(
            r#"
            SELECT id, favourite_id, content, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn insert_note(&self, favourite_id: FavouriteId, content: &str) -> DatabaseResult<Note> {
        let row = sqlx::query(
            r#"
            INSERT INTO notes (favourite_id, content)
            VALUES ($1, $2)
            RETURNING id, favourite_id, content, created_at, updated_at
            "#,
        )
        .bind(favourite_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(note_from_row(&row))
    }

    async fn update_note(&self, id: NoteId, content: &str) -> DatabaseResult<Option<Note>> {
        let row = sqlx::query(
            r#"
            UPDATE notes
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, favourite_id, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_note(&self, id: NoteId) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}
