//! Notes table over the REST interface

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::{ensure_success, SupabaseClient};
use crate::backend::NotesRepository;
use crate::config::NOTES_TABLE;
use crate::domain::{NoteRow, RemoteError, RemoteResult, ValidNote};

#[derive(Serialize)]
struct InsertNoteArgs<'a> {
    user_id: &'a str,
    text: &'a str,
    label: Option<&'a str>,
}

/// `column=eq.value` filter
fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

#[async_trait(?Send)]
impl NotesRepository for SupabaseClient {
    async fn fetch_notes(&self, owner_id: &str) -> RemoteResult<Vec<NoteRow>> {
        let url = self.config().rest_url(NOTES_TABLE);
        let response = self
            .authorized(Method::GET, &url)
            .await?
            .query(&[
                ("select", "*".to_string()),
                ("user_id", eq(owner_id)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<NoteRow> = ensure_success(response).await?.json().await?;
        log::debug!("Fetched {} notes", rows.len());
        Ok(rows)
    }

    async fn insert_note(&self, owner_id: &str, note: &ValidNote) -> RemoteResult<NoteRow> {
        let url = self.config().rest_url(NOTES_TABLE);
        let args = InsertNoteArgs {
            user_id: owner_id,
            text: &note.text,
            label: note.label.as_deref(),
        };
        let response = self
            .authorized(Method::POST, &url)
            .await?
            .header("Prefer", "return=representation")
            // single object instead of a one-element array
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(&args)
            .send()
            .await?;
        let row: NoteRow = ensure_success(response).await?.json().await?;
        Ok(row)
    }

    async fn delete_note(&self, owner_id: &str, id: &str) -> RemoteResult<()> {
        let url = self.config().rest_url(NOTES_TABLE);
        let response = self
            .authorized(Method::DELETE, &url)
            .await?
            .query(&[("id", eq(id)), ("user_id", eq(owner_id))])
            .send()
            .await
            .map_err(RemoteError::from)?;
        ensure_success(response).await?;
        Ok(())
    }
}
