use super::{decode, send, BackendError, SupabaseClient, TesterStore};
use crate::models::tester::{FeedbackFields, NewFeedback, TesterFeedback, TesterTag};
use crate::utils::storage::KeyValueStore;
use gloo_net::http::Request;
use leptos::logging::log;
use serde::Deserialize;

/// PostgREST path for `table` filtered by `column = value` pairs.
pub fn table_query(table: &str, select: &str, filters: &[(&str, &str)], limit: Option<usize>) -> String {
    let mut query = format!("/rest/v1/{}?select={}", table, urlencoding::encode(select));
    for (column, value) in filters {
        query.push_str(&format!("&{}=eq.{}", column, urlencoding::encode(value)));
    }
    if let Some(limit) = limit {
        query.push_str(&format!("&limit={}", limit));
    }
    query
}

#[derive(Deserialize)]
struct ProfileRow {
    display_name: Option<String>,
}

impl<S: KeyValueStore> TesterStore for SupabaseClient<S> {
    async fn find_tag(&self, code: &str) -> Result<Option<TesterTag>, BackendError> {
        let path = table_query("tester_tags", "*", &[("code", code)], Some(1));
        let response = send(self.authorized(Request::get(&self.endpoint(&path))), None).await?;
        let mut rows: Vec<TesterTag> = decode(response).await?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    async fn find_feedback(&self, tag_id: &str, user_id: &str) -> Result<Option<TesterFeedback>, BackendError> {
        let path = table_query(
            "tester_feedback",
            "*",
            &[("tester_tag_id", tag_id), ("tester_id", user_id)],
            Some(1),
        );
        let response = send(self.authorized(Request::get(&self.endpoint(&path))), None).await?;
        let mut rows: Vec<TesterFeedback> = decode(response).await?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    async fn display_name(&self, user_id: &str) -> Result<Option<String>, BackendError> {
        let path = table_query("profiles", "display_name", &[("id", user_id)], Some(1));
        let response = send(self.authorized(Request::get(&self.endpoint(&path))), None).await?;
        let rows: Vec<ProfileRow> = decode(response).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.display_name)
            .filter(|name| !name.trim().is_empty()))
    }

    async fn insert_feedback(&self, row: &NewFeedback) -> Result<(), BackendError> {
        let body = serde_json::to_value(row).map_err(|e| BackendError::Decode(e.to_string()))?;
        let builder = self
            .authorized(Request::post(&self.endpoint("/rest/v1/tester_feedback")))
            .header("Prefer", "return=minimal");
        send(builder, Some(&body)).await?;
        log!("[FEEDBACK] Inserted feedback for tag {}", row.tester_tag_id);
        Ok(())
    }

    async fn update_feedback(&self, id: &str, fields: &FeedbackFields) -> Result<(), BackendError> {
        let body = serde_json::to_value(fields).map_err(|e| BackendError::Decode(e.to_string()))?;
        let path = format!("/rest/v1/tester_feedback?id=eq.{}", urlencoding::encode(id));
        let builder = self
            .authorized(Request::patch(&self.endpoint(&path)))
            .header("Prefer", "return=minimal");
        send(builder, Some(&body)).await?;
        log!("[FEEDBACK] Updated feedback {}", id);
        Ok(())
    }
}
