//! REST implementation of the persistence gateway.
//!
//! Speaks PostgREST conventions against the external store: one resource
//! per table under `/rest/v1/`, exact-match filters as `column=eq.value`
//! query parameters, and the service key in both the `apikey` and
//! `Authorization` headers.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value, json};

use crate::{SessionStore, StoreError};

/// Connect timeout for the underlying HTTP client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the external session store.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestStore {
    /// Builds a store client for the given endpoint.
    ///
    /// `timeout` bounds every request; the store is otherwise a dependency
    /// with unbounded latency sitting on the realtime path.
    ///
    /// # Errors
    /// Returns [`StoreError::Client`] if the HTTP client cannot be built.
    pub fn new(
        base_url: String,
        service_key: String,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        op: &'static str,
    ) -> Result<(), StoreError> {
        let response = request
            .header("apikey", &self.service_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header("Prefer", "return=minimal")
            .send()
            .await
            .map_err(|source| StoreError::Request { op, source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(op, status = status.as_u16(), %body, "store rejected request");
        Err(StoreError::Rejected {
            op,
            status: status.as_u16(),
            body,
        })
    }
}

impl SessionStore for RestStore {
    async fn record_join(&self, session_id: &str, user_id: &str) -> Result<(), StoreError> {
        let request = self.client.post(self.table_url("game_session_players")).json(&json!({
            "session_id": session_id,
            "user_id": user_id,
            "is_ready": false,
        }));
        self.execute(request, "membership insert").await
    }

    async fn record_leave(&self, session_id: &str, user_id: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.table_url("game_session_players"))
            .query(&[
                ("session_id", eq(session_id)),
                ("user_id", eq(user_id)),
            ]);
        self.execute(request, "membership delete").await
    }

    async fn update_session_status(
        &self,
        session_id: &str,
        status: &str,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.table_url("game_sessions"))
            .query(&[("id", eq(session_id))])
            .json(&json!({ "status": status }));
        self.execute(request, "session status update").await
    }

    async fn record_round(&self, session_id: &str, round: &Value) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.table_url("game_rounds"))
            .json(&round_row(session_id, round));
        self.execute(request, "round insert").await
    }
}

/// Formats an exact-match filter value, `eq.<value>`.
fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// Builds the `game_rounds` row: the round payload's own fields plus the
/// session id. Non-object payloads are wrapped under a `payload` column so
/// the row is still insertable.
fn round_row(session_id: &str, round: &Value) -> Value {
    let mut row = match round {
        Value::Object(map) => map.clone(),
        other => {
            let mut map = Map::new();
            map.insert("payload".into(), other.clone());
            map
        }
    };
    row.insert("session_id".into(), Value::String(session_id.to_owned()));
    Value::Object(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_joins_cleanly() {
        let store = RestStore::new(
            "https://store.example.com/".into(),
            "key".into(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            store.table_url("game_rounds"),
            "https://store.example.com/rest/v1/game_rounds"
        );
    }

    #[test]
    fn test_eq_filter_format() {
        assert_eq!(eq("R1"), "eq.R1");
    }

    #[test]
    fn test_round_row_injects_session_id() {
        let round = json!({"word": "cat", "strokes": 12});
        let row = round_row("R1", &round);
        assert_eq!(row["session_id"], "R1");
        assert_eq!(row["word"], "cat");
        assert_eq!(row["strokes"], 12);
    }

    #[test]
    fn test_round_row_wraps_non_object_payload() {
        let row = round_row("R1", &json!([1, 2, 3]));
        assert_eq!(row["session_id"], "R1");
        assert_eq!(row["payload"], json!([1, 2, 3]));
    }

    #[test]
    fn test_round_row_session_id_wins_over_payload() {
        // A payload that tries to smuggle its own session_id is overridden.
        let row = round_row("R1", &json!({"session_id": "evil"}));
        assert_eq!(row["session_id"], "R1");
    }
}
