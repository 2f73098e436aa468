//! The fetcher abstraction shared by the weather and flight clients.

use std::future::Future;

use futures::future::join_all;
use serde::de::DeserializeOwned;

use super::error::LookupError;

/// Something that turns a free-text query into a record.
///
/// This abstraction allows callers to be tested with mock data and lets
/// [`super::CachedFetcher`] wrap any client.
pub trait DetailsFetcher {
    /// What a successful lookup returns.
    type Record;

    /// Look up `query`.
    fn fetch_details(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Self::Record, LookupError>> + Send;
}

/// Run one lookup per query concurrently.
///
/// Results are returned in the order of `queries`, each paired with its
/// query. One failed lookup does not affect the others.
pub async fn fetch_all<F, S>(
    fetcher: &F,
    queries: &[S],
) -> Vec<(String, Result<F::Record, LookupError>)>
where
    F: DetailsFetcher,
    S: AsRef<str>,
{
    let lookups = queries.iter().map(|q| async move {
        let query = q.as_ref();
        (query.to_string(), fetcher.fetch_details(query).await)
    });
    join_all(lookups).await
}

/// Map an HTTP response to a decoded body or a [`LookupError`].
pub(crate) async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    query: &str,
) -> Result<T, LookupError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(LookupError::Unauthorized);
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(LookupError::NotFound {
            query: query.to_string(),
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LookupError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| LookupError::Json {
        message: e.to_string(),
    })
}
