use log::{debug, error};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{ApiError, ApiResult};

/// A typed client for the RevMix backend.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the backend at `backend_url`, which must not include the `/api` prefix.
    pub fn new(backend_url: &str) -> ApiResult<Self> {
        let base = Url::parse(backend_url)?;

        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        Ok(Self {
            http: Client::new(),
            base,
            token: None,
        })
    }

    /// Returns a client that authenticates with the given access token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds the url of an endpoint under `/api`, escaping every segment
    pub(crate) fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .extend(segments);

        Ok(url)
    }

    pub(crate) async fn get<T>(&self, url: Url) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        self.send(Method::GET, url, None::<&()>).await
    }

    pub(crate) async fn post<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, url, Some(body)).await
    }

    /// Posts without a body, for actions fully described by their url
    pub(crate) async fn post_empty<T>(&self, url: Url) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        self.send(Method::POST, url, None::<&()>).await
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, url.path());

        let mut request = self.http.request(method.clone(), url.clone());

        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            let error = ApiError::Network(e.to_string());
            error!("{} {} failed: {}", method, url.path(), error);
            error
        })?;

        if !response.status().is_success() {
            let error = ApiError::from_response(response).await;
            error!("{} {} failed: {}", method, url.path(), error);
            return Err(error);
        }

        response.json::<T>().await.map_err(|e| {
            let error = ApiError::Parse(e.to_string());
            error!("{} {} returned an unexpected body: {}", method, url.path(), error);
            error
        })
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::ApiClient;
    use crate::ApiError;

    #[test]
    fn endpoint_urls_are_nested_under_api() {
        let client = ApiClient::new("http://localhost:8001").unwrap();
        assert_eq!(
            client.url(&["rooms", "a b"]).unwrap().as_str(),
            "http://localhost:8001/api/rooms/a%20b"
        );

        let client = ApiClient::new("https://revmix.example/backend/").unwrap();
        assert_eq!(
            client.url(&["users", "me"]).unwrap().as_str(),
            "https://revmix.example/backend/api/users/me"
        );
    }

    #[test]
    fn unusable_urls_are_refused() {
        assert_matches!(ApiClient::new("not a url"), Err(ApiError::InvalidUrl(_)));
        assert_matches!(ApiClient::new("mailto:mc@revmix"), Err(ApiError::InvalidUrl(_)));
    }
}
