//! HTTP core of the XSI client
//!
//! Redirects are followed by hand so the same method, body and credentials
//! are replayed against the new location.

use crate::config::XsiConfig;
use crate::digest::{cnonce, DigestChallenge};
use crate::error::{XsiError, XsiResult};
use bwks_xml_core::{parse, serialize, Document};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION, WWW_AUTHENTICATE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::fmt;
use tracing::{debug, info, trace, warn};
use url::Url;

const ACTIONS_PATH: &str = "com.broadsoft.xsi-actions/v2.0/user";

#[derive(Clone, Copy)]
enum Credentials<'a> {
    Basic { username: &'a str, password: &'a str },
    Digest { username: &'a str, password: &'a str },
}

/// Authenticated XSI-Actions client for one user
pub struct XsiClient {
    http: Client,
    config: XsiConfig,
    username: String,
    password: String,
}

impl XsiClient {
    /// Create a client for `username`
    pub fn new(
        config: XsiConfig,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> XsiResult<Self> {
        Url::parse(config.root())
            .map_err(|e| XsiError::config(format!("invalid base URL '{}': {}", config.base_url, e)))?;

        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| XsiError::config(format!("failed to build HTTP client: {}", e)))?;

        let username = username.into();
        info!(base_url = config.root(), user = %username, "XSI client created");

        Ok(Self {
            http,
            config,
            username,
            password: password.into(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn config(&self) -> &XsiConfig {
        &self.config
    }

    /// Full URL of a user-scoped endpoint such as `services/donotdisturb`
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.root(),
            ACTIONS_PATH,
            self.username,
            endpoint.trim_start_matches('/')
        )
    }

    /// GET an endpoint and parse the response document
    pub async fn get(&self, endpoint: &str) -> XsiResult<Document> {
        let url = self.endpoint_url(endpoint);
        let body = self.request(Method::GET, &url, None, self.basic()).await?;
        Ok(parse(&body)?)
    }

    /// PUT a document to an endpoint; `true` once the server accepted it
    pub async fn put(&self, endpoint: &str, doc: &Document) -> XsiResult<bool> {
        let url = self.endpoint_url(endpoint);
        let body = serialize(doc)?;
        trace!(url = %url, body = %body, "XSI PUT body");
        self.request(Method::PUT, &url, Some(body), self.basic()).await?;
        Ok(true)
    }

    /// DELETE an endpoint; `true` once the server accepted it
    pub async fn delete(&self, endpoint: &str) -> XsiResult<bool> {
        let url = self.endpoint_url(endpoint);
        self.request(Method::DELETE, &url, None, self.basic()).await?;
        Ok(true)
    }

    /// GET an absolute URL with HTTP Digest credentials, returning the raw body
    pub async fn get_with_digest(&self, url: &str, username: &str, password: &str) -> XsiResult<Vec<u8>> {
        self.request(Method::GET, url, None, Credentials::Digest { username, password })
            .await
    }

    fn basic(&self) -> Credentials<'_> {
        Credentials::Basic {
            username: &self.username,
            password: &self.password,
        }
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        credentials: Credentials<'_>,
    ) -> XsiResult<Vec<u8>> {
        let mut target = url.to_string();
        let mut hops = 0;

        loop {
            debug!(method = %method, url = %target, "XSI request");
            let response = self
                .send(method.clone(), &target, body.clone(), credentials)
                .await?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| XsiError::http(&target, status.as_u16(), "redirect without Location"))?;
                if hops >= self.config.max_redirects {
                    warn!(url = %url, hops, "redirect limit reached");
                    return Err(XsiError::TooManyRedirects {
                        url: url.to_string(),
                        hops,
                    });
                }
                let next = resolve_location(&target, location)?;
                debug!(from = %target, to = %next, status = status.as_u16(), "following redirect");
                target = next;
                hops += 1;
                continue;
            }

            let bytes = response.bytes().await?;
            if !status.is_success() {
                let body = String::from_utf8_lossy(&bytes).into_owned();
                warn!(url = %target, status = status.as_u16(), "XSI request failed");
                return Err(XsiError::http(target, status.as_u16(), body));
            }
            trace!(url = %target, size = bytes.len(), "XSI response");
            return Ok(bytes.to_vec());
        }
    }

    // One HTTP exchange; Digest credentials answer a 401 challenge once
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        credentials: Credentials<'_>,
    ) -> XsiResult<Response> {
        match credentials {
            Credentials::Basic { username, password } => Ok(self
                .build(method, url, body)
                .basic_auth(username, Some(password))
                .send()
                .await?),
            Credentials::Digest { username, password } => {
                let first = self.build(method.clone(), url, body.clone()).send().await?;
                if first.status() != StatusCode::UNAUTHORIZED {
                    return Ok(first);
                }
                let challenge = first
                    .headers()
                    .get_all(WWW_AUTHENTICATE)
                    .iter()
                    .filter_map(|v| v.to_str().ok())
                    .find_map(DigestChallenge::parse);
                let Some(challenge) = challenge else {
                    return Ok(first);
                };

                let uri = request_uri(url)?;
                let authorization =
                    challenge.authorization(method.as_str(), &uri, username, password, &cnonce(), 1);
                debug!(url = %url, realm = %challenge.realm, "answering digest challenge");
                Ok(self
                    .build(method, url, body)
                    .header(AUTHORIZATION, authorization)
                    .send()
                    .await?)
            }
        }
    }

    fn build(&self, method: Method, url: &str, body: Option<String>) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/xml; charset=UTF-8")
                .body(body),
            None => builder,
        }
    }
}

impl fmt::Debug for XsiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XsiClient")
            .field("base_url", &self.config.root())
            .field("username", &self.username)
            .finish()
    }
}

fn resolve_location(current: &str, location: &str) -> XsiResult<String> {
    let base = Url::parse(current).map_err(|e| XsiError::transport(format!("bad URL '{}': {}", current, e)))?;
    let next = base
        .join(location)
        .map_err(|e| XsiError::transport(format!("bad redirect location '{}': {}", location, e)))?;
    Ok(next.to_string())
}

// Path and query as sent on the request line
fn request_uri(url: &str) -> XsiResult<String> {
    let parsed = Url::parse(url).map_err(|e| XsiError::transport(format!("bad URL '{}': {}", url, e)))?;
    let mut uri = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        uri.push('?');
        uri.push_str(query);
    }
    Ok(uri)
}
