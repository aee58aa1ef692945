//! A [`Connection`] that keeps everything in memory.
//!
//! The request is held as `http` crate types and the response is recorded as
//! a list of [`Action`]s. Once a middleware is done, the actions can be
//! inspected or rendered into an [`http::Response`].
//!
//! Cloning a `MemoryConnection` clones the recorded actions too, which is
//! what lets [`alt`][crate::Middleware::alt] start over from an earlier state.

use bytes::Bytes;
use http::header::SET_COOKIE;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, Uri, Version};
use serde_json::{Map, Value};

use crate::conn::Connection;
use crate::cookie::{clear_cookie_value, set_cookie_value, CookieOptions};
use crate::error::Result;
use crate::Status;

/// The request line and headers.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

/// One recorded response mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Status(Status),
    Header(String, String),
    Cookie {
        name: String,
        value: String,
        options: CookieOptions,
    },
    ClearCookie {
        name: String,
        options: CookieOptions,
    },
    Body(Bytes),
    End,
}

#[derive(Debug, Clone)]
pub struct MemoryConnection {
    head: RequestHead,
    original_url: String,
    params: Value,
    query: Value,
    body: Value,
    actions: Vec<Action>,
}

impl MemoryConnection {
    pub fn builder() -> MemoryConnectionBuilder {
        MemoryConnectionBuilder::new()
    }

    /// Wrap a request whose body is already parsed.
    ///
    /// Params start out as an empty object, see [`with_params`][Self::with_params].
    pub fn from_request(request: Request<Value>) -> Self {
        let (parts, body) = request.into_parts();

        let original_url = parts
            .uri
            .path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let query = parse_query(&parts.uri);

        MemoryConnection {
            head: RequestHead {
                method: parts.method,
                uri: parts.uri,
                version: parts.version,
                headers: parts.headers,
            },
            original_url,
            params: Value::Object(Map::new()),
            query,
            body,
            actions: vec![],
        }
    }

    /// Set the path parameters, i.e. what a router extracted from the path.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn response_status(&self) -> Option<Status> {
        self.actions.iter().find_map(|a| match a {
            Action::Status(s) => Some(*s),
            _ => None,
        })
    }

    /// Last value set for response header `name`.
    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.actions.iter().rev().find_map(|a| match a {
            Action::Header(n, v) if n.eq_ignore_ascii_case(name) => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn response_body(&self) -> Option<&Bytes> {
        self.actions.iter().find_map(|a| match a {
            Action::Body(b) => Some(b),
            _ => None,
        })
    }

    pub fn is_ended(&self) -> bool {
        self.actions
            .iter()
            .any(|a| matches!(a, Action::Body(_) | Action::End))
    }

    /// Render the recorded actions as a response.
    ///
    /// Without a status action the status is `200 OK`. Headers replace
    /// earlier values of the same name, cookies are appended as `Set-Cookie`.
    pub fn into_response(self) -> Result<Response<Bytes>> {
        let mut response = Response::new(Bytes::new());

        for action in self.actions {
            match action {
                Action::Status(status) => {
                    *response.status_mut() = status.into();
                }
                Action::Header(name, value) => {
                    let name = HeaderName::try_from(name).map_err(http::Error::from)?;
                    let value = HeaderValue::try_from(value).map_err(http::Error::from)?;
                    response.headers_mut().insert(name, value);
                }
                Action::Cookie {
                    name,
                    value,
                    options,
                } => {
                    let cookie = set_cookie_value(&name, &value, &options);
                    let cookie = HeaderValue::try_from(cookie).map_err(http::Error::from)?;
                    response.headers_mut().append(SET_COOKIE, cookie);
                }
                Action::ClearCookie { name, options } => {
                    let cookie = clear_cookie_value(&name, &options);
                    let cookie = HeaderValue::try_from(cookie).map_err(http::Error::from)?;
                    response.headers_mut().append(SET_COOKIE, cookie);
                }
                Action::Body(body) => {
                    *response.body_mut() = body;
                }
                Action::End => {}
            }
        }

        Ok(response)
    }

    fn record(&mut self, action: Action) {
        trace!("Record: {:?}", action);
        self.actions.push(action);
    }
}

impl Connection for MemoryConnection {
    type Request = RequestHead;

    fn request(&self) -> &RequestHead {
        &self.head
    }

    fn body(&self) -> &Value {
        &self.body
    }

    /// Values that aren't visible ASCII read as `None`. The raw bytes are in
    /// [`RequestHead::headers`].
    fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn params(&self) -> &Value {
        &self.params
    }

    fn query(&self) -> &Value {
        &self.query
    }

    fn original_url(&self) -> &str {
        &self.original_url
    }

    fn method(&self) -> &str {
        self.head.method.as_str()
    }

    fn set_status(&mut self, status: Status) {
        self.record(Action::Status(status));
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.record(Action::Header(name.to_string(), value.to_string()));
    }

    fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) {
        self.record(Action::Cookie {
            name: name.to_string(),
            value: value.to_string(),
            options: options.clone(),
        });
    }

    fn clear_cookie(&mut self, name: &str, options: &CookieOptions) {
        self.record(Action::ClearCookie {
            name: name.to_string(),
            options: options.clone(),
        });
    }

    fn set_body(&mut self, body: Bytes) {
        self.record(Action::Body(body));
    }

    fn end_response(&mut self) {
        self.record(Action::End);
    }
}

/// Query string as an object. Repeated keys become arrays.
fn parse_query(uri: &Uri) -> Value {
    let mut map = Map::new();

    let query = match uri.query() {
        Some(v) => v,
        None => return Value::Object(map),
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());

        match map.get_mut(&*key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }

    Value::Object(map)
}

/// Builds a [`MemoryConnection`] from request parts.
#[derive(Debug)]
pub struct MemoryConnectionBuilder {
    request: http::request::Builder,
    params: Map<String, Value>,
    replace_params: Option<Value>,
    body: Value,
}

impl MemoryConnectionBuilder {
    fn new() -> Self {
        MemoryConnectionBuilder {
            request: Request::builder(),
            params: Map::new(),
            replace_params: None,
            body: Value::Null,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.request = self.request.method(method);
        self
    }

    pub fn uri(mut self, uri: &str) -> Self {
        self.request = self.request.uri(uri);
        self
    }

    pub fn get(self, uri: &str) -> Self {
        self.method(Method::GET).uri(uri)
    }

    pub fn post(self, uri: &str) -> Self {
        self.method(Method::POST).uri(uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Add one path parameter.
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Replace the path parameters with any value, object or not.
    pub fn params(mut self, params: Value) -> Self {
        self.replace_params = Some(params);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<MemoryConnection> {
        let request = self.request.body(self.body)?;

        let params = self
            .replace_params
            .unwrap_or_else(|| Value::Object(self.params));

        Ok(MemoryConnection::from_request(request).with_params(params))
    }
}
