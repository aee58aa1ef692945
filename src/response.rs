//! Middlewares that write the response.
//!
//! Each one has a fixed phase signature, so a handler that writes a header
//! after the body, or ends a response twice, doesn't compile.

use bytes::Bytes;
use serde::Serialize;

use crate::conn::{Conn, Connection};
use crate::cookie::CookieOptions;
use crate::lift::{from_io_result, modify_connection};
use crate::middleware::Middleware;
use crate::phase::*;
use crate::{MediaType, Status};

pub fn status<C, E>(status: Status) -> Middleware<C, StatusOpen, HeadersOpen, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    modify_connection(move |conn: Conn<C, StatusOpen>| conn.set_status(status))
}

pub fn header<C, E>(
    name: impl Into<String>,
    value: impl Into<String>,
) -> Middleware<C, HeadersOpen, HeadersOpen, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    let name = name.into();
    let value = value.into();

    modify_connection(move |conn: Conn<C, HeadersOpen>| conn.set_header(&name, &value))
}

pub fn content_type<C, E>(media_type: MediaType) -> Middleware<C, HeadersOpen, HeadersOpen, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    header("Content-Type", media_type.as_str())
}

pub fn cookie<C, E>(
    name: impl Into<String>,
    value: impl Into<String>,
    options: CookieOptions,
) -> Middleware<C, HeadersOpen, HeadersOpen, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    let name = name.into();
    let value = value.into();

    modify_connection(move |conn: Conn<C, HeadersOpen>| conn.set_cookie(&name, &value, &options))
}

pub fn clear_cookie<C, E>(
    name: impl Into<String>,
    options: CookieOptions,
) -> Middleware<C, HeadersOpen, HeadersOpen, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    let name = name.into();

    modify_connection(move |conn: Conn<C, HeadersOpen>| conn.clear_cookie(&name, &options))
}

/// Stop accepting headers and start the body.
pub fn close_headers<C, E>() -> Middleware<C, HeadersOpen, BodyOpen, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    modify_connection(|conn: Conn<C, HeadersOpen>| conn.close_headers())
}

pub fn send<C, E>(body: impl Into<Bytes>) -> Middleware<C, BodyOpen, ResponseEnded, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    let body = body.into();

    modify_connection(move |conn: Conn<C, BodyOpen>| conn.set_body(body.clone()))
}

/// End the response without a body.
pub fn end<C, E>() -> Middleware<C, BodyOpen, ResponseEnded, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    modify_connection(|conn: Conn<C, BodyOpen>| conn.end_response())
}

/// Send `body` serialized as JSON.
///
/// Serialization happens before anything is written. If it fails, the
/// middleware fails with `on_error(reason)` and the connection is untouched.
/// Otherwise the content type is set, headers are closed and the JSON text
/// is sent.
pub fn json<C, E, T, F>(body: T, on_error: F) -> Middleware<C, HeadersOpen, ResponseEnded, E, ()>
where
    C: Connection,
    E: Send + 'static,
    T: Serialize + Send + Sync + 'static,
    F: Fn(serde_json::Error) -> E + Send + Sync + 'static,
{
    let serialize = from_io_result::<C, HeadersOpen, E, String, _>(move || {
        serde_json::to_string(&body).map_err(|e| {
            debug!("JSON serialization failed: {}", e);
            on_error(e)
        })
    });

    serialize.ichain(|json: String| {
        content_type(MediaType::ApplicationJson)
            .ichain(|()| close_headers())
            .ichain(move |()| send(json.clone()))
    })
}

/// Redirect to `uri` with `302 Found`.
pub fn redirect<C, E>(uri: impl Into<String>) -> Middleware<C, StatusOpen, HeadersOpen, E, ()>
where
    C: Connection,
    E: Send + 'static,
{
    let uri = uri.into();

    status(Status::Found).ichain(move |()| header("Location", uri.as_str()))
}
