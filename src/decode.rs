//! Middlewares that decode request data.
//!
//! The connection hands out untyped data, JSON values for params, query and
//! body. The caller supplies the function that turns it into something typed.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::conn::{Conn, Connection};
use crate::lift::from_connection;
use crate::middleware::Middleware;
use crate::phase::StatusOpen;

/// Decode the path parameter `name`.
///
/// The decoder gets `None` when the parameter is missing, or when the params
/// aren't an object at all.
pub fn decode_param<C, E, A, F>(
    name: impl Into<String>,
    f: F,
) -> Middleware<C, StatusOpen, StatusOpen, E, A>
where
    C: Connection,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(Option<&Value>) -> Result<A, E> + Send + Sync + 'static,
{
    let name = name.into();

    from_connection(move |conn: &Conn<C, StatusOpen>| {
        let params = conn.params().as_object();
        f(params.and_then(|p| p.get(name.as_str())))
    })
}

pub fn decode_params<C, E, A, F>(f: F) -> Middleware<C, StatusOpen, StatusOpen, E, A>
where
    C: Connection,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(&Value) -> Result<A, E> + Send + Sync + 'static,
{
    from_connection(move |conn: &Conn<C, StatusOpen>| f(conn.params()))
}

pub fn decode_query<C, E, A, F>(f: F) -> Middleware<C, StatusOpen, StatusOpen, E, A>
where
    C: Connection,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(&Value) -> Result<A, E> + Send + Sync + 'static,
{
    from_connection(move |conn: &Conn<C, StatusOpen>| f(conn.query()))
}

pub fn decode_body<C, E, A, F>(f: F) -> Middleware<C, StatusOpen, StatusOpen, E, A>
where
    C: Connection,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(&Value) -> Result<A, E> + Send + Sync + 'static,
{
    from_connection(move |conn: &Conn<C, StatusOpen>| f(conn.body()))
}

pub fn decode_method<C, E, A, F>(f: F) -> Middleware<C, StatusOpen, StatusOpen, E, A>
where
    C: Connection,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(&str) -> Result<A, E> + Send + Sync + 'static,
{
    from_connection(move |conn: &Conn<C, StatusOpen>| f(conn.method()))
}

/// Decode the request header `name`.
///
/// The decoder gets `None` if it's absent, or if the connection can't
/// present the value as text (see [`Connection::header`]).
pub fn decode_header<C, E, A, F>(
    name: impl Into<String>,
    f: F,
) -> Middleware<C, StatusOpen, StatusOpen, E, A>
where
    C: Connection,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(Option<&str>) -> Result<A, E> + Send + Sync + 'static,
{
    let name = name.into();

    from_connection(move |conn: &Conn<C, StatusOpen>| f(conn.header(&name)))
}

/// Decoder for any serde type.
///
/// ```
/// # use phaseware::{decode_body, deserialize, Connection, Error, Middleware};
/// # use phaseware::phase::StatusOpen;
/// #[derive(serde::Deserialize)]
/// struct Login {
///     user: String,
/// }
///
/// fn login<C: Connection>() -> Middleware<C, StatusOpen, StatusOpen, Error, Login> {
///     decode_body(|body| deserialize(body).map_err(Error::Json))
/// }
/// ```
pub fn deserialize<T: DeserializeOwned>(input: &Value) -> serde_json::Result<T> {
    T::deserialize(input)
}
