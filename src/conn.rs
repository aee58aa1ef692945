use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use serde_json::Value;

use crate::cookie::CookieOptions;
use crate::phase::*;
use crate::Status;

/// The hosting HTTP layer's view of one request/response exchange.
///
/// Implementations hold the in-flight request and collect the response. The
/// mutators carry no phase information; ordering is enforced by [`Conn`],
/// which is the only way middlewares reach them.
///
/// [`alt`][crate::Middleware::alt] and [`or_else`][crate::Middleware::or_else]
/// need `Connection + Clone`, and rerun the fallback on a clone taken before
/// the failed middleware ran. `Clone` must therefore produce an independent
/// snapshot: mutating the original afterwards must not show in the clone. A
/// connection that shares its response state behind a handle can't support
/// them.
pub trait Connection: Send + 'static {
    /// Whatever the hosting layer considers "the request".
    type Request;

    fn request(&self) -> &Self::Request;

    /// Parsed request body.
    fn body(&self) -> &Value;

    /// Header value as text. `None` when the header is absent, and also when
    /// it is present but not representable as `&str`.
    fn header(&self, name: &str) -> Option<&str>;

    /// Path parameters, typically an object filled in by a router.
    fn params(&self) -> &Value;

    fn query(&self) -> &Value;

    fn original_url(&self) -> &str;

    fn method(&self) -> &str;

    fn set_status(&mut self, status: Status);

    fn set_header(&mut self, name: &str, value: &str);

    fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions);

    fn clear_cookie(&mut self, name: &str, options: &CookieOptions);

    fn set_body(&mut self, body: Bytes);

    fn end_response(&mut self);
}

/// A [`Connection`] in phase `S`.
///
/// Mutators consume the handle and return it in the next phase. A mutator
/// that isn't valid in the current phase doesn't exist on the type.
///
/// ```
/// use phaseware::phase::{ResponseEnded, StatusOpen};
/// use phaseware::{Conn, Connection, Status};
///
/// fn respond<C: Connection>(conn: Conn<C, StatusOpen>) -> Conn<C, ResponseEnded> {
///     conn.set_status(Status::Ok)
///         .set_header("x-a", "1")
///         .close_headers()
///         .end_response()
/// }
/// ```
///
/// No header once the body has started:
///
/// ```compile_fail
/// use phaseware::phase::StatusOpen;
/// use phaseware::{Conn, Connection, Status};
///
/// fn respond<C: Connection>(conn: Conn<C, StatusOpen>) {
///     conn.set_status(Status::Ok)
///         .close_headers()
///         .set_header("x-late", "1");
/// }
/// ```
///
/// No second status:
///
/// ```compile_fail
/// use phaseware::phase::StatusOpen;
/// use phaseware::{Conn, Connection, Status};
///
/// fn respond<C: Connection>(conn: Conn<C, StatusOpen>) {
///     conn.set_status(Status::Ok).set_status(Status::NotFound);
/// }
/// ```
///
/// No writes after the response ended:
///
/// ```compile_fail
/// use phaseware::phase::StatusOpen;
/// use phaseware::{Conn, Connection, Status};
///
/// fn respond<C: Connection>(conn: Conn<C, StatusOpen>) {
///     conn.set_status(Status::Ok)
///         .close_headers()
///         .end_response()
///         .end_response();
/// }
/// ```
///
/// A handle can't be kept around to write twice:
///
/// ```compile_fail
/// use phaseware::phase::StatusOpen;
/// use phaseware::{Conn, Connection, Status};
///
/// fn respond<C: Connection + Clone>(conn: Conn<C, StatusOpen>) {
///     let again = conn.clone();
///     conn.set_status(Status::Ok);
///     again.set_status(Status::NotFound);
/// }
/// ```
pub struct Conn<C, S> {
    inner: C,
    _ph: PhantomData<S>,
}

impl<C: Connection> Conn<C, StatusOpen> {
    pub fn new(inner: C) -> Self {
        Conn {
            inner,
            _ph: PhantomData,
        }
    }
}

impl<C: Connection, S: Phase> Conn<C, S> {
    pub(crate) fn transition<S2: Phase>(self) -> Conn<C, S2> {
        trace!("Transition: {} -> {}", S::name(), S2::name());

        Conn {
            inner: self.inner,
            _ph: PhantomData,
        }
    }

    pub fn request(&self) -> &C::Request {
        self.inner.request()
    }

    pub fn body(&self) -> &Value {
        self.inner.body()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.header(name)
    }

    pub fn params(&self) -> &Value {
        self.inner.params()
    }

    pub fn query(&self) -> &Value {
        self.inner.query()
    }

    pub fn original_url(&self) -> &str {
        self.inner.original_url()
    }

    pub fn method(&self) -> &str {
        self.inner.method()
    }

    /// The underlying connection, i.e. for the dispatcher to flush a response.
    pub fn into_inner(self) -> C {
        self.inner
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Connection> Conn<C, StatusOpen> {
    pub fn set_status(mut self, status: Status) -> Conn<C, HeadersOpen> {
        self.inner.set_status(status);
        self.transition()
    }
}

impl<C: Connection> Conn<C, HeadersOpen> {
    pub fn set_header(mut self, name: &str, value: &str) -> Self {
        self.inner.set_header(name, value);
        self
    }

    pub fn set_cookie(mut self, name: &str, value: &str, options: &CookieOptions) -> Self {
        self.inner.set_cookie(name, value, options);
        self
    }

    pub fn clear_cookie(mut self, name: &str, options: &CookieOptions) -> Self {
        self.inner.clear_cookie(name, options);
        self
    }

    pub fn close_headers(self) -> Conn<C, BodyOpen> {
        self.transition()
    }
}

impl<C: Connection> Conn<C, BodyOpen> {
    pub fn set_body(mut self, body: Bytes) -> Conn<C, ResponseEnded> {
        self.inner.set_body(body);
        self.transition()
    }

    pub fn end_response(mut self) -> Conn<C, ResponseEnded> {
        self.inner.end_response();
        self.transition()
    }
}

impl<C: Connection + Clone, S: Phase> Conn<C, S> {
    /// Snapshot for restarting after a failure.
    pub(crate) fn duplicate(&self) -> Self {
        Conn {
            inner: self.inner.clone(),
            _ph: PhantomData,
        }
    }
}

impl<C: fmt::Debug, S: Phase> fmt::Debug for Conn<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conn")
            .field("phase", &S::name())
            .field("inner", &self.inner)
            .finish()
    }
}
