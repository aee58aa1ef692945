//! Type state for the response lifecycle.
//!
//! A connection moves through the phases in order:
//!
//! ```text
//! StatusOpen -> HeadersOpen -> BodyOpen -> ResponseEnded
//! ```
//!
//! The markers are zero sized and only ever used as type parameters on
//! [`Conn`][crate::Conn] and [`Middleware`][crate::Middleware].
//!
//! Middlewares compose only when the phases line up:
//!
//! ```
//! use phaseware::phase::{ResponseEnded, StatusOpen};
//! use phaseware::{close_headers, header, send, status, Connection, Error, Middleware, Status};
//!
//! fn hello<C: Connection>() -> Middleware<C, StatusOpen, ResponseEnded, Error, ()> {
//!     status(Status::Ok)
//!         .ichain(|()| header("x-a", "1"))
//!         .ichain(|()| close_headers())
//!         .ichain(|()| send("hello"))
//! }
//! ```
//!
//! A header after the headers are closed:
//!
//! ```compile_fail
//! use phaseware::phase::{BodyOpen, StatusOpen};
//! use phaseware::{close_headers, header, status, Connection, Error, Middleware, Status};
//!
//! fn late<C: Connection>() -> Middleware<C, StatusOpen, BodyOpen, Error, ()> {
//!     status(Status::Ok)
//!         .ichain(|()| close_headers())
//!         .ichain(|()| header("x-late", "1"))
//! }
//! ```
//!
//! Ending a response twice:
//!
//! ```compile_fail
//! use phaseware::phase::{BodyOpen, ResponseEnded};
//! use phaseware::{end, send, Connection, Error, Middleware};
//!
//! fn twice<C: Connection>() -> Middleware<C, BodyOpen, ResponseEnded, Error, ()> {
//!     send("body").ichain(|()| end())
//! }
//! ```
//!
//! A status once headers are open:
//!
//! ```compile_fail
//! use phaseware::phase::{HeadersOpen, StatusOpen};
//! use phaseware::{status, Connection, Error, Middleware, Status};
//!
//! fn again<C: Connection>() -> Middleware<C, StatusOpen, HeadersOpen, Error, ()> {
//!     status(Status::Ok).ichain(|()| status(Status::NotFound))
//! }
//! ```

pub(crate) mod private {
    pub trait Sealed {}
}

/// One of the four response phases. Sealed.
pub trait Phase: private::Sealed + Send + Sync + 'static {
    /// Name of the marker, for logging.
    fn name() -> &'static str;
}

macro_rules! phase {
    ($(#[$doc:meta])* $n:ident) => {
        $(#[$doc])*
        pub struct $n(());

        impl private::Sealed for $n {}

        impl Phase for $n {
            fn name() -> &'static str {
                stringify!($n)
            }
        }
    };
}

phase!(
    /// The status line is ready to be sent.
    StatusOpen
);

phase!(
    /// Headers are ready to be sent, i.e. body streaming has not started.
    HeadersOpen
);

phase!(
    /// Headers are sent and the body is currently streaming.
    BodyOpen
);

phase!(
    /// The body stream, and thus the response, is finished.
    ResponseEnded
);
