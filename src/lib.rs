//! Phase indexed, async middleware for writing HTTP responses.
//!
//! A [`Middleware`] takes a connection from one response phase to another.
//! The phases are types, so the compiler checks that the status is written
//! before headers, headers before the body, and that nothing is written once
//! the response has ended.
#![cfg_attr(
    feature = "memory",
    doc = r#"
With the in-memory connection:

```
use futures::executor::block_on;
use phaseware::phase::{ResponseEnded, StatusOpen};
use phaseware::*;

let hello: Middleware<MemoryConnection, StatusOpen, ResponseEnded, Error, ()> =
    decode_param("name", |v| {
        v.and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::missing("name"))
    })
    .ichain(|name: String| {
        status(Status::Ok)
            .ichain(|()| content_type(MediaType::TextPlain))
            .ichain(|()| close_headers())
            .ichain(move |()| send(format!("Hello {}", name)))
    });

let conn = MemoryConnection::builder()
    .get("/hello/martin")
    .param("name", "martin")
    .build()?;

let conn = block_on(hello.exec(Conn::new(conn)))?;

assert_eq!(conn.inner().response_body().unwrap(), "Hello martin");
# Ok::<_, Error>(())
```
"#
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate log;

pub mod phase;

mod conn;
pub use conn::{Conn, Connection};

mod middleware;
pub use middleware::{eval_middleware, exec_middleware, Middleware, Outcome};

mod lift;
pub use lift::{from_connection, from_io_result, from_option, from_predicate, from_result};
pub use lift::{from_task_result, gets, left, left_io, left_task, modify_connection, of};
pub use lift::{right, right_io, right_task, try_catch};

mod response;
pub use response::{clear_cookie, close_headers, content_type, cookie, end, header, json};
pub use response::{redirect, send, status};

mod decode;
pub use decode::{decode_body, decode_header, decode_method, decode_param, decode_params};
pub use decode::{decode_query, deserialize};

mod model;
pub use model::{MediaType, Status};

mod cookie;
pub use cookie::{CookieOptions, SameSite};

mod error;
pub use error::Error;

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "memory")]
#[cfg_attr(docsrs, doc(cfg(feature = "memory")))]
pub use memory::{Action, MemoryConnection, MemoryConnectionBuilder, RequestHead};

#[cfg(all(test, feature = "memory"))]
mod test;
