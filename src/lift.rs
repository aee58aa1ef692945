//! Middlewares built from plain values, effects and connection accessors.
//!
//! Everything here except [`modify_connection`] leaves the phase unchanged.

use std::future::Future;
use std::sync::Arc;

use futures::future::{self, FutureExt, TryFutureExt};

use crate::conn::{Conn, Connection};
use crate::middleware::Middleware;
use crate::phase::Phase;

/// Succeed with `a`.
pub fn of<C, S, E, A>(a: A) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
{
    Middleware::new(move |conn: Conn<C, S>| future::ready(Ok((a.clone(), conn))))
}

/// Same as [`of`].
pub fn right<C, S, E, A>(a: A) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
{
    of(a)
}

/// Fail with `e`.
pub fn left<C, S, E, A>(e: E) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    Middleware::new(move |_: Conn<C, S>| future::ready(Err(e.clone())))
}

pub fn from_result<C, S, E, A>(result: Result<A, E>) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    Middleware::new(move |conn: Conn<C, S>| future::ready(result.clone().map(|a| (a, conn))))
}

pub fn from_option<C, S, E, A, F>(option: Option<A>, on_none: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn() -> E + Send + Sync + 'static,
{
    Middleware::new(move |conn: Conn<C, S>| {
        future::ready(match &option {
            Some(a) => Ok((a.clone(), conn)),
            None => Err(on_none()),
        })
    })
}

/// Builds middlewares that succeed with their input when it satisfies
/// `predicate` and fail with `on_false` otherwise.
pub fn from_predicate<C, S, E, A, P, F>(
    predicate: P,
    on_false: F,
) -> impl Fn(A) -> Middleware<C, S, S, E, A> + Send + Sync + 'static
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Clone + Send + Sync + 'static,
    P: Fn(&A) -> bool + Send + Sync + 'static,
    F: Fn(&A) -> E + Send + Sync + 'static,
{
    let check = Arc::new((predicate, on_false));

    move |a: A| {
        let check = Arc::clone(&check);

        Middleware::new(move |conn: Conn<C, S>| {
            let (predicate, on_false) = &*check;

            future::ready(if predicate(&a) {
                Ok((a.clone(), conn))
            } else {
                Err(on_false(&a))
            })
        })
    }
}

/// Run an async operation that can fail, converting its error with
/// `on_rejected`.
pub fn try_catch<C, S, E, A, R, F, Fut, G>(f: F, on_rejected: G) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<A, R>> + Send + 'static,
    G: Fn(R) -> E + Send + Sync + 'static,
{
    let on_rejected = Arc::new(on_rejected);

    from_task_result(move || {
        let on_rejected = Arc::clone(&on_rejected);
        f().map_err(move |r| on_rejected(r))
    })
}

pub fn from_task_result<C, S, E, A, F, Fut>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<A, E>> + Send + 'static,
{
    Middleware::new(move |conn: Conn<C, S>| f().map_ok(move |a| (a, conn)))
}

pub fn right_task<C, S, E, A, F, Fut>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = A> + Send + 'static,
{
    from_task_result(move || f().map(Ok))
}

pub fn left_task<C, S, E, A, F, Fut>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = E> + Send + 'static,
{
    from_task_result(move || f().map(Err))
}

pub fn from_io_result<C, S, E, A, F>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn() -> Result<A, E> + Send + Sync + 'static,
{
    Middleware::new(move |conn: Conn<C, S>| future::ready(f().map(|a| (a, conn))))
}

pub fn right_io<C, S, E, A, F>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn() -> A + Send + Sync + 'static,
{
    from_io_result(move || Ok(f()))
}

pub fn left_io<C, S, E, A, F>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn() -> E + Send + Sync + 'static,
{
    from_io_result(move || Err(f()))
}

/// Read something off the connection.
pub fn gets<C, S, E, A, F>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(&Conn<C, S>) -> A + Send + Sync + 'static,
{
    Middleware::new(move |conn: Conn<C, S>| {
        let a = f(&conn);
        future::ready(Ok((a, conn)))
    })
}

/// Read something off the connection, possibly failing.
pub fn from_connection<C, S, E, A, F>(f: F) -> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
    F: Fn(&Conn<C, S>) -> Result<A, E> + Send + Sync + 'static,
{
    Middleware::new(move |conn: Conn<C, S>| {
        let result = f(&conn);
        future::ready(result.map(|a| (a, conn)))
    })
}

/// Move the connection to another phase. Never fails.
pub fn modify_connection<C, I, O, E, F>(f: F) -> Middleware<C, I, O, E, ()>
where
    C: Connection,
    I: Phase,
    O: Phase,
    E: Send + 'static,
    F: Fn(Conn<C, I>) -> Conn<C, O> + Send + Sync + 'static,
{
    Middleware::new(move |conn: Conn<C, I>| future::ready(Ok(((), f(conn)))))
}
