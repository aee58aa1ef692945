use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt, TryFutureExt};

use crate::conn::{Conn, Connection};
use crate::phase::Phase;

/// What a middleware run resolves to.
pub type Outcome<C, O, E, A> = Result<(A, Conn<C, O>), E>;

type Run<C, I, O, E, A> =
    dyn Fn(Conn<C, I>) -> BoxFuture<'static, Outcome<C, O, E, A>> + Send + Sync;

/// An indexed, asynchronous action taking a connection from phase `I` to
/// phase `O`, producing either a value `A` or an error `E`.
///
/// A middleware is only a description. Nothing happens until it is
/// [run][Middleware::run], and every run is independent, so the same value
/// can serve any number of connections. Cloning is cheap.
///
/// On error the connection is dropped. There is no partially transitioned
/// connection to observe; recovering with [`alt`][Middleware::alt] or
/// [`or_else`][Middleware::or_else] starts over from the connection the
/// failed middleware was given.
pub struct Middleware<C, I, O, E, A> {
    run: Arc<Run<C, I, O, E, A>>,
}

impl<C, I, O, E, A> Clone for Middleware<C, I, O, E, A> {
    fn clone(&self) -> Self {
        Middleware {
            run: Arc::clone(&self.run),
        }
    }
}

impl<C, I, O, E, A> Middleware<C, I, O, E, A>
where
    C: Connection,
    I: Phase,
    O: Phase,
    E: Send + 'static,
    A: Send + 'static,
{
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Conn<C, I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<C, O, E, A>> + Send + 'static,
    {
        Middleware {
            run: Arc::new(move |conn: Conn<C, I>| f(conn).boxed()),
        }
    }

    pub fn run(&self, conn: Conn<C, I>) -> BoxFuture<'static, Outcome<C, O, E, A>> {
        (self.run)(conn)
    }

    /// Run and keep only the value.
    pub fn eval(&self, conn: Conn<C, I>) -> impl Future<Output = Result<A, E>> + Send + 'static {
        self.run(conn).map_ok(|(a, _)| a)
    }

    /// Run and keep only the connection.
    pub fn exec(
        &self,
        conn: Conn<C, I>,
    ) -> impl Future<Output = Result<Conn<C, O>, E>> + Send + 'static {
        self.run(conn).map_ok(|(_, conn)| conn)
    }

    /// Continue with the middleware `f` builds from the value, picking up the
    /// connection in phase `O`.
    ///
    /// `f` is not called if `self` fails.
    pub fn ichain<Z, B, F>(self, f: F) -> Middleware<C, I, Z, E, B>
    where
        Z: Phase,
        B: Send + 'static,
        F: Fn(A) -> Middleware<C, O, Z, E, B> + Send + Sync + 'static,
    {
        let f = Arc::new(f);

        Middleware::new(move |conn: Conn<C, I>| {
            let f = Arc::clone(&f);
            self.run(conn).and_then(move |(a, conn)| f(a).run(conn))
        })
    }

    pub fn map<B, F>(self, f: F) -> Middleware<C, I, O, E, B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        let f = Arc::new(f);

        Middleware::new(move |conn: Conn<C, I>| {
            let f = Arc::clone(&f);
            self.run(conn).map_ok(move |(a, conn)| (f(a), conn))
        })
    }

    pub fn bimap<M, B, F, G>(self, f: F, g: G) -> Middleware<C, I, O, M, B>
    where
        M: Send + 'static,
        B: Send + 'static,
        F: Fn(E) -> M + Send + Sync + 'static,
        G: Fn(A) -> B + Send + Sync + 'static,
    {
        let fg = Arc::new((f, g));

        Middleware::new(move |conn: Conn<C, I>| {
            let f = Arc::clone(&fg);
            let g = Arc::clone(&fg);
            self.run(conn)
                .map_err(move |e| (f.0)(e))
                .map_ok(move |(a, conn)| ((g.1)(a), conn))
        })
    }

    pub fn map_left<M, F>(self, f: F) -> Middleware<C, I, O, M, A>
    where
        M: Send + 'static,
        F: Fn(E) -> M + Send + Sync + 'static,
    {
        let f = Arc::new(f);

        Middleware::new(move |conn: Conn<C, I>| {
            let f = Arc::clone(&f);
            self.run(conn).map_err(move |e| f(e))
        })
    }

    /// On failure, run the middleware `that` builds against the connection
    /// `self` was given.
    ///
    /// `that` is not called when `self` succeeds.
    pub fn alt<F>(self, that: F) -> Self
    where
        C: Clone,
        F: Fn() -> Self + Send + Sync + 'static,
    {
        let that = Arc::new(that);

        Middleware::new(move |conn: Conn<C, I>| {
            let that = Arc::clone(&that);
            let original = conn.duplicate();

            self.run(conn).or_else(move |_| {
                debug!("Fallback from {}", I::name());
                that().run(original)
            })
        })
    }

    /// Like [`alt`][Middleware::alt], but the fallback depends on the error
    /// and may fail with a different error type.
    pub fn or_else<M, F>(self, f: F) -> Middleware<C, I, O, M, A>
    where
        C: Clone,
        M: Send + 'static,
        F: Fn(E) -> Middleware<C, I, O, M, A> + Send + Sync + 'static,
    {
        let f = Arc::new(f);

        Middleware::new(move |conn: Conn<C, I>| {
            let f = Arc::clone(&f);
            let original = conn.duplicate();

            self.run(conn).or_else(move |e| {
                debug!("Recover from error in {}", I::name());
                f(e).run(original)
            })
        })
    }

    /// Apply the function this middleware produces to the value of `that`.
    pub fn ap<Z, X, B>(self, that: Middleware<C, O, Z, E, X>) -> Middleware<C, I, Z, E, B>
    where
        A: FnOnce(X) -> B,
        Z: Phase,
        X: Send + 'static,
        B: Send + 'static,
    {
        Middleware::new(move |conn: Conn<C, I>| {
            let that = that.clone();

            self.run(conn).and_then(move |(g, conn)| {
                that.run(conn).map_ok(move |(x, conn)| (g(x), conn))
            })
        })
    }

    /// Sequence `self` then `that`, keeping the value of `self`.
    pub fn ap_first<Z, B>(self, that: Middleware<C, O, Z, E, B>) -> Middleware<C, I, Z, E, A>
    where
        Z: Phase,
        B: Send + 'static,
    {
        Middleware::new(move |conn: Conn<C, I>| {
            let that = that.clone();

            self.run(conn)
                .and_then(move |(a, conn)| that.run(conn).map_ok(move |(_, conn)| (a, conn)))
        })
    }

    /// Sequence `self` then `that`, keeping the value of `that`.
    pub fn ap_second<Z, B>(self, that: Middleware<C, O, Z, E, B>) -> Middleware<C, I, Z, E, B>
    where
        Z: Phase,
        B: Send + 'static,
    {
        self.ichain(move |_| that.clone())
    }

    /// Continue with the middleware `f` builds, but keep the value of `self`.
    pub fn chain_first<Z, B, F>(self, f: F) -> Middleware<C, I, Z, E, A>
    where
        Z: Phase,
        B: Send + 'static,
        F: Fn(&A) -> Middleware<C, O, Z, E, B> + Send + Sync + 'static,
    {
        let f = Arc::new(f);

        Middleware::new(move |conn: Conn<C, I>| {
            let f = Arc::clone(&f);

            self.run(conn).and_then(move |(a, conn)| {
                let next = f(&a);
                next.run(conn).map_ok(move |(_, conn)| (a, conn))
            })
        })
    }

    /// Fail with `on_false` when the value doesn't satisfy `predicate`.
    pub fn filter_or_else<P, F>(self, predicate: P, on_false: F) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        F: Fn(&A) -> E + Send + Sync + 'static,
    {
        let check = Arc::new((predicate, on_false));

        Middleware::new(move |conn: Conn<C, I>| {
            let check = Arc::clone(&check);

            self.run(conn).and_then(move |(a, conn)| {
                let (predicate, on_false) = &*check;

                future::ready(if predicate(&a) {
                    Ok((a, conn))
                } else {
                    Err(on_false(&a))
                })
            })
        })
    }
}

impl<C, S, E, A> Middleware<C, S, S, E, A>
where
    C: Connection,
    S: Phase,
    E: Send + 'static,
    A: Send + 'static,
{
    /// [`ichain`][Middleware::ichain] for middlewares that stay in one phase.
    pub fn chain<B, F>(self, f: F) -> Middleware<C, S, S, E, B>
    where
        B: Send + 'static,
        F: Fn(A) -> Middleware<C, S, S, E, B> + Send + Sync + 'static,
    {
        self.ichain(f)
    }
}

impl<C, I, O, Z, E, A> Middleware<C, I, O, E, Middleware<C, O, Z, E, A>>
where
    C: Connection,
    I: Phase,
    O: Phase,
    Z: Phase,
    E: Send + 'static,
    A: Send + 'static,
{
    pub fn flatten(self) -> Middleware<C, I, Z, E, A> {
        self.ichain(|inner| inner)
    }
}

pub fn eval_middleware<C, I, O, E, A>(
    middleware: &Middleware<C, I, O, E, A>,
    conn: Conn<C, I>,
) -> impl Future<Output = Result<A, E>> + Send + 'static
where
    C: Connection,
    I: Phase,
    O: Phase,
    E: Send + 'static,
    A: Send + 'static,
{
    middleware.eval(conn)
}

pub fn exec_middleware<C, I, O, E, A>(
    middleware: &Middleware<C, I, O, E, A>,
    conn: Conn<C, I>,
) -> impl Future<Output = Result<Conn<C, O>, E>> + Send + 'static
where
    C: Connection,
    I: Phase,
    O: Phase,
    E: Send + 'static,
    A: Send + 'static,
{
    middleware.exec(conn)
}
