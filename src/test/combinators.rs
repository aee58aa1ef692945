use futures::executor::block_on;
use futures::future;

use super::scenario::{Calls, Oops, Scenario};
use crate::memory::{Action, MemoryConnection};
use crate::phase::{HeadersOpen, StatusOpen};
use crate::*;

type Mw<A> = Middleware<MemoryConnection, HeadersOpen, HeadersOpen, Oops, A>;

fn eval<A: Send + 'static>(m: &Mw<A>) -> Result<A, Oops> {
    let scenario = Scenario::builder().build();
    block_on(m.eval(scenario.to_headers_open()))
}

#[test]
fn map_and_map_left() {
    let ok: Mw<i32> = of(20);
    assert_eq!(eval(&ok.map(|x| x + 1)), Ok(21));

    let failing: Mw<i32> = left(Oops("a"));
    let mapped = failing.map_left(|Oops(s)| s.len());
    let scenario = Scenario::builder().build();
    assert_eq!(block_on(mapped.eval(scenario.to_headers_open())), Err(1));
}

#[test]
fn bimap_maps_either_side() {
    let ok: Mw<i32> = of(2);
    let failing: Mw<i32> = left(Oops("four"));

    let f = |Oops(s): Oops| s.to_uppercase();
    let g = |x: i32| x * 10;

    let scenario = Scenario::builder().build();

    let a = block_on(ok.bimap(f, g).eval(scenario.to_headers_open()));
    let b = block_on(failing.bimap(f, g).eval(scenario.to_headers_open()));

    assert_eq!(a, Ok(20));
    assert_eq!(b, Err("FOUR".to_string()));
}

#[test]
fn ap_applies_function_after_both_run() {
    let m: Mw<i32> = of(|x: i32| x + 1).ap(header("x-ap", "1").map(|()| 41));

    let scenario = Scenario::builder().build();
    let (n, conn) = block_on(m.run(scenario.to_headers_open())).unwrap();

    assert_eq!(n, 42);
    assert_eq!(conn.inner().response_header("x-ap"), Some("1"));
}

#[test]
fn ap_first_and_ap_second() {
    let first: Mw<&str> = header("x-1", "1").map(|()| "first");
    let second: Mw<&str> = header("x-2", "2").map(|()| "second");

    let scenario = Scenario::builder().build();

    let (a, conn) =
        block_on(first.clone().ap_first(second.clone()).run(scenario.to_headers_open())).unwrap();
    assert_eq!(a, "first");
    assert_eq!(conn.inner().actions().len(), 3);

    let (b, conn) = block_on(first.ap_second(second).run(scenario.to_headers_open())).unwrap();
    assert_eq!(b, "second");
    assert_eq!(conn.inner().response_header("x-1"), Some("1"));
    assert_eq!(conn.inner().response_header("x-2"), Some("2"));
}

#[test]
fn chain_first_keeps_value_and_effects() {
    let m: Mw<String> =
        of("abc".to_string()).chain_first(|s: &String| header("x-len", s.len().to_string()));

    let scenario = Scenario::builder().build();
    let (s, conn) = block_on(m.run(scenario.to_headers_open())).unwrap();

    assert_eq!(s, "abc");
    assert_eq!(conn.inner().response_header("x-len"), Some("3"));
}

#[test]
fn flatten_runs_inner_middleware() {
    let inner: Middleware<MemoryConnection, StatusOpen, HeadersOpen, Oops, i32> =
        status(Status::Created).map(|()| 7);

    let outer = of::<_, StatusOpen, Oops, _>(inner);

    let scenario = Scenario::builder().build();
    let (n, conn) = block_on(outer.flatten().run(scenario.to_status_open())).unwrap();

    assert_eq!(n, 7);
    assert_eq!(conn.inner().response_status(), Some(Status::Created));
}

#[test]
fn filter_or_else_and_from_predicate() {
    let positive: Mw<i32> = of(3);
    let negative: Mw<i32> = of(-3);

    let check = |m: Mw<i32>| m.filter_or_else(|x| *x > 0, |_| Oops("not positive"));

    assert_eq!(eval(&check(positive)), Ok(3));
    assert_eq!(eval(&check(negative)), Err(Oops("not positive")));

    let is_even = from_predicate(|x: &i32| x % 2 == 0, |_: &i32| Oops("odd"));
    let even: Mw<i32> = is_even(4);
    let odd: Mw<i32> = is_even(5);

    assert_eq!(eval(&even), Ok(4));
    assert_eq!(eval(&odd), Err(Oops("odd")));
}

#[test]
fn lifting_plain_values() {
    let a: Mw<i32> = from_result(Ok(1));
    let b: Mw<i32> = from_result(Err(Oops("b")));
    let c: Mw<i32> = from_option(Some(3), || Oops("none"));
    let d: Mw<i32> = from_option(None, || Oops("none"));
    let e: Mw<i32> = right(5);

    assert_eq!(eval(&a), Ok(1));
    assert_eq!(eval(&b), Err(Oops("b")));
    assert_eq!(eval(&c), Ok(3));
    assert_eq!(eval(&d), Err(Oops("none")));
    assert_eq!(eval(&e), Ok(5));
}

#[test]
fn lifting_effects() {
    let calls = Calls::default();

    let counter = calls.clone();
    let io: Mw<usize> = right_io(move || {
        counter.hit();
        7
    });

    let failing_io: Mw<usize> = left_io(|| Oops("io"));
    let task: Mw<&str> = right_task(|| future::ready("task"));
    let failing_task: Mw<&str> = left_task(|| future::ready(Oops("task")));
    let result_task: Mw<i32> = from_task_result(|| future::ready(Ok(9)));

    // Nothing runs until the middleware does.
    assert_eq!(calls.count(), 0);

    assert_eq!(eval(&io), Ok(7));
    assert_eq!(eval(&io), Ok(7));
    assert_eq!(calls.count(), 2);

    assert_eq!(eval(&failing_io), Err(Oops("io")));
    assert_eq!(eval(&task), Ok("task"));
    assert_eq!(eval(&failing_task), Err(Oops("task")));
    assert_eq!(eval(&result_task), Ok(9));
}

#[test]
fn try_catch_converts_rejection() {
    let ok: Mw<u8> = try_catch(|| future::ready("12".parse::<u8>()), |_| Oops("parse"));
    let rejected: Mw<u8> = try_catch(|| future::ready("300".parse::<u8>()), |_| Oops("parse"));

    assert_eq!(eval(&ok), Ok(12));
    assert_eq!(eval(&rejected), Err(Oops("parse")));
}

#[test]
fn gets_and_from_connection_read_request() {
    let scenario = Scenario::builder()
        .get("/items?x=1")
        .header("accept", "text/html")
        .build();

    let url: Middleware<MemoryConnection, StatusOpen, StatusOpen, Oops, String> =
        gets(|conn: &Conn<MemoryConnection, StatusOpen>| conn.original_url().to_string());

    let accept: Middleware<MemoryConnection, StatusOpen, StatusOpen, Oops, String> =
        from_connection(|conn: &Conn<MemoryConnection, StatusOpen>| {
            conn.header("accept")
                .map(str::to_string)
                .ok_or(Oops("no accept"))
        });

    assert_eq!(
        block_on(url.eval(scenario.to_status_open())),
        Ok("/items?x=1".to_string())
    );
    assert_eq!(
        block_on(accept.eval(scenario.to_status_open())),
        Ok("text/html".to_string())
    );
}

#[test]
fn free_eval_and_exec() {
    let scenario = Scenario::builder().build();

    let m: Middleware<MemoryConnection, StatusOpen, HeadersOpen, Oops, i32> =
        status(Status::Forbidden).map(|()| 403);

    let n = block_on(eval_middleware(&m, scenario.to_status_open())).unwrap();
    let conn = block_on(exec_middleware(&m, scenario.to_status_open())).unwrap();

    assert_eq!(n, 403);
    assert_eq!(conn.inner().actions(), [Action::Status(Status::Forbidden)]);
}
