use bytes::Bytes;
use futures::executor::block_on;
use futures::future;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::scenario::Scenario;
use crate::memory::MemoryConnection;
use crate::phase::{ResponseEnded, StatusOpen};
use crate::*;

#[derive(Debug, Clone, PartialEq)]
enum ApiError {
    BadId,
    NoSuchUser(u32),
    BadBody(String),
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct User {
    id: u32,
    name: &'static str,
}

#[derive(Deserialize)]
struct Login {
    user: String,
}

type Handler = Middleware<MemoryConnection, StatusOpen, ResponseEnded, ApiError, ()>;

async fn find_user(id: u32) -> Result<User, ApiError> {
    match id {
        1 => Ok(User { id, name: "martin" }),
        _ => Err(ApiError::NoSuchUser(id)),
    }
}

fn parse_id(v: Option<&Value>) -> Result<u32, ApiError> {
    v.and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or(ApiError::BadId)
}

fn get_user() -> Handler {
    decode_param("id", parse_id)
        .ichain(|id| from_task_result(move || find_user(id)))
        .ichain(|user: User| {
            status(Status::Ok).ichain(move |()| json(user.clone(), |_| ApiError::Json))
        })
}

fn not_found() -> Handler {
    status(Status::NotFound)
        .ichain(|()| close_headers())
        .ichain(|()| end())
}

fn bad_request(reason: &str) -> Handler {
    let reason = reason.to_string();

    status(Status::BadRequest)
        .ichain(|()| content_type(MediaType::TextPlain))
        .ichain(|()| close_headers())
        .ichain(move |()| send(reason.clone()))
}

fn user_endpoint() -> Handler {
    get_user().or_else(|e| match e {
        ApiError::NoSuchUser(_) => not_found(),
        _ => bad_request("bad user id"),
    })
}

fn login() -> Handler {
    decode_method(|m| match m {
        "POST" => Ok(()),
        _ => Err(ApiError::BadBody(m.to_string())),
    })
    .ichain(|()| {
        decode_body(|body| {
            deserialize::<Login>(body).map_err(|e| ApiError::BadBody(e.to_string()))
        })
    })
    .ichain(|login: Login| {
        redirect("/home")
            .ichain(move |()| {
                cookie(
                    "user",
                    login.user.clone(),
                    CookieOptions::new().http_only(true).path("/"),
                )
            })
            .ichain(|()| close_headers())
            .ichain(|()| end())
    })
}

fn logout() -> Handler {
    redirect("/")
        .ichain(|()| clear_cookie("user", CookieOptions::new()))
        .ichain(|()| close_headers())
        .ichain(|()| end())
}

fn respond(handler: &Handler, scenario: &Scenario) -> http::Response<Bytes> {
    let conn = block_on(handler.exec(scenario.to_status_open())).unwrap();
    conn.into_inner().into_response().unwrap()
}

#[test]
fn found_user_as_json() {
    let scenario = Scenario::builder().get("/users/1").param("id", "1").build();

    let response = respond(&user_endpoint(), &scenario);

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body, json!({ "id": 1, "name": "martin" }));
}

#[test]
fn missing_user_is_not_found() {
    let scenario = Scenario::builder().get("/users/2").param("id", "2").build();

    let response = respond(&user_endpoint(), &scenario);

    assert_eq!(response.status(), 404);
    assert!(response.headers().get("content-type").is_none());
    assert!(response.body().is_empty());
}

#[test]
fn bad_id_is_bad_request() {
    let scenario = Scenario::builder().get("/users/x").param("id", "x").build();

    let response = respond(&user_endpoint(), &scenario);

    assert_eq!(response.status(), 400);
    assert_eq!(response.headers()["content-type"], "text/plain");
    assert_eq!(response.body(), "bad user id");
}

#[test]
fn unrecovered_error_surfaces() {
    let scenario = Scenario::builder().get("/users/2").param("id", "2").build();

    let err = block_on(get_user().eval(scenario.to_status_open())).unwrap_err();

    assert_eq!(err, ApiError::NoSuchUser(2));
}

#[test]
fn login_sets_cookie_and_redirects() {
    let scenario = Scenario::builder()
        .post("/login")
        .body(json!({ "user": "martin" }))
        .build();

    let response = respond(&login(), &scenario);

    assert_eq!(response.status(), 302);
    assert_eq!(response.headers()["location"], "/home");
    assert_eq!(
        response.headers()["set-cookie"],
        "user=martin; Path=/; HttpOnly"
    );
}

#[test]
fn login_rejects_get_and_bad_body() {
    let get = Scenario::builder().get("/login").build();
    let err = block_on(login().eval(get.to_status_open())).unwrap_err();
    assert_eq!(err, ApiError::BadBody("GET".into()));

    let bad = Scenario::builder()
        .post("/login")
        .body(json!({ "name": "martin" }))
        .build();
    let err = block_on(login().eval(bad.to_status_open())).unwrap_err();
    assert!(matches!(err, ApiError::BadBody(_)));
}

#[test]
fn logout_clears_cookie() {
    let scenario = Scenario::builder().get("/logout").build();

    let response = respond(&logout(), &scenario);

    assert_eq!(response.status(), 302);
    assert_eq!(response.headers()["location"], "/");
    assert_eq!(
        response.headers()["set-cookie"],
        "user=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
    );
}

#[test]
fn same_handler_serves_many_requests() {
    let handler = user_endpoint();

    let statuses: Vec<_> = ["1", "2", "x", "1"]
        .into_iter()
        .map(|id| {
            let scenario = Scenario::builder().param("id", id).build();
            respond(&handler, &scenario).status().as_u16()
        })
        .collect();

    assert_eq!(statuses, [200, 404, 400, 200]);
}

#[test]
fn response_ready_without_io() {
    let m: Handler = right_task(|| future::ready(()))
        .ichain(|()| status(Status::Ok))
        .ichain(|()| close_headers())
        .ichain(|()| end());

    let scenario = Scenario::builder().build();
    let response = respond(&m, &scenario);

    assert_eq!(response.status(), 200);
}
