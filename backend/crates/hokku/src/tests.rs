//! HTTP scenarios for the Hokku router
//! Runs against the in-memory store and signed cookie sessions

#[cfg(test)]
mod http_tests {
    use auth::{AuthConfig, CookieSessionStore, MemorySessionStore, SessionStore};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use platform::password::{CredentialManager, PasswordCost};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::infra::memory::{FIXTURE_PASSWORD, MemoryStore};
    use crate::{HokkuAppState, HokkuConfig, hokku_router};

    async fn setup() -> (Router, MemoryStore) {
        setup_with(CookieSessionStore::new(AuthConfig::development())).await
    }

    async fn setup_with<S>(sessions: S) -> (Router, MemoryStore)
    where
        S: SessionStore + Clone + Send + Sync + 'static,
    {
        let credentials = CredentialManager::new(PasswordCost::low()).unwrap();
        let store = MemoryStore::with_fixtures(&credentials).unwrap();
        let state =
            HokkuAppState::new(store.clone(), sessions, HokkuConfig::development()).unwrap();
        (hokku_router(state), store)
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` pair from a Set-Cookie header
    fn cookie_pair(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn login_as(app: &Router, email: &str) -> String {
        let response = send(
            app,
            with_json(
                "POST",
                "/login",
                json!({ "email": email, "password": FIXTURE_PASSWORD }),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        cookie_pair(&response)
    }

    fn post_body(owner: i64, theme: i64) -> Value {
        json!({
            "title": "Title6",
            "content": "Fresh content",
            "ownerId": owner,
            "themeId": theme,
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = setup().await;
        let response = send(&app, get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "data": "It`s alive!" }));
    }

    #[tokio::test]
    async fn test_list_posts_pagination() {
        let (app, _) = setup().await;

        let all = body_json(send(&app, get("/posts")).await).await;
        assert_eq!(all.as_array().unwrap().len(), 5);
        assert_eq!(all[0]["title"], "Title1");

        let page = body_json(send(&app, get("/posts?limit=2&offset=1")).await).await;
        let titles: Vec<&str> = page
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Title2", "Title3"]);

        let past_end = body_json(send(&app, get("/posts?limit=1&offset=5")).await).await;
        assert!(past_end.as_array().unwrap().is_empty());

        let zero_limit = body_json(send(&app, get("/posts?limit=0&offset=3")).await).await;
        assert_eq!(zero_limit.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_posts_bad_limit() {
        let (app, _) = setup().await;

        let response = send(&app, get("/posts?limit=ten")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "Limit must be a number");

        let response = send(&app, get("/posts?offset=x")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "Offset must be a number");
    }

    #[tokio::test]
    async fn test_list_posts_by_theme_and_author() {
        let (app, _) = setup().await;

        let by_theme = body_json(send(&app, get("/posts/byTheme/2")).await).await;
        let titles: Vec<&str> = by_theme
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Title2", "Title4"]);

        let by_author = body_json(send(&app, get("/posts/byAuthor/1?limit=1&offset=1")).await).await;
        assert_eq!(by_author.as_array().unwrap().len(), 1);
        assert_eq!(by_author[0]["title"], "Title4");

        let response = send(&app, get("/posts/byTheme/abc")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_post() {
        let (app, _) = setup().await;

        let response = send(&app, get("/posts/3")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let post = body_json(response).await;
        assert_eq!(post["id"], 3);
        assert_eq!(post["ownerId"], 3);
        assert_eq!(post["themeId"], 1);

        let response = send(&app, get("/posts/99")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["detail"],
            "A hokku with the specified ID was not found"
        );

        let response = send(&app, get("/posts/one")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["detail"],
            "Bad request. Id must be an integer"
        );
    }

    #[tokio::test]
    async fn test_gated_routes_require_session() {
        let (app, store) = setup().await;

        let response = send(&app, with_json("POST", "/posts", post_body(1, 1), None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, delete("/themes/1", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, delete("/posts/1", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            &app,
            with_json("POST", "/posts", post_body(1, 1), Some("session=forged.value")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(store.post_count().await, 5);
    }

    #[tokio::test]
    async fn test_create_post_with_session() {
        let (app, store) = setup().await;
        let cookie = login_as(&app, "example1@email.com").await;

        let response = send(
            &app,
            with_json("POST", "/posts", post_body(1, 2), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/posts/6");
        assert_eq!(store.post_count().await, 6);

        let post = body_json(send(&app, get("/posts/6")).await).await;
        assert_eq!(post["title"], "Title6");
        assert_eq!(post["themeId"], 2);
    }

    #[tokio::test]
    async fn test_create_post_with_missing_theme() {
        let (app, store) = setup().await;
        let cookie = login_as(&app, "example1@email.com").await;

        let response = send(
            &app,
            with_json("POST", "/posts", post_body(1, 42), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["detail"], "Foreign key constraint fails");
        assert_eq!(store.post_count().await, 5);
    }

    #[tokio::test]
    async fn test_create_post_validation() {
        let (app, store) = setup().await;
        let cookie = login_as(&app, "example1@email.com").await;

        let response = send(
            &app,
            with_json(
                "POST",
                "/posts",
                json!({ "title": "", "content": "", "ownerId": 1, "themeId": 1 }),
                Some(&cookie),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"content"));
        assert_eq!(store.post_count().await, 5);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (app, _) = setup().await;
        let cookie = login_as(&app, "example1@email.com").await;

        let req = Request::builder()
            .method("POST")
            .uri("/posts")
            .header(header::COOKIE, &cookie)
            .body(Body::from("{\"title\": "))
            .unwrap();
        let response = send(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "Bad request params");
    }

    #[tokio::test]
    async fn test_update_and_delete_post() {
        let (app, store) = setup().await;

        let response = send(&app, delete("/posts/2", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.post_count().await, 5);

        let cookie = login_as(&app, "example2@email.com").await;

        let response = send(
            &app,
            with_json("PUT", "/posts/2", post_body(2, 1), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let post = body_json(send(&app, get("/posts/2")).await).await;
        assert_eq!(post["title"], "Title6");
        assert_eq!(post["themeId"], 1);

        let response = send(&app, delete("/posts/99", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, delete("/posts/2", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.post_count().await, 4);

        let response = send(&app, get("/posts/2")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_author() {
        let (app, _) = setup().await;

        let response = send(
            &app,
            with_json(
                "POST",
                "/authors",
                json!({ "email": "new@email.com", "name": "Newcomer", "password": "long enough" }),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/authors/4");

        let author = body_json(send(&app, get("/authors/4")).await).await;
        assert_eq!(author["email"], "new@email.com");
        assert!(author.get("password").is_none());
        assert!(author.get("passwordHash").is_none());

        let response = send(&app, get("/authors")).await;
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (app, _) = setup().await;

        let response = send(
            &app,
            with_json(
                "POST",
                "/authors",
                json!({ "email": "example1@email.com", "name": "Again", "password": "long enough" }),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["detail"],
            "User with this email already exists"
        );
    }

    #[tokio::test]
    async fn test_register_author_validation() {
        let (app, _) = setup().await;

        let response = send(
            &app,
            with_json(
                "POST",
                "/authors",
                json!({ "email": "not-an-email", "name": "", "password": "short" }),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_author_still_owning_posts() {
        let (app, _) = setup().await;
        let cookie = login_as(&app, "example3@email.com").await;

        let response = send(&app, delete("/authors/3", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(&app, delete("/posts/3", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, delete("/authors/3", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            send(&app, get("/authors/3")).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_login() {
        let (app, _) = setup().await;

        let response = send(
            &app,
            with_json(
                "POST",
                "/login",
                json!({ "email": "example1@email.com", "password": "wrong password" }),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_json(response).await["detail"], "Wrong email or password");

        let response = send(
            &app,
            with_json(
                "POST",
                "/login",
                json!({ "email": "nobody@email.com", "password": FIXTURE_PASSWORD }),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let cookie = login_as(&app, "example1@email.com").await;
        assert!(cookie.starts_with("session="));
    }

    #[tokio::test]
    async fn test_login_issues_fresh_server_side_session() {
        let (app, store) = setup_with(MemorySessionStore::new(AuthConfig::development())).await;

        // A cookie obtained earlier by someone else
        let planted = login_as(&app, "example3@email.com").await;

        let response = send(
            &app,
            with_json(
                "POST",
                "/login",
                json!({ "email": "example1@email.com", "password": FIXTURE_PASSWORD }),
                Some(&planted),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let issued = cookie_pair(&response);
        assert_ne!(issued, planted);

        let response = send(&app, delete("/posts/1", Some(&planted))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.post_count().await, 5);

        let response = send(&app, delete("/posts/1", Some(&issued))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_relogin_with_cookie_session_replaces_cookie() {
        let (app, _) = setup().await;
        let first = login_as(&app, "example3@email.com").await;

        let response = send(
            &app,
            with_json(
                "POST",
                "/login",
                json!({ "email": "example1@email.com", "password": FIXTURE_PASSWORD }),
                Some(&first),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_ne!(cookie_pair(&response), first);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let (app, _) = setup().await;
        let cookie = login_as(&app, "example1@email.com").await;

        let req = Request::builder()
            .method("POST")
            .uri("/logout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = send(&app, req).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_theme_lifecycle() {
        let (app, _) = setup().await;
        let cookie = login_as(&app, "example1@email.com").await;

        let response = send(
            &app,
            with_json("POST", "/themes", json!({ "title": "haiku" }), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/themes/3");

        let response = send(
            &app,
            with_json("POST", "/themes", json!({ "title": "haiku" }), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["detail"],
            "Theme with this title already exists"
        );

        let response = send(
            &app,
            with_json("PUT", "/themes/3", json!({ "title": "tanka" }), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let theme = body_json(send(&app, get("/themes/3")).await).await;
        assert_eq!(theme, json!({ "id": 3, "title": "tanka" }));

        let response = send(
            &app,
            with_json("POST", "/themes", json!({ "title": "" }), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, delete("/themes/1", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(&app, delete("/themes/3", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let themes = body_json(send(&app, get("/themes")).await).await;
        assert_eq!(themes.as_array().unwrap().len(), 2);
    }
}
