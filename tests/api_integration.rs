use dadabase_tui::api::{FetchError, JokeService, NoopObserver};

#[tokio::test]
async fn test_integration_fetch_random_joke() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/v1/dadjokes")
        .match_header("x-api-key", "integration-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"joke": "What do you call a fake noodle? An impasta."}]"#)
        .create_async()
        .await;

    let service = JokeService::with_base_url(format!("{}/v1", server.url()), "integration-key");
    let jokes = service.fetch_random_joke(&NoopObserver).await;

    assert_eq!(
        jokes.display_text(),
        "What do you call a fake noodle? An impasta."
    );
}

#[tokio::test]
async fn test_integration_empty_array_is_empty_collection() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/dadjokes")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let service = JokeService::with_base_url(server.url(), "k");
    let jokes = service.fetch_jokes().await.expect("empty array is valid JSON");

    assert!(jokes.is_empty());
}

#[tokio::test]
async fn test_integration_object_body_is_parse_failure() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/dadjokes")
        .with_status(200)
        .with_body(r#"{"joke": "not wrapped in an array"}"#)
        .create_async()
        .await;

    let service = JokeService::with_base_url(server.url(), "k");
    let err = service.fetch_jokes().await.unwrap_err();

    let FetchError::NetworkOrParseFailure(source) = err;
    assert!(format!("{:#}", source).contains("failed to parse JSON response"));
}
