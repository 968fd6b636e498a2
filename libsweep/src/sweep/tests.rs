use super::*;

#[tokio::test]
async fn test_connect_probes_v2_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/")
        .with_status(200)
        .with_header("Docker-Distribution-API-Version", "registry/2.0")
        .create_async()
        .await;

    let sweep = Sweep::connect(&server.url()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(sweep.registry_url(), server.url());
}

#[tokio::test]
async fn test_connect_fails_when_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_body("authentication required")
        .create_async()
        .await;

    let result = Sweep::connect(&server.url()).await;

    mock.assert_async().await;
    assert!(matches!(
        result.unwrap_err(),
        crate::error::SweepError::Authentication { .. }
    ));
}

#[tokio::test]
async fn test_builder_passes_credentials_through() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/")
        .match_header("Authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .create_async()
        .await;

    let sweep = Sweep::builder(&server.url())
        .with_credentials(Credentials::basic("user", "pass"))
        .build()
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(sweep.registry_url(), server.url());
}

#[tokio::test]
async fn test_builder_applies_config_page_size() {
    let mut server = mockito::Server::new_async().await;
    let _probe = server
        .mock("GET", "/v2/")
        .with_status(200)
        .create_async()
        .await;
    let catalog = server
        .mock("GET", "/v2/_catalog?n=5")
        .with_status(200)
        .with_body(r#"{"repositories":["alpine"]}"#)
        .create_async()
        .await;

    let config = Config::from_yaml_str("pagination:\n  page_size: 5\n").unwrap();
    let sweep = Sweep::builder(&server.url())
        .with_config(config)
        .build()
        .await
        .unwrap();
    let repos = sweep.list_repositories().await;

    catalog.assert_async().await;
    assert_eq!(repos, vec!["alpine"]);
}
