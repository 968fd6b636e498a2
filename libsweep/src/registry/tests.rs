use super::*;
use crate::client::ClientConfig;

const DIGEST_A: &str = "sha256:4abcf20661432fb2d719b4568d94db3b6cf9b44bf2a3e1c2c6d0c89fd9e6e0b2";
const DIGEST_B: &str = "sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

fn registry(server: &mockito::Server) -> Registry {
    let client = Client::new(&server.url(), None).unwrap();
    Registry::new(client, RetentionPolicy::new())
}

fn registry_with_page_size(server: &mockito::Server, page_size: usize) -> Registry {
    let config = ClientConfig::new().with_page_size(page_size);
    let client = Client::with_config(&server.url(), config, None).unwrap();
    Registry::new(client, RetentionPolicy::new())
}

#[tokio::test]
async fn test_list_repositories_follows_cursor_chain() {
    let mut server = mockito::Server::new_async().await;

    let mock1 = server
        .mock("GET", "/v2/_catalog?n=2")
        .with_status(200)
        .with_header("Link", r#"</v2/_catalog?n=2&last=nginx>; rel="next""#)
        .with_body(r#"{"repositories":["alpine","nginx"]}"#)
        .create_async()
        .await;
    let mock2 = server
        .mock("GET", "/v2/_catalog?n=2&last=nginx")
        .with_status(200)
        .with_body(r#"{"repositories":["redis"]}"#)
        .create_async()
        .await;

    let registry = registry_with_page_size(&server, 2);
    let repos = registry.list_repositories().await;

    mock1.assert_async().await;
    mock2.assert_async().await;
    assert_eq!(repos, vec!["alpine", "nginx", "redis"]);
}

#[tokio::test]
async fn test_list_repositories_returns_partial_on_failure() {
    let mut server = mockito::Server::new_async().await;

    let mock1 = server
        .mock("GET", "/v2/_catalog?n=2")
        .with_status(200)
        .with_header("Link", r#"</v2/_catalog?n=2&last=nginx>; rel="next""#)
        .with_body(r#"{"repositories":["alpine","nginx"]}"#)
        .create_async()
        .await;
    let mock2 = server
        .mock("GET", "/v2/_catalog?n=2&last=nginx")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let registry = registry_with_page_size(&server, 2);
    let repos = registry.list_repositories().await;

    mock1.assert_async().await;
    mock2.assert_async().await;
    // Best-effort: everything accumulated before the failure comes back.
    assert_eq!(repos, vec!["alpine", "nginx"]);
}

#[tokio::test]
async fn test_list_repositories_stops_on_invalid_continuation() {
    let mut server = mockito::Server::new_async().await;

    // Link header without a `last` parameter: the walk must abort after
    // exactly one fetch, keeping the first page.
    let mock = server
        .mock("GET", "/v2/_catalog?n=100")
        .with_status(200)
        .with_header("Link", r#"</v2/_catalog?n=100>; rel="next""#)
        .with_body(r#"{"repositories":["alpine"]}"#)
        .expect(1)
        .create_async()
        .await;

    let registry = registry(&server);
    let repos = registry.list_repositories().await;

    mock.assert_async().await;
    assert_eq!(repos, vec!["alpine"]);
}

#[tokio::test]
async fn test_list_tags_follows_cursor_chain() {
    let mut server = mockito::Server::new_async().await;

    let mock1 = server
        .mock("GET", "/v2/develop/api/tags/list?n=2")
        .with_status(200)
        .with_header(
            "Link",
            r#"</v2/develop/api/tags/list?n=2&last=v-2>; rel="next""#,
        )
        .with_body(r#"{"name":"develop/api","tags":["v-1","v-2"]}"#)
        .create_async()
        .await;
    let mock2 = server
        .mock("GET", "/v2/develop/api/tags/list?n=2&last=v-2")
        .with_status(200)
        .with_body(r#"{"name":"develop/api","tags":["v-10"]}"#)
        .create_async()
        .await;

    let registry = registry_with_page_size(&server, 2);
    let tags = registry.list_tags("develop/api").await;

    mock1.assert_async().await;
    mock2.assert_async().await;
    assert_eq!(tags, vec!["v-1", "v-2", "v-10"]);
}

#[tokio::test]
async fn test_list_tags_tolerates_missing_tags_field() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/v2/develop/api/tags/list?n=100")
        .with_status(200)
        .with_body(r#"{"name":"develop/api"}"#)
        .create_async()
        .await;

    let registry = registry(&server);
    let tags = registry.list_tags("develop/api").await;

    mock.assert_async().await;
    assert!(tags.is_empty());
}

#[tokio::test]
async fn test_clean_repository_deletes_all_but_newest() {
    let mut server = mockito::Server::new_async().await;

    let tags_mock = server
        .mock("GET", "/v2/develop/api/tags/list?n=100")
        .with_status(200)
        .with_body(r#"{"name":"develop/api","tags":["v-1","v-2","v-10"]}"#)
        .create_async()
        .await;

    let head_v1 = server
        .mock("HEAD", "/v2/develop/api/manifests/v-1")
        .with_status(200)
        .with_header("Docker-Content-Digest", DIGEST_A)
        .create_async()
        .await;
    let head_v2 = server
        .mock("HEAD", "/v2/develop/api/manifests/v-2")
        .with_status(200)
        .with_header("Docker-Content-Digest", DIGEST_B)
        .create_async()
        .await;

    let delete_a = server
        .mock(
            "DELETE",
            format!("/v2/develop/api/manifests/{}", DIGEST_A).as_str(),
        )
        .with_status(202)
        .create_async()
        .await;
    let delete_b = server
        .mock(
            "DELETE",
            format!("/v2/develop/api/manifests/{}", DIGEST_B).as_str(),
        )
        .with_status(202)
        .create_async()
        .await;

    // No HEAD or DELETE mock exists for v-10: touching it would fail the run.
    let registry = registry(&server);
    let report = registry.clean_repository("develop/api", false).await;

    tags_mock.assert_async().await;
    head_v1.assert_async().await;
    head_v2.assert_async().await;
    delete_a.assert_async().await;
    delete_b.assert_async().await;

    assert_eq!(report.retained.as_deref(), Some("v-10"));
    assert_eq!(report.deleted, vec!["v-1", "v-2"]);
    assert!(report.failed.is_empty());
    assert!(!report.dry_run);
}

#[tokio::test]
async fn test_clean_repository_isolates_per_tag_failures() {
    let mut server = mockito::Server::new_async().await;

    let _tags_mock = server
        .mock("GET", "/v2/develop/api/tags/list?n=100")
        .with_status(200)
        .with_body(r#"{"name":"develop/api","tags":["v-1","v-2","v-3","v-10"]}"#)
        .create_async()
        .await;

    // v-1 and v-3 resolve and delete; v-2's digest resolution fails.
    let _head_v1 = server
        .mock("HEAD", "/v2/develop/api/manifests/v-1")
        .with_status(200)
        .with_header("Docker-Content-Digest", DIGEST_A)
        .create_async()
        .await;
    let head_v2 = server
        .mock("HEAD", "/v2/develop/api/manifests/v-2")
        .with_status(404)
        .create_async()
        .await;
    let _head_v3 = server
        .mock("HEAD", "/v2/develop/api/manifests/v-3")
        .with_status(200)
        .with_header("Docker-Content-Digest", DIGEST_B)
        .create_async()
        .await;

    let delete_a = server
        .mock(
            "DELETE",
            format!("/v2/develop/api/manifests/{}", DIGEST_A).as_str(),
        )
        .with_status(202)
        .create_async()
        .await;
    let delete_b = server
        .mock(
            "DELETE",
            format!("/v2/develop/api/manifests/{}", DIGEST_B).as_str(),
        )
        .with_status(202)
        .create_async()
        .await;

    let registry = registry(&server);
    let report = registry.clean_repository("develop/api", false).await;

    head_v2.assert_async().await;
    delete_a.assert_async().await;
    delete_b.assert_async().await;

    // The bad tag is recorded and skipped; its siblings still proceed.
    assert_eq!(report.deleted, vec!["v-1", "v-3"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].tag, "v-2");
}

#[tokio::test]
async fn test_clean_repository_records_failed_delete() {
    let mut server = mockito::Server::new_async().await;

    let _tags_mock = server
        .mock("GET", "/v2/develop/api/tags/list?n=100")
        .with_status(200)
        .with_body(r#"{"name":"develop/api","tags":["v-1","v-2"]}"#)
        .create_async()
        .await;
    let _head_v1 = server
        .mock("HEAD", "/v2/develop/api/manifests/v-1")
        .with_status(200)
        .with_header("Docker-Content-Digest", DIGEST_A)
        .create_async()
        .await;
    // Registry refuses the delete; there is no retry.
    let delete_mock = server
        .mock(
            "DELETE",
            format!("/v2/develop/api/manifests/{}", DIGEST_A).as_str(),
        )
        .with_status(405)
        .expect(1)
        .create_async()
        .await;

    let registry = registry(&server);
    let report = registry.clean_repository("develop/api", false).await;

    delete_mock.assert_async().await;
    assert!(report.deleted.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].tag, "v-1");
}

#[tokio::test]
async fn test_clean_repository_dry_run_issues_no_deletes() {
    let mut server = mockito::Server::new_async().await;

    let _tags_mock = server
        .mock("GET", "/v2/develop/api/tags/list?n=100")
        .with_status(200)
        .with_body(r#"{"name":"develop/api","tags":["v-1","v-2"]}"#)
        .create_async()
        .await;
    let head_v1 = server
        .mock("HEAD", "/v2/develop/api/manifests/v-1")
        .with_status(200)
        .with_header("Docker-Content-Digest", DIGEST_A)
        .create_async()
        .await;
    let delete_mock = server
        .mock(
            "DELETE",
            format!("/v2/develop/api/manifests/{}", DIGEST_A).as_str(),
        )
        .expect(0)
        .create_async()
        .await;

    let registry = registry(&server);
    let report = registry.clean_repository("develop/api", true).await;

    head_v1.assert_async().await;
    delete_mock.assert_async().await;
    assert!(report.dry_run);
    assert_eq!(report.deleted, vec!["v-1"]);
}

#[tokio::test]
async fn test_clean_filters_repositories_by_prefix() {
    let mut server = mockito::Server::new_async().await;

    let _catalog = server
        .mock("GET", "/v2/_catalog?n=100")
        .with_status(200)
        .with_body(r#"{"repositories":["develop/api","prod/api"]}"#)
        .create_async()
        .await;
    // Only the develop repository is walked for tags.
    let tags_mock = server
        .mock("GET", "/v2/develop/api/tags/list?n=100")
        .with_status(200)
        .with_body(r#"{"name":"develop/api","tags":["v-1"]}"#)
        .expect(1)
        .create_async()
        .await;
    let prod_tags = server
        .mock("GET", "/v2/prod/api/tags/list?n=100")
        .expect(0)
        .create_async()
        .await;

    let registry = registry(&server);
    let summary = registry.clean("develop", false).await;

    tags_mock.assert_async().await;
    prod_tags.assert_async().await;

    assert_eq!(summary.skipped, vec!["prod/api"]);
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].repository, "develop/api");
    // A single tag means nothing to delete: the sole tag is retained.
    assert!(summary.reports[0].deleted.is_empty());
    assert_eq!(summary.reports[0].retained.as_deref(), Some("v-1"));
}
