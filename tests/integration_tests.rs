//! Integration tests for the news board
//!
//! These tests verify the full workflow from configuration loading
//! through document loading and page rendering.

use std::io::Write;
use tempfile::NamedTempFile;

mod common {
    use std::sync::Arc;
    use std::time::Duration;

    use axum_test::TestServer;
    use news_board::bootstrap::{bootstrap, http_client};
    use news_board::config::DataSource;
    use news_board::controller::TooltipSettings;
    use news_board::routes::{router, AppState};

    /// Bootstrap a board from `source` and wrap it in a test server
    pub async fn create_server(source: &DataSource) -> TestServer {
        let client = http_client(Duration::from_secs(5)).expect("Failed to build client");
        let board = bootstrap(source, &client).await;
        let state = Arc::new(AppState {
            board: Arc::new(board),
            tooltip: TooltipSettings::default(),
        });
        TestServer::new(router(state)).expect("Failed to start test server")
    }
}

#[cfg(test)]
mod config_integration_tests {
    use super::*;
    use news_board::config::{Config, DataSource};

    #[test]
    fn test_load_actual_board_config() {
        // Test loading the actual board.toml from the project
        let config = Config::load("board.toml");
        assert!(config.is_ok(), "Failed to load board.toml: {:?}", config.err());

        let config = config.unwrap();
        assert_eq!(config.data_source(), DataSource::File("public/data.json".into()));
        assert!(config.tooltip_delay_ms > 0, "tooltip delay should be positive");
    }

    #[test]
    fn test_config_with_remote_source() {
        let toml_content = r#"
            data_source = "https://news.example.com/data.json"
            tooltip_offset_px = 20
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(
            config.data_source(),
            DataSource::Url("https://news.example.com/data.json".into())
        );
        assert_eq!(config.tooltip().offset, 20);
        assert_eq!(config.bind, "0.0.0.0:3000");
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::common::*;
    use super::*;
    use news_board::config::DataSource;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOCUMENT: &str = r##"{
        "news": {
            "World": [
                {"title": "Undated story", "link": "https://world.example/undated"},
                {"title": "World story", "link": "https://world.example/1",
                 "published": "2024-03-01T10:00:00Z", "source_name": "Wire", "color": "#336699",
                 "summary": "Something happened"},
                {"title": "BR post", "link": "https://reddit.example/br/1", "type": "reddit",
                 "category": "br", "published": "2024-03-02T10:00:00Z"},
                {"title": "<script>alert(1)</script>", "link": "https://evil.example"}
            ],
            "Brazil": [
                {"title": "Notícia", "link": "https://br.example/1", "published": "Fri, 01 Mar 2024 12:00:00 GMT"}
            ],
            "Tech": [
                {"title": 17, "link": "https://broken.example"},
                {"title": "Job post", "link": "https://reddit.example/jobs/1", "type": "reddit",
                 "category": "jobs"}
            ]
        },
        "podcasts": {
            "Risky Biz": [
                {"title": "Episode 2", "link": "https://pod.example/2", "published": "2024-02-10T00:00:00Z"},
                {"title": "Episode 3", "link": "https://pod.example/3", "published": "2024-02-17T00:00:00Z"}
            ]
        }
    }"##;

    fn write_document(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_file_backed_board() {
        let file = write_document(DOCUMENT);
        let server = create_server(&DataSource::File(file.path().to_path_buf())).await;

        let response = server.get("/").await;
        response.assert_status_ok();
        let body = response.text();

        // Sidebar sections in order, empty Tech bucket omitted from News
        let reddit = body.find("<h2>Reddit</h2>").unwrap();
        let news = body.find("<h2>News</h2>").unwrap();
        let podcasts = body.find("<h2>Podcasts</h2>").unwrap();
        assert!(reddit < news && news < podcasts);
        assert!(body.contains(">br (1)</a>"));
        assert!(body.contains(">jobs (1)</a>"));
        assert!(body.contains(">Risky Biz (2)</a>"));
        assert!(!body.contains(r#"data-type="news" data-category="Tech""#));

        // Brazil is the lexicographically first category with news
        assert!(body.contains(r#"data-category="Brazil" class="active""#));
        assert!(body.contains("Notícia"));
    }

    #[tokio::test]
    async fn test_news_view_order_and_escaping() {
        let file = write_document(DOCUMENT);
        let server = create_server(&DataSource::File(file.path().to_path_buf())).await;

        let body = server.get("/view?type=news&category=World").await.text();

        let dated = body.find("World story").unwrap();
        let undated = body.find("Undated story").unwrap();
        assert!(dated < undated, "dated items come before undated ones");
        assert!(!body.contains("BR post"));
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(body.contains("background-color:#336699"));
        assert!(body.contains(r#"data-summary="Something happened""#));
    }

    #[tokio::test]
    async fn test_reddit_view_spans_buckets() {
        let file = write_document(DOCUMENT);
        let server = create_server(&DataSource::File(file.path().to_path_buf())).await;

        let body = server.get("/view?type=reddit&category=br").await.text();
        assert!(body.starts_with("<h2>🇧🇷 Brazil Reddit</h2>"));
        assert!(body.contains("BR post"));

        let body = server.get("/view?type=reddit&category=jobs").await.text();
        assert!(body.starts_with("<h2>Security Jobs</h2>"));
        assert!(body.contains("Job post"));
    }

    #[tokio::test]
    async fn test_podcast_view_newest_first() {
        let file = write_document(DOCUMENT);
        let server = create_server(&DataSource::File(file.path().to_path_buf())).await;

        let body = server
            .get("/view")
            .add_query_param("type", "podcast")
            .add_query_param("category", "Risky Biz")
            .await
            .text();
        let newer = body.find("Episode 3").unwrap();
        let older = body.find("Episode 2").unwrap();
        assert!(newer < older);
        assert!(!body.contains("source-tag"));
    }

    /// First `hx-get` target in `body` that starts with `prefix`.
    fn hx_get(body: &str, prefix: &str) -> String {
        let marker = format!(r#"hx-get="{}"#, prefix);
        let start = body.find(&marker).unwrap() + r#"hx-get=""#.len();
        let end = start + body[start..].find('"').unwrap();
        body[start..end].replace("&amp;", "&")
    }

    #[tokio::test]
    async fn test_follow_rendered_interaction_links() {
        let file = write_document(DOCUMENT);
        let server = create_server(&DataSource::File(file.path().to_path_buf())).await;
        let page = server.get("/").await.text();

        // Clicking a nav entry swaps the content and moves the active marker
        let view_url = hx_get(&page, "/view?type=podcast");
        let fragment = server.get(&view_url).await.text();
        assert!(fragment.starts_with("<h2>Risky Biz</h2>"));
        assert!(fragment.contains(r#"data-category="Risky Biz" class="active""#));
        assert!(!fragment.contains(r#"data-category="Brazil" class="active""#));

        // Hovering a title fetches its tooltip
        let world = server.get("/view?type=news&category=World").await.text();
        let tooltip_url = hx_get(&world, "/tooltip?summary=Something");
        let tooltip = server.get(&tooltip_url).await.text();
        assert!(tooltip.contains("<p>Something happened</p>"));
        assert!(tooltip.contains(r#"href="https://world.example/1""#));
    }

    #[tokio::test]
    async fn test_remote_document() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    r#"{"news":{"Tech":[{"title":"A","link":"https://x","published":"2024-01-01T00:00:00Z"}]}}"#,
                    "application/json",
                ),
            )
            .mount(&mock)
            .await;

        let server =
            create_server(&DataSource::Url(format!("{}/data.json", mock.uri()))).await;
        let body = server.get("/").await.text();

        assert!(body.contains(r#"data-category="Tech" class="active""#));
        assert_eq!(body.matches("<article").count(), 1);
        assert!(body.contains(">A</a>"));
    }

    #[tokio::test]
    async fn test_remote_server_error_shows_error_page() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock)
            .await;

        let server =
            create_server(&DataSource::Url(format!("{}/data.json", mock.uri()))).await;
        let body = server.get("/").await.text();

        assert!(body.contains(r#"<nav id="sidebar"></nav>"#));
        assert!(body.contains("<h2>Error</h2>"));
        assert!(body.contains("Please run the fetcher script"));
    }

    #[tokio::test]
    async fn test_null_document_shows_error_page() {
        let file = write_document("null");
        let server = create_server(&DataSource::File(file.path().to_path_buf())).await;
        let body = server.get("/").await.text();

        assert!(body.contains(r#"<nav id="sidebar"></nav>"#));
        assert!(body.contains("Could not load `data.json`"));
    }

    #[tokio::test]
    async fn test_empty_document() {
        let file = write_document("{}");
        let server = create_server(&DataSource::File(file.path().to_path_buf())).await;
        let body = server.get("/").await.text();

        assert!(body.contains("<p>No content found.</p>"));
        assert!(body.contains("No content available. Please run the fetcher and check logs."));
    }
}
