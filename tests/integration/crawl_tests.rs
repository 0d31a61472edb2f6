//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the library site and run the
//! full page-range crawl end-to-end against temporary folders.

use book_harvest::config::{HttpConfig, RunConfig, SiteConfig, TextWriteMode};
use book_harvest::crawler::Coordinator;
use book_harvest::output::read_collection;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Site configuration pointing at the mock server
fn create_site_config(server: &MockServer) -> SiteConfig {
    SiteConfig {
        base_url: format!("{}/", server.uri()),
        http: HttpConfig {
            timeout_secs: 5,
            ..HttpConfig::default()
        },
        ..SiteConfig::default()
    }
}

/// Run configuration writing everything under `dir`
fn create_run_config(dir: &TempDir, start_page: u32, end_page: Option<u32>) -> RunConfig {
    RunConfig {
        start_page,
        end_page,
        folder_books: dir.path().join("books"),
        folder_img: dir.path().join("img"),
        json_path: dir.path().to_path_buf(),
        ..RunConfig::default()
    }
}

fn catalog_html(ids: &[u32], page_count: Option<u32>) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<table class="d_book"><tr><td><a href="/b{}/">Book {}</a></td></tr></table>"#,
                id, id
            )
        })
        .collect();

    let pagination: String = match page_count {
        Some(count) => (2..=count)
            .map(|p| format!(r#"<a class="npage" href="/l55/{}/">{}</a>"#, p, p))
            .collect(),
        None => String::new(),
    };

    format!(
        r#"<html><body>{}<p class="center"><span class="npage_select"><b>1</b></span>{}</p></body></html>"#,
        cards, pagination
    )
}

fn detail_html(heading: &str, id: u32) -> String {
    format!(
        r#"<html><body>
        <table class="tabs"><tr><td class="ow_px_td">
          <h1>{}</h1>
          <table><tr><td><div class="bookimage"><img src="/shots/{}.jpg"></div></td></tr></table>
          <span class="d_book">Жанр книги: <a href="/l55/">Научная фантастика</a></span>
        </td></tr></table>
        </body></html>"#,
        heading, id
    )
}

fn book_text(id: u32) -> String {
    format!("Text of book {}\n", id)
}

async fn mount_catalog_page(server: &MockServer, page: u32, ids: &[u32], page_count: Option<u32>) {
    Mock::given(method("GET"))
        .and(path(format!("/l55/{}/", page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(catalog_html(ids, page_count))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_detail_page(server: &MockServer, id: u32, heading: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/b{}/", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_html(heading, id))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_text_export(server: &MockServer, id: u32) {
    let file = format!("/files/{}.txt", id);

    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", id.to_string().as_str()))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", file.as_str()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(file))
        .respond_with(ResponseTemplate::new(200).set_body_string(book_text(id)))
        .mount(server)
        .await;
}

async fn mount_cover(server: &MockServer, id: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/shots/{}.jpg", id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![id as u8; 4]))
        .mount(server)
        .await;
}

/// Mounts a complete, well-formed book
async fn mount_book(server: &MockServer, id: u32) {
    mount_detail_page(server, id, &format!("Book {} \u{a0} :: \u{a0} Author {}", id, id)).await;
    mount_text_export(server, id).await;
    mount_cover(server, id).await;
}

async fn mount_homepage(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>home</html>"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_redirecting_book_is_skipped() {
    let server = MockServer::start().await;
    mount_homepage(&server).await;
    mount_catalog_page(&server, 1, &[1, 2, 3], None).await;
    mount_book(&server, 1).await;
    mount_book(&server, 3).await;

    // Missing books redirect to the homepage
    Mock::given(method("GET"))
        .and(path("/b2/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .mount(&server)
        .await;

    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(LevelFilter::ERROR)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(create_site_config(&server), create_run_config(&dir, 1, Some(1)))
            .expect("Failed to create coordinator");
    let outcome = coordinator.run().await.expect("Crawl failed");

    let errors: Vec<String> = logs
        .lines()
        .into_iter()
        .filter(|line| line.contains("ERROR"))
        .collect();
    assert_eq!(errors.len(), 1, "expected one error line, got {:?}", errors);
    assert!(errors[0].contains("/b2/"));

    let titles: Vec<&str> = outcome.records.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(titles, vec!["Book 1", "Book 3"]);
    assert_eq!(outcome.records[0].author, "Author 1");
    assert_eq!(outcome.stats.books_seen, 3);
    assert_eq!(outcome.stats.books_failed(), 1);
    assert_eq!(outcome.stats.books_not_found, 1);

    let written = read_collection(&dir.path().join("book_page_information.json")).unwrap();
    assert_eq!(written, outcome.records);

    assert!(dir.path().join("books/Book 1.txt").exists());
    assert!(dir.path().join("books/Book 3.txt").exists());
    assert!(!dir.path().join("books/Book 2.txt").exists());
    assert_eq!(fs::read(dir.path().join("img/3.jpg")).unwrap(), vec![3u8; 4]);
}

#[tokio::test]
async fn test_skip_imgs_keeps_texts_and_image_names() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[1, 2], None).await;
    for id in [1, 2] {
        mount_detail_page(&server, id, &format!("Book {} :: Author {}", id, id)).await;
        mount_text_export(&server, id).await;
    }

    Mock::given(method("GET"))
        .and(path("/shots/1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8]))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let run = RunConfig {
        skip_imgs: true,
        ..create_run_config(&dir, 1, Some(1))
    };
    let mut coordinator = Coordinator::new(create_site_config(&server), run).unwrap();
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.stats.images_saved, 0);
    assert_eq!(outcome.stats.texts_saved, 2);
    assert!(!dir.path().join("img").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("books/Book 2.txt")).unwrap(),
        book_text(2)
    );

    let raw = fs::read_to_string(dir.path().join("book_page_information.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["image_name"], "1.jpg");
    assert_eq!(value[1]["image_name"], "2.jpg");
}

#[tokio::test]
async fn test_skip_txt_never_requests_export() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[1], None).await;
    mount_detail_page(&server, 1, "Book 1 :: Author 1").await;
    mount_cover(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/files/1.txt"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let run = RunConfig {
        skip_txt: true,
        ..create_run_config(&dir, 1, Some(1))
    };
    let mut coordinator = Coordinator::new(create_site_config(&server), run).unwrap();
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert!(!dir.path().join("books").exists());
    assert!(dir.path().join("img/1.jpg").exists());
}

#[tokio::test]
async fn test_repeated_runs_append_text() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[1], None).await;
    mount_book(&server, 1).await;

    let dir = TempDir::new().unwrap();
    for _ in 0..2 {
        let mut coordinator =
            Coordinator::new(create_site_config(&server), create_run_config(&dir, 1, Some(1)))
                .unwrap();
        let outcome = coordinator.run().await.expect("Crawl failed");
        assert_eq!(outcome.records.len(), 1);
    }

    // Append mode does not deduplicate across runs
    let text = fs::read_to_string(dir.path().join("books/Book 1.txt")).unwrap();
    assert_eq!(text, format!("{}{}", book_text(1), book_text(1)));

    // Images are rewritten, not accumulated
    assert_eq!(fs::read(dir.path().join("img/1.jpg")).unwrap(), vec![1u8; 4]);
}

#[tokio::test]
async fn test_overwrite_mode_replaces_text() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[1], None).await;
    mount_book(&server, 1).await;

    let dir = TempDir::new().unwrap();
    for _ in 0..2 {
        let run = RunConfig {
            txt_mode: TextWriteMode::Overwrite,
            ..create_run_config(&dir, 1, Some(1))
        };
        let mut coordinator = Coordinator::new(create_site_config(&server), run).unwrap();
        coordinator.run().await.expect("Crawl failed");
    }

    let text = fs::read_to_string(dir.path().join("books/Book 1.txt")).unwrap();
    assert_eq!(text, book_text(1));
}

#[tokio::test]
async fn test_discovered_page_count_is_inclusive_end() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[1], Some(3)).await;
    mount_catalog_page(&server, 2, &[2], None).await;
    mount_catalog_page(&server, 3, &[3], None).await;
    for id in 1..=3 {
        mount_book(&server, id).await;
    }

    Mock::given(method("GET"))
        .and(path("/l55/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_html(&[4], None)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(create_site_config(&server), create_run_config(&dir, 1, None)).unwrap();

    assert_eq!(coordinator.page_range().await, 1..=3);

    let outcome = coordinator.run().await.expect("Crawl failed");
    let titles: Vec<&str> = outcome.records.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(titles, vec!["Book 1", "Book 2", "Book 3"]);
    assert_eq!(outcome.stats.pages_listed, 3);
}

#[tokio::test]
async fn test_malformed_title_is_skipped() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[1, 2], None).await;
    mount_detail_page(&server, 1, "A title without an author").await;
    mount_book(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(create_site_config(&server), create_run_config(&dir, 1, Some(1)))
            .unwrap();
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].filename, "Book 2");
    assert_eq!(outcome.stats.books_failed(), 1);
    assert_eq!(outcome.stats.books_not_found, 0);
}

#[tokio::test]
async fn test_text_export_landing_on_homepage_skips_book() {
    let server = MockServer::start().await;
    mount_homepage(&server).await;
    mount_catalog_page(&server, 1, &[1, 2], None).await;
    mount_book(&server, 1).await;
    mount_detail_page(&server, 2, "Book 2 :: Author 2").await;
    mount_cover(&server, 2).await;

    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "2"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(create_site_config(&server), create_run_config(&dir, 1, Some(1)))
            .unwrap();
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].filename, "Book 1");
    assert_eq!(outcome.stats.books_not_found, 1);
    assert!(!dir.path().join("books/Book 2.txt").exists());
}

#[tokio::test]
async fn test_failed_catalog_page_does_not_abort_run() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[1], None).await;
    mount_book(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/l55/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(create_site_config(&server), create_run_config(&dir, 1, Some(2)))
            .unwrap();
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.stats.pages_listed, 1);
    assert_eq!(outcome.stats.pages_failed, 1);
    assert!(outcome.output_path.exists());
}

#[tokio::test]
async fn test_empty_catalog_page_writes_empty_collection() {
    let server = MockServer::start().await;
    mount_catalog_page(&server, 1, &[], None).await;

    let dir = TempDir::new().unwrap();
    let mut coordinator =
        Coordinator::new(create_site_config(&server), create_run_config(&dir, 1, Some(1)))
            .unwrap();
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert!(outcome.records.is_empty());
    let raw = fs::read_to_string(&outcome.output_path).unwrap();
    assert_eq!(raw.trim(), "[]");
}
