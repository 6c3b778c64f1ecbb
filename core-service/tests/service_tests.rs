//! End-to-end tests for the service façade

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::time::Clock;
use bridge_traits::BridgeError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_library::{BookFilter, BookPatch, BookSort, NewBook, SortField};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, LibraryEvent, LookupEvent};
use core_service::{CoreService, ErrorKind};
use mockall::mock;
use std::sync::{Arc, Mutex};

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

struct SteppingClock {
    current: Mutex<DateTime<Utc>>,
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap();
        let now = *current;
        *current = now + Duration::seconds(1);
        now
    }
}

const DUNE_VOLUME: &str = r#"{
    "items": [{
        "volumeInfo": {
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "publishedDate": "1965-08-01",
            "pageCount": 412,
            "categories": ["Fiction"],
            "industryIdentifiers": [
                {"type": "ISBN_10", "identifier": "0441172717"},
                {"type": "ISBN_13", "identifier": "9780441172719"}
            ]
        }
    }]
}"#;

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn offline_client() -> MockHttpClient {
    let mut mock = MockHttpClient::new();
    mock.expect_execute().never();
    mock
}

fn service_with(http_client: MockHttpClient) -> CoreService {
    let clock = SteppingClock {
        current: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
    };
    let config = CoreConfig::builder()
        .in_memory_database()
        .http_client(Arc::new(http_client))
        .clock(Arc::new(clock))
        .build()
        .unwrap();
    CoreService::new(config)
}

fn book(title: &str, author: &str) -> NewBook {
    NewBook::new(title, author)
}

#[tokio::test]
async fn test_not_ready_until_initialized_and_after_shutdown() {
    let core = service_with(offline_client());

    assert!(!core.is_ready());
    let err = core.list_all().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReady);
    let err = core.add_book(book("Dune", "Frank Herbert")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReady);

    core.initialize().await.unwrap();
    assert!(core.is_ready());
    assert!(core.list_all().unwrap().is_empty());

    // Second call is a no-op
    core.initialize().await.unwrap();
    assert!(core.is_ready());

    core.shutdown().await;
    assert!(!core.is_ready());
    assert_eq!(
        core.search(&BookFilter::new(), None).unwrap_err().kind(),
        ErrorKind::NotReady
    );
    assert_eq!(core.refresh().await.unwrap_err().kind(), ErrorKind::NotReady);
}

#[tokio::test]
async fn test_unopenable_store_leaves_service_not_ready() {
    let config = CoreConfig::builder()
        .database_path("/nonexistent-dir/for/bookshelf/books.db")
        .http_client(Arc::new(offline_client()))
        .build()
        .unwrap();
    let core = CoreService::new(config);

    let err = core.initialize().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    assert!(!core.is_ready());
    assert_eq!(core.list_all().unwrap_err().kind(), ErrorKind::NotReady);
}

#[tokio::test]
async fn test_collection_flow() {
    let core = service_with(offline_client());
    core.initialize().await.unwrap();
    let mut events = core.subscribe();

    let dune = core
        .add_book(NewBook {
            genre: Some("Science Fiction".to_string()),
            personal_rating: Some(5),
            pages: Some(412),
            ..book("Dune", "Frank Herbert")
        })
        .await
        .unwrap();
    let foundation = core
        .add_book(NewBook {
            genre: Some("Science Fiction".to_string()),
            series: Some("Foundation".to_string()),
            series_number: Some(1),
            personal_rating: Some(3),
            ..book("Foundation", "Isaac Asimov")
        })
        .await
        .unwrap();
    let war = core
        .add_book(NewBook {
            genre: Some("History".to_string()),
            is_read: true,
            personal_rating: Some(4),
            ..book("War and Peace", "Leo Tolstoy")
        })
        .await
        .unwrap();

    // The reload lands before the add notification
    assert!(matches!(
        events.recv().await.unwrap(),
        CoreEvent::Library(LibraryEvent::SnapshotRefreshed { count: 1 })
    ));
    match events.recv().await.unwrap() {
        CoreEvent::Library(LibraryEvent::BookAdded { book_id, .. }) => {
            assert_eq!(book_id, dune.id)
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // Snapshot is newest first
    let all = core.list_all().unwrap();
    let ids: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![war.id.as_str(), foundation.id.as_str(), dune.id.as_str()]);

    let by_author = core
        .search(&BookFilter::new(), Some(&BookSort::desc(SortField::Author)))
        .unwrap();
    let titles: Vec<&str> = by_author.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["War and Peace", "Foundation", "Dune"]);

    let unread = core.search(&BookFilter::new().is_read(false), None).unwrap();
    assert_eq!(unread.len(), 2);
    assert!(unread.iter().all(|b| !b.is_read));

    let updated = core
        .update_book(&dune.id, BookPatch::new().is_read(true))
        .await
        .unwrap();
    assert!(updated.is_read);
    assert_eq!(updated.date_added, dune.date_added);
    assert!(updated.date_modified > dune.date_modified);
    assert_eq!(core.get_book(&dune.id).unwrap(), updated);

    let stats = core.statistics().unwrap();
    assert_eq!(stats.total_books, 3);
    assert_eq!(stats.read_books, 2);
    assert_eq!(stats.unread_books, 1);
    assert_eq!(stats.top_genre.as_deref(), Some("Science Fiction"));
    assert_eq!(stats.total_pages, 412);

    let facets = core.facets().unwrap();
    assert_eq!(facets.genres, vec!["History", "Science Fiction"]);
    assert_eq!(facets.series, vec!["Foundation"]);

    let recent = core.recent_books(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, war.id);

    let top: Vec<String> = core
        .top_rated(10)
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(top, vec!["Dune", "War and Peace"]);

    core.delete_book(&foundation.id).await.unwrap();
    assert_eq!(
        core.get_book(&foundation.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        core.delete_book(&foundation.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(core.refresh().await.unwrap(), 2);

    core.shutdown().await;
}

#[tokio::test]
async fn test_invalid_input_is_constraint_violation() {
    let core = service_with(offline_client());
    core.initialize().await.unwrap();

    let err = core.add_book(book("   ", "Anonymous")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

    let err = core
        .add_book(NewBook {
            personal_rating: Some(6),
            ..book("Emma", "Jane Austen")
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

    assert!(core.list_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_by_isbn_without_initialize() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .withf(|req| req.url.ends_with("?q=isbn:9780441172719"))
        .times(1)
        .returning(|_| Ok(response(200, DUNE_VOLUME)));

    let core = service_with(mock);
    let mut events = core.subscribe();

    let candidate = core
        .lookup_by_isbn("978-0-441-17271-9")
        .await
        .unwrap()
        .expect("candidate");
    assert_eq!(candidate.title, "Dune");
    assert_eq!(candidate.author, "Frank Herbert");
    assert_eq!(candidate.isbn.as_deref(), Some("9780441172719"));
    assert_eq!(candidate.publication_year, Some(1965));

    match events.recv().await.unwrap() {
        CoreEvent::Lookup(LookupEvent::Completed { result_count, .. }) => {
            assert_eq!(result_count, 1)
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_lookup_failure_is_reported() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::NotAvailable("offline".to_string())));

    let core = service_with(mock);
    let mut events = core.subscribe();

    let err = core.lookup_by_query("dune").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LookupFailed);

    match events.recv().await.unwrap() {
        CoreEvent::Lookup(LookupEvent::Failed { query, .. }) => assert_eq!(query, "dune"),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_lookup_is_rejected_without_request() {
    let core = service_with(offline_client());

    let err = core.lookup_by_isbn("  ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    let err = core.lookup_by_query("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
}

#[tokio::test]
async fn test_add_from_lookup_persists_edited_candidate() {
    let mut mock = MockHttpClient::new();
    mock.expect_execute()
        .times(1)
        .returning(|_| Ok(response(200, DUNE_VOLUME)));

    let core = service_with(mock);
    core.initialize().await.unwrap();

    let candidates = core.lookup_by_query("dune herbert").await.unwrap();
    assert_eq!(candidates.len(), 1);

    let mut candidate = candidates.into_iter().next().unwrap();
    candidate.personal_notes = Some("Gift from Sam".to_string());

    let saved = core.add_from_lookup(candidate).await.unwrap();
    assert_eq!(saved.title, "Dune");
    assert_eq!(saved.pages, Some(412));
    assert_eq!(saved.personal_notes.as_deref(), Some("Gift from Sam"));
    assert_eq!(core.list_all().unwrap().len(), 1);
}
