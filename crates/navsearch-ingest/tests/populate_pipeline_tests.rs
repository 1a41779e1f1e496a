//! Populate pipeline tests against a mock source site
//!
//! Drives the full scrape -> dedup -> fetch -> retry -> replace sequence with
//! wiremock standing in for the remote index and document host, and an
//! in-memory store standing in for PostgreSQL.

use async_trait::async_trait;
use navsearch_common::types::{MessageRecord, MessageType, FAIL_TEXT};
use navsearch_ingest::message::{
    MessagePipeline, MessageStore, PipelineStats, Result as IngestResult, SearchHit,
};
use navsearch_ingest::IngestConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory stand-in for the document store
#[derive(Default, Clone)]
struct MemoryStore {
    records: Arc<Mutex<HashMap<String, MessageRecord>>>,
}

impl MemoryStore {
    fn insert(&self, record: MessageRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    fn get(&self, id: &str) -> Option<MessageRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn remove_where(&self, message_type: MessageType, year: &str) -> IngestResult<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, r| !(r.message_type == message_type && r.year == year));
        Ok((before - records.len()) as u64)
    }

    async fn bulk_insert(&self, new_records: &[MessageRecord]) -> IngestResult<u64> {
        let mut records = self.records.lock().unwrap();
        for record in new_records {
            records.insert(record.id.clone(), record.clone());
        }
        Ok(new_records.len() as u64)
    }

    async fn replace_years(
        &self,
        message_type: MessageType,
        years: &[String],
        new_records: &[MessageRecord],
    ) -> IngestResult<u64> {
        for year in years {
            self.remove_where(message_type, year).await?;
        }
        self.bulk_insert(new_records).await
    }

    async fn find_one(
        &self,
        message_type: MessageType,
        year: &str,
        num: &str,
    ) -> IngestResult<Option<MessageRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .find(|r| r.message_type == message_type && r.year == year && r.num == num)
            .cloned())
    }

    async fn find_all(&self, message_type: MessageType) -> IngestResult<Vec<MessageRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|r| r.message_type == message_type)
            .cloned()
            .collect())
    }

    async fn text_search(&self, queries: &[String]) -> IngestResult<Vec<Vec<SearchHit>>> {
        Ok(queries.iter().map(|_| Vec::new()).collect())
    }
}

const INDEX_PATH: &str = "/bupers-npc/reference/messages/NAVADMINS/Pages/NAVADMIN2016.aspx";

fn index_html(domain: &str) -> String {
    format!(
        r#"<html><body>
        <a href="{domain}/msgs/NAV16001.txt">NAVADMIN 001/16</a>
        <a href="{domain}/msgs/NAV16002.txt">NAVADMIN 002/16</a>
        <a href="{domain}/msgs/NAV16001.txt">NAVADMIN 001/16 (duplicate)</a>
        <a href="{domain}/msgs/NAV16003.txt">NAVADMIN 003/16</a>
        <a href="{domain}/msgs/BUP16099.txt">unknown code</a>
        <a href="{domain}/msgs/NAV16004.pdf">not a text doc</a>
        </body></html>"#
    )
}

fn fast_config(domain: &str) -> IngestConfig {
    let mut config = IngestConfig::default().with_domain(domain);
    config.chunk_size = 2;
    config.chunk_delay_ms = 0;
    config.retry_passes = 2;
    config.retry_base_ms = 0;
    config.retry_max_ms = 0;
    config.request_timeout_secs = 5;
    config
}

async fn mount_index(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_html(&server.uri())))
        .mount(server)
        .await;
}

async fn mount_body(server: &MockServer, num: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/msgs/NAV16{}.txt", num)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn run_pipeline(server: &MockServer, store: &MemoryStore) -> IngestResult<PipelineStats> {
    let config = fast_config(&server.uri());
    let pipeline = MessagePipeline::new(&config, store.clone())?;
    pipeline.run(MessageType::Navadmin, &["16".to_string()]).await
}

#[tokio::test]
async fn test_full_run_scrapes_dedupes_and_persists() {
    let server = MockServer::start().await;
    mount_index(&server).await;
    mount_body(&server, "001", "UNCLAS NAVADMIN 001/16").await;
    mount_body(&server, "002", "UNCLAS NAVADMIN 002/16").await;
    mount_body(&server, "003", "UNCLAS NAVADMIN 003/16").await;

    let store = MemoryStore::default();
    let stats = run_pipeline(&server, &store).await.unwrap();

    // 4 txt anchors with known codes, one a duplicate
    assert_eq!(stats.scraped, 4);
    assert_eq!(stats.unique, 3);
    assert_eq!(stats.persisted, 3);
    assert_eq!(stats.failed, 0);

    let record = store.get("NAVADMIN16002").unwrap();
    assert_eq!(record.text.as_deref(), Some("UNCLAS NAVADMIN 002/16"));
    assert_eq!(record.year, "16");
    assert_eq!(record.num, "002");
}

#[tokio::test]
async fn test_unfetchable_record_persists_with_sentinel() {
    let server = MockServer::start().await;
    mount_index(&server).await;
    mount_body(&server, "001", "UNCLAS NAVADMIN 001/16").await;
    mount_body(&server, "002", "UNCLAS NAVADMIN 002/16").await;
    // NAV16003.txt is never mounted: every attempt 404s

    let store = MemoryStore::default();
    let stats = run_pipeline(&server, &store).await.unwrap();

    // The run still completes and persists everything
    assert_eq!(stats.persisted, 3);
    assert_eq!(stats.failed, 1);

    let failed = store.get("NAVADMIN16003").unwrap();
    assert_eq!(failed.text.as_deref(), Some(FAIL_TEXT));

    let healthy = store.get("NAVADMIN16001").unwrap();
    assert!(!healthy.is_request_fail());
}

#[tokio::test]
async fn test_retry_pass_recovers_transient_failure() {
    let server = MockServer::start().await;
    mount_index(&server).await;
    mount_body(&server, "001", "UNCLAS NAVADMIN 001/16").await;
    mount_body(&server, "002", "UNCLAS NAVADMIN 002/16").await;

    // First attempt fails, later attempts succeed
    Mock::given(method("GET"))
        .and(path("/msgs/NAV16003.txt"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_body(&server, "003", "UNCLAS NAVADMIN 003/16").await;

    let store = MemoryStore::default();
    let stats = run_pipeline(&server, &store).await.unwrap();

    assert_eq!(stats.failed, 0);
    let recovered = store.get("NAVADMIN16003").unwrap();
    assert_eq!(recovered.text.as_deref(), Some("UNCLAS NAVADMIN 003/16"));
}

#[tokio::test]
async fn test_repeated_runs_converge() {
    let server = MockServer::start().await;
    mount_index(&server).await;
    mount_body(&server, "001", "UNCLAS NAVADMIN 001/16").await;
    mount_body(&server, "002", "UNCLAS NAVADMIN 002/16").await;
    mount_body(&server, "003", "UNCLAS NAVADMIN 003/16").await;

    let store = MemoryStore::default();
    let first = run_pipeline(&server, &store).await.unwrap();
    let after_first = store.len();
    let second = run_pipeline(&server, &store).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.len(), after_first);
}

#[tokio::test]
async fn test_replace_removes_records_absent_from_index() {
    let server = MockServer::start().await;
    mount_index(&server).await;
    mount_body(&server, "001", "UNCLAS NAVADMIN 001/16").await;
    mount_body(&server, "002", "UNCLAS NAVADMIN 002/16").await;
    mount_body(&server, "003", "UNCLAS NAVADMIN 003/16").await;

    let store = MemoryStore::default();

    // A previously-persisted record that the index no longer lists
    let mut stale = navsearch_ingest::message::parse_message_uri("/msgs/NAV16099.txt").unwrap();
    stale.text = Some("old body".to_string());
    store.insert(stale);

    run_pipeline(&server, &store).await.unwrap();

    assert!(store.get("NAVADMIN16099").is_none());
    let found = store.get("NAVADMIN16001");
    assert!(found.is_some());
}

#[tokio::test]
async fn test_index_failure_aborts_run_and_preserves_store() {
    let server = MockServer::start().await;
    // No index mock mounted: the scrape gets a 404

    let store = MemoryStore::default();
    let mut existing = navsearch_ingest::message::parse_message_uri("/msgs/NAV16001.txt").unwrap();
    existing.text = Some("prior body".to_string());
    store.insert(existing);

    let result = run_pipeline(&server, &store).await;
    assert!(result.is_err());

    // Replace never ran, so the prior data set survives the failed run
    assert_eq!(store.len(), 1);
    assert!(store.get("NAVADMIN16001").is_some());
}
