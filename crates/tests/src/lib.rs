//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试（JSON 字段名）
//! - 端到端测试：目录树 → 监听器 → 分发器 → REST / Pub/Sub / Log

#[cfg(test)]
mod contract_tests {
    use contracts::{ItemStatus, StatusRecord};

    #[test]
    fn test_record_wire_shape() {
        let record = StatusRecord {
            item_name: "build-pipeline-A".to_string(),
            item_url: "job/build-pipeline-A/".to_string(),
            ci_url: "http://ci.example/".to_string(),
            user_id: None,
            user_name: None,
            config_content: None,
            created_at: None,
            updated_at: None,
            status: ItemStatus::Deleted,
        };

        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["ciURL", "itemName", "itemURL", "status"]);
        assert_eq!(json["status"], "DELETED");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{GathererSettings, ItemEvent, ItemListener};
    use dispatcher::{
        ChannelPublisher, DispatcherBuilder, PubSubMessage, LOG_SINK, PUBSUB_SINK, REST_SINK,
    };
    use gatherer::ItemStatsListener;
    use host::{FsItem, StaticHostContext, CONFIG_FILE};
    use tempfile::TempDir;
    use tokio::sync::{broadcast, mpsc};

    type Bodies = mpsc::UnboundedReceiver<serde_json::Value>;

    /// Spawn a REST endpoint answering with `status`
    async fn spawn_endpoint(status: StatusCode) -> (String, Bodies) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new()
            .route(
                "/api/projects",
                post(
                    move |State(tx): State<mpsc::UnboundedSender<serde_json::Value>>,
                          Json(body): Json<serde_json::Value>| async move {
                        let _ = tx.send(body);
                        status
                    },
                ),
            )
            .with_state(tx);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/api/projects"), rx)
    }

    fn settings(endpoint: &str, enabled: bool) -> GathererSettings {
        let toml = format!(
            r#"
project_info = {enabled}
project_endpoint = "{endpoint}"

[host]
root_url = "https://ci.example/"
principal = "alice"

[delivery]
timeout_ms = 2000

[[users]]
id = "alice"
full_name = "Alice Liddell"
"#
        );
        ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap()
    }

    struct Harness {
        listener: ItemStatsListener<GathererSettings>,
        host: StaticHostContext,
        messages: broadcast::Receiver<PubSubMessage>,
    }

    async fn harness(settings: GathererSettings) -> Harness {
        let publisher = ChannelPublisher::new(16);
        let messages = publisher.subscribe();
        let dispatcher = DispatcherBuilder::new(&settings)
            .channel_publisher(publisher)
            .build()
            .await
            .unwrap();

        Harness {
            host: StaticHostContext::from_settings(&settings, None),
            listener: ItemStatsListener::new(Arc::new(dispatcher), settings),
            messages,
        }
    }

    fn job_dir(root: &Path, name: &str, config: &str) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE), config).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_e2e_updated_disabled_job() {
        let (endpoint, mut bodies) = spawn_endpoint(StatusCode::OK).await;
        let mut h = harness(settings(&endpoint, true)).await;
        let root = TempDir::new().unwrap();
        let dir = job_dir(
            root.path(),
            "build-pipeline-A",
            "<?xml version='1.0' encoding='UTF-8'?>\n<project><disabled>true</disabled></project>",
        );
        let item = FsItem::open(&dir).unwrap();

        let report = h
            .listener
            .handle(ItemEvent::Updated, &item, &h.host)
            .await
            .unwrap();
        assert!(report.is_complete());
        let names: Vec<_> = report.outcomes.iter().map(|o| o.sink.as_str()).collect();
        assert_eq!(names, vec![REST_SINK, PUBSUB_SINK, LOG_SINK]);

        let body = bodies.recv().await.unwrap();
        assert_eq!(body["itemName"], "build-pipeline-A");
        assert_eq!(body["itemURL"], "job/build-pipeline-A/");
        assert_eq!(body["ciURL"], "https://ci.example/");
        assert_eq!(body["status"], "DISABLED");
        assert_eq!(body["userId"], "alice");
        assert_eq!(body["userName"], "Alice Liddell");
        assert!(body["updatedAt"].is_string());
        assert!(body.get("createdAt").is_none());
        assert!(body["configContent"].as_str().unwrap().contains("<disabled>true"));

        let message = h.messages.recv().await.unwrap();
        assert_eq!(message.attributes["status"], "DISABLED");
        let published: serde_json::Value = serde_json::from_slice(&message.payload).unwrap();
        assert_eq!(published, body);
    }

    #[tokio::test]
    async fn test_e2e_created_with_unreadable_config() {
        let (endpoint, mut bodies) = spawn_endpoint(StatusCode::OK).await;
        let mut h = harness(settings(&endpoint, true)).await;
        let root = TempDir::new().unwrap();
        let dir = job_dir(root.path(), "fresh", "<project/>");
        let item = FsItem::open(&dir).unwrap();
        std::fs::remove_file(dir.join(CONFIG_FILE)).unwrap();

        h.listener.on_created(&item, &h.host).await;

        let body = bodies.recv().await.unwrap();
        assert_eq!(body["status"], "ACTIVE");
        assert!(body["createdAt"].is_string());
        assert!(body.get("updatedAt").is_none());
        assert!(body.get("configContent").is_none());
    }

    #[tokio::test]
    async fn test_e2e_rest_500_on_delete() {
        let (endpoint, mut bodies) = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;
        let mut h = harness(settings(&endpoint, true)).await;
        let root = TempDir::new().unwrap();
        let item = FsItem::open(job_dir(root.path(), "legacy", "<project/>")).unwrap();

        let report = h
            .listener
            .handle(ItemEvent::Deleted, &item, &h.host)
            .await
            .unwrap();

        let rest = report.outcome(REST_SINK).unwrap();
        assert!(rest.error.as_deref().unwrap().contains("500"));
        assert!(report.outcome(PUBSUB_SINK).unwrap().delivered());
        assert!(report.outcome(LOG_SINK).unwrap().delivered());

        let body = bodies.recv().await.unwrap();
        assert_eq!(body["status"], "DELETED");
        assert!(body.get("configContent").is_none());

        let message = h.messages.recv().await.unwrap();
        assert_eq!(message.attributes["itemName"], "legacy");
    }

    #[tokio::test]
    async fn test_e2e_unreachable_endpoint_does_not_block_pubsub() {
        let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = closed.local_addr().unwrap();
        drop(closed);

        let mut h = harness(settings(&format!("http://{addr}/api/projects"), true)).await;
        let root = TempDir::new().unwrap();
        let item = FsItem::open(job_dir(root.path(), "job", "<project/>")).unwrap();

        h.listener.on_updated(&item, &h.host).await;

        let message = h.messages.recv().await.unwrap();
        assert_eq!(message.attributes["status"], "ACTIVE");
    }

    #[tokio::test]
    async fn test_e2e_flag_off_is_noop() {
        let (endpoint, mut bodies) = spawn_endpoint(StatusCode::OK).await;
        let mut h = harness(settings(&endpoint, false)).await;
        let root = TempDir::new().unwrap();
        let item = FsItem::open(job_dir(root.path(), "job", "<project/>")).unwrap();

        assert!(h
            .listener
            .handle(ItemEvent::Created, &item, &h.host)
            .await
            .is_none());
        h.listener.on_updated(&item, &h.host).await;
        h.listener.on_deleted(&item, &h.host).await;

        assert!(bodies.try_recv().is_err());
        assert!(h.messages.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_e2e_folder_is_noop() {
        let (endpoint, mut bodies) = spawn_endpoint(StatusCode::OK).await;
        let mut h = harness(settings(&endpoint, true)).await;
        let root = TempDir::new().unwrap();
        let folder_dir = root.path().join("team");
        std::fs::create_dir(&folder_dir).unwrap();
        let folder = FsItem::open(&folder_dir).unwrap();

        h.listener.on_created(&folder, &h.host).await;
        h.listener.on_deleted(&folder, &h.host).await;

        assert!(bodies.try_recv().is_err());
        assert!(h.messages.try_recv().is_err());
    }
}
