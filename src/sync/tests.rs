#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use tempfile::TempDir;

    use crate::catalog::entry::{Category, Entry, EntryDraft};
    use crate::catalog::store::CatalogStore;
    use crate::sync::remote::{RemoteStore, SyncError};
    use crate::sync::{pull_once, SharedManager, SyncActivity, SyncManager, Ticket};

    fn remote_entry(id: &str, name: &str, url: &str, category: Category) -> Entry {
        Entry {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            icon: None,
            category,
            created_at: "2024-06-01T12:00:00+00:00".to_string(),
        }
    }

    fn draft(name: &str, url: &str, category: Category) -> EntryDraft {
        EntryDraft {
            name: name.to_string(),
            url: url.to_string(),
            icon: None,
            category,
        }
    }

    /// Serve the given (status, body) responses in order on a local port,
    /// capturing (method, path, request body) for each request.
    fn serve(
        responses: Vec<(u16, String)>,
    ) -> (String, thread::JoinHandle<Vec<(String, String, String)>>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let base = format!("http://{addr}");
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let Ok(mut request) = server.recv() else { break };
                let mut request_body = String::new();
                let _ = request.as_reader().read_to_string(&mut request_body);
                seen.push((
                    request.method().to_string(),
                    request.url().to_string(),
                    request_body,
                ));
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"application/json"[..],
                )
                .unwrap();
                let _ = request.respond(
                    tiny_http::Response::from_string(body)
                        .with_status_code(status)
                        .with_header(header),
                );
            }
            seen
        });
        (base, handle)
    }

    /// A base URL nothing listens on.
    fn refused_base() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    fn manager_in(temp_dir: &TempDir, base_url: &str) -> SyncManager {
        let store = CatalogStore::open(temp_dir.path().to_path_buf()).unwrap();
        SyncManager::open(store, RemoteStore::new(base_url))
    }

    #[test]
    fn test_pull_returns_remote_collection() -> Result<(), anyhow::Error> {
        let collection = vec![remote_entry(
            "remoteMail01",
            "Mail",
            "https://mail.example.com",
            Category::Business,
        )];
        let (base, handle) = serve(vec![(200, serde_json::to_string(&collection)?)]);

        let remote = RemoteStore::new(&base);
        let pulled = tauri::async_runtime::block_on(remote.pull("abc123")).unwrap();

        assert_eq!(pulled, collection);
        let seen = handle.join().unwrap();
        assert_eq!(seen[0].0, "GET");
        assert_eq!(seen[0].1, "/abc123/entries");

        Ok(())
    }

    #[test]
    fn test_pull_rejects_non_success_status() {
        let (base, _handle) = serve(vec![(500, "[]".to_string())]);

        let remote = RemoteStore::new(&base);
        let result = tauri::async_runtime::block_on(remote.pull("abc123"));

        assert!(matches!(result, Err(SyncError::RemoteStatus(500))));
    }

    #[test]
    fn test_pull_rejects_non_array_payload() {
        let (base, _handle) = serve(vec![(200, r#"{"not":"an array"}"#.to_string())]);

        let remote = RemoteStore::new(&base);
        let result = tauri::async_runtime::block_on(remote.pull("abc123"));

        assert!(matches!(result, Err(SyncError::MalformedPayload(_))));
    }

    #[test]
    fn test_pull_reports_transport_failure() {
        let remote = RemoteStore::new(refused_base());
        let result = tauri::async_runtime::block_on(remote.pull("abc123"));

        assert!(matches!(result, Err(SyncError::Transport(_))));
    }

    #[test]
    fn test_push_sends_the_full_collection() -> Result<(), anyhow::Error> {
        let collection = vec![
            remote_entry("a0a0a0a0a0a0", "One", "https://one.example.com", Category::Social),
            remote_entry("b1b1b1b1b1b1", "Two", "https://two.example.com", Category::Media),
        ];
        let (base, handle) = serve(vec![(200, String::new())]);

        let remote = RemoteStore::new(&base);
        tauri::async_runtime::block_on(remote.push("abc123", &collection)).unwrap();

        let seen = handle.join().unwrap();
        assert_eq!(seen[0].0, "POST");
        assert_eq!(seen[0].1, "/abc123/entries");
        let sent: Vec<Entry> = serde_json::from_str(&seen[0].2)?;
        assert_eq!(sent, collection);

        Ok(())
    }

    #[test]
    fn test_push_reports_non_success_status() {
        let (base, _handle) = serve(vec![(503, String::new())]);

        let remote = RemoteStore::new(&base);
        let result = tauri::async_runtime::block_on(remote.push("abc123", &[]));

        assert!(matches!(result, Err(SyncError::RemoteStatus(503))));
    }

    #[test]
    fn test_pull_replaces_local_and_persisted_state() -> Result<(), anyhow::Error> {
        let collection = vec![remote_entry(
            "remoteOnly01",
            "Remote",
            "https://remote.example.com",
            Category::Utilities,
        )];
        let (base, _handle) = serve(vec![(200, serde_json::to_string(&collection)?)]);

        let temp_dir = TempDir::new()?;
        let mut manager = manager_in(&temp_dir, &base);
        manager.set_key("abc123")?;
        let shared: SharedManager = Arc::new(Mutex::new(manager));

        tauri::async_runtime::block_on(pull_once(shared.clone()));

        let guard = shared.lock().unwrap();
        assert_eq!(guard.catalog.entries(), collection, "local state follows the remote");

        let reread = CatalogStore::open(temp_dir.path().to_path_buf())?;
        assert_eq!(reread.load(), collection, "pulled state is re-persisted");

        Ok(())
    }

    #[test]
    fn test_failed_pull_leaves_local_state_unchanged() -> Result<(), anyhow::Error> {
        let (base, _handle) = serve(vec![(500, String::new())]);

        let temp_dir = TempDir::new()?;
        let mut manager = manager_in(&temp_dir, &base);
        let added = manager.add(draft("Keep", "keep.example.com", Category::Utilities))?;
        manager.set_key("abc123")?;
        let before = manager.catalog.entries().to_vec();
        let shared: SharedManager = Arc::new(Mutex::new(manager));

        tauri::async_runtime::block_on(pull_once(shared.clone()));

        let guard = shared.lock().unwrap();
        assert_eq!(guard.catalog.entries(), before);
        assert_eq!(guard.catalog.entries()[0], added);
        assert_eq!(guard.status().status, SyncActivity::Idle);

        Ok(())
    }

    #[test]
    fn test_pull_without_a_key_is_a_noop() -> Result<(), anyhow::Error> {
        let temp_dir = TempDir::new()?;
        let manager = manager_in(&temp_dir, &refused_base());
        let before = manager.catalog.entries().to_vec();
        let shared: SharedManager = Arc::new(Mutex::new(manager));

        tauri::async_runtime::block_on(pull_once(shared.clone()));

        let guard = shared.lock().unwrap();
        assert_eq!(guard.catalog.entries(), before);

        Ok(())
    }

    #[test]
    fn test_mutation_persists_locally_even_when_push_fails() -> Result<(), anyhow::Error> {
        let temp_dir = TempDir::new()?;
        let mut manager = manager_in(&temp_dir, &refused_base());
        manager.set_key("abc123")?;

        let added = manager.add(draft("Mail", "mail.example.com", Category::Business))?;

        let reread = CatalogStore::open(temp_dir.path().to_path_buf())?;
        let persisted = reread.load();
        assert_eq!(persisted[0], added, "local persistence must not depend on the push");

        Ok(())
    }

    #[test]
    fn test_set_key_requires_a_non_empty_key() -> Result<(), anyhow::Error> {
        let temp_dir = TempDir::new()?;
        let mut manager = manager_in(&temp_dir, &refused_base());

        assert!(manager.set_key("").is_err());
        assert!(manager.set_key("   ").is_err());
        assert!(!manager.is_configured());

        manager.set_key("  abc123  ")?;
        assert!(manager.is_configured());
        assert_eq!(manager.sync_key.as_deref(), Some("abc123"), "keys are stored trimmed");

        Ok(())
    }

    #[test]
    fn test_key_survives_reopen_and_clear_unconfigures() -> Result<(), anyhow::Error> {
        let temp_dir = TempDir::new()?;
        let base = refused_base();

        let mut manager = manager_in(&temp_dir, &base);
        manager.set_key("abc123")?;

        let reopened = manager_in(&temp_dir, &base);
        assert!(reopened.is_configured(), "saved key must be picked up on startup");

        let mut manager = reopened;
        manager.clear_key()?;
        assert!(!manager.is_configured());

        let reopened = manager_in(&temp_dir, &base);
        assert!(!reopened.is_configured(), "cleared key must stay cleared after reopen");

        Ok(())
    }

    #[test]
    fn test_generated_keys_are_distinct() -> Result<(), anyhow::Error> {
        let temp_dir = TempDir::new()?;
        let mut manager = manager_in(&temp_dir, &refused_base());

        let first = manager.generate_key()?;
        let second = manager.generate_key()?;

        assert!(!first.is_empty());
        assert_ne!(first, second);
        assert!(manager.is_configured());
        assert_eq!(manager.sync_key.as_deref(), Some(second.as_str()));

        Ok(())
    }

    #[test]
    fn test_in_flight_indicator_counts_overlapping_operations() -> Result<(), anyhow::Error> {
        let temp_dir = TempDir::new()?;
        let manager = manager_in(&temp_dir, &refused_base());

        assert_eq!(manager.status().status, SyncActivity::Idle);

        let first = Ticket::hold(&manager.in_flight);
        let second = Ticket::hold(&manager.in_flight);
        assert_eq!(manager.status().status, SyncActivity::InFlight);

        drop(first);
        assert_eq!(
            manager.status().status,
            SyncActivity::InFlight,
            "one completing operation must not clear another's ticket"
        );

        drop(second);
        assert_eq!(manager.status().status, SyncActivity::Idle);

        Ok(())
    }
}
