//! Integration tests for fingerprint caches

#[cfg(test)]
mod tests {
    use mirrorcheck_cache::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_cache_survives_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local.txt");

        let cache = FingerprintCache::load(&path).await.unwrap();
        assert!(cache.is_empty());
        cache
            .insert("https://origin.example/a.jar", "abc123")
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://origin.example/a.jar abc123\n");

        let reloaded = FingerprintCache::load(&path).await.unwrap();
        assert_eq!(
            reloaded.get("https://origin.example/a.jar").as_deref(),
            Some("abc123")
        );
    }

    #[tokio::test]
    async fn test_host_caches_reload_per_host_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("remote");

        {
            let caches = HostCaches::load(&dir).await.unwrap();
            caches
                .for_host("repo1.example")
                .insert("https://repo1.example/a.jar", "11")
                .await
                .unwrap();
            caches
                .for_host("127.0.0.1:9000")
                .insert("http://127.0.0.1:9000/a.jar", "22")
                .await
                .unwrap();
        }

        assert!(dir.join("repo1.example.txt").exists());
        assert!(dir.join("127.0.0.1_9000.txt").exists());

        let caches = HostCaches::load(&dir).await.unwrap();
        assert_eq!(caches.hosts(), 2);
        assert_eq!(
            caches
                .for_host("127.0.0.1:9000")
                .get("http://127.0.0.1:9000/a.jar")
                .as_deref(),
            Some("22")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_append_once_each() {
        let writer = Arc::new(MemoryCacheWriter::default());
        let cache = Arc::new(FingerprintCache::new(writer.clone()));

        let mut handles = Vec::new();
        for i in 0..32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                // every uri is inserted twice by different tasks
                let uri = format!("https://repo.example/{}.jar", i % 16);
                cache.insert(&uri, &format!("{i:04x}")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(cache.len(), 16);
        assert_eq!(writer.lines().len(), 16);
    }

    #[tokio::test]
    async fn test_unwritable_path_keeps_memory_entry() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let cache = FingerprintCache::new(Arc::new(FileCacheWriter::new(
            blocker.join("cache.txt"),
        )));
        assert!(cache.insert("https://a/x.jar", "ff").await.is_err());
        assert_eq!(cache.get("https://a/x.jar").as_deref(), Some("ff"));
    }

    #[tokio::test]
    async fn test_noop_writer_keeps_nothing() {
        let writer = NoopCacheWriter;
        for i in 0..1000 {
            writer
                .append(&format!("https://a/{i}.jar"), "ff")
                .await
                .unwrap();
        }

        let cache = FingerprintCache::new(Arc::new(writer));
        cache.insert("https://a/x.jar", "ff").await.unwrap();
        assert_eq!(cache.get("https://a/x.jar").as_deref(), Some("ff"));
    }

    #[tokio::test]
    async fn test_cache_set_layout() {
        let temp = TempDir::new().unwrap();

        let caches = CacheSet::load(temp.path()).await.unwrap();
        caches
            .local
            .insert("https://origin.example/a.jar", "aa")
            .await
            .unwrap();
        caches
            .remote
            .for_host("mirror.example")
            .insert("https://mirror.example/a.jar", "bb")
            .await
            .unwrap();

        assert!(temp.path().join(CacheSet::LOCAL_FILE).is_file());
        assert!(temp
            .path()
            .join(CacheSet::REMOTE_DIR)
            .join("mirror.example.txt")
            .is_file());

        let reloaded = CacheSet::load(temp.path()).await.unwrap();
        assert_eq!(reloaded.local.len(), 1);
        assert_eq!(reloaded.remote.entries(), 1);
    }
}
