use super::*;
use serial_test::serial;

#[tokio::test]
async fn test_stub_embedding_dimension_and_norm() {
    let embedder = StubEmbedder::new(64);

    let v = embedder.embed_query("tax lawyer").await.unwrap();

    assert_eq!(v.len(), 64);
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_stub_embedding_is_deterministic() {
    let embedder = StubEmbedder::new(32);

    let a = embedder.embed_query("radiologist").await.unwrap();
    let b = embedder.embed_query("radiologist").await.unwrap();
    let c = embedder.embed_query("banker").await.unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[tokio::test]
async fn test_stub_batch_preserves_order() {
    let embedder = StubEmbedder::new(16);
    let texts = vec!["first".to_string(), "second".to_string()];

    let batch = embedder.embed_batch(&texts).await.unwrap();

    assert_eq!(batch[0], embedder.embed_sync("first"));
    assert_eq!(batch[1], embedder.embed_sync("second"));
}

#[test]
fn test_normalize_zero_vector_unchanged() {
    assert_eq!(normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
}

#[test]
fn test_voyage_config_defaults() {
    let config = VoyageConfig::new("key");

    assert_eq!(config.model, "voyage-3");
    assert_eq!(config.dimension, 1024);
    assert_eq!(config.base_url, voyage::DEFAULT_VOYAGE_URL);
    assert!(config.validate().is_ok());
}

#[test]
fn test_voyage_config_rejects_empty_key() {
    let err = VoyageEmbedder::new(VoyageConfig::new("")).unwrap_err();

    assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
}

#[test]
#[serial]
fn test_voyage_config_from_env() {
    // SAFETY: Test code only, serialized with other env tests.
    unsafe {
        std::env::set_var("VOYAGE_API_KEY", " secret ");
        std::env::set_var("SCOUT_EMBEDDING_MODEL", "voyage-3-lite");
        std::env::set_var("SCOUT_EMBEDDING_DIM", "512");
        std::env::remove_var("SCOUT_VOYAGE_URL");
    }

    let config = VoyageConfig::from_env().unwrap();
    assert_eq!(config.api_key, "secret");
    assert_eq!(config.model, "voyage-3-lite");
    assert_eq!(config.dimension, 512);

    // SAFETY: Test code only, serialized with other env tests.
    unsafe {
        std::env::remove_var("VOYAGE_API_KEY");
        std::env::remove_var("SCOUT_EMBEDDING_MODEL");
        std::env::remove_var("SCOUT_EMBEDDING_DIM");
    }

    assert!(VoyageConfig::from_env().is_err());
}
