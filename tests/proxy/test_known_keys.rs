//! Known-key reads: synchronous and live.

use super::init_logging;
use partial_proxy::{PartialProxy, Property};
use std::collections::HashMap;
use std::io;
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_known_key_is_ready_before_resolver_settles() -> anyhow::Result<()> {
    init_logging();
    let (_release, gate) = oneshot::channel::<()>();

    let proxy = PartialProxy::new(HashMap::from([("a", 1)]), move || async move {
        let _ = gate.await;
        Ok::<_, io::Error>(HashMap::from([("a", 2), ("b", 3)]))
    })?;

    assert!(matches!(proxy.get("a"), Property::Ready(Some(1))));
    assert!(proxy.get("a").is_ready());
    Ok(())
}

#[tokio::test]
async fn test_known_key_reflects_merge() -> anyhow::Result<()> {
    init_logging();
    let (release, gate) = oneshot::channel::<()>();

    let proxy = PartialProxy::new(HashMap::from([("a", 1)]), move || async move {
        let _ = gate.await;
        Ok::<_, io::Error>(HashMap::from([("a", 2), ("b", 3)]))
    })?;

    assert!(matches!(proxy.get("a"), Property::Ready(Some(1))));
    release.send(()).unwrap();
    assert_eq!(proxy.value("b").await?, Some(3));
    assert!(matches!(proxy.get("a"), Property::Ready(Some(2))));
    Ok(())
}

#[tokio::test]
async fn test_delayed_resolver_scenario() -> anyhow::Result<()> {
    init_logging();
    let proxy = PartialProxy::new(HashMap::from([("a", 1)]), || async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, io::Error>(HashMap::from([("a", 2), ("b", 3)]))
    })?;

    assert!(matches!(proxy.get("a"), Property::Ready(Some(1))));
    assert_eq!(proxy.value("b").await?, Some(3));
    assert!(matches!(proxy.get("a"), Property::Ready(Some(2))));
    Ok(())
}

#[tokio::test]
async fn test_membership_is_frozen_at_construction() -> anyhow::Result<()> {
    init_logging();
    let proxy = PartialProxy::new(HashMap::from([("a", 1)]), || async {
        Ok::<_, io::Error>(HashMap::from([("b", 3)]))
    })?;

    proxy.complete().await?;

    // "b" is in the live object now but still reads as deferred.
    assert!(proxy.is_known(&"a"));
    assert!(!proxy.is_known(&"b"));
    assert!(!proxy.get("b").is_ready());
    assert_eq!(proxy.known_keys().collect::<Vec<_>>(), vec![&"a"]);
    Ok(())
}

#[tokio::test]
async fn test_snapshot_tracks_live_object() -> anyhow::Result<()> {
    init_logging();
    let (release, gate) = oneshot::channel::<()>();

    let proxy = PartialProxy::new(HashMap::from([("a", 1)]), move || async move {
        let _ = gate.await;
        Ok::<_, io::Error>(HashMap::from([("b", 3)]))
    })?;

    assert_eq!(proxy.snapshot(), HashMap::from([("a", 1)]));
    release.send(()).unwrap();
    let complete = proxy.complete().await?;

    assert_eq!(complete, HashMap::from([("a", 1), ("b", 3)]));
    assert_eq!(proxy.snapshot(), complete);
    Ok(())
}
