// tests/real_fs_smoke.rs

use std::error::Error;
use std::fs::{self, File};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use filewatcher::engine::FileWatcher;
use filewatcher::fs::RealFileSystem;
use filewatcher_test_utils::builders::WatchConfigBuilder;
use filewatcher_test_utils::counting_action::CountingAction;
use filewatcher_test_utils::{init_tracing, wait_until, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn modification_time_bump_on_disk_runs_action() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let watched = dir.path().join("nested").join("a.txt");
    fs::create_dir_all(watched.parent().unwrap())?;
    fs::write(&watched, b"one")?;
    fs::write(dir.path().join("ignored.log"), b"log")?;

    let config = WatchConfigBuilder::new()
        .root(dir.path())
        .glob("*.txt")
        .build();
    let action = CountingAction::new();
    let watcher = FileWatcher::new(&config, Arc::new(RealFileSystem), action.clone())?;
    let registry = watcher.registry().clone();
    let cancel = watcher.cancel_token();
    let handle = tokio::spawn(watcher.run());

    let settle = Duration::from_secs(5);
    assert!(wait_until(settle, || matches!(registry.files().get(&watched), Some(Some(_)))).await);
    assert!(!registry.files().contains(&dir.path().join("ignored.log")));

    File::options()
        .write(true)
        .open(&watched)?
        .set_modified(SystemTime::now() + Duration::from_secs(60))?;

    assert!(wait_until(settle, || action.runs() == 1).await);

    cancel.cancel();
    with_timeout(handle).await??;
    Ok(())
}
