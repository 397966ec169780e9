// Globalhotkeys Manager Integration Tests
//
// End-to-end through the manager: ManualBackend hook delivery, tracker,
// registry and tokio callback dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use globalhotkeys::{
    HookKind, HotkeyCallback, HotkeyError, HotkeyManager, LifecycleState, ManagerOptions,
    ManualBackend, Stroke, VirtualKey,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn manager_on_current_runtime() -> (Arc<ManualBackend>, HotkeyManager<ManualBackend>) {
    init_logger();
    let backend = Arc::new(ManualBackend::new());
    let manager = HotkeyManager::with_handle(
        Arc::clone(&backend),
        Handle::current(),
        ManagerOptions::default(),
    );
    (backend, manager)
}

/// Callback that reports its binding name on a channel
fn reporting(name: &'static str, tx: &mpsc::UnboundedSender<&'static str>) -> HotkeyCallback {
    let tx = tx.clone();
    HotkeyCallback::new(move || {
        let tx = tx.clone();
        async move {
            let _ = tx.send(name);
        }
    })
}

async fn expect_fire(rx: &mut mpsc::UnboundedReceiver<&'static str>) -> &'static str {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("callback did not fire")
        .expect("channel closed")
}

async fn expect_silence(rx: &mut mpsc::UnboundedReceiver<&'static str>) {
    assert!(timeout(Duration::from_millis(150), rx.recv()).await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_press_fires_once_while_held() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    manager
        .register(Some("save"), "Ctrl + S", reporting("save", &tx))
        .unwrap();
    manager.start(false).unwrap();

    backend.emit(Stroke::down(VirtualKey::LControl));
    backend.emit(Stroke::down(VirtualKey::S));
    assert_eq!(expect_fire(&mut rx).await, "save");

    // Autorepeat while held
    backend.emit(Stroke::down(VirtualKey::S));
    backend.emit(Stroke::down(VirtualKey::S));
    expect_silence(&mut rx).await;

    backend.emit(Stroke::up(VirtualKey::S));
    backend.emit(Stroke::down(VirtualKey::S));
    assert_eq!(expect_fire(&mut rx).await, "save");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_up_trigger_fires_on_release() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    manager.register(None, "A Up", reporting("release", &tx)).unwrap();
    manager.start(false).unwrap();

    backend.emit(Stroke::down(VirtualKey::A));
    expect_silence(&mut rx).await;

    backend.emit(Stroke::up(VirtualKey::A));
    assert_eq!(expect_fire(&mut rx).await, "release");
    expect_silence(&mut rx).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mouse_hook_feeds_matching() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    manager
        .register(None, "Shift + XButton1", reporting("back", &tx))
        .unwrap();
    manager.start(true).unwrap();
    assert!(backend.is_installed(HookKind::Mouse));

    backend.emit(Stroke::down(VirtualKey::RShift));
    backend.emit(Stroke::down(VirtualKey::XButton1));
    assert_eq!(expect_fire(&mut rx).await, "back");
    manager.stop();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_change_combination_and_callback() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = manager.register(None, "F1", reporting("old", &tx)).unwrap();
    manager.start(false).unwrap();

    assert!(manager.change_combination(&id, "F2").unwrap());
    assert!(manager.change_callback(&id, reporting("new", &tx)).unwrap());

    backend.emit(Stroke::down(VirtualKey::F1));
    expect_silence(&mut rx).await;
    backend.emit(Stroke::down(VirtualKey::F2));
    assert_eq!(expect_fire(&mut rx).await, "new");

    let bindings = manager.list_bindings();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].to_string(), format!("{}: F2", id));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_callback_does_not_block_matching() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    manager
        .register(
            None,
            "S",
            HotkeyCallback::new(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }),
        )
        .unwrap();
    manager.register(None, "F", reporting("fast", &tx)).unwrap();
    manager.start(false).unwrap();

    backend.emit(Stroke::down(VirtualKey::S));
    backend.emit(Stroke::down(VirtualKey::F));
    assert_eq!(expect_fire(&mut rx).await, "fast");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_panicking_callback_is_isolated() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    manager
        .register(None, "P", HotkeyCallback::from_fn(|| panic!("callback failure")))
        .unwrap();
    manager.register(None, "O", reporting("ok", &tx)).unwrap();
    manager.start(false).unwrap();

    backend.emit(Stroke::down(VirtualKey::P));
    backend.emit(Stroke::up(VirtualKey::P));
    backend.emit(Stroke::down(VirtualKey::O));
    assert_eq!(expect_fire(&mut rx).await, "ok");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_after_stop_are_ignored() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    manager.register(None, "Z", reporting("z", &tx)).unwrap();
    manager.start(true).unwrap();
    manager.stop();
    assert_eq!(manager.state(), LifecycleState::Stopped);

    assert!(!backend.emit(Stroke::down(VirtualKey::Z)));
    expect_silence(&mut rx).await;

    manager.start(false).unwrap();
    backend.emit(Stroke::down(VirtualKey::Z));
    assert_eq!(expect_fire(&mut rx).await, "z");
}

#[tokio::test]
async fn test_events_queued_at_stop_do_not_arm_next_run() {
    let (backend, manager) = manager_on_current_runtime();
    let (tx, mut rx) = mpsc::unbounded_channel();
    manager.register(Some("a"), "A", reporting("a", &tx)).unwrap();
    manager.start(false).unwrap();

    // The worker shares this thread, so the press is still queued at stop
    backend.emit(Stroke::down(VirtualKey::A));
    manager.stop();
    assert!(!manager.is_armed("a"));

    // The queued press is still matched
    assert_eq!(expect_fire(&mut rx).await, "a");
    tokio::task::yield_now().await;
    assert!(!manager.is_armed("a"));

    // Its release happened while stopped; a fresh press must fire
    manager.start(false).unwrap();
    backend.emit(Stroke::down(VirtualKey::A));
    assert_eq!(expect_fire(&mut rx).await, "a");
    assert!(manager.is_armed("a"));
}

#[test]
fn test_mouse_install_failure_rolls_back() {
    init_logger();
    let backend = Arc::new(ManualBackend::new());
    backend.fail_install(HookKind::Mouse, true);
    let manager = HotkeyManager::new(Arc::clone(&backend)).unwrap();

    for own_loop in [false, true] {
        let err = manager.start(own_loop).unwrap_err();
        assert!(matches!(err, HotkeyError::HookInstallFailed(_)));
        assert!(!manager.is_running());
        assert!(!backend.is_installed(HookKind::Keyboard));
        assert!(!backend.is_installed(HookKind::Mouse));
    }

    backend.fail_install(HookKind::Mouse, false);
    manager.start(false).unwrap();
    assert!(manager.is_running());
}

#[test]
fn test_concurrent_unregister_never_double_fires() {
    init_logger();
    for _ in 0..20 {
        let backend = Arc::new(ManualBackend::new());
        let manager = Arc::new(HotkeyManager::new(Arc::clone(&backend)).unwrap());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        manager
            .register(
                Some("hot"),
                "A",
                HotkeyCallback::from_fn(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        manager.start(false).unwrap();

        let feeder = {
            let backend = Arc::clone(&backend);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    backend.emit(Stroke::down(VirtualKey::A));
                }
            })
        };
        let remover = {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || manager.unregister("hot"))
        };
        feeder.join().unwrap();
        assert!(remover.join().unwrap());

        std::thread::sleep(Duration::from_millis(50));
        assert!(fired.load(Ordering::SeqCst) <= 1);
        assert!(!manager.is_armed("hot"));
    }
}
