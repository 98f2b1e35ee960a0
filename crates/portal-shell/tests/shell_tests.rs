//! Shell Tests
//!
//! Navigation, view selection, the stale-navigation guard, and retry.

use portal_loader::{LoadPhase, ModuleLoader};
use portal_registry::ModuleRegistry;
use portal_shell::{Mounted, RouteTable, Shell, ShellError, View};
use portal_test_utils::{loader_with, portal_entry, Reply, ScriptedFetcher};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const SETTLE: Duration = Duration::from_millis(20);

fn shell_with(fetcher: &Arc<ScriptedFetcher>) -> Shell {
    Shell::new(
        "shell",
        RouteTable::with_defaults(),
        loader_with(Arc::clone(fetcher)),
    )
    .unwrap()
}

fn mounted_module(mounted: &Mounted) -> Option<&str> {
    match mounted.view() {
        Some(View::Module { module, .. }) => Some(module.as_str()),
        _ => None,
    }
}

#[tokio::test]
async fn test_starts_on_home() {
    let fetcher = Arc::new(ScriptedFetcher::serving_portals());
    let shell = shell_with(&fetcher);

    assert_eq!(shell.current().path, "/");
    assert_eq!(
        shell.current_view(),
        View::Home {
            title: "shell".to_string()
        }
    );
    assert!(matches!(
        shell.visit("/").await,
        Mounted::Current(View::Home { .. })
    ));
}

#[tokio::test]
async fn test_attendance_route_mounts_attendance_module() {
    let fetcher = Arc::new(ScriptedFetcher::serving_portals());
    let shell = shell_with(&fetcher);

    let mounted = shell.visit("/attendance-portal").await;

    assert_eq!(mounted_module(&mounted), Some("attendance-portal"));
    let page = shell.render(mounted.view().unwrap()).unwrap();
    assert!(page.contains("attendance-portal content"));
    assert!(page.contains("<a href=\"/attendance-portal\" aria-current=\"page\">AttendancePortal</a>"));
    assert_eq!(fetcher.calls("attendance-portal"), 1);
}

#[tokio::test]
async fn test_unknown_path_renders_not_found() {
    let fetcher = Arc::new(ScriptedFetcher::serving_portals());
    let shell = shell_with(&fetcher);

    let mounted = shell.visit("/nonexistent?tab=2").await;

    assert_eq!(
        mounted,
        Mounted::Current(View::NotFound {
            path: "/nonexistent".to_string()
        })
    );
    assert!(shell
        .loader()
        .snapshot()
        .iter()
        .all(|(_, phase)| *phase == LoadPhase::NotRequested));
}

#[tokio::test]
async fn test_loading_indicator_while_fetching() {
    let fetcher = Arc::new(ScriptedFetcher::serving_portals());
    fetcher.hold("dashboard");
    let shell = shell_with(&fetcher);

    let navigation = shell.navigate("/dashboard");
    assert!(matches!(shell.current_view(), View::Loading { .. }));

    let (mounted, ()) = tokio::join!(shell.resolve(&navigation), async {
        tokio::time::sleep(SETTLE).await;
        let view = shell.current_view();
        assert!(matches!(view, View::Loading { ref module } if module.as_str() == "dashboard"));
        assert!(shell.render(&view).unwrap().contains("aria-busy=\"true\""));
        fetcher.release("dashboard");
    });

    assert_eq!(mounted_module(&mounted), Some("dashboard"));
    assert!(matches!(shell.current_view(), View::Module { .. }));
}

#[tokio::test]
async fn test_late_load_is_not_mounted_after_navigating_away() {
    let fetcher = Arc::new(ScriptedFetcher::serving_portals());
    fetcher.hold("dashboard");
    let shell = shell_with(&fetcher);

    let navigation = shell.navigate("/dashboard");
    let (late, current) = tokio::join!(shell.resolve(&navigation), async {
        tokio::time::sleep(SETTLE).await;
        let current = shell.visit("/employee-portal").await;
        fetcher.release("dashboard");
        current
    });

    assert_eq!(
        late,
        Mounted::Stale {
            path: "/dashboard".to_string()
        }
    );
    assert_eq!(mounted_module(&current), Some("employee-portal"));
    assert!(matches!(
        shell.current_view(),
        View::Module { ref module, .. } if module.as_str() == "employee-portal"
    ));

    // The abandoned load still completed and is cached
    assert_eq!(
        shell.loader().state("dashboard").unwrap().phase(),
        LoadPhase::Loaded
    );
    let again = shell.visit("/dashboard").await;
    assert_eq!(mounted_module(&again), Some("dashboard"));
    assert_eq!(fetcher.calls("dashboard"), 1);
}

#[tokio::test]
async fn test_failed_load_shows_error_then_retry_recovers() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.push("payroll-portal", Reply::Status(503));
    fetcher.serve("payroll-portal", Reply::Entry(portal_entry("payroll-portal")));
    let shell = shell_with(&fetcher);

    let mounted = shell.visit("/payroll-portal").await;
    match mounted.view() {
        Some(View::Error {
            module, retryable, ..
        }) => {
            assert_eq!(module, "payroll-portal");
            assert!(*retryable);
        }
        other => panic!("expected error view, got {other:?}"),
    }
    assert!(shell.current_view().is_error());
    assert!(shell
        .render(&shell.current_view())
        .unwrap()
        .contains("data-action=\"retry\""));

    let retried = shell.retry().await;

    assert_eq!(mounted_module(&retried), Some("payroll-portal"));
    assert_eq!(fetcher.calls("payroll-portal"), 2);
    assert_eq!(shell.current().path, "/payroll-portal");
}

#[tokio::test]
async fn test_back_and_forward_replay_history() {
    let fetcher = Arc::new(ScriptedFetcher::serving_portals());
    let shell = shell_with(&fetcher);

    shell.visit("/dashboard").await;
    shell.visit("/sales-portal").await;

    let back = shell.back().unwrap();
    assert_eq!(back.path, "/dashboard");
    assert_eq!(mounted_module(&shell.resolve(&back).await), Some("dashboard"));

    let forward = shell.forward().unwrap();
    assert_eq!(forward.path, "/sales-portal");
    assert!(shell.forward().is_none());

    assert_eq!(shell.back().unwrap().path, "/dashboard");
    assert_eq!(shell.back().unwrap().path, "/");
    assert!(shell.back().is_none());

    // A new navigation drops the forward entries
    shell.navigate("/post-portal");
    assert!(shell.forward().is_none());
    assert_eq!(shell.back().unwrap().path, "/");
}

#[tokio::test]
async fn test_history_events_supersede_pending_navigation() {
    let fetcher = Arc::new(ScriptedFetcher::serving_portals());
    let shell = shell_with(&fetcher);
    let first = shell.navigate("/inventory-portal");

    let back = shell.back().unwrap();

    assert!(!shell.is_current(&first));
    assert!(shell.is_current(&back));
    assert!(matches!(
        shell.resolve(&first).await,
        Mounted::Stale { .. }
    ));
}

#[tokio::test]
async fn test_routes_must_name_registered_modules() {
    let registry = ModuleRegistry::builder()
        .remote("dashboard", "http://remotes.test:4203")
        .unwrap()
        .build();
    let loader = Arc::new(ModuleLoader::new(
        Arc::new(registry),
        Arc::new(ScriptedFetcher::serving_portals()),
    ));

    let err = Shell::new("shell", RouteTable::with_defaults(), loader).unwrap_err();

    assert!(matches!(err, ShellError::Registry(_)));
    assert!(err.is_configuration());
}
