//! Setup phases fail independently.

mod common;

use folio_core::event::HostEvent;
use folio_core::host::Dom;
use folio_core::testing::{VirtualHost, el};
use folio_runtime::config::SiteConfig;
use folio_runtime::error::{SetupErrorKind, SetupPhase};
use folio_runtime::site::Site;
use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;

use common::standard;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("folio_runtime=debug"))
        .with_test_writer()
        .try_init();
}

#[test]
fn broken_filters_do_not_block_navigation() {
    init_logging();
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let root = host.root();
    host.append(root, el("button").class("svc-filter").attr("data-filter", "web"));
    let mut site = Site::new(host, SiteConfig::default());

    let report = site.setup().clone();
    assert!(!report.is_clean());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].phase, SetupPhase::Filters);
    assert!(matches!(
        report.failed[0].kind,
        SetupErrorKind::Malformed { .. }
    ));
    assert_eq!(
        report.completed,
        vec![
            SetupPhase::Reveal,
            SetupPhase::Navigation,
            SetupPhase::Responsive,
        ]
    );

    assert!(site.filter_engine().is_none());
    assert_eq!(site.filter("web"), None);
    site.handle_event(HostEvent::Click {
        target: page.links[2],
    });
    assert_eq!(site.active_section(), Some("services"));
    assert_eq!(site.host().observed(), page.reveals);
}

#[test]
fn page_without_sections_still_filters() {
    init_logging();
    let mut host = VirtualHost::new();
    let root = host.root();
    host.append(root, el("button").class("svc-filter").attr("data-filter", "all"));
    host.append(root, el("button").class("svc-filter").attr("data-filter", "web"));
    host.append(root, el("div").class("svc-card").attr("data-category", "web"));
    let mut site = Site::new(host, SiteConfig::default());

    let report = site.setup().clone();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].phase, SetupPhase::Navigation);
    assert!(report.completed(SetupPhase::Filters));
    assert_eq!(
        report.failed[0].to_string(),
        "navigation setup: no element matches `.section`"
    );

    assert!(site.filter("web").is_some());
    assert_eq!(site.active_section(), None);
    let outcome = site.handle_event(HostEvent::HashChange {
        hash: "#home".to_string(),
    });
    assert!(!outcome.handled);
}

#[test]
fn setup_runs_once() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    let mut site = Site::new(host, SiteConfig::default());

    assert!(site.setup().is_clean());
    site.filter("web");
    site.handle_event(HostEvent::DomReady);
    assert_eq!(site.current_filter(), Some("web"));
    assert!(site.report().is_some_and(|r| r.completed.len() == 4));
}

#[test]
fn events_before_setup_are_ignored() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = Site::new(host, SiteConfig::default());

    for event in [
        HostEvent::Click {
            target: page.buttons[1],
        },
        HostEvent::Resize {
            width: 320,
            height: 640,
        },
        HostEvent::HashChange {
            hash: "#about".to_string(),
        },
    ] {
        assert!(!site.handle_event(event).handled);
    }
    assert_eq!(site.pending_timers(), 0);
    assert!(!site.host().has_class(page.buttons[1], "is-active"));
}

#[test]
fn reduced_motion_skips_reveal_but_freezes_transitions() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    host.set_reduced_motion(true);
    let mut site = Site::new(host, SiteConfig::default());
    assert!(site.setup().is_clean());

    assert!(site.host().observed().is_empty());
    assert!(!site.reveal().is_initialized());
    for &el in &page.reveals {
        assert_eq!(site.host().style(el, "transition").as_deref(), Some("none"));
    }
}

#[test]
fn motion_returning_thaws_and_arms_reveal() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    host.set_reduced_motion(true);
    let mut site = Site::new(host, SiteConfig::default());
    site.setup();

    site.host_mut().set_reduced_motion(false);
    assert!(site.handle_event(HostEvent::MotionPreference { reduced: false }).handled);
    for &el in &page.reveals {
        assert_eq!(site.host().style(el, "transition"), None);
    }
    assert!(site.reveal().is_initialized());
    assert_eq!(site.host().observed(), page.reveals);
    assert!(!site.filter_engine().unwrap().reduced_motion());
}

#[test]
fn reveal_is_one_shot_through_the_site() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = common::site(host);

    let first = site.handle_event(HostEvent::Intersecting {
        target: page.reveals[0],
    });
    assert!(first.handled);
    assert!(site.host().has_class(page.reveals[0], "is-visible"));
    let again = site.handle_event(HostEvent::Intersecting {
        target: page.reveals[0],
    });
    assert!(!again.handled);
    assert_eq!(site.host().observed(), vec![page.reveals[1]]);
}

#[test]
fn shutdown_drops_timers_and_observers() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    let mut site = common::site(host);
    site.filter("web");
    assert!(site.pending_timers() > 0);

    site.shutdown();
    assert_eq!(site.pending_timers(), 0);
    assert!(site.host().observed().is_empty());
}
