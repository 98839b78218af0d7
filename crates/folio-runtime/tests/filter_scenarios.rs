//! End-to-end filter behaviour against a virtual page.

mod common;

use std::time::Duration;

use folio_core::animation::{Direction, Visibility};
use folio_core::event::{HostEvent, KeyCode};
use folio_core::host::Dom;
use folio_core::testing::{VirtualHost, el};
use folio_runtime::filter::FilterChange;
use pretty_assertions::assert_eq;

use common::{build, drain, settle, site, standard};

fn visibilities(site: &folio_runtime::Site<VirtualHost>) -> Vec<Visibility> {
    let engine = site.filter_engine().unwrap();
    (0..engine.items().len())
        .map(|i| engine.visibility(i).unwrap())
        .collect()
}

#[test]
fn web_filter_shows_matching_cards() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    assert_eq!(site.filter("web"), Some(FilterChange::Applied { shown: 2 }));
    drain(&mut site);

    assert_eq!(
        visibilities(&site),
        vec![Visibility::Visible, Visibility::Hidden, Visibility::Visible]
    );
    let host = site.host();
    assert_eq!(host.style(page.cards[1], "display").as_deref(), Some("none"));
    assert!(host.has_class(page.cards[1], "svc-card--hidden"));
    assert!(!host.has_class(page.cards[2], "svc-card--hidden"));
    assert_eq!(host.style(page.no_results, "display").as_deref(), Some("none"));
    assert!(!site.filter_engine().unwrap().no_results_shown());
}

#[test]
fn empty_category_shows_no_results() {
    let mut host = VirtualHost::new();
    let page = build(&mut host, &["all", "web", "design"], &["design", "design"]);
    let mut site = site(host);

    assert_eq!(site.filter("web"), Some(FilterChange::Applied { shown: 0 }));
    assert_eq!(
        site.host().style(page.no_results, "display").as_deref(),
        Some("block")
    );
    assert_eq!(site.host().style(page.no_results, "opacity").as_deref(), Some("0"));

    settle(&mut site, Duration::from_millis(50));
    assert_eq!(site.host().style(page.no_results, "opacity").as_deref(), Some("1"));

    drain(&mut site);
    assert_eq!(visibilities(&site), vec![Visibility::Hidden, Visibility::Hidden]);
    assert!(site.filter_engine().unwrap().no_results_shown());
}

#[test]
fn buttons_and_url_follow_the_filter() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);
    assert!(site.host().replaced_hashes().is_empty());

    site.filter("design");
    let host = site.host();
    assert!(host.has_class(page.buttons[2], "is-active"));
    assert!(!host.has_class(page.buttons[0], "is-active"));
    let pressed: Vec<_> = page
        .buttons
        .iter()
        .map(|&b| host.attribute(b, "aria-pressed").unwrap())
        .collect();
    assert_eq!(pressed, vec!["false", "false", "true"]);

    site.filter("all");
    assert_eq!(
        site.host().replaced_hashes(),
        &["#services-design".to_string(), "#services".to_string()]
    );
}

#[test]
fn unknown_category_is_ignored() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);
    site.filter("web");
    drain(&mut site);

    assert_eq!(site.filter("photo"), Some(FilterChange::Unknown));
    assert_eq!(site.current_filter(), Some("web"));
    assert_eq!(site.pending_timers(), 0);
    let active: Vec<_> = page
        .buttons
        .iter()
        .map(|&b| site.host().has_class(b, "is-active"))
        .collect();
    assert_eq!(active, vec![false, true, false]);
    assert_eq!(
        visibilities(&site),
        vec![Visibility::Visible, Visibility::Hidden, Visibility::Visible]
    );
    assert_eq!(site.host().replaced_hashes(), &["#services-web".to_string()]);
}

#[test]
fn bare_filter_button_does_not_break_the_bar() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let bare = host.append(page.grid, el("button").class("svc-filter"));
    let mut site = site(host);

    assert!(site.report().unwrap().is_clean());
    assert_eq!(site.filter("web"), Some(FilterChange::Applied { shown: 2 }));
    let outcome = site.handle_event(HostEvent::Click { target: bare });
    assert!(!outcome.handled);
    assert_eq!(site.current_filter(), Some("web"));
}

#[test]
fn reveals_are_staggered_in_document_order() {
    let mut host = VirtualHost::new();
    let page = build(&mut host, &["all", "web"], &["web", "web", "web"]);
    let mut site = site(host);
    site.filter("web");

    let shown = visibilities(&site);
    assert_eq!(shown[0], Visibility::Visible);
    let starts: Vec<Duration> = shown[1..]
        .iter()
        .map(|v| match v {
            Visibility::Animating(t) => {
                assert_eq!(t.direction(), Direction::In);
                t.start()
            }
            other => panic!("expected animating, got {other:?}"),
        })
        .collect();
    assert_eq!(starts, vec![Duration::from_millis(100), Duration::from_millis(200)]);

    settle(&mut site, Duration::from_millis(100));
    assert_eq!(site.host().style(page.cards[1], "opacity").as_deref(), Some("1"));
    assert_eq!(site.host().style(page.cards[2], "opacity").as_deref(), Some("0"));

    drain(&mut site);
    assert_eq!(visibilities(&site), vec![Visibility::Visible; 3]);
}

#[test]
fn refilter_cancels_pending_steps() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    site.filter("web");
    site.filter("design");
    drain(&mut site);

    assert_eq!(
        visibilities(&site),
        vec![Visibility::Hidden, Visibility::Visible, Visibility::Hidden]
    );
    // The cancelled reveal of card 2 never ran.
    assert_eq!(site.host().style(page.cards[2], "opacity").as_deref(), Some("0"));
    assert_eq!(site.host().style(page.cards[1], "opacity"), None);
}

#[test]
fn same_filter_twice_schedules_nothing_new() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    let mut site = site(host);

    assert_eq!(site.filter("all"), Some(FilterChange::Unchanged));
    site.filter("web");
    drain(&mut site);

    assert!(matches!(site.filter("all"), Some(FilterChange::Applied { .. })));
    let pending = site.pending_timers();
    let before = visibilities(&site);
    assert_eq!(site.filter("all"), Some(FilterChange::Unchanged));
    assert_eq!(site.pending_timers(), pending);
    assert_eq!(visibilities(&site), before);
}

#[test]
fn reduced_motion_snaps_without_timers() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    host.set_reduced_motion(true);
    let mut site = site(host);

    site.filter("web");
    assert_eq!(site.pending_timers(), 0);
    assert_eq!(
        visibilities(&site),
        vec![Visibility::Visible, Visibility::Hidden, Visibility::Visible]
    );
    assert_eq!(
        site.host().style(page.cards[0], "transition").as_deref(),
        Some("none")
    );
}

#[test]
fn live_motion_preference_settles_in_flight_transitions() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    let mut site = site(host);

    site.filter("web");
    assert!(site.pending_timers() > 0);

    site.host_mut().set_reduced_motion(true);
    site.handle_event(HostEvent::MotionPreference { reduced: true });
    assert_eq!(site.pending_timers(), 0);
    assert_eq!(
        visibilities(&site),
        vec![Visibility::Visible, Visibility::Hidden, Visibility::Visible]
    );
}

#[test]
fn resize_is_debounced_and_rechecks_motion() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    for _ in 0..3 {
        site.handle_event(HostEvent::Resize {
            width: 800,
            height: 600,
        });
        settle(&mut site, Duration::from_millis(100));
    }
    assert!(site.host().reflows().is_empty());

    site.host_mut().set_reduced_motion(true);
    settle(&mut site, Duration::from_millis(150));
    assert_eq!(site.host().reflows(), &[page.grid]);
    assert!(site.filter_engine().unwrap().reduced_motion());
    assert_eq!(site.host().style(page.grid, "display"), None);
}

#[test]
fn resize_leaves_reveal_styles_alone_without_motion_change() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);
    site.host_mut()
        .set_style(page.reveals[0], "transition", "opacity 1s ease");

    site.handle_event(HostEvent::Resize {
        width: 900,
        height: 700,
    });
    drain(&mut site);
    assert_eq!(site.host().reflows(), &[page.grid]);
    assert_eq!(
        site.host().style(page.reveals[0], "transition").as_deref(),
        Some("opacity 1s ease")
    );
}

#[test]
fn orientation_change_refreshes_layout_later() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    site.handle_event(HostEvent::OrientationChange);
    settle(&mut site, Duration::from_millis(499));
    assert!(site.host().reflows().is_empty());
    settle(&mut site, Duration::from_millis(1));
    assert_eq!(site.host().reflows(), &[page.grid]);
}

#[test]
fn enter_and_space_activate_buttons() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    let outcome = site.handle_event(HostEvent::Key {
        target: Some(page.buttons[1]),
        code: KeyCode::Enter,
    });
    assert!(outcome.prevent_default);
    assert_eq!(site.current_filter(), Some("web"));

    site.handle_event(HostEvent::Key {
        target: Some(page.buttons[2]),
        code: KeyCode::Char(' '),
    });
    assert_eq!(site.current_filter(), Some("design"));
}

#[test]
fn arrows_move_the_tab_stop_circularly() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    let tabindex = |site: &folio_runtime::Site<VirtualHost>| -> Vec<String> {
        page.buttons
            .iter()
            .map(|&b| site.host().attribute(b, "tabindex").unwrap())
            .collect()
    };
    assert_eq!(tabindex(&site), vec!["0", "-1", "-1"]);

    site.handle_event(HostEvent::Key {
        target: Some(page.buttons[0]),
        code: KeyCode::Left,
    });
    assert_eq!(tabindex(&site), vec!["-1", "-1", "0"]);
    assert_eq!(site.host().active_element(), Some(page.buttons[2]));

    site.handle_event(HostEvent::Key {
        target: Some(page.buttons[2]),
        code: KeyCode::Down,
    });
    assert_eq!(tabindex(&site), vec!["0", "-1", "-1"]);
    assert_eq!(site.host().active_element(), Some(page.buttons[0]));
    // Moving focus does not change the filter.
    assert_eq!(site.current_filter(), Some("all"));
}

#[test]
fn click_on_button_suppresses_default() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    let outcome = site.handle_event(HostEvent::Click {
        target: page.buttons[1],
    });
    assert!(outcome.prevent_default);
    let outcome = site.handle_event(HostEvent::Click { target: page.grid });
    assert!(!outcome.handled);
}

#[test]
fn touch_presses_then_releases() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    site.handle_event(HostEvent::TouchStart {
        target: page.buttons[1],
    });
    assert_eq!(
        site.host().style(page.buttons[1], "transform").as_deref(),
        Some("scale(0.95)")
    );
    settle(&mut site, Duration::from_millis(150));
    assert_eq!(site.host().style(page.buttons[1], "transform"), None);
}

#[test]
fn repeated_touch_restarts_release() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);
    let touch = HostEvent::TouchStart {
        target: page.buttons[1],
    };

    site.handle_event(touch.clone());
    settle(&mut site, Duration::from_millis(100));
    site.handle_event(touch);
    settle(&mut site, Duration::from_millis(100));
    assert_eq!(
        site.host().style(page.buttons[1], "transform").as_deref(),
        Some("scale(0.95)")
    );
    settle(&mut site, Duration::from_millis(50));
    assert_eq!(site.host().style(page.buttons[1], "transform"), None);
}

#[test]
fn narrow_viewport_scrolls_active_button_into_view() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    host.set_width(600);
    let mut site = site(host);

    site.filter("design");
    assert_eq!(site.host().scrolled(), &[(page.buttons[2], true)]);
}
