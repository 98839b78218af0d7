//! Section navigation, deep links and the page load sequence.

mod common;

use std::time::Duration;

use folio_core::event::HostEvent;
use folio_core::host::Dom;
use folio_core::testing::{VirtualHost, el};
use folio_runtime::config::SiteConfig;
use folio_runtime::nav::{NavOutcome, SectionStatus};
use folio_runtime::page_load::LoadPhase;
use folio_runtime::site::Site;
use pretty_assertions::assert_eq;

use common::{Page, SECTIONS, drain, settle, site, standard};

fn statuses(site: &Site<VirtualHost>) -> Vec<SectionStatus> {
    site.navigator()
        .unwrap()
        .sections()
        .iter()
        .map(|s| s.status)
        .collect()
}

fn active_links(site: &Site<VirtualHost>, page: &Page) -> Vec<usize> {
    page.links
        .iter()
        .enumerate()
        .filter(|&(_, &l)| site.host().has_class(l, "active"))
        .map(|(i, _)| i)
        .collect()
}

/// DOM ready and window load at t=0, then run the load sequence through.
fn boot(host: VirtualHost) -> Site<VirtualHost> {
    let mut site = Site::new(host, SiteConfig::default());
    site.handle_event(HostEvent::DomReady);
    site.handle_event(HostEvent::WindowLoad);
    site
}

#[test]
fn deep_link_applies_after_settle() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    host.set_hash("#projects");
    let mut site = boot(host);

    assert!(site.host().has_class(site.host().root(), "preload"));
    settle(&mut site, Duration::from_millis(100));
    assert_eq!(site.page_load().phase(), LoadPhase::Loaded);
    assert_eq!(site.active_section(), Some("home"));

    settle(&mut site, Duration::from_millis(200));
    assert_eq!(site.active_section(), Some("projects"));
    assert_eq!(
        statuses(&site),
        vec![
            SectionStatus::Inactive,
            SectionStatus::Inactive,
            SectionStatus::Inactive,
            SectionStatus::Active,
        ]
    );
    assert_eq!(active_links(&site, &page), vec![3]);
    assert!(!site.host().has_class(page.sections[0], "back-section"));
}

#[test]
fn unknown_deep_link_keeps_default_section() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    host.set_hash("#doesnotexist");
    let mut site = boot(host);
    drain(&mut site);

    assert_eq!(site.active_section(), Some("home"));
    assert_eq!(site.navigator().unwrap().back(), None);
    assert_eq!(active_links(&site, &page), vec![0]);
}

#[test]
fn fallback_settles_without_window_load() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    host.set_hash("#about");
    let mut site = Site::new(host, SiteConfig::default());
    site.handle_event(HostEvent::DomReady);

    settle(&mut site, Duration::from_millis(999));
    assert_eq!(site.page_load().phase(), LoadPhase::Preloading);
    settle(&mut site, Duration::from_millis(1));
    let body = site.host().root();
    assert!(site.host().has_class(body, "loaded"));
    assert!(!site.host().has_class(body, "preload"));

    settle(&mut site, Duration::from_millis(200));
    assert_eq!(site.active_section(), Some("about"));
}

#[test]
fn link_clicks_track_one_back_section() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    site.handle_event(HostEvent::Click {
        target: page.links[1],
    });
    assert_eq!(
        statuses(&site),
        vec![
            SectionStatus::Back,
            SectionStatus::Active,
            SectionStatus::Inactive,
            SectionStatus::Inactive,
        ]
    );
    assert!(site.host().has_class(page.sections[0], "back-section"));

    site.handle_event(HostEvent::Click {
        target: page.links[2],
    });
    assert_eq!(
        statuses(&site),
        vec![
            SectionStatus::Inactive,
            SectionStatus::Back,
            SectionStatus::Active,
            SectionStatus::Inactive,
        ]
    );
    assert!(!site.host().has_class(page.sections[0], "back-section"));
    assert_eq!(active_links(&site, &page), vec![2]);
}

#[test]
fn same_section_closes_aside_on_narrow_viewport() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    host.set_width(1000);
    let mut site = site(host);

    let outcome = site.handle_event(HostEvent::Click {
        target: page.toggler,
    });
    assert!(outcome.prevent_default);
    assert!(site.navigator().unwrap().aside_open());
    for &el in [page.aside, page.toggler].iter().chain(&page.sections) {
        assert!(site.host().has_class(el, "open"));
    }

    assert_eq!(site.navigate_to("home"), NavOutcome::AlreadyActive);
    assert!(!site.navigator().unwrap().aside_open());
    assert!(!site.host().has_class(page.aside, "open"));
    assert_eq!(site.navigator().unwrap().back(), None);
}

#[test]
fn wide_viewport_keeps_aside_open() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = site(host);

    site.handle_event(HostEvent::Click {
        target: page.toggler,
    });
    site.handle_event(HostEvent::Click {
        target: page.links[3],
    });
    assert_eq!(site.active_section(), Some("projects"));
    assert!(site.navigator().unwrap().aside_open());
}

#[test]
fn call_to_action_by_index() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    let root = host.root();
    let to_projects = host.append(root, el("a").attr("data-section-index", "3"));
    let to_about = host.append(root, el("button").attr("data-section-index", " 1 "));
    let non_numeric = host.append(
        root,
        el("a").attr("data-section-index", "x").attr("href", "#services"),
    );
    let out_of_range = host.append(root, el("a").attr("data-section-index", "99"));
    let mut site = site(host);

    site.handle_event(HostEvent::Click {
        target: to_projects,
    });
    assert_eq!(site.active_section(), Some("projects"));
    site.handle_event(HostEvent::Click { target: to_about });
    assert_eq!(site.active_section(), Some("about"));

    let before = statuses(&site);
    for target in [non_numeric, out_of_range] {
        let outcome = site.handle_event(HostEvent::Click { target });
        assert!(!outcome.handled);
    }
    assert_eq!(statuses(&site), before);
}

#[test]
fn hash_change_waits_for_load_then_applies_immediately() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    let mut site = Site::new(host, SiteConfig::default());
    site.handle_event(HostEvent::DomReady);

    let early = site.handle_event(HostEvent::HashChange {
        hash: "#services".to_string(),
    });
    assert!(!early.handled);
    assert_eq!(site.active_section(), Some("home"));

    site.handle_event(HostEvent::WindowLoad);
    drain(&mut site);

    site.handle_event(HostEvent::HashChange {
        hash: "#about".to_string(),
    });
    assert_eq!(site.active_section(), Some("about"));
    assert_eq!(site.navigator().unwrap().back(), Some(0));
}

#[test]
fn malformed_hash_change_is_silent() {
    let mut host = VirtualHost::new();
    standard(&mut host);
    let mut site = boot(host);
    drain(&mut site);

    let before = statuses(&site);
    for hash in ["#", "#nope", "", "##about"] {
        let outcome = site.handle_event(HostEvent::HashChange {
            hash: hash.to_string(),
        });
        assert!(!outcome.handled, "{hash:?}");
    }
    assert_eq!(statuses(&site), before);
}

#[test]
fn inline_overrides_clear_after_post_load_transition() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = boot(host);
    drain(&mut site);

    site.host_mut()
        .set_style(page.sections[1], "transform", "translateX(40px)");
    site.handle_event(HostEvent::Click {
        target: page.links[1],
    });
    assert!(site.host().style(page.sections[1], "transform").is_some());
    settle(&mut site, Duration::from_millis(50));
    assert_eq!(site.host().style(page.sections[1], "transform"), None);
}

#[test]
fn load_resets_stray_positions() {
    let mut host = VirtualHost::new();
    let page = standard(&mut host);
    let mut site = Site::new(host, SiteConfig::default());
    site.handle_event(HostEvent::DomReady);
    site.handle_event(HostEvent::Click {
        target: page.links[1],
    });
    site.host_mut().set_style(page.sections[0], "opacity", "0.2");
    assert_eq!(site.navigator().unwrap().back(), Some(0));

    site.handle_event(HostEvent::WindowLoad);
    settle(&mut site, Duration::from_millis(100));
    assert_eq!(site.navigator().unwrap().back(), None);
    assert_eq!(site.host().style(page.sections[0], "opacity"), None);
    assert_eq!(site.active_section(), Some(SECTIONS[1]));
}
