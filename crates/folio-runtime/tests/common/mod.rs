//! Shared page fixtures for runtime integration tests.

#![allow(dead_code)]

use std::time::Duration;

use folio_core::clock::Clock;
use folio_core::host::ElementId;
use folio_core::testing::{VirtualHost, el};
use folio_runtime::config::SiteConfig;
use folio_runtime::site::Site;

/// Handles into the fixture page.
#[derive(Debug, Clone)]
pub struct Page {
    pub buttons: Vec<ElementId>,
    pub cards: Vec<ElementId>,
    pub no_results: ElementId,
    pub grid: ElementId,
    pub sections: Vec<ElementId>,
    pub links: Vec<ElementId>,
    pub aside: ElementId,
    pub toggler: ElementId,
    pub reveals: Vec<ElementId>,
}

pub const SECTIONS: [&str; 4] = ["home", "about", "services", "projects"];

/// Portfolio page with filter buttons for `filters` and one card per entry
/// of `categories`.
pub fn build(host: &mut VirtualHost, filters: &[&str], categories: &[&str]) -> Page {
    let root = host.root();
    let aside = host.append(root, el("aside").class("aside"));
    let toggler = host.append(aside, el("button").class("nav-toggler"));
    let nav = host.append(aside, el("ul").class("nav"));
    let links = SECTIONS
        .iter()
        .map(|id| host.append(nav, el("a").attr("href", &format!("#{id}"))))
        .collect();

    let sections: Vec<ElementId> = SECTIONS
        .iter()
        .map(|id| host.append(root, el("section").class("section").id(id)))
        .collect();
    let services = sections[2];

    let bar = host.append(services, el("div").class("svc-filters"));
    let buttons = filters
        .iter()
        .map(|f| host.append(bar, el("button").class("svc-filter").attr("data-filter", f)))
        .collect();
    let grid = host.append(services, el("div").class("svc-grid"));
    let cards = categories
        .iter()
        .map(|c| host.append(grid, el("article").class("svc-card").attr("data-category", c)))
        .collect();
    let no_results = host.append(services, el("div").id("noResults"));

    let about = sections[1];
    let reveals = (0..2)
        .map(|_| host.append(about, el("div").class("reveal")))
        .collect();

    Page {
        buttons,
        cards,
        no_results,
        grid,
        sections,
        links,
        aside,
        toggler,
        reveals,
    }
}

/// Default fixture: filters all/web/design, cards web/design/web.
pub fn standard(host: &mut VirtualHost) -> Page {
    build(host, &["all", "web", "design"], &["web", "design", "web"])
}

/// A site built on `host` with setup already run.
pub fn site(host: VirtualHost) -> Site<VirtualHost> {
    let mut site = Site::new(host, SiteConfig::default());
    site.setup();
    site
}

/// Advance the host clock to each pending deadline and run it, until the
/// queue drains or `limit` elapses.
pub fn settle(site: &mut Site<VirtualHost>, limit: Duration) {
    let end = site.host().now_mono() + limit;
    while let Some(deadline) = site.next_deadline() {
        if deadline > end {
            break;
        }
        let now = site.host().now_mono();
        if deadline > now {
            site.host_mut().advance(deadline - now);
        }
        site.run_due_timers();
    }
    let now = site.host().now_mono();
    if end > now {
        site.host_mut().advance(end - now);
    }
}

/// Run all pending timers, however far out.
pub fn drain(site: &mut Site<VirtualHost>) {
    settle(site, Duration::from_secs(60));
}
