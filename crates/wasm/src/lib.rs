use std::cell::RefCell;

use scrollwork_core::graph::{default_cross_links, generate_graph, parse_skills};
use scrollwork_core::{BootSequence, MotionConfig, PageContent, PageSession, StaticLayout};
use scrollwork_protocol::{Rect, Viewport};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A page session plus the element rects the host last reported.
struct Page {
    session: PageSession,
    layout: StaticLayout,
}

thread_local! {
    static PAGES: RefCell<Vec<Option<Page>>> = const { RefCell::new(Vec::new()) };
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn to_json(value: &impl Serialize) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(js_err)
}

fn with_page<T>(
    handle: usize,
    f: impl FnOnce(&mut Page) -> Result<T, JsError>,
) -> Result<T, JsError> {
    PAGES.with_borrow_mut(|pages| {
        let page = pages
            .get_mut(handle)
            .and_then(Option::as_mut)
            .ok_or_else(|| JsError::new("invalid page handle"))?;
        f(page)
    })
}

/// Mount the portfolio page. `content_json` is `{"experience_periods": [...]}`;
/// `config_json` overrides any subset of the motion config. Returns a handle.
#[wasm_bindgen]
pub fn create_page(
    width: f64,
    height: f64,
    prefers_reduced_motion: bool,
    content_json: &str,
    config_json: Option<String>,
) -> Result<usize, JsError> {
    let content: PageContent = serde_json::from_str(content_json).map_err(js_err)?;
    let config = match config_json {
        Some(json) => MotionConfig::from_json(json.as_bytes()).map_err(js_err)?,
        None => MotionConfig::default(),
    };
    let viewport = Viewport::new(width, height);
    let session =
        PageSession::new(viewport, prefers_reduced_motion, content, config).map_err(js_err)?;
    let page = Page {
        session,
        layout: StaticLayout::new(),
    };
    Ok(PAGES.with_borrow_mut(|pages| {
        pages.push(Some(page));
        pages.len() - 1
    }))
}

/// Release every scroll binding of the page. The handle becomes invalid.
#[wasm_bindgen]
pub fn destroy_page(handle: usize) -> Result<(), JsError> {
    let page = PAGES.with_borrow_mut(|pages| pages.get_mut(handle).and_then(Option::take));
    let mut page = page.ok_or_else(|| JsError::new("invalid page handle"))?;
    page.session.teardown();
    Ok(())
}

/// Report an element's rect in document coordinates.
#[wasm_bindgen]
pub fn set_rect(handle: usize, key: &str, x: f64, y: f64, w: f64, h: f64) -> Result<(), JsError> {
    with_page(handle, |page| {
        page.layout.insert(key, Rect::new(x, y, w, h));
        Ok(())
    })
}

/// The element unmounted; controllers depending on it skip frames until it
/// comes back.
#[wasm_bindgen]
pub fn remove_rect(handle: usize, key: &str) -> Result<(), JsError> {
    with_page(handle, |page| {
        page.layout.remove(key);
        Ok(())
    })
}

/// Run a frame at the native scroll position `scroll_y`. While a nav glide
/// is in flight the glide's position wins. Returns the frame's style commands
/// and nav events as JSON.
#[wasm_bindgen]
pub fn tick(handle: usize, scroll_y: f64) -> Result<String, JsError> {
    with_page(handle, |page| {
        if !page.session.is_gliding() {
            page.session.jump_to(scroll_y);
        }
        page.layout.set_scroll(page.session.frame().scroll_y);
        to_json(&page.session.render(&page.layout))
    })
}

/// Step a nav glide by `dt_s` seconds. Returns the offset the host should
/// scroll the window to, or nothing once the glide is done.
#[wasm_bindgen]
pub fn advance(handle: usize, dt_s: f64) -> Result<Option<f64>, JsError> {
    with_page(handle, |page| Ok(page.session.advance(dt_s)))
}

/// Document height changed; glides stop at `height - viewport height`.
#[wasm_bindgen]
pub fn set_document_height(handle: usize, height: f64) -> Result<(), JsError> {
    with_page(handle, |page| {
        let viewport = page.session.frame().viewport;
        page.session.set_scroll_limit(height - viewport.height);
        Ok(())
    })
}

/// Freeze or release user scrolling, e.g. around the boot loader.
#[wasm_bindgen]
pub fn set_scroll_locked(handle: usize, locked: bool) -> Result<(), JsError> {
    with_page(handle, |page| {
        page.session.set_locked(locked);
        Ok(())
    })
}

/// Viewport change. Returns `true` if the page switched motion profile, in
/// which case the host should re-report rects for the new markup.
#[wasm_bindgen]
pub fn resize(
    handle: usize,
    width: f64,
    height: f64,
    prefers_reduced_motion: bool,
) -> Result<bool, JsError> {
    with_page(handle, |page| {
        page.session
            .resize(Viewport::new(width, height), prefers_reduced_motion)
            .map_err(js_err)
    })
}

/// `{"status": ..., "progress": ...}` for a section id; unknown ids read idle.
#[wasm_bindgen]
pub fn section_status(handle: usize, id: &str) -> Result<String, JsError> {
    with_page(handle, |page| to_json(&page.session.registry().snapshot(id)))
}

/// Section id of the active nav link, if any.
#[wasm_bindgen]
pub fn active_section(handle: usize) -> Result<Option<String>, JsError> {
    with_page(handle, |page| {
        Ok(page.session.nav().active().map(|id| id.as_str().to_owned()))
    })
}

/// Click nav link `index`. Returns the nav events as JSON; a `scroll_to`
/// event starts a glide the host follows with [`advance`].
#[wasm_bindgen]
pub fn follow_link(handle: usize, index: usize) -> Result<String, JsError> {
    with_page(handle, |page| {
        to_json(&page.session.follow_link(index, &page.layout))
    })
}

/// Lay out the skills graph from `[{"category", "items"}]` JSON.
#[wasm_bindgen]
pub fn generate_skill_graph(skills_json: &[u8]) -> Result<String, JsError> {
    let categories = parse_skills(skills_json).map_err(js_err)?;
    let graph = generate_graph(&categories, &default_cross_links());
    tracing::debug!(nodes = graph.nodes.len(), links = graph.links.len(), "skill graph");
    to_json(&graph)
}

/// Boot loader state `elapsed_ms` after start, as JSON.
#[wasm_bindgen]
pub fn boot_state(elapsed_ms: u64, returning_visitor: bool) -> Result<String, JsError> {
    let boot = BootSequence::new(MotionConfig::default().boot, returning_visitor);
    to_json(&boot.state_at(elapsed_ms))
}
