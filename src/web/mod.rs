//! Browser layer: DOM construction, input wiring and the async drivers.
//!
//! The whole page is built from Rust: panels are created once at startup
//! and shown or hidden as the round machine moves, overlays are plain divs
//! looked up by id, and every listener funnels into the single game state
//! held in a `thread_local` cell. Async work (prompt fetch, store calls)
//! runs through `spawn_local` and re-enters the cell when it resolves, so
//! the cell is never borrowed across an await.

pub mod net;

use std::cell::RefCell;

use gloo_timers::callback::Interval;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement, ImageData,
    MouseEvent, TouchEvent, window,
};

use crate::game::Game;
use crate::round::{CountdownTask, GameMode, Phase, RoundOutcome};
use crate::sketch::{DEFAULT_BRUSH_WIDTH, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH, Point, PointerEvent};
use crate::store::{DrawingStore, StoreError};
use crate::surface::{CanvasSize, CanvasType, Rgb};
use net::RestStore;

pub struct WebConfig {
    pub prompt_url: String,
    pub store_url: String,
    pub store_key: String,
}

struct App {
    game: Game,
    store: RestStore,
    prompt_url: String,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    // The finished overlay stays dismissed until the next game over.
    save_prompt_dismissed: bool,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

// --- Console logging ---------------------------------------------------------

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = JsValue::from_str(&format!("{:5} {}", record.level(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub(crate) fn init_console_log() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

// --- Countdown ---------------------------------------------------------------

// The machine owns this handle and cancels it on every exit from Drawing.
struct IntervalCountdown(Option<Interval>);

impl CountdownTask for IntervalCountdown {
    fn cancel(&mut self) {
        if let Some(interval) = self.0.take() {
            interval.cancel();
        }
    }
}

fn start_countdown(app: &mut App) {
    let interval = Interval::new(1_000, || {
        with_app(|a| {
            a.game.tick();
            sync_view(a);
        });
    });
    app.game.attach_countdown(Box::new(IntervalCountdown(Some(interval))));
}

// --- Startup -----------------------------------------------------------------

const BTN_STYLE: &str = "margin:4px; padding:8px 14px; border:1px solid #374151; \
    border-radius:6px; background:#3b82f6; color:#fff; cursor:pointer;";
const SMALL_BTN_STYLE: &str = "margin-top:4px; padding:2px 10px; border:1px solid #374151; \
    border-radius:4px; background:#3b82f6; color:#fff; cursor:pointer;";
const ITEM_STYLE: &str = "display:inline-block; margin:6px; text-align:center;";
const THUMB_STYLE: &str = "width:96px; height:96px; border:1px solid #9ca3af; display:block;";

pub fn start(config: WebConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let root = make_el(&doc, "div", "qd-root")?;
    root.set_attribute(
        "style",
        "max-width:760px; margin:0 auto; padding:16px; font-family:sans-serif; text-align:center;",
    )?;
    body.append_child(&root)?;

    let theme_btn = make_button(&doc, "Toggle Light Mode")?;
    theme_btn.set_id("qd-theme");
    theme_btn.set_attribute("style", &format!("{BTN_STYLE} position:fixed; top:12px; right:12px;"))?;
    root.append_child(&theme_btn)?;
    on_click(&theme_btn, |_| {
        with_app(|a| {
            a.game.toggle_theme();
            apply_theme(a);
        });
    })?;

    let title = make_el(&doc, "h1", "")?;
    title.set_text_content(Some("Quickdraw"));
    root.append_child(&title)?;

    // Transient remote-failure notice (store saves/deletes, login).
    let notice = make_el(&doc, "p", "qd-notice")?;
    notice.set_attribute("style", "color:#f87171;")?;
    notice.set_attribute("hidden", "")?;
    root.append_child(&notice)?;

    // Prompt-fetch status and retryable error banner.
    let status = make_el(&doc, "p", "qd-status")?;
    status.set_text_content(Some("Fetching a prompt..."));
    status.set_attribute("hidden", "")?;
    root.append_child(&status)?;

    let error_box = make_el(&doc, "div", "qd-error")?;
    error_box.set_attribute("hidden", "")?;
    let error_msg = make_el(&doc, "p", "qd-error-msg")?;
    error_msg.set_attribute("style", "color:#f87171;")?;
    error_box.append_child(&error_msg)?;
    let retry_btn = make_button(&doc, "Retry")?;
    retry_btn.set_attribute("style", BTN_STYLE)?;
    error_box.append_child(&retry_btn)?;
    root.append_child(&error_box)?;
    on_click(&retry_btn, |_| do_retry())?;

    build_menu(&doc, &root)?;
    let canvas = build_play_panel(&doc, &root)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let score = make_el(&doc, "p", "qd-score")?;
    score.set_text_content(Some("Score: 0"));
    score.set_attribute("style", "font-size:18px;")?;
    root.append_child(&score)?;

    build_gallery(&doc, &root, "qd-gallery-wrap", "qd-gallery", "Your Drawings")?;
    build_gallery(&doc, &root, "qd-saved-wrap", "qd-saved", "Your Saved Drawings")?;
    build_finished_overlay(&doc, &root)?;

    wire_canvas(&canvas)?;

    APP.with(|cell| {
        cell.replace(Some(App {
            game: Game::default(),
            store: RestStore::new(&config.store_url, &config.store_key),
            prompt_url: config.prompt_url,
            canvas,
            ctx,
            save_prompt_dismissed: false,
        }))
    });

    with_app(|a| {
        blit(a);
        sync_view(a);
    });
    Ok(())
}

fn build_menu(doc: &Document, root: &Element) -> Result<(), JsValue> {
    let menu = make_el(doc, "div", "qd-menu")?;

    let heading = make_el(doc, "h2", "")?;
    heading.set_text_content(Some("Select Mode"));
    menu.append_child(&heading)?;
    for mode in GameMode::ALL {
        let btn = make_button(doc, &capitalize(mode.label()))?;
        btn.set_attribute("style", BTN_STYLE)?;
        menu.append_child(&btn)?;
        on_click(&btn, move |_| {
            with_app(|a| {
                a.save_prompt_dismissed = false;
                a.game.select_mode(mode);
                sync_view(a);
            });
            request_prompt();
        })?;
    }

    let type_heading = make_el(doc, "h3", "")?;
    type_heading.set_text_content(Some("Select Canvas Type"));
    menu.append_child(&type_heading)?;
    for ty in CanvasType::ALL {
        let btn = make_button(doc, &capitalize(ty.label()))?;
        btn.set_attribute("style", BTN_STYLE)?;
        menu.append_child(&btn)?;
        on_click(&btn, move |_| {
            with_app(|a| {
                a.game.set_canvas_type(ty);
                blit(a);
            });
        })?;
    }

    let size_heading = make_el(doc, "h3", "")?;
    size_heading.set_text_content(Some("Select Canvas Size"));
    menu.append_child(&size_heading)?;
    for size in CanvasSize::ALL {
        let btn = make_button(doc, &format!("{}px", size.px()))?;
        btn.set_attribute("style", BTN_STYLE)?;
        menu.append_child(&btn)?;
        on_click(&btn, move |_| {
            with_app(|a| {
                a.game.set_canvas_size(size);
                a.canvas.set_width(size.px());
                a.canvas.set_height(size.px());
                blit(a);
            });
        })?;
    }

    root.append_child(&menu)?;
    Ok(())
}

fn build_play_panel(doc: &Document, root: &Element) -> Result<HtmlCanvasElement, JsValue> {
    let play = make_el(doc, "div", "qd-play")?;
    play.set_attribute("hidden", "")?;

    let prompt = make_el(doc, "h2", "qd-prompt")?;
    play.append_child(&prompt)?;

    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_id("qd-canvas");
    canvas.set_width(CanvasSize::default().px());
    canvas.set_height(CanvasSize::default().px());
    canvas.set_attribute("style", "border:1px solid #000; touch-action:none; cursor:crosshair;")?;
    play.append_child(&canvas)?;

    let time = make_el(doc, "p", "qd-time")?;
    play.append_child(&time)?;

    let controls = make_el(doc, "div", "")?;
    controls.set_attribute("style", "margin-top:8px;")?;

    let color_label = make_el(doc, "label", "")?;
    color_label.set_text_content(Some("Color: "));
    let color: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
    color.set_id("qd-color");
    color.set_type("color");
    color.set_value("#000000");
    color_label.append_child(&color)?;
    controls.append_child(&color_label)?;
    on_input(&color, |_| {
        if let Some(rgb) = Rgb::from_hex(&input_value("qd-color")) {
            with_app(|a| a.game.set_brush_color(rgb));
        }
    })?;

    let width_label = make_el(doc, "label", "")?;
    width_label.set_text_content(Some(" Brush Size: "));
    let width: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
    width.set_id("qd-width");
    width.set_type("range");
    width.set_min(&MIN_BRUSH_WIDTH.to_string());
    width.set_max(&MAX_BRUSH_WIDTH.to_string());
    width.set_value(&DEFAULT_BRUSH_WIDTH.to_string());
    width_label.append_child(&width)?;
    controls.append_child(&width_label)?;
    on_input(&width, |_| {
        if let Ok(w) = input_value("qd-width").parse::<u32>() {
            with_app(|a| a.game.set_brush_width(w));
        }
    })?;

    play.append_child(&controls)?;

    let submit = make_button(doc, "Submit")?;
    submit.set_attribute("style", BTN_STYLE)?;
    play.append_child(&submit)?;
    on_click(&submit, |_| do_submit())?;

    root.append_child(&play)?;
    Ok(canvas)
}

fn build_gallery(
    doc: &Document,
    root: &Element,
    wrap_id: &str,
    list_id: &str,
    title: &str,
) -> Result<(), JsValue> {
    let wrap = make_el(doc, "div", wrap_id)?;
    wrap.set_attribute("hidden", "")?;
    let heading = make_el(doc, "h2", "")?;
    heading.set_text_content(Some(title));
    wrap.append_child(&heading)?;
    let list = make_el(doc, "div", list_id)?;
    wrap.append_child(&list)?;
    root.append_child(&wrap)?;
    Ok(())
}

fn build_finished_overlay(doc: &Document, root: &Element) -> Result<(), JsValue> {
    let overlay = make_el(doc, "div", "qd-finished")?;
    overlay.set_attribute(
        "style",
        "position:fixed; inset:0; background:rgba(0,0,0,0.5); display:flex; \
         align-items:center; justify-content:center;",
    )?;
    overlay.set_attribute("hidden", "")?;

    let panel = make_el(doc, "div", "")?;
    panel.set_attribute(
        "style",
        "background:#fff; color:#111827; padding:24px; border-radius:8px; max-width:340px;",
    )?;

    let heading = make_el(doc, "h2", "")?;
    heading.set_text_content(Some("Game Over! Do you want to save your drawings?"));
    panel.append_child(&heading)?;

    let no_btn = make_button(doc, "No")?;
    no_btn.set_attribute("style", BTN_STYLE)?;
    panel.append_child(&no_btn)?;
    on_click(&no_btn, |_| {
        // Declining only skips persistence; play resumes via mode select.
        with_app(|a| {
            a.save_prompt_dismissed = true;
            sync_view(a);
        });
    })?;

    let yes_btn = make_button(doc, "Yes")?;
    yes_btn.set_attribute("style", BTN_STYLE)?;
    panel.append_child(&yes_btn)?;
    on_click(&yes_btn, |_| set_hidden("qd-login", false))?;

    let login = make_el(doc, "div", "qd-login")?;
    login.set_attribute("hidden", "")?;
    let login_heading = make_el(doc, "h3", "")?;
    login_heading.set_text_content(Some("Enter Username"));
    login.append_child(&login_heading)?;
    let username: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
    username.set_id("qd-username");
    username.set_type("text");
    username.set_placeholder("Username");
    username.set_required(true);
    login.append_child(&username)?;
    let login_btn = make_button(doc, "Login")?;
    login_btn.set_attribute("style", BTN_STYLE)?;
    login.append_child(&login_btn)?;
    on_click(&login_btn, |_| do_login())?;
    panel.append_child(&login)?;

    overlay.append_child(&panel)?;
    root.append_child(&overlay)?;
    Ok(())
}

// --- Canvas input ------------------------------------------------------------

fn wire_canvas(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    {
        let canvas_down = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let p = surface_point(
                &canvas_down,
                PointerEvent::mouse(evt.client_x() as f64, evt.client_y() as f64),
            );
            with_app(|a| {
                a.game.pointer_down(p);
                blit(a);
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_move = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let p = surface_point(
                &canvas_move,
                PointerEvent::mouse(evt.client_x() as f64, evt.client_y() as f64),
            );
            with_app(|a| {
                a.game.pointer_move(p);
                if a.game.stroke_open() {
                    blit(a);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    for event in ["mouseup", "mouseleave"] {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            with_app(|a| a.game.pointer_up());
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_touch = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: TouchEvent| {
            evt.prevent_default();
            if let Some(touch) = evt.changed_touches().get(0) {
                let p = surface_point(
                    &canvas_touch,
                    PointerEvent::touch(touch.client_x() as f64, touch.client_y() as f64),
                );
                with_app(|a| {
                    a.game.pointer_down(p);
                    blit(a);
                });
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_touch = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: TouchEvent| {
            evt.prevent_default();
            if let Some(touch) = evt.changed_touches().get(0) {
                let p = surface_point(
                    &canvas_touch,
                    PointerEvent::touch(touch.client_x() as f64, touch.client_y() as f64),
                );
                with_app(|a| {
                    a.game.pointer_move(p);
                    if a.game.stroke_open() {
                        blit(a);
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: TouchEvent| {
            with_app(|a| a.game.pointer_up());
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn surface_point(canvas: &HtmlCanvasElement, event: PointerEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    event.to_surface(rect.left(), rect.top())
}

// --- Flows -------------------------------------------------------------------

fn request_prompt() {
    let Some(url) = with_app(|a| a.prompt_url.clone()) else {
        return;
    };
    spawn_local(async move {
        match net::fetch_prompt(&url).await {
            Ok(prompt) => {
                with_app(|a| {
                    if a.game.prompt_ready(prompt) {
                        start_countdown(a);
                    }
                    blit(a);
                    sync_view(a);
                });
            }
            Err(e) => {
                warn!("prompt fetch failed: {e}");
                with_app(|a| {
                    a.game.prompt_failed(e.to_string());
                    sync_view(a);
                });
            }
        }
    });
}

fn do_retry() {
    let retried = with_app(|a| {
        let retried = a.game.retry_prompt();
        sync_view(a);
        retried
    })
    .unwrap_or(false);
    if retried {
        request_prompt();
    }
}

fn do_submit() {
    let next = with_app(|a| match a.game.submit() {
        Ok(Some(outcome)) => {
            rebuild_session_gallery(a);
            sync_view(a);
            Some(outcome.next)
        }
        Ok(None) => None,
        Err(e) => {
            error!("snapshot encoding failed: {e}");
            show_notice("Could not encode the drawing, please try again.");
            None
        }
    })
    .flatten();
    if next == Some(RoundOutcome::NextRound) {
        request_prompt();
    }
}

fn do_login() {
    let username = input_value("qd-username").trim().to_owned();
    if username.is_empty() {
        return;
    }
    let Some(store) = with_app(|a| a.store.clone()) else {
        return;
    };
    spawn_local(async move {
        match login_flow(&store, &username).await {
            Ok(Some((name, drawings))) => {
                clear_notice();
                with_app(|a| {
                    a.game.session_mut().adopt_user(name);
                    a.game.session_mut().set_saved(drawings);
                    a.save_prompt_dismissed = true;
                    rebuild_session_gallery(a);
                    rebuild_saved_gallery(a);
                    sync_view(a);
                });
            }
            Ok(None) => show_notice("Login failed: the store did not confirm the username."),
            Err(e) => {
                warn!("login failed: {e}");
                show_notice(&format!("Login failed: {e}. Please try again."));
            }
        }
    });
}

async fn login_flow(
    store: &RestStore,
    username: &str,
) -> Result<Option<(String, Vec<String>)>, StoreError> {
    store.save_identity(username, username).await?;
    let Some(name) = store.identity(username).await? else {
        return Ok(None);
    };
    let drawings = store.drawings(username).await?;
    Ok(Some((name, drawings)))
}

fn do_save(encoding: String) {
    // Without a logged-in user this is a no-op; the store is not called.
    let Some((store, user)) = with_app(|a| {
        a.game.session().user().map(|u| (a.store.clone(), u.to_owned()))
    })
    .flatten() else {
        return;
    };
    spawn_local(async move {
        match store.save_drawing(&user, &encoding).await {
            Ok(()) => {
                clear_notice();
                with_app(|a| {
                    a.game.session_mut().mark_saved(encoding);
                    rebuild_saved_gallery(a);
                });
            }
            Err(e) => {
                warn!("save failed: {e}");
                show_notice(&format!("Save failed: {e}. Please try again."));
            }
        }
    });
}

fn do_delete(encoding: String) {
    let Some((store, user)) = with_app(|a| {
        a.game.session().user().map(|u| (a.store.clone(), u.to_owned()))
    })
    .flatten() else {
        return;
    };
    spawn_local(async move {
        match store.delete_drawing(&user, &encoding).await {
            Ok(()) => {
                clear_notice();
                with_app(|a| {
                    a.game.session_mut().confirm_deleted(&encoding);
                    rebuild_saved_gallery(a);
                });
            }
            Err(e) => {
                warn!("delete failed: {e}");
                show_notice(&format!("Delete failed: {e}. Please try again."));
            }
        }
    });
}

// --- Rendering ---------------------------------------------------------------

fn blit(app: &App) {
    let rgba = app.game.surface().rgba();
    let size = app.game.surface().size();
    match ImageData::new_with_u8_clamped_array_and_sh(Clamped(&rgba[..]), size, size) {
        Ok(data) => {
            app.ctx.put_image_data(&data, 0.0, 0.0).ok();
        }
        Err(e) => error!("canvas blit failed: {e:?}"),
    }
}

fn sync_view(app: &mut App) {
    let phase = app.game.phase().clone();
    // Mode selection doubles as the explicit reset path, so the menu is
    // also reachable after a finished game or a failed fetch.
    let menu_visible =
        matches!(phase, Phase::ModeSelect | Phase::Finished | Phase::PromptFailed(_));
    set_hidden("qd-menu", !menu_visible);
    set_hidden("qd-status", phase != Phase::AwaitingPrompt);
    set_hidden("qd-play", phase != Phase::Drawing);
    set_hidden("qd-finished", phase != Phase::Finished || app.save_prompt_dismissed);
    if phase != Phase::Finished {
        set_hidden("qd-login", true);
    }
    match &phase {
        Phase::PromptFailed(msg) => {
            set_text("qd-error-msg", &format!("Could not fetch a prompt: {msg}"));
            set_hidden("qd-error", false);
        }
        _ => set_hidden("qd-error", true),
    }

    if let Some(prompt) = app.game.prompt() {
        set_text("qd-prompt", &format!("Draw a {prompt}"));
    }
    let timed = app.game.mode().map(|m| m.time_budget() > 0).unwrap_or(false);
    set_hidden("qd-time", !timed);
    if let Some(remaining) = app.game.remaining() {
        set_text("qd-time", &format!("Time left: {remaining} seconds"));
    }
    set_text("qd-score", &format!("Score: {}", app.game.session().score()));
    set_hidden("qd-gallery-wrap", app.game.session().drawings().is_empty());
    set_hidden("qd-saved-wrap", app.game.session().user().is_none());
    apply_theme(app);
}

fn apply_theme(app: &App) {
    let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let dark = app.game.theme().dark();
    let style = if dark {
        "margin:0; min-height:100vh; background:#111827; color:#f3f4f6;"
    } else {
        "margin:0; min-height:100vh; background:#f3f4f6; color:#111827;"
    };
    body.set_attribute("style", style).ok();
    if let Some(btn) = by_id("qd-theme") {
        btn.set_text_content(Some(if dark { "Toggle Light Mode" } else { "Toggle Dark Mode" }));
    }
}

fn rebuild_session_gallery(app: &App) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(container) = doc.get_element_by_id("qd-gallery") else {
        return;
    };
    container.set_inner_html("");
    let logged_in = app.game.session().user().is_some();
    for encoding in app.game.session().drawings() {
        let Ok(item) = gallery_item(&doc, encoding) else {
            continue;
        };
        if logged_in {
            let enc = encoding.clone();
            if let Ok(btn) = make_button(&doc, "Save") {
                btn.set_attribute("style", SMALL_BTN_STYLE).ok();
                on_click(&btn, move |_| do_save(enc.clone())).ok();
                item.append_child(&btn).ok();
            }
        }
        container.append_child(&item).ok();
    }
}

fn rebuild_saved_gallery(app: &App) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(container) = doc.get_element_by_id("qd-saved") else {
        return;
    };
    container.set_inner_html("");
    for encoding in app.game.session().saved() {
        let Ok(item) = gallery_item(&doc, encoding) else {
            continue;
        };
        let enc = encoding.clone();
        if let Ok(btn) = make_button(&doc, "Delete") {
            btn.set_attribute("style", SMALL_BTN_STYLE).ok();
            on_click(&btn, move |_| do_delete(enc.clone())).ok();
            item.append_child(&btn).ok();
        }
        container.append_child(&item).ok();
    }
}

fn gallery_item(doc: &Document, encoding: &str) -> Result<Element, JsValue> {
    let item = doc.create_element("div")?;
    item.set_attribute("style", ITEM_STYLE)?;
    let img = doc.create_element("img")?;
    img.set_attribute("src", encoding)?;
    img.set_attribute("style", THUMB_STYLE)?;
    item.append_child(&img)?;
    Ok(item)
}

// --- DOM helpers -------------------------------------------------------------

fn make_el(doc: &Document, tag: &str, id: &str) -> Result<Element, JsValue> {
    let el = doc.create_element(tag)?;
    if !id.is_empty() {
        el.set_id(id);
    }
    Ok(el)
}

fn make_button(doc: &Document, label: &str) -> Result<Element, JsValue> {
    let btn = doc.create_element("button")?;
    btn.set_text_content(Some(label));
    Ok(btn)
}

fn on_click(target: &Element, f: impl FnMut(MouseEvent) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut(MouseEvent)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_input(target: &HtmlInputElement, f: impl FnMut(web_sys::Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn by_id(id: &str) -> Option<Element> {
    window().and_then(|w| w.document()).and_then(|d| d.get_element_by_id(id))
}

fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = by_id(id) {
        if hidden {
            el.set_attribute("hidden", "").ok();
        } else {
            el.remove_attribute("hidden").ok();
        }
    }
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn input_value(id: &str) -> String {
    by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn show_notice(msg: &str) {
    set_text("qd-notice", msg);
    set_hidden("qd-notice", false);
}

fn clear_notice() {
    set_hidden("qd-notice", true);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
