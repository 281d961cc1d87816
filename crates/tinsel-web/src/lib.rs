#![cfg(target_arch = "wasm32")]
//! WASM front-end: DOM shell, WebGPU renderer, MediaPipe bridge, music.
//!
//! All scene logic lives in `tinsel-core`; this crate only moves data
//! between the browser and the core types.

pub mod audio;
pub mod dom;
pub mod frame;
pub mod hands;
pub mod overlay;
pub mod render;
pub mod textures;

use frame::{FrameContext, PhotoQuad};
use instant::Instant;
use rand::{rngs::StdRng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use tinsel_core::{
    sprites, ParticleGroup, ParticleKind, PhotoManifest, PhotoRing, SceneState,
    PHOTO_MANIFEST_URL,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const TITLE_TEXT: &str = "MERRY CHRISTMAS";
const TITLE_FONT: &str = "bold italic 90px \"Times New Roman\"";
const TITLE_FILL: &str = "#FFD700";
const TITLE_SHADOW: &str = "#FF0000";

const LOVE_TEXT: &str = "I LOVE YOU \u{2764}\u{FE0F}";
const LOVE_FONT: &str = "bold 120px \"Segoe UI\", sans-serif";
const LOVE_FILL: &str = "#FF69B4";
const LOVE_SHADOW: &str = "#FF1493";

const BORDER_GOLD: [u8; 4] = [255, 215, 0, 255];

// Particle targets are random but stable across reloads.
const TARGET_SEED: u64 = 2024;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tinsel-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn fetch_text(url: &str) -> anyhow::Result<String> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch {url}: {:?}", e))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("not a Response: {:?}", e))?;
    let text = resp
        .text()
        .map_err(|e| anyhow::anyhow!("text() on {url}: {:?}", e))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| anyhow::anyhow!("read {url}: {:?}", e))?;
    text.as_string()
        .ok_or_else(|| anyhow::anyhow!("{url} body is not a string"))
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("scene-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #scene-canvas"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("#scene-canvas is not a canvas: {:?}", e))?;

    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas_resize = canvas.clone();
        let resize = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas_resize);
        }) as Box<dyn FnMut()>);
        if let Some(w) = web::window() {
            w.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
                .ok();
        }
        resize.forget();
    }

    // Manifest and photo decode happen up front; a failure here aborts init.
    let manifest = PhotoManifest::from_json(&fetch_text(PHOTO_MANIFEST_URL).await?)?;
    log::info!("loaded manifest with {} photos", manifest.len());
    let mut photo_pixels = Vec::with_capacity(manifest.len());
    for entry in &manifest.photos {
        photo_pixels.push(textures::load_image_pixels(&entry.path).await?);
    }
    let photo_pixels = Rc::new(photo_pixels);
    let photo_count = manifest.len();

    let title_pixels = Rc::new(textures::text_banner(
        TITLE_TEXT,
        TITLE_FONT,
        TITLE_FILL,
        TITLE_SHADOW,
    )?);
    let love_pixels = Rc::new(textures::text_banner(
        LOVE_TEXT,
        LOVE_FONT,
        LOVE_FILL,
        LOVE_SHADOW,
    )?);

    // The rest waits for the user gesture so music playback is allowed.
    static STARTED: AtomicBool = AtomicBool::new(false);
    let canvas_click = canvas.clone();
    let document_click = document.clone();
    dom::add_click_listener(&document, "btnStart", move || {
        if STARTED.swap(true, Ordering::SeqCst) {
            log::warn!("start already triggered; ignoring extra click");
            return;
        }
        overlay::hide(&document_click);

        let canvas = canvas_click.clone();
        let document = document_click.clone();
        let photo_pixels = photo_pixels.clone();
        let title_pixels = title_pixels.clone();
        let love_pixels = love_pixels.clone();
        spawn_local(async move {
            if let Err(e) = start_scene(
                canvas,
                document,
                photo_count,
                &photo_pixels,
                &title_pixels,
                &love_pixels,
            )
            .await
            {
                log::error!("startup error: {:?}", e);
            }
        });
    });
    Ok(())
}

async fn start_scene(
    canvas: web::HtmlCanvasElement,
    document: web::Document,
    photo_count: usize,
    photo_pixels: &[sprites::PixelBuffer],
    title_pixels: &sprites::PixelBuffer,
    love_pixels: &sprites::PixelBuffer,
) -> anyhow::Result<()> {
    let music = audio::Music::new()?;
    music.play();

    let gpu = render::GpuState::new(&canvas).await?;

    let mut rng = StdRng::seed_from_u64(TARGET_SEED);
    let mut groups = Vec::new();
    let mut batches = Vec::new();
    for kind in [ParticleKind::Gold, ParticleKind::Red, ParticleKind::Gift] {
        let group = ParticleGroup::generate(kind, &mut rng);
        let pixels = match kind {
            ParticleKind::Gold => sprites::gold_glow(),
            ParticleKind::Red => sprites::red_light(),
            ParticleKind::Gift => sprites::gift_box(),
        };
        batches.push(gpu.create_sprite_batch(group.len(), &pixels, kind.additive()));
        groups.push(group);
    }

    let border_view = gpu.upload_rgba(&textures::solid_color(BORDER_GOLD));
    let photo_quads: Vec<PhotoQuad> = photo_pixels
        .iter()
        .map(|pixels| PhotoQuad {
            border: gpu.create_quad(&border_view),
            plane: gpu.create_quad(&gpu.upload_rgba(pixels)),
        })
        .collect();

    let title = gpu.create_quad(&gpu.upload_rgba(title_pixels));
    let star = gpu.create_quad(&gpu.upload_rgba(&sprites::star()));
    let love = gpu.create_quad(&gpu.upload_rgba(love_pixels));

    let scene = Rc::new(RefCell::new(SceneState::default()));

    let video: web::HtmlVideoElement = document
        .get_elements_by_class_name("input_video")
        .item(0)
        .ok_or_else(|| anyhow::anyhow!("missing .input_video element"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(".input_video is not a video: {:?}", e))?;
    let preview: web::HtmlCanvasElement = document
        .get_element_by_id("camera-preview")
        .ok_or_else(|| anyhow::anyhow!("missing #camera-preview"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("#camera-preview is not a canvas: {:?}", e))?;
    hands::init_hand_tracking(&video, &preview, scene.clone())?;

    let ctx = Rc::new(RefCell::new(FrameContext {
        scene,
        groups,
        batches,
        ring: PhotoRing::new(photo_count),
        photo_quads,
        decorations: Default::default(),
        title,
        star,
        love,
        gpu,
        canvas,
        started_at: Instant::now(),
    }));
    frame::start_loop(ctx);
    Ok(())
}
