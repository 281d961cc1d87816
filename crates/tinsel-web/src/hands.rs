//! MediaPipe Hands bridge: camera frames in, gesture readings out.
//!
//! The JS `Hands` and camera-utils `Camera` globals are CDN-loaded by the
//! page; this module binds them, converts each result set into
//! `tinsel_core` hand frames, classifies, and writes the shared scene state.
//! Classification runs on every camera frame with no smoothing, so the
//! active state is simply the latest raw reading.

use glam::Vec2;
use js_sys::{Array, Object, Promise, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use tinsel_core::{
    classify, GestureReading, HandFrame, HandSet, SceneState, CAPTURE_HEIGHT, CAPTURE_WIDTH,
    LANDMARK_COUNT, PREVIEW_HEIGHT, PREVIEW_WIDTH,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    /// @mediapipe/hands global.
    pub type Hands;

    #[wasm_bindgen(constructor, js_class = "Hands")]
    fn new(config: &JsValue) -> Hands;

    #[wasm_bindgen(method, js_name = setOptions)]
    fn set_options(this: &Hands, options: &JsValue);

    #[wasm_bindgen(method, js_name = onResults)]
    fn on_results(this: &Hands, callback: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn send(this: &Hands, inputs: &JsValue) -> Promise;

    /// @mediapipe/camera_utils global.
    #[wasm_bindgen(js_name = Camera)]
    pub type CameraUtils;

    #[wasm_bindgen(constructor, js_class = "Camera")]
    fn new(video: &web::HtmlVideoElement, config: &JsValue) -> CameraUtils;

    #[wasm_bindgen(method)]
    fn start(this: &CameraUtils) -> Promise;
}

fn set_prop(obj: &Object, key: &str, value: &JsValue) -> anyhow::Result<()> {
    Reflect::set(obj, &JsValue::from_str(key), value)
        .map_err(|e| anyhow::anyhow!("set {key}: {:?}", e))?;
    Ok(())
}

/// Pull one hand's 21 landmarks out of a MediaPipe landmark array.
fn parse_hand(hand: &Array) -> Option<HandFrame> {
    if (hand.length() as usize) < LANDMARK_COUNT {
        return None;
    }
    let mut landmarks = [Vec2::ZERO; LANDMARK_COUNT];
    for (i, slot) in landmarks.iter_mut().enumerate() {
        let lm = hand.get(i as u32);
        let x = Reflect::get(&lm, &JsValue::from_str("x")).ok()?.as_f64()?;
        let y = Reflect::get(&lm, &JsValue::from_str("y")).ok()?.as_f64()?;
        *slot = Vec2::new(x as f32, y as f32);
    }
    Some(HandFrame::new(landmarks))
}

fn draw_preview(ctx: &web::CanvasRenderingContext2d, image: &JsValue) {
    ctx.clear_rect(0.0, 0.0, PREVIEW_WIDTH, PREVIEW_HEIGHT);
    if let Some(canvas) = image.dyn_ref::<web::HtmlCanvasElement>() {
        let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            canvas,
            0.0,
            0.0,
            PREVIEW_WIDTH,
            PREVIEW_HEIGHT,
        );
    } else if let Some(video) = image.dyn_ref::<web::HtmlVideoElement>() {
        let _ = ctx.draw_image_with_html_video_element_and_dw_and_dh(
            video,
            0.0,
            0.0,
            PREVIEW_WIDTH,
            PREVIEW_HEIGHT,
        );
    }
}

/// Wire the tracking pipeline and start the camera. The `scene` cell is the
/// same one the frame loop reads each tick.
pub fn init_hand_tracking(
    video: &web::HtmlVideoElement,
    preview_canvas: &web::HtmlCanvasElement,
    scene: Rc<RefCell<SceneState>>,
) -> anyhow::Result<()> {
    let ctx = preview_canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("preview context: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("preview 2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("preview not 2d: {:?}", e))?;

    // Model assets come from the CDN next to the loader script.
    let locate = Closure::wrap(Box::new(|file: String| {
        format!("https://cdn.jsdelivr.net/npm/@mediapipe/hands/{file}")
    }) as Box<dyn Fn(String) -> String>);
    let hands_cfg = Object::new();
    set_prop(&hands_cfg, "locateFile", locate.as_ref())?;
    locate.forget();
    let hands = Hands::new(&hands_cfg);

    let options = Object::new();
    set_prop(&options, "maxNumHands", &JsValue::from_f64(2.0))?;
    set_prop(&options, "modelComplexity", &JsValue::from_f64(1.0))?;
    set_prop(&options, "minDetectionConfidence", &JsValue::from_f64(0.5))?;
    set_prop(&options, "minTrackingConfidence", &JsValue::from_f64(0.5))?;
    hands.set_options(&options);

    let scene_cb = scene.clone();
    let on_results = Closure::wrap(Box::new(move |results: JsValue| {
        if let Ok(image) = Reflect::get(&results, &JsValue::from_str("image")) {
            draw_preview(&ctx, &image);
        }

        let mut detected: HandSet = HandSet::new();
        if let Ok(list) = Reflect::get(&results, &JsValue::from_str("multiHandLandmarks")) {
            if let Some(list) = list.dyn_ref::<Array>() {
                for hand in list.iter() {
                    if let Some(arr) = hand.dyn_ref::<Array>() {
                        if let Some(frame) = parse_hand(arr) {
                            detected.push(frame);
                        }
                    }
                }
            }
        }

        let GestureReading { state, hand_x } = classify(&detected);
        let mut scene = scene_cb.borrow_mut();
        if scene.display != state {
            log::debug!("[gesture] {:?} -> {:?}", scene.display, state);
        }
        scene.display = state;
        scene.hand_x = hand_x;
    }) as Box<dyn FnMut(JsValue)>);
    hands.on_results(on_results.as_ref().unchecked_ref());
    on_results.forget();

    // Each camera frame is pushed straight through the tracker; Camera
    // awaits the returned promise before grabbing the next frame.
    let video_frame = video.clone();
    let hands_frame = hands.clone();
    let on_frame = Closure::wrap(Box::new(move || -> Promise {
        let inputs = Object::new();
        let _ = Reflect::set(
            &inputs,
            &JsValue::from_str("image"),
            video_frame.as_ref(),
        );
        hands_frame.send(&inputs)
    }) as Box<dyn FnMut() -> Promise>);

    let camera_cfg = Object::new();
    set_prop(&camera_cfg, "onFrame", on_frame.as_ref())?;
    set_prop(&camera_cfg, "width", &JsValue::from_f64(CAPTURE_WIDTH as f64))?;
    set_prop(
        &camera_cfg,
        "height",
        &JsValue::from_f64(CAPTURE_HEIGHT as f64),
    )?;
    on_frame.forget();

    let camera = CameraUtils::new(video, &camera_cfg);
    let started = camera.start();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = wasm_bindgen_futures::JsFuture::from(started).await {
            log::error!("camera start failed: {:?}", e);
        }
    });
    Ok(())
}
