//! Canvas-backed texture sources: text banners and decoded photo images.
//!
//! The pure sprite generators live in `tinsel_core::sprites`; this module
//! only covers what genuinely needs the browser (font rasterization and
//! image decode), and hands back plain pixel buffers for upload.

use tinsel_core::sprites::PixelBuffer;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub const BANNER_WIDTH: u32 = 1024;
pub const BANNER_HEIGHT: u32 = 256;

fn offscreen_context(
    width: u32,
    height: u32,
) -> anyhow::Result<(web::HtmlCanvasElement, web::CanvasRenderingContext2d)> {
    let document = crate::dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("not a canvas: {:?}", e))?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("get 2d context: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("not a 2d context: {:?}", e))?;
    Ok((canvas, ctx))
}

fn read_pixels(
    ctx: &web::CanvasRenderingContext2d,
    width: u32,
    height: u32,
) -> anyhow::Result<PixelBuffer> {
    let image_data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| anyhow::anyhow!("get_image_data: {:?}", e))?;
    Ok(PixelBuffer {
        width,
        height,
        data: image_data.data().0,
    })
}

/// Rasterize a centered text banner with a colored glow shadow, the way the
/// title and love banners are drawn.
pub fn text_banner(
    text: &str,
    font: &str,
    fill: &str,
    shadow: &str,
) -> anyhow::Result<PixelBuffer> {
    let (_canvas, ctx) = offscreen_context(BANNER_WIDTH, BANNER_HEIGHT)?;
    ctx.set_font(font);
    ctx.set_fill_style_str(fill);
    ctx.set_text_align("center");
    ctx.set_shadow_color(shadow);
    ctx.set_shadow_blur(40.0);
    ctx.fill_text(text, BANNER_WIDTH as f64 / 2.0, 130.0)
        .map_err(|e| anyhow::anyhow!("fill_text: {:?}", e))?;
    read_pixels(&ctx, BANNER_WIDTH, BANNER_HEIGHT)
}

/// Decode an image URL into RGBA pixels via an offscreen canvas.
pub async fn load_image_pixels(path: &str) -> anyhow::Result<PixelBuffer> {
    let img = web::HtmlImageElement::new()
        .map_err(|e| anyhow::anyhow!("image element: {:?}", e))?;
    img.set_src(path);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| anyhow::anyhow!("decode {path}: {:?}", e))?;

    let width = img.natural_width().max(1);
    let height = img.natural_height().max(1);
    let (_canvas, ctx) = offscreen_context(width, height)?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)
        .map_err(|e| anyhow::anyhow!("draw {path}: {:?}", e))?;
    read_pixels(&ctx, width, height)
}

/// Flat 1x1 color texture, used for the gold photo borders.
pub fn solid_color(rgba: [u8; 4]) -> PixelBuffer {
    PixelBuffer {
        width: 1,
        height: 1,
        data: rgba.to_vec(),
    }
}
