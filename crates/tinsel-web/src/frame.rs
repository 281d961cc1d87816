use crate::render::{billboard_model, GpuState, Quad, SpriteBatch};
use glam::{Mat4, Vec2, Vec3, Vec4};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use tinsel_core::{
    Decorations, ParticleGroup, PhotoRing, SceneState, HAND_ROTATION_SPAN, LOVE_POSITION,
    TITLE_POSITION,
};
use tinsel_core::decorations::star_position;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Quad sizes in world units, border slightly larger than the photo plane.
const PHOTO_SIZE: Vec2 = Vec2::new(8.0, 8.0);
const BORDER_SIZE: Vec2 = Vec2::new(9.0, 9.0);
const TITLE_SIZE: Vec2 = Vec2::new(60.0, 15.0);
const STAR_SIZE: Vec2 = Vec2::new(12.0, 12.0);
const LOVE_SIZE: Vec2 = Vec2::new(70.0, 18.0);

/// One photo plane plus its gold border, drawn border-first.
pub struct PhotoQuad {
    pub border: Quad,
    pub plane: Quad,
}

pub struct FrameContext {
    pub scene: Rc<RefCell<SceneState>>,

    pub groups: Vec<ParticleGroup>,
    pub batches: Vec<SpriteBatch>,
    pub ring: PhotoRing,
    pub photo_quads: Vec<PhotoQuad>,
    pub decorations: Decorations,
    pub title: Quad,
    pub star: Quad,
    pub love: Quad,

    pub gpu: GpuState<'static>,
    pub canvas: web::HtmlCanvasElement,
    pub started_at: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let time = self.started_at.elapsed().as_secs_f32();
        let (state, hand_x, selected) = {
            let s = self.scene.borrow();
            (s.display, s.hand_x, s.selected_photo)
        };
        let hand_rot_y = (hand_x - 0.5) * HAND_ROTATION_SPAN;

        for group in &mut self.groups {
            group.step(state, hand_rot_y, time);
        }

        // The photo ring trails the gold group's spin.
        let base_angle = self.groups.first().map(|g| g.rotation_y).unwrap_or(0.0);
        let new_selected = self.ring.step(state, selected, base_angle, time);
        if new_selected != selected {
            self.scene.borrow_mut().selected_photo = new_selected;
        }

        self.decorations.step(state, time);

        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());

        for (group, batch) in self.groups.iter().zip(self.batches.iter_mut()) {
            self.gpu.write_sprite_batch(batch, group);
        }

        let eye = self.gpu.eye();
        let mut quads: Vec<&Quad> = Vec::with_capacity(self.photo_quads.len() * 2 + 3);
        for (pose, quad) in self.ring.poses.iter().zip(&self.photo_quads) {
            if !pose.visible || pose.scale < 1e-3 {
                continue;
            }
            let forward = (eye - pose.position).normalize_or_zero();
            self.gpu.write_quad(
                &quad.border,
                billboard_model(pose.position - forward * 0.1, BORDER_SIZE, pose.scale, eye),
                Vec4::ONE,
            );
            self.gpu.write_quad(
                &quad.plane,
                billboard_model(pose.position, PHOTO_SIZE, pose.scale, eye),
                Vec4::ONE,
            );
            quads.push(&quad.border);
            quads.push(&quad.plane);
        }

        let d = self.decorations;
        if d.title_visible {
            let model = Mat4::from_translation(TITLE_POSITION)
                * Mat4::from_scale(Vec3::new(
                    TITLE_SIZE.x * d.title_scale,
                    TITLE_SIZE.y * d.title_scale,
                    1.0,
                ));
            self.gpu.write_quad(&self.title, model, Vec4::ONE);
            quads.push(&self.title);
        }
        if d.star_visible {
            let model = Mat4::from_translation(star_position())
                * Mat4::from_rotation_z(d.star_rotation)
                * Mat4::from_scale(Vec3::new(STAR_SIZE.x, STAR_SIZE.y, 1.0));
            self.gpu
                .write_quad(&self.star, model, Vec4::new(1.0, 1.0, 1.0, d.star_opacity));
            quads.push(&self.star);
        }
        if d.love_visible {
            let model = Mat4::from_translation(LOVE_POSITION)
                * Mat4::from_scale(Vec3::new(
                    LOVE_SIZE.x * d.love_scale,
                    LOVE_SIZE.y * d.love_scale,
                    1.0,
                ));
            self.gpu.write_quad(&self.love, model, Vec4::ONE);
            quads.push(&self.love);
        }

        if let Err(e) = self.gpu.render(&self.batches, &quads) {
            log::error!("render error: {:?}", e);
        }
    }
}

/// Re-queue the frame callback on every display refresh.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
