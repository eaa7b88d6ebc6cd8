//! Canvas 2D renderer

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::palette::*;
use crate::sim::{Block, GameState};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Size the canvas to the logical playfield and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, width: f32, height: f32) -> Result<Self, JsValue> {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: width as f64,
            height: height as f64,
        })
    }

    pub fn render(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.width, self.height);

        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, self.height);
        gradient.add_color_stop(0.0, BACKGROUND_TOP)?;
        gradient.add_color_stop(1.0, BACKGROUND_BOTTOM)?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        for block in &state.blocks {
            self.draw_block(block)?;
        }

        if let Some(p) = &state.projectile {
            ctx.begin_path();
            ctx.set_fill_style_str(PROJECTILE_FILL);
            ctx.arc(p.pos.x as f64, p.pos.y as f64, p.radius as f64, 0.0, TAU)?;
            ctx.fill();
        }

        // Ground line at launch height
        let line_y = state.tuning.launch_line_y() as f64;
        ctx.set_stroke_style_str(LAUNCH_LINE);
        ctx.set_line_width(LAUNCH_LINE_WIDTH);
        ctx.begin_path();
        ctx.move_to(0.0, line_y);
        ctx.line_to(self.width, line_y);
        ctx.stroke();

        if state.aim.dragging {
            ctx.set_fill_style_str(PREVIEW_DOT);
            let len = state.aim.preview.len();
            for (i, point) in state.aim.preview.iter().enumerate() {
                ctx.set_global_alpha(preview_alpha(i, len) as f64);
                ctx.begin_path();
                ctx.arc(point.x as f64, point.y as f64, PREVIEW_DOT_RADIUS, 0.0, TAU)?;
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);
        }

        ctx.set_fill_style_str(ORIGIN_MARKER);
        ctx.begin_path();
        ctx.arc(
            state.aim.origin_x as f64,
            line_y,
            ORIGIN_MARKER_RADIUS,
            0.0,
            TAU,
        )?;
        ctx.fill();

        Ok(())
    }

    fn draw_block(&self, block: &Block) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y) = (block.pos.x as f64, block.pos.y as f64);
        let (w, h) = (block.size.x as f64, block.size.y as f64);

        ctx.set_fill_style_str(block_fill(block));
        ctx.set_global_alpha(BLOCK_ALPHA);
        ctx.fill_rect(x, y, w, h);
        ctx.set_global_alpha(1.0);

        ctx.set_fill_style_str(BLOCK_TEXT);
        ctx.set_font(BLOCK_FONT);
        ctx.set_text_align("center");
        ctx.fill_text(&block.hp.to_string(), x + w / 2.0, y + h / 2.0 + 6.0)?;

        if block.is_boss {
            let (bx, by, full, filled) = boss_bar(block);
            ctx.set_fill_style_str(BOSS_BAR_TRACK);
            ctx.fill_rect(bx as f64, by as f64, full as f64, BOSS_BAR_HEIGHT as f64);
            ctx.set_fill_style_str(BOSS_BAR_FILL);
            ctx.fill_rect(bx as f64, by as f64, filled as f64, BOSS_BAR_HEIGHT as f64);
        }
        Ok(())
    }
}
