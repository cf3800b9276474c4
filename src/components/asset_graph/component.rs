use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::camera::on_wheel;
use super::render;
use super::state::AssetGraphState;
use super::types::DomainNode;
use crate::config::GraphConfig;

type SharedState = Rc<RefCell<Option<AssetGraphState>>>;

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Frame {
	Draw,
	Idle,
	Stop,
}

/// Decides what one animation frame does. Once the component is gone the
/// state is dropped and the loop must not reschedule itself.
fn next_frame(state: &mut Option<AssetGraphState>, disposed: bool) -> Frame {
	if disposed {
		*state = None;
		return Frame::Stop;
	}
	match state {
		Some(s) if s.dirty => Frame::Draw,
		_ => Frame::Idle,
	}
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// Canvas rendering of an asset hierarchy with zoom, pan and selection.
///
/// `tree` is drawn whenever it changes; `panel_expanded` shifts the view when
/// the neighbouring side panel opens or closes.
#[component]
pub fn AssetGraph(
	#[prop(into)] tree: Signal<Option<DomainNode>>,
	#[prop(into)] panel_expanded: Signal<bool>,
	#[prop(optional)] on_select: Option<Callback<Option<DomainNode>>>,
	#[prop(optional)] config: GraphConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (zoom, set_zoom) = signal(100u32);
	let disposed = Arc::new(AtomicBool::new(false));
	let (state_init, animate_init, resize_cb_init, disposed_init) =
		(state.clone(), animate.clone(), resize_cb.clone(), disposed.clone());
	on_cleanup(move || disposed.store(true, Ordering::Relaxed));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("asset graph canvas has no 2d context");
			return;
		};

		let mut initial = AssetGraphState::new(&config, w, h);
		if let Some(tree) = tree.get_untracked() {
			initial.set_tree(tree);
			set_zoom.set(initial.camera.zoom_percent);
		}
		*state_init.borrow_mut() = Some(initial);
		info!("asset graph mounted at {w}x{h}");

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, resize_inner, disposed_anim) = (
			state_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			disposed_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let mut guard = state_anim.borrow_mut();
			match next_frame(&mut guard, disposed_anim.load(Ordering::Relaxed)) {
				Frame::Stop => {
					if let (Some(win), Some(cb)) = (web_sys::window(), resize_inner.borrow().as_ref()) {
						let _ = win
							.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
					}
					debug!("asset graph unmounted, animation loop stopped");
					return;
				}
				Frame::Draw => {
					if let Some(s) = guard.as_mut() {
						render::render(s, &ctx);
						s.dirty = false;
					}
				}
				Frame::Idle => {}
			}
			drop(guard);
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_tree = state.clone();
	Effect::new(move |_| {
		let Some(tree) = tree.get() else {
			return;
		};
		if let Some(ref mut s) = *state_tree.borrow_mut() {
			s.set_tree(tree);
			set_zoom.set(s.camera.zoom_percent);
		}
		if let Some(cb) = on_select {
			cb.run(None);
		}
	});

	let state_panel = state.clone();
	Effect::new(move |prev: Option<bool>| {
		let expanded = panel_expanded.get();
		if prev.is_some_and(|prev| prev != expanded) {
			if let Some(ref mut s) = *state_panel.borrow_mut() {
				s.camera.on_panel_toggle(&mut s.scene, expanded);
				s.dirty = true;
			}
		}
		expanded
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let picked = {
			let mut guard = state_md.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let picked = s.select_at(x, y).map(|node| node.data.clone());
			if picked.is_none() {
				s.begin_pan(x, y);
			}
			picked
		};
		if let Some(cb) = on_select {
			cb.run(picked);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.update_pan(x, y);
			} else {
				s.set_hover(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_pan();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
			s.clear_hover();
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.focus_at(x, y);
		}
	};

	let state_wh = state.clone();
	let on_wheel_ev = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			on_wheel(&mut s.camera, &mut s.scene, ev.delta_y(), x, y);
			s.dirty = true;
			set_zoom.set(s.camera.zoom_percent);
		}
	};

	let camera_action = move |state: SharedState, action: fn(&mut AssetGraphState)| {
		move |_: MouseEvent| {
			if let Some(ref mut s) = *state.borrow_mut() {
				action(s);
				s.dirty = true;
				set_zoom.set(s.camera.zoom_percent);
			}
		}
	};
	let zoom_out = camera_action(state.clone(), |s| s.camera.step_zoom(&mut s.scene, -1));
	let zoom_in = camera_action(state.clone(), |s| s.camera.step_zoom(&mut s.scene, 1));
	let fit = camera_action(state.clone(), |s| {
		s.camera.fit_to_screen(&mut s.scene);
	});
	let recenter = camera_action(state.clone(), |s| s.camera.recenter(&mut s.scene));

	view! {
		<div class="asset-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="asset-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:dblclick=on_dblclick
				on:wheel=on_wheel_ev
				style="display: block; cursor: grab;"
			/>
			<div class="asset-graph-toolbar" style="position: absolute; top: 12px; left: 12px;">
				<button title="Zoom out" on:click=zoom_out>"−"</button>
				<span class="zoom-readout">{move || format!("{}%", zoom.get())}</span>
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Fit to screen" on:click=fit>"Fit"</button>
				<button title="Center" on:click=recenter>"Center"</button>
			</div>
		</div>
	}
}
