use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::layout::{LayoutConfig, compute_layout_with};
use super::render;
use super::state::LinkCanvasState;
use super::types::{CanvasData, Layout};

/// Zoom step of the on-screen zoom buttons.
const BUTTON_ZOOM: f64 = 1.2;

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Handles owned by the canvas' frame loop and window listeners.
#[derive(Clone, Default)]
struct FrameLoop {
	animate: Callback,
	resize: Callback,
	frame: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	/// Cancels the pending frame, detaches the resize listener and drops both
	/// closures. The frame closure holds an Rc to its own slot, so taking it out
	/// is what frees it.
	fn stop(&self, window: Option<&Window>) {
		let frame = self.frame.take();
		let resize = self.resize.borrow_mut().take();
		if let Some(win) = window {
			if let Some(id) = frame {
				let _ = win.cancel_animation_frame(id);
			}
			if let Some(cb) = &resize {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Interactive link canvas. Relayouts whenever `data` changes.
#[component]
pub fn LinkCanvas(
	#[prop(into)] data: Signal<CanvasData>,
	#[prop(optional)] config: LayoutConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let layout = Memo::new(move |_| {
		let data = data.get().into_chronological();
		compute_layout_with(&config, &data.participants, &data.links)
	});

	let state: Rc<RefCell<Option<LinkCanvasState>>> = Rc::new(RefCell::new(None));
	let frame_loop = FrameLoop::default();
	let (state_init, animate_init, resize_cb_init, frame_init) = (
		state.clone(),
		frame_loop.animate.clone(),
		frame_loop.resize.clone(),
		frame_loop.frame.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("link canvas: no window");
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("link canvas: 2d context unavailable");
			return;
		};
		let initial: Layout = layout.get_untracked();
		debug!(
			"link canvas: opened with {} nodes, {} edges",
			initial.nodes.len(),
			initial.edges.len()
		);
		*state_init.borrow_mut() = Some(LinkCanvasState::new(initial, w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, frame_inner) =
			(state_init.clone(), animate_init.clone(), frame_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.needs_redraw {
					render::render(s, &ctx);
					s.needs_redraw = false;
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let teardown = SendWrapper::new(frame_loop);
	on_cleanup(move || {
		teardown.stop(web_sys::window().as_ref());
		debug!("link canvas: torn down");
	});

	let state_relayout = state.clone();
	Effect::new(move |_| {
		let next = layout.get();
		if let Some(ref mut s) = *state_relayout.borrow_mut() {
			let (nodes, edges) = (next.nodes.len(), next.edges.len());
			let refit = s.set_layout(next);
			debug!("link canvas: relayout {nodes} nodes, {edges} edges (refit: {refit})");
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.drag.node_start_x = s.positions[idx].x;
				s.drag.node_start_y = s.positions[idx].y;
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					s.positions[idx].x = s.drag.node_start_x + dx;
					s.positions[idx].y = s.drag.node_start_y + dy;
					s.needs_redraw = true;
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
				s.needs_redraw = true;
			} else {
				s.update_hover(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.drag = Default::default();
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag = Default::default();
			s.pan.active = false;
			s.clear_hover();
		}
	};

	let state_dbl = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dbl.borrow_mut() {
			s.fit_to_content();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(factor, x, y);
		}
	};

	let state_zi = state.clone();
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			s.zoom_centre(BUTTON_ZOOM);
		}
	};

	let state_zo = state.clone();
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			s.zoom_centre(1.0 / BUTTON_ZOOM);
		}
	};

	let state_fit = state.clone();
	let on_fit = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			s.fit_to_content();
		}
	};

	view! {
		<div class="link-canvas-host" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="link-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:dblclick=on_dblclick
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div
				class="link-canvas-controls"
				style="position: absolute; left: 12px; bottom: 12px; display: flex; flex-direction: column; gap: 4px;"
			>
				<button type="button" title="Zoom in" on:click=on_zoom_in>"+"</button>
				<button type="button" title="Zoom out" on:click=on_zoom_out>"−"</button>
				<button type="button" title="Fit view" on:click=on_fit>"⤢"</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stop_releases_loop_handles() {
		let frame_loop = FrameLoop::default();
		frame_loop.frame.set(Some(7));
		let held = frame_loop.clone();

		frame_loop.stop(None);
		assert_eq!(held.frame.get(), None);
		assert!(held.animate.borrow().is_none());
		assert!(held.resize.borrow().is_none());

		frame_loop.stop(None);
		assert_eq!(held.frame.get(), None);
	}
}
