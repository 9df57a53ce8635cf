use blockcanvas_editor::{
    BlockSubtype, Canvas, CanvasUpdate, DragSource, EditorConfig, Geometry, GeometrySnapshot,
    GestureEvent, ItemId, ItemList, PointerPosition,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// What the browser needs after each gesture callback
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateView<'a> {
    changed: bool,
    version: u64,
    items: &'a ItemList,
    show_drop: bool,
    dropped: Option<ItemId>,
}

/// Canvas handle owned by the page's drag layer
#[wasm_bindgen]
pub struct CanvasHandle {
    canvas: Canvas,
}

#[wasm_bindgen]
impl CanvasHandle {
    /// Create a canvas from a JSON config (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<CanvasHandle, JsValue> {
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(to_js)?
        };

        Ok(CanvasHandle {
            canvas: Canvas::new(config),
        })
    }

    #[wasm_bindgen(js_name = dragStartBlock)]
    pub fn drag_start_block(&mut self, id: u64) -> Result<String, JsValue> {
        let update = self.canvas.handle(GestureEvent::DragStart {
            source: DragSource::Block { id: ItemId(id) },
        });
        self.render(&update)
    }

    #[wasm_bindgen(js_name = dragStartPalette)]
    pub fn drag_start_palette(&mut self, subtype: &str) -> Result<String, JsValue> {
        let subtype: BlockSubtype = subtype.parse().map_err(to_js)?;
        let update = self.canvas.handle(GestureEvent::DragStart {
            source: DragSource::Palette { subtype },
        });
        self.render(&update)
    }

    #[wasm_bindgen(js_name = drag)]
    pub fn drag(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let update = self.canvas.handle(GestureEvent::Drag {
            pointer: PointerPosition::new(x, y),
        });
        self.render(&update)
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) -> Result<String, JsValue> {
        let update = self.canvas.handle(GestureEvent::DragEnd);
        self.render(&update)
    }

    #[wasm_bindgen(js_name = dragCancel)]
    pub fn drag_cancel(&mut self) -> Result<String, JsValue> {
        let update = self.canvas.handle(GestureEvent::DragCancel);
        self.render(&update)
    }

    /// Replace all measurements: `{ "<id>": { "top": .., "height": .. } }`
    #[wasm_bindgen(js_name = setGeometry)]
    pub fn set_geometry(&mut self, geometry_json: &str) -> Result<(), JsValue> {
        let geometry: GeometrySnapshot = serde_json::from_str(geometry_json).map_err(to_js)?;
        self.canvas.set_geometry(geometry);
        Ok(())
    }

    #[wasm_bindgen(js_name = measure)]
    pub fn measure(&mut self, id: u64, top: f64, height: f64) {
        self.canvas.measure(ItemId(id), Geometry::new(top, height));
    }

    #[wasm_bindgen(js_name = setViewportWidth)]
    pub fn set_viewport_width(&mut self, width: f64) {
        self.canvas.set_viewport_width(width);
    }

    #[wasm_bindgen(js_name = appendBlock)]
    pub fn append_block(&mut self, subtype: &str) -> Result<u64, JsValue> {
        let subtype: BlockSubtype = subtype.parse().map_err(to_js)?;
        Ok(self.canvas.append_block(subtype).0)
    }

    #[wasm_bindgen(js_name = removeBlock)]
    pub fn remove_block(&mut self, id: u64) -> bool {
        self.canvas.remove_block(ItemId(id))
    }

    /// Current list as JSON
    #[wasm_bindgen(js_name = items)]
    pub fn items(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.canvas.items()).map_err(to_js)
    }

    /// Style and metadata maps as JSON, for the property panel
    #[wasm_bindgen(js_name = store)]
    pub fn store(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.canvas.store()).map_err(to_js)
    }

    fn render(&self, update: &CanvasUpdate) -> Result<String, JsValue> {
        let view = UpdateView {
            changed: update.changed(),
            version: update.current.version(),
            items: &update.current,
            show_drop: self.canvas.show_drop(),
            dropped: update.dropped.map(|d| d.id),
        };
        serde_json::to_string(&view).map_err(to_js)
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
