//! WASM API for the CIA1 port core.

use crate::{snapshot, Cia1Ports, CiaModel, KeyMatrix, JoystickPorts, PortHost, PortsConfig};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

/// Host side of the bindings: input devices plus the JavaScript light pen
/// callback.
struct JsHost {
    matrix: KeyMatrix,
    joystick: JoystickPorts,
    clock: u64,
    on_light_pen: Option<js_sys::Function>,
}

impl PortHost for JsHost {
    fn matrix(&self) -> &KeyMatrix {
        &self.matrix
    }

    fn joystick(&self) -> &JoystickPorts {
        &self.joystick
    }

    fn clock(&self) -> u64 {
        self.clock
    }

    fn light_pen(&mut self, asserted: bool, clk: u64) {
        if let Some(callback) = &self.on_light_pen {
            let _ = callback.call2(
                &JsValue::NULL,
                &JsValue::from_bool(asserted),
                &JsValue::from_f64(clk as f64),
            );
        }
    }
}

/// CIA1 keyboard/joystick ports for JavaScript
#[wasm_bindgen]
pub struct KeyboardPorts {
    cia: Cia1Ports,
    host: JsHost,
}

#[wasm_bindgen]
impl KeyboardPorts {
    /// Create ports for an original 6526 (`new_model == false`) or a
    /// 6526A/8521.
    #[wasm_bindgen(constructor)]
    pub fn new(new_model: bool) -> Self {
        let model = if new_model {
            CiaModel::Mos8521
        } else {
            CiaModel::Mos6526
        };
        Self {
            cia: Cia1Ports::new(PortsConfig::with_model(model)),
            host: JsHost {
                matrix: KeyMatrix::new(),
                joystick: JoystickPorts::new(),
                clock: 0,
                on_light_pen: None,
            },
        }
    }

    /// Register `callback(asserted, clock)` for light pen transitions.
    #[wasm_bindgen]
    pub fn set_light_pen_callback(&mut self, callback: js_sys::Function) {
        self.host.on_light_pen = Some(callback);
    }

    #[wasm_bindgen]
    pub fn set_clock(&mut self, clock: f64) {
        self.host.clock = clock as u64;
    }

    #[wasm_bindgen]
    pub fn key_down(&mut self, row: u8, col: u8) {
        if row < 8 && col < 8 {
            self.host.matrix.key_down(row, col);
            self.cia.check_light_pen(&mut self.host);
        }
    }

    #[wasm_bindgen]
    pub fn key_up(&mut self, row: u8, col: u8) {
        if row < 8 && col < 8 {
            self.host.matrix.key_up(row, col);
            self.cia.check_light_pen(&mut self.host);
        }
    }

    #[wasm_bindgen]
    pub fn release_all_keys(&mut self) {
        self.host.matrix.release_all();
        self.cia.check_light_pen(&mut self.host);
    }

    #[wasm_bindgen]
    pub fn set_shift_lock(&mut self, engaged: bool) {
        self.host.matrix.set_shift_lock(engaged);
        self.cia.check_light_pen(&mut self.host);
    }

    /// Set joystick state (active-high: bit 0 up, 1 down, 2 left, 3 right,
    /// 4 fire) for logical port 1 or 2.
    #[wasm_bindgen]
    pub fn set_joystick(&mut self, port: u8, state: u8) {
        self.host.joystick.set_port(port, state);
        self.cia.check_light_pen(&mut self.host);
    }

    #[wasm_bindgen]
    pub fn set_joystick_swap(&mut self, swapped: bool) {
        self.host.joystick.set_swapped(swapped);
        self.cia.check_light_pen(&mut self.host);
    }

    #[wasm_bindgen]
    pub fn set_keyboard_active(&mut self, active: bool) {
        self.host.joystick.set_keyboard_active(active);
        self.cia.check_light_pen(&mut self.host);
    }

    /// Read a port register (offset 0-3, mirrored every 16 bytes).
    #[wasm_bindgen]
    pub fn read(&mut self, offset: u16) -> u8 {
        self.cia.read_register(offset, &mut self.host)
    }

    /// Write a port register (offset 0-3, mirrored every 16 bytes).
    #[wasm_bindgen]
    pub fn write(&mut self, offset: u16, value: u8) {
        self.cia.write_register(offset, value, &mut self.host);
    }

    #[wasm_bindgen]
    pub fn pot_mask(&self) -> u8 {
        self.cia.pot_mask()
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.cia.reset(&mut self.host);
    }

    #[wasm_bindgen]
    pub fn save_state(&self) -> Vec<u8> {
        snapshot::save(&self.cia)
    }

    #[wasm_bindgen]
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), JsError> {
        snapshot::restore(&mut self.cia, data, &mut self.host).map_err(|e| JsError::new(&e.to_string()))
    }
}
