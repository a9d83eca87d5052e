//! # Virtual DualSense Joypad
//!
//! Public handle of one emulated controller.
//!
//! This module handles:
//! - Creating the virtual HID device and its kernel event worker
//! - Translating button, stick, trigger, motion, battery and touch events
//!   into the input report, flushing every change immediately
//! - Rumble and lightbar callback registration
//! - Locating the `/dev/input` nodes the kernel created
//!
//! # Examples
//!
//! ```no_run
//! use dualsense_uhid::joypad::{ButtonFlags, DeviceDefinition, DualSenseJoypad, JoypadOptions};
//! use dualsense_uhid::dualsense::report::Stick;
//!
//! let joypad = DualSenseJoypad::create(&DeviceDefinition::default(), &JoypadOptions::default())?;
//! joypad.set_on_rumble(|left, right| println!("rumble {} {}", left, right));
//! joypad.set_pressed_buttons(ButtonFlags::A | ButtonFlags::DPAD_UP);
//! joypad.set_stick(Stick::Left, 0, i16::MAX);
//! println!("nodes: {:?}", joypad.nodes());
//! # Ok::<(), dualsense_uhid::error::DualSenseError>(())
//! ```

pub mod handler;
pub mod nodes;
pub mod state;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bitflags::bitflags;
use rand::Rng;
use tracing::{debug, info, warn};
use uhid_virt::{Bus, CreateParams};

use self::handler::KernelEventHandler;
use self::nodes::NodeResolver;
use self::state::ReportState;
use crate::codec::{hex_string, scale, sign_tagged_16};
use crate::dualsense::descriptor::DS_USB_DESCRIPTOR;
use crate::dualsense::feature::FeatureBlobs;
use crate::dualsense::protocol::*;
use crate::dualsense::report::{MotionKind, Stick, TOUCH_POINT_COUNT};
use crate::error::{DualSenseError, Result};
use crate::transport::uhid::UhidDevice;
use crate::transport::Transport;

bitflags! {
    /// Application-level button mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonFlags: u32 {
        const DPAD_UP = 0x0001;
        const DPAD_DOWN = 0x0002;
        const DPAD_LEFT = 0x0004;
        const DPAD_RIGHT = 0x0008;
        /// Options
        const START = 0x0010;
        /// Create
        const BACK = 0x0020;
        const LEFT_STICK = 0x0040;
        const RIGHT_STICK = 0x0080;
        const LEFT_BUTTON = 0x0100;
        const RIGHT_BUTTON = 0x0200;
        /// PS button
        const HOME = 0x0400;
        /// Cross
        const A = 0x1000;
        /// Circle
        const B = 0x2000;
        /// Square
        const X = 0x4000;
        /// Triangle
        const Y = 0x8000;
        const PADDLE1 = 0x010000;
        const PADDLE2 = 0x020000;
        const PADDLE3 = 0x040000;
        const PADDLE4 = 0x080000;
        const TOUCHPAD = 0x100000;
        /// Mic mute
        const MISC = 0x200000;
    }
}

/// (application flag, button byte, DualSense bit) for every non D-pad button
const BUTTON_MAP: [(ButtonFlags, usize, u8); 13] = [
    (ButtonFlags::X, 0, DS_BUTTONS0_SQUARE),
    (ButtonFlags::Y, 0, DS_BUTTONS0_TRIANGLE),
    (ButtonFlags::A, 0, DS_BUTTONS0_CROSS),
    (ButtonFlags::B, 0, DS_BUTTONS0_CIRCLE),
    (ButtonFlags::LEFT_BUTTON, 1, DS_BUTTONS1_L1),
    (ButtonFlags::RIGHT_BUTTON, 1, DS_BUTTONS1_R1),
    (ButtonFlags::LEFT_STICK, 1, DS_BUTTONS1_L3),
    (ButtonFlags::RIGHT_STICK, 1, DS_BUTTONS1_R3),
    (ButtonFlags::START, 1, DS_BUTTONS1_OPTIONS),
    (ButtonFlags::BACK, 1, DS_BUTTONS1_CREATE),
    (ButtonFlags::TOUCHPAD, 2, DS_BUTTONS2_TOUCHPAD),
    (ButtonFlags::HOME, 2, DS_BUTTONS2_PS_HOME),
    (ButtonFlags::MISC, 2, DS_BUTTONS2_MIC_MUTE),
];

/// Identity the virtual device is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDefinition {
    pub name: String,
    pub phys: String,
    /// Empty means the formatted hardware address
    pub uniq: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub version: u16,
    /// `None` generates a random address
    pub mac_address: Option<[u8; 6]>,
}

impl Default for DeviceDefinition {
    fn default() -> Self {
        Self {
            name: DS_NAME.to_string(),
            phys: String::new(),
            uniq: String::new(),
            vendor_id: DS_VENDOR_ID,
            product_id: DS_PRODUCT_ID,
            version: DS_VERSION,
            mac_address: None,
        }
    }
}

/// Host paths and worker timing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoypadOptions {
    pub uhid_node: PathBuf,
    pub resolver: NodeResolver,
    pub poll_interval: Duration,
}

impl Default for JoypadOptions {
    fn default() -> Self {
        Self {
            uhid_node: PathBuf::from("/dev/uhid"),
            resolver: NodeResolver::default(),
            poll_interval: Duration::from_millis(5),
        }
    }
}

/// One emulated DualSense controller
///
/// All mutators take `&self` and may be called from any thread. Dropping
/// the joypad stops the kernel event worker, then destroys the device.
pub struct DualSenseJoypad {
    state: Arc<Mutex<ReportState>>,
    transport: Arc<dyn Transport>,
    resolver: NodeResolver,
    device: Option<UhidDevice>,
}

impl std::fmt::Debug for DualSenseJoypad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualSenseJoypad")
            .field("state", &self.state)
            .field("resolver", &self.resolver)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl DualSenseJoypad {
    /// Create the virtual device, using the thread RNG for a random address
    ///
    /// # Errors
    ///
    /// Returns `DeviceCreation` if the uhid device cannot be created.
    pub fn create(definition: &DeviceDefinition, options: &JoypadOptions) -> Result<Self> {
        Self::create_with_rng(definition, options, &mut rand::rng())
    }

    /// Create the virtual device, drawing a random address from `rng` when
    /// the definition does not carry one
    pub fn create_with_rng<R: Rng + ?Sized>(
        definition: &DeviceDefinition,
        options: &JoypadOptions,
        rng: &mut R,
    ) -> Result<Self> {
        let hardware_address = definition
            .mac_address
            .unwrap_or_else(|| random_address(rng));

        let uniq = if definition.uniq.is_empty() {
            hex_string(&hardware_address)
        } else {
            definition.uniq.clone()
        };

        let params = CreateParams {
            name: definition.name.clone(),
            phys: definition.phys.clone(),
            uniq,
            bus: Bus::USB,
            vendor: u32::from(definition.vendor_id),
            product: u32::from(definition.product_id),
            version: u32::from(definition.version),
            country: 0,
            rd_data: DS_USB_DESCRIPTOR.to_vec(),
        };

        let mut device = UhidDevice::create(params, &options.uhid_node)?;
        let mut joypad = Self::attach(
            definition,
            hardware_address,
            device.transport(),
            options.resolver.clone(),
        );

        let handler = joypad.event_handler();
        device.spawn_worker(options.poll_interval, move |event| handler.handle(event))?;
        joypad.device = Some(device);

        info!(
            "Created virtual DualSense '{}' ({})",
            definition.name,
            hex_string(&hardware_address)
        );
        Ok(joypad)
    }

    /// Build a joypad on top of an existing transport, without a device
    /// or worker of its own
    pub fn attach(
        definition: &DeviceDefinition,
        hardware_address: [u8; 6],
        transport: Arc<dyn Transport>,
        resolver: NodeResolver,
    ) -> Self {
        let state = ReportState::new(
            hardware_address,
            definition.vendor_id,
            definition.product_id,
            definition.version,
        );

        Self {
            state: Arc::new(Mutex::new(state)),
            transport,
            resolver,
            device: None,
        }
    }

    /// Handler sharing this joypad's state, for feeding kernel events
    pub fn event_handler(&self) -> KernelEventHandler {
        KernelEventHandler::new(
            Arc::clone(&self.state),
            Arc::clone(&self.transport),
            FeatureBlobs::default(),
        )
    }

    /// Hardware address as colon separated lowercase hex
    pub fn mac_address(&self) -> String {
        hex_string(&self.lock_state().hardware_address)
    }

    /// Matched `/sys/.../input/inputN` directories
    pub fn sys_nodes(&self) -> Vec<PathBuf> {
        let (vendor_id, address) = self.identity();
        self.resolver.sys_nodes(vendor_id, &address)
    }

    /// `/dev/input/eventN` and `/dev/input/jsN` nodes of this controller
    pub fn nodes(&self) -> Vec<PathBuf> {
        let (vendor_id, address) = self.identity();
        self.resolver.dev_nodes(vendor_id, &address)
    }

    /// Replace the rumble callback
    pub fn set_on_rumble<F>(&self, callback: F)
    where
        F: Fn(u16, u16) + Send + Sync + 'static,
    {
        self.lock_state().on_rumble = Some(Arc::new(callback));
    }

    /// Replace the lightbar callback
    pub fn set_on_led<F>(&self, callback: F)
    where
        F: Fn(u8, u8, u8) + Send + Sync + 'static,
    {
        self.lock_state().on_led = Some(Arc::new(callback));
    }

    /// Replace the whole button state
    ///
    /// D-pad bits become a single hat value; paddles have no DualSense
    /// counterpart and are dropped.
    pub fn set_pressed_buttons(&self, pressed: ButtonFlags) {
        let mut buttons = [0u8; 4];
        buttons[0] = Hat::from_directions(
            pressed.contains(ButtonFlags::DPAD_UP),
            pressed.contains(ButtonFlags::DPAD_DOWN),
            pressed.contains(ButtonFlags::DPAD_LEFT),
            pressed.contains(ButtonFlags::DPAD_RIGHT),
        ) as u8;

        for (flag, byte, bit) in BUTTON_MAP {
            if pressed.contains(flag) {
                buttons[byte] |= bit;
            }
        }

        self.update(|state| state.report.set_buttons(buttons));
    }

    /// Trigger pressure, 0 (released) to 255 (fully pressed)
    ///
    /// Only the analog axes change; the digital L2/R2 button bits stay clear.
    pub fn set_triggers(&self, left: u8, right: u8) {
        let left = trigger_to_axis(left);
        let right = trigger_to_axis(right);
        self.update(|state| state.report.set_triggers(left, right));
    }

    /// Stick position in `i16` range; positive `y` points up
    pub fn set_stick(&self, stick: Stick, x: i16, y: i16) {
        let x = stick_to_axis(i32::from(x));
        let y = stick_to_axis(-i32::from(y));
        self.update(|state| state.report.set_stick(stick, x, y));
    }

    /// Motion sample: acceleration in g, angular velocity in deg/s
    pub fn set_motion(&self, kind: MotionKind, x: f32, y: f32, z: f32) {
        let factor = match kind {
            MotionKind::Acceleration => STANDARD_GRAVITY * 100.0,
            MotionKind::Gyroscope => GYRO_RESOLUTION,
        };
        let words = [x, y, z].map(|value| sign_tagged_16(value, (value * factor).abs()));
        self.update(|state| state.report.set_motion(kind, words));
    }

    /// Battery state and charge percentage, reported in 10% steps
    pub fn set_battery(&self, battery: BatteryState, percentage: u8) {
        let charge = percentage.min(100) / 10;
        self.update(|state| state.report.set_battery(charge, battery));
    }

    /// Press or move a finger on the touchpad
    ///
    /// A finger going from lifted to pressed gets a fresh touch id; moving
    /// a pressed finger keeps its id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFinger` for an index other than 0 or 1; nothing is sent.
    pub fn place_finger(&self, finger: usize, x: u16, y: u16) -> Result<()> {
        check_finger(finger)?;
        self.update(|state| {
            if !state.touch_contacts[finger].pressed {
                let id = state.allocate_touch_id();
                state.touch_contacts[finger].id = id;
                state.touch_contacts[finger].pressed = true;
            }
            let id = state.touch_contacts[finger].id;
            state.report.press_touch_point(finger, id, x, y);
        });
        Ok(())
    }

    /// Lift a finger; its last position stays in the report
    ///
    /// # Errors
    ///
    /// Returns `UnknownFinger` for an index other than 0 or 1; nothing is sent.
    pub fn release_finger(&self, finger: usize) -> Result<()> {
        check_finger(finger)?;
        self.update(|state| {
            state.touch_contacts[finger].pressed = false;
            state.report.release_touch_point(finger);
        });
        Ok(())
    }

    /// Apply `mutate`, stamp the report and send it, all under the state lock
    fn update(&self, mutate: impl FnOnce(&mut ReportState)) {
        let mut state = self.lock_state();
        mutate(&mut state);
        state.stamp_and_advance();

        if let Err(e) = self.transport.send_input(state.report.as_bytes()) {
            warn!("Failed to send input report: {}", e);
        }
    }

    fn identity(&self) -> (u16, String) {
        let state = self.lock_state();
        (state.vendor_id, hex_string(&state.hardware_address))
    }

    fn lock_state(&self) -> MutexGuard<'_, ReportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DualSenseJoypad {
    fn drop(&mut self) {
        if let Some(mut device) = self.device.take() {
            debug!("Destroying virtual DualSense");
            device.stop();
        }
    }
}

fn random_address<R: Rng + ?Sized>(rng: &mut R) -> [u8; 6] {
    let mut address = [0u8; 6];
    rng.fill_bytes(&mut address);
    address
}

fn check_finger(finger: usize) -> Result<()> {
    if finger < TOUCH_POINT_COUNT {
        Ok(())
    } else {
        Err(DualSenseError::UnknownFinger(finger))
    }
}

fn stick_to_axis(value: i32) -> u8 {
    scale(
        value,
        STICK_INPUT_MIN,
        STICK_INPUT_MAX,
        i32::from(DS_AXIS_MIN),
        i32::from(DS_AXIS_MAX),
    )
    .clamp(i32::from(DS_AXIS_MIN), i32::from(DS_AXIS_MAX)) as u8
}

fn trigger_to_axis(value: u8) -> u8 {
    scale(
        i32::from(value),
        TRIGGER_INPUT_MIN,
        TRIGGER_INPUT_MAX,
        i32::from(DS_AXIS_MIN),
        i32::from(DS_AXIS_MAX),
    )
    .clamp(i32::from(DS_AXIS_MIN), i32::from(DS_AXIS_MAX)) as u8
}
