//! # Kernel Event Handler
//!
//! Reacts to events the kernel sends to the virtual controller.
//!
//! This module handles:
//! - Answering feature report queries (calibration, pairing, firmware)
//! - Decoding output reports into rumble and lightbar callbacks
//! - Rejecting feature report writes
//! - Logging lifecycle events

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use super::state::ReportState;
use crate::dualsense::feature::FeatureBlobs;
use crate::dualsense::output::decode_output_report;
use crate::dualsense::protocol::{
    DS_FEATURE_REPORT_CALIBRATION, DS_FEATURE_REPORT_FIRMWARE_INFO, DS_FEATURE_REPORT_PAIRING_INFO,
};
use crate::transport::{KernelEvent, Transport};

/// Error code for unsupported `GET_REPORT` queries and every `SET_REPORT`
pub const EINVAL: u16 = 22;

/// Dispatches kernel events against a controller's shared state
pub struct KernelEventHandler {
    state: Arc<Mutex<ReportState>>,
    transport: Arc<dyn Transport>,
    blobs: FeatureBlobs,
}

impl KernelEventHandler {
    pub fn new(
        state: Arc<Mutex<ReportState>>,
        transport: Arc<dyn Transport>,
        blobs: FeatureBlobs,
    ) -> Self {
        Self {
            state,
            transport,
            blobs,
        }
    }

    /// Handle one kernel event
    ///
    /// Never fails: unsupported queries and feature writes get an `EINVAL`
    /// reply, malformed output reports and write failures are logged and
    /// dropped.
    pub fn handle(&self, event: KernelEvent) {
        match event {
            KernelEvent::GetReport { id, report_number } => {
                self.handle_get_report(id, report_number)
            }
            KernelEvent::Output { data } => self.handle_output(&data),
            KernelEvent::SetReport {
                id, report_number, ..
            } => self.handle_set_report(id, report_number),
            KernelEvent::Start => debug!("Virtual controller started"),
            KernelEvent::Stop => debug!("Virtual controller stopped"),
            KernelEvent::Open => debug!("Virtual controller opened"),
            KernelEvent::Close => debug!("Virtual controller closed"),
        }
    }

    fn handle_get_report(&self, id: u32, report_number: u8) {
        debug!("GET_REPORT id={} report=0x{:02X}", id, report_number);

        let (err, data) = match report_number {
            DS_FEATURE_REPORT_CALIBRATION => (0, self.blobs.calibration.clone()),
            DS_FEATURE_REPORT_PAIRING_INFO => {
                let address = self.lock_state().hardware_address;
                (0, self.blobs.pairing_info_for(&address))
            }
            DS_FEATURE_REPORT_FIRMWARE_INFO => (0, self.blobs.firmware_info.clone()),
            other => {
                warn!("Unsupported feature report 0x{:02X}", other);
                (EINVAL, Vec::new())
            }
        };

        if let Err(e) = self.transport.send_get_report_reply(id, err, &data) {
            warn!("Failed to reply to GET_REPORT id={}: {}", id, e);
        }
    }

    // No writable feature reports are emulated
    fn handle_set_report(&self, id: u32, report_number: u8) {
        debug!(
            "Rejecting SET_REPORT id={} report=0x{:02X}",
            id, report_number
        );

        if let Err(e) = self.transport.send_set_report_reply(id, EINVAL) {
            warn!("Failed to reply to SET_REPORT id={}: {}", id, e);
        }
    }

    fn handle_output(&self, data: &[u8]) {
        let commands = match decode_output_report(data) {
            Ok(Some(commands)) => commands,
            Ok(None) => {
                debug!(
                    "Ignoring output report 0x{:02X}",
                    data.first().copied().unwrap_or_default()
                );
                return;
            }
            Err(e) => {
                warn!("Dropping output report: {}", e);
                return;
            }
        };

        // Callbacks run without the lock held so they may call back into the joypad
        let (on_rumble, on_led) = {
            let state = self.lock_state();
            (state.on_rumble.clone(), state.on_led.clone())
        };

        if let (Some(rumble), Some(callback)) = (commands.rumble, on_rumble) {
            trace!("Rumble left={} right={}", rumble.left, rumble.right);
            callback(rumble.left, rumble.right);
        }

        if let (Some(lightbar), Some(callback)) = (commands.lightbar, on_led) {
            trace!(
                "Lightbar r={} g={} b={}",
                lightbar.red,
                lightbar.green,
                lightbar.blue
            );
            callback(lightbar.red, lightbar.green, lightbar.blue);
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ReportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dualsense::feature::{DS_CALIBRATION_INFO, DS_FIRMWARE_INFO};
    use crate::dualsense::protocol::*;
    use crate::transport::mocks::{RecordingTransport, Reply};
    use crate::transport::MockTransport;

    const ADDRESS: [u8; 6] = [0xA0, 0xB1, 0xC2, 0xD3, 0xE4, 0xF5];

    fn shared_state() -> Arc<Mutex<ReportState>> {
        Arc::new(Mutex::new(ReportState::new(
            ADDRESS,
            DS_VENDOR_ID,
            DS_PRODUCT_ID,
            DS_VERSION,
        )))
    }

    fn recording_handler() -> (KernelEventHandler, RecordingTransport, Arc<Mutex<ReportState>>) {
        let state = shared_state();
        let transport = RecordingTransport::new();
        let handler = KernelEventHandler::new(
            Arc::clone(&state),
            Arc::new(transport.clone()),
            FeatureBlobs::default(),
        );
        (handler, transport, state)
    }

    fn output_report() -> Vec<u8> {
        let mut data = vec![0u8; DS_OUTPUT_REPORT_USB_SIZE];
        data[0] = DS_OUTPUT_REPORT_USB;
        data
    }

    #[test]
    fn test_calibration_query_single_reply() {
        let mut transport = MockTransport::new();
        transport
            .expect_send_get_report_reply()
            .withf(|id, err, data| *id == 7 && *err == 0 && data == &DS_CALIBRATION_INFO[..])
            .times(1)
            .returning(|_, _, _| Ok(()));
        transport.expect_send_input().never();

        let handler = KernelEventHandler::new(shared_state(), Arc::new(transport), FeatureBlobs::default());
        handler.handle(KernelEvent::GetReport {
            id: 7,
            report_number: DS_FEATURE_REPORT_CALIBRATION,
        });
    }

    #[test]
    fn test_firmware_query() {
        let (handler, transport, _) = recording_handler();
        handler.handle(KernelEvent::GetReport {
            id: 3,
            report_number: DS_FEATURE_REPORT_FIRMWARE_INFO,
        });

        assert_eq!(
            transport.get_replies(),
            vec![Reply {
                id: 3,
                err: 0,
                data: DS_FIRMWARE_INFO.to_vec()
            }]
        );
    }

    #[test]
    fn test_pairing_query_reverses_address() {
        let (handler, transport, _) = recording_handler();
        handler.handle(KernelEvent::GetReport {
            id: 11,
            report_number: DS_FEATURE_REPORT_PAIRING_INFO,
        });

        let replies = transport.get_replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id, 11);
        assert_eq!(replies[0].err, 0);
        assert_eq!(replies[0].data[0], DS_FEATURE_REPORT_PAIRING_INFO);
        assert_eq!(&replies[0].data[1..7], &[0xF5, 0xE4, 0xD3, 0xC2, 0xB1, 0xA0]);
    }

    #[test]
    fn test_unknown_query_replies_einval() {
        let (handler, transport, _) = recording_handler();
        handler.handle(KernelEvent::GetReport {
            id: 42,
            report_number: 0x81,
        });

        assert_eq!(
            transport.get_replies(),
            vec![Reply {
                id: 42,
                err: EINVAL,
                data: Vec::new()
            }]
        );
    }

    #[test]
    fn test_reply_failure_is_not_fatal() {
        let (handler, transport, _) = recording_handler();
        transport.set_write_error(std::io::ErrorKind::BrokenPipe);

        handler.handle(KernelEvent::GetReport {
            id: 1,
            report_number: DS_FEATURE_REPORT_CALIBRATION,
        });
        assert!(transport.get_replies().is_empty());
    }

    #[test]
    fn test_rumble_callback() {
        let (handler, _, state) = recording_handler();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        state.lock().unwrap().on_rumble = Some(Arc::new(move |left: u16, right: u16| {
            sink.lock().unwrap().push((left, right));
        }));

        let mut data = output_report();
        data[1] = DS_OUTPUT_VALID_FLAG0_COMPATIBLE_VIBRATION;
        data[3] = 0;
        data[4] = 255;
        handler.handle(KernelEvent::Output { data });

        assert_eq!(*received.lock().unwrap(), vec![(0xFFFF, 0)]);
    }

    #[test]
    fn test_led_callback() {
        let (handler, _, state) = recording_handler();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        state.lock().unwrap().on_led = Some(Arc::new(move |r: u8, g: u8, b: u8| {
            sink.lock().unwrap().push((r, g, b));
        }));

        let mut data = output_report();
        data[2] = DS_OUTPUT_VALID_FLAG1_LIGHTBAR_CONTROL_ENABLE;
        data[45] = 255;
        data[46] = 128;
        data[47] = 0;
        handler.handle(KernelEvent::Output { data });

        assert_eq!(*received.lock().unwrap(), vec![(255, 128, 0)]);
    }

    #[test]
    fn test_output_without_callbacks_is_dropped() {
        let (handler, transport, _) = recording_handler();

        let mut data = output_report();
        data[1] = DS_OUTPUT_VALID_FLAG0_MOTOR;
        data[2] = DS_OUTPUT_VALID_FLAG1_LIGHTBAR_CONTROL_ENABLE;
        handler.handle(KernelEvent::Output { data });

        assert!(transport.get_inputs().is_empty());
        assert!(transport.get_replies().is_empty());
    }

    #[test]
    fn test_short_output_report_dropped() {
        let (handler, _, state) = recording_handler();
        let called = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&called);
        state.lock().unwrap().on_rumble = Some(Arc::new(move |_: u16, _: u16| {
            *flag.lock().unwrap() = true;
        }));

        handler.handle(KernelEvent::Output {
            data: vec![DS_OUTPUT_REPORT_USB, DS_OUTPUT_VALID_FLAG0_MOTOR, 0xFF, 0xFF],
        });

        assert!(!*called.lock().unwrap());
    }

    #[test]
    fn test_set_report_rejected_once() {
        let mut transport = MockTransport::new();
        transport
            .expect_send_set_report_reply()
            .withf(|id, err| *id == 5 && *err == EINVAL)
            .times(1)
            .returning(|_, _| Ok(()));
        transport.expect_send_get_report_reply().never();
        transport.expect_send_input().never();

        let handler = KernelEventHandler::new(shared_state(), Arc::new(transport), FeatureBlobs::default());
        handler.handle(KernelEvent::SetReport {
            id: 5,
            report_number: 0x80,
            data: vec![0x80, 0x01],
        });
    }

    #[test]
    fn test_set_report_reply_recorded() {
        let (handler, transport, _) = recording_handler();
        handler.handle(KernelEvent::SetReport {
            id: 9,
            report_number: DS_FEATURE_REPORT_CALIBRATION,
            data: vec![DS_FEATURE_REPORT_CALIBRATION],
        });

        assert_eq!(transport.get_set_replies(), vec![(9, EINVAL)]);
        assert!(transport.get_replies().is_empty());
    }

    #[test]
    fn test_set_report_reply_failure_is_not_fatal() {
        let (handler, transport, _) = recording_handler();
        transport.set_write_error(std::io::ErrorKind::BrokenPipe);

        handler.handle(KernelEvent::SetReport {
            id: 2,
            report_number: 0x80,
            data: Vec::new(),
        });
        assert!(transport.get_set_replies().is_empty());
    }

    #[test]
    fn test_lifecycle_events_ignored() {
        let mut transport = MockTransport::new();
        transport.expect_send_get_report_reply().never();
        transport.expect_send_set_report_reply().never();
        transport.expect_send_input().never();

        let handler = KernelEventHandler::new(shared_state(), Arc::new(transport), FeatureBlobs::default());
        handler.handle(KernelEvent::Start);
        handler.handle(KernelEvent::Open);
        handler.handle(KernelEvent::Close);
        handler.handle(KernelEvent::Stop);
    }
}
