//! # UHID Transport
//!
//! Virtual HID device backed by the Linux `/dev/uhid` character device.
//!
//! The device node is opened non-blocking. A worker thread polls it for
//! kernel events and hands each one to a callback; input reports and
//! `GET_REPORT` replies are written from any thread through the same
//! mutex-guarded handle.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace, warn};
use uhid_virt::{CreateParams, OutputEvent, StreamError, UHIDDevice};

use super::{KernelEvent, Transport};
use crate::error::{DualSenseError, Result};

/// Write half of a uhid device, shared with the worker thread
pub struct UhidTransport {
    device: Mutex<Option<UHIDDevice<File>>>,
}

impl std::fmt::Debug for UhidTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UhidTransport").finish_non_exhaustive()
    }
}

impl UhidTransport {
    fn lock(&self) -> MutexGuard<'_, Option<UHIDDevice<File>>> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_device<T>(
        &self,
        f: impl FnOnce(&mut UHIDDevice<File>) -> io::Result<T>,
    ) -> io::Result<T> {
        match self.lock().as_mut() {
            Some(device) => f(device),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "uhid device already destroyed",
            )),
        }
    }

    /// Poll one event; `Ok(None)` when nothing is pending
    fn read_event(&self) -> io::Result<Option<KernelEvent>> {
        let event = match self.lock().as_mut() {
            Some(device) => device.read(),
            None => return Ok(None),
        };

        match event {
            Ok(event) => Ok(Some(convert_event(event))),
            Err(StreamError::Io(e)) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(StreamError::Io(e)) => Err(e),
            Err(StreamError::UnknownEventType(kind)) => {
                debug!("Unknown uhid event type: {}", kind);
                Ok(None)
            }
        }
    }

    /// Send UHID_DESTROY; later writes fail with `NotConnected`
    fn destroy(&self) {
        if let Some(mut device) = self.lock().take() {
            if let Err(e) = device.destroy() {
                warn!("Failed to destroy uhid device: {}", e);
            }
        }
    }
}

impl Transport for UhidTransport {
    fn send_input(&self, report: &[u8]) -> io::Result<()> {
        self.with_device(|device| device.write(report))?;
        trace!("Sent input report ({} bytes)", report.len());
        Ok(())
    }

    fn send_get_report_reply(&self, id: u32, err: u16, data: &[u8]) -> io::Result<()> {
        self.with_device(|device| device.write_get_report_reply(id, err, data.to_vec()))?;
        Ok(())
    }

    fn send_set_report_reply(&self, id: u32, err: u16) -> io::Result<()> {
        self.with_device(|device| device.write_set_report_reply(id, err))?;
        Ok(())
    }
}

fn convert_event(event: OutputEvent) -> KernelEvent {
    match event {
        OutputEvent::Start { .. } => KernelEvent::Start,
        OutputEvent::Stop => KernelEvent::Stop,
        OutputEvent::Open => KernelEvent::Open,
        OutputEvent::Close => KernelEvent::Close,
        OutputEvent::Output { data } => KernelEvent::Output { data },
        OutputEvent::GetReport {
            id, report_number, ..
        } => KernelEvent::GetReport { id, report_number },
        OutputEvent::SetReport {
            id,
            report_number,
            data,
            ..
        } => KernelEvent::SetReport {
            id,
            report_number,
            data,
        },
    }
}

/// A created uhid device plus its event worker
///
/// Dropping it stops and joins the worker before destroying the device, so
/// no event callback runs after the drop returns.
pub struct UhidDevice {
    transport: Arc<UhidTransport>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for UhidDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UhidDevice")
            .field("running", &self.running.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl UhidDevice {
    /// Create a virtual HID device through the uhid node at `uhid_node`
    ///
    /// # Errors
    ///
    /// Returns `DeviceCreation` if the node cannot be opened or the kernel
    /// rejects the create request.
    pub fn create(params: CreateParams, uhid_node: &Path) -> Result<Self> {
        let name = params.name.clone();
        let device = UHIDDevice::create_with_path(params, uhid_node).map_err(|e| {
            DualSenseError::DeviceCreation(format!(
                "Failed to create '{}' via {}: {}",
                name,
                uhid_node.display(),
                e
            ))
        })?;
        debug!("Created uhid device '{}' via {}", name, uhid_node.display());

        Ok(Self {
            transport: Arc::new(UhidTransport {
                device: Mutex::new(Some(device)),
            }),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    /// Shared write handle
    pub fn transport(&self) -> Arc<UhidTransport> {
        Arc::clone(&self.transport)
    }

    /// Start the worker thread delivering kernel events to `on_event`
    ///
    /// Calling this twice has no effect.
    pub fn spawn_worker<F>(&mut self, poll_interval: Duration, mut on_event: F) -> Result<()>
    where
        F: FnMut(KernelEvent) + Send + 'static,
    {
        if self.worker.is_some() {
            return Ok(());
        }

        let transport = Arc::clone(&self.transport);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Release);

        let worker = thread::Builder::new()
            .name("uhid-events".to_string())
            .spawn(move || {
                while running.load(Ordering::Acquire) {
                    match transport.read_event() {
                        Ok(Some(event)) => on_event(event),
                        Ok(None) => thread::sleep(poll_interval),
                        Err(e) => {
                            warn!("Failed to read uhid event: {}", e);
                            thread::sleep(poll_interval);
                        }
                    }
                }
                debug!("uhid event worker stopped");
            })?;

        self.worker = Some(worker);
        Ok(())
    }

    /// Stop the worker and destroy the device
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("uhid event worker panicked");
            }
        }
        self.transport.destroy();
    }
}

impl Drop for UhidDevice {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uhid_virt::Bus;

    fn test_params() -> CreateParams {
        CreateParams {
            name: "Test uhid device".to_string(),
            phys: String::new(),
            uniq: String::new(),
            bus: Bus::USB,
            vendor: 0x054C,
            product: 0x0CE6,
            version: 0x8111,
            country: 0,
            rd_data: crate::dualsense::descriptor::DS_USB_DESCRIPTOR.to_vec(),
        }
    }

    #[test]
    fn test_convert_event() {
        let event = convert_event(OutputEvent::Output {
            data: vec![0x02, 0x01],
        });
        assert_eq!(event, KernelEvent::Output { data: vec![0x02, 0x01] });
        assert_eq!(convert_event(OutputEvent::Stop), KernelEvent::Stop);
        assert_eq!(convert_event(OutputEvent::Open), KernelEvent::Open);
        assert_eq!(convert_event(OutputEvent::Close), KernelEvent::Close);
    }

    #[test]
    fn test_destroyed_transport_rejects_writes() {
        let transport = UhidTransport {
            device: Mutex::new(None),
        };

        transport.destroy();
        transport.destroy();

        let err = transport.send_input(&[0x01]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        let err = transport.send_get_report_reply(1, 0, &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        let err = transport.send_set_report_reply(1, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert!(transport.read_event().unwrap().is_none());
    }

    #[test]
    fn test_create_with_missing_node_fails() {
        let result = UhidDevice::create(test_params(), Path::new("/nonexistent/uhid"));

        match result {
            Err(DualSenseError::DeviceCreation(msg)) => {
                assert!(msg.contains("/nonexistent/uhid"));
                assert!(msg.contains("Test uhid device"));
            }
            other => panic!("Expected DeviceCreation error, got: {:?}", other),
        }
    }

    // Requires write access to /dev/uhid
    #[test]
    #[ignore]
    fn test_create_with_real_uhid() {
        let mut device = UhidDevice::create(test_params(), Path::new("/dev/uhid"))
            .expect("uhid not available");

        let (tx, rx) = std::sync::mpsc::channel();
        device
            .spawn_worker(Duration::from_millis(5), move |event| {
                let _ = tx.send(event);
            })
            .unwrap();

        let first = rx.recv_timeout(Duration::from_secs(2)).expect("No uhid event");
        assert_eq!(first, KernelEvent::Start);
        device.stop();
    }
}
