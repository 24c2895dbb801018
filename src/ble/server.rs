//! GATT server for the sensor service.
//!
//! Registers the service and its four characteristics with the SoftDevice
//! and bridges the stack to [`SensorPeripheral`](ble_sensor::SensorPeripheral):
//!
//! - Readable characteristics use deferred reads, so the temperature is
//!   sampled when the peer asks for it. Characteristics without a read
//!   handler answer with their stored value.
//! - Writes are routed to the characteristic handler by value handle.
//! - Notifications go to the current connection only when the peer has
//!   enabled them in the CCCD; otherwise they are dropped silently.

use core::cell::RefCell;

use ble_sensor::config::SERVICE_UUID;
use ble_sensor::{BleError, CharacteristicId, Error, GattValues};
use defmt::{debug, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{
    self, CharacteristicHandles, DeferredReadReply, RegisterError, WriteOp,
};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

use crate::Peripheral;

/// Events surfaced from [`gatt_server::run`] for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ServerEvent {
    Read(CharacteristicId),
    Written(CharacteristicId),
    SwitchSubscription(bool),
}

struct Handles {
    temperature: CharacteristicHandles,
    switch: CharacteristicHandles,
    led: CharacteristicHandles,
    text: CharacteristicHandles,
}

impl Handles {
    fn get(&self, id: CharacteristicId) -> &CharacteristicHandles {
        match id {
            CharacteristicId::Temperature => &self.temperature,
            CharacteristicId::SwitchEvent => &self.switch,
            CharacteristicId::LedControl => &self.led,
            CharacteristicId::Text => &self.text,
        }
    }
}

/// The peer currently served, if any.
struct Link {
    conn: Option<Connection>,
    switch_subscribed: bool,
}

impl Link {
    const fn idle() -> Self {
        Self {
            conn: None,
            switch_subscribed: false,
        }
    }
}

pub struct SensorServer {
    sd: &'static Softdevice,
    peripheral: &'static Peripheral,
    handles: Handles,
    link: Mutex<CriticalSectionRawMutex, RefCell<Link>>,
}

impl SensorServer {
    /// Register the sensor service. The SoftDevice must not be running yet.
    pub fn new(sd: &'static mut Softdevice, peripheral: &'static Peripheral) -> Result<Self, Error> {
        let handles = register(sd)?;
        Ok(Self {
            sd,
            peripheral,
            handles,
            link: Mutex::new(RefCell::new(Link::idle())),
        })
    }

    pub fn softdevice(&self) -> &'static Softdevice {
        self.sd
    }

    /// Start serving `conn`. Notifications stay off until the peer
    /// subscribes.
    pub fn attach(&self, conn: &Connection) {
        self.link.lock(|link| {
            *link.borrow_mut() = Link {
                conn: Some(conn.clone()),
                switch_subscribed: false,
            }
        });
    }

    pub fn detach(&self) {
        self.link.lock(|link| *link.borrow_mut() = Link::idle());
    }

    fn characteristic(&self, handle: u16) -> Option<CharacteristicId> {
        CharacteristicId::ALL
            .into_iter()
            .find(|id| self.handles.get(*id).value_handle == handle)
    }
}

fn register(sd: &mut Softdevice) -> Result<Handles, Error> {
    let mut service = ServiceBuilder::new(sd, uuid(SERVICE_UUID)).map_err(register_failed)?;

    let temperature = add_characteristic(&mut service, CharacteristicId::Temperature)?;
    let switch = add_characteristic(&mut service, CharacteristicId::SwitchEvent)?;
    let led = add_characteristic(&mut service, CharacteristicId::LedControl)?;
    let text = add_characteristic(&mut service, CharacteristicId::Text)?;

    let _ = service.build();

    Ok(Handles {
        temperature,
        switch,
        led,
        text,
    })
}

fn add_characteristic(
    service: &mut ServiceBuilder<'_>,
    id: CharacteristicId,
) -> Result<CharacteristicHandles, Error> {
    let access = id.access();

    let mut props = Properties::default();
    if access.read {
        props = props.read();
    }
    if access.write {
        props = props.write();
    }
    if access.notify {
        props = props.notify();
    }

    let mut attr = Attribute::new(id.initial_value())
        .variable_len(id.max_len() as u16)
        .read_security(SecurityMode::Open)
        .write_security(SecurityMode::Open);
    if access.read {
        attr = attr.deferred_read();
    }

    let characteristic = service
        .add_characteristic(uuid(id.uuid()), attr, Metadata::new(props))
        .map_err(register_failed)?;
    Ok(characteristic.build())
}

fn uuid(value: u128) -> Uuid {
    Uuid::new_128(&value.to_le_bytes())
}

fn register_failed(_: RegisterError) -> Error {
    BleError::RegisterFailed.into()
}

impl gatt_server::Server for SensorServer {
    type Event = ServerEvent;

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        _offset: usize,
        data: &[u8],
    ) -> Option<ServerEvent> {
        if handle == self.handles.switch.cccd_handle {
            let enabled = data.first().is_some_and(|b| b & 0x01 != 0);
            self.link
                .lock(|link| link.borrow_mut().switch_subscribed = enabled);
            return Some(ServerEvent::SwitchSubscription(enabled));
        }

        let id = self.characteristic(handle)?;
        self.peripheral.on_write(id, data);
        Some(ServerEvent::Written(id))
    }

    fn on_deferred_read(
        &self,
        handle: u16,
        offset: usize,
        reply: DeferredReadReply,
    ) -> Option<ServerEvent> {
        let id = self.characteristic(handle);

        // Long reads come back with a non-zero offset; serve those from the
        // stored value so the peer sees one consistent snapshot.
        let value = match id {
            Some(id) if offset == 0 => self.peripheral.on_read(id),
            _ => None,
        };
        let result = match &value {
            Some(value) => reply.reply(Ok(Some(value.as_slice()))),
            None => reply.reply(Ok(None)),
        };
        if let Err(e) = result {
            warn!("deferred read reply failed: {}", e);
        }

        id.map(ServerEvent::Read)
    }
}

impl GattValues for SensorServer {
    fn set_value(&self, id: CharacteristicId, value: &[u8]) -> Result<(), Error> {
        gatt_server::set_value(self.sd, self.handles.get(id).value_handle, value)
            .map_err(|_| BleError::SetValueFailed.into())
    }

    fn notify(&self, id: CharacteristicId, value: &[u8]) -> Result<(), Error> {
        let conn = self.link.lock(|link| {
            let link = link.borrow();
            let subscribed = id != CharacteristicId::SwitchEvent || link.switch_subscribed;
            link.conn.clone().filter(|_| subscribed)
        });
        let Some(conn) = conn else {
            debug!("no subscriber for {}, notification dropped", id);
            return Ok(());
        };

        gatt_server::notify_value(&conn, self.handles.get(id).value_handle, value)
            .map_err(|_| BleError::NotifyFailed.into())
    }
}

/// Log one event surfaced by the GATT server loop.
pub fn log_event(event: ServerEvent) {
    match event {
        ServerEvent::Read(id) => debug!("read {}", id),
        ServerEvent::Written(id) => info!("write {}", id),
        ServerEvent::SwitchSubscription(enabled) => {
            info!("switch notifications enabled: {}", enabled)
        }
    }
}
