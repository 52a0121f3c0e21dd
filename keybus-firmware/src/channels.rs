//! Inter-task communication
//!
//! The two byte queues bridging the bus task and the console tasks live
//! here, together with the gateway they feed. The queue halves are
//! lock-free SPSC; only the gateway itself sits behind a mutex because
//! both console tasks use it.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;

use keybus_core::gateway::ChannelGateway;
use keybus_core::queue::ByteQueue;

/// Keypad responses: bus task -> console
pub static INBOUND_QUEUE: StaticCell<ByteQueue> = StaticCell::new();

/// Reserved command path: console -> bus task
pub static OUTBOUND_QUEUE: StaticCell<ByteQueue> = StaticCell::new();

/// The console's gateway, shared by the RX and TX tasks
pub type GatewayMutex = Mutex<CriticalSectionRawMutex, ChannelGateway<'static>>;

pub static GATEWAY: StaticCell<GatewayMutex> = StaticCell::new();
