//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements         | Connects to                   |
//! |---------------|--------------------|-------------------------------|
//! | `serial`      | TransportProvider  | USB serial box controller     |
//! | `log_sink`    | EventSink          | Terminal log output           |
//! | `config_file` | ConfigPort         | Optional JSON config file     |
//! | `time`        | Clock              | `std::time::Instant`          |
//! | `replay`      | -                  | JSON-lines frame records      |

pub mod config_file;
pub mod log_sink;
pub mod replay;
#[cfg(feature = "serial")]
pub mod serial;
pub mod time;
