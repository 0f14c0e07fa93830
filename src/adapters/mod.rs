//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to               |
//! |----------------|--------------------|---------------------------|
//! | `hardware`     | SensorPort         | ESP32 ADC, DHT22          |
//! |                | ActuatorPort       | LEDC fan PWM, alert GPIO  |
//! | `log_sink`     | EventSink          | Serial log output         |
//! | `time`         | (clock)            | ESP32 system timer        |
//! | `wifi`         | ConnectivityPort   | ESP-IDF Wi-Fi STA         |
//! | `ws_transport` | LinkTransport      | ESP-IDF WebSocket client  |

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod wifi;
#[cfg(target_os = "espidf")]
pub mod ws_transport;
