//! Actuator and display drivers, hardware initialisation, and the DHT22
//! bit-bang reader.

pub mod alert;
pub mod dht22;
pub mod fan;
pub mod hw_init;
pub mod oled;
pub mod watchdog;
