//! Network-connected splash-and-thermal gadget controller.
//!
//! The gadget drives a thermoelectric element and a splash pump over MQTT,
//! mirrors its state on an RGB LED, and falls back to a push-button mode
//! cycle when the broker is unreachable. The crate splits into:
//!
//! - [`hardware`]: motor, LED, and button traits plus the GPIO and simulated
//!   implementations
//! - [`actuator`]: the thermal/splash state machine and LED derivation
//! - [`command`]: the remote command vocabulary and dispatcher
//! - [`manual`]: the button-driven mode cycle
//! - [`transport`]: the broker link with its bounded reconnection cycle
//! - [`runtime`]: the control loop tying it all together

pub mod actuator;
pub mod command;
pub mod config;
pub mod credentials;
pub mod error;
pub mod hardware;
pub mod manual;
pub mod net;
pub mod observability;
pub mod runtime;
pub mod testing;
pub mod transport;

pub use error::{GadgetError, GadgetResult};
pub use transport::MqttTransport;
