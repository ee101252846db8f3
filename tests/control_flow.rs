//! End-to-end command flow: broker payload in, motor and LED writes out,
//! plus the button-driven manual cycle over the same actuator.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use vrgadget::actuator::{ActuatorStateMachine, ThermalState};
use vrgadget::command::CommandDispatcher;
use vrgadget::hardware::{drive, LedColor, MotorChannel};
use vrgadget::manual::ModeCycler;
use vrgadget::runtime::Context;
use vrgadget::testing::mocks::{MockButton, MockLed, MockLink, MockMotorDriver, MockNetwork};
use vrgadget::transport::MqttTransport;

const TOPIC: &str = "VRGadget/command";

struct Rig {
    transport: MqttTransport<MockLink>,
    link: MockLink,
    actuator: Arc<Mutex<ActuatorStateMachine>>,
    motor: MockMotorDriver,
    led: MockLed,
}

async fn connected_rig() -> Rig {
    let motor = MockMotorDriver::default();
    let led = MockLed::default();
    let actuator = Arc::new(Mutex::new(ActuatorStateMachine::new(
        Box::new(motor.clone()),
        Box::new(led.clone()),
    )));

    let link = MockLink::accepting();
    let mut transport = MqttTransport::new(
        link.clone(),
        TOPIC,
        Arc::new(MockNetwork { associated: true }),
    );
    transport.register_handler(Box::new(CommandDispatcher::with_actuator(actuator.clone())));
    transport.start().await.unwrap();

    Rig {
        transport,
        link,
        actuator,
        motor,
        led,
    }
}

#[tokio::test(start_paused = true)]
async fn inbound_payload_drives_the_actuator() {
    let mut rig = connected_rig().await;

    rig.link.queue_inbound(TOPIC, br#"{"data": "start_splash"}"#);
    rig.transport.service_tick().await;

    assert_eq!(rig.motor.last_write(MotorChannel::Splash), Some(drive::SPLASH_ON));
    assert_eq!(rig.led.last(), Some(LedColor::Green));
}

#[tokio::test(start_paused = true)]
async fn bad_payloads_never_reach_the_actuator() {
    let mut rig = connected_rig().await;
    let writes_before = rig.motor.writes().len();

    rig.link.queue_inbound(TOPIC, b"{}");
    rig.link.queue_inbound(TOPIC, br#"{"data": ""}"#);
    rig.link.queue_inbound(TOPIC, b"not json");
    rig.link.queue_inbound(TOPIC, br#"{"data": "press_any_key"}"#);
    rig.transport.service_tick().await;

    assert_eq!(rig.motor.writes().len(), writes_before);
    assert!(rig.transport.is_connected(), "bad payloads never drop the session");
}

#[tokio::test(start_paused = true)]
async fn remote_sequence_composes_states() {
    let mut rig = connected_rig().await;

    rig.link.queue_inbound(TOPIC, br#"{"data": "start_heating"}"#);
    rig.link.queue_inbound(TOPIC, br#"{"data": "start_splash"}"#);
    rig.transport.service_tick().await;

    let actuator = rig.actuator.lock().unwrap();
    assert_eq!(actuator.thermal(), ThermalState::Heating);
    assert!(actuator.is_splashing());
    drop(actuator);
    assert_eq!(rig.led.last(), Some(LedColor::Yellow));
}

#[tokio::test(start_paused = true)]
async fn button_press_cycles_over_remote_state() {
    let rig = connected_rig().await;
    let button = MockButton::default();
    let mut context = Context::new(
        rig.transport,
        ModeCycler::new(rig.actuator.clone()),
        Box::new(button.clone()),
        Duration::from_millis(100),
    );

    // Remote heating arrives, then a button press forces the manual cycle.
    rig.link.queue_inbound(TOPIC, br#"{"data": "start_heating"}"#);
    context.tick().await;
    assert_eq!(rig.motor.last_write(MotorChannel::Peltier), Some(drive::HEATING));

    button.press();
    context.tick().await;

    // First press lands on Cooling regardless of what remote commands set.
    let actuator = rig.actuator.lock().unwrap();
    assert_eq!(actuator.thermal(), ThermalState::Cooling);
    assert!(!actuator.is_splashing());
    drop(actuator);
    assert_eq!(rig.led.last(), Some(LedColor::Blue));
}

#[tokio::test(start_paused = true)]
async fn full_manual_cycle_returns_to_stop() {
    let rig = connected_rig().await;
    let button = MockButton::default();
    let mut context = Context::new(
        rig.transport,
        ModeCycler::new(rig.actuator.clone()),
        Box::new(button.clone()),
        Duration::from_millis(100),
    );

    for _ in 0..4 {
        button.press();
        context.tick().await;
    }

    let actuator = rig.actuator.lock().unwrap();
    assert_eq!(actuator.thermal(), ThermalState::Idle);
    assert!(!actuator.is_splashing());
    drop(actuator);
    assert_eq!(rig.motor.last_write(MotorChannel::Peltier), Some(drive::STOP));
    assert_eq!(rig.motor.last_write(MotorChannel::Splash), Some(drive::STOP));
    assert_eq!(rig.led.last(), Some(LedColor::Off));
}
