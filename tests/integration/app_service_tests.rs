//! Integration tests for the SensorPort → AppService → fleet pipeline.
//!
//! These verify the full cycle from a sensor snapshot down to actuator
//! statuses and emitted events, plus the manual command paths.

use super::mock_hw::{MockSensors, RecordingSink, nominal, with_temperature};

use aviary_control::actuators::{DeviceCommand, DeviceState};
use aviary_control::app::commands::AppCommand;
use aviary_control::app::events::AppEvent;
use aviary_control::app::service::AppService;
use aviary_control::config::{Limits, SystemConfig};
use aviary_control::error::{ActuatorError, Error, ReadingError};
use aviary_control::sensors::Conditions;

fn make_app() -> (AppService, RecordingSink) {
    let mut app = AppService::new(SystemConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, sink)
}

#[test]
fn start_announces_fleet() {
    let (_app, sink) = make_app();
    assert!(matches!(sink.events[0], AppEvent::Started { devices: 16 }));
}

// ── Cycle ─────────────────────────────────────────────────────

#[test]
fn hot_cycle_drives_ventilation() {
    let (mut app, mut sink) = make_app();
    let mut sensors = MockSensors::steady(with_temperature(35.0));

    app.cycle(&mut sensors, &mut sink).unwrap();

    assert_eq!(app.cycle_count(), 1);
    let action = app.last_action().unwrap();
    assert_eq!(action.fan_speed, 100.0);
    assert_eq!(action.curtain_position, 100.0);
    assert_eq!(action.inlet_position, 100.0);

    let fan = app.device_status("FAN004").unwrap();
    assert_eq!((fan.state, fan.value), (DeviceState::Partial, 100.0));
    assert_eq!(app.history().len(), 1);
    assert_eq!(app.history().latest().unwrap().source_id, "SENS01");

    let Some(AppEvent::Cycle { statuses, .. }) = sink.events.last() else {
        panic!("last event should be the cycle summary");
    };
    assert_eq!(statuses.len(), 16);
}

#[test]
fn incomplete_snapshot_leaves_devices_untouched() {
    let (mut app, mut sink) = make_app();
    let mut sensors = MockSensors::steady(with_temperature(35.0));
    app.cycle(&mut sensors, &mut sink).unwrap();
    let before = app.device_statuses();

    let broken = Conditions {
        ammonia: None,
        ..with_temperature(10.0)
    };
    sensors.push(broken);
    let err = app.cycle(&mut sensors, &mut sink).unwrap_err();

    assert_eq!(err, Error::Reading(ReadingError::Incomplete("ammonia")));
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::ReadingRejected(ReadingError::Incomplete("ammonia")))
    ));
    assert_eq!(app.device_statuses(), before);
    assert_eq!(app.cycle_count(), 1);
    assert_eq!(app.history().len(), 1);
}

#[test]
fn implausible_reading_flagged_but_processed() {
    let (mut app, mut sink) = make_app();
    let mut sensors = MockSensors::steady(Conditions {
        pressure: Some(-500.0),
        ..with_temperature(1000.0)
    });

    app.cycle(&mut sensors, &mut sink).unwrap();

    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::ImplausibleReading(ReadingError::Implausible {
            field: "temperature",
            ..
        })
    )));
    let action = app.last_action().unwrap();
    for v in [action.fan_speed, action.curtain_position, action.inlet_position] {
        assert!((0.0..=100.0).contains(&v));
    }
    assert_eq!(sink.cycles(), 1);
}

// ── Alarms ────────────────────────────────────────────────────

#[test]
fn alarm_raised_once_and_cleared_on_recovery() {
    let (mut app, mut sink) = make_app();
    let mut sensors = MockSensors::new([
        with_temperature(38.0),
        with_temperature(38.0),
        nominal(),
    ]);

    for _ in 0..3 {
        app.cycle(&mut sensors, &mut sink).unwrap();
    }

    assert_eq!(sink.alarms_raised(), vec!["Critical high temperature: 38.0°C"]);
    assert_eq!(sink.alarms_cleared(), 1);
    assert!(app.active_alarm().is_none());
    assert_eq!(app.device_status("ALM001").unwrap().state, DeviceState::Off);
}

#[test]
fn changed_alarm_text_raised_again() {
    let (mut app, mut sink) = make_app();
    let co2 = Conditions {
        co2: Some(2500.0),
        ..nominal()
    };
    let both = Conditions {
        ammonia: Some(30.0),
        ..co2.clone()
    };
    let mut sensors = MockSensors::new([co2, both]);

    app.cycle(&mut sensors, &mut sink).unwrap();
    app.cycle(&mut sensors, &mut sink).unwrap();

    assert_eq!(
        sink.alarms_raised(),
        vec!["High CO2 level: 2500.0 ppm", "High ammonia level: 30.0 ppm"]
    );
    assert_eq!(app.active_alarm(), Some("High ammonia level: 30.0 ppm"));
}

#[test]
fn power_failure_scenario() {
    let (mut app, mut sink) = make_app();
    let mut sensors = MockSensors::steady(Conditions {
        power_ok: Some(false),
        humidity: Some(40.0),
        ..nominal()
    });

    app.cycle(&mut sensors, &mut sink).unwrap();

    let action = app.last_action().unwrap();
    assert!(!action.nebulizers_on);
    assert!(!action.heaters_on);
    assert_eq!(sink.alarms_raised(), vec!["ALERT: System running on battery!"]);
    assert_eq!(app.device_status("NEB002").unwrap().state, DeviceState::Off);
    let alarm = app.device_status("ALM002").unwrap();
    assert_eq!(alarm.message.as_deref(), Some("ALERT: System running on battery!"));
}

#[test]
fn operator_clears_alarms() {
    let (mut app, mut sink) = make_app();
    let mut sensors = MockSensors::steady(with_temperature(10.0));
    app.cycle(&mut sensors, &mut sink).unwrap();
    assert_eq!(app.active_alarm(), Some("Critical low temperature: 10.0°C"));

    app.handle_command(AppCommand::ClearAlarms, &mut sink).unwrap();

    assert!(app.active_alarm().is_none());
    assert_eq!(sink.alarms_cleared(), 1);
    let alarm = app.device_status("ALM001").unwrap();
    assert_eq!(alarm.state, DeviceState::Off);
    assert!(alarm.message.is_none());
}

// ── Manual commands ───────────────────────────────────────────

#[test]
fn manual_device_command_applies_until_next_cycle() {
    let (mut app, mut sink) = make_app();
    app.handle_command(
        AppCommand::Device {
            id: "CUR001".to_owned(),
            command: DeviceCommand::Set(20.0),
        },
        &mut sink,
    )
    .unwrap();

    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::DeviceCommanded(s)) if s.device_id == "CUR001" && s.value == 20.0
    ));
    assert_eq!(app.device_status("CUR002").unwrap().value, 0.0);

    let mut sensors = MockSensors::steady(nominal());
    app.cycle(&mut sensors, &mut sink).unwrap();
    assert_eq!(app.device_status("CUR001").unwrap().value, 50.0);
}

#[test]
fn invalid_manual_commands_rejected() {
    let (mut app, mut sink) = make_app();

    let err = app
        .handle_command(
            AppCommand::Device {
                id: "NEB001".to_owned(),
                command: DeviceCommand::Set(30.0),
            },
            &mut sink,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Actuator(ActuatorError::InvalidCommand { .. })
    ));
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::CommandRejected { device_id, .. }) if device_id == "NEB001"
    ));

    let err = app
        .handle_command(
            AppCommand::Device {
                id: "INL001".to_owned(),
                command: DeviceCommand::Set(101.0),
            },
            &mut sink,
        )
        .unwrap_err();
    assert_eq!(err, Error::Actuator(ActuatorError::OutOfRange { value: 101.0 }));
    assert_eq!(app.device_status("INL001").unwrap().state, DeviceState::Off);

    let err = app
        .handle_command(
            AppCommand::Device {
                id: "PUMP01".to_owned(),
                command: DeviceCommand::On,
            },
            &mut sink,
        )
        .unwrap_err();
    assert_eq!(
        err,
        Error::Actuator(ActuatorError::UnknownDevice("PUMP01".to_owned()))
    );
}

#[test]
fn reported_fault_raises_alarm_and_recovers_next_cycle() {
    let (mut app, mut sink) = make_app();
    app.handle_command(
        AppCommand::ReportFault {
            id: "FAN002".to_owned(),
            reason: "no acknowledgement".to_owned(),
        },
        &mut sink,
    )
    .unwrap();

    let fan = app.device_status("FAN002").unwrap();
    assert_eq!(fan.state, DeviceState::Error);
    assert_eq!(fan.error_message.as_deref(), Some("no acknowledgement"));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::DeviceFault { device_id, .. } if device_id == "FAN002"
    )));
    assert_eq!(
        sink.alarms_raised(),
        vec!["Device fault FAN002: no acknowledgement"]
    );

    let mut sensors = MockSensors::steady(with_temperature(35.0));
    app.cycle(&mut sensors, &mut sink).unwrap();
    let fan = app.device_status("FAN002").unwrap();
    assert_eq!((fan.state, fan.value), (DeviceState::Partial, 100.0));
    assert!(fan.error_message.is_none());
}

// ── Limits ────────────────────────────────────────────────────

#[test]
fn limits_update_takes_effect_and_keeps_history() {
    let (mut app, mut sink) = make_app();
    let mut sensors = MockSensors::steady(with_temperature(30.0));
    app.cycle(&mut sensors, &mut sink).unwrap();
    assert_eq!(app.last_action().unwrap().fan_speed, 0.0);

    let tighter = Limits {
        temp_max: 28.0,
        ..Limits::default()
    };
    app.handle_command(AppCommand::UpdateLimits(tighter), &mut sink)
        .unwrap();
    assert!(matches!(sink.events.last(), Some(AppEvent::LimitsUpdated(l)) if l.temp_max == 28.0));
    assert_eq!(app.config().limits, tighter);

    app.cycle(&mut sensors, &mut sink).unwrap();
    assert_eq!(app.last_action().unwrap().fan_speed, 100.0);
    assert_eq!(app.history().len(), 2);
    assert_eq!(app.cycle_count(), 2);
}

#[test]
fn history_is_bounded() {
    let mut app: AppService<4> = AppService::new(SystemConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    let mut sensors = MockSensors::new((0..10).map(|i| with_temperature(20.0 + f64::from(i))));

    for _ in 0..10 {
        app.cycle(&mut sensors, &mut sink).unwrap();
    }

    assert_eq!(app.history().len(), 4);
    let temps: Vec<f64> = app.history().iter().map(|r| r.temperature).collect();
    assert_eq!(temps, vec![26.0, 27.0, 28.0, 29.0]);
    assert_eq!(sensors.reads, 10);
}
