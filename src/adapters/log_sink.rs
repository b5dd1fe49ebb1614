//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events
//! through the `log` facade, one line per event.  A storage or display
//! adapter would implement the same trait.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { devices } => {
                info!("START | devices={}", devices);
            }
            AppEvent::Cycle {
                reading: r,
                action: a,
                ..
            } => {
                info!(
                    "CYCLE | src={} | T={:.1}\u{00b0}C ext={:.1}\u{00b0}C RH={:.1}% \
                     CO2={:.0}ppm NH3={:.1}ppm P={:.1}Pa power={} | \
                     fan={:.0}% curtain={:.0}% inlet={:.0}% heaters={} nebulizers={}",
                    r.source_id,
                    r.temperature,
                    r.external_temperature,
                    r.humidity,
                    r.co2,
                    r.ammonia,
                    r.pressure,
                    if r.power_ok { "MAINS" } else { "BATTERY" },
                    a.fan_speed,
                    a.curtain_position,
                    a.inlet_position,
                    if a.heaters_on { "ON" } else { "OFF" },
                    if a.nebulizers_on { "ON" } else { "OFF" },
                );
            }
            AppEvent::ReadingRejected(e) => {
                warn!("READING | rejected: {}", e);
            }
            AppEvent::ImplausibleReading(e) => {
                warn!("READING | implausible: {}", e);
            }
            AppEvent::AlarmRaised(msg) => {
                error!("ALARM | {}", msg);
            }
            AppEvent::AlarmCleared => {
                info!("ALARM | cleared");
            }
            AppEvent::DeviceFault { device_id, reason } => {
                error!("FAULT | {} | {}", device_id, reason);
            }
            AppEvent::DeviceCommanded(s) => {
                info!("MANUAL | {} -> {:?} {:.1}%", s.device_id, s.state, s.value);
            }
            AppEvent::CommandRejected { device_id, error: e } => {
                warn!("MANUAL | {} rejected: {}", device_id, e);
            }
            AppEvent::LimitsUpdated(l) => {
                info!(
                    "LIMITS | T={:.1}..{:.1}\u{00b0}C RH={:.1}..{:.1}% CO2<={:.0}ppm \
                     NH3<={:.1}ppm P={:.1}Pa",
                    l.temp_min,
                    l.temp_max,
                    l.humidity_min,
                    l.humidity_max,
                    l.co2_max,
                    l.ammonia_max,
                    l.pressure_target,
                );
            }
        }
    }
}
