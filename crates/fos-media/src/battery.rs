//! Battery Status API
//!
//! `navigator.getBattery()`.

use std::time::Duration;

use crate::MediaError;

/// Future returned by [`BatteryStatus::get_battery`]
pub type BatteryFuture = smol::future::Boxed<Result<BatteryManager, MediaError>>;

/// Battery status
#[derive(Debug, Clone)]
pub struct BatteryManager {
    pub charging: bool,
    pub charging_time: Duration,
    pub discharging_time: Duration,
    pub level: f64,
}

impl Default for BatteryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryManager {
    /// A full battery on external power
    pub fn new() -> Self {
        Self {
            charging: true,
            charging_time: Duration::ZERO,
            discharging_time: Duration::MAX,
            level: 1.0,
        }
    }

    /// A battery running the device
    pub fn discharging(level: f64) -> Self {
        Self {
            charging: false,
            charging_time: Duration::MAX,
            discharging_time: Duration::MAX,
            level: level.clamp(0.0, 1.0),
        }
    }

    /// Get charging status
    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Get level (0.0 to 1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Get level as percentage
    pub fn level_percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    /// Read the first system battery
    #[cfg(target_os = "linux")]
    pub fn from_system() -> Result<Self, MediaError> {
        const BAT0: &str = "/sys/class/power_supply/BAT0";

        let status = std::fs::read_to_string(format!("{BAT0}/status"))
            .map_err(|e| MediaError::Battery(format!("{BAT0}: {e}")))?;
        // "Charging", "Full" and "Not charging" all mean external power
        let charging = status.trim() != "Discharging";

        let mut battery = if charging { Self::new() } else { Self::discharging(1.0) };
        if let Ok(capacity) = std::fs::read_to_string(format!("{BAT0}/capacity")) {
            if let Ok(level) = capacity.trim().parse::<u8>() {
                battery.level = level.min(100) as f64 / 100.0;
            }
        }
        Ok(battery)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn from_system() -> Result<Self, MediaError> {
        Err(MediaError::Battery("no battery information on this platform".to_string()))
    }
}

/// Battery status capability (`navigator.getBattery`)
pub trait BatteryStatus: Send + Sync {
    fn get_battery(&self) -> BatteryFuture;
}

/// A fixed reading, for embedders that track power state themselves
impl BatteryStatus for BatteryManager {
    fn get_battery(&self) -> BatteryFuture {
        let battery = self.clone();
        Box::pin(async move { Ok(battery) })
    }
}

/// Battery status read from the operating system on every query
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBattery;

impl BatteryStatus for SystemBattery {
    fn get_battery(&self) -> BatteryFuture {
        Box::pin(async move {
            let battery = BatteryManager::from_system()?;
            tracing::debug!("Battery: charging={} level={}%", battery.charging, battery.level_percent());
            Ok::<_, MediaError>(battery)
        })
    }
}
