//! WiFi station-mode bring-up.
//!
//! Link establishment is the platform's job; this module validates the
//! build-time credentials and, on ESP-IDF, blocks until the station has
//! an IP.  Reconnection after a drop is left to the driver's own retry.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: credential validation only.

use core::fmt;

use heapless::String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl core::error::Error for WifiError {}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Validated station credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: String<32>,
    password: String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, WifiError> {
        if ssid.is_empty() || !is_printable_ascii(ssid) {
            return Err(WifiError::InvalidSsid);
        }
        if !password.is_empty() && password.len() < 8 {
            return Err(WifiError::InvalidPassword);
        }
        let mut out = Self { ssid: String::new(), password: String::new() };
        out.ssid.push_str(ssid).map_err(|()| WifiError::InvalidSsid)?;
        out.password.push_str(password).map_err(|()| WifiError::InvalidPassword)?;
        Ok(out)
    }

    /// Credentials baked in through `WIFI_SSID` / `WIFI_PASS`.
    pub fn from_build_env() -> Result<Self, WifiError> {
        let ssid = option_env!("WIFI_SSID").ok_or(WifiError::NoCredentials)?;
        Self::new(ssid, option_env!("WIFI_PASS").unwrap_or(""))
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

#[cfg(target_os = "espidf")]
pub use esp::connect;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::info;

    use super::{WifiCredentials, WifiError};

    /// Start the station and block until it has an address.
    pub fn connect(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        creds: &WifiCredentials,
    ) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
        let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;

        let config = ClientConfiguration {
            ssid: creds.ssid().try_into().map_err(|()| WifiError::InvalidSsid)?,
            password: creds.password.as_str().try_into().map_err(|()| WifiError::InvalidPassword)?,
            auth_method: if creds.is_open() { AuthMethod::None } else { AuthMethod::WPA2Personal },
            ..Default::default()
        };
        wifi.set_configuration(&Configuration::Client(config))?;

        info!("WiFi: connecting to '{}'", creds.ssid());
        wifi.start()?;
        wifi.connect().map_err(|_| WifiError::ConnectionFailed)?;
        wifi.wait_netif_up()?;
        info!("WiFi: connected");
        Ok(wifi)
    }
}
