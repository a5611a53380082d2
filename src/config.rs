use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::model::HumanProbe;
use crate::planner::{MAX_PIXELS_PER_CM, MIN_PIXELS_PER_CM, PlannerSettings};

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            planner: PlannerConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "ROOM_PLANNER_API_HOST";
    const PORT_VAR: &'static str = "ROOM_PLANNER_API_PORT";

    fn from_env() -> Self {
        Self::from_values(env_string(Self::HOST_VAR), env_string(Self::PORT_VAR))
    }

    fn from_values(host: Option<String>, port: Option<String>) -> Self {
        let host_value = host.unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, effective_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match port {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    eprintln!(
                        "⚠️ {} must not be 0. Using {}.",
                        Self::PORT_VAR,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    eprintln!(
                        "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                        Self::PORT_VAR,
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host: effective_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    /// Checks whether the hostname matches the default value.
    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

/// Start-up settings of the shared planner.
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    settings: PlannerSettings,
}

impl PlannerConfig {
    const ROOM_WIDTH_VAR: &'static str = "ROOM_PLANNER_ROOM_WIDTH_CM";
    const ROOM_LENGTH_VAR: &'static str = "ROOM_PLANNER_ROOM_LENGTH_CM";
    const SNAP_EPSILON_VAR: &'static str = "ROOM_PLANNER_SNAP_EPSILON_CM";
    const HISTORY_LIMIT_VAR: &'static str = "ROOM_PLANNER_HISTORY_LIMIT";
    const HUMAN_RADIUS_VAR: &'static str = "ROOM_PLANNER_HUMAN_RADIUS_CM";
    const PIXELS_PER_CM_VAR: &'static str = "ROOM_PLANNER_PIXELS_PER_CM";
    const SEED_SAMPLE_VAR: &'static str = "ROOM_PLANNER_SEED_SAMPLE";

    fn from_env() -> Self {
        let defaults = PlannerSettings::default();

        let room_width = load_f64_with_warning(
            Self::ROOM_WIDTH_VAR,
            defaults.room_width_cm,
            |value| value >= 1.0,
            "must be at least 1 cm",
            "Note: Custom room width",
        );

        let room_length = load_f64_with_warning(
            Self::ROOM_LENGTH_VAR,
            defaults.room_length_cm,
            |value| value >= 1.0,
            "must be at least 1 cm",
            "Note: Custom room length",
        );

        let snap_epsilon = load_f64_with_warning(
            Self::SNAP_EPSILON_VAR,
            defaults.snap_epsilon_cm,
            |value| value >= 0.0,
            "must not be negative",
            "Warning: Adjusted snap distance changes how eagerly items stick to walls",
        );

        let human_radius = load_f64_with_warning(
            Self::HUMAN_RADIUS_VAR,
            defaults.human_radius_cm,
            |value| value >= HumanProbe::MIN_RADIUS_CM,
            "must be at least 1 cm",
            "Warning: Adjusted human radius changes clearance checks",
        );

        let pixels_per_cm = load_f64_with_warning(
            Self::PIXELS_PER_CM_VAR,
            defaults.pixels_per_cm,
            |value| (MIN_PIXELS_PER_CM..=MAX_PIXELS_PER_CM).contains(&value),
            "must be between 0.1 and 10",
            "Note: Custom zoom",
        );

        let history_limit = match env_string(Self::HISTORY_LIMIT_VAR) {
            Some(raw) => parse_history_limit(&raw).unwrap_or(defaults.history_limit),
            None => defaults.history_limit,
        };

        let seed_sample = env_string(Self::SEED_SAMPLE_VAR)
            .and_then(|raw| parse_bool(&raw, Self::SEED_SAMPLE_VAR))
            .unwrap_or(defaults.seed_sample);

        let settings = PlannerSettings::builder()
            .room(room_width, room_length)
            .snap_epsilon(snap_epsilon)
            .history_limit(history_limit)
            .human_radius(human_radius)
            .pixels_per_cm(pixels_per_cm)
            .seed_sample(seed_sample)
            .build();

        Self { settings }
    }

    /// Returns the configured PlannerSettings.
    pub fn settings(&self) -> PlannerSettings {
        self.settings
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            eprintln!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn parse_history_limit(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => {
            eprintln!(
                "⚠️ {} must be at least 1. Using default value.",
                PlannerConfig::HISTORY_LIMIT_VAR
            );
            None
        }
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!(
                "⚠️ Could not parse {} ('{}'): {}. Using default value.",
                PlannerConfig::HISTORY_LIMIT_VAR,
                raw,
                err
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    match env_string(var_name) {
        Some(raw) => parse_f64_with_warning(var_name, &raw, default, validator, invalid_hint, warning),
        None => default,
    }
}

fn parse_f64_with_warning(
    var_name: &str,
    raw: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if !validator(value) {
                eprintln!(
                    "⚠️ {} contains invalid value '{}': {}. Using {}.",
                    var_name, raw, invalid_hint, default
                );
                default
            } else {
                let tolerance = (default.abs().max(1.0)) * 1e-9;
                if (value - default).abs() > tolerance {
                    println!("⚠️ {} ({} = {}).", warning, var_name, value);
                }
                value
            }
        }
        Ok(_) => {
            eprintln!(
                "⚠️ {} must be a finite number ('{}'). Using {}.",
                var_name, raw, default
            );
            default
        }
        Err(err) => {
            eprintln!(
                "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                var_name, raw, err, default
            );
            default
        }
    }
}
