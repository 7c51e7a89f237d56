use astro_chart::aspects::{AspectSettings, AspectType};
use astro_chart::ephemeris::{Body, HouseSystem};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

const MAX_ORB: f64 = 15.0;

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub host: String,
    pub ephemeris_path: Option<PathBuf>,
    pub default_house_system: HouseSystem,
    pub bodies: Vec<Body>,
    pub aspect_settings: AspectSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            ephemeris_path: None,
            default_house_system: HouseSystem::default(),
            bodies: Body::DEFAULT_SET.to_vec(),
            aspect_settings: AspectSettings::default(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Replace the configured port with an externally supplied one
    pub fn apply_port_override(&mut self, value: Option<&str>) -> anyhow::Result<()> {
        if let Some(raw) = value {
            let port: u16 = raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a port number, got '{raw}': {e}"))?;
            self.port = port;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ServerToml {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default)]
    ephemeris_path: Option<PathBuf>,
    #[serde(default = "default_house_system")]
    default_house_system: String,
    #[serde(default)]
    bodies: Option<Vec<String>>,
    #[serde(default)]
    orbs: BTreeMap<String, f64>,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_house_system() -> String {
    "P".to_string()
}

/// Try `$CHART_CONFIG`, then the common relative paths for `configs/server.toml`.
pub fn read_server_toml_text() -> anyhow::Result<Option<String>> {
    if let Ok(explicit) = env::var("CHART_CONFIG") {
        let text = fs::read_to_string(&explicit)
            .map_err(|e| anyhow::anyhow!("Could not read CHART_CONFIG={explicit}: {e}"))?;
        return Ok(Some(text));
    }
    let paths = ["configs/server.toml", "../../configs/server.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            log::info!("Loaded server settings from {}", p);
            return Ok(Some(c));
        }
    }
    log::info!("No server.toml found in {:?}; using defaults", paths);
    Ok(None)
}

pub fn parse_server_settings(text: &str) -> anyhow::Result<ServerSettings> {
    let raw: ServerToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse server.toml: {e}"))?;
    let ServerToml {
        port,
        host,
        ephemeris_path,
        default_house_system,
        bodies,
        orbs,
    } = raw;

    let default_house_system: HouseSystem = default_house_system
        .parse()
        .map_err(|e| anyhow::anyhow!("default_house_system: {e} (expected one of {})", HouseSystem::valid_names().join(", ")))?;

    let bodies = match bodies {
        Some(ids) => {
            let mut parsed = Vec::with_capacity(ids.len());
            for id in &ids {
                let body: Body = id.parse().map_err(|e| anyhow::anyhow!("bodies: {e}"))?;
                if !parsed.contains(&body) {
                    parsed.push(body);
                }
            }
            if parsed.is_empty() {
                anyhow::bail!("bodies must name at least one body");
            }
            parsed.sort();
            parsed
        }
        None => Body::DEFAULT_SET.to_vec(),
    };

    let mut aspect_settings = AspectSettings::default();
    for (name, orb) in orbs {
        let aspect: AspectType = name.parse().map_err(|e| anyhow::anyhow!("orbs: {e}"))?;
        if !(orb > 0.0 && orb <= MAX_ORB) {
            anyhow::bail!("orbs.{name} must be in (0, {MAX_ORB}], got {orb}");
        }
        aspect_settings = aspect_settings.with_orb(aspect, orb);
    }

    Ok(ServerSettings {
        port,
        host,
        ephemeris_path,
        default_house_system,
        bodies,
        aspect_settings,
    })
}

/// Load settings from disk (or defaults) and apply the `PORT` override.
pub fn load_server_settings() -> anyhow::Result<ServerSettings> {
    let mut settings = match read_server_toml_text()? {
        Some(text) => parse_server_settings(&text)?,
        None => ServerSettings::default(),
    };
    settings.apply_port_override(env::var("PORT").ok().as_deref())?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = parse_server_settings("").unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.default_house_system, HouseSystem::Placidus);
        assert_eq!(settings.bodies, Body::DEFAULT_SET.to_vec());
        assert!(settings.ephemeris_path.is_none());
        assert_eq!(settings.aspect_settings.orb(AspectType::Sextile), 6.0);
    }

    #[test]
    fn test_full_file() {
        let text = r#"
            port = 8080
            host = "127.0.0.1"
            ephemeris_path = "/opt/ephe"
            default_house_system = "whole_sign"
            bodies = ["moon", "sun", "chiron", "sun"]

            [orbs]
            trine = 6.5
            Square = 7
        "#;
        let settings = parse_server_settings(text).unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:8080");
        assert_eq!(settings.ephemeris_path, Some(PathBuf::from("/opt/ephe")));
        assert_eq!(settings.default_house_system, HouseSystem::WholeSign);
        assert_eq!(settings.bodies, vec![Body::Sun, Body::Moon, Body::Chiron]);
        assert_eq!(settings.aspect_settings.orb(AspectType::Trine), 6.5);
        assert_eq!(settings.aspect_settings.orb(AspectType::Square), 7.0);
        assert_eq!(settings.aspect_settings.orb(AspectType::Conjunction), 8.0);
    }

    #[test]
    fn test_rejects_unknown_values() {
        let err = parse_server_settings("default_house_system = \"Q\"").unwrap_err();
        assert!(err.to_string().contains("default_house_system"));

        let err = parse_server_settings("bodies = [\"vulcan\"]").unwrap_err();
        assert!(err.to_string().contains("vulcan"));

        let err = parse_server_settings("[orbs]\nquincunx = 3.0").unwrap_err();
        assert!(err.to_string().contains("quincunx"));

        assert!(parse_server_settings("bodies = []").is_err());
    }

    #[test]
    fn test_orb_bounds() {
        assert!(parse_server_settings("[orbs]\ntrine = 0.0").is_err());
        assert!(parse_server_settings("[orbs]\ntrine = 15.5").is_err());
        assert!(parse_server_settings("[orbs]\ntrine = 15.0").is_ok());
    }

    #[test]
    fn test_port_override() {
        let mut settings = ServerSettings::default();
        settings.apply_port_override(None).unwrap();
        assert_eq!(settings.port, 3000);

        settings.apply_port_override(Some("5055")).unwrap();
        assert_eq!(settings.port, 5055);

        assert!(settings.apply_port_override(Some("http")).is_err());
        assert_eq!(settings.port, 5055);
    }
}
