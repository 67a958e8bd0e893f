use config::{Config, ConfigError, Environment, File, FileFormat};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{env, fmt};

use crate::pipeline::model_config::config::{
    DEFAULT_MESH_INPUT_SIZE, DEFAULT_MESH_ROI_SCALE, DEFAULT_NUM_JITTERS,
    DEFAULT_PRESENCE_THRESHOLD, DEFAULT_TOLERANCE,
};

pub static SETTINGS: Lazy<Settings> = Lazy::new(|| Settings::new().expect("Failed to setup settings"));

pub const DEFAULT_REQUEST_TIMEOUT: u64 = 20;
pub const DEFAULT_BODY_LIMIT: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub http_port: u16,
    pub request_timeout: Option<u64>,
    pub body_limit: Option<usize>,
}

impl Server {
    pub fn request_timeout(&self) -> u64 {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit.unwrap_or(DEFAULT_BODY_LIMIT)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tracer {
    pub uri: String,
}

/// Model locations and tuning knobs for the vision pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct Vision {
    pub landmark_model: String,
    pub encoder_model: String,
    pub face_mesh_model: String,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_num_jitters")]
    pub num_jitters: u32,
    #[serde(default = "default_mesh_input_size")]
    pub mesh_input_size: i32,
    #[serde(default = "default_mesh_roi_scale")]
    pub mesh_roi_scale: f32,
    #[serde(default = "default_presence_threshold")]
    pub presence_threshold: f32,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_num_jitters() -> u32 {
    DEFAULT_NUM_JITTERS
}

fn default_mesh_input_size() -> i32 {
    DEFAULT_MESH_INPUT_SIZE
}

fn default_mesh_roi_scale() -> f32 {
    DEFAULT_MESH_ROI_SCALE
}

fn default_presence_threshold() -> f32 {
    DEFAULT_PRESENCE_THRESHOLD
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Option<String>,
    pub server: Server,
    pub logger: Option<Logger>,
    pub tracer: Option<Tracer>,
    pub vision: Vision,
    pub app: App,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("conf/config.toml").format(FileFormat::Toml))
            .add_source(File::with_name("conf/default").required(false))
            .add_source(File::with_name(&format!("conf/{run_mode}")).required(false))
            .add_source(File::with_name("conf/local").required(false))
            .add_source(Environment::default().separator("__"));

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.http_port", port)?;
        }

        builder.build()?.try_deserialize()
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "http://localhost:{}", &self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let settings = match Settings::new() {
            Ok(settings) => settings,
            Err(e) => {
                println!("{:?}", e);
                return;
            }
        };

        assert!(settings.vision.tolerance > 0.0);
        assert!(settings.server.request_timeout() > 0);
    }

    #[test]
    fn test_server_defaults() {
        let server = Server {
            http_port: 8000,
            request_timeout: None,
            body_limit: None,
        };

        assert_eq!(server.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(server.body_limit(), DEFAULT_BODY_LIMIT);
        assert_eq!(server.to_string(), "http://localhost:8000");
    }
}
