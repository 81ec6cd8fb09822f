use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Kiosk settings: result-server endpoint, timing, word-cloud styling and
/// the fixed display strings. Loaded from the config dir, falling back to
/// defaults when absent or malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub fade_secs: f64,
    pub cloud_anim_secs: f64,
    pub slot_count: usize,
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub color_low: [u8; 3],
    pub color_high: [u8; 3],
    pub confirm_label: String,
    pub continue_label: String,
    pub follow_up_prompt: String,
    pub summary_feedback: String,
    pub results_screen: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            fade_secs: 1.0,
            cloud_anim_secs: 0.5,
            slot_count: 12,
            min_font_size: 20.0,
            max_font_size: 80.0,
            color_low: [120, 144, 156],
            color_high: [0, 121, 107],
            confirm_label: "Confirmar".to_string(),
            continue_label: "Continuar".to_string(),
            follow_up_prompt: "Qual sua opinião sobre isso?".to_string(),
            summary_feedback: "As palavras maiores foram as mais escolhidas por você e por \
                               outros participantes, revelando pontos de empatia compartilhados \
                               em comum. Já as palavras menores representam escolhas menos \
                               frequentes, mas igualmente importantes, pois mostram sua visão \
                               única da situação."
                .to_string(),
            results_screen: "results".to_string(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "empatia") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("empatia_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
