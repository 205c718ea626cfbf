use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub page_size: u32,
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            debounce_ms: 500,
        }
    }
}

impl AppConfig {
    /// Récupère le chemin du fichier de configuration
    pub fn config_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir =
            dirs::config_dir().ok_or("Impossible de trouver le dossier de configuration")?;

        let app_config_dir = config_dir.join("newsdeck");
        std::fs::create_dir_all(&app_config_dir)?;

        Ok(app_config_dir.join("config.json"))
    }

    /// Charge la configuration depuis le fichier, ou crée une configuration par défaut
    pub fn load() -> Self {
        match Self::load_from_file() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Impossible de charger la configuration: {}. Utilisation des valeurs par défaut.", e);
                let default_config = Self::default();
                // Essaie de sauvegarder la configuration par défaut
                if let Err(save_err) = default_config.save() {
                    eprintln!(
                        "Impossible de sauvegarder la configuration par défaut: {}",
                        save_err
                    );
                }
                default_config
            }
        }
    }

    /// Charge la configuration depuis le fichier
    fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::config_file_path()?;
        let config_content = std::fs::read_to_string(config_path)?;
        let config: AppConfig = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Sauvegarde la configuration dans le fichier
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::config_file_path()?;
        let config_json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, config_json)?;
        Ok(())
    }

    /// Met à jour la configuration de l'API et sauvegarde
    pub fn update_api(&mut self, api: ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
        self.api = api;
        self.save()
    }

    /// Met à jour la configuration de recherche et sauvegarde
    pub fn update_search(&mut self, search: SearchConfig) -> Result<(), Box<dyn std::error::Error>> {
        self.search = search;
        self.save()
    }
}
