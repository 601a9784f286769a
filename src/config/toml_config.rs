use crate::config::PortalSettings;
use crate::core::resolver::PortalAddressResolver;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{
    validate_endpoint_path, validate_positive_number, validate_required, validate_url,
    Validate,
};
use regex::Regex;
use std::path::Path;

impl PortalSettings {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// 載入並驗證配置；不一致的配置不會交給 resolver 使用
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Self::from_file(path)?;
        settings.validate_config()?;
        Ok(settings)
    }

    /// 從 TOML 字串解析配置；未提供的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        let portal = &self.portal;

        validate_url("portal.primary_address", &portal.primary_address)?;
        validate_url("portal.docs_url", &portal.docs_url)?;
        validate_url("api.base_url", &self.api.base_url)?;

        validate_required("portal.designated_host", &portal.designated_host)?;
        validate_required("portal.parent_domain", &portal.parent_domain)?;
        validate_required("portal.default_label", &portal.default_label)?;
        validate_endpoint_path("portal.entry_path", &portal.entry_path)?;

        let endpoints = self.api.endpoints.as_map();
        for (name, path) in &endpoints {
            validate_endpoint_path(&format!("api.endpoints.{}", name), path)?;
        }

        validate_positive_number("api.timeout_ms", self.api.timeout_ms, 1)?;
        validate_positive_number(
            "api.accessibility_timeout_ms",
            self.api.accessibility_timeout_ms,
            1,
        )?;

        for (name, address) in &self.portals {
            validate_url(&format!("portals.{}", name), address)?;
        }

        self.check_consistency()
    }

    /// The primary address must be what the resolver would build and accept.
    fn check_consistency(&self) -> Result<()> {
        let resolver = PortalAddressResolver::new(self.clone());
        let primary = self.primary_address();

        if !resolver.is_valid_portal_address(primary) {
            return Err(PortalError::ConfigValidationError {
                field: "portal.primary_address".to_string(),
                message: format!("{} is not on the portal allow-list", primary),
            });
        }

        if resolver.extract_host(primary).as_deref() != Some(self.designated_host()) {
            return Err(PortalError::ConfigValidationError {
                field: "portal.designated_host".to_string(),
                message: format!(
                    "{} does not match the host of {}",
                    self.designated_host(),
                    primary
                ),
            });
        }

        let built = resolver.build_portal_address(None);
        if built != primary {
            return Err(PortalError::ConfigValidationError {
                field: "portal.default_label".to_string(),
                message: format!(
                    "label '{}' builds {} but the primary address is {}",
                    self.portal.default_label, built, primary
                ),
            });
        }

        Ok(())
    }
}

/// 替換環境變數 (例如 ${PORTAL_LABEL})；未設定的變數保持原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortalError::ConfigError {
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

impl Validate for PortalSettings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
