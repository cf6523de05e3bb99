use crate::fragment::parse_selector;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CrawlConfig {
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.listing.base_url)
            .with_context(|| format!("invalid listing.base_url {}", self.listing.base_url))?;
        if self.listing.page_param.trim().is_empty() {
            bail!("listing.page_param must not be empty");
        }
        if self.listing.first_page > self.listing.last_page {
            bail!(
                "listing.first_page ({}) must not exceed listing.last_page ({})",
                self.listing.first_page,
                self.listing.last_page
            );
        }

        let selectors = [
            ("listing.card_selector", &self.listing.card_selector),
            ("listing.link_selector", &self.listing.link_selector),
            ("selectors.image", &self.selectors.image),
            ("selectors.caption", &self.selectors.caption),
            ("selectors.big_collection", &self.selectors.big_collection),
            ("selectors.name", &self.selectors.name),
            ("selectors.region_period", &self.selectors.region_period),
            ("selectors.link", &self.selectors.link),
            ("selectors.detail", &self.selectors.detail),
        ];
        for (key, value) in selectors {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
            parse_selector(value).with_context(|| format!("invalid {key}"))?;
        }

        if self.origin.capital_marker.is_empty() {
            bail!("origin.capital_marker must not be empty");
        }

        let outputs = [
            ("output.urls_file", &self.output.urls_file),
            ("output.records_csv", &self.output.records_csv),
            ("output.records_json", &self.output.records_json),
        ];
        for (key, value) in outputs {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_param")]
    pub page_param: String,
    #[serde(default)]
    pub first_page: usize,
    #[serde(default = "default_last_page")]
    pub last_page: usize,
    #[serde(default = "default_card_selector")]
    pub card_selector: String,
    #[serde(default = "default_link_selector")]
    pub link_selector: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_param: default_page_param(),
            first_page: 0,
            last_page: default_last_page(),
            card_selector: default_card_selector(),
            link_selector: default_link_selector(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_image_selector")]
    pub image: String,
    #[serde(default = "default_caption_selector")]
    pub caption: String,
    #[serde(default = "default_big_collection_selector")]
    pub big_collection: String,
    #[serde(default = "default_name_selector")]
    pub name: String,
    #[serde(default = "default_region_period_selector")]
    pub region_period: String,
    #[serde(default = "default_link_role_selector")]
    pub link: String,
    #[serde(default = "default_detail_selector")]
    pub detail: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            image: default_image_selector(),
            caption: default_caption_selector(),
            big_collection: default_big_collection_selector(),
            name: default_name_selector(),
            region_period: default_region_period_selector(),
            link: default_link_role_selector(),
            detail: default_detail_selector(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OriginConfig {
    #[serde(default = "default_capital_marker")]
    pub capital_marker: String,
    #[serde(default = "default_capital_department")]
    pub capital_department: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            capital_marker: default_capital_marker(),
            capital_department: default_capital_department(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_urls_file")]
    pub urls_file: String,
    #[serde(default = "default_records_csv")]
    pub records_csv: String,
    #[serde(default = "default_records_json")]
    pub records_json: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            urls_file: default_urls_file(),
            records_csv: default_records_csv(),
            records_json: default_records_json(),
        }
    }
}

impl OutputConfig {
    pub fn urls_path(&self) -> PathBuf {
        self.dir.join(&self.urls_file)
    }

    pub fn records_csv_path(&self) -> PathBuf {
        self.dir.join(&self.records_csv)
    }

    pub fn records_json_path(&self) -> PathBuf {
        self.dir.join(&self.records_json)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<CrawlConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read crawl config: {}", path.display()))?;
            toml::from_str::<CrawlConfig>(&text)
                .with_context(|| format!("failed to parse toml in {}", path.display()))?
        }
        None => CrawlConfig::default(),
    };

    config.validate().with_context(|| match path {
        Some(path) => format!("invalid crawl config {}", path.display()),
        None => "invalid built-in crawl config".to_string(),
    })?;
    Ok(config)
}

fn default_base_url() -> String {
    "https://colecciones.banrepcultural.org/page/coleccin-arqueolgica-de-los-museos-del-oro/6357a765e27d753f221c6160".to_string()
}

fn default_page_param() -> String {
    "pgn".to_string()
}

fn default_last_page() -> usize {
    12
}

fn default_card_selector() -> String {
    "div.card".to_string()
}

fn default_link_selector() -> String {
    "a".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_image_selector() -> String {
    "img.m-auto".to_string()
}

fn default_caption_selector() -> String {
    "p".to_string()
}

fn default_big_collection_selector() -> String {
    "h3.fs-2".to_string()
}

fn default_name_selector() -> String {
    "h2.fs-1".to_string()
}

fn default_region_period_selector() -> String {
    "h3.fs-3".to_string()
}

fn default_link_role_selector() -> String {
    "a.col-md-8".to_string()
}

fn default_detail_selector() -> String {
    "div.col-md-8".to_string()
}

fn default_capital_marker() -> String {
    "Bog".to_string()
}

fn default_capital_department() -> String {
    "Cundinamarca".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_urls_file() -> String {
    "GoldMuseumUrls.csv".to_string()
}

fn default_records_csv() -> String {
    "GoldMuseumObjects.csv".to_string()
}

fn default_records_json() -> String {
    "GoldMuseumObjects.json".to_string()
}
