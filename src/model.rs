use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    pub alt_text: String,
}

impl Image {
    pub fn display_pair(&self) -> String {
        format!("{} {}", self.url, self.alt_text)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub catalogue_id: String,
    pub name: String,
    pub page_url: String,
    pub big_collection: String,
    pub collection: String,
    pub region: String,
    pub period: String,
    pub origin_country: String,
    pub origin_department: String,
    pub origin_city: String,
    pub current_location: String,
    pub material: String,
    pub function: String,
    pub height: String,
    pub width: String,
    pub length: String,
    pub technique: String,
    pub description: String,
    pub imgs: Vec<Image>,
    pub imgs_author: String,
    pub scraping_date: String,
}

impl Record {
    pub fn images_column(&self) -> String {
        self.imgs
            .iter()
            .map(Image::display_pair)
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrawlContext {
    pub urls: Vec<String>,
    pub records: Vec<Record>,
}

impl CrawlContext {
    pub fn new() -> Self {
        Self::default()
    }

    // false when the url was already known
    pub fn push_url(&mut self, url: String) -> bool {
        if self.urls.iter().any(|known| *known == url) {
            return false;
        }
        self.urls.push(url);
        true
    }

    pub fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub listing_pages: usize,
    pub urls: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub records: usize,
    pub outputs_written: usize,
    pub output_failures: usize,
}
