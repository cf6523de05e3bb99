use anyhow::Result;
use chrono::{TimeZone, Utc};
use museo::config::{CrawlConfig, OriginConfig, SelectorConfig, load_config};
use museo::fetch::{StaticPageSource, build_paged_url};
use museo::fragment::{Content, Role, extract_fragments, extract_listing_links};
use museo::model::Record;
use museo::pipeline::{assemble_record, run_crawl, run_url_collection};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const BASE_URL: &str = "https://example.org/coleccion";

fn fixture(name: &str) -> Result<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    Ok(fs::read_to_string(path)?)
}

fn test_config(out_dir: PathBuf) -> CrawlConfig {
    let mut config = CrawlConfig::default();
    config.listing.base_url = BASE_URL.to_string();
    config.listing.first_page = 0;
    config.listing.last_page = 1;
    config.output.dir = out_dir;
    config
}

fn fixture_source() -> Result<StaticPageSource> {
    let listing = fixture("listing_page.html")?;
    let detail = fixture("detail_poporo.html")?;
    Ok(StaticPageSource::new()
        .with_page(build_paged_url(BASE_URL, "pgn", "0")?, listing.clone())
        .with_page(build_paged_url(BASE_URL, "pgn", "1")?, listing)
        .with_page("https://example.org/objeto/poporo", detail))
}

#[test]
fn detail_fixture_yields_fragments_by_role() -> Result<()> {
    let html = fixture("detail_poporo.html")?;
    let page = extract_fragments(&html, &SelectorConfig::default())?;

    let roles: Vec<Role> = page.iter().map(|f| f.role).collect();
    assert_eq!(roles.iter().filter(|r| **r == Role::Image).count(), 2);
    assert_eq!(roles.iter().filter(|r| **r == Role::Link).count(), 3);
    assert_eq!(roles.iter().filter(|r| **r == Role::Detail).count(), 4);

    let first_detail = page
        .iter()
        .find(|f| f.role == Role::Detail)
        .expect("detail fragment must exist");
    assert_eq!(first_detail.ordinal, 0);
    match &first_detail.content {
        Content::Markup { html, .. } => assert!(html.contains("<br>")),
        other => panic!("unexpected content {other:?}"),
    }
    Ok(())
}

#[test]
fn listing_links_are_resolved_per_card() -> Result<()> {
    let html = fixture("listing_page.html")?;
    let links =
        extract_listing_links(&html, "https://example.org/coleccion?pgn=0", "div.card", "a")?;
    assert_eq!(
        links,
        vec![
            "https://example.org/objeto/poporo",
            "https://example.org/objeto/pectoral",
            "https://example.org/objeto/poporo",
        ]
    );
    Ok(())
}

#[test]
fn crawl_writes_urls_csv_and_json() -> Result<()> {
    let temp = tempdir()?;
    let config = test_config(temp.path().join("out"));
    let source = fixture_source()?;

    let (ctx, report) = run_crawl(&source, &config)?;

    assert_eq!(report.listing_pages, 2);
    assert_eq!(report.urls, 2);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.records, 2);
    assert_eq!(report.outputs_written, 3);
    assert_eq!(report.output_failures, 0);

    let poporo = &ctx.records[0];
    assert_eq!(poporo.name, "Poporo");
    assert_eq!(poporo.page_url, "https://example.org/objeto/poporo");
    assert_eq!(poporo.big_collection, "Colección arqueológica de los museos del oro");
    assert_eq!(poporo.region, "Quimbaya");
    assert_eq!(poporo.period, "500 - 1500 d.C.");
    assert_eq!(poporo.collection, "Museo del Oro");
    assert_eq!(poporo.origin_city, "Bogotá");
    assert_eq!(poporo.origin_country, "Colombia");
    assert_eq!(poporo.origin_department, "Cundinamarca");
    assert_eq!(poporo.current_location, "Bogotá D.C.");
    assert_eq!(poporo.material, "Oro tumbaga");
    assert_eq!(poporo.function, "Ritual");
    assert_eq!(poporo.height, "10.5");
    assert_eq!(poporo.width, "7.2");
    assert_eq!(poporo.length, "3.1");
    assert_eq!(poporo.catalogue_id, "");
    assert_eq!(poporo.imgs_author, "Fotografía: Museo del Oro");
    assert_eq!(poporo.imgs[0].url, "https://example.org/img/poporo-1.jpg");
    assert_eq!(poporo.imgs[0].alt_text, "Vista frontal");
    assert!(!poporo.scraping_date.is_empty());

    let missing = &ctx.records[1];
    assert_eq!(missing.page_url, "https://example.org/objeto/pectoral");
    assert_eq!(missing.name, "");
    assert!(!missing.scraping_date.is_empty());

    let out = config.output.dir.as_path();
    let urls = fs::read_to_string(out.join("GoldMuseumUrls.csv"))?;
    assert_eq!(
        urls,
        "url\nhttps://example.org/objeto/poporo\nhttps://example.org/objeto/pectoral\n"
    );

    let mut reader = csv::Reader::from_path(out.join("GoldMuseumObjects.csv"))?;
    let headers = reader.headers()?.clone();
    assert_eq!(&headers[0], "CatalogueId");
    assert_eq!(&headers[1], "Name");
    assert_eq!(&headers[2], "PageUrl");
    assert_eq!(headers.len(), 21);
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "Poporo");
    assert_eq!(&rows[0][2], "https://example.org/objeto/poporo");
    assert_eq!(
        &rows[0][18],
        "https://example.org/img/poporo-1.jpg Vista frontal - https://example.org/img/poporo-2.jpg Vista lateral"
    );

    let json = fs::read_to_string(out.join("GoldMuseumObjects.json"))?;
    assert!(json.starts_with("{\n    \"data\": ["));
    assert!(json.contains("\"catalogueId\""));
    assert!(json.contains("\"altText\": \"Vista frontal\""));
    let document: serde_json::Value = serde_json::from_str(&json)?;
    let records: Vec<Record> = serde_json::from_value(document["data"].clone())?;
    assert_eq!(records, ctx.records);
    Ok(())
}

#[test]
fn url_collection_only_writes_url_list() -> Result<()> {
    let temp = tempdir()?;
    let config = test_config(temp.path().to_path_buf());
    let source = fixture_source()?;

    let (ctx, report) = run_url_collection(&source, &config)?;

    assert_eq!(ctx.urls.len(), 2);
    assert!(ctx.records.is_empty());
    assert_eq!(report.outputs_written, 1);
    assert!(temp.path().join("GoldMuseumUrls.csv").exists());
    assert!(!temp.path().join("GoldMuseumObjects.csv").exists());
    Ok(())
}

#[test]
fn unwritable_output_only_fails_that_stage() -> Result<()> {
    let temp = tempdir()?;
    let mut config = test_config(temp.path().to_path_buf());
    fs::create_dir_all(temp.path().join("GoldMuseumObjects.json"))?;
    config.listing.last_page = 0;

    let (_, report) = run_crawl(&fixture_source()?, &config)?;

    assert_eq!(report.outputs_written, 2);
    assert_eq!(report.output_failures, 1);
    assert!(temp.path().join("GoldMuseumObjects.csv").exists());
    Ok(())
}

#[test]
fn assembler_stamps_url_and_iso_timestamp() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
    let record = assemble_record(
        Record {
            name: "Poporo".to_string(),
            ..Record::default()
        },
        "https://example.org/objeto/poporo",
        at,
    );
    assert_eq!(record.name, "Poporo");
    assert_eq!(record.page_url, "https://example.org/objeto/poporo");
    assert_eq!(record.scraping_date, "2024-03-09T14:05:00Z");
}

#[test]
fn config_file_overrides_defaults() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("museo.toml");
    fs::write(
        &path,
        r#"
[listing]
last_page = 3

[origin]
capital_marker = "Quito"
capital_department = "Pichincha"

[output]
records_json = "objetos.json"
"#,
    )?;

    let config = load_config(Some(path.as_path()))?;
    assert_eq!(config.listing.last_page, 3);
    assert_eq!(config.listing.page_param, "pgn");
    assert_eq!(config.origin.capital_department, "Pichincha");
    assert_eq!(config.output.records_json, "objetos.json");
    assert_eq!(config.output.records_csv, "GoldMuseumObjects.csv");
    assert_eq!(config.selectors.detail, "div.col-md-8");
    Ok(())
}

#[test]
fn invalid_config_is_rejected() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("museo.toml");
    fs::write(&path, "[listing]\nfirst_page = 5\nlast_page = 2\n")?;
    assert!(load_config(Some(path.as_path())).is_err());

    fs::write(&path, "[selectors]\ndetail = \"div[\"\n")?;
    assert!(load_config(Some(path.as_path())).is_err());

    let defaults = load_config(None)?;
    assert_eq!(defaults.origin.capital_marker, OriginConfig::default().capital_marker);
    Ok(())
}
