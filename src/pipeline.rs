use crate::classify::classify_page;
use crate::config::{CrawlConfig, ListingConfig, OutputConfig};
use crate::error::StoreError;
use crate::fetch::{PageSource, listing_page_urls};
use crate::fragment::{extract_fragments, extract_listing_links};
use crate::model::{CrawlContext, CrawlReport, Record};
use crate::store::{write_records_csv, write_records_json, write_urls_csv};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;
use tracing::{info, warn};

pub fn assemble_record(mut record: Record, page_url: &str, scraped_at: DateTime<Utc>) -> Record {
    record.page_url = page_url.to_string();
    record.scraping_date = scraped_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    record
}

pub fn collect_urls(
    source: &dyn PageSource,
    listing: &ListingConfig,
    ctx: &mut CrawlContext,
    report: &mut CrawlReport,
) -> Result<()> {
    info!("collecting item urls");
    for (page, page_url) in listing_page_urls(listing)?.into_iter().enumerate() {
        let html = match source.fetch(&page_url) {
            Ok(html) => html,
            Err(err) => {
                warn!(url = %page_url, error = %err, "listing page fetch failed; skipping");
                report.fetch_failures += 1;
                continue;
            }
        };
        report.listing_pages += 1;

        let links = extract_listing_links(
            &html,
            &page_url,
            &listing.card_selector,
            &listing.link_selector,
        )
        .with_context(|| format!("failed to read listing page {page_url}"))?;
        let added = links.into_iter().filter(|link| ctx.push_url(link.clone())).count();
        info!(page, added, total = ctx.urls.len(), "listing page read");
    }

    report.urls = ctx.urls.len();
    info!(links = ctx.urls.len(), "collected item urls");
    Ok(())
}

// A fetch failure still yields a record with the URL and timestamp.
pub fn scrape_page(
    source: &dyn PageSource,
    config: &CrawlConfig,
    url: &str,
    report: &mut CrawlReport,
) -> Result<Record> {
    let classified = match source.fetch(url) {
        Ok(html) => {
            report.pages_fetched += 1;
            let fragments = extract_fragments(&html, &config.selectors)
                .with_context(|| format!("failed to extract fragments from {url}"))?;
            classify_page(&fragments, &config.origin)
        }
        Err(err) => {
            warn!(%url, error = %err, "detail page fetch failed; keeping empty record");
            report.fetch_failures += 1;
            Record::default()
        }
    };

    Ok(assemble_record(classified, url, Utc::now()))
}

pub fn scrape_records(
    source: &dyn PageSource,
    config: &CrawlConfig,
    ctx: &mut CrawlContext,
    report: &mut CrawlReport,
) -> Result<()> {
    info!(urls = ctx.urls.len(), "scraping item pages");
    for url in ctx.urls.clone() {
        let record = scrape_page(source, config, &url, report)?;
        info!(name = %record.name, catalogue_id = %record.catalogue_id, "scraped item");
        ctx.push_record(record);
    }

    report.records = ctx.records.len();
    info!(records = ctx.records.len(), "scraped item pages");
    Ok(())
}

pub fn write_url_list(ctx: &CrawlContext, output: &OutputConfig, report: &mut CrawlReport) {
    let path = output.urls_path();
    record_output(write_urls_csv(&path, &ctx.urls), &path, report);
}

pub fn write_records(ctx: &CrawlContext, output: &OutputConfig, report: &mut CrawlReport) {
    let csv_path = output.records_csv_path();
    record_output(write_records_csv(&csv_path, &ctx.records), &csv_path, report);

    let json_path = output.records_json_path();
    record_output(write_records_json(&json_path, &ctx.records), &json_path, report);
}

fn record_output(result: Result<(), StoreError>, path: &Path, report: &mut CrawlReport) {
    match result {
        Ok(()) => {
            report.outputs_written += 1;
            info!(file = %path.display(), "finished writing");
        }
        Err(err) => {
            report.output_failures += 1;
            let err = anyhow::Error::from(err);
            warn!(file = %path.display(), error = %format!("{err:#}"), "output stage failed");
        }
    }
}

pub fn run_crawl(
    source: &dyn PageSource,
    config: &CrawlConfig,
) -> Result<(CrawlContext, CrawlReport)> {
    let mut ctx = CrawlContext::new();
    let mut report = CrawlReport::default();

    collect_urls(source, &config.listing, &mut ctx, &mut report)?;
    write_url_list(&ctx, &config.output, &mut report);
    scrape_records(source, config, &mut ctx, &mut report)?;
    write_records(&ctx, &config.output, &mut report);

    Ok((ctx, report))
}

pub fn run_url_collection(
    source: &dyn PageSource,
    config: &CrawlConfig,
) -> Result<(CrawlContext, CrawlReport)> {
    let mut ctx = CrawlContext::new();
    let mut report = CrawlReport::default();

    collect_urls(source, &config.listing, &mut ctx, &mut report)?;
    write_url_list(&ctx, &config.output, &mut report);

    Ok((ctx, report))
}
