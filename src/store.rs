use crate::error::StoreError;
use crate::model::Record;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const RECORD_HEADERS: [&str; 21] = [
    "CatalogueId",
    "Name",
    "PageUrl",
    "BigCollection",
    "Collection",
    "Region",
    "Period",
    "OriginCountry",
    "OriginDepartment",
    "OriginCity",
    "CurrentLocation",
    "Material",
    "Function",
    "Height",
    "Width",
    "Length",
    "Technique",
    "Description",
    "Images",
    "ImagesAuthor",
    "ScrapingDate",
];

pub fn write_urls_csv(path: &Path, urls: &[String]) -> Result<(), StoreError> {
    let mut writer = csv_writer(path)?;
    writer
        .write_record(["url"])
        .map_err(|err| StoreError::output(path, err))?;
    for url in urls {
        writer
            .write_record([url])
            .map_err(|err| StoreError::output(path, err))?;
    }
    writer.flush().map_err(|err| StoreError::output(path, err))
}

pub fn write_records_csv(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let mut writer = csv_writer(path)?;
    writer
        .write_record(RECORD_HEADERS)
        .map_err(|err| StoreError::output(path, err))?;
    for record in records {
        writer
            .write_record(record_row(record))
            .map_err(|err| StoreError::output(path, err))?;
    }
    writer.flush().map_err(|err| StoreError::output(path, err))
}

pub fn write_records_json(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let document = RecordDocument { data: records };
    let mut file = create_file(path)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut file, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|err| StoreError::output(path, err))?;
    file.flush().map_err(|err| StoreError::output(path, err))
}

#[derive(Serialize)]
struct RecordDocument<'a> {
    data: &'a [Record],
}

fn record_row(record: &Record) -> [String; 21] {
    [
        record.catalogue_id.clone(),
        record.name.clone(),
        record.page_url.clone(),
        record.big_collection.clone(),
        record.collection.clone(),
        record.region.clone(),
        record.period.clone(),
        record.origin_country.clone(),
        record.origin_department.clone(),
        record.origin_city.clone(),
        record.current_location.clone(),
        record.material.clone(),
        record.function.clone(),
        record.height.clone(),
        record.width.clone(),
        record.length.clone(),
        record.technique.clone(),
        record.description.clone(),
        record.images_column(),
        record.imgs_author.clone(),
        record.scraping_date.clone(),
    ]
}

fn csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>, StoreError> {
    Ok(csv::Writer::from_writer(create_file(path)?))
}

fn create_file(path: &Path) -> Result<BufWriter<File>, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| StoreError::output(path, err))?;
    }
    let file = File::create(path).map_err(|err| StoreError::output(path, err))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Image;

    #[test]
    fn row_matches_header_order() {
        let record = Record {
            catalogue_id: "O00123".to_string(),
            name: "Poporo".to_string(),
            page_url: "https://example.org/poporo".to_string(),
            imgs: vec![
                Image {
                    url: "a.jpg".to_string(),
                    alt_text: "front".to_string(),
                },
                Image {
                    url: "b.jpg".to_string(),
                    alt_text: "back".to_string(),
                },
            ],
            ..Record::default()
        };
        let row = record_row(&record);
        assert_eq!(row[0], "O00123");
        assert_eq!(row[1], "Poporo");
        assert_eq!(row[2], "https://example.org/poporo");
        assert_eq!(row[18], "a.jpg front - b.jpg back");
        assert_eq!(RECORD_HEADERS[18], "Images");
    }
}
