use crate::config::OriginConfig;
use crate::dimensions::{Dimensions, is_volume_data, parse_dimensions};
use crate::fragment::{
    Content, Fragment, PageFragments, Role, join_line_breaks, normalize_markup,
};
use crate::model::{Image, Record};
use crate::origin::parse_origin;
use tracing::{debug, warn};

const TECHNIQUE_MAX_LEN: usize = 90;
const DESCRIPTION_MIN_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkSlot {
    #[default]
    Collection,
    Origin,
    Location,
    Ignored,
}

impl LinkSlot {
    pub fn next(self) -> Self {
        match self {
            LinkSlot::Collection => LinkSlot::Origin,
            LinkSlot::Origin => LinkSlot::Location,
            LinkSlot::Location | LinkSlot::Ignored => LinkSlot::Ignored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailSlot {
    #[default]
    Material,
    Function,
    OptionalScan,
    Ignored,
}

impl DetailSlot {
    pub fn next(self) -> Self {
        match self {
            DetailSlot::Material => DetailSlot::Function,
            DetailSlot::Function => DetailSlot::OptionalScan,
            DetailSlot::OptionalScan | DetailSlot::Ignored => DetailSlot::Ignored,
        }
    }
}

// Link and detail fragments are routed by position within their role.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub link: LinkSlot,
    pub detail: DetailSlot,
    pub optional_data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalField {
    Volume(Dimensions),
    CatalogueId(String),
    Technique(String),
    Description(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalFields {
    pub dimensions: Option<Dimensions>,
    pub catalogue_id: Option<String>,
    pub technique: Option<String>,
    pub description: Option<String>,
}

impl OptionalFields {
    fn apply(&mut self, field: OptionalField) {
        match field {
            OptionalField::Volume(dimensions) => self.dimensions = Some(dimensions),
            OptionalField::CatalogueId(id) => self.catalogue_id = Some(id),
            OptionalField::Technique(technique) => self.technique = Some(technique),
            OptionalField::Description(description) => self.description = Some(description),
        }
    }

    fn write_into(&self, record: &mut Record) {
        if let Some(dimensions) = &self.dimensions {
            record.height = dimensions.height.clone();
            record.width = dimensions.width.clone();
            if !dimensions.length.is_empty() {
                record.length = dimensions.length.clone();
            }
        }
        if let Some(id) = &self.catalogue_id {
            record.catalogue_id = id.clone();
        }
        if let Some(technique) = &self.technique {
            record.technique = technique.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
    }
}

/// Order: volume marker, catalogue id, technique, description. A long element
/// ending in a digit matches none of them and is dropped.
pub fn classify_optional(data: &str) -> Option<OptionalField> {
    if is_volume_data(data) {
        return match parse_dimensions(data) {
            Ok(dimensions) => Some(OptionalField::Volume(dimensions)),
            Err(err) => {
                warn!(error = %err, data, "skipping unreadable measurements");
                None
            }
        };
    }

    let long = data.len() >= DESCRIPTION_MIN_LEN;
    let ends_with_digit = data.chars().last().is_some_and(|c| c.is_ascii_digit());
    if ends_with_digit {
        if long {
            debug!(data, "dropping long optional data ending in a digit");
            return None;
        }
        return Some(OptionalField::CatalogueId(data.to_string()));
    }

    if data.len() < TECHNIQUE_MAX_LEN && !data.contains('#') {
        return Some(OptionalField::Technique(data.replace('\n', " ")));
    }

    if long {
        return Some(OptionalField::Description(data.replace('\n', " ")));
    }

    None
}

pub fn scan_optional_data<S: AsRef<str>>(data: &[S]) -> OptionalFields {
    let mut fields = OptionalFields::default();
    for item in data {
        if let Some(field) = classify_optional(item.as_ref()) {
            fields.apply(field);
        }
    }
    fields
}

pub fn classify_page(fragments: &PageFragments, origin: &OriginConfig) -> Record {
    let mut cursor = Cursor::default();
    let mut record = Record::default();
    for fragment in fragments {
        classify_fragment(&mut cursor, &mut record, fragment, origin);
    }
    record
}

pub fn classify_fragment(
    cursor: &mut Cursor,
    record: &mut Record,
    fragment: &Fragment,
    origin: &OriginConfig,
) {
    match fragment.role {
        Role::Image => {
            if let Content::Image { src, alt } = &fragment.content {
                record.imgs.push(Image {
                    url: src.trim().to_string(),
                    alt_text: alt.trim().to_string(),
                });
            }
        }
        Role::Caption => record.imgs_author = fragment.content.text().trim().to_string(),
        Role::BigCollection => {
            record.big_collection = fragment.content.text().trim().to_string();
        }
        Role::Name => record.name = fragment.content.text().trim().to_string(),
        Role::RegionPeriod => {
            let text = fragment.content.text().trim();
            if text.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                record.period = text.to_string();
            } else {
                record.region = text.to_string();
            }
        }
        Role::Link => route_link(cursor, record, fragment, origin),
        Role::Detail => route_detail(cursor, record, fragment),
    }
}

fn route_link(
    cursor: &mut Cursor,
    record: &mut Record,
    fragment: &Fragment,
    origin: &OriginConfig,
) {
    let text = fragment.content.text().trim();
    match cursor.link {
        LinkSlot::Collection => record.collection = text.to_string(),
        LinkSlot::Origin => {
            let parsed = parse_origin(text, origin);
            record.origin_city = parsed.city;
            record.origin_department = parsed.department;
            record.origin_country = parsed.country;
        }
        LinkSlot::Location => record.current_location = text.to_string(),
        LinkSlot::Ignored => {
            debug!(ordinal = fragment.ordinal, "ignoring surplus link fragment");
        }
    }
    cursor.link = cursor.link.next();
}

fn route_detail(cursor: &mut Cursor, record: &mut Record, fragment: &Fragment) {
    match cursor.detail {
        DetailSlot::Material => record.material = normalize_markup(fragment.content.markup()),
        DetailSlot::Function => record.function = fragment.content.text().trim().to_string(),
        DetailSlot::OptionalScan => {
            cursor
                .optional_data
                .push(join_line_breaks(fragment.content.markup()));
            scan_optional_data(&cursor.optional_data).write_into(record);
        }
        DetailSlot::Ignored => {
            debug!(ordinal = fragment.ordinal, "ignoring surplus detail fragment");
        }
    }
    cursor.detail = cursor.detail.next();
}
