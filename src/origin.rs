use crate::config::OriginConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    pub city: String,
    pub department: String,
    pub country: String,
}

/// Splits an origin link such as `(Bogotá/Colombia/Cundinamarca)`.
///
/// Three parts read as city/country/department, in that order. Two parts read
/// as department/country unless the first names the capital, in which case the
/// department is fixed. A single part is the country. Anything else yields an
/// empty origin.
pub fn parse_origin(text: &str, config: &OriginConfig) -> Origin {
    let stripped = text.replace(['(', ')'], "");
    let parts: Vec<&str> = stripped.split('/').map(str::trim).collect();

    match parts.as_slice() {
        [city, country, department] => Origin {
            city: city.to_string(),
            department: department.to_string(),
            country: country.to_string(),
        },
        [first, country] if first.contains(config.capital_marker.as_str()) => Origin {
            city: first.to_string(),
            department: config.capital_department.clone(),
            country: country.to_string(),
        },
        [department, country] => Origin {
            city: String::new(),
            department: department.to_string(),
            country: country.to_string(),
        },
        [country] => Origin {
            country: country.to_string(),
            ..Origin::default()
        },
        _ => Origin::default(),
    }
}
