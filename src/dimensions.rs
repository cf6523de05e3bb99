use crate::error::ExtractError;

pub const VOLUME_MARKER: &str = "alto/largo";

const HEIGHT_TOKEN: usize = 2;
const WIDTH_TOKEN: usize = 6;
const LENGTH_TOKEN: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub height: String,
    pub width: String,
    pub length: String,
}

pub fn is_volume_data(text: &str) -> bool {
    text.contains(VOLUME_MARKER)
}

/// Positional split of a measurement line such as
/// `Volumen alto/largo: 10,5 cm - ancho: 7,2 cm - profundidad: 3 cm`.
///
/// Height and width sit at tokens 2 and 6; length at token 10 only when more
/// than ten tokens exist.
pub fn parse_dimensions(text: &str) -> Result<Dimensions, ExtractError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() <= WIDTH_TOKEN {
        return Err(ExtractError::MalformedDimensionData {
            tokens: tokens.len(),
        });
    }

    let length = if tokens.len() > LENGTH_TOKEN {
        decimal_point(tokens[LENGTH_TOKEN])
    } else {
        String::new()
    };

    Ok(Dimensions {
        height: decimal_point(tokens[HEIGHT_TOKEN]),
        width: decimal_point(tokens[WIDTH_TOKEN]),
        length,
    })
}

fn decimal_point(token: &str) -> String {
    token.replace(',', ".")
}
