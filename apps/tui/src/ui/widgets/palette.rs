use ratatui::style::Color;
use realty_timeline::domain::{self, EventCity};
use realty_timeline::prices::Area;

/// Terminal colour for a `#rrggbb` registry colour.
pub fn hex_color(hex: &str) -> Color {
    match hex.parse::<Color>() {
        // Unreadable on dark terminals.
        Ok(Color::Rgb(0, 0, 0)) => Color::White,
        Ok(color) => color,
        Err(_) => Color::Gray,
    }
}

/// National events and unknown ids share the national colour.
pub fn city_color(city: EventCity) -> Color {
    hex_color(domain::city_color(city.as_str()))
}

pub fn area_color(area: Area) -> Color {
    match area {
        Area::Nation => Color::Gray,
        Area::City(city) => hex_color(city.color()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_timeline::domain::CityId;

    #[test]
    fn registry_colours_become_rgb() {
        assert_eq!(hex_color("#1e3a8a"), Color::Rgb(0x1e, 0x3a, 0x8a));
        assert_eq!(hex_color("#000000"), Color::White);
        assert_eq!(hex_color("teal-ish"), Color::Gray);
        assert_eq!(area_color(Area::Nation), Color::Gray);
        assert_eq!(
            city_color(EventCity::City(CityId::Tainan)),
            Color::Rgb(0xdc, 0x26, 0x26)
        );
        assert_eq!(city_color(EventCity::National), Color::Rgb(0x52, 0x52, 0x52));
    }
}
