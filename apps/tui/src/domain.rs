use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Id the source data uses for national / historical events.
pub const NATIONAL_ID: &str = "oldLabel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CityId {
    Taipei,
    NewTaipei,
    Taoyuan,
    Hsinchu,
    Taichung,
    Tainan,
    Kaohsiung,
}

impl CityId {
    /// Registry order, also the order the sidebar lists cities in.
    pub const ALL: [Self; 7] = [
        Self::Taipei,
        Self::NewTaipei,
        Self::Taoyuan,
        Self::Hsinchu,
        Self::Taichung,
        Self::Tainan,
        Self::Kaohsiung,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Taipei => "taipei",
            Self::NewTaipei => "newTaipei",
            Self::Taoyuan => "taoyuan",
            Self::Hsinchu => "hsinchu",
            Self::Taichung => "taichung",
            Self::Tainan => "tainan",
            Self::Kaohsiung => "kaohsiung",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Taipei),
            1 => Some(Self::NewTaipei),
            2 => Some(Self::Taoyuan),
            3 => Some(Self::Hsinchu),
            4 => Some(Self::Taichung),
            5 => Some(Self::Tainan),
            6 => Some(Self::Kaohsiung),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Taipei => 0,
            Self::NewTaipei => 1,
            Self::Taoyuan => 2,
            Self::Hsinchu => 3,
            Self::Taichung => 4,
            Self::Tainan => 5,
            Self::Kaohsiung => 6,
        }
    }

    /// Accepts the registry id in any case, with or without separators
    /// (`newTaipei`, `new-taipei`, `NEW_TAIPEI`), or the display label.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if let Some(city) = Self::ALL.into_iter().find(|city| city.label() == trimmed) {
            return Some(city);
        }

        let folded: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match folded.as_str() {
            "taipei" => Some(Self::Taipei),
            "newtaipei" => Some(Self::NewTaipei),
            "taoyuan" => Some(Self::Taoyuan),
            "hsinchu" => Some(Self::Hsinchu),
            "taichung" => Some(Self::Taichung),
            "tainan" => Some(Self::Tainan),
            "kaohsiung" => Some(Self::Kaohsiung),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        self.config().label
    }

    pub const fn color(self) -> &'static str {
        self.config().color
    }

    pub const fn config(self) -> CityConfig {
        CITIES_CONFIG[self.index()]
    }

    /// Raw record field carrying this city's event title.
    pub const fn label_field(self) -> &'static str {
        match self {
            Self::Taipei => "TaipeiLabel",
            Self::NewTaipei => "NewTaipeiLabel",
            Self::Taoyuan => "TaoyuanLabel",
            Self::Hsinchu => "HsinchuLabel",
            Self::Taichung => "TaichungLabel",
            Self::Tainan => "TainanLabel",
            Self::Kaohsiung => "KaohsiungLabel",
        }
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown city: {raw}")))
    }
}

/// City affiliation of a normalized event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCity {
    National,
    City(CityId),
}

impl EventCity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::National => NATIONAL_ID,
            Self::City(city) => city.as_str(),
        }
    }

    pub const fn city(self) -> Option<CityId> {
        match self {
            Self::National => None,
            Self::City(city) => Some(city),
        }
    }

    pub const fn is_national(self) -> bool {
        matches!(self, Self::National)
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.trim() == NATIONAL_ID {
            return Some(Self::National);
        }
        CityId::parse(value).map(Self::City)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::National => NATIONAL_CONFIG.label,
            Self::City(city) => city.label(),
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::National => NATIONAL_CONFIG.color,
            Self::City(city) => city.color(),
        }
    }
}

impl fmt::Display for EventCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventCity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventCity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown city: {raw}")))
    }
}

/// Display label and colour token for one registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CityConfig {
    pub id: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

pub const CITIES_CONFIG: [CityConfig; 7] = [
    CityConfig {
        id: "taipei",
        label: "台北市",
        color: "#1e3a8a",
    },
    CityConfig {
        id: "newTaipei",
        label: "新北市",
        color: "#2563eb",
    },
    CityConfig {
        id: "taoyuan",
        label: "桃園市",
        color: "#60a5fa",
    },
    CityConfig {
        id: "hsinchu",
        label: "新竹縣/市",
        color: "#94a3b8",
    },
    CityConfig {
        id: "taichung",
        label: "台中市",
        color: "#000000",
    },
    CityConfig {
        id: "tainan",
        label: "台南市",
        color: "#dc2626",
    },
    CityConfig {
        id: "kaohsiung",
        label: "高雄市",
        color: "#991b1b",
    },
];

pub const NATIONAL_CONFIG: CityConfig = CityConfig {
    id: NATIONAL_ID,
    label: "全國/歷史",
    color: "#525252",
};

/// Colour for a city id; unknown ids get the national colour.
pub fn city_color(id: &str) -> &'static str {
    CITIES_CONFIG
        .iter()
        .find(|config| config.id == id)
        .map_or(NATIONAL_CONFIG.color, |config| config.color)
}

/// Display name for a city id; unknown ids are shown as-is.
pub fn city_name(id: &str) -> &str {
    CITIES_CONFIG
        .iter()
        .find(|config| config.id == id)
        .map_or(id, |config| config.label)
}
