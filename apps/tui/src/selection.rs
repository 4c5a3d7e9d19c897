use crate::domain::CityId;
use thiserror::Error;

/// Most cities that can be compared against the main city.
pub const MAX_COMPARE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown city: {0}")]
    UnknownCity(String),
    #[error("{0} is already the main city")]
    MainInCompare(CityId),
    #[error("{0} is listed twice")]
    Duplicate(CityId),
    #[error("at most 3 compare cities can be selected, got {0}")]
    TooManyCompare(usize),
}

/// Focus city plus up to three compare cities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySelection {
    main: CityId,
    compare: Vec<CityId>,
}

impl CitySelection {
    pub const fn new(main: CityId) -> Self {
        Self {
            main,
            compare: Vec::new(),
        }
    }

    /// Builds a selection from ids as typed by a user.
    pub fn from_ids<S: AsRef<str>>(main: &str, compare: &[S]) -> Result<Self, SelectionError> {
        let main = parse_city(main)?;
        let mut selection = Self::new(main);

        if compare.len() > MAX_COMPARE {
            return Err(SelectionError::TooManyCompare(compare.len()));
        }
        for raw in compare {
            let city = parse_city(raw.as_ref())?;
            if city == main {
                return Err(SelectionError::MainInCompare(city));
            }
            if selection.compare.contains(&city) {
                return Err(SelectionError::Duplicate(city));
            }
            selection.compare.push(city);
        }

        Ok(selection)
    }

    pub const fn main(&self) -> CityId {
        self.main
    }

    pub fn compare(&self) -> &[CityId] {
        &self.compare
    }

    pub fn has_compare(&self) -> bool {
        !self.compare.is_empty()
    }

    pub fn is_compared(&self, city: CityId) -> bool {
        self.compare.contains(&city)
    }

    /// Makes `city` the main city, dropping it from the compare list.
    pub fn set_main(&mut self, city: CityId) {
        self.main = city;
        self.compare.retain(|c| *c != city);
    }

    /// Adds or removes a compare city. The main city is never compared, and a
    /// fourth compare city is refused. Returns whether anything changed.
    pub fn toggle_compare(&mut self, city: CityId) -> bool {
        if city == self.main {
            return false;
        }

        if let Some(position) = self.compare.iter().position(|c| *c == city) {
            self.compare.remove(position);
            return true;
        }

        if self.compare.len() >= MAX_COMPARE {
            return false;
        }

        self.compare.push(city);
        true
    }

    pub fn clear_compare(&mut self) {
        self.compare.clear();
    }

    /// `[main, ...compare]`, the order the grouper ranks cities by.
    pub fn order(&self) -> Vec<CityId> {
        std::iter::once(self.main)
            .chain(self.compare.iter().copied())
            .collect()
    }
}

impl Default for CitySelection {
    fn default() -> Self {
        Self::new(CityId::Taipei)
    }
}

fn parse_city(raw: &str) -> Result<CityId, SelectionError> {
    CityId::parse(raw).ok_or_else(|| SelectionError::UnknownCity(raw.to_string()))
}
