use realty_timeline::config::AppConfig;
use realty_timeline::dataset::Dataset;
use realty_timeline::domain::CityId;
use realty_timeline::events::NormalizedEvent;
use realty_timeline::grouping::{group_by_period, QuarterBucket};
use realty_timeline::period::{Period, CATALOG_END, CATALOG_START};
use realty_timeline::prices::{impact_window, price_points, Area, PricePoint, PriceMode, PriceRecord};
use realty_timeline::selection::{CitySelection, MAX_COMPARE};
use realty_timeline::view::{filter_view, search_events};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Timeline,
    EventDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Timeline,
    Sidebar,
}

/// Rows of the settings sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarField {
    Start,
    End,
    MainCity,
    Compare,
}

impl SidebarField {
    pub const ALL: [Self; 4] = [Self::Start, Self::End, Self::MainCity, Self::Compare];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
            Self::MainCity => "Focus city",
            Self::Compare => "Compare with",
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub focus: Focus,
    pub show_help: bool,
    pub sidebar_open: bool,
    pub chart_open: bool,
    pub price_mode: PriceMode,
    pub selection: CitySelection,
    pub start: Period,
    pub end: Period,
    pub events: Vec<NormalizedEvent>,
    pub prices: Vec<PriceRecord>,
    pub buckets: Vec<QuarterBucket>,
    pub selected_bucket: usize,
    pub selected_event: usize,
    pub sidebar_index: usize,
    pub sidebar_city_index: usize,
    pub search_active: bool,
    pub search_query: String,
    pub status_message: String,
    pub dropped_records: usize,
    pub ambiguous_records: usize,
}

impl App {
    pub fn new(config: &AppConfig, dataset: Dataset) -> Self {
        let (start, end) = ordered(
            config.start.clamp_to_catalog(),
            config.end.clamp_to_catalog(),
        );

        let mut app = Self {
            running: true,
            screen: AppScreen::Timeline,
            focus: Focus::Timeline,
            show_help: false,
            sidebar_open: true,
            chart_open: true,
            price_mode: PriceMode::Price,
            selection: config.selection.clone(),
            start,
            end,
            dropped_records: dataset.events.dropped.len(),
            ambiguous_records: dataset.events.ambiguous.len(),
            events: dataset.events.events,
            prices: dataset.prices,
            buckets: Vec::new(),
            selected_bucket: 0,
            selected_event: 0,
            sidebar_index: 0,
            sidebar_city_index: 0,
            search_active: false,
            search_query: String::new(),
            status_message: String::new(),
        };
        app.refresh();
        app
    }

    /// Rebuilds the quarter buckets after the window, selection or search
    /// changed.
    pub fn refresh(&mut self) {
        let order = self.selection.order();
        let in_view = filter_view(&self.events, self.start, self.end, &order);
        let visible: Vec<NormalizedEvent> = search_events(&in_view, &self.search_query)
            .into_iter()
            .cloned()
            .collect();

        self.buckets = group_by_period(&visible, self.start, self.end, &order);
        self.selected_bucket = self.selected_bucket.min(self.buckets.len().saturating_sub(1));
        self.clamp_event_index();
    }

    pub fn visible_event_count(&self) -> usize {
        self.buckets.iter().map(QuarterBucket::event_count).sum()
    }

    pub fn current_bucket(&self) -> Option<&QuarterBucket> {
        self.buckets.get(self.selected_bucket)
    }

    pub fn current_event(&self) -> Option<&NormalizedEvent> {
        self.current_bucket()?.iter_events().nth(self.selected_event)
    }

    pub fn select_next_bucket(&mut self) {
        if self.selected_bucket + 1 < self.buckets.len() {
            self.selected_bucket += 1;
            self.selected_event = 0;
        }
    }

    pub fn select_prev_bucket(&mut self) {
        if self.selected_bucket > 0 {
            self.selected_bucket -= 1;
            self.selected_event = 0;
        }
    }

    pub fn jump_buckets(&mut self, delta: isize) {
        let last = self.buckets.len().saturating_sub(1);
        self.selected_bucket = self.selected_bucket.saturating_add_signed(delta).min(last);
        self.selected_event = 0;
    }

    /// Jumps to the next quarter that has at least one event.
    pub fn select_next_populated(&mut self) {
        if let Some(offset) = self
            .buckets
            .iter()
            .skip(self.selected_bucket + 1)
            .position(|bucket| !bucket.is_empty())
        {
            self.selected_bucket += offset + 1;
            self.selected_event = 0;
        }
    }

    pub fn cycle_event(&mut self, forward: bool) {
        let count = self.current_bucket().map_or(0, QuarterBucket::event_count);
        if count == 0 {
            return;
        }
        self.selected_event = if forward {
            (self.selected_event + 1) % count
        } else {
            (self.selected_event + count - 1) % count
        };
    }

    pub fn open_details(&mut self) {
        if self.current_event().is_some() {
            self.screen = AppScreen::EventDetails;
        } else {
            self.status_message = "No events this quarter".to_string();
        }
    }

    pub fn shift_start(&mut self, forward: bool) {
        let next = step(self.start, forward);
        if next > self.end {
            self.status_message = "Start cannot pass the end of the window".to_string();
            return;
        }
        self.start = next;
        self.status_message.clear();
        self.refresh();
    }

    pub fn shift_end(&mut self, forward: bool) {
        let next = step(self.end, forward);
        if next < self.start {
            self.status_message = "End cannot precede the start of the window".to_string();
            return;
        }
        self.end = next;
        self.status_message.clear();
        self.refresh();
    }

    pub fn set_main_city(&mut self, city: CityId) {
        self.selection.set_main(city);
        self.status_message = format!("Focus city: {}", city.label());
        self.refresh();
    }

    pub fn cycle_main_city(&mut self, forward: bool) {
        let len = CityId::ALL.len();
        let current = self.selection.main().index();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        if let Some(city) = CityId::from_index(next) {
            self.set_main_city(city);
        }
    }

    pub fn toggle_compare_city(&mut self, city: CityId) {
        if city == self.selection.main() {
            self.status_message = format!("{} is the focus city", city.label());
            return;
        }

        let was_compared = self.selection.is_compared(city);
        if self.selection.toggle_compare(city) {
            self.status_message = if was_compared {
                format!("Stopped comparing {}", city.label())
            } else {
                format!("Comparing {}", city.label())
            };
            self.refresh();
        } else {
            self.status_message = format!("At most {MAX_COMPARE} compare cities");
        }
    }

    pub fn reset_compare(&mut self) {
        self.selection.clear_compare();
        self.status_message = "Compare cities cleared".to_string();
        self.refresh();
    }

    pub fn toggle_price_mode(&mut self) {
        self.price_mode = self.price_mode.toggle();
    }

    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    pub fn set_search(&mut self, query: &str) {
        query.clone_into(&mut self.search_query);
        self.refresh();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.refresh();
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.refresh();
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.refresh();
    }

    /// Chart rows for the current window and mode.
    pub fn price_points(&self) -> Vec<PricePoint> {
        price_points(&self.prices, self.price_mode, self.start, self.end)
    }

    /// Main-city prices around the event shown in the details popup.
    pub fn impact_series(&self) -> Vec<(String, f64)> {
        let Some(period) = self.current_event().and_then(NormalizedEvent::period) else {
            return Vec::new();
        };
        impact_window(&self.prices, Area::City(self.selection.main()), period)
    }

    fn clamp_event_index(&mut self) {
        let count = self.current_bucket().map_or(0, QuarterBucket::event_count);
        if self.selected_event >= count {
            self.selected_event = 0;
        }
    }
}

const fn step(period: Period, forward: bool) -> Period {
    let next = if forward { period.next() } else { period.prev() };
    if next.ordinal() < CATALOG_START.ordinal() || next.ordinal() > CATALOG_END.ordinal() {
        period
    } else {
        next
    }
}

fn ordered(a: Period, b: Period) -> (Period, Period) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
