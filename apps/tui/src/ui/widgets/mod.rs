pub mod charts;
pub mod palette;
pub mod popup;
pub mod quarters;
