pub mod present;
pub mod state;

pub use present::{
    draw_bars, draw_listing, macro_shares, percentile_chart, plan_listing, results_view, ResultsView,
};
pub use state::{AppModel, FormError, Ticket, View, EVALUATION_FAILED};
