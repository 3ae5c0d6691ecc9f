use prometheus::{Histogram, HistogramTimer};

pub fn start_timer(histogram: Option<&Histogram>) -> Option<HistogramTimer> {
    histogram.map(Histogram::start_timer)
}

pub fn stop_and_record(timer: Option<HistogramTimer>) {
    if let Some(timer) = timer {
        timer.stop_and_record();
    }
}

pub fn stop_and_discard(timer: Option<HistogramTimer>) {
    if let Some(timer) = timer {
        timer.stop_and_discard();
    }
}
