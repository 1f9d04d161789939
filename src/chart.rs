//! Bar chart model for a multiple-choice slide: one bar per option, in order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use egui::Color32;

use crate::models::presentation::PollOption;

/// Upper bound on y-axis gridlines, whatever the tallies.
const MAX_TICK_STEPS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub quantity: u64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl ChartModel {
    pub fn new(title: impl Into<String>, options: &[PollOption]) -> Self {
        let bars = options
            .iter()
            .enumerate()
            .map(|(position, option)| Bar {
                label: option.value.clone(),
                quantity: option.quantity,
                color: option
                    .color
                    .as_deref()
                    .and_then(|hex| Color32::from_hex(hex.trim()).ok())
                    .unwrap_or_else(|| derived_color(position, option)),
            })
            .collect();
        Self {
            title: title.into(),
            bars,
        }
    }

    pub fn max_quantity(&self) -> u64 {
        self.bars.iter().map(|bar| bar.quantity).max().unwrap_or(0)
    }

    /// Integer ticks from zero up to at least the largest tally. The step
    /// grows with the tallies so there are never more than eleven ticks.
    pub fn y_ticks(&self) -> Vec<u64> {
        let max = self.max_quantity().max(1);
        let step = max.div_ceil(MAX_TICK_STEPS).max(1);

        let mut ticks = vec![0];
        let mut tick = 0u64;
        while tick < max {
            tick = tick.saturating_add(step);
            ticks.push(tick);
        }
        ticks
    }
}

// Same option, same color: the seed only depends on the option's identity.
fn derived_color(position: usize, option: &PollOption) -> Color32 {
    let mut hasher = DefaultHasher::new();
    option.index.unwrap_or(position as u32).hash(&mut hasher);
    option.value.hash(&mut hasher);
    let mut rng = fastrand::Rng::with_seed(hasher.finish());

    let hue = rng.f32() * 360.0;
    let saturation = 0.55 + rng.f32() * 0.35;
    let value = 0.75 + rng.f32() * 0.2;
    hsv_to_rgb(hue, saturation, value)
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Color32 {
    let c = value * saturation;
    let h = (hue / 60.0) % 6.0;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<PollOption> {
        vec![
            PollOption::new(0, "A", 1),
            PollOption {
                color: Some("#ff0000".to_string()),
                ..PollOption::new(1, "B", 3)
            },
        ]
    }

    #[test]
    fn bars_follow_option_order() {
        let chart = ChartModel::new("Q", &options());
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(chart.bars[1].quantity, 3);
        assert_eq!(chart.bars[1].color, Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn derived_colors_are_stable() {
        let first = ChartModel::new("Q", &options());
        let second = ChartModel::new("Q", &options());
        assert_eq!(first.bars[0].color, second.bars[0].color);
    }

    #[test]
    fn ticks_start_at_zero() {
        assert_eq!(ChartModel::new("Q", &options()).y_ticks(), vec![0, 1, 2, 3]);
        assert_eq!(ChartModel::new("Q", &[]).y_ticks(), vec![0, 1]);
    }

    #[test]
    fn large_tallies_keep_few_ticks() {
        let ticks = ChartModel::new("Q", &[PollOption::new(0, "A", 5_000_000)]).y_ticks();
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[1], 500_000);
        assert_eq!(ticks.last(), Some(&5_000_000));

        let ticks = ChartModel::new("Q", &[PollOption::new(0, "A", u64::MAX)]).y_ticks();
        assert!(ticks.len() <= 11);
        assert_eq!(ticks.first(), Some(&0));
        assert_eq!(ticks.last(), Some(&u64::MAX));
    }

    #[test]
    fn accepts_short_hex_and_falls_back_on_names() {
        let mut options = options();
        options[0].color = Some("#0f8".to_string());
        options[1].color = Some("teal".to_string());
        let chart = ChartModel::new("Q", &options);
        assert_eq!(chart.bars[0].color, Color32::from_rgb(0, 255, 136));
        assert_eq!(chart.bars[1].color, derived_color(1, &options[1]));
    }
}
