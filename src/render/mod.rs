//! Presentation of an [`AggregateResult`]: a plain-text report, a one-line trend
//! chart, and CSV export of the weekly series. Nothing here feeds back into scoring.

use crate::domain::model::AggregateResult;
use crate::utils::error::Result;
use std::io::Write;
use std::path::Path;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 52;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl TrendChart {
    pub fn from_result(result: &AggregateResult) -> Self {
        let values = result.trends.values.clone();
        Self {
            title: format!("Popularity Trends for {}", result.name),
            labels: (1..=values.len()).map(|i| format!("Week {}", i)).collect(),
            values,
        }
    }

    /// Averages the series into at most `width` buckets, one glyph each.
    pub fn sparkline(&self, width: usize) -> String {
        if self.values.is_empty() || width == 0 {
            return String::new();
        }

        let chunk = self.values.len().div_ceil(width);
        let buckets: Vec<f64> = self
            .values
            .chunks(chunk)
            .map(|c| c.iter().sum::<f64>() / c.len() as f64)
            .collect();

        let max = buckets.iter().copied().fold(0.0, f64::max);
        buckets
            .iter()
            .map(|v| {
                if max <= 0.0 {
                    SPARK_LEVELS[0]
                } else {
                    let idx = ((v / max) * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                    SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
                }
            })
            .collect()
    }
}

/// Owns at most one chart. Installing a new chart releases the previous one first.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<TrendChart>,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a previous chart was released.
    pub fn replace(&mut self, chart: TrendChart) -> bool {
        let released = self.current.take().is_some();
        self.current = Some(chart);
        released
    }

    pub fn current(&self) -> Option<&TrendChart> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[derive(Debug, Default)]
pub struct ReportRenderer {
    chart: ChartSlot,
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self) -> &ChartSlot {
        &self.chart
    }

    pub fn render_text<W: Write>(&mut self, result: &AggregateResult, out: &mut W) -> Result<()> {
        writeln!(out, "{} Popularity Metrics", result.name)?;
        writeln!(out, "Overall Popularity Score: {:.1}", result.total_score * 100.0)?;
        writeln!(out)?;

        if result.using_fallback_trends {
            writeln!(out, "Google Trends (Estimated)")?;
            writeln!(out, "  Using estimated data due to API limitations")?;
        } else {
            writeln!(out, "Google Trends")?;
        }
        writeln!(out, "  Average Score: {:.1}", result.trends.avg_value)?;

        if result.trends.values.is_empty() {
            self.chart.clear();
        } else {
            let chart = TrendChart::from_result(result);
            writeln!(out, "  {}", chart.sparkline(SPARK_WIDTH))?;
            self.chart.replace(chart);
        }
        writeln!(out)?;

        let pv = &result.page_views;
        writeln!(out, "Wikipedia Views")?;
        writeln!(out, "  Monthly Average: {:.0}", pv.monthly_avg)?;
        writeln!(out, "  Total Views: {}", pv.total_views)?;
        writeln!(out)?;

        let d = &result.discussion;
        writeln!(out, "Reddit Activity")?;
        writeln!(out, "  Total Posts: {}", d.total_posts)?;
        writeln!(out, "  Total Upvotes: {}", d.total_upvotes)?;
        writeln!(out, "  Average Upvotes: {:.1}", d.avg_upvotes)?;
        writeln!(out)?;

        let v = &result.video;
        writeln!(out, "YouTube Presence")?;
        writeln!(out, "  Videos Found: {}", v.total_videos)?;
        writeln!(out, "  Total Views: {}", v.total_views)?;
        writeln!(out, "  Average Views per Video: {:.0}", v.avg_views)?;
        writeln!(out, "  Total Likes: {}", v.total_likes)?;

        Ok(())
    }

    pub fn render_json<W: Write>(&self, result: &AggregateResult, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, result)?;
        writeln!(out)?;
        Ok(())
    }
}

/// `week,value` rows, one per trend point.
pub fn write_trends_csv<W: Write>(result: &AggregateResult, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["week", "value"])?;
    for (i, value) in result.trends.values.iter().enumerate() {
        writer.write_record([(i + 1).to_string(), format!("{:.2}", value)])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_trends_csv<P: AsRef<Path>>(result: &AggregateResult, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_trends_csv(result, file)
}
